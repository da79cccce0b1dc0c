//! Issue body document model.
//!
//! Milestone and workstream bodies carry a machine-maintained data block
//! between free-form prose:
//!
//! ```markdown
//! text before the data
//!
//! ## Workstreams
//!
//! ### A workstream (#123)
//! content
//!
//! ### Another workstream (owner/repo#234)
//! more content
//! ----
//! text after the data
//! ```
//!
//! - [`split_body`] / [`rebuild_body`]: three-way split of the raw text
//! - [`parse_data`] / [`rebuild_data`]: the data block as typed sections
//! - [`BodyDocument`]: both of the above in one value

mod data;
mod document;

pub use data::{DataBlock, Section, SectionType, parse_data, rebuild_data};
pub use document::{BodyDocument, SplitBody, rebuild_body, split_body};
