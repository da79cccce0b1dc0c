use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static BLOCK_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## (Milestones|Workstreams)").expect("block heading regex is valid")
});

static SECTION_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^### (.*)").expect("section heading regex is valid"));

static TITLE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*\((.*#\d+)\)").expect("title reference regex is valid"));

/// What the sections of a data block are about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionType {
    Milestones,
    Workstreams,
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionType::Milestones => write!(f, "Milestones"),
            SectionType::Workstreams => write!(f, "Workstreams"),
        }
    }
}

impl SectionType {
    fn from_heading(name: &str) -> Option<Self> {
        match name {
            "Milestones" => Some(SectionType::Milestones),
            "Workstreams" => Some(SectionType::Workstreams),
            _ => None,
        }
    }
}

/// A `###` section of the data block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// `None` for the section collecting lines that precede the first heading.
    pub title: Option<String>,
    pub contents: Vec<String>,
}

impl Section {
    pub fn new(title: impl Into<String>, contents: Vec<String>) -> Self {
        Self {
            title: Some(title.into()),
            contents,
        }
    }

    /// The issue reference in the trailing `(...)` of the title, e.g. `#12`.
    pub fn reference(&self) -> Option<&str> {
        let title = self.title.as_deref()?;
        TITLE_REFERENCE
            .captures(title)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// Whether any content line is non-blank.
    pub fn has_content(&self) -> bool {
        self.contents.iter().any(|line| !line.trim().is_empty())
    }
}

/// The parsed structured region of an issue body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataBlock {
    pub section_type: Option<SectionType>,
    pub sections: Vec<Section>,
}

/// Parse the data region of a body into typed sections.
///
/// Lines before the `## Milestones` / `## Workstreams` heading are dropped.
pub fn parse_data<S: AsRef<str>>(lines: &[S]) -> DataBlock {
    let mut data = DataBlock::default();
    let mut current: Option<Section> = None;

    for line in lines.iter().map(AsRef::as_ref) {
        if data.section_type.is_none() {
            if let Some(captures) = BLOCK_HEADING.captures(line) {
                data.section_type = SectionType::from_heading(&captures[1]);
            }
            continue;
        }

        if let Some(captures) = SECTION_HEADING.captures(line) {
            if let Some(section) = current.take() {
                data.sections.push(section);
            }
            current = Some(Section {
                title: Some(captures[1].trim().to_string()),
                contents: Vec::new(),
            });
        } else {
            current
                .get_or_insert_with(Section::default)
                .contents
                .push(line.to_string());
        }
    }

    if let Some(section) = current {
        data.sections.push(section);
    }

    data
}

/// Render a data block back into lines.
///
/// Every section is followed by a blank separator unless it already ends in one.
pub fn rebuild_data(data: &DataBlock) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(section_type) = data.section_type {
        lines.push(format!("## {}", section_type));
    }

    for section in &data.sections {
        if let Some(title) = &section.title {
            lines.push(format!("### {}", title));
        }
        lines.extend(section.contents.iter().cloned());

        if lines.last().is_some_and(|l| !l.is_empty()) {
            lines.push(String::new());
        }
    }

    lines
}
