use super::data::{DataBlock, parse_data, rebuild_data};

const MILESTONES_MARKER: &str = "## Milestones";
const WORKSTREAMS_MARKER: &str = "## Workstreams";
const RULE_MARKER: &str = "---";

/// Raw lines of a body, split around the data block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitBody<'a> {
    pub pre: Vec<&'a str>,
    pub data: Vec<&'a str>,
    pub post: Vec<&'a str>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Pre,
    Data,
    Post,
}

/// Split a body into preamble, data and postamble lines.
///
/// The data region starts at the first `## Milestones` or `## Workstreams`
/// line, the postamble at the first following line starting with `---`.
/// Without a data marker everything is preamble.
pub fn split_body(body: &str) -> SplitBody<'_> {
    let mut split = SplitBody::default();
    let mut state = ScanState::Pre;

    for line in body.lines() {
        if state == ScanState::Pre {
            if line.starts_with(MILESTONES_MARKER) || line.starts_with(WORKSTREAMS_MARKER) {
                state = ScanState::Data;
            } else {
                split.pre.push(line);
            }
        }
        if state == ScanState::Data {
            if line.starts_with(RULE_MARKER) {
                state = ScanState::Post;
            } else {
                split.data.push(line);
            }
        }
        if state == ScanState::Post {
            split.post.push(line);
        }
    }

    split
}

/// Join the three parts of a body back together.
pub fn rebuild_body<A, B, C>(pre: &[A], data: &[B], post: &[C]) -> String
where
    A: AsRef<str>,
    B: AsRef<str>,
    C: AsRef<str>,
{
    let lines: Vec<&str> = pre
        .iter()
        .map(AsRef::as_ref)
        .chain(data.iter().map(AsRef::as_ref))
        .chain(post.iter().map(AsRef::as_ref))
        .collect();
    lines.join("\n")
}

/// An issue body with its data block parsed.
///
/// Built fresh from the body text whenever needed and rendered back to text
/// in one go, so the owning issue never holds a partially edited body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyDocument {
    pub preamble: Vec<String>,
    pub data: DataBlock,
    pub postamble: Vec<String>,
}

impl BodyDocument {
    pub fn parse(body: &str) -> Self {
        let split = split_body(body);
        Self {
            preamble: split.pre.iter().map(|l| l.to_string()).collect(),
            data: parse_data(&split.data),
            postamble: split.post.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn with_data(mut self, data: DataBlock) -> Self {
        self.data = data;
        self
    }

    pub fn render(&self) -> String {
        rebuild_body(&self.preamble, &rebuild_data(&self.data), &self.postamble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::SectionType;

    #[test]
    fn test_split_without_marker() {
        let split = split_body("Just prose.\n\nNothing structured.");
        assert_eq!(split.pre, vec!["Just prose.", "", "Nothing structured."]);
        assert!(split.data.is_empty());
        assert!(split.post.is_empty());
    }

    #[test]
    fn test_split_three_parts() {
        let body = "intro\n## Milestones\n### M (#1)\n- a\n----\nfooter\n## Milestones";
        let split = split_body(body);
        assert_eq!(split.pre, vec!["intro"]);
        assert_eq!(split.data, vec!["## Milestones", "### M (#1)", "- a"]);
        assert_eq!(split.post, vec!["----", "footer", "## Milestones"]);
    }

    #[test]
    fn test_split_marker_prefix_match() {
        let split = split_body("## Workstreams (auto-generated)\n### W (#2)");
        assert!(split.pre.is_empty());
        assert_eq!(split.data.len(), 2);
    }

    #[test]
    fn test_round_trip() {
        let body = "About.\n## Workstreams\n### WorkstreamA (#2)\nfoo\n\n### B (#3)\nbar\n\n---\nfooter";
        let doc = BodyDocument::parse(body);
        assert_eq!(doc.data.section_type, Some(SectionType::Workstreams));
        assert_eq!(doc.data.sections.len(), 2);
        assert_eq!(doc.render(), body);
    }

    #[test]
    fn test_round_trip_normalizes_missing_separator() {
        let doc = BodyDocument::parse("## Milestones\n### M (#1)\n- a\n### N (#2)\n- b");
        assert_eq!(
            doc.render(),
            "## Milestones\n### M (#1)\n- a\n\n### N (#2)\n- b\n"
        );
    }

    #[test]
    fn test_render_without_data_block_is_preamble() {
        let doc = BodyDocument::parse("Some stuff that isn't a milestone list");
        assert_eq!(doc.render(), "Some stuff that isn't a milestone list");
    }
}
