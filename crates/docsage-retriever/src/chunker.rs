//! Heading-based markdown chunking.
//!
//! A document is cut at level-2 headings (`## `). Each piece becomes one
//! section: the heading text is the section title, everything up to the
//! next `## ` is the body. Text before the first `## ` keeps the document
//! title (the leading `# ` heading, or a caller-supplied fallback).

/// One chunk of a markdown document.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Section heading, or the document title for preamble text.
    pub title: String,
    /// Trimmed body text. Never empty.
    pub body: String,
}

/// Split markdown content into sections at level-2 headings.
///
/// `fallback_title` labels preamble text when the document does not open
/// with a `# ` title (typically the file name). Sections with empty bodies
/// are dropped.
pub fn split_into_sections(content: &str, fallback_title: &str) -> Vec<Section> {
    let doc_title = content
        .lines()
        .next()
        .and_then(level1_heading_text)
        .unwrap_or(fallback_title)
        .to_string();

    // Cut into pieces, each starting at a `##` heading line (plus the
    // preamble). Terminators stay attached so the boundary test can see
    // them.
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();
    for line in content.split_inclusive('\n') {
        if is_section_boundary(line) && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    let mut sections = Vec::new();
    for piece in &pieces {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        if let Some((heading, rest)) = level2_heading_split(piece) {
            let body = rest.trim();
            if !body.is_empty() {
                sections.push(Section {
                    title: heading.to_string(),
                    body: body.to_string(),
                });
            }
        } else {
            // Preamble: drop the document title line, keep the rest.
            let body = strip_first_title_line(piece);
            let body = body.trim();
            if !body.is_empty() {
                sections.push(Section {
                    title: doc_title.clone(),
                    body: body.to_string(),
                });
            }
        }
    }
    sections
}

/// Text of a `# ` heading, if the line is one with non-empty text.
fn level1_heading_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('#')?;
    if !rest.chars().next().is_some_and(|c| c.is_whitespace()) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() { None } else { Some(text) }
}

/// Split a piece that opens with a level-2 heading into (title, body).
///
/// The marker is `##` followed by whitespace. The whitespace may span
/// blank lines; the title is the remainder of the line where text
/// resumes, and the body is everything after that line.
fn level2_heading_split(piece: &str) -> Option<(&str, &str)> {
    let rest = piece.strip_prefix("##")?;
    if !rest.chars().next().is_some_and(|c| c.is_whitespace()) {
        return None;
    }
    let start = rest.find(|c: char| !c.is_whitespace())?;
    let titled = &rest[start..];
    let (title, body) = titled.split_once('\n').unwrap_or((titled, ""));
    Some((title.trim_end(), body))
}

/// Whether a raw line (terminator included) starts a new section: `##`
/// followed by any whitespace, the newline itself counting. A bare `##`
/// at the very end of the file has no whitespace after it and stays in
/// the previous body.
fn is_section_boundary(raw_line: &str) -> bool {
    raw_line
        .strip_prefix("##")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_whitespace())
}

/// Remove the first `# ` title line from a piece of text.
fn strip_first_title_line(piece: &str) -> String {
    let mut out = String::with_capacity(piece.len());
    let mut stripped = false;
    for line in piece.lines() {
        if !stripped && level1_heading_text(line).is_some() {
            stripped = true;
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_level2_headings() {
        let content = "# Q3 Report\n\nIntro paragraph about the quarter.\n\n## Latency\n\np99 rose to 420ms in August.\n\n## Accuracy\n\nModel accuracy held at 94%.\n";
        let sections = split_into_sections(content, "report.md");
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].title, "Q3 Report");
        assert_eq!(sections[0].body, "Intro paragraph about the quarter.");
        assert_eq!(sections[1].title, "Latency");
        assert_eq!(sections[1].body, "p99 rose to 420ms in August.");
        assert_eq!(sections[2].title, "Accuracy");
        assert_eq!(sections[2].body, "Model accuracy held at 94%.");
    }

    #[test]
    fn test_no_headings_uses_fallback_title() {
        let content = "Just a plain note with no structure at all.";
        let sections = split_into_sections(content, "notes.md");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "notes.md");
        assert_eq!(sections[0].body, "Just a plain note with no structure at all.");
    }

    #[test]
    fn test_title_only_document_yields_nothing() {
        let sections = split_into_sections("# Title\n", "t.md");
        assert!(sections.is_empty());
    }

    #[test]
    fn test_level3_heading_is_not_a_boundary() {
        let content = "## Deploys\n\nWeekly cadence.\n\n### Hotfixes\n\nAs needed.\n";
        let sections = split_into_sections(content, "ops.md");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Deploys");
        assert!(sections[0].body.contains("### Hotfixes"));
        assert!(sections[0].body.contains("As needed."));
    }

    #[test]
    fn test_heading_text_is_trimmed() {
        let content = "##   Spaced Out   \n\nBody text goes here.\n";
        let sections = split_into_sections(content, "s.md");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Spaced Out");
    }

    #[test]
    fn test_title_detected_on_first_line_only() {
        let content = "Preamble first.\n# Not A Title\nMore text.\n";
        let sections = split_into_sections(content, "f.md");
        assert_eq!(sections.len(), 1);
        // The `# ` line is not on line one, so the fallback names the doc,
        // but the first matching title line is still removed from the body.
        assert_eq!(sections[0].title, "f.md");
        assert!(!sections[0].body.contains("Not A Title"));
        assert!(sections[0].body.contains("Preamble first."));
        assert!(sections[0].body.contains("More text."));
    }

    #[test]
    fn test_heading_with_no_body_is_dropped() {
        let content = "## Empty\n\n## Full\n\nSomething here.\n";
        let sections = split_into_sections(content, "e.md");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Full");
    }

    #[test]
    fn test_bare_marker_takes_next_line_as_heading() {
        let content = "Intro text.\n##\nRollouts\nStaged by region.\n";
        let sections = split_into_sections(content, "r.md");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "r.md");
        assert_eq!(sections[0].body, "Intro text.");
        assert_eq!(sections[1].title, "Rollouts");
        assert_eq!(sections[1].body, "Staged by region.");
    }

    #[test]
    fn test_blank_heading_takes_next_line_as_heading() {
        let content = "Intro text.\n## \nRollouts\nStaged by region.\n";
        let sections = split_into_sections(content, "r.md");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].title, "Rollouts");
        assert_eq!(sections[1].body, "Staged by region.");
    }

    #[test]
    fn test_trailing_bare_marker_stays_in_body() {
        let sections = split_into_sections("Intro text.\n##", "t.md");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].body, "Intro text.\n##");

        // With a newline the marker starts a piece of its own, which has
        // no heading text and falls back to the document title.
        let sections = split_into_sections("Intro text.\n##\n", "t.md");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].title, "t.md");
        assert_eq!(sections[1].body, "##");
    }

    #[test]
    fn test_empty_content() {
        assert!(split_into_sections("", "x.md").is_empty());
        assert!(split_into_sections("   \n\n  ", "x.md").is_empty());
    }
}
