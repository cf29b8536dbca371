use super::{ConflictFile, ConflictHunk, Line, Resolution};

const OURS_MARKER: &str = "<<<<<<<";
const BASE_MARKER: &str = "|||||||";
const SEPARATOR: &str = "=======";
const THEIRS_MARKER: &str = ">>>>>>>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    Ours,
    Base,
    Theirs,
}

/// Label following a marker, or `None` if the line is not that marker
fn marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.strip_prefix(marker).map(str::trim)
}

fn label(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

/// Split conflict-marked text into a [`ConflictFile`].
///
/// Never fails. A block still open at end of input is kept as a hunk
/// with whatever was collected and `terminated = false`. A single
/// terminal newline is not part of the line sequence.
pub fn parse(path: impl Into<String>, content: &str) -> ConflictFile {
    let trailing_newline = content.ends_with('\n');
    let body = if trailing_newline {
        &content[..content.len() - 1]
    } else {
        content
    };

    let mut lines = Vec::new();
    let mut hunks = Vec::new();
    let mut state = State::Outside;
    let mut current: Option<ConflictHunk> = None;
    let mut last_index = 0;

    for (idx, line) in body.split('\n').enumerate() {
        last_index = idx;
        match (state, current.as_mut()) {
            (State::Outside, _) | (_, None) => {
                if let Some(text) = marker(line, OURS_MARKER) {
                    current = Some(ConflictHunk {
                        id: hunks.len(),
                        marker_start: idx,
                        marker_end: idx,
                        position: lines.len(),
                        ours_label: text.to_string(),
                        base_label: None,
                        theirs_label: None,
                        ours: Vec::new(),
                        base: None,
                        theirs: Vec::new(),
                        terminated: false,
                        resolution: Resolution::default(),
                        is_resolved: false,
                    });
                    state = State::Ours;
                } else {
                    lines.push(Line::Text(line.to_string()));
                }
            }
            (State::Ours, Some(hunk)) => {
                if let Some(text) = marker(line, BASE_MARKER) {
                    hunk.base_label = label(text);
                    hunk.base = Some(Vec::new());
                    state = State::Base;
                } else if line.starts_with(SEPARATOR) {
                    state = State::Theirs;
                } else {
                    hunk.ours.push(line.to_string());
                }
            }
            (State::Base, Some(hunk)) => {
                if line.starts_with(SEPARATOR) {
                    state = State::Theirs;
                } else if let Some(base) = hunk.base.as_mut() {
                    base.push(line.to_string());
                }
            }
            (State::Theirs, Some(hunk)) => {
                if let Some(text) = marker(line, THEIRS_MARKER) {
                    hunk.theirs_label = label(text);
                    hunk.marker_end = idx;
                    hunk.terminated = true;
                    if let Some(hunk) = current.take() {
                        lines.push(Line::Conflict(hunk.id));
                        hunks.push(hunk);
                    }
                    state = State::Outside;
                } else {
                    hunk.theirs.push(line.to_string());
                }
            }
        }
    }

    if let Some(mut hunk) = current.take() {
        hunk.marker_end = last_index;
        lines.push(Line::Conflict(hunk.id));
        hunks.push(hunk);
    }

    ConflictFile {
        path: path.into(),
        original_content: content.to_string(),
        hunks,
        lines,
        trailing_newline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_two_way_conflict() {
        let file = parse(
            "src/lib.rs",
            "a\n<<<<<<< HEAD\nmine\n=======\ntheirs\n>>>>>>> branch\nb\n",
        );

        assert!(file.has_unresolved_conflicts());
        assert_eq!(file.hunks().len(), 1);

        let hunk = &file.hunks()[0];
        assert_eq!(hunk.id, 0);
        assert_eq!(hunk.ours, text(&["mine"]));
        assert_eq!(hunk.theirs, text(&["theirs"]));
        assert_eq!(hunk.base, None);
        assert_eq!(hunk.ours_label, "HEAD");
        assert_eq!(hunk.theirs_label.as_deref(), Some("branch"));
        assert_eq!((hunk.marker_start, hunk.marker_end), (1, 5));
        assert_eq!(hunk.position, 1);
        assert!(hunk.terminated);
        assert_eq!(hunk.resolution(), &Resolution::Ours);
        assert!(!hunk.is_resolved());

        assert_eq!(
            file.lines(),
            &[
                Line::Text("a".to_string()),
                Line::Conflict(0),
                Line::Text("b".to_string()),
            ]
        );
        assert!(file.trailing_newline());
    }

    #[test]
    fn test_diff3_conflict_keeps_base() {
        let file = parse(
            "notes.txt",
            "<<<<<<< ours\nx = 1\n||||||| merged common ancestors\nx = 0\n=======\nx = 2\n>>>>>>> theirs",
        );

        let hunk = &file.hunks()[0];
        assert_eq!(hunk.ours, text(&["x = 1"]));
        assert_eq!(hunk.base, Some(text(&["x = 0"])));
        assert_eq!(hunk.base_label.as_deref(), Some("merged common ancestors"));
        assert_eq!(hunk.theirs, text(&["x = 2"]));
        assert_eq!(file.lines(), &[Line::Conflict(0)]);
        assert!(!file.trailing_newline());
    }

    #[test]
    fn test_empty_base_section_is_present() {
        let file = parse("f", "<<<<<<<\n|||||||\n=======\nnew\n>>>>>>>\n");
        let hunk = &file.hunks()[0];

        assert_eq!(hunk.base, Some(Vec::new()));
        assert_eq!(hunk.base_label, None);
        assert_eq!(hunk.ours_label, "");
        assert_eq!(hunk.theirs_label, None);
        assert!(hunk.ours.is_empty());
    }

    #[test]
    fn test_hunks_numbered_in_document_order() {
        let content = "\
<<<<<<< HEAD
one
=======
uno
>>>>>>> es
between
<<<<<<< HEAD
two
=======
dos
>>>>>>> es
";
        let file = parse("numbers.txt", content);

        assert_eq!(file.hunks().len(), 2);
        assert_eq!(file.hunks()[1].id, 1);
        assert_eq!(file.hunks()[1].ours, text(&["two"]));
        assert_eq!(file.hunks()[1].position, 2);
        assert_eq!(file.hunks()[1].marker_start, 6);

        let placeholders = file
            .lines()
            .iter()
            .filter(|line| matches!(line, Line::Conflict(_)))
            .count();
        assert_eq!(placeholders, file.hunks().len());
    }

    #[test]
    fn test_unterminated_block_is_kept() {
        let file = parse("broken.txt", "keep\n<<<<<<< HEAD\nmine\n=======\npartial");

        assert_eq!(file.hunks().len(), 1);
        let hunk = &file.hunks()[0];
        assert!(!hunk.terminated);
        assert_eq!(hunk.ours, text(&["mine"]));
        assert_eq!(hunk.theirs, text(&["partial"]));
        assert_eq!(hunk.marker_end, 4);
        assert_eq!(
            file.lines(),
            &[Line::Text("keep".to_string()), Line::Conflict(0)]
        );
    }

    #[test]
    fn test_missing_separator_collects_ours_to_end() {
        let file = parse("broken.txt", "<<<<<<< HEAD\nmine\n>>>>>>> other\n");

        let hunk = &file.hunks()[0];
        assert!(!hunk.terminated);
        assert_eq!(hunk.ours, text(&["mine", ">>>>>>> other"]));
        assert!(hunk.theirs.is_empty());
    }

    #[test]
    fn test_stray_markers_outside_conflict_are_text() {
        let file = parse("doc.md", "Title\n=======\n>>>>>>> quoted\n");

        assert!(!file.has_unresolved_conflicts());
        assert!(file.hunks().is_empty());
        assert_eq!(file.lines().len(), 3);
    }

    #[test]
    fn test_empty_input() {
        let file = parse("empty", "");
        assert!(!file.has_unresolved_conflicts());
        assert_eq!(file.lines(), &[Line::Text(String::new())]);
        assert_eq!(file.original_content(), "");
    }
}
