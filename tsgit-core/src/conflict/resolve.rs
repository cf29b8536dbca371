use super::{ConflictFile, ConflictHunk, Line, Resolution};
use crate::error::ConflictError;

impl ConflictHunk {
    /// Choose how this hunk is regenerated and mark it resolved.
    /// Custom lines are taken verbatim.
    pub fn resolve(&mut self, resolution: Resolution) {
        self.resolution = resolution;
        self.is_resolved = true;
    }

    /// Back to the parse-time state: ours, unresolved
    pub fn unresolve(&mut self) {
        self.resolution = Resolution::default();
        self.is_resolved = false;
    }

    /// Lines this hunk contributes under its current resolution
    pub fn resolved_content(&self) -> Vec<&str> {
        match &self.resolution {
            Resolution::Ours => self.ours.iter().map(String::as_str).collect(),
            Resolution::Theirs => self.theirs.iter().map(String::as_str).collect(),
            Resolution::Both => self
                .ours
                .iter()
                .chain(self.theirs.iter())
                .map(String::as_str)
                .collect(),
            Resolution::Neither => Vec::new(),
            Resolution::Custom(lines) => lines.iter().map(String::as_str).collect(),
        }
    }
}

impl ConflictFile {
    /// Resolve a single hunk by id
    pub fn resolve(&mut self, id: usize, resolution: Resolution) -> Result<(), ConflictError> {
        self.hunk_mut(id)
            .ok_or(ConflictError::UnknownHunk(id))?
            .resolve(resolution);
        Ok(())
    }

    /// Unresolve a single hunk by id
    pub fn unresolve(&mut self, id: usize) -> Result<(), ConflictError> {
        self.hunk_mut(id)
            .ok_or(ConflictError::UnknownHunk(id))?
            .unresolve();
        Ok(())
    }

    /// Apply the same resolution to every hunk
    pub fn resolve_all(&mut self, resolution: Resolution) {
        for hunk in &mut self.hunks {
            hunk.resolve(resolution.clone());
        }
    }

    /// Unresolve every hunk
    pub fn reset(&mut self) {
        for hunk in &mut self.hunks {
            hunk.unresolve();
        }
    }

    /// Text with every placeholder replaced by its hunk's resolved lines,
    /// joined with `\n`. Unresolved hunks contribute their default (ours).
    pub fn generate(&self) -> String {
        let mut out: Vec<&str> = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            match line {
                Line::Text(text) => out.push(text),
                Line::Conflict(id) => {
                    if let Some(hunk) = self.hunk(*id) {
                        out.extend(hunk.resolved_content());
                    }
                }
            }
        }
        out.join("\n")
    }

    /// [`generate`](Self::generate), or `None` while any hunk is unresolved
    pub fn apply(&self) -> Option<String> {
        if self.has_unresolved_conflicts() {
            None
        } else {
            Some(self.generate())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::conflict::{parse, Resolution};
    use crate::error::ConflictError;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "a\n<<<<<<< HEAD\nmine\n=======\ntheirs\n>>>>>>> branch\nb\n";

    const TWO_HUNKS: &str = "\
fn main() {
<<<<<<< HEAD
    let x = 1;
=======
    let x = 2;
>>>>>>> feature
    println!(\"{}\", x);
<<<<<<< HEAD
    done();
||||||| base
    finish();
=======
    exit();
>>>>>>> feature
}";

    #[test]
    fn test_both_concatenates_sides() {
        let mut file = parse("f", SAMPLE);
        file.resolve(0, Resolution::Both).unwrap();
        assert_eq!(file.generate(), "a\nmine\ntheirs\nb");
    }

    #[test]
    fn test_neither_drops_block() {
        let mut file = parse("f", SAMPLE);
        file.resolve(0, Resolution::Neither).unwrap();
        assert_eq!(file.generate(), "a\nb");
    }

    #[test]
    fn test_ours_theirs_and_custom() {
        let mut file = parse("f", SAMPLE);

        file.resolve(0, Resolution::Theirs).unwrap();
        assert_eq!(file.generate(), "a\ntheirs\nb");

        file.resolve(0, Resolution::Custom(vec!["x".into(), "y".into()]))
            .unwrap();
        assert_eq!(file.hunk(0).unwrap().custom_resolution().unwrap(), ["x", "y"]);
        assert_eq!(file.generate(), "a\nx\ny\nb");

        file.resolve(0, Resolution::Custom(Vec::new())).unwrap();
        assert_eq!(file.generate(), "a\nb");

        file.resolve(0, Resolution::Ours).unwrap();
        assert_eq!(file.hunk(0).unwrap().custom_resolution(), None);
        assert_eq!(file.generate(), "a\nmine\nb");
    }

    #[test]
    fn test_conflict_free_round_trip() {
        let content = "line one\n\n  indented\nlast";
        let file = parse("clean.txt", content);

        assert!(!file.has_unresolved_conflicts());
        assert_eq!(file.generate(), content);
        assert_eq!(file.apply().as_deref(), Some(content));
    }

    #[test]
    fn test_terminal_newline_is_left_to_write_back() {
        let file = parse("clean.txt", "line\nother\n");

        assert!(file.trailing_newline());
        assert_eq!(file.generate(), "line\nother");
        assert_eq!(file.apply().as_deref(), Some("line\nother"));
        assert_eq!(file.original_content(), "line\nother\n");
    }

    #[test]
    fn test_generate_is_idempotent() {
        let mut file = parse("f", TWO_HUNKS);

        file.resolve(0, Resolution::Ours).unwrap();
        let first = file.generate();
        file.resolve(0, Resolution::Ours).unwrap();
        let second = file.generate();

        assert_eq!(first, second);
        assert_eq!(file.generate(), file.generate());
    }

    #[test]
    fn test_apply_waits_for_every_hunk() {
        let mut file = parse("src/main.rs", TWO_HUNKS);
        assert_eq!(file.unresolved_count(), 2);
        assert_eq!(file.apply(), None);

        file.resolve(1, Resolution::Theirs).unwrap();
        assert!(file.has_unresolved_conflicts());
        assert_eq!(file.apply(), None);

        file.resolve(0, Resolution::Theirs).unwrap();
        assert_eq!(file.resolved_count(), 2);
        assert_eq!(
            file.apply().unwrap(),
            "fn main() {\n    let x = 2;\n    println!(\"{}\", x);\n    exit();\n}"
        );
    }

    #[test]
    fn test_unresolve_and_reset() {
        let mut file = parse("f", TWO_HUNKS);
        file.resolve_all(Resolution::Custom(vec!["// merged".into()]));
        assert!(file.apply().is_some());

        file.unresolve(1).unwrap();
        let hunk = file.hunk(1).unwrap();
        assert!(!hunk.is_resolved());
        assert_eq!(hunk.resolution(), &Resolution::Ours);
        assert_eq!(hunk.custom_resolution(), None);
        assert_eq!(file.apply(), None);

        file.reset();
        assert_eq!(file.unresolved_count(), 2);
        assert!(file
            .hunks()
            .iter()
            .all(|hunk| hunk.resolution() == &Resolution::Ours));
    }

    #[test]
    fn test_unknown_hunk() {
        let mut file = parse("f", SAMPLE);
        assert!(matches!(
            file.resolve(7, Resolution::Both),
            Err(ConflictError::UnknownHunk(7))
        ));
        assert!(matches!(file.unresolve(1), Err(ConflictError::UnknownHunk(1))));
    }

    #[test]
    fn test_hunks_resolve_independently() {
        let mut file = parse("f", TWO_HUNKS);
        file.resolve(0, Resolution::Neither).unwrap();
        file.resolve(1, Resolution::Both).unwrap();

        assert_eq!(
            file.generate(),
            "fn main() {\n    println!(\"{}\", x);\n    done();\n    exit();\n}"
        );
        assert_eq!(file.original_content(), TWO_HUNKS);
    }
}
