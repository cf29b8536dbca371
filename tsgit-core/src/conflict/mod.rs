//! Conflict-marked files split into independently resolvable hunks.
//!
//! [`parse`] turns text containing `<<<<<<<`/`=======`/`>>>>>>>` blocks
//! into a [`ConflictFile`]. Each block becomes a [`ConflictHunk`] and is
//! replaced in [`ConflictFile::lines`] by a [`Line::Conflict`] placeholder.
//! Resolution and regeneration live in `resolve`.

mod parser;
mod resolve;

pub use parser::parse;

use serde::Serialize;

/// How a hunk is turned back into text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "lines")]
pub enum Resolution {
    #[default]
    Ours,
    Theirs,
    /// Ours followed by theirs
    Both,
    /// Drop the block entirely
    Neither,
    /// Caller-supplied replacement lines, taken verbatim
    Custom(Vec<String>),
}

/// One conflict block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictHunk {
    /// Sequence number within the file, in document order
    pub id: usize,
    /// Line index of the `<<<<<<<` marker in the original content
    pub marker_start: usize,
    /// Line index of the `>>>>>>>` marker, or of the last line when unterminated
    pub marker_end: usize,
    /// Index of this hunk's placeholder in [`ConflictFile::lines`]
    pub position: usize,
    pub ours_label: String,
    pub base_label: Option<String>,
    pub theirs_label: Option<String>,
    pub ours: Vec<String>,
    /// Present only for diff3-style blocks
    pub base: Option<Vec<String>>,
    pub theirs: Vec<String>,
    /// False when the input ended before the closing marker
    pub terminated: bool,
    resolution: Resolution,
    is_resolved: bool,
}

/// A line of the file with conflict blocks substituted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Line {
    Text(String),
    /// Placeholder for the hunk with this id
    Conflict(usize),
}

/// A conflicted file and the state of every hunk in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictFile {
    pub path: String,
    original_content: String,
    hunks: Vec<ConflictHunk>,
    lines: Vec<Line>,
    trailing_newline: bool,
}

impl ConflictHunk {
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn is_resolved(&self) -> bool {
        self.is_resolved
    }

    /// Replacement lines when resolved as [`Resolution::Custom`]
    pub fn custom_resolution(&self) -> Option<&[String]> {
        match &self.resolution {
            Resolution::Custom(lines) => Some(lines),
            _ => None,
        }
    }
}

impl ConflictFile {
    pub fn original_content(&self) -> &str {
        &self.original_content
    }

    pub fn hunks(&self) -> &[ConflictHunk] {
        &self.hunks
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn hunk(&self, id: usize) -> Option<&ConflictHunk> {
        self.hunks.get(id).filter(|hunk| hunk.id == id)
    }

    pub fn hunk_mut(&mut self, id: usize) -> Option<&mut ConflictHunk> {
        self.hunks.get_mut(id).filter(|hunk| hunk.id == id)
    }

    /// Whether the original content ended with a newline
    pub fn trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    pub fn has_unresolved_conflicts(&self) -> bool {
        self.hunks.iter().any(|hunk| !hunk.is_resolved)
    }

    pub fn resolved_count(&self) -> usize {
        self.hunks.iter().filter(|hunk| hunk.is_resolved).count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.hunks.len() - self.resolved_count()
    }
}
