use crate::core::{CommitNode, GraphModel};
use crate::render::text::truncate_to_width;
use serde::{Deserialize, Serialize};

/// Glyph set used for the graph columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharsetProfile {
    #[default]
    Unicode,
    Ascii,
}

impl CharsetProfile {
    fn commit(self, node: &CommitNode) -> char {
        match (self, node.is_head, node.is_merge()) {
            (CharsetProfile::Unicode, true, _) => '◉',
            (CharsetProfile::Unicode, false, true) => '◆',
            (CharsetProfile::Unicode, false, false) => '●',
            (CharsetProfile::Ascii, true, _) => '@',
            (CharsetProfile::Ascii, false, true) => 'M',
            (CharsetProfile::Ascii, false, false) => '*',
        }
    }

    fn pass(self) -> char {
        match self {
            CharsetProfile::Unicode => '│',
            CharsetProfile::Ascii => '|',
        }
    }

    fn corner(self, right: bool, below: bool) -> char {
        match (self, right, below) {
            (CharsetProfile::Unicode, true, true) => '╮',
            (CharsetProfile::Unicode, true, false) => '╯',
            (CharsetProfile::Unicode, false, true) => '╭',
            (CharsetProfile::Unicode, false, false) => '╰',
            (CharsetProfile::Ascii, true, true) | (CharsetProfile::Ascii, false, false) => '\\',
            (CharsetProfile::Ascii, true, false) | (CharsetProfile::Ascii, false, true) => '/',
        }
    }
}

/// What occupies one column on one row besides the commit itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Pass,
    /// A lane bending into the row's commit. `below` is the side the
    /// vertical part of the lane continues on.
    Corner { below: bool },
}

/// Renders a [`GraphModel`] as one line of text per commit
#[derive(Debug, Clone)]
pub struct TextRenderer {
    charset: CharsetProfile,
    message_width: usize,
}

impl TextRenderer {
    pub fn new(charset: CharsetProfile, message_width: usize) -> Self {
        Self {
            charset,
            message_width,
        }
    }

    pub fn render(&self, model: &GraphModel) -> String {
        let live = live_columns(model);
        model
            .nodes
            .iter()
            .zip(live.iter())
            .map(|(node, lanes)| self.render_row(node, lanes) + "\n")
            .collect()
    }

    fn render_row(&self, node: &CommitNode, lanes: &[Cell]) -> String {
        let cells: Vec<String> = lanes
            .iter()
            .enumerate()
            .map(|(column, &cell)| {
                if column == node.column {
                    return self.charset.commit(node).to_string();
                }
                match cell {
                    Cell::Empty => " ".to_string(),
                    Cell::Pass => self.charset.pass().to_string(),
                    Cell::Corner { below } => {
                        self.charset.corner(column > node.column, below).to_string()
                    }
                }
            })
            .collect();

        let mut line = cells.join(" ").trim_end().to_string();
        line.push(' ');
        line.push_str(&node.short_hash);

        let decorations = decorations(node);
        if !decorations.is_empty() {
            line.push_str(&format!(" ({})", decorations.join(", ")));
        }

        if !node.message.is_empty() {
            line.push(' ');
            line.push_str(&truncate_to_width(&node.message, self.message_width));
        }

        line
    }
}

/// Per row, what each column carries.
///
/// An edge runs vertically in its `to_column` between its endpoints. An
/// edge whose parent is not in the model runs to the last row. Where an
/// endpoint commit sits in another column the lane ends in a corner.
fn live_columns(model: &GraphModel) -> Vec<Vec<Cell>> {
    let mut rows = vec![vec![Cell::Empty; model.max_columns]; model.nodes.len()];

    for edge in &model.edges {
        let Some(from) = model.row_of(&edge.from) else {
            continue;
        };
        let to = model.row_of(&edge.to);
        let column = edge.to_column;

        let (top, bottom) = match to {
            Some(to) if to < from => (to, from),
            Some(to) => (from, to),
            None => (from, rows.len()),
        };
        for row in rows.iter_mut().take(bottom).skip(top + 1) {
            row[column] = Cell::Pass;
        }

        let downward = to.map_or(true, |to| to > from);
        if model.nodes[from].column != column {
            bend(&mut rows[from], column, downward);
        }
        if let Some(to) = to {
            if to != from && model.nodes[to].column != column {
                bend(&mut rows[to], column, !downward);
            }
        }
    }

    rows
}

fn bend(row: &mut [Cell], column: usize, below: bool) {
    if row[column] == Cell::Empty {
        row[column] = Cell::Corner { below };
    }
}

fn decorations(node: &CommitNode) -> Vec<String> {
    let mut names = Vec::new();
    let mut branches = node.branches.iter();

    if node.is_head {
        match branches.next() {
            Some(branch) => names.push(format!("HEAD -> {}", branch)),
            None => names.push("HEAD".to_string()),
        }
    }
    names.extend(branches.cloned());
    names.extend(node.tags.iter().map(|tag| format!("tag: {}", tag)));
    names
}
