/// Active-column table used while assigning lanes
///
/// Index is the column; each slot holds the hash expected next in that
/// lane, or `None` when the lane is free. The lowest free slot is always
/// reused before the table grows.
#[derive(Debug, Clone, Default)]
pub struct ActiveColumns {
    slots: Vec<Option<String>>,
}

impl ActiveColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest column reserved for `hash`
    pub fn position(&self, hash: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_deref() == Some(hash))
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.position(hash).is_some()
    }

    /// Reserve the lowest free column for `hash`, appending one if none is free
    pub fn allocate(&mut self, hash: &str) -> usize {
        match self.slots.iter().position(Option::is_none) {
            Some(idx) => {
                self.slots[idx] = Some(hash.to_string());
                idx
            }
            None => {
                self.slots.push(Some(hash.to_string()));
                self.slots.len() - 1
            }
        }
    }

    /// Reserve a specific column, growing the table if needed
    pub fn reserve(&mut self, column: usize, hash: &str) {
        if column >= self.slots.len() {
            self.slots.resize(column + 1, None);
        }
        self.slots[column] = Some(hash.to_string());
    }

    /// Free every column reserved for `hash`
    pub fn release(&mut self, hash: &str) {
        for slot in self.slots.iter_mut() {
            if slot.as_deref() == Some(hash) {
                *slot = None;
            }
        }
    }

    /// Hash occupying a column
    pub fn occupant(&self, column: usize) -> Option<&str> {
        self.slots.get(column).and_then(|slot| slot.as_deref())
    }

    /// Number of columns the table has grown to
    pub fn width(&self) -> usize {
        self.slots.len()
    }

    /// Number of columns currently reserved
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_prefers_lowest_free_column() {
        let mut columns = ActiveColumns::new();
        assert_eq!(columns.allocate("a"), 0);
        assert_eq!(columns.allocate("b"), 1);
        assert_eq!(columns.allocate("c"), 2);

        columns.release("b");
        assert_eq!(columns.occupant(1), None);
        assert_eq!(columns.allocate("d"), 1);
        assert_eq!(columns.width(), 3);
    }

    #[test]
    fn release_frees_every_reservation() {
        let mut columns = ActiveColumns::new();
        columns.reserve(0, "p");
        columns.reserve(2, "p");
        assert_eq!(columns.width(), 3);
        assert_eq!(columns.position("p"), Some(0));
        assert_eq!(columns.live(), 2);

        columns.release("p");
        assert!(!columns.contains("p"));
        assert_eq!(columns.live(), 0);
    }
}
