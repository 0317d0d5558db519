use arch::Word;
use indexmap::IndexMap;

use crate::ast::CommandId;

/// Where a label points: the word address of the command it decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub addr: Word,
    pub command: CommandId,
}

/// Label name -> word address. Names are case-sensitive and kept in
/// definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: IndexMap<String, Binding>,
}

impl LabelTable {
    pub fn new() -> Self {
        LabelTable {
            labels: IndexMap::new(),
        }
    }

    /// Binds `name`, replacing any earlier binding. The replaced binding is returned.
    pub fn bind(&mut self, name: &str, addr: Word, command: CommandId) -> Option<Binding> {
        self.labels
            .insert(name.to_string(), Binding { addr, command })
    }

    pub fn get(&self, name: &str) -> Option<Word> {
        self.labels.get(name).map(|binding| binding.addr)
    }

    /// Labels bound to the command at `addr`.
    pub fn at(&self, addr: Word) -> impl Iterator<Item = &str> {
        self.labels
            .iter()
            .filter(move |(_, binding)| binding.addr == addr)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Word)> {
        self.labels
            .iter()
            .map(|(name, binding)| (name.as_str(), binding.addr))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_binding_wins() {
        let mut labels = LabelTable::new();
        assert_eq!(labels.bind("LOOP", 2, CommandId(1)), None);
        let previous = labels.bind("LOOP", 7, CommandId(4));
        assert_eq!(
            previous,
            Some(Binding {
                addr: 2,
                command: CommandId(1)
            })
        );
        assert_eq!(labels.get("LOOP"), Some(7));
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut labels = LabelTable::new();
        labels.bind("start", 0, CommandId(0));
        assert_eq!(labels.get("start"), Some(0));
        assert_eq!(labels.get("START"), None);
    }

    #[test]
    fn labels_at_address() {
        let mut labels = LabelTable::new();
        labels.bind("A", 3, CommandId(2));
        labels.bind("B", 3, CommandId(2));
        labels.bind("C", 4, CommandId(3));
        assert_eq!(labels.at(3).collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(labels.iter().count(), 3);
    }

    #[test]
    fn redefined_label_moves() {
        let mut labels = LabelTable::new();
        labels.bind("X", 0, CommandId(0));
        labels.bind("X", 5, CommandId(3));
        assert_eq!(labels.at(0).count(), 0);
        assert_eq!(labels.at(5).collect::<Vec<_>>(), vec!["X"]);
    }
}
