//! The armory: items bound to free board numbers

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    /// Triples the next hit, or turns a bullseye into a burst
    Plasma,
    /// Stuns every hostile; hits on stunned hostiles double
    Emp,
    /// Blocks and wears down hostiles crossing it
    ForceField,
    /// Restores shields
    ShieldCell,
}

impl Item {
    /// Roll table order
    pub const ALL: [Item; 4] = [Item::Plasma, Item::Emp, Item::ForceField, Item::ShieldCell];

    pub fn name(&self) -> &'static str {
        match self {
            Item::Plasma => "Plasma Shot",
            Item::Emp => "EMP Blast",
            Item::ForceField => "Force Field",
            Item::ShieldCell => "Shield Cell",
        }
    }
}

/// Items keyed by the number that fires them, in the order they arrived
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armory {
    items: IndexMap<u8, Item>,
    capacity: usize,
}

impl Armory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: IndexMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, number: u8) -> bool {
        self.items.contains_key(&number)
    }

    pub fn get(&self, number: u8) -> Option<Item> {
        self.items.get(&number).copied()
    }

    /// Store an item; refused when full or the number is taken
    pub fn stock(&mut self, number: u8, item: Item) -> bool {
        if self.is_full() || self.contains(number) {
            return false;
        }
        self.items.insert(number, item);
        true
    }

    /// Remove and return the item bound to `number`
    pub fn take(&mut self, number: u8) -> Option<Item> {
        self.items.shift_remove(&number)
    }

    /// Remove the item at arrival position `index`
    pub fn take_index(&mut self, index: usize) -> Option<(u8, Item)> {
        self.items.shift_remove_index(index)
    }

    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.items.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, Item)> + '_ {
        self.items.iter().map(|(n, i)| (*n, *i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_and_take() {
        let mut armory = Armory::new(2);
        assert!(armory.stock(4, Item::Plasma));
        assert!(!armory.stock(4, Item::Emp));
        assert!(armory.stock(9, Item::ShieldCell));
        assert!(armory.is_full());
        assert!(!armory.stock(11, Item::Emp));

        assert_eq!(armory.take(4), Some(Item::Plasma));
        assert_eq!(armory.take(4), None);
        assert_eq!(armory.numbers().collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn test_take_index_keeps_order() {
        let mut armory = Armory::new(6);
        for (n, item) in [(3, Item::Emp), (8, Item::Plasma), (15, Item::ForceField)] {
            armory.stock(n, item);
        }
        assert_eq!(armory.take_index(1), Some((8, Item::Plasma)));
        assert_eq!(armory.numbers().collect::<Vec<_>>(), vec![3, 15]);
    }
}
