use crate::reference::BddId;
use crate::utils::{pairing3, MyHash};

/// Entry of the unique table: the triple `(top, high, low)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Node {
    pub top: BddId,
    pub high: BddId,
    pub low: BddId,
}

impl Node {
    pub const fn new(top: BddId, high: BddId, low: BddId) -> Self {
        Self { top, high, low }
    }

    /// Terminal node pointing to itself on every field.
    pub const fn terminal(id: BddId) -> Self {
        Self::new(id, id, id)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::terminal(BddId::FALSE)
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing3(self.top.get() as u64, self.high.get() as u64, self.low.get() as u64)
    }
}
