use std::fmt::{Display, Formatter};

/// Identifier of a node in the unique table.
///
/// The two terminals occupy the first two slots: [`BddId::FALSE`] is `0` and
/// [`BddId::TRUE`] is `1`. Every other id is assigned in creation order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BddId(u32);

impl BddId {
    pub const FALSE: BddId = BddId(0);
    pub const TRUE: BddId = BddId(1);

    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the raw value of the id.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Return the id as an index into the unique table.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_constant(self) -> bool {
        self.0 <= 1
    }

    pub const fn from_bool(value: bool) -> Self {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}

impl From<bool> for BddId {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<BddId> for usize {
    fn from(id: BddId) -> Self {
        id.index()
    }
}

impl Display for BddId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(BddId::FALSE.get(), 0);
        assert_eq!(BddId::TRUE.get(), 1);
        assert!(BddId::FALSE.is_constant());
        assert!(BddId::TRUE.is_constant());
        assert!(!BddId::new(2).is_constant());
    }

    #[test]
    fn test_from_bool() {
        assert_eq!(BddId::from(true), BddId::TRUE);
        assert_eq!(BddId::from(false), BddId::FALSE);
    }

    #[test]
    fn test_display() {
        assert_eq!(BddId::new(42).to_string(), "@42");
    }
}
