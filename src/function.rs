//! Operator syntax over manager-owned functions.
//!
//! A [`Function`] couples a [`BddId`] with the [`Manager`] it lives in, so
//! formulas can be written with the usual boolean operators:
//!
//! ```
//! use vds_bdd::manager::Manager;
//!
//! let bdd = Manager::new();
//! let a = bdd.mk_var("A");
//! let b = bdd.mk_var("B");
//! let c = bdd.mk_var("C");
//! let d = bdd.mk_var("D");
//!
//! let f = (a | b) & (c & d);
//! assert_eq!(f.top(), a);
//! assert_eq!(f.high(), c & d);
//! ```

use std::collections::BTreeSet;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Mul, MulAssign, Not};

use crate::manager::Manager;
use crate::reference::BddId;

#[derive(Copy, Clone)]
pub struct Function<'a> {
    manager: &'a Manager,
    id: BddId,
}

impl<'a> Function<'a> {
    pub(crate) fn new(manager: &'a Manager, id: BddId) -> Self {
        Self { manager, id }
    }

    pub fn id(&self) -> BddId {
        self.id
    }
    pub fn manager(&self) -> &'a Manager {
        self.manager
    }

    fn wrap(&self, id: BddId) -> Function<'a> {
        Function::new(self.manager, id)
    }

    fn check_same_manager(&self, other: &Function<'_>) {
        assert!(
            std::ptr::eq(self.manager, other.manager),
            "Functions belong to different managers"
        );
    }
}

// Structure
impl<'a> Function<'a> {
    pub fn high(&self) -> Function<'a> {
        self.wrap(self.manager.high(self.id))
    }
    pub fn low(&self) -> Function<'a> {
        self.wrap(self.manager.low(self.id))
    }
    pub fn top(&self) -> Function<'a> {
        self.wrap(self.manager.top_var(self.id))
    }
    pub fn label(&self) -> String {
        self.manager.label(self.id)
    }

    pub fn is_constant(&self) -> bool {
        self.manager.is_constant(self.id)
    }
    pub fn is_variable(&self) -> bool {
        self.manager.is_variable(self.id)
    }

    pub fn find_nodes(&self) -> BTreeSet<BddId> {
        let mut nodes = BTreeSet::new();
        self.manager.find_nodes(self.id, &mut nodes);
        nodes
    }
    pub fn find_vars(&self) -> BTreeSet<BddId> {
        let mut vars = BTreeSet::new();
        self.manager.find_vars(self.id, &mut vars);
        vars
    }

    pub fn size(&self) -> usize {
        self.manager.size(self.id)
    }
}

// Operations
impl<'a> Function<'a> {
    pub fn ite(&self, then: Function<'_>, otherwise: Function<'_>) -> Function<'a> {
        self.check_same_manager(&then);
        self.check_same_manager(&otherwise);
        self.wrap(self.manager.ite(self.id, then.id, otherwise.id))
    }

    pub fn nand(&self, rhs: Function<'_>) -> Function<'a> {
        self.check_same_manager(&rhs);
        self.wrap(self.manager.nand2(self.id, rhs.id))
    }

    pub fn nor(&self, rhs: Function<'_>) -> Function<'a> {
        self.check_same_manager(&rhs);
        self.wrap(self.manager.nor2(self.id, rhs.id))
    }

    pub fn xnor(&self, rhs: Function<'_>) -> Function<'a> {
        self.check_same_manager(&rhs);
        self.wrap(self.manager.xnor2(self.id, rhs.id))
    }

    /// Cofactor with respect to `var` set to `value`.
    pub fn cofactor(&self, var: Function<'_>, value: bool) -> Function<'a> {
        self.check_same_manager(&var);
        self.wrap(self.manager.co_factor(self.id, var.id, value))
    }

    /// Disjunction of the cofactors over every variable in `vars`.
    pub fn exists(&self, vars: &[Function<'_>]) -> Function<'a> {
        let vars = self.ids(vars);
        self.wrap(self.manager.exists(self.id, &vars))
    }

    /// Conjunction of the cofactors over every variable in `vars`.
    pub fn forall(&self, vars: &[Function<'_>]) -> Function<'a> {
        let vars = self.ids(vars);
        self.wrap(self.manager.forall(self.id, &vars))
    }

    pub fn restrict(&self, vars: &[Function<'_>], values: &[bool]) -> Function<'a> {
        let vars = self.ids(vars);
        self.wrap(self.manager.restrict(self.id, &vars, values))
    }

    /// Tseitin-style equivalence `self ⇔ rhs`.
    pub fn tseitin(&self, rhs: Function<'_>) -> Function<'a> {
        self.xnor(rhs)
    }

    fn ids(&self, fs: &[Function<'_>]) -> Vec<BddId> {
        fs.iter()
            .map(|f| {
                self.check_same_manager(f);
                f.id
            })
            .collect()
    }
}

impl PartialEq for Function<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.manager, other.manager) && self.id == other.id
    }
}

impl Eq for Function<'_> {}

impl PartialEq<BddId> for Function<'_> {
    fn eq(&self, other: &BddId) -> bool {
        self.id == *other
    }
}

impl From<Function<'_>> for BddId {
    fn from(f: Function<'_>) -> Self {
        f.id
    }
}

impl Display for Function<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.id, f)
    }
}

impl Debug for Function<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Function({}, {})", self.id, self.label())
    }
}

impl<'a> Not for Function<'a> {
    type Output = Function<'a>;

    fn not(self) -> Self::Output {
        self.wrap(self.manager.neg(self.id))
    }
}

impl<'a> BitAnd for Function<'a> {
    type Output = Function<'a>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.check_same_manager(&rhs);
        self.wrap(self.manager.and2(self.id, rhs.id))
    }
}

impl<'a> BitOr for Function<'a> {
    type Output = Function<'a>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.check_same_manager(&rhs);
        self.wrap(self.manager.or2(self.id, rhs.id))
    }
}

impl<'a> BitXor for Function<'a> {
    type Output = Function<'a>;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.check_same_manager(&rhs);
        self.wrap(self.manager.xor2(self.id, rhs.id))
    }
}

impl<'a> Mul for Function<'a> {
    type Output = Function<'a>;

    fn mul(self, rhs: Self) -> Self::Output {
        self & rhs
    }
}

impl<'a> Add for Function<'a> {
    type Output = Function<'a>;

    fn add(self, rhs: Self) -> Self::Output {
        self | rhs
    }
}

impl BitAndAssign for Function<'_> {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}

impl BitOrAssign for Function<'_> {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl BitXorAssign for Function<'_> {
    fn bitxor_assign(&mut self, rhs: Self) {
        *self = *self ^ rhs;
    }
}

impl MulAssign for Function<'_> {
    fn mul_assign(&mut self, rhs: Self) {
        *self &= rhs;
    }
}

impl AddAssign for Function<'_> {
    fn add_assign(&mut self, rhs: Self) {
        *self |= rhs;
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_operators_match_manager() {
        let bdd = Manager::new();
        let x = bdd.mk_var("x");
        let y = bdd.mk_var("y");

        assert_eq!(x & y, bdd.and2(x.id(), y.id()));
        assert_eq!(x | y, bdd.or2(x.id(), y.id()));
        assert_eq!(x ^ y, bdd.xor2(x.id(), y.id()));
        assert_eq!(!x, bdd.neg(x.id()));
        assert_eq!(x * y, x & y);
        assert_eq!(x + y, x | y);
        assert_eq!(x.nand(y), !(x & y));
        assert_eq!(x.nor(y), !(x | y));
        assert_eq!(x.xnor(y), !(x ^ y));
        assert_eq!(x.tseitin(y), x.xnor(y));
    }

    #[test]
    fn test_assign_operators() {
        let bdd = Manager::new();
        let x = bdd.mk_var("x");
        let y = bdd.mk_var("y");
        let z = bdd.mk_var("z");

        let mut f = x;
        f += y;
        f *= z;
        assert_eq!(f, (x | y) & z);

        let mut g = x;
        g ^= y;
        g ^= y;
        assert_eq!(g, x);
    }

    #[test]
    fn test_structure() {
        let bdd = Manager::new();
        let a = bdd.mk_var("A");
        let b = bdd.mk_var("B");

        let f = a | b;
        assert_eq!(f.top(), a);
        assert_eq!(f.high(), bdd.function(BddId::TRUE));
        assert_eq!(f.low(), b);
        assert!(!f.is_variable());
        assert!(!f.is_constant());
        assert!(a.is_variable());
        assert_eq!(f.find_vars(), BTreeSet::from([a.id(), b.id()]));
    }

    #[test]
    fn test_quantifiers() {
        let bdd = Manager::new();
        let a = bdd.mk_var("A");
        let b = bdd.mk_var("B");
        let c = bdd.mk_var("C");

        let f = (a & b) | c;
        assert_eq!(f.exists(&[a, b]), bdd.function(BddId::TRUE));
        assert_eq!(f.forall(&[c]), a & b);
        assert_eq!(f.restrict(&[a, c], &[true, false]), b);
        assert_eq!(f.cofactor(c, true), bdd.function(BddId::TRUE));
        assert_eq!(f.cofactor(a, false), c);
    }

    #[test]
    #[should_panic(expected = "Functions belong to different managers")]
    fn test_mixing_managers() {
        let bdd1 = Manager::new();
        let bdd2 = Manager::new();
        let x = bdd1.mk_var("x");
        let y = bdd2.mk_var("y");
        let _ = x & y;
    }
}
