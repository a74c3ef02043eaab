//! The BDD manager.
//!
//! A [`Manager`] owns the unique table (every node of every diagram, shared)
//! and the computed table (memoized `ite` results). Functions are identified
//! by a [`BddId`], which is the position of their root node in the unique
//! table.
//!
//! # Layout of the unique table
//!
//! ```text
//! id  top  high  low   label
//!  0    0     0    0   False
//!  1    1     1    1   True
//!  2    2     1    0   A        <- variable: points to itself, high=1, low=0
//!  3    3     1    0   B
//!  4    2     3    0   ite(A,@3,@0)   <- A & B
//! ```
//!
//! The variable order is the creation order: a variable created earlier is
//! closer to the root. Since ids only grow, comparing the ids of two variables
//! compares their positions in the order.
//!
//! # Examples
//!
//! ```
//! use vds_bdd::manager::Manager;
//! use vds_bdd::reference::BddId;
//!
//! let bdd = Manager::new();
//! let a = bdd.create_var("A");
//! let b = bdd.create_var("B");
//!
//! let f = bdd.and2(a, b);
//! assert_eq!(bdd.top_var(f), a);
//! assert_eq!(bdd.high(f), b);
//! assert_eq!(bdd.low(f), BddId::FALSE);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;

use log::{debug, info};

use crate::cache::Cache;
use crate::function::Function;
use crate::node::Node;
use crate::reference::BddId;
use crate::table::Table;

/// Sizing of the manager's tables.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ManagerConfig {
    /// Initial number of unique-table buckets, as a power of two.
    /// The table grows on demand.
    pub unique_bits: usize,
    /// Number of computed-table slots, as a power of two.
    pub cache_bits: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            unique_bits: 16,
            cache_bits: 16,
        }
    }
}

type IteKey = (BddId, BddId, BddId);

pub struct Manager {
    nodes: RefCell<Table<Node>>,
    /// Labels of the terminals and the variables, in creation order.
    labels: RefCell<HashMap<BddId, String>>,
    /// All variables, in creation (= ordering) order.
    vars: RefCell<Vec<BddId>>,
    computed: RefCell<Cache<IteKey, BddId>>,
    unique_hits: Cell<usize>,
}

impl Manager {
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        let mut nodes = Table::new(config.unique_bits);

        let zero = nodes.add(Node::terminal(BddId::FALSE));
        assert_eq!(zero, BddId::FALSE.index());
        let one = nodes.add(Node::terminal(BddId::TRUE));
        assert_eq!(one, BddId::TRUE.index());

        let labels = HashMap::from([
            (BddId::FALSE, "False".to_string()),
            (BddId::TRUE, "True".to_string()),
        ]);

        Self {
            nodes: RefCell::new(nodes),
            labels: RefCell::new(labels),
            vars: RefCell::new(Vec::new()),
            computed: RefCell::new(Cache::new(config.cache_bits)),
            unique_hits: Cell::new(0),
        }
    }
}

impl Default for Manager {
    fn default() -> Self {
        Manager::new()
    }
}

impl Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("nodes", &self.unique_table_size())
            .field("vars", &self.num_vars())
            .field("unique_hits", &self.unique_hits())
            .field("computed_hits", &self.computed_hits())
            .finish()
    }
}

// Accessors
impl Manager {
    pub fn zero(&self) -> BddId {
        BddId::FALSE
    }
    pub fn one(&self) -> BddId {
        BddId::TRUE
    }

    /// Get the unique-table entry of `f`.
    pub fn node(&self, f: BddId) -> Node {
        let nodes = self.nodes.borrow();
        assert!(f.index() < nodes.len(), "Unknown BDD id {}", f);
        *nodes.value(f.index())
    }

    pub fn top_var(&self, f: BddId) -> BddId {
        self.node(f).top
    }
    pub fn high(&self, f: BddId) -> BddId {
        self.node(f).high
    }
    pub fn low(&self, f: BddId) -> BddId {
        self.node(f).low
    }

    pub fn is_constant(&self, f: BddId) -> bool {
        f.is_constant()
    }

    /// Check whether `x` is the function of a single variable.
    pub fn is_variable(&self, x: BddId) -> bool {
        !x.is_constant() && self.top_var(x) == x
    }

    /// Get the label of a node.
    ///
    /// Terminals and variables carry the label they were created with.
    /// Any other node is described as `ite(<top label>,<high>,<low>)`.
    pub fn label(&self, f: BddId) -> String {
        if let Some(label) = self.labels.borrow().get(&f) {
            return label.clone();
        }
        let node = self.node(f);
        format!("ite({},{},{})", self.label(node.top), node.high, node.low)
    }

    /// Get the label of the top variable of `f`.
    pub fn top_var_name(&self, f: BddId) -> String {
        self.label(self.top_var(f))
    }

    /// Number of nodes, terminals included.
    pub fn unique_table_size(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Number of node creations answered by an existing node.
    pub fn unique_hits(&self) -> usize {
        self.unique_hits.get()
    }

    /// Number of `ite` calls answered by the computed table.
    pub fn computed_hits(&self) -> usize {
        self.computed.borrow().hits()
    }

    pub fn num_vars(&self) -> usize {
        self.vars.borrow().len()
    }

    /// All variables, in order.
    pub fn variables(&self) -> Vec<BddId> {
        self.vars.borrow().clone()
    }

    /// Wrap `f` into a [`Function`] handle.
    pub fn function(&self, f: BddId) -> Function<'_> {
        assert!(f.index() < self.unique_table_size(), "Unknown BDD id {}", f);
        Function::new(self, f)
    }
}

impl Manager {
    /// Create a new variable, placed below every existing variable.
    pub fn create_var(&self, label: &str) -> BddId {
        let id = BddId::new(self.unique_table_size() as u32);
        let (index, existed) = self
            .nodes
            .borrow_mut()
            .put(Node::new(id, BddId::TRUE, BddId::FALSE));
        assert!(!existed);
        assert_eq!(index, id.index());

        debug!("create_var(label = {:?}) -> {}", label, id);
        self.labels.borrow_mut().insert(id, label.to_string());
        self.vars.borrow_mut().push(id);
        id
    }

    /// Create a new variable and wrap it into a [`Function`] handle.
    pub fn mk_var(&self, label: &str) -> Function<'_> {
        let id = self.create_var(label);
        self.function(id)
    }

    /// Return the node `(top, high, low)`, creating it if needed.
    fn mk_node(&self, top: BddId, high: BddId, low: BddId) -> BddId {
        if high == low {
            return high;
        }
        let (index, existed) = self.nodes.borrow_mut().put(Node::new(top, high, low));
        if existed {
            self.unique_hits.set(self.unique_hits.get() + 1);
        }
        BddId::new(index as u32)
    }

    /// Return `(high, low)` of `f` with respect to `v`, where `v` is not below the top of `f`.
    fn top_cofactors(&self, f: BddId, v: BddId) -> (BddId, BddId) {
        if f.is_constant() {
            return (f, f);
        }
        let node = self.node(f);
        if node.top != v {
            debug_assert!(node.top > v);
            return (f, f);
        }
        (node.high, node.low)
    }

    /// Top-most variable among the non-constant arguments.
    fn top_of(&self, fs: [BddId; 3]) -> BddId {
        fs.into_iter()
            .filter(|f| !f.is_constant())
            .map(|f| self.top_var(f))
            .min()
            .expect("at least one argument is not constant")
    }

    /// If-then-else.
    ///
    /// ```text
    /// ite(i, t, e) = (i ∧ t) ∨ (¬i ∧ e)
    /// ```
    ///
    /// Every connective of the manager reduces to this operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use vds_bdd::manager::Manager;
    /// use vds_bdd::reference::BddId;
    ///
    /// let bdd = Manager::new();
    /// let a = bdd.create_var("A");
    /// assert_eq!(bdd.ite(BddId::TRUE, a, BddId::FALSE), a);
    /// assert_eq!(bdd.ite(a, BddId::TRUE, BddId::FALSE), a);
    /// assert_eq!(bdd.ite(a, BddId::TRUE, BddId::TRUE), BddId::TRUE);
    /// ```
    pub fn ite(&self, i: BddId, t: BddId, e: BddId) -> BddId {
        debug!("ite(i = {}, t = {}, e = {})", i, t, e);

        // Terminal cases:
        //   ite(1,T,E) => T
        //   ite(0,T,E) => E
        //   ite(I,T,T) => T
        //   ite(I,1,0) => I
        if i == BddId::TRUE {
            return t;
        }
        if i == BddId::FALSE {
            return e;
        }
        if t == e {
            return t;
        }
        if t == BddId::TRUE && e == BddId::FALSE {
            return i;
        }

        let key = (i, t, e);
        let cached = self.computed.borrow().get(&key).copied();
        if let Some(res) = cached {
            debug!("cache: ite(i = {}, t = {}, e = {}) -> {}", i, t, e, res);
            return res;
        }

        let top = self.top_of([i, t, e]);
        debug!("top variable = {}", top);

        let (i1, i0) = self.top_cofactors(i, top);
        let (t1, t0) = self.top_cofactors(t, top);
        let (e1, e0) = self.top_cofactors(e, top);

        let high = self.ite(i1, t1, e1);
        let low = self.ite(i0, t0, e0);

        let res = self.mk_node(top, high, low);
        debug!("computed: ite(i = {}, t = {}, e = {}) -> {}", i, t, e, res);
        self.computed.borrow_mut().insert(key, res);
        res
    }

    /// Positive cofactor of `f` with respect to the variable `x`.
    pub fn co_factor_true(&self, f: BddId, x: BddId) -> BddId {
        self.co_factor(f, x, true)
    }

    /// Negative cofactor of `f` with respect to the variable `x`.
    pub fn co_factor_false(&self, f: BddId, x: BddId) -> BddId {
        self.co_factor(f, x, false)
    }

    /// Positive cofactor of `f` with respect to its top variable.
    pub fn co_factor_true_top(&self, f: BddId) -> BddId {
        self.high(f)
    }

    /// Negative cofactor of `f` with respect to its top variable.
    pub fn co_factor_false_top(&self, f: BddId) -> BddId {
        self.low(f)
    }

    /// `f|x<-value`
    pub fn co_factor(&self, f: BddId, x: BddId, value: bool) -> BddId {
        let mut cache = HashMap::new();
        self.co_factor_(f, x, value, &mut cache)
    }

    fn co_factor_(&self, f: BddId, x: BddId, value: bool, cache: &mut HashMap<BddId, BddId>) -> BddId {
        if f.is_constant() || x.is_constant() {
            return f;
        }

        let node = self.node(f);

        if node.top > x {
            // 'f' does not depend on 'x'
            return f;
        }
        if node.top == x {
            return if value { node.high } else { node.low };
        }

        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let high = self.co_factor_(node.high, x, value, cache);
        let low = self.co_factor_(node.low, x, value, cache);
        let res = self.ite(node.top, high, low);
        cache.insert(f, res);
        res
    }

    pub fn neg(&self, a: BddId) -> BddId {
        debug!("neg(a = {})", a);
        self.ite(a, BddId::FALSE, BddId::TRUE)
    }

    pub fn and2(&self, a: BddId, b: BddId) -> BddId {
        debug!("and2(a = {}, b = {})", a, b);
        self.ite(a, b, BddId::FALSE)
    }

    pub fn or2(&self, a: BddId, b: BddId) -> BddId {
        debug!("or2(a = {}, b = {})", a, b);
        self.ite(a, BddId::TRUE, b)
    }

    pub fn xor2(&self, a: BddId, b: BddId) -> BddId {
        debug!("xor2(a = {}, b = {})", a, b);
        let not_b = self.neg(b);
        self.ite(a, not_b, b)
    }

    pub fn nand2(&self, a: BddId, b: BddId) -> BddId {
        debug!("nand2(a = {}, b = {})", a, b);
        let not_b = self.neg(b);
        self.ite(a, not_b, BddId::TRUE)
    }

    pub fn nor2(&self, a: BddId, b: BddId) -> BddId {
        debug!("nor2(a = {}, b = {})", a, b);
        let not_b = self.neg(b);
        self.ite(a, BddId::FALSE, not_b)
    }

    pub fn xnor2(&self, a: BddId, b: BddId) -> BddId {
        debug!("xnor2(a = {}, b = {})", a, b);
        let not_b = self.neg(b);
        self.ite(a, b, not_b)
    }

    pub fn and_many(&self, fs: impl IntoIterator<Item = BddId>) -> BddId {
        fs.into_iter().fold(BddId::TRUE, |acc, f| self.and2(acc, f))
    }

    pub fn or_many(&self, fs: impl IntoIterator<Item = BddId>) -> BddId {
        fs.into_iter().fold(BddId::FALSE, |acc, f| self.or2(acc, f))
    }

    pub fn xor_many(&self, fs: impl IntoIterator<Item = BddId>) -> BddId {
        fs.into_iter().fold(BddId::FALSE, |acc, f| self.xor2(acc, f))
    }

    /// Existential quantification: `∃vars. f`.
    ///
    /// Variables are eliminated from the last to the first.
    pub fn exists(&self, f: BddId, vars: &[BddId]) -> BddId {
        vars.iter().rev().fold(f, |acc, &v| {
            let high = self.co_factor_true(acc, v);
            let low = self.co_factor_false(acc, v);
            self.or2(high, low)
        })
    }

    /// Universal quantification: `∀vars. f`.
    pub fn forall(&self, f: BddId, vars: &[BddId]) -> BddId {
        vars.iter().rev().fold(f, |acc, &v| {
            let high = self.co_factor_true(acc, v);
            let low = self.co_factor_false(acc, v);
            self.and2(high, low)
        })
    }

    /// Assign `values[k]` to `vars[k]` for every `k`.
    pub fn restrict(&self, f: BddId, vars: &[BddId], values: &[bool]) -> BddId {
        assert_eq!(
            vars.len(),
            values.len(),
            "Number of variables and values should match"
        );
        vars.iter()
            .zip(values.iter())
            .rev()
            .fold(f, |acc, (&v, &b)| self.co_factor(acc, v, b))
    }

    /// Evaluate `f` under the assignment given by `value`.
    pub fn eval(&self, f: BddId, value: impl Fn(BddId) -> bool) -> bool {
        let mut current = f;
        while !current.is_constant() {
            let node = self.node(current);
            current = if value(node.top) { node.high } else { node.low };
        }
        current == BddId::TRUE
    }
}

// Traversal
impl Manager {
    /// Collect every node reachable from `root`, terminals included.
    pub fn find_nodes(&self, root: BddId, nodes_of_root: &mut BTreeSet<BddId>) {
        let mut stack = vec![root];
        while let Some(f) = stack.pop() {
            if nodes_of_root.insert(f) && !f.is_constant() {
                let node = self.node(f);
                stack.push(node.high);
                stack.push(node.low);
            }
        }
    }

    /// Collect every variable that `root` depends on.
    pub fn find_vars(&self, root: BddId, vars_of_root: &mut BTreeSet<BddId>) {
        let mut nodes = BTreeSet::new();
        self.find_nodes(root, &mut nodes);
        vars_of_root.extend(
            nodes
                .into_iter()
                .filter(|f| !f.is_constant())
                .map(|f| self.top_var(f)),
        );
    }

    /// Number of nodes reachable from `f`, terminals included.
    pub fn size(&self, f: BddId) -> usize {
        let mut nodes = BTreeSet::new();
        self.find_nodes(f, &mut nodes);
        nodes.len()
    }

    /// Log the whole unique table.
    pub fn dump(&self) {
        info!("Unique table ({} nodes):", self.unique_table_size());
        let nodes = self.nodes.borrow();
        for (i, node) in nodes.iter() {
            let id = BddId::new(i as u32);
            info!(
                "  {}: top = {}, high = {}, low = {}, label = {}",
                id,
                node.top,
                node.high,
                node.low,
                self.label(id)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_terminals() {
        let bdd = Manager::new();

        assert_eq!(bdd.unique_table_size(), 2);
        assert_eq!(bdd.node(BddId::FALSE), Node::terminal(BddId::FALSE));
        assert_eq!(bdd.node(BddId::TRUE), Node::terminal(BddId::TRUE));
        assert_eq!(bdd.label(BddId::FALSE), "False");
        assert_eq!(bdd.label(BddId::TRUE), "True");
        assert!(!bdd.is_variable(BddId::TRUE));
    }

    #[test]
    fn test_create_var() {
        let bdd = Manager::new();

        let a = bdd.create_var("A");
        let b = bdd.create_var("B");

        assert_eq!(a, BddId::new(2));
        assert_eq!(b, BddId::new(3));
        assert_eq!(bdd.node(a), Node::new(a, BddId::TRUE, BddId::FALSE));
        assert_eq!(bdd.label(b), "B");
        assert_eq!(bdd.variables(), vec![a, b]);
        assert!(bdd.is_variable(a));
    }

    #[test]
    fn test_ite_reuses_variable_node() {
        let bdd = Manager::new();

        let a = bdd.create_var("A");
        let size = bdd.unique_table_size();
        // Double negation must land on the variable node itself.
        let not_a = bdd.neg(a);
        assert_eq!(bdd.neg(not_a), a);
        assert_eq!(bdd.unique_table_size(), size + 1);
        assert!(bdd.unique_hits() >= 1);
    }

    #[test]
    fn test_computed_table_hits() {
        let bdd = Manager::new();

        let a = bdd.create_var("A");
        let b = bdd.create_var("B");
        let f = bdd.and2(a, b);
        let hits = bdd.computed_hits();
        let g = bdd.and2(a, b);

        assert_eq!(f, g);
        assert_eq!(bdd.computed_hits(), hits + 1);
    }

    #[test]
    fn test_ite_label() {
        let bdd = Manager::new();

        let a = bdd.create_var("A");
        let b = bdd.create_var("B");
        let f = bdd.and2(a, b);

        assert_eq!(bdd.label(f), "ite(A,@3,@0)");
        assert_eq!(bdd.top_var_name(f), "A");
    }

    #[test]
    fn test_co_factor() {
        let bdd = Manager::new();

        let a = bdd.create_var("A");
        let b = bdd.create_var("B");
        let c = bdd.create_var("C");

        // f = a ∨ (b ∧ c)
        let bc = bdd.and2(b, c);
        let f = bdd.or2(a, bc);

        assert_eq!(bdd.co_factor_true(f, a), BddId::TRUE);
        assert_eq!(bdd.co_factor_false(f, a), bc);
        assert_eq!(bdd.co_factor_true(f, c), bdd.or2(a, b));
        assert_eq!(bdd.co_factor_false(f, c), a);

        assert_eq!(bdd.co_factor_true_top(f), BddId::TRUE);
        assert_eq!(bdd.co_factor_false_top(f), bc);

        // Constants are their own cofactors.
        assert_eq!(bdd.co_factor_true(BddId::TRUE, a), BddId::TRUE);
        assert_eq!(bdd.co_factor_false(f, BddId::TRUE), f);
    }

    #[test]
    fn test_de_morgan() {
        let bdd = Manager::new();

        let x = bdd.create_var("x");
        let y = bdd.create_var("y");

        let f = bdd.neg(bdd.and2(x, y));
        let g = bdd.or2(bdd.neg(x), bdd.neg(y));
        assert_eq!(f, g);
        assert_eq!(bdd.nand2(x, y), f);

        let f = bdd.neg(bdd.or2(x, y));
        let g = bdd.and2(bdd.neg(x), bdd.neg(y));
        assert_eq!(f, g);
        assert_eq!(bdd.nor2(x, y), f);
    }

    #[test]
    fn test_xor_itself() {
        let bdd = Manager::new();

        let x = bdd.create_var("x");
        let y = bdd.create_var("y");
        let f = bdd.and2(x, y);

        assert_eq!(bdd.xor2(f, f), BddId::FALSE);
        assert_eq!(bdd.xor2(f, bdd.neg(f)), BddId::TRUE);
        assert_eq!(bdd.xnor2(f, f), BddId::TRUE);
        assert_eq!(bdd.xnor2(x, y), bdd.neg(bdd.xor2(x, y)));
    }

    #[test]
    fn test_quantification() {
        let bdd = Manager::new();

        let x = bdd.create_var("x");
        let y = bdd.create_var("y");
        let f = bdd.and2(x, y);

        assert_eq!(bdd.exists(f, &[y]), x);
        assert_eq!(bdd.forall(f, &[y]), BddId::FALSE);
        assert_eq!(bdd.exists(f, &[x, y]), BddId::TRUE);

        let g = bdd.or2(x, y);
        assert_eq!(bdd.forall(g, &[x]), y);
    }

    #[test]
    fn test_restrict() {
        let bdd = Manager::new();

        let x1 = bdd.create_var("x1");
        let x2 = bdd.create_var("x2");
        let x3 = bdd.create_var("x3");
        let x4 = bdd.create_var("x4");

        let f = bdd.and_many([bdd.neg(x1), x2, x3, bdd.neg(x4)]);
        let g = bdd.restrict(f, &[x2, x4], &[true, false]);
        assert_eq!(g, bdd.and2(bdd.neg(x1), x3));
    }

    #[test]
    #[should_panic(expected = "Number of variables and values should match")]
    fn test_restrict_mismatch() {
        let bdd = Manager::new();
        let x = bdd.create_var("x");
        bdd.restrict(x, &[x], &[]);
    }

    #[test]
    fn test_eval() {
        let bdd = Manager::new();

        let x = bdd.create_var("x");
        let y = bdd.create_var("y");
        let f = bdd.xor2(x, y);

        assert!(bdd.eval(f, |v| v == x));
        assert!(!bdd.eval(f, |_| true));
        assert!(!bdd.eval(f, |_| false));
    }

    #[test]
    fn test_find_nodes_and_vars() {
        let bdd = Manager::new();

        let a = bdd.create_var("A");
        let b = bdd.create_var("B");
        let c = bdd.create_var("C");
        let f = bdd.and2(a, c);

        let mut nodes = BTreeSet::new();
        bdd.find_nodes(f, &mut nodes);
        assert_eq!(nodes, BTreeSet::from([BddId::FALSE, BddId::TRUE, c, f]));
        assert_eq!(bdd.size(f), 4);

        let mut vars = BTreeSet::new();
        bdd.find_vars(f, &mut vars);
        assert_eq!(vars, BTreeSet::from([a, c]));
        assert!(!vars.contains(&b));

        let mut vars = BTreeSet::new();
        bdd.find_vars(BddId::TRUE, &mut vars);
        assert!(vars.is_empty());
    }

    #[test]
    fn test_small_tables_grow() {
        let bdd = Manager::with_config(ManagerConfig {
            unique_bits: 1,
            cache_bits: 1,
        });

        let vars: Vec<_> = (0..8).map(|i| bdd.create_var(&format!("x{}", i))).collect();
        let f = bdd.xor_many(vars.iter().copied());
        // Parity of 8 variables: two nodes per level except the top one.
        assert_eq!(bdd.size(f), 2 + 1 + 2 * 7);
        assert!(bdd.eval(f, |v| v == vars[3]));
    }

    #[test]
    #[should_panic(expected = "Unknown BDD id")]
    fn test_unknown_id() {
        let bdd = Manager::new();
        bdd.node(BddId::new(7));
    }
}
