//! # vds-bdd: Reduced Ordered Binary Decision Diagrams
//!
//! **`vds-bdd`** is a manager-centric BDD package built around a single
//! `ite` (if-then-else) operation, with symbolic reachability analysis of
//! finite state machines and an ISCAS `.bench` circuit front end on top.
//!
//! ## What is a BDD?
//!
//! A Binary Decision Diagram represents a boolean function as a directed acyclic graph.
//! For a fixed variable order the reduced diagram is **canonical**: two functions are
//! equal exactly when their roots are the same node. Equivalence checking is an id comparison.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: every node lives in the unique table of a
//!   [`Manager`][crate::manager::Manager] and is identified by a [`BddId`][crate::reference::BddId].
//! - **Ids are stable and predictable**: `0` is False, `1` is True, and variables take the
//!   next free id in creation order. Creation order is also the variable order.
//! - **Operator syntax**: [`Function`][crate::function::Function] handles support `&`, `|`, `^`, `!`.
//! - **Symbolic model checking**: [`reachability`] computes reachable states and shortest distances.
//! - **Circuits**: [`circuit`] reads `.bench` netlists and builds one BDD per signal.
//!
//! ## Basic Usage
//!
//! ```rust
//! use vds_bdd::manager::Manager;
//! use vds_bdd::reference::BddId;
//!
//! // 1. Initialize the manager
//! let bdd = Manager::new();
//!
//! // 2. Create variables (ids 2, 3, 4, 5)
//! let a = bdd.create_var("a");
//! let b = bdd.create_var("b");
//! let c = bdd.create_var("c");
//! let d = bdd.create_var("d");
//!
//! // 3. Build f = (a + b) * c * d
//! let f = bdd.and2(bdd.or2(a, b), bdd.and2(c, d));
//!
//! // 4. Inspect the diagram
//! assert_eq!(bdd.top_var(f), a);
//! assert_eq!(bdd.co_factor_true(f, a), bdd.and2(c, d));
//! assert_eq!(bdd.co_factor_false(bdd.co_factor_true(f, c), d), BddId::FALSE);
//! ```
//!
//! ## Core Components
//!
//! - **[`manager`]**: the unique table, the computed table and every operation.
//! - **[`dot`]**: Graphviz, Mermaid and text dumps.
//! - **[`sat`]**: satisfying assignments and model counting.
//! - **[`navtree`]**: the navigation data of the generated documentation site.

pub mod cache;
pub mod circuit;
pub mod dot;
pub mod function;
pub mod manager;
pub mod navtree;
pub mod node;
pub mod reachability;
pub mod reference;
pub mod sat;
pub mod table;
pub mod utils;
