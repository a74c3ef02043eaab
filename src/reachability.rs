//! Symbolic reachability analysis of finite state machines.
//!
//! A machine with `n` state bits and `m` inputs is encoded with three groups
//! of variables, created in this order:
//!
//! ```text
//! s0, s0', s1, s1', ..., s(n-1), s(n-1)', i0, ..., i(m-1)
//! ```
//!
//! Interleaving current and next state bits keeps the transition relation
//! small for machines whose bits depend on their neighbours.
//!
//! # Examples
//!
//! ```
//! use vds_bdd::reachability::Reachability;
//!
//! let mut fsm = Reachability::new(2, 0).unwrap();
//! let [s0, s1] = [fsm.states()[0], fsm.states()[1]];
//!
//! // Both bits toggle on every step.
//! let bdd = fsm.manager();
//! let deltas = [bdd.neg(s0), bdd.neg(s1)];
//! fsm.set_transition_functions(&deltas).unwrap();
//!
//! assert!(fsm.is_reachable(&[true, true]).unwrap());
//! assert!(!fsm.is_reachable(&[true, false]).unwrap());
//! ```

use log::debug;
use num_bigint::BigUint;
use thiserror::Error;

use crate::manager::Manager;
use crate::reference::BddId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReachabilityError {
    #[error("A state machine needs at least one state bit")]
    NoStateBits,

    #[error("State vector has {got} bits, but the machine has {expected} state bits")]
    StateVectorSize { expected: usize, got: usize },

    #[error("Got {got} transition functions, but the machine has {expected} state bits")]
    TransitionCount { expected: usize, got: usize },

    #[error("Unknown BDD id {0}")]
    UnknownId(BddId),
}

pub type Result<T> = std::result::Result<T, ReachabilityError>;

pub struct Reachability {
    bdd: Manager,
    states: Vec<BddId>,
    next_states: Vec<BddId>,
    inputs: Vec<BddId>,
    transitions: Vec<BddId>,
    init_state: Vec<bool>,
    /// Transition relation over `s`, `s'` and `i`.
    tau: BddId,
    /// Characteristic function of the initial state.
    cs0: BddId,
}

impl Reachability {
    pub fn new(state_bits: usize, input_bits: usize) -> Result<Self> {
        Self::with_manager(Manager::new(), state_bits, input_bits)
    }

    /// Build the machine on top of an existing (usually fresh) manager.
    pub fn with_manager(bdd: Manager, state_bits: usize, input_bits: usize) -> Result<Self> {
        if state_bits == 0 {
            return Err(ReachabilityError::NoStateBits);
        }

        let mut states = Vec::with_capacity(state_bits);
        let mut next_states = Vec::with_capacity(state_bits);
        for k in 0..state_bits {
            states.push(bdd.create_var(&format!("s{}", k)));
            next_states.push(bdd.create_var(&format!("s{}'", k)));
        }
        let inputs = (0..input_bits)
            .map(|k| bdd.create_var(&format!("i{}", k)))
            .collect();

        let mut fsm = Self {
            bdd,
            transitions: states.clone(),
            init_state: vec![false; state_bits],
            states,
            next_states,
            inputs,
            tau: BddId::TRUE,
            cs0: BddId::TRUE,
        };
        fsm.tau = fsm.transition_relation();
        fsm.cs0 = fsm.characteristic(&fsm.init_state);
        Ok(fsm)
    }

    pub fn manager(&self) -> &Manager {
        &self.bdd
    }

    /// Current-state variables `s0..`.
    pub fn states(&self) -> &[BddId] {
        &self.states
    }

    /// Next-state variables `s0'..`.
    pub fn next_states(&self) -> &[BddId] {
        &self.next_states
    }

    pub fn inputs(&self) -> &[BddId] {
        &self.inputs
    }

    pub fn transition_functions(&self) -> &[BddId] {
        &self.transitions
    }

    pub fn init_state(&self) -> &[bool] {
        &self.init_state
    }

    /// Replace the next-state function of every state bit.
    ///
    /// `functions[k]` is a function of the current state and the inputs giving
    /// the value of bit `k` after one step.
    pub fn set_transition_functions(&mut self, functions: &[BddId]) -> Result<()> {
        if functions.len() != self.states.len() {
            return Err(ReachabilityError::TransitionCount {
                expected: self.states.len(),
                got: functions.len(),
            });
        }
        if let Some(&f) = functions.iter().find(|f| f.index() >= self.bdd.unique_table_size()) {
            return Err(ReachabilityError::UnknownId(f));
        }

        self.transitions = functions.to_vec();
        self.tau = self.transition_relation();
        debug!("transition relation: {}", self.tau);
        Ok(())
    }

    pub fn set_init_state(&mut self, state: &[bool]) -> Result<()> {
        self.check_state_vector(state)?;
        self.init_state = state.to_vec();
        self.cs0 = self.characteristic(state);
        debug!("initial state: {}", self.cs0);
        Ok(())
    }

    /// Check whether `state` can be reached from the initial state.
    pub fn is_reachable(&self, state: &[bool]) -> Result<bool> {
        self.check_state_vector(state)?;
        let cr = self.reachable_states();
        Ok(self.contains(cr, state))
    }

    /// Length of a shortest path from the initial state to `state`.
    ///
    /// Returns `None` when `state` is unreachable.
    pub fn state_distance(&self, state: &[bool]) -> Result<Option<usize>> {
        self.check_state_vector(state)?;

        let mut cr = self.cs0;
        let mut distance = 0;
        loop {
            if self.contains(cr, state) {
                return Ok(Some(distance));
            }
            let next = self.bdd.or2(cr, self.image(cr));
            if next == cr {
                return Ok(None);
            }
            cr = next;
            distance += 1;
            debug!("distance {}: cr = {}", distance, cr);
        }
    }

    /// Characteristic function of every reachable state, over the current-state variables.
    pub fn reachable_states(&self) -> BddId {
        let mut cr = self.cs0;
        loop {
            let next = self.bdd.or2(cr, self.image(cr));
            debug!("cr = {}, next = {}", cr, next);
            if next == cr {
                return cr;
            }
            cr = next;
        }
    }

    /// Number of reachable states.
    pub fn reachable_state_count(&self) -> BigUint {
        let cr = self.reachable_states();
        self.bdd.sat_count_over(cr, &self.states)
    }

    /// Log the unique table of the underlying manager.
    pub fn dump(&self) {
        self.bdd.dump();
    }
}

impl Reachability {
    fn check_state_vector(&self, state: &[bool]) -> Result<()> {
        if state.len() != self.states.len() {
            return Err(ReachabilityError::StateVectorSize {
                expected: self.states.len(),
                got: state.len(),
            });
        }
        Ok(())
    }

    /// `∧_k (s'_k ⇔ δ_k)`
    fn transition_relation(&self) -> BddId {
        let bdd = &self.bdd;
        bdd.and_many(
            self.next_states
                .iter()
                .zip(self.transitions.iter())
                .map(|(&next, &delta)| bdd.xnor2(next, delta)),
        )
    }

    /// Cube of the current-state variables matching `state`.
    fn characteristic(&self, state: &[bool]) -> BddId {
        let bdd = &self.bdd;
        bdd.and_many(
            self.states
                .iter()
                .zip(state.iter())
                .map(|(&s, &value)| bdd.xnor2(s, BddId::from(value))),
        )
    }

    /// States reachable from `cr` in exactly one step, over the current-state variables.
    fn image(&self, cr: BddId) -> BddId {
        let bdd = &self.bdd;

        // Successors, expressed over s'.
        let step = bdd.and2(cr, self.tau);
        let quantified: Vec<BddId> = self.states.iter().chain(self.inputs.iter()).copied().collect();
        let img_next = bdd.exists(step, &quantified);

        // Rename s' back to s.
        let rename = bdd.and_many(
            self.states
                .iter()
                .zip(self.next_states.iter())
                .map(|(&s, &next)| bdd.xnor2(s, next)),
        );
        let img = bdd.and2(rename, img_next);
        bdd.exists(img, &self.next_states)
    }

    fn contains(&self, cr: BddId, state: &[bool]) -> bool {
        self.bdd.restrict(cr, &self.states, state) == BddId::TRUE
    }
}
