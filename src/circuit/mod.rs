//! Gate-level circuits in the ISCAS `.bench` format and their translation to BDDs.
//!
//! ```
//! use vds_bdd::circuit::{bench, CircuitToBdd};
//! use vds_bdd::manager::Manager;
//!
//! let circuit = bench::parse(
//!     "INPUT(a)\n\
//!      INPUT(b)\n\
//!      OUTPUT(y)\n\
//!      y = NAND(a, b)\n",
//! )
//! .unwrap();
//!
//! let bdd = Manager::new();
//! let synth = CircuitToBdd::build(&bdd, &circuit).unwrap();
//! let y = synth.bdd_of("y").unwrap();
//! assert_eq!(y, bdd.nand2(synth.bdd_of("a").unwrap(), synth.bdd_of("b").unwrap()));
//! ```

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

pub mod bench;
pub mod gate;
pub mod report;
pub mod synth;

pub use gate::{Gate, GateKind};
pub use synth::CircuitToBdd;

#[derive(Error, Debug)]
pub enum CircuitError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: unknown gate type '{name}'")]
    UnknownGate { line: usize, name: String },

    #[error("line {line}: {kind} does not accept {got} inputs")]
    Arity { line: usize, kind: GateKind, got: usize },

    #[error("line {line}: signal '{signal}' is defined twice")]
    Duplicate { line: usize, signal: String },

    #[error("gate driving '{0}' has no inputs")]
    NoInputs(String),

    #[error("signal '{0}' is used but never defined")]
    Undefined(String),

    #[error("combinational cycle through signal '{0}'")]
    Cycle(String),

    #[error("output '{0}' cannot be used as a file name")]
    FileName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CircuitError>;

/// A netlist: primary inputs, primary outputs and the gates driving every other signal.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Circuit {
    inputs: Vec<String>,
    outputs: Vec<String>,
    gates: Vec<Gate>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }
    /// All gates, flip-flops included, in definition order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate(&self, output: &str) -> Option<&Gate> {
        self.gates.iter().find(|g| g.output == output)
    }

    pub fn flip_flops(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter().filter(|g| g.kind.is_sequential())
    }

    /// Whether `signal` is driven by a primary input or a gate.
    pub fn is_defined(&self, signal: &str) -> bool {
        self.inputs.iter().any(|s| s == signal) || self.gates.iter().any(|g| g.output == signal)
    }

    pub fn add_input(&mut self, name: impl Into<String>) {
        self.inputs.push(name.into());
    }

    pub fn add_output(&mut self, name: impl Into<String>) {
        self.outputs.push(name.into());
    }

    pub fn add_gate(&mut self, gate: Gate) {
        self.gates.push(gate);
    }

    /// Order the combinational gates so that every gate follows its fan-in.
    ///
    /// Primary inputs and flip-flop outputs are sources. Among gates that are
    /// ready at the same time, definition order is kept.
    pub fn topological_order(&self) -> Result<Vec<&Gate>> {
        let mut sources: HashSet<&str> = self.inputs.iter().map(String::as_str).collect();
        sources.extend(self.flip_flops().map(|g| g.output.as_str()));

        let combinational: Vec<&Gate> = self.gates.iter().filter(|g| !g.kind.is_sequential()).collect();
        let driver: HashMap<&str, usize> = combinational
            .iter()
            .enumerate()
            .map(|(i, g)| (g.output.as_str(), i))
            .collect();

        let mut pending = vec![0usize; combinational.len()];
        let mut fanout: Vec<Vec<usize>> = vec![Vec::new(); combinational.len()];
        for (i, gate) in combinational.iter().enumerate() {
            for input in gate.inputs.iter() {
                if let Some(&j) = driver.get(input.as_str()) {
                    pending[i] += 1;
                    fanout[j].push(i);
                } else if !sources.contains(input.as_str()) {
                    return Err(CircuitError::Undefined(input.clone()));
                }
            }
        }

        for signal in self
            .flip_flops()
            .flat_map(|g| g.inputs.iter())
            .chain(self.outputs.iter())
        {
            if !sources.contains(signal.as_str()) && !driver.contains_key(signal.as_str()) {
                return Err(CircuitError::Undefined(signal.clone()));
            }
        }

        let mut queue: VecDeque<usize> = (0..combinational.len()).filter(|&i| pending[i] == 0).collect();
        let mut order = Vec::with_capacity(combinational.len());
        while let Some(i) = queue.pop_front() {
            order.push(combinational[i]);
            for &j in fanout[i].iter() {
                pending[j] -= 1;
                if pending[j] == 0 {
                    queue.push_back(j);
                }
            }
        }

        if order.len() < combinational.len() {
            let stuck = (0..combinational.len())
                .find(|&i| pending[i] > 0)
                .map(|i| combinational[i].output.clone())
                .unwrap_or_default();
            return Err(CircuitError::Cycle(stuck));
        }

        Ok(order)
    }
}
