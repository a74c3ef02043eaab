use std::collections::HashMap;

use log::debug;

use super::{Circuit, CircuitError, Gate, GateKind, Result};
use crate::manager::Manager;
use crate::reference::BddId;

/// Translates a [`Circuit`] into BDDs, one per signal.
///
/// Primary inputs and flip-flop outputs become fresh variables, created in
/// that order; the variable order is therefore the declaration order of the
/// netlist.
pub struct CircuitToBdd<'a> {
    bdd: &'a Manager,
    signals: HashMap<String, BddId>,
    /// Signals in the order their BDDs were built.
    order: Vec<String>,
}

impl<'a> CircuitToBdd<'a> {
    pub fn new(bdd: &'a Manager) -> Self {
        Self {
            bdd,
            signals: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn build(bdd: &'a Manager, circuit: &Circuit) -> Result<Self> {
        let mut synth = Self::new(bdd);
        synth.generate(circuit)?;
        Ok(synth)
    }

    pub fn manager(&self) -> &'a Manager {
        self.bdd
    }

    /// Build the BDD of every signal of `circuit`.
    pub fn generate(&mut self, circuit: &Circuit) -> Result<()> {
        let order = circuit.topological_order()?;

        for input in circuit.inputs() {
            let var = self.bdd.create_var(input);
            self.define(input, var);
        }
        for ff in circuit.flip_flops() {
            let var = self.bdd.create_var(&ff.output);
            self.define(&ff.output, var);
        }
        for gate in order {
            let f = self.gate(gate)?;
            debug!("{} -> {}", gate, f);
            self.define(&gate.output, f);
        }
        Ok(())
    }

    pub fn bdd_of(&self, signal: &str) -> Option<BddId> {
        self.signals.get(signal).copied()
    }

    /// Every translated signal with its BDD, in build order.
    pub fn signals(&self) -> impl Iterator<Item = (&str, BddId)> + '_ {
        self.order.iter().map(|s| (s.as_str(), self.signals[s]))
    }

    fn define(&mut self, signal: &str, f: BddId) {
        if self.signals.insert(signal.to_string(), f).is_none() {
            self.order.push(signal.to_string());
        }
    }

    fn operand(&self, signal: &str) -> Result<BddId> {
        self.bdd_of(signal)
            .ok_or_else(|| CircuitError::Undefined(signal.to_string()))
    }

    fn gate(&self, gate: &Gate) -> Result<BddId> {
        let operands = gate
            .inputs
            .iter()
            .map(|s| self.operand(s))
            .collect::<Result<Vec<_>>>()?;
        let bdd = self.bdd;

        let (&first, rest) = operands
            .split_first()
            .ok_or_else(|| CircuitError::NoInputs(gate.output.clone()))?;
        let rest = rest.iter().copied();

        let f = match gate.kind {
            GateKind::And => rest.fold(first, |acc, f| bdd.and2(acc, f)),
            GateKind::Or => rest.fold(first, |acc, f| bdd.or2(acc, f)),
            GateKind::Xor => rest.fold(first, |acc, f| bdd.xor2(acc, f)),
            GateKind::Nand => bdd.nand2(first, bdd.and_many(rest)),
            GateKind::Nor => bdd.nor2(first, bdd.or_many(rest)),
            GateKind::Xnor => bdd.xnor2(first, bdd.xor_many(rest)),
            GateKind::Not => bdd.neg(first),
            GateKind::Buff => first,
            GateKind::Dff => unreachable!("flip-flops are translated as variables"),
        };
        Ok(f)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::circuit::bench;

    #[test]
    fn test_c17() {
        let circuit = bench::parse(
            "INPUT(1)\nINPUT(2)\nINPUT(3)\nINPUT(6)\nINPUT(7)\nOUTPUT(22)\nOUTPUT(23)\n\
             10 = NAND(1, 3)\n11 = NAND(3, 6)\n16 = NAND(2, 11)\n\
             19 = NAND(11, 7)\n22 = NAND(10, 16)\n23 = NAND(16, 19)\n",
        )
        .unwrap();

        let bdd = Manager::new();
        let synth = CircuitToBdd::build(&bdd, &circuit).unwrap();

        let inputs: Vec<BddId> = ["1", "2", "3", "6", "7"]
            .iter()
            .map(|s| synth.bdd_of(s).unwrap())
            .collect();
        assert_eq!(inputs, (2..7).map(BddId::new).collect::<Vec<_>>());

        let out22 = synth.bdd_of("22").unwrap();
        let out23 = synth.bdd_of("23").unwrap();
        for bits in 0u32..32 {
            let v = |k: usize| bits & (1 << k) != 0;
            let (x1, x2, x3, x6, x7) = (v(0), v(1), v(2), v(3), v(4));
            let n10 = !(x1 && x3);
            let n11 = !(x3 && x6);
            let n16 = !(x2 && n11);
            let n19 = !(n11 && x7);
            let expect22 = !(n10 && n16);
            let expect23 = !(n16 && n19);

            let value = |var: BddId| v(inputs.iter().position(|&x| x == var).unwrap());
            assert_eq!(bdd.eval(out22, value), expect22, "22 at {:05b}", bits);
            assert_eq!(bdd.eval(out23, value), expect23, "23 at {:05b}", bits);
        }

        let order: Vec<&str> = synth.signals().map(|(s, _)| s).collect();
        assert_eq!(order, vec!["1", "2", "3", "6", "7", "10", "11", "16", "19", "22", "23"]);
    }

    #[test]
    fn test_nary_gates() {
        let circuit = bench::parse(
            "INPUT(a)\nINPUT(b)\nINPUT(c)\n\
             and = AND(a, b, c)\nor = OR(a, b, c)\nxor = XOR(a, b, c)\n\
             nand = NAND(a, b, c)\nnor = NOR(a, b, c)\nxnor = XNOR(a, b, c)\n\
             not = NOT(a)\nbuf = BUF(b)\n",
        )
        .unwrap();

        let bdd = Manager::new();
        let synth = CircuitToBdd::build(&bdd, &circuit).unwrap();
        let f = |s: &str| synth.bdd_of(s).unwrap();
        let (a, b, c) = (f("a"), f("b"), f("c"));

        assert_eq!(f("and"), bdd.and_many([a, b, c]));
        assert_eq!(f("or"), bdd.or_many([a, b, c]));
        assert_eq!(f("xor"), bdd.xor_many([a, b, c]));
        assert_eq!(f("nand"), bdd.neg(f("and")));
        assert_eq!(f("nor"), bdd.neg(f("or")));
        assert_eq!(f("xnor"), bdd.neg(f("xor")));
        assert_eq!(f("not"), bdd.neg(a));
        assert_eq!(f("buf"), b);
    }

    #[test]
    fn test_flip_flop_outputs_are_variables() {
        let circuit = bench::parse("INPUT(en)\nOUTPUT(d)\nq = DFF(d)\nd = XOR(q, en)\n").unwrap();

        let bdd = Manager::new();
        let synth = CircuitToBdd::build(&bdd, &circuit).unwrap();
        let en = synth.bdd_of("en").unwrap();
        let q = synth.bdd_of("q").unwrap();

        assert!(bdd.is_variable(q));
        assert_eq!(bdd.label(q), "q");
        assert!(en < q);
        assert_eq!(synth.bdd_of("d"), Some(bdd.xor2(q, en)));
    }
}
