//! Result files of a circuit translation.
//!
//! ```text
//! <dir>/BNode_BDD.csv      BDD id of every signal
//! <dir>/txt/<output>.txt   node listing per primary output
//! <dir>/dot/<output>.dot   Graphviz rendering per primary output
//! ```

use std::fmt::Write as _;
use std::path::Path;

use log::info;

use super::{Circuit, CircuitError, CircuitToBdd, Result};

pub const SIGNALS_FILE: &str = "BNode_BDD.csv";

/// Write the signal table and the per-output dumps under `dir`.
pub fn write(dir: impl AsRef<Path>, circuit: &Circuit, synth: &CircuitToBdd<'_>) -> Result<()> {
    let dir = dir.as_ref();
    let bdd = synth.manager();
    for output in circuit.outputs() {
        check_file_stem(output)?;
    }
    std::fs::create_dir_all(dir)?;

    let mut csv = String::from("BDD_ID,Bench Label\n");
    for (signal, f) in synth.signals() {
        writeln!(csv, "{},{}", f.get(), signal).map_err(std::io::Error::other)?;
    }
    std::fs::write(dir.join(SIGNALS_FILE), csv)?;

    for output in circuit.outputs() {
        let f = synth
            .bdd_of(output)
            .ok_or_else(|| CircuitError::Undefined(output.clone()))?;

        let txt = dir.join("txt").join(format!("{}.txt", output));
        std::fs::create_dir_all(dir.join("txt"))?;
        std::fs::write(&txt, bdd.to_text(f))?;

        let dot = dir.join("dot").join(format!("{}.dot", output));
        bdd.write_dot(&dot, f)?;

        info!("output {}: {} nodes", output, bdd.size(f));
    }
    Ok(())
}

/// Outputs name files under `txt/` and `dot/`, so they must stay a single path component.
fn check_file_stem(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c: char| c == '/' || c == '\\' || c == '\0');
    if bad {
        return Err(CircuitError::FileName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::circuit::bench;
    use crate::manager::Manager;

    #[test]
    fn test_write_report() {
        let circuit = bench::parse("INPUT(a)\nINPUT(b)\nOUTPUT(y)\nOUTPUT(n)\ny = AND(a, b)\nn = NOT(y)\n").unwrap();
        let bdd = Manager::new();
        let synth = CircuitToBdd::build(&bdd, &circuit).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results_and");
        write(&out, &circuit, &synth).unwrap();

        let csv = std::fs::read_to_string(out.join(SIGNALS_FILE)).unwrap();
        let y = synth.bdd_of("y").unwrap();
        let n = synth.bdd_of("n").unwrap();
        assert_eq!(
            csv,
            format!("BDD_ID,Bench Label\n2,a\n3,b\n{},y\n{},n\n", y.get(), n.get())
        );

        let txt = std::fs::read_to_string(out.join("txt").join("y.txt")).unwrap();
        assert_eq!(txt, bdd.to_text(y));
        let dot = std::fs::read_to_string(out.join("dot").join("n.dot")).unwrap();
        assert!(dot.starts_with("digraph BDD {"));
    }

    #[test]
    fn test_output_names_stay_inside_dir() {
        use crate::circuit::{Gate, GateKind};

        let mut circuit = Circuit::new();
        circuit.add_input("a");
        circuit.add_output("../../escaped");
        circuit.add_gate(Gate::new("../../escaped", GateKind::Not, &["a"]));

        let bdd = Manager::new();
        let synth = CircuitToBdd::build(&bdd, &circuit).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("results");
        let err = write(&out, &circuit, &synth).unwrap_err();
        assert!(matches!(err, CircuitError::FileName(ref name) if name == "../../escaped"));
        assert!(!out.exists());
        assert!(!dir.path().join("a").join("escaped.txt").exists());
        assert!(!dir.path().join("escaped.txt").exists());
    }
}
