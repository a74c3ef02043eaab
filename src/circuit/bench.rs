//! Parser for the ISCAS `.bench` netlist format.
//!
//! ```text
//! # c17
//! INPUT(1)
//! OUTPUT(22)
//! 10 = NAND(1, 3)
//! ```
//!
//! Everything after `#` is a comment. Keywords and gate names are
//! case-insensitive; signal names are kept verbatim.

use std::collections::HashSet;
use std::path::Path;

use log::debug;

use super::{Circuit, CircuitError, Gate, GateKind, Result};

pub fn parse_file(path: impl AsRef<Path>) -> Result<Circuit> {
    let path = path.as_ref();
    debug!("parsing {}", path.display());
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

pub fn parse(text: &str) -> Result<Circuit> {
    let mut circuit = Circuit::new();
    let mut defined: HashSet<String> = HashSet::new();
    let mut declared_outputs: HashSet<String> = HashSet::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let content = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();
        if content.is_empty() {
            continue;
        }

        if let Some((lhs, rhs)) = content.split_once('=') {
            let output = signal_name(lhs, line)?;
            let (name, args) = call(rhs, line)?;
            let kind = GateKind::from_name(name).ok_or_else(|| CircuitError::UnknownGate {
                line,
                name: name.to_string(),
            })?;
            if !kind.accepts(args.len()) {
                return Err(CircuitError::Arity {
                    line,
                    kind,
                    got: args.len(),
                });
            }
            if !defined.insert(output.to_string()) {
                return Err(CircuitError::Duplicate {
                    line,
                    signal: output.to_string(),
                });
            }
            circuit.add_gate(Gate::new(output, kind, &args));
            continue;
        }

        let (keyword, args) = call(content, line)?;
        let [arg] = args.as_slice() else {
            return Err(syntax(line, format!("{} takes exactly one signal", keyword)));
        };
        let name = signal_name(arg, line)?;
        if keyword.eq_ignore_ascii_case("INPUT") {
            if !defined.insert(name.to_string()) {
                return Err(CircuitError::Duplicate {
                    line,
                    signal: name.to_string(),
                });
            }
            circuit.add_input(name);
        } else if keyword.eq_ignore_ascii_case("OUTPUT") {
            if !declared_outputs.insert(name.to_string()) {
                return Err(CircuitError::Duplicate {
                    line,
                    signal: name.to_string(),
                });
            }
            circuit.add_output(name);
        } else {
            return Err(syntax(line, format!("expected INPUT, OUTPUT or an assignment, found '{}'", content)));
        }
    }

    debug!(
        "parsed {} inputs, {} outputs, {} gates",
        circuit.inputs().len(),
        circuit.outputs().len(),
        circuit.gates().len()
    );
    Ok(circuit)
}

fn syntax(line: usize, message: String) -> CircuitError {
    CircuitError::Syntax { line, message }
}

fn signal_name(s: &str, line: usize) -> Result<&str> {
    let name = s.trim();
    if name.is_empty() {
        return Err(syntax(line, "empty signal name".to_string()));
    }
    if name.contains(|c: char| c.is_whitespace() || "(),=/\\".contains(c)) || name == "." || name == ".." {
        return Err(syntax(line, format!("invalid signal name '{}'", name)));
    }
    Ok(name)
}

/// Split `NAME(a, b, ...)` into the name and its arguments.
fn call(s: &str, line: usize) -> Result<(&str, Vec<&str>)> {
    let s = s.trim();
    let open = s
        .find('(')
        .ok_or_else(|| syntax(line, format!("expected '(' in '{}'", s)))?;
    let inner = s[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| syntax(line, format!("expected ')' at the end of '{}'", s)))?;

    let name = s[..open].trim();
    if name.is_empty() {
        return Err(syntax(line, format!("missing name before '(' in '{}'", s)));
    }

    let args = if inner.trim().is_empty() {
        Vec::new()
    } else {
        inner
            .split(',')
            .map(|arg| signal_name(arg, line))
            .collect::<Result<Vec<_>>>()?
    };
    Ok((name, args))
}
