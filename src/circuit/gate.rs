use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GateKind {
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
    Not,
    Buff,
    Dff,
}

impl GateKind {
    /// Look up a gate type by its bench name, ignoring case.
    pub fn from_name(name: &str) -> Option<GateKind> {
        let kind = match name.to_ascii_uppercase().as_str() {
            "AND" => GateKind::And,
            "OR" => GateKind::Or,
            "NAND" => GateKind::Nand,
            "NOR" => GateKind::Nor,
            "XOR" => GateKind::Xor,
            "XNOR" => GateKind::Xnor,
            "NOT" => GateKind::Not,
            "BUFF" | "BUF" => GateKind::Buff,
            "DFF" => GateKind::Dff,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Nand => "NAND",
            GateKind::Nor => "NOR",
            GateKind::Xor => "XOR",
            GateKind::Xnor => "XNOR",
            GateKind::Not => "NOT",
            GateKind::Buff => "BUFF",
            GateKind::Dff => "DFF",
        }
    }

    /// Whether the gate takes exactly one input.
    pub fn is_unary(&self) -> bool {
        matches!(self, GateKind::Not | GateKind::Buff | GateKind::Dff)
    }

    /// Whether the gate holds state between clock cycles.
    pub fn is_sequential(&self) -> bool {
        matches!(self, GateKind::Dff)
    }

    pub fn accepts(&self, num_inputs: usize) -> bool {
        if self.is_unary() {
            num_inputs == 1
        } else {
            num_inputs >= 1
        }
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A gate driving the signal `output`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Gate {
    pub output: String,
    pub kind: GateKind,
    pub inputs: Vec<String>,
}

impl Gate {
    pub fn new(output: impl Into<String>, kind: GateKind, inputs: &[&str]) -> Gate {
        Gate {
            output: output.into(),
            kind,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Display for Gate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}({})", self.output, self.kind, self.inputs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(GateKind::from_name("NAND"), Some(GateKind::Nand));
        assert_eq!(GateKind::from_name("nand"), Some(GateKind::Nand));
        assert_eq!(GateKind::from_name("BUF"), Some(GateKind::Buff));
        assert_eq!(GateKind::from_name("BUFF"), Some(GateKind::Buff));
        assert_eq!(GateKind::from_name("MUX"), None);
    }

    #[test]
    fn test_arity() {
        assert!(GateKind::Not.accepts(1));
        assert!(!GateKind::Not.accepts(2));
        assert!(!GateKind::Dff.accepts(0));
        assert!(GateKind::And.accepts(5));
        assert!(!GateKind::Xor.accepts(0));
    }

    #[test]
    fn test_gate_display() {
        let gate = Gate::new("22", GateKind::Nand, &["10", "16"]);
        assert_eq!(gate.to_string(), "22 = NAND(10, 16)");
        assert_eq!(gate.inputs, vec!["10", "16"]);
    }
}
