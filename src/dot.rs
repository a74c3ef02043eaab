//! Graph export: Graphviz DOT, Mermaid and a plain-text node listing.
//!
//! # DOT Format
//!
//! The generated DOT output follows these conventions:
//! - **Terminal nodes** (`0` and `1`) are boxes sharing one rank with an
//!   invisible anchor `"T"` at the bottom
//! - **Variable labels** are plaintext nodes on the left, one per level, with
//!   every node of that level ranked beside its label
//! - **Edges**:
//!   - Solid lines represent high (then) edges
//!   - Dashed lines represent low (else) edges
//!
//! # Examples
//!
//! ```
//! use vds_bdd::manager::Manager;
//!
//! let bdd = Manager::new();
//! let a = bdd.create_var("A");
//! let b = bdd.create_var("B");
//! let f = bdd.and2(a, b);
//!
//! let dot = bdd.to_dot(f).unwrap();
//! assert!(dot.starts_with("digraph BDD {"));
//! // Render with: dot -Tpng output.dot -o output.png
//! ```

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use crate::manager::Manager;
use crate::reference::BddId;

/// Configuration options for DOT output generation.
///
/// ```
/// use vds_bdd::dot::DotConfig;
/// use vds_bdd::manager::Manager;
///
/// let bdd = Manager::new();
/// let x = bdd.create_var("x");
/// let config = DotConfig {
///     show_variable_labels: false,
///     ..DotConfig::default()
/// };
/// let dot = bdd.to_dot_with_config(x, &config).unwrap();
/// assert!(!dot.contains("plaintext"));
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for terminal nodes (default: "box")
    pub terminal_shape: &'static str,
    /// Style for high (then) edges (default: "solid")
    pub high_edge_style: &'static str,
    /// Style for low (else) edges (default: "dashed")
    pub low_edge_style: &'static str,
    /// Arrow size for all edges (default: ".75")
    pub arrow_size: &'static str,
    /// Font for variable labels (default: "Times Italic")
    pub label_font: &'static str,
    /// Font size for labels and terminals (default: 12)
    pub font_size: u32,
    /// Whether to render the column of variable labels (default: true)
    pub show_variable_labels: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            terminal_shape: "box",
            high_edge_style: "solid",
            low_edge_style: "dashed",
            arrow_size: ".75",
            label_font: "Times Italic",
            font_size: 12,
            show_variable_labels: true,
        }
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

impl Manager {
    /// Converts the diagram rooted at `root` to DOT (Graphviz) format.
    pub fn to_dot(&self, root: BddId) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(root, &DotConfig::default())
    }

    /// Converts the diagram rooted at `root` to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, root: BddId, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut nodes = BTreeSet::new();
        self.find_nodes(root, &mut nodes);
        let mut vars = BTreeSet::new();
        self.find_vars(root, &mut vars);

        let mut dot = String::new();
        writeln!(dot, "digraph BDD {{")?;
        writeln!(dot, "center = true;")?;

        // Terminal nodes (0 and 1)
        writeln!(dot, "{{ rank = same; {{ node [style=invis]; \"T\" }};")?;
        for terminal in [BddId::FALSE, BddId::TRUE] {
            writeln!(
                dot,
                "  {{ node [shape={},fontsize={}]; \"{}\"; }}",
                config.terminal_shape,
                config.font_size,
                terminal.get()
            )?;
        }
        writeln!(dot, "}}")?;

        // One rank per variable, holding every node labelled by it
        for &var in vars.iter() {
            write!(dot, "{{ rank=same;")?;
            if config.show_variable_labels {
                write!(
                    dot,
                    " {{ node [shape=plaintext,fontname=\"{}\",fontsize={}] \"v{}\" [label=\"{}\"] }};",
                    config.label_font,
                    config.font_size,
                    var.get(),
                    escape(&self.label(var))
                )?;
            }
            for &id in nodes.iter().filter(|f| !f.is_constant()) {
                if self.top_var(id) == var {
                    write!(dot, " \"{}\";", id.get())?;
                }
            }
            writeln!(dot, " }}")?;
        }

        // Invisible chain keeping the variable labels in order
        if config.show_variable_labels {
            write!(dot, "edge [style = invis]; {{")?;
            for &var in vars.iter() {
                write!(dot, "\"v{}\" -> ", var.get())?;
            }
            writeln!(dot, "\"T\"; }}")?;
        }

        for &id in nodes.iter().filter(|f| !f.is_constant()) {
            let node = self.node(id);
            writeln!(
                dot,
                "\"{}\" -> \"{}\" [style={},arrowsize=\"{}\"];",
                id.get(),
                node.high.get(),
                config.high_edge_style,
                config.arrow_size
            )?;
            writeln!(
                dot,
                "\"{}\" -> \"{}\" [style={},arrowsize=\"{}\"];",
                id.get(),
                node.low.get(),
                config.low_edge_style,
                config.arrow_size
            )?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }

    /// Converts the diagram rooted at `root` to a Mermaid flowchart.
    pub fn to_mermaid(&self, root: BddId) -> Result<String, std::fmt::Error> {
        let mut nodes = BTreeSet::new();
        self.find_nodes(root, &mut nodes);

        let mut out = String::new();
        writeln!(out, "graph TD")?;
        for &id in nodes.iter() {
            if id.is_constant() {
                writeln!(out, "    n{}[\"{}\"]", id.get(), id.get())?;
            } else {
                let label = self.top_var_name(id).replace('"', "#quot;");
                writeln!(out, "    n{}((\"{}\"))", id.get(), label)?;
            }
        }
        for &id in nodes.iter().filter(|f| !f.is_constant()) {
            let node = self.node(id);
            writeln!(out, "    n{} -->|1| n{}", id.get(), node.high.get())?;
            writeln!(out, "    n{} -.->|0| n{}", id.get(), node.low.get())?;
        }
        Ok(out)
    }

    /// Lists every node reachable from `root`, highest id first.
    pub fn to_text(&self, root: BddId) -> String {
        let mut nodes = BTreeSet::new();
        self.find_nodes(root, &mut nodes);

        let mut out = String::new();
        for &id in nodes.iter().rev() {
            if id.is_constant() {
                out.push_str(&format!("Terminal Node: {}\n", self.label(id)));
            } else {
                let node = self.node(id);
                out.push_str(&format!(
                    "Variable Node: {} Top Var Id: {} Top Var Name: {} Low: {} High: {}\n",
                    id.get(),
                    node.top.get(),
                    self.label(node.top),
                    node.low.get(),
                    node.high.get()
                ));
            }
        }
        out
    }

    /// Write the DOT rendering of `root` to `path`, creating parent directories.
    pub fn write_dot(&self, path: impl AsRef<Path>, root: BddId) -> std::io::Result<()> {
        let dot = self.to_dot(root).map_err(std::io::Error::other)?;
        write_file(path.as_ref(), &dot)
    }

    /// Write the Mermaid rendering of `root` to `path`, creating parent directories.
    pub fn write_mermaid(&self, path: impl AsRef<Path>, root: BddId) -> std::io::Result<()> {
        let mermaid = self.to_mermaid(root).map_err(std::io::Error::other)?;
        write_file(path.as_ref(), &mermaid)
    }
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    log::debug!("writing {}", path.display());
    std::fs::write(path, contents)
}
