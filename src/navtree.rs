//! Navigation-tree data of a generated documentation site.
//!
//! Doxygen emits a `navtreedata.js` script describing the sidebar of the HTML
//! documentation:
//!
//! ```text
//! var NAVTREE =
//! [
//!   [ "My Project", "index.html", [
//!     [ "README", "md_README.html", null ],
//!     [ "Class List", "annotated.html", "annotated_dup" ]
//!   ] ]
//! ];
//!
//! var NAVTREEINDEX =
//! [
//! "ManagerInterface_8h_source.html"
//! ];
//!
//! var SYNCONMSG = 'click to disable panel synchronisation';
//! var SYNCOFFMSG = 'click to enable panel synchronisation';
//! ```
//!
//! Every entry is `[title, link, children]`, where `children` is `null`, a
//! nested list, or the name of a separately loaded script holding the list.
//!
//! # Examples
//!
//! ```
//! use vds_bdd::navtree::{Children, NavNode, NavTreeData};
//!
//! let data = NavTreeData::new(
//!     vec![NavNode::nested("My Project", "index.html", vec![
//!         NavNode::leaf("README", "md_README.html"),
//!         NavNode::deferred("Class List", "annotated.html", "annotated_dup"),
//!     ])],
//!     vec!["index.html".to_string()],
//! );
//!
//! let script = data.render();
//! assert_eq!(NavTreeData::parse(&script).unwrap(), data);
//! assert!(data.validate().is_empty());
//! ```

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::path::Path;

use log::debug;
use serde_json::Value;
use thiserror::Error;

pub const NAVTREE: &str = "NAVTREE";
pub const NAVTREEINDEX: &str = "NAVTREEINDEX";
pub const SYNCONMSG: &str = "SYNCONMSG";
pub const SYNCOFFMSG: &str = "SYNCOFFMSG";

pub const DEFAULT_SYNC_ON_MSG: &str = "click to disable panel synchronisation";
pub const DEFAULT_SYNC_OFF_MSG: &str = "click to enable panel synchronisation";

#[derive(Error, Debug)]
pub enum NavError {
    #[error("offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("global '{0}' is not defined")]
    MissingGlobal(&'static str),

    #[error("global '{0}' is defined twice")]
    DuplicateGlobal(String),

    #[error("{path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: {message}")]
    Shape { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NavError>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Children {
    None,
    Nested(Vec<NavNode>),
    /// Name of the script that provides the child list.
    Deferred(String),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NavNode {
    pub title: String,
    pub link: String,
    pub children: Children,
}

impl NavNode {
    pub fn leaf(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            children: Children::None,
        }
    }

    pub fn nested(title: impl Into<String>, link: impl Into<String>, children: Vec<NavNode>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            children: Children::Nested(children),
        }
    }

    pub fn deferred(title: impl Into<String>, link: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            children: Children::Deferred(script.into()),
        }
    }

    /// Inline children, empty for leaves and deferred lists.
    pub fn children(&self) -> &[NavNode] {
        match &self.children {
            Children::Nested(children) => children,
            _ => &[],
        }
    }

    /// Pre-order traversal of this node and its inline descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

/// Depth-first, pre-order iterator over `(depth, node)`.
pub struct Walk<'a> {
    stack: Vec<(usize, &'a NavNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a NavNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

/// The four globals of a `navtreedata.js` script.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NavTreeData {
    pub tree: Vec<NavNode>,
    pub index: Vec<String>,
    pub sync_on_msg: String,
    pub sync_off_msg: String,
}

impl NavTreeData {
    /// Tree and index with the stock synchronisation messages.
    pub fn new(tree: Vec<NavNode>, index: Vec<String>) -> Self {
        Self {
            tree,
            index,
            sync_on_msg: DEFAULT_SYNC_ON_MSG.to_string(),
            sync_off_msg: DEFAULT_SYNC_OFF_MSG.to_string(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::parse(&src)
    }

    /// Read the globals of a navigation script. Comments are skipped.
    pub fn parse(src: &str) -> Result<Self> {
        let globals = globals(src)?;
        debug!(
            "navtree globals: {:?}",
            globals.iter().map(|(name, _)| *name).collect::<Vec<_>>()
        );
        let get = |name: &'static str| {
            globals
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, value)| *value)
                .ok_or(NavError::MissingGlobal(name))
        };

        let tree = match json(NAVTREE, get(NAVTREE)?)? {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| node(item, &format!("{}[{}]", NAVTREE, i)))
                .collect::<Result<Vec<_>>>()?,
            _ => return Err(shape(NAVTREE, "expected an array")),
        };

        let index = match json(NAVTREEINDEX, get(NAVTREEINDEX)?)? {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| shape(&format!("{}[{}]", NAVTREEINDEX, i), "expected a string"))
                })
                .collect::<Result<Vec<_>>>()?,
            _ => return Err(shape(NAVTREEINDEX, "expected an array")),
        };

        Ok(Self {
            tree,
            index,
            sync_on_msg: unquote(SYNCONMSG, get(SYNCONMSG)?)?,
            sync_off_msg: unquote(SYNCOFFMSG, get(SYNCOFFMSG)?)?,
        })
    }

    /// Emit the script in the layout Doxygen uses.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("var NAVTREE =\n[\n");
        let nodes: Vec<String> = self.tree.iter().map(|n| render_node(n, 1)).collect();
        out.push_str(&nodes.join(",\n"));
        out.push_str("\n];\n\n");

        out.push_str("var NAVTREEINDEX =\n[\n");
        let entries: Vec<String> = self.index.iter().map(|s| double_quoted(s)).collect();
        out.push_str(&entries.join(",\n"));
        out.push_str("\n];\n\n");

        out.push_str(&format!("var SYNCONMSG = {};\n", single_quoted(&self.sync_on_msg)));
        out.push_str(&format!("var SYNCOFFMSG = {};\n", single_quoted(&self.sync_off_msg)));
        out
    }

    /// Schema lint of the tree and the index.
    pub fn validate(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        validate_level(&self.tree, NAVTREE, &mut issues);
        for (i, entry) in self.index.iter().enumerate() {
            if entry.trim().is_empty() {
                issues.push(Issue {
                    path: format!("{}[{}]", NAVTREEINDEX, i),
                    kind: IssueKind::EmptyIndexEntry,
                });
            }
        }
        issues
    }

    /// Pre-order traversal of every inline node, with its depth.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.tree.iter().rev().map(|n| (0, n)).collect(),
        }
    }

    /// Names of the scripts that deferred child lists refer to.
    pub fn deferred_scripts(&self) -> Vec<&str> {
        self.walk()
            .filter_map(|(_, node)| match &node.children {
                Children::Deferred(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum IssueKind {
    EmptyTitle,
    EmptyLink,
    EmptyDeferredName,
    DuplicateTitle(String),
    EmptyIndexEntry,
}

/// A schema violation, located by its path in the script (`NAVTREE[0][2][1]`).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Issue {
    pub path: String,
    pub kind: IssueKind,
}

impl Display for Issue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            IssueKind::EmptyTitle => write!(f, "{}: empty title", self.path),
            IssueKind::EmptyLink => write!(f, "{}: empty link", self.path),
            IssueKind::EmptyDeferredName => write!(f, "{}: empty deferred script name", self.path),
            IssueKind::DuplicateTitle(title) => write!(f, "{}: duplicate title {:?}", self.path, title),
            IssueKind::EmptyIndexEntry => write!(f, "{}: empty index entry", self.path),
        }
    }
}

fn validate_level(nodes: &[NavNode], path: &str, issues: &mut Vec<Issue>) {
    let mut seen = HashSet::new();
    for (i, node) in nodes.iter().enumerate() {
        let path = format!("{}[{}]", path, i);
        let mut report = |kind| {
            issues.push(Issue {
                path: path.clone(),
                kind,
            })
        };

        if node.title.trim().is_empty() {
            report(IssueKind::EmptyTitle);
        } else if !seen.insert(node.title.as_str()) {
            report(IssueKind::DuplicateTitle(node.title.clone()));
        }
        if node.link.trim().is_empty() {
            report(IssueKind::EmptyLink);
        }
        match &node.children {
            Children::Deferred(name) if name.trim().is_empty() => report(IssueKind::EmptyDeferredName),
            Children::Nested(children) => validate_level(children, &format!("{}[2]", path), issues),
            _ => {}
        }
    }
}

fn shape(path: &str, message: &str) -> NavError {
    NavError::Shape {
        path: path.to_string(),
        message: message.to_string(),
    }
}

fn json(path: &str, src: &str) -> Result<Value> {
    serde_json::from_str(src).map_err(|source| NavError::Json {
        path: path.to_string(),
        source,
    })
}

fn node(value: &Value, path: &str) -> Result<NavNode> {
    let Value::Array(items) = value else {
        return Err(shape(path, "expected [title, link, children]"));
    };
    let [title, link, children] = items.as_slice() else {
        return Err(shape(path, &format!("expected 3 elements, found {}", items.len())));
    };

    let title = title.as_str().ok_or_else(|| shape(path, "title is not a string"))?;
    let link = link.as_str().ok_or_else(|| shape(path, "link is not a string"))?;
    let children = match children {
        Value::Null => Children::None,
        Value::String(name) => Children::Deferred(name.clone()),
        Value::Array(items) => Children::Nested(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| node(item, &format!("{}[2][{}]", path, i)))
                .collect::<Result<Vec<_>>>()?,
        ),
        _ => return Err(shape(path, "children must be null, a list or a script name")),
    };

    Ok(NavNode {
        title: title.to_string(),
        link: link.to_string(),
        children,
    })
}

fn render_node(node: &NavNode, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let head = format!(
        "{}[ {}, {}, ",
        indent,
        double_quoted(&node.title),
        double_quoted(&node.link)
    );
    match &node.children {
        Children::None => format!("{}null ]", head),
        Children::Deferred(name) => format!("{}{} ]", head, double_quoted(name)),
        Children::Nested(children) if children.is_empty() => format!("{}[] ]", head),
        Children::Nested(children) => {
            let inner: Vec<String> = children.iter().map(|c| render_node(c, depth + 1)).collect();
            format!("{}[\n{}\n{}] ]", head, inner.join(",\n"), indent)
        }
    }
}

fn double_quoted(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn single_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Decode a JavaScript string literal in either quote style.
fn unquote(path: &str, literal: &str) -> Result<String> {
    if literal.starts_with('"') {
        return serde_json::from_str(literal).map_err(|source| NavError::Json {
            path: path.to_string(),
            source,
        });
    }
    let inner = literal
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .ok_or_else(|| shape(path, "expected a string literal"))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => return Err(shape(path, "dangling escape")),
        }
    }
    Ok(out)
}

/// Collect the `var NAME = value;` statements of a script.
fn globals(src: &str) -> Result<Vec<(&str, &str)>> {
    let mut scanner = Scanner { src, pos: 0 };
    let mut globals: Vec<(&str, &str)> = Vec::new();

    loop {
        scanner.skip_trivia()?;
        if scanner.at_end() {
            break;
        }

        let keyword = scanner.ident();
        if keyword != "var" {
            return Err(scanner.error(format!("expected 'var', found {:?}", scanner.peek_word())));
        }
        scanner.skip_trivia()?;
        let name = scanner.ident();
        if name.is_empty() {
            return Err(scanner.error("expected a global name".to_string()));
        }
        scanner.skip_trivia()?;
        if !scanner.eat('=') {
            return Err(scanner.error(format!("expected '=' after '{}'", name)));
        }
        let value = scanner.value()?;

        if globals.iter().any(|(n, _)| *n == name) {
            return Err(NavError::DuplicateGlobal(name.to_string()));
        }
        globals.push((name, value));
    }

    Ok(globals)
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn error(&self, message: String) -> NavError {
        NavError::Syntax {
            offset: self.pos,
            message,
        }
    }

    fn peek_word(&self) -> &'a str {
        self.rest().split_whitespace().next().unwrap_or("")
    }

    fn eat(&mut self, c: char) -> bool {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if let Some(body) = trimmed.strip_prefix("/*") {
                let end = body
                    .find("*/")
                    .ok_or_else(|| self.error("unterminated comment".to_string()))?;
                self.pos += 2 + end + 2;
            } else if trimmed.starts_with("//") {
                self.pos += trimmed.find('\n').map_or(trimmed.len(), |end| end + 1);
            } else {
                return Ok(());
            }
        }
    }

    fn ident(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Text up to the `;` that ends the statement, skipping string literals.
    fn value(&mut self) -> Result<&'a str> {
        let rest = self.rest();
        let mut quote: Option<char> = None;
        let mut escaped = false;
        let mut depth = 0i32;

        for (i, c) in rest.char_indices() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some(c),
                '[' | '{' | '(' => depth += 1,
                ']' | '}' | ')' => depth -= 1,
                ';' if depth == 0 => {
                    self.pos += i + 1;
                    return Ok(rest[..i].trim());
                }
                _ => {}
            }
        }

        if quote.is_none() && depth == 0 {
            // Last statement without a semicolon.
            self.pos = self.src.len();
            return Ok(rest.trim());
        }
        Err(self.error("unterminated value".to_string()))
    }
}
