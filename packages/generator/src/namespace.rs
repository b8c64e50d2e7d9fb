//! Namespace tree holding deduplicated statements per scope.
//!
//! Statements and children are kept in sorted containers, so rendering the
//! same set of inserts always yields byte-identical text, across runs as
//! well as within one.

use std::collections::{BTreeMap, BTreeSet};

/// One scope of the tree. The root node represents global scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceNode {
    statements: BTreeSet<String>,
    children: BTreeMap<String, NamespaceNode>,
}

impl NamespaceNode {
    /// Create an empty node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk from this node along `path`, creating missing nodes.
    pub fn get_or_create<S: AsRef<str>>(&mut self, path: &[S]) -> &mut NamespaceNode {
        path.iter().fold(self, |node, segment| {
            node.children.entry(segment.as_ref().to_string()).or_default()
        })
    }

    /// Add `statement` to the node at `path`.
    ///
    /// Returns `false` if the node already held the same statement.
    pub fn insert<S: AsRef<str>>(&mut self, path: &[S], statement: impl Into<String>) -> bool {
        self.get_or_create(path).statements.insert(statement.into())
    }

    /// Look up the node at `path` without creating anything.
    #[must_use]
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&NamespaceNode> {
        path.iter()
            .try_fold(self, |node, segment| node.children.get(segment.as_ref()))
    }

    /// Statements held directly by this node.
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.statements.iter().map(String::as_str)
    }

    /// Child scopes keyed by their simple name.
    pub fn children(&self) -> impl Iterator<Item = (&str, &NamespaceNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Whether no statement exists anywhere in this subtree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.children.values().all(NamespaceNode::is_empty)
    }

    /// Number of statements in this subtree.
    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.statements.len()
            + self
                .children
                .values()
                .map(NamespaceNode::statement_count)
                .sum::<usize>()
    }

    /// Render this subtree as nested namespace blocks.
    ///
    /// Each statement becomes one line, optionally prefixed with `prefix`.
    /// Statements of a node come before its child blocks.
    #[must_use]
    pub fn serialize(&self, prefix: Option<&str>) -> String {
        let mut out = String::new();
        self.write_into(&mut out, prefix);
        out
    }

    fn write_into(&self, out: &mut String, prefix: Option<&str>) {
        for statement in &self.statements {
            if let Some(prefix) = prefix {
                out.push_str(prefix);
            }
            out.push_str(statement);
            out.push('\n');
        }
        for (name, child) in &self.children {
            out.push_str("namespace ");
            out.push_str(name);
            out.push_str(" {\n");
            child.write_into(out, prefix);
            out.push_str("} // namespace ");
            out.push_str(name);
            out.push('\n');
        }
    }
}
