//! Per-unit wrapper state: the two namespace trees and their identity.

use std::path::{Path, PathBuf};

use crate::namespace::NamespaceNode;
use crate::router::Route;

use super::writer::{render_header, render_module};

/// Trees collected for one translation unit.
#[derive(Debug, Clone)]
pub struct ModuleWrapper {
    source_file: PathBuf,
    module_name: String,
    exported: NamespaceNode,
    internal: NamespaceNode,
}

impl ModuleWrapper {
    /// `source_file` is expected to be canonical already.
    #[must_use]
    pub fn new(source_file: impl Into<PathBuf>, module_name: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            module_name: module_name.into(),
            exported: NamespaceNode::new(),
            internal: NamespaceNode::new(),
        }
    }

    #[must_use]
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    #[must_use]
    pub fn exported(&self) -> &NamespaceNode {
        &self.exported
    }

    #[must_use]
    pub fn internal(&self) -> &NamespaceNode {
        &self.internal
    }

    /// Insert the statement carried by `route` into its tree.
    ///
    /// Returns `true` if a tree gained a statement. Skipped and rejected
    /// routes touch nothing.
    pub fn apply(&mut self, route: Route) -> bool {
        match route {
            Route::Export { scope, statement } => self.exported.insert(&scope, statement),
            Route::Internal { scope, text } => self.internal.insert(&scope, text),
            Route::Skipped(_) | Route::Rejected(_) => false,
        }
    }

    /// Text of the module interface unit.
    #[must_use]
    pub fn render_module(&self) -> String {
        render_module(&self.source_file, &self.module_name, &self.exported)
    }

    /// Text of the internal-linkage header.
    #[must_use]
    pub fn render_header(&self) -> String {
        render_header(&self.internal)
    }
}
