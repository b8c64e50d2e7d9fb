//! Symbol routing: decides where each declaration record ends up.
//!
//! Routing never fails. A record is exported, collected for the internal
//! header, skipped with a [`Diagnostic`], or rejected silently because it
//! should never surface (implicit, filtered out, redeclared, unnamed).

use std::fmt;

use crate::config::{GeneratorConfig, InternalLinkageMode};
use crate::names::QualifiedName;
use crate::types::{DeclKind, DeclarationRecord, Linkage};

/// Why a symbol was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Internal linkage while internal symbols are not collected.
    InternalLinkage,

    /// Internal linkage in header mode, but the front end sent no text.
    MissingDeclarationText,
}

/// A skipped symbol, reported once per occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub qualified_name: String,
    pub reason: SkipReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            SkipReason::InternalLinkage => {
                write!(f, "{} has internal linkage. Skipping.", self.qualified_name)
            }
            SkipReason::MissingDeclarationText => write!(
                f,
                "{} has internal linkage but no declaration text. Skipping.",
                self.qualified_name
            ),
        }
    }
}

/// Receiver of skip diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Why a record was dropped without diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Implicit,
    FilteredOut,
    Redeclaration,
    Unnamed,
}

/// Routing decision for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Re-export `statement` from the exported tree at `scope`.
    Export { scope: Vec<String>, statement: String },

    /// Copy `text` into the internal tree at `scope`.
    Internal { scope: Vec<String>, text: String },

    Skipped(Diagnostic),

    Rejected(Rejection),
}

/// Filters and classifies declaration records.
#[derive(Debug, Clone)]
pub struct SymbolRouter {
    filter: String,
    mode: InternalLinkageMode,
}

impl SymbolRouter {
    #[must_use]
    pub fn new(filter: impl Into<String>, mode: InternalLinkageMode) -> Self {
        Self {
            filter: filter.into(),
            mode,
        }
    }

    #[must_use]
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.filter.clone(), config.internal_linkage)
    }

    /// Substring test of the configured filter against a qualified name.
    ///
    /// This is containment, not structural matching: `Foo` also matches
    /// `ns::FooBar::x`. An empty filter matches everything.
    #[must_use]
    pub fn matches_filter(&self, qualified_name: &str) -> bool {
        qualified_name.contains(self.filter.as_str())
    }

    /// Decide where `record` goes.
    #[must_use]
    pub fn route(&self, record: DeclarationRecord) -> Route {
        if record.is_implicit {
            return Route::Rejected(Rejection::Implicit);
        }
        if !self.matches_filter(&record.qualified_name) {
            return Route::Rejected(Rejection::FilteredOut);
        }
        if !record.is_first_declaration {
            return Route::Rejected(Rejection::Redeclaration);
        }

        let name = QualifiedName::parse(&record.qualified_name);
        if name.is_unnamed() {
            return Route::Rejected(Rejection::Unnamed);
        }

        match record.linkage {
            Linkage::External => Route::Export {
                statement: export_statement(record.kind, &name),
                scope: name.scope().to_vec(),
            },
            Linkage::Internal => match (self.mode, record.raw_text) {
                (InternalLinkageMode::EmitAsHeader, Some(text)) => Route::Internal {
                    scope: name.scope().to_vec(),
                    text,
                },
                (InternalLinkageMode::EmitAsHeader, None) => Route::Skipped(Diagnostic {
                    qualified_name: record.qualified_name,
                    reason: SkipReason::MissingDeclarationText,
                }),
                (InternalLinkageMode::SkipWithDiagnostic, _) => Route::Skipped(Diagnostic {
                    qualified_name: record.qualified_name,
                    reason: SkipReason::InternalLinkage,
                }),
            },
        }
    }
}

/// Build the re-export statement for an externally linked entity.
///
/// A using-declaration names every overload sharing the qualified name, so
/// one statement per name covers overload sets too.
fn export_statement(kind: DeclKind, name: &QualifiedName) -> String {
    match kind {
        DeclKind::Type
        | DeclKind::AliasOrTypedef
        | DeclKind::Function
        | DeclKind::Variable
        | DeclKind::TemplateEntity => format!("using {};", name.reference()),
    }
}
