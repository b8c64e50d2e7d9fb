//! Core data types for declarations reported by the semantic front end.

use serde::{Deserialize, Serialize};

/// Category of a reported declaration.
///
/// The set is closed: every consumer matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    /// Class, struct, union or enum.
    Type,

    /// `typedef` or alias declaration.
    AliasOrTypedef,

    /// Free function.
    Function,

    /// Namespace-scope variable.
    Variable,

    /// Class, function, variable or alias template.
    TemplateEntity,
}

impl DeclKind {
    /// Get the string value used in dumps and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::AliasOrTypedef => "alias_or_typedef",
            Self::Function => "function",
            Self::Variable => "variable",
            Self::TemplateEntity => "template_entity",
        }
    }
}

/// Linkage of a reported declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Linkage {
    /// Visible outside its translation unit; can be re-exported by name.
    External,

    /// Restricted to its translation unit.
    Internal,
}

fn default_true() -> bool {
    true
}

/// One declaration visited by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationRecord {
    /// Fully qualified name, e.g. `ns::detail::helper`.
    pub qualified_name: String,

    pub kind: DeclKind,

    pub linkage: Linkage,

    /// False for redeclarations of an entity already reported.
    #[serde(default = "default_true")]
    pub is_first_declaration: bool,

    /// True for compiler-synthesized entities.
    #[serde(default)]
    pub is_implicit: bool,

    /// Full declaration text; only consumed for internal linkage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl DeclarationRecord {
    /// Create a first, explicit declaration with external linkage.
    #[must_use]
    pub fn external(qualified_name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
            linkage: Linkage::External,
            is_first_declaration: true,
            is_implicit: false,
            raw_text: None,
        }
    }

    /// Create a first, explicit declaration with internal linkage.
    #[must_use]
    pub fn internal(
        qualified_name: impl Into<String>,
        kind: DeclKind,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
            linkage: Linkage::Internal,
            is_first_declaration: true,
            is_implicit: false,
            raw_text: Some(raw_text.into()),
        }
    }

    /// Mark this record as a redeclaration.
    #[must_use]
    pub fn redeclaration(mut self) -> Self {
        self.is_first_declaration = false;
        self
    }

    /// Mark this record as compiler-synthesized.
    #[must_use]
    pub fn implicit(mut self) -> Self {
        self.is_implicit = true;
        self
    }
}
