//! C++ module wrapper generator.
//!
//! This crate turns the flat stream of declarations a semantic front end
//! reports for a header into a module interface unit that re-exports them
//! under their original namespaces, plus an optional companion header for
//! declarations with internal linkage.
//!
//! # Example
//!
//! ```
//! use cmg_generator::{DeclKind, DeclarationRecord, NamespaceNode, SymbolRouter};
//! use cmg_generator::config::InternalLinkageMode;
//! use cmg_generator::router::Route;
//!
//! let router = SymbolRouter::new("", InternalLinkageMode::SkipWithDiagnostic);
//! let mut exported = NamespaceNode::new();
//! if let Route::Export { scope, statement } =
//!     router.route(DeclarationRecord::external("ns::S", DeclKind::Type))
//! {
//!     exported.insert(&scope, statement);
//! }
//! assert_eq!(
//!     exported.serialize(Some("export ")),
//!     "namespace ns {\nexport using ::ns::S;\n} // namespace ns\n"
//! );
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, validation and [`GeneratorConfig`]
//! - [`types`]: Declaration records reported by the front end
//! - [`error`]: Error types and Result alias
//! - [`names`]: Qualified-name splitting
//! - [`namespace`]: Namespace tree with deduplicated statements
//! - [`router`]: Filtering and classification of records
//! - [`wrapper`]: Wrapper state, rendering and atomic artifact output
//! - [`unit`]: Per-translation-unit lifecycle
//! - [`dump`]: Declaration dump loading
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod dump;
pub mod error;
pub mod names;
pub mod namespace;
pub mod router;
pub mod types;
pub mod unit;
pub mod wrapper;

// Re-export commonly used items
pub use config::{GeneratorConfig, InternalLinkageMode};
pub use dump::DeclarationDump;
pub use error::{GeneratorError, Result};
pub use namespace::NamespaceNode;
pub use router::{Diagnostic, DiagnosticSink, SymbolRouter};
pub use types::{DeclKind, DeclarationRecord, Linkage};
pub use unit::{generate_unit, UnitGenerator, UnitOutput};
