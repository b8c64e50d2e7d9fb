//! Configuration constants, validation functions and the per-run generator
//! configuration.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{GeneratorError, Result};

/// Separator between scope components in a qualified name.
pub const SCOPE_SEPARATOR: &str = "::";

/// Prefixes the front end uses to spell unnamed entities, e.g.
/// `(anonymous namespace)`, `(anonymous struct at a.h:3:1)` or
/// `(unnamed enum at a.h:9:1)`.
///
/// Contents of these scopes are hoisted to the nearest named ancestor.
pub const ANONYMOUS_SCOPE_PREFIXES: &[&str] = &["(anonymous", "(unnamed"];

/// Prefix placed before every statement of the module body.
pub const EXPORT_PREFIX: &str = "export ";

/// Extension of the generated module interface unit.
pub const MODULE_EXTENSION: &str = "cppm";

/// Extension of the generated internal-linkage header.
///
/// Kept distinct from plain `.h` so generating into the header's own
/// directory never overwrites the header itself.
pub const HEADER_EXTENSION: &str = "internal.h";

/// Module name pattern: identifiers separated by dots.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static MODULE_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").expect("valid regex")
});

/// Validate a module name.
///
/// # Examples
/// ```
/// use cmg_generator::config::validate_module_name;
///
/// assert!(validate_module_name("fmt").is_ok());
/// assert!(validate_module_name("mylib.core").is_ok());
/// assert!(validate_module_name("my-lib").is_err());
/// ```
pub fn validate_module_name(name: &str) -> Result<()> {
    if MODULE_NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(GeneratorError::InvalidModuleName(name.to_string()))
    }
}

/// Whether a scope component names an anonymous scope or entity.
#[must_use]
pub fn is_anonymous_marker(component: &str) -> bool {
    component.ends_with(')')
        && ANONYMOUS_SCOPE_PREFIXES
            .iter()
            .any(|prefix| component.starts_with(prefix))
}

/// How declarations with internal linkage are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum InternalLinkageMode {
    /// Report each one on the diagnostic channel and drop it.
    #[default]
    #[value(name = "skip")]
    SkipWithDiagnostic,

    /// Collect their declaration text into a companion header.
    #[value(name = "header")]
    EmitAsHeader,
}

impl InternalLinkageMode {
    /// Whether a companion header is produced.
    #[must_use]
    pub fn emits_header(&self) -> bool {
        matches!(self, Self::EmitAsHeader)
    }
}

/// Immutable configuration shared by every translation unit of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Explicit module name; derived from the source file stem when absent.
    pub module_name: Option<String>,

    /// Directory receiving the generated artifacts.
    pub output_dir: PathBuf,

    /// Substring a qualified name must contain; empty matches everything.
    pub filter: String,

    /// Internal-linkage handling.
    pub internal_linkage: InternalLinkageMode,
}

impl GeneratorConfig {
    /// Create a configuration writing to the current directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            module_name: None,
            output_dir: PathBuf::from("."),
            filter: String::new(),
            internal_linkage: InternalLinkageMode::default(),
        }
    }

    #[must_use]
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    #[must_use]
    pub fn with_internal_linkage(mut self, mode: InternalLinkageMode) -> Self {
        self.internal_linkage = mode;
        self
    }

    /// Check the configuration before any unit is generated.
    ///
    /// The output directory may be missing (it is created on demand), but
    /// an existing non-directory at that path is rejected.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.module_name {
            validate_module_name(name)?;
        }
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(GeneratorError::OutputNotDirectory(self.output_dir.clone()));
        }
        Ok(())
    }

    /// Resolve the module name for a unit whose artifacts use `base_name`.
    ///
    /// An explicit name must follow the module-name grammar. A name derived
    /// from the file stem is used as-is, with a warning when it does not.
    pub fn resolve_module_name(&self, base_name: &str) -> Result<String> {
        if let Some(name) = &self.module_name {
            validate_module_name(name)?;
            return Ok(name.clone());
        }
        if validate_module_name(base_name).is_err() {
            tracing::warn!(
                module = base_name,
                "Derived module name is not a valid module name; pass --name to override"
            );
        }
        Ok(base_name.to_string())
    }

    /// Path of the module interface unit for `base_name`.
    #[must_use]
    pub fn module_path(&self, base_name: &str) -> PathBuf {
        artifact_path(&self.output_dir, base_name, MODULE_EXTENSION)
    }

    /// Path of the internal-linkage header for `base_name`.
    #[must_use]
    pub fn header_path(&self, base_name: &str) -> PathBuf {
        artifact_path(&self.output_dir, base_name, HEADER_EXTENSION)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn artifact_path(dir: &Path, base_name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{base_name}.{extension}"))
}
