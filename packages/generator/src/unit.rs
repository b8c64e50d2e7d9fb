//! Per-translation-unit orchestration.
//!
//! A [`UnitGenerator`] is created for one source file, collects declaration
//! records, and is flushed exactly once: explicitly through
//! [`UnitGenerator::finish`], or on drop if collection was interrupted.
//! Output is best-effort, so a partially collected unit is still written.

use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};
use crate::router::{DiagnosticSink, Route, SymbolRouter};
use crate::types::DeclarationRecord;
use crate::wrapper::{save_artifact, ModuleWrapper};

/// Lifecycle of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// Accepting declaration records.
    Collecting,

    /// Rendering and writing artifacts.
    Finalizing,

    /// Artifacts written (or the write failed); nothing more happens.
    Flushed,
}

/// Counters for one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitStats {
    /// Statements in the exported tree.
    pub exported: usize,

    /// Statements in the internal tree.
    pub internal: usize,

    /// Records reported through the diagnostic sink.
    pub skipped: usize,

    /// Records dropped silently (implicit, filtered, redeclared, unnamed).
    pub rejected: usize,
}

/// Artifacts written for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOutput {
    pub module_name: String,
    pub module_path: PathBuf,
    pub header_path: Option<PathBuf>,
    pub stats: UnitStats,
}

/// Router and trees for one analyzed source file.
pub struct UnitGenerator<'a> {
    router: SymbolRouter,
    wrapper: ModuleWrapper,
    module_path: PathBuf,
    header_path: Option<PathBuf>,
    sink: &'a mut dyn DiagnosticSink,
    stats: UnitStats,
    state: UnitState,
}

impl<'a> UnitGenerator<'a> {
    /// Start a unit for `source`.
    ///
    /// Fails with a configuration error before anything is written if the
    /// configuration is unusable or the source cannot be canonicalized.
    pub fn new(
        config: &GeneratorConfig,
        source: &Path,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Result<Self> {
        config.validate()?;

        let source_file = source
            .canonicalize()
            .map_err(|e| GeneratorError::SourceNotFound {
                path: source.to_path_buf(),
                source: e,
            })?;
        let base_name = source_file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| GeneratorError::MissingBaseName(source_file.clone()))?
            .to_string();
        let module_name = config.resolve_module_name(&base_name)?;

        tracing::debug!(
            source = %source_file.display(),
            module = %module_name,
            "Collecting translation unit"
        );

        Ok(Self {
            router: SymbolRouter::from_config(config),
            module_path: config.module_path(&base_name),
            header_path: config
                .internal_linkage
                .emits_header()
                .then(|| config.header_path(&base_name)),
            wrapper: ModuleWrapper::new(source_file, module_name),
            sink,
            stats: UnitStats::default(),
            state: UnitState::Collecting,
        })
    }

    #[must_use]
    pub fn state(&self) -> UnitState {
        self.state
    }

    #[must_use]
    pub fn wrapper(&self) -> &ModuleWrapper {
        &self.wrapper
    }

    /// Route one record into the trees.
    pub fn collect(&mut self, record: DeclarationRecord) {
        tracing::debug!(
            name = %record.qualified_name,
            kind = record.kind.as_str(),
            "Routing declaration"
        );

        match self.router.route(record) {
            Route::Skipped(diagnostic) => {
                tracing::debug!(name = %diagnostic.qualified_name, "Skipping symbol");
                self.stats.skipped += 1;
                self.sink.emit(diagnostic);
            }
            Route::Rejected(reason) => {
                tracing::debug!(?reason, "Rejected declaration");
                self.stats.rejected += 1;
            }
            route => {
                self.wrapper.apply(route);
            }
        }
    }

    /// Signal that traversal is complete and write the artifacts.
    pub fn finish(mut self) -> Result<UnitOutput> {
        self.flush()
    }

    fn flush(&mut self) -> Result<UnitOutput> {
        self.state = UnitState::Finalizing;
        let result = self.write_artifacts();
        self.state = UnitState::Flushed;
        result
    }

    fn write_artifacts(&self) -> Result<UnitOutput> {
        save_artifact(&self.module_path, &self.wrapper.render_module())?;
        if let Some(header_path) = &self.header_path {
            save_artifact(header_path, &self.wrapper.render_header())?;
        }

        let stats = UnitStats {
            exported: self.wrapper.exported().statement_count(),
            internal: self.wrapper.internal().statement_count(),
            ..self.stats
        };
        tracing::debug!(
            module = %self.module_path.display(),
            exported = stats.exported,
            internal = stats.internal,
            skipped = stats.skipped,
            "Flushed translation unit"
        );

        Ok(UnitOutput {
            module_name: self.wrapper.module_name().to_string(),
            module_path: self.module_path.clone(),
            header_path: self.header_path.clone(),
            stats,
        })
    }
}

impl Drop for UnitGenerator<'_> {
    fn drop(&mut self) {
        if self.state != UnitState::Collecting {
            return;
        }
        tracing::warn!(
            source = %self.wrapper.source_file().display(),
            "Collection interrupted, flushing partial unit"
        );
        if let Err(e) = self.flush() {
            tracing::error!(error = %e, "Failed to flush interrupted unit");
        }
    }
}

/// Run one unit over a fallible record stream.
///
/// An `Err` item interrupts collection: the records seen so far are still
/// flushed, and the error is returned.
pub fn generate_unit<I>(
    config: &GeneratorConfig,
    source: &Path,
    records: I,
    sink: &mut dyn DiagnosticSink,
) -> Result<UnitOutput>
where
    I: IntoIterator<Item = Result<DeclarationRecord>>,
{
    let mut unit = UnitGenerator::new(config, source, sink)?;
    for record in records {
        unit.collect(record?);
    }
    unit.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InternalLinkageMode;
    use crate::router::Diagnostic;
    use crate::types::DeclKind;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn source_in(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, "#pragma once\n").unwrap();
        path
    }

    #[test]
    fn test_finish_writes_module() {
        let dir = tempdir().unwrap();
        let source = source_in(&dir, "vec.h");
        let config = GeneratorConfig::new().with_output_dir(dir.path().join("out"));
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let mut unit = UnitGenerator::new(&config, &source, &mut diagnostics).unwrap();
        assert_eq!(unit.state(), UnitState::Collecting);
        unit.collect(DeclarationRecord::external("math::Vec", DeclKind::Type));
        assert_eq!(unit.wrapper().exported().statement_count(), 1);
        let output = unit.finish().unwrap();

        assert_eq!(output.module_name, "vec");
        assert_eq!(output.module_path, dir.path().join("out/vec.cppm"));
        assert!(output.header_path.is_none());
        assert_eq!(output.stats.exported, 1);
        let content = fs::read_to_string(&output.module_path).unwrap();
        assert!(content.contains("export module vec;"));
        assert!(content.contains("export using ::math::Vec;"));
    }

    #[test]
    fn test_redeclaration_after_first_still_single_statement() {
        let dir = tempdir().unwrap();
        let source = source_in(&dir, "a.h");
        let config = GeneratorConfig::new().with_output_dir(dir.path());
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let mut unit = UnitGenerator::new(&config, &source, &mut diagnostics).unwrap();
        unit.collect(DeclarationRecord::external("f", DeclKind::Function));
        unit.collect(DeclarationRecord::external("f", DeclKind::Function).redeclaration());
        unit.collect(DeclarationRecord::external("g", DeclKind::Function).redeclaration());
        let output = unit.finish().unwrap();

        assert_eq!(output.stats.exported, 1);
        assert_eq!(output.stats.rejected, 2);
        let content = fs::read_to_string(&output.module_path).unwrap();
        assert_eq!(content.matches("using ::f;").count(), 1);
        assert!(!content.contains("::g"));
    }

    #[test]
    fn test_skipped_internal_reported_once() {
        let dir = tempdir().unwrap();
        let source = source_in(&dir, "a.h");
        let config = GeneratorConfig::new().with_output_dir(dir.path());
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        {
            let mut unit = UnitGenerator::new(&config, &source, &mut diagnostics).unwrap();
            unit.collect(DeclarationRecord::internal(
                "detail::helper",
                DeclKind::Function,
                "static void helper();",
            ));
            let output = unit.finish().unwrap();
            assert_eq!(output.stats.skipped, 1);
            let content = fs::read_to_string(&output.module_path).unwrap();
            assert!(!content.contains("helper"));
        }

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].to_string(),
            "detail::helper has internal linkage. Skipping."
        );
        assert!(!dir.path().join("a.internal.h").exists());
    }

    #[test]
    fn test_header_mode_writes_header() {
        let dir = tempdir().unwrap();
        let source = source_in(&dir, "a.h");
        let config = GeneratorConfig::new()
            .with_output_dir(dir.path().join("gen"))
            .with_internal_linkage(InternalLinkageMode::EmitAsHeader);
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let mut unit = UnitGenerator::new(&config, &source, &mut diagnostics).unwrap();
        unit.collect(DeclarationRecord::internal(
            "a::b::helper",
            DeclKind::Function,
            "static int helper() { return 0; }",
        ));
        let output = unit.finish().unwrap();

        let header_path = output.header_path.unwrap();
        assert_eq!(header_path, dir.path().join("gen/a.internal.h"));
        let header = fs::read_to_string(header_path).unwrap();
        assert!(header.contains(
            "namespace a {\nnamespace b {\nstatic int helper() { return 0; }\n"
        ));
        let module = fs::read_to_string(output.module_path).unwrap();
        assert!(!module.contains("helper"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_drop_flushes_unfinished_unit() {
        let dir = tempdir().unwrap();
        let source = source_in(&dir, "a.h");
        let config = GeneratorConfig::new().with_output_dir(dir.path());
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        {
            let mut unit = UnitGenerator::new(&config, &source, &mut diagnostics).unwrap();
            unit.collect(DeclarationRecord::external("x", DeclKind::Variable));
        }

        let content = fs::read_to_string(dir.path().join("a.cppm")).unwrap();
        assert!(content.contains("export using ::x;"));
    }

    #[test]
    fn test_generate_unit_interrupted_still_flushes() {
        let dir = tempdir().unwrap();
        let source = source_in(&dir, "a.h");
        let config = GeneratorConfig::new().with_output_dir(dir.path());
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let records = vec![
            Ok(DeclarationRecord::external("first", DeclKind::Function)),
            Err(GeneratorError::UnsupportedDumpFormat("broken".into())),
            Ok(DeclarationRecord::external("never", DeclKind::Function)),
        ];
        let err = generate_unit(&config, &source, records, &mut diagnostics).unwrap_err();

        assert!(matches!(err, GeneratorError::UnsupportedDumpFormat(_)));
        let content = fs::read_to_string(dir.path().join("a.cppm")).unwrap();
        assert!(content.contains("export using ::first;"));
        assert!(!content.contains("never"));
    }

    #[test]
    fn test_missing_source_is_configuration_error() {
        let dir = tempdir().unwrap();
        let config = GeneratorConfig::new().with_output_dir(dir.path());
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let result = UnitGenerator::new(&config, &dir.path().join("missing.h"), &mut diagnostics);
        let err = result.err().unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_derived_module_name_used_as_is() {
        let dir = tempdir().unwrap();
        let source = source_in(&dir, "my-lib.h");
        let config = GeneratorConfig::new().with_output_dir(dir.path());
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let output = generate_unit(
            &config,
            &source,
            vec![Ok(DeclarationRecord::external("ml::f", DeclKind::Function))],
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(output.module_name, "my-lib");
        assert_eq!(output.module_path, dir.path().join("my-lib.cppm"));
        let content = fs::read_to_string(&output.module_path).unwrap();
        assert!(content.contains("export module my-lib;"));

        let config = config.with_module_name("mylib");
        let output = generate_unit(
            &config,
            &source,
            Vec::<Result<DeclarationRecord>>::new(),
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(output.module_path, dir.path().join("my-lib.cppm"));
        assert!(fs::read_to_string(output.module_path)
            .unwrap()
            .contains("export module mylib;"));
    }

    #[test]
    fn test_invalid_explicit_module_name() {
        let dir = tempdir().unwrap();
        let source = source_in(&dir, "a.h");
        let config = GeneratorConfig::new()
            .with_output_dir(dir.path())
            .with_module_name("my-lib");
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let result = UnitGenerator::new(&config, &source, &mut diagnostics);
        assert!(matches!(
            result.err(),
            Some(GeneratorError::InvalidModuleName(name)) if name == "my-lib"
        ));
        assert!(!dir.path().join("a.cppm").exists());
    }

    #[test]
    fn test_uncreatable_output_dir_fails_unit() {
        let dir = tempdir().unwrap();
        let source = source_in(&dir, "a.h");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let config = GeneratorConfig::new().with_output_dir(blocker.join("out"));
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let mut unit = UnitGenerator::new(&config, &source, &mut diagnostics).unwrap();
        unit.collect(DeclarationRecord::external("x", DeclKind::Variable));
        let err = unit.finish().unwrap_err();

        assert!(matches!(err, GeneratorError::CreateDir { .. }));
        assert!(!err.is_configuration());
        assert!(!blocker.join("out/a.cppm").exists());
    }

    #[test]
    fn test_header_write_failure_fails_unit() {
        let dir = tempdir().unwrap();
        let source = source_in(&dir, "a.h");
        let out = dir.path().join("out");
        // A non-empty directory where the header should go
        fs::create_dir_all(out.join("a.internal.h/taken")).unwrap();
        let config = GeneratorConfig::new()
            .with_output_dir(&out)
            .with_internal_linkage(InternalLinkageMode::EmitAsHeader);
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let mut unit = UnitGenerator::new(&config, &source, &mut diagnostics).unwrap();
        unit.collect(DeclarationRecord::internal("k", DeclKind::Variable, "static int k;"));
        let err = unit.finish().unwrap_err();

        assert!(matches!(
            err,
            GeneratorError::Write { ref path, .. } if *path == out.join("a.internal.h")
        ));
        assert!(out.join("a.cppm").exists());
        assert!(!out.join(".a.internal.h.tmp").exists());
    }
}
