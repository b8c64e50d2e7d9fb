//! Command-line interface for the generator.

use std::path::{Path, PathBuf};

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{GeneratorConfig, InternalLinkageMode};
use crate::dump::DeclarationDump;
use crate::error::{GeneratorError, Result};
use crate::router::{Diagnostic, DiagnosticSink};
use crate::unit::{generate_unit, UnitOutput};

/// Generate C++ module wrappers from declaration dumps.
#[derive(Parser, Debug)]
#[command(name = "cmg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Declaration dumps (.json, .yaml, .yml), one per translation unit
    #[arg(required = true)]
    pub dumps: Vec<PathBuf>,

    /// Module name (default: base name of each source file)
    #[arg(long)]
    pub name: Option<String>,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only keep symbols whose qualified name contains this text
    #[arg(long = "namespace", default_value = "")]
    pub filter: String,

    /// How to handle declarations with internal linkage
    #[arg(long, value_enum, default_value_t = InternalLinkageMode::SkipWithDiagnostic)]
    pub internal: InternalLinkageMode,
}

impl Cli {
    /// Build the generator configuration from the parsed arguments.
    pub fn to_config(&self) -> Result<GeneratorConfig> {
        let output_dir = match &self.output {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(GeneratorError::CurrentDir)?,
        };

        let mut config = GeneratorConfig::new()
            .with_output_dir(output_dir)
            .with_filter(self.filter.clone())
            .with_internal_linkage(self.internal);
        if let Some(name) = &self.name {
            config = config.with_module_name(name.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

/// Prints diagnostics to stderr without tearing the progress bar.
struct ProgressSink<'a> {
    pb: &'a ProgressBar,
}

impl DiagnosticSink for ProgressSink<'_> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.pb.suspend(|| eprintln!("{diagnostic}"));
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config()?;
    generate_all(&config, &cli.dumps)
}

/// Generate every dump, continuing past failed units.
pub fn generate_all(config: &GeneratorConfig, dumps: &[PathBuf]) -> Result<()> {
    let pb = ProgressBar::new(dumps.len() as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{pos}/{len}] {msg}")
            .expect("valid template"),
    );

    let mut failed = 0;
    for dump_path in dumps {
        pb.set_message(dump_path.display().to_string());

        let mut sink = ProgressSink { pb: &pb };
        match generate_dump(config, dump_path, &mut sink) {
            Ok(output) => pb.suspend(|| print_summary(dump_path, &output)),
            Err(e) => {
                failed += 1;
                pb.suspend(|| {
                    eprintln!(
                        "{} {}: {e}",
                        style("Failed").red().bold(),
                        dump_path.display()
                    );
                });
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if failed > 0 {
        return Err(GeneratorError::UnitsFailed {
            failed,
            total: dumps.len(),
        });
    }
    Ok(())
}

/// Load one dump and run its translation unit.
fn generate_dump(
    config: &GeneratorConfig,
    dump_path: &Path,
    sink: &mut dyn DiagnosticSink,
) -> Result<UnitOutput> {
    let dump = DeclarationDump::load(dump_path)?;
    tracing::debug!(
        dump = %dump_path.display(),
        source = %dump.source().display(),
        declarations = dump.len(),
        "Generating module wrapper"
    );
    generate_unit(config, dump.source(), dump.records(), sink)
}

fn print_summary(dump_path: &Path, output: &UnitOutput) {
    println!(
        "{} {} as module {}",
        style("Generated").green().bold(),
        output.module_path.display(),
        style(&output.module_name).cyan()
    );
    if let Some(header) = &output.header_path {
        println!("  Header: {}", header.display());
    }
    println!(
        "  Exported: {}, internal: {}",
        output.stats.exported, output.stats.internal
    );
    if output.stats.skipped > 0 {
        println!(
            "  Skipped: {} (from {})",
            style(output.stats.skipped).yellow().bold(),
            dump_path.display()
        );
    }
}
