//! Text rendering and file output for generated artifacts.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::config::EXPORT_PREFIX;
use crate::error::{GeneratorError, Result};
use crate::namespace::NamespaceNode;

/// Render the module interface unit.
///
/// Layout: global module fragment, textual inclusion of `source`, module
/// declaration, then `exported` with every statement prefixed by `export `.
/// `source` should be canonical so the artifact does not depend on the
/// working directory it was generated from.
#[must_use]
pub fn render_module(source: &Path, module_name: &str, exported: &NamespaceNode) -> String {
    let mut content = String::from("module;\n");
    content.push_str(&format!("#include \"{}\"\n", include_path(source)));
    content.push_str(&format!("export module {module_name};\n"));
    content.push_str(&exported.serialize(Some(EXPORT_PREFIX)));
    content
}

/// Render the companion header holding internal-linkage declarations.
#[must_use]
pub fn render_header(internal: &NamespaceNode) -> String {
    let mut content = String::from("#pragma once\n");
    content.push_str(&internal.serialize(None));
    content
}

/// Spell a path for an `#include` directive.
fn include_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace('"', "\\\"")
}

/// Write `content` to `path`, creating parent directories on demand.
///
/// Uses atomic write pattern: writes to temp file, syncs to disk, then renames.
/// A failed write never leaves a file at `path` that looks like valid output.
pub fn save_artifact(path: &Path, content: &str) -> Result<()> {
    let Some(file_name) = path.file_name() else {
        return Err(GeneratorError::MissingBaseName(path.to_path_buf()));
    };
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(|source| GeneratorError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let temp_file = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));
    let write_err = |source| GeneratorError::Write {
        path: path.to_path_buf(),
        source,
    };

    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;

        // On Windows, rename fails if the destination already exists
        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(path)?;
        }

        fs::rename(&temp_file, path)
    })();

    if let Err(source) = written {
        let _ = fs::remove_file(&temp_file);
        return Err(write_err(source));
    }
    Ok(())
}
