//! Declaration dump loading.
//!
//! A dump is what the semantic front end reports for one translation unit:
//! the source path and the declarations in traversal order. Dumps are JSON
//! or YAML. Records are decoded lazily, one at a time, so a malformed record
//! interrupts collection at that point instead of rejecting the whole file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GeneratorError, Result};
use crate::types::DeclarationRecord;

/// Supported dump encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    Json,
    Yaml,
}

impl DumpFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(GeneratorError::UnsupportedDumpFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDump {
    source: PathBuf,
    #[serde(default)]
    declarations: Vec<serde_json::Value>,
}

/// Declarations reported for one translation unit.
#[derive(Debug, Clone)]
pub struct DeclarationDump {
    source: PathBuf,
    declarations: Vec<serde_json::Value>,
}

impl DeclarationDump {
    /// Parse dump text.
    ///
    /// `origin` names the dump in error messages; a relative `source` is
    /// resolved against the directory containing `origin`.
    pub fn parse(text: &str, format: DumpFormat, origin: &Path) -> Result<Self> {
        let raw: RawDump = match format {
            DumpFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            DumpFormat::Yaml => serde_yaml_ng::from_str(text).map_err(|e| e.to_string()),
        }
        .map_err(|message| GeneratorError::DumpParse {
            path: origin.to_path_buf(),
            message,
        })?;

        let source = if raw.source.is_relative() {
            origin
                .parent()
                .map(|dir| dir.join(&raw.source))
                .unwrap_or(raw.source)
        } else {
            raw.source
        };

        Ok(Self {
            source,
            declarations: raw.declarations,
        })
    }

    /// Read and parse a dump file.
    pub fn load(path: &Path) -> Result<Self> {
        let format = DumpFormat::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|source| GeneratorError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), ?format, "Loaded declaration dump");
        Self::parse(&text, format, path)
    }

    /// Source file the declarations were extracted from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Decode the records in traversal order.
    pub fn records(&self) -> impl Iterator<Item = Result<DeclarationRecord>> + '_ {
        self.declarations
            .iter()
            .enumerate()
            .map(|(index, value)| {
                DeclarationRecord::deserialize(value)
                    .map_err(|source| GeneratorError::InvalidDeclaration { index, source })
            })
    }
}
