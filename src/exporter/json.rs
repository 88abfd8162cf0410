// file: src/exporter/json.rs
// description: json export of question to answer mappings with a run manifest
// reference: https://docs.rs/serde_json

use crate::error::{QaError, Result};
use crate::pipeline::BatchReport;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_path: PathBuf,
}

/// Written next to the answers file as `<stem>.manifest.json`.
#[derive(Debug, Clone, Serialize)]
pub struct ExportManifest {
    pub run_id: Uuid,
    pub exported_at: String,
    pub source: PathBuf,
    pub content_hash: String,
    pub page_count: usize,
    pub keywords: Vec<String>,
    pub answered: usize,
    pub unavailable: usize,
    pub answers_file: PathBuf,
}

impl JsonExporter {
    /// Creates the parent directory of `output_path` if it is missing.
    pub fn new(output_path: impl Into<PathBuf>) -> Result<Self> {
        let output_path = output_path.into();

        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| QaError::FileOperation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        Ok(Self { output_path })
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn manifest_path(&self) -> PathBuf {
        let stem = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "answers".to_string());
        self.output_path
            .with_file_name(format!("{}.manifest.json", stem))
    }

    /// Writes the flat `{question: answer}` object and its manifest.
    pub fn export(
        &self,
        report: &BatchReport,
        unavailable_marker: &str,
        pretty: bool,
    ) -> Result<ExportManifest> {
        info!("Starting JSON export to {:?}", self.output_path);

        let answers = report.answers.to_flat_map(unavailable_marker);
        write_json(&self.output_path, &answers, pretty)?;

        let manifest = ExportManifest {
            run_id: Uuid::new_v4(),
            exported_at: Utc::now().to_rfc3339(),
            source: report.document.source.clone(),
            content_hash: report.document.content_hash.clone(),
            page_count: report.document.page_count,
            keywords: report.keywords.clone(),
            answered: report.answers.answered_count(),
            unavailable: report.answers.unavailable_count(),
            answers_file: self.output_path.clone(),
        };
        write_json(&self.manifest_path(), &manifest, pretty)?;

        info!(
            "Export complete: {} answers ({} unavailable)",
            report.answers.len(),
            manifest.unavailable
        );
        Ok(manifest)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| QaError::Serialization(e.to_string()))?;

    fs::write(path, json).map_err(|source| QaError::FileOperation {
        path: path.to_path_buf(),
        source,
    })
}
