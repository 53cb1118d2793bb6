//! Delegated PDF fill.
//!
//! The pipeline ends at a list of (field id, value) pairs; actually
//! mutating a document is someone else's job. [`PdftkFiller`] hands the
//! pairs to the `pdftk` binary as an FDF document and reads the
//! flattened result from its stdout. Field ids the template does not
//! carry are silently ignored by the tool, which is exactly the
//! contract the mapper relies on.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::FormError;
use crate::report::ReportKind;

/// Where template documents come from.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn template(&self, kind: ReportKind) -> Result<PathBuf, FormError>;
}

/// Fills a template's text fields and returns the flattened document.
#[async_trait]
pub trait FormFiller: Send + Sync {
    async fn fill(&self, template: &Path, fields: &[(String, String)]) -> Result<Vec<u8>, FormError>;
}

/// Templates as plain files in one directory, named per
/// [`ReportKind::template_file`].
#[derive(Debug, Clone)]
pub struct DirTemplates {
    dir: PathBuf,
}

impl DirTemplates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl TemplateSource for DirTemplates {
    async fn template(&self, kind: ReportKind) -> Result<PathBuf, FormError> {
        let path = self.dir.join(kind.template_file());
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(FormError::Template { kind, path }),
        }
    }
}

/// Shells out to `pdftk <template> fill_form <fdf> output - flatten`.
#[derive(Debug, Clone)]
pub struct PdftkFiller {
    binary: PathBuf,
}

impl PdftkFiller {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for PdftkFiller {
    fn default() -> Self {
        Self::new("pdftk")
    }
}

#[async_trait]
impl FormFiller for PdftkFiller {
    async fn fill(&self, template: &Path, fields: &[(String, String)]) -> Result<Vec<u8>, FormError> {
        let mut fdf = tempfile::NamedTempFile::new()
            .map_err(|e| FormError::Filler(format!("could not create fdf file: {e}")))?;
        fdf.write_all(&fdf_document(fields))
            .map_err(|e| FormError::Filler(format!("could not write fdf file: {e}")))?;
        fdf.flush()
            .map_err(|e| FormError::Filler(format!("could not write fdf file: {e}")))?;

        tracing::debug!(
            template = %template.display(),
            fields = fields.len(),
            "invoking pdftk"
        );
        let output = Command::new(&self.binary)
            .arg(template)
            .arg("fill_form")
            .arg(fdf.path())
            .arg("output")
            .arg("-")
            .arg("flatten")
            .output()
            .await
            .map_err(|e| {
                FormError::Filler(format!("could not run {}: {e}", self.binary.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FormError::Filler(format!(
                "pdftk exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(output.stdout)
    }
}

/// Serialize field pairs as a minimal FDF document.
pub fn fdf_document(fields: &[(String, String)]) -> Vec<u8> {
    let mut doc = String::from("%FDF-1.2\n1 0 obj\n<< /FDF << /Fields [\n");
    for (id, value) in fields {
        doc.push_str("<< /T (");
        doc.push_str(&escape_pdf_string(id));
        doc.push_str(") /V (");
        doc.push_str(&escape_pdf_string(value));
        doc.push_str(") >>\n");
    }
    doc.push_str("] >> >>\nendobj\ntrailer\n<< /Root 1 0 R >>\n%%EOF\n");
    doc.into_bytes()
}

/// Backslash, parentheses, and line breaks must be escaped inside a
/// PDF literal string.
fn escape_pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
