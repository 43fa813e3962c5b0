//! Downloadable report templates.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Identified, de_id};
use crate::error::{AppError, AppResult};
use crate::http::MultipartForm;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub uploaded_by: Option<String>,
}

impl Identified for Template {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Multipart body for creating or replacing a template.
#[derive(Debug, Clone)]
pub struct TemplateUpload {
    pub name: String,
    pub file_type: String,
    pub is_active: bool,
    /// Omitted on metadata-only updates
    pub file: Option<TemplateFile>,
}

#[derive(Debug, Clone)]
pub struct TemplateFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl TemplateFile {
    /// Read a template file from disk, guessing its content type from the extension.
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::InvalidInput(format!("Cannot read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::InvalidInput("Template path has no file name".to_string()))?
            .to_string();
        let content_type = content_type_for(&file_name).to_string();

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

impl TemplateUpload {
    pub fn into_form(self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("name", self.name)
            .text("fileType", self.file_type)
            .text("isActive", self.is_active.to_string());
        if let Some(file) = self.file {
            form = form.file("file", file.file_name, file.content_type, file.bytes);
        }
        form
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}
