//! Multipart bodies for file-bearing resources.

use reqwest::multipart::{Form, Part};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
struct FilePart {
    field: String,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Framework-neutral multipart body, converted to a reqwest form at send time.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    texts: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.texts.push((field.into(), value.into()));
        self
    }

    /// Append a file field.
    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.files.push(FilePart {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        });
        self
    }

    /// First text value for `field`.
    pub fn text_value(&self, field: &str) -> Option<&str> {
        self.texts
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub(crate) fn into_reqwest(self) -> AppResult<Form> {
        let mut form = Form::new();
        for (field, value) in self.texts {
            form = form.text(field, value);
        }
        for file in self.files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(|e| {
                    AppError::InvalidInput(format!("Invalid content type for {}: {}", file.field, e))
                })?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}
