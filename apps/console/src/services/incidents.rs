//! Incident reports and their attachments.

use std::ops::Deref;

use crate::error::AppResult;
use crate::http::MultipartForm;
use crate::models::{Attachment, Incident};

use super::resource::{Mutation, Resource};

/// File to attach to an incident report.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// `/incidentReports` plus the multipart attachment endpoint.
#[derive(Debug, Clone)]
pub struct IncidentResource {
    base: Resource<Incident>,
}

impl IncidentResource {
    pub fn new(base: Resource<Incident>) -> Self {
        Self { base }
    }

    /// `POST /incidentReports/{id}/attachments`
    pub async fn upload_attachment(
        &self,
        incident_id: &str,
        upload: AttachmentUpload,
    ) -> AppResult<Attachment> {
        let path = format!("{}/attachments", self.base.item_path(incident_id));
        let form = MultipartForm::new().file(
            "file",
            upload.file_name,
            upload.content_type,
            upload.bytes,
        );
        self.base
            .run_mutation(
                Mutation::Upload,
                self.base.client().post_multipart::<Attachment>(&path, form),
            )
            .await
    }
}

impl Deref for IncidentResource {
    type Target = Resource<Incident>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
