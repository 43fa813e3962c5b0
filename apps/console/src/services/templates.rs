//! Report templates, created and replaced through multipart uploads.

use std::ops::Deref;

use crate::error::AppResult;
use crate::models::{Template, TemplateUpload};

use super::resource::{Mutation, Resource};

#[derive(Debug, Clone)]
pub struct TemplateResource {
    base: Resource<Template>,
}

impl TemplateResource {
    pub fn new(base: Resource<Template>) -> Self {
        Self { base }
    }

    /// `POST /templates` as multipart.
    pub async fn upload(&self, upload: TemplateUpload) -> AppResult<Template> {
        let form = upload.into_form();
        self.base
            .run_mutation(
                Mutation::Create,
                self.base
                    .client()
                    .post_multipart::<Template>(self.base.path(), form),
            )
            .await
    }

    /// `PUT /templates/{id}` as multipart; the file part is optional.
    pub async fn replace(&self, id: &str, upload: TemplateUpload) -> AppResult<Template> {
        let path = self.base.item_path(id);
        let form = upload.into_form();
        self.base
            .run_mutation(
                Mutation::Update,
                self.base.client().put_multipart::<Template>(&path, form),
            )
            .await
    }
}

impl Deref for TemplateResource {
    type Target = Resource<Template>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
