//! Query and mutation layer over the REST backend.

pub mod incidents;
pub mod locations;
pub mod notifier;
pub mod query_cache;
pub mod resource;
pub mod templates;
pub mod users;

pub use incidents::{AttachmentUpload, IncidentResource};
pub use locations::Locations;
pub use notifier::{Notifier, Toast, ToastLevel};
pub use query_cache::{ListParams, QueryCache, QueryKey, QueryScope};
pub use resource::{Mutation, Resource};
pub use templates::TemplateResource;
pub use users::UserAdmin;
