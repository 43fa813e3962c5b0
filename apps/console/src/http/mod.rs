//! HTTP client wrapper and the backend's response envelope.

mod client;
mod envelope;
mod multipart;

pub use client::ApiClient;
pub use envelope::ApiResponse;
pub use multipart::MultipartForm;
