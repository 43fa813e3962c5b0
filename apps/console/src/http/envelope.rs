//! The `{ isSuccess, message, statusCode, result }` wrapper every endpoint returns.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub is_success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
}

fn default_success() -> bool {
    true
}

impl ApiResponse<JsonValue> {
    /// Unwrap the envelope into `T`.
    ///
    /// A missing or null `result` is decoded as JSON `null`, which succeeds for
    /// `()` and `Option<_>` targets and fails for anything else.
    pub fn into_result<T: DeserializeOwned>(self, http_status: u16) -> AppResult<T> {
        if !self.is_success {
            return Err(AppError::Api {
                status: self.status_code.unwrap_or(http_status),
                message: self.message,
            });
        }

        let value = self.result.unwrap_or(JsonValue::Null);
        serde_json::from_value(value).map_err(|e| {
            AppError::Decode(format!("unexpected result payload: {}", e))
        })
    }
}

impl<T> ApiResponse<T> {
    /// Successful envelope around `result`.
    pub fn ok(result: T) -> Self {
        Self {
            is_success: true,
            message: String::new(),
            status_code: Some(200),
            result: Some(result),
        }
    }
}
