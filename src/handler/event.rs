//! Request and response shapes exchanged with the transport adapter.
//!
//! Both types follow the API gateway proxy event layout (camelCase JSON), so
//! they can be fed from a serverless runtime or from the bundled HTTP
//! server without translation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::codec::EncodedImage;
use crate::constants::{
    CONTENT_TYPE_TEXT, IMAGE_KEY_PARAM, INTERNAL_ERROR_BODY, NOT_FOUND_BODY,
};
use crate::error::ServiceError;

/// Inbound request. Only path parameters are consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
}

impl ApiRequest {
    /// Request carrying `imageKey` as its only path parameter.
    pub fn with_image_key(key: impl Into<String>) -> Self {
        let mut params = HashMap::new();
        params.insert(IMAGE_KEY_PARAM.to_string(), key.into());
        Self {
            path_parameters: Some(params),
        }
    }

    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }

    /// The `imageKey` path parameter, if present and non-empty.
    pub fn image_key(&self) -> Option<&str> {
        self.path_parameter(IMAGE_KEY_PARAM)
            .filter(|key| !key.is_empty())
    }
}

/// Outbound response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: String,
    /// Body is base64 text standing in for binary content
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl ApiResponse {
    /// Plain-text response.
    pub fn text(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            headers: content_type_header(CONTENT_TYPE_TEXT),
            body: message.to_string(),
            is_base64_encoded: false,
        }
    }

    pub fn not_found() -> Self {
        Self::text(404, NOT_FOUND_BODY)
    }

    pub fn internal_server_error() -> Self {
        Self::text(500, INTERNAL_ERROR_BODY)
    }

    /// 200 response carrying the encoded image as base64.
    pub fn image(encoded: &EncodedImage) -> Self {
        Self {
            status_code: 200,
            headers: content_type_header(encoded.content_type),
            body: STANDARD.encode(&encoded.data),
            is_base64_encoded: true,
        }
    }

    pub fn from_error(err: &ServiceError) -> Self {
        Self::text(err.status_code(), err.public_message())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }

    /// Raw body bytes, base64-decoded when the binary flag is set.
    pub fn body_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        if self.is_base64_encoded {
            STANDARD.decode(&self.body)
        } else {
            Ok(self.body.clone().into_bytes())
        }
    }
}

fn content_type_header(value: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), value.to_string());
    headers
}
