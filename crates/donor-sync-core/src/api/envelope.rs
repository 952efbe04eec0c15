//! Uniform `{success, data?, message?}` response envelope.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every backend response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A response that did not carry a usable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// `success:false` or a missing payload become a [`Rejection`].
    pub fn into_data(self) -> Result<T, Rejection> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(Rejection {
                message: self.message.filter(|m| !m.trim().is_empty()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let response: ApiResponse<Vec<i64>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2]}"#).unwrap();
        assert_eq!(response.into_data(), Ok(vec![1, 2]));
    }

    #[test]
    fn test_envelope_failure_keeps_message() {
        let response: ApiResponse<Vec<i64>> =
            serde_json::from_str(r#"{"success": false, "message": "Address not found"}"#).unwrap();
        assert_eq!(
            response.into_data(),
            Err(Rejection {
                message: Some("Address not found".into())
            })
        );
    }

    #[test]
    fn test_envelope_blank_message_dropped() {
        let response: ApiResponse<i64> = ApiResponse {
            success: true,
            data: None,
            message: Some("  ".into()),
        };
        assert_eq!(response.into_data(), Err(Rejection { message: None }));
    }
}
