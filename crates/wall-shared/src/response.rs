//! Error bodies returned by the REST and storage APIs.

use serde::{Deserialize, Serialize};

/// Error body of the REST record API.
///
/// `code` is the SQLSTATE when the error came from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl RestError {
    /// Parse a response body, falling back to the raw text as the message.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            code: None,
            message: body.trim().to_string(),
            details: None,
            hint: None,
        })
    }

    /// Integrity constraint violations (SQLSTATE class 23).
    pub fn is_constraint_violation(&self) -> bool {
        self.code.as_deref().is_some_and(|c| c.starts_with("23"))
    }

    pub fn summary(&self) -> String {
        let mut out = match &self.code {
            Some(code) => format!("[{code}] {}", self.message),
            None => self.message.clone(),
        };
        if let Some(details) = &self.details {
            out.push_str(": ");
            out.push_str(details);
        }
        out
    }
}

/// Error body of the storage API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageErrorBody {
    #[serde(rename = "statusCode", default)]
    pub status_code: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl StorageErrorBody {
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            status_code: None,
            error: None,
            message: body.trim().to_string(),
        })
    }

    pub fn summary(&self) -> String {
        match &self.error {
            Some(error) if !self.message.is_empty() => format!("{error}: {}", self.message),
            Some(error) => error.clone(),
            None => self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_error_from_json() {
        let err = RestError::from_body(
            r#"{"code":"23502","details":"Failing row contains (null).","hint":null,"message":"null value in column \"body\" violates not-null constraint"}"#,
        );
        assert!(err.is_constraint_violation());
        assert_eq!(
            err.summary(),
            "[23502] null value in column \"body\" violates not-null constraint: Failing row contains (null)."
        );
    }

    #[test]
    fn test_rest_error_from_plain_text() {
        let err = RestError::from_body("upstream timed out\n");
        assert!(!err.is_constraint_violation());
        assert_eq!(err.summary(), "upstream timed out");
    }

    #[test]
    fn test_storage_error_summary() {
        let err = StorageErrorBody::from_body(
            r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#,
        );
        assert_eq!(err.summary(), "Duplicate: The resource already exists");
    }
}
