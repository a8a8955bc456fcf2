use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::draft::MAX_BODY_CHARS;
use crate::error::DomainError;

/// Backend-assigned post identifier.
///
/// Opaque to the client: the record store may hand out UUIDs or serial
/// integers, both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => PostId(id),
            RawId::Number(id) => PostId(id.to_string()),
        })
    }
}

/// Post entity - one row of the wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub body: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a post. The backend assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub body: String,
    pub image_url: Option<String>,
}

impl NewPost {
    /// Build an insert payload, enforcing the body rules: at most
    /// `MAX_BODY_CHARS` characters, and blank only when an image is attached.
    pub fn new(body: impl Into<String>, image_url: Option<String>) -> Result<Self, DomainError> {
        let body = body.into();
        let len = body.chars().count();

        if len > MAX_BODY_CHARS {
            return Err(DomainError::Validation(format!(
                "post body is {len} characters, the limit is {MAX_BODY_CHARS}"
            )));
        }
        if body.trim().is_empty() && image_url.is_none() {
            return Err(DomainError::Validation(
                "post needs a body or an image".to_string(),
            ));
        }

        Ok(Self { body, image_url })
    }
}

/// Accepts RFC 3339 timestamps as well as offset-less ones, which are read as UTC.
fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;

    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}
