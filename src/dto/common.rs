use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Error payload shared by every failing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human readable message.
    pub error: String,
}

/// Acknowledgement without further data.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
}

impl SuccessResponse {
    /// Positive acknowledgement.
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Query string parameters of a dispatched request.
pub type QueryParams = HashMap<String, String>;

/// Identifier accepted either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlexibleId {
    /// `42`
    Number(i64),
    /// `"42"`
    Text(String),
}

/// A [`FlexibleId`] that does not denote a valid row id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid id `{0}`")]
pub struct InvalidId(pub String);

impl FlexibleId {
    /// Resolve to a 32-bit row id. Zero and empty strings count as absent.
    pub fn resolve(&self) -> Result<Option<i32>, InvalidId> {
        let value = match self {
            FlexibleId::Number(value) => *value,
            FlexibleId::Text(text) if text.trim().is_empty() => return Ok(None),
            FlexibleId::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| InvalidId(text.clone()))?,
        };

        if value == 0 {
            return Ok(None);
        }
        i32::try_from(value)
            .map(Some)
            .map_err(|_| InvalidId(value.to_string()))
    }
}

/// Resolve an optional id, folding "absent", zero and empty into `None`.
///
/// Malformed values stay errors so callers can report missing fields first.
pub fn present_id(id: Option<&FlexibleId>) -> Option<Result<i32, InvalidId>> {
    match id.map(FlexibleId::resolve) {
        None | Some(Ok(None)) => None,
        Some(Ok(Some(value))) => Some(Ok(value)),
        Some(Err(err)) => Some(Err(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flexible_id_accepts_numbers_and_numeric_strings() {
        let number: FlexibleId = serde_json::from_str("7").unwrap();
        let text: FlexibleId = serde_json::from_str("\" 12 \"").unwrap();

        assert_eq!(number.resolve(), Ok(Some(7)));
        assert_eq!(text.resolve(), Ok(Some(12)));
    }

    #[test]
    fn test_flexible_id_treats_zero_and_empty_as_absent() {
        assert_eq!(FlexibleId::Number(0).resolve(), Ok(None));
        assert_eq!(FlexibleId::Text(String::new()).resolve(), Ok(None));
    }

    #[test]
    fn test_present_id_keeps_malformed_values() {
        assert_eq!(present_id(None), None);
        assert_eq!(present_id(Some(&FlexibleId::Number(0))), None);
        assert_eq!(present_id(Some(&FlexibleId::Number(3))), Some(Ok(3)));
        assert!(matches!(
            present_id(Some(&FlexibleId::Text("x".into()))),
            Some(Err(_))
        ));
    }

    #[test]
    fn test_flexible_id_rejects_garbage() {
        assert!(FlexibleId::Text("abc".into()).resolve().is_err());
        assert!(FlexibleId::Number(i64::MAX).resolve().is_err());
    }
}
