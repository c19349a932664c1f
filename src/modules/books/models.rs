use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether a book can currently be borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    #[default]
    Available,
    CheckedOut,
    Reserved,
    Lost,
}

impl AvailabilityStatus {
    pub const ALL: [AvailabilityStatus; 4] = [
        AvailabilityStatus::Available,
        AvailabilityStatus::CheckedOut,
        AvailabilityStatus::Reserved,
        AvailabilityStatus::Lost,
    ];

    /// Canonical wire and storage name
    pub const fn as_str(self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "AVAILABLE",
            AvailabilityStatus::CheckedOut => "CHECKED_OUT",
            AvailabilityStatus::Reserved => "RESERVED",
            AvailabilityStatus::Lost => "LOST",
        }
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text that names no known [`AvailabilityStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid availability status '{0}'")]
pub struct InvalidStatus(pub String);

impl FromStr for AvailabilityStatus {
    type Err = InvalidStatus;

    /// Case-insensitive match against the canonical names.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(text))
            .ok_or_else(|| InvalidStatus(text.to_string()))
    }
}

/// Persisted book record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Store-assigned surrogate key, never exposed on the wire
    pub id: i64,
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub availability_status: AvailabilityStatus,
}

/// Book record before the store has assigned its surrogate key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub availability_status: AvailabilityStatus,
}

/// Wire representation returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub availability_status: String,
}

/// Wire representation accepted from callers, used for both creation and
/// partial updates. Every field is optional at the type level; which ones
/// are required depends on the operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub book_id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub availability_status: Option<String>,
}

/// Query string accepted by the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub book_id: Option<String>,
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_ignores_case() {
        assert_eq!(
            "checked_out".parse::<AvailabilityStatus>(),
            Ok(AvailabilityStatus::CheckedOut)
        );
        assert_eq!("Lost".parse::<AvailabilityStatus>(), Ok(AvailabilityStatus::Lost));
    }

    #[test]
    fn unknown_status_is_an_error_not_a_panic() {
        assert_eq!(
            "checked-out".parse::<AvailabilityStatus>(),
            Err(InvalidStatus("checked-out".to_string()))
        );
        assert!("".parse::<AvailabilityStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_its_name() {
        let json = serde_json::to_string(&AvailabilityStatus::CheckedOut).unwrap();
        assert_eq!(json, "\"CHECKED_OUT\"");
        assert_eq!(AvailabilityStatus::default(), AvailabilityStatus::Available);
    }

    #[test]
    fn payload_uses_camel_case_field_names() {
        let payload: BookPayload = serde_json::from_str(
            r#"{"bookId":"001","title":"Hello","availabilityStatus":"reserved"}"#,
        )
        .unwrap();

        assert_eq!(payload.book_id.as_deref(), Some("001"));
        assert_eq!(payload.title.as_deref(), Some("Hello"));
        assert_eq!(payload.author, None);
        assert_eq!(payload.availability_status.as_deref(), Some("reserved"));
    }
}
