//! Annotation domain model.
//!
//! # Responsibility
//! - Define the user-entered metadata attached to one creator handle.
//! - Provide the canonical default and field-wise merge semantics.
//!
//! # Invariants
//! - A read never yields a partial annotation; absent handles resolve to
//!   [`Annotation::default`].
//! - `updated_at == 0` means "never updated".
//! - Merging always stamps `updated_at`, even when the patch is empty.

use serde::{Deserialize, Deserializer, Serialize};

/// Outreach state of one creator.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Not reached out to yet.
    #[default]
    Uncontacted,
    /// First contact made, no answer yet.
    Contacted,
    /// Creator joined.
    Joined,
    /// Ruled out.
    NotFit,
}

impl Status {
    /// All statuses in canonical display order.
    pub const ALL: [Status; 4] = [
        Status::Uncontacted,
        Status::Contacted,
        Status::Joined,
        Status::NotFit,
    ];

    /// Stable wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uncontacted => "uncontacted",
            Self::Contacted => "contacted",
            Self::Joined => "joined",
            Self::NotFit => "not_fit",
        }
    }

    /// Human-readable label used by list rendering.
    pub fn label(self) -> &'static str {
        match self {
            Self::Uncontacted => "Uncontacted",
            Self::Contacted => "Contacted",
            Self::Joined => "Joined",
            Self::NotFit => "Not a fit",
        }
    }

    /// Parses a wire name. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "uncontacted" => Some(Self::Uncontacted),
            "contacted" => Some(Self::Contacted),
            "joined" => Some(Self::Joined),
            "not_fit" => Some(Self::NotFit),
            _ => None,
        }
    }
}

/// Persisted metadata for one handle.
///
/// Serialized as `{status, note, updatedAt}` so the stored blob keeps the
/// same shape across versions of the `creatorState.v1` key. On read, `null`
/// fields take their default and a fractional `updatedAt` is truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Annotation {
    #[serde(deserialize_with = "null_as_default")]
    pub status: Status,
    #[serde(deserialize_with = "null_as_default")]
    pub note: String,
    /// Unix epoch milliseconds of the last update, `0` when never set.
    #[serde(deserialize_with = "epoch_millis")]
    pub updated_at: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredMillis {
    Whole(i64),
    Fractional(f64),
}

fn epoch_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StoredMillis>::deserialize(deserializer)? {
        Some(StoredMillis::Whole(ms)) => ms,
        // `as` saturates and maps NaN to 0.
        Some(StoredMillis::Fractional(ms)) => ms.trunc() as i64,
        None => 0,
    })
}

impl Annotation {
    /// Returns whether this annotation was ever written.
    pub fn is_touched(&self) -> bool {
        self.updated_at != 0
    }

    /// Applies `patch` field-wise and stamps `now_ms`.
    ///
    /// Fields missing from the patch keep their current value.
    pub fn merged(&self, patch: &AnnotationPatch, now_ms: i64) -> Self {
        Self {
            status: patch.status.unwrap_or(self.status),
            note: patch
                .note
                .clone()
                .unwrap_or_else(|| self.note.clone()),
            updated_at: now_ms,
        }
    }
}

/// Partial annotation update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationPatch {
    pub status: Option<Status>,
    pub note: Option<String>,
}

impl AnnotationPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            note: None,
        }
    }

    pub fn note(note: impl Into<String>) -> Self {
        Self {
            status: None,
            note: Some(note.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Annotation, AnnotationPatch, Status};

    #[test]
    fn wire_names_round_trip_through_parse() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("Contacted"), None);
        assert_eq!(Status::parse(""), None);
    }

    #[test]
    fn merge_keeps_fields_missing_from_patch() {
        let current = Annotation {
            status: Status::Contacted,
            note: "dm sent".to_string(),
            updated_at: 10,
        };

        let merged = current.merged(&AnnotationPatch::status(Status::Joined), 20);
        assert_eq!(merged.status, Status::Joined);
        assert_eq!(merged.note, "dm sent");
        assert_eq!(merged.updated_at, 20);
    }

    #[test]
    fn stored_nulls_and_fractional_timestamps_are_tolerated() {
        let annotation: Annotation = serde_json::from_str(
            r#"{"status":null,"note":null,"updatedAt":1700000000123.9}"#,
        )
        .unwrap();
        assert_eq!(annotation.status, Status::Uncontacted);
        assert_eq!(annotation.note, "");
        assert_eq!(annotation.updated_at, 1_700_000_000_123);

        let annotation: Annotation =
            serde_json::from_str(r#"{"status":"joined","updatedAt":null}"#).unwrap();
        assert_eq!(annotation.status, Status::Joined);
        assert_eq!(annotation.updated_at, 0);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<Annotation>(r#"{"status":"vip"}"#).is_err());
    }

    #[test]
    fn empty_patch_still_stamps_time() {
        let merged = Annotation::default().merged(&AnnotationPatch::default(), 7);
        assert_eq!(merged.status, Status::Uncontacted);
        assert!(merged.note.is_empty());
        assert_eq!(merged.updated_at, 7);
        assert!(merged.is_touched());
    }
}
