//! JSON encoding of a [`ProgressRecord`] blob.
//!
//! The blob is a flat object mapping module id to status string, e.g.
//! `{"camera":"completed","exposure":"inProgress"}`. There is no version field.

use std::collections::BTreeMap;

use lesson_core::model::{IdError, ModuleId, ProgressRecord, ProgressStatus};
use thiserror::Error;

use crate::repository::StorageError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("malformed progress blob: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid module id in progress blob: {0}")]
    InvalidId(#[from] IdError),

    #[error("module id has surrounding whitespace: {0:?}")]
    UntrimmedId(String),
}

impl From<CodecError> for StorageError {
    fn from(err: CodecError) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Encode a record as a JSON object.
///
/// # Errors
///
/// Returns `CodecError` if serialization fails.
pub fn encode(record: &ProgressRecord) -> Result<String, CodecError> {
    let map: BTreeMap<&ModuleId, ProgressStatus> = record.iter().collect();
    Ok(serde_json::to_string(&map)?)
}

/// Decode a JSON blob into a record.
///
/// Decoding is strict: anything other than an object of valid module ids to
/// known status strings is rejected. Keys must already be trimmed, so two
/// spellings of one id cannot collapse into a single entry. Explicit
/// `"notStarted"` entries are dropped.
///
/// # Errors
///
/// Returns `CodecError` if the blob does not match the format.
pub fn decode(blob: &str) -> Result<ProgressRecord, CodecError> {
    let map: BTreeMap<String, ProgressStatus> = serde_json::from_str(blob)?;
    map.into_iter()
        .map(|(raw, status)| {
            if raw.trim() != raw {
                return Err(CodecError::UntrimmedId(raw));
            }
            Ok((ModuleId::new(raw)?, status))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ModuleId {
        ModuleId::new(raw).unwrap()
    }

    #[test]
    fn encodes_flat_object_sorted_by_id() {
        let record = ProgressRecord::new()
            .with(id("lens"), ProgressStatus::InProgress)
            .with(id("camera"), ProgressStatus::Completed);
        assert_eq!(
            encode(&record).unwrap(),
            r#"{"camera":"completed","lens":"inProgress"}"#
        );
        assert_eq!(encode(&ProgressRecord::new()).unwrap(), "{}");
    }

    #[test]
    fn decodes_and_drops_not_started() {
        let record =
            decode(r#"{"camera":"completed","exposure":"notStarted","lens":"inProgress"}"#)
                .unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.status_of(&id("camera")), ProgressStatus::Completed);
        assert_eq!(record.status_of(&id("exposure")), ProgressStatus::NotStarted);
        assert_eq!(record.status_of(&id("lens")), ProgressStatus::InProgress);
    }

    #[test]
    fn rejects_corrupt_blobs() {
        for blob in [
            "",
            "not json",
            "[]",
            r#"{"camera":"finished"}"#,
            r#"{"camera":true}"#,
            r#"{"":"completed"}"#,
        ] {
            assert!(decode(blob).is_err(), "expected {blob:?} to be rejected");
        }
    }

    #[test]
    fn rejects_untrimmed_ids() {
        let err = decode(r#"{" camera":"inProgress","camera":"completed"}"#).unwrap_err();
        assert!(matches!(err, CodecError::UntrimmedId(raw) if raw == " camera"));
    }

    #[test]
    fn module_ids_with_separator_survive_encoding() {
        let record = ProgressRecord::new().with(id("chapter:1"), ProgressStatus::Completed);
        let blob = encode(&record).unwrap();
        assert_eq!(blob, r#"{"chapter:1":"completed"}"#);
        assert_eq!(decode(&blob).unwrap(), record);
    }

    #[test]
    fn codec_errors_map_to_serialization() {
        let err: StorageError = decode("{").unwrap_err().into();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
