// ============================================
// Record Codec
// ============================================
//
// Fixed-stride record layout (256 bytes):
//
//   offset  size  field
//   0       1     gender code
//   1       5     tag codes in slot order, 0xFF = empty (trailing only)
//   6       1     name length
//   7       1     image path length
//   8       248   name bytes | image path bytes | zero padding
//
// The declared lengths must partition the payload exactly: everything
// past name + image path is 0x00.

use crate::models::{CatalogRecord, Gender};
use crate::vocabulary::{TagCode, TagVocabulary, EMPTY_TAG};
use std::sync::Arc;
use thiserror::Error;

pub const RECORD_STRIDE: usize = 256;
pub const HEADER_LEN: usize = 8;
pub const PAYLOAD_LEN: usize = RECORD_STRIDE - HEADER_LEN;
pub const TAG_SLOTS: usize = 5;

const GENDER_OFFSET: usize = 0;
const TAGS_OFFSET: usize = 1;
const NAME_LEN_OFFSET: usize = 6;
const PATH_LEN_OFFSET: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("truncated record: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("invalid text in field {field}")]
    InvalidText { field: &'static str },

    #[error("unknown tag code {0}")]
    UnknownTag(TagCode),

    #[error("unknown gender code {0}")]
    UnknownGender(u8),

    #[error("malformed record: {0}")]
    Malformed(String),
}

impl DecodeError {
    /// Truncation ends a scan; every other error only skips one record.
    pub fn ends_scan(&self) -> bool {
        matches!(self, DecodeError::Truncated { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("field {field} is empty")]
    EmptyField { field: &'static str },

    #[error("field {field} is {len} bytes, limit is 255")]
    FieldTooLong { field: &'static str, len: usize },

    #[error("name and image path need {len} bytes, payload holds {PAYLOAD_LEN}")]
    PayloadTooLong { len: usize },

    #[error("{0} tags given, at most {TAG_SLOTS} fit")]
    TooManyTags(usize),

    #[error("tag code {0} is not in the vocabulary")]
    UnknownTag(TagCode),
}

/// Encodes and decodes single catalog records. Tag codes are validated
/// against the vocabulary in both directions.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    vocabulary: Arc<TagVocabulary>,
}

impl RecordCodec {
    pub fn new(vocabulary: Arc<TagVocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Arc<TagVocabulary> {
        &self.vocabulary
    }

    /// Decode the record stored in the first `RECORD_STRIDE` bytes of `bytes`.
    /// `id` is the record's ordinal position; it is not part of the layout.
    pub fn decode(&self, id: u32, bytes: &[u8]) -> Result<CatalogRecord, DecodeError> {
        if bytes.len() < RECORD_STRIDE {
            return Err(DecodeError::Truncated {
                expected: RECORD_STRIDE,
                actual: bytes.len(),
            });
        }
        let slot = &bytes[..RECORD_STRIDE];

        let gender_code = slot[GENDER_OFFSET];
        let gender = Gender::from_code(gender_code).ok_or(DecodeError::UnknownGender(gender_code))?;

        let mut tags = Vec::with_capacity(TAG_SLOTS);
        let mut slots_closed = false;
        for &code in &slot[TAGS_OFFSET..TAGS_OFFSET + TAG_SLOTS] {
            if code == EMPTY_TAG {
                slots_closed = true;
                continue;
            }
            if slots_closed {
                return Err(DecodeError::Malformed(
                    "tag slot used after an empty slot".to_string(),
                ));
            }
            if !self.vocabulary.contains(code) {
                return Err(DecodeError::UnknownTag(code));
            }
            tags.push(code);
        }

        let name_len = slot[NAME_LEN_OFFSET] as usize;
        let path_len = slot[PATH_LEN_OFFSET] as usize;
        if name_len == 0 {
            return Err(DecodeError::Malformed("empty name".to_string()));
        }
        if path_len == 0 {
            return Err(DecodeError::Malformed("empty image path".to_string()));
        }

        let used = name_len + path_len;
        if used > PAYLOAD_LEN {
            return Err(DecodeError::Malformed(format!(
                "declared lengths {} + {} exceed payload of {} bytes",
                name_len, path_len, PAYLOAD_LEN
            )));
        }

        let payload = &slot[HEADER_LEN..];
        if payload[used..].iter().any(|&b| b != 0) {
            return Err(DecodeError::Malformed(format!(
                "declared lengths {} + {} do not cover the payload",
                name_len, path_len
            )));
        }

        let name = std::str::from_utf8(&payload[..name_len])
            .map_err(|_| DecodeError::InvalidText { field: "name" })?;
        let image_path = std::str::from_utf8(&payload[name_len..used])
            .map_err(|_| DecodeError::InvalidText { field: "image_path" })?;

        Ok(CatalogRecord {
            id,
            gender,
            tags,
            name: name.to_string(),
            image_path: image_path.to_string(),
        })
    }

    pub fn encode(&self, record: &CatalogRecord) -> Result<[u8; RECORD_STRIDE], EncodeError> {
        let name = record.name.as_bytes();
        let path = record.image_path.as_bytes();

        if name.is_empty() {
            return Err(EncodeError::EmptyField { field: "name" });
        }
        if path.is_empty() {
            return Err(EncodeError::EmptyField {
                field: "image_path",
            });
        }
        if name.len() > u8::MAX as usize {
            return Err(EncodeError::FieldTooLong {
                field: "name",
                len: name.len(),
            });
        }
        if path.len() > u8::MAX as usize {
            return Err(EncodeError::FieldTooLong {
                field: "image_path",
                len: path.len(),
            });
        }
        if name.len() + path.len() > PAYLOAD_LEN {
            return Err(EncodeError::PayloadTooLong {
                len: name.len() + path.len(),
            });
        }
        if record.tags.len() > TAG_SLOTS {
            return Err(EncodeError::TooManyTags(record.tags.len()));
        }

        let mut slot = [0u8; RECORD_STRIDE];
        slot[GENDER_OFFSET] = record.gender.code();

        let tag_slots = &mut slot[TAGS_OFFSET..TAGS_OFFSET + TAG_SLOTS];
        tag_slots.fill(EMPTY_TAG);
        for (i, &code) in record.tags.iter().enumerate() {
            if !self.vocabulary.contains(code) {
                return Err(EncodeError::UnknownTag(code));
            }
            tag_slots[i] = code;
        }

        slot[NAME_LEN_OFFSET] = name.len() as u8;
        slot[PATH_LEN_OFFSET] = path.len() as u8;

        let name_end = HEADER_LEN + name.len();
        slot[HEADER_LEN..name_end].copy_from_slice(name);
        slot[name_end..name_end + path.len()].copy_from_slice(path);

        Ok(slot)
    }
}
