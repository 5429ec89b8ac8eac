//! Journal records: categories of prompts, outlined answers and the profile.
//!
//! # Responsibility
//! - Define the records persisted through the key-value store.
//! - Keep field names identical to the app's encoded records.
//!
//! # Invariants
//! - `Category::id` and `Content::id` are stable for the record lifetime.
//! - `Content::sub_lines` is always a structurally consistent outline.

use crate::outline::Outline;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one category.
pub type CategoryId = Uuid;

/// Stable identifier of one prompt/answer content entry.
pub type ContentId = Uuid;

/// Group of prompts such as "personality" or "experience".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    #[serde(default)]
    pub content_list: Vec<Content>,
}

impl Category {
    /// Creates an empty category with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content_list: Vec::new(),
        }
    }
}

/// One prompt (headline) with its outlined answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: ContentId,
    pub head_line: String,
    #[serde(default)]
    pub sub_lines: Outline,
}

impl Content {
    /// Creates a content entry with an empty answer.
    pub fn new(head_line: impl Into<String>) -> Self {
        Self::with_answer(head_line, Outline::default())
    }

    /// Creates a content entry with a prepared answer outline.
    pub fn with_answer(head_line: impl Into<String>, sub_lines: Outline) -> Self {
        Self {
            id: Uuid::new_v4(),
            head_line: head_line.into(),
            sub_lines,
        }
    }
}

/// User profile shown above the journal.
///
/// `statement` keeps the stored wire name `value`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    #[serde(rename = "value")]
    pub statement: String,
    /// Opaque image bytes; `None` when the user never picked one.
    ///
    /// Encoded as a base64 string. Decoding also takes a plain byte array.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "image_bytes")]
    pub profile_image: Option<Vec<u8>>,
}

mod image_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::de::{self, SeqAccess, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(
        value: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        deserializer.deserialize_any(ImageVisitor)
    }

    struct ImageVisitor;

    impl<'de> Visitor<'de> for ImageVisitor {
        type Value = Option<Vec<u8>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a base64 string or an array of bytes")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            STANDARD
                .decode(value.trim())
                .map(Some)
                .map_err(|err| E::custom(format!("invalid base64 image: {err}")))
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Ok(Some(value.to_vec()))
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(byte) = seq.next_element::<u8>()? {
                bytes.push(byte);
            }
            Ok(Some(bytes))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }
}
