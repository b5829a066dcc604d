//! Multi-document YAML or JSON decoder
//!
//! Splits a buffered job output into resource definitions. A buffer whose
//! first non-whitespace byte is `{` is read as concatenated JSON values,
//! anything else as a `---` separated YAML stream.
//!
//! The decoder is a pull-based iterator over the buffer. Each item is one
//! document: `Ok(Some(object))` for a resource, `Ok(None)` for an empty
//! document, `Err(_)` for malformed input. `None` from the iterator is the
//! clean end of the stream. After the first error the decoder is exhausted.

use serde::Deserialize;
use serde_json::de::SliceRead;
use serde_json::{StreamDeserializer, Value};
use stacks_types::{ConversionError, DynamicObject};
use thiserror::Error;

/// Errors decoding a single document
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid YAML in document {document}: {source}")]
    Yaml {
        document: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in document {document}: {source}")]
    Json {
        document: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("document {document} is not a resource: {source}")]
    Object {
        document: usize,
        #[source]
        source: ConversionError,
    },
}

enum Documents<'a> {
    Json(StreamDeserializer<'a, SliceRead<'a>, Value>),
    Yaml(serde_yaml::Deserializer<'a>),
}

/// Decoder over a fixed buffer of YAML or JSON documents
pub struct YamlOrJsonDecoder<'a> {
    documents: Documents<'a>,
    position: usize,
    exhausted: bool,
}

impl<'a> YamlOrJsonDecoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        let documents = if looks_like_json(buf) {
            Documents::Json(serde_json::Deserializer::from_slice(buf).into_iter())
        } else {
            Documents::Yaml(serde_yaml::Deserializer::from_slice(buf))
        };
        Self {
            documents,
            position: 0,
            exhausted: false,
        }
    }

    fn next_value(&mut self) -> Option<Result<Value, DecodeError>> {
        let document = self.position;
        match &mut self.documents {
            Documents::Json(stream) => Some(
                stream
                    .next()?
                    .map_err(|source| DecodeError::Json { document, source }),
            ),
            Documents::Yaml(stream) => Some(
                Value::deserialize(stream.next()?)
                    .map_err(|source| DecodeError::Yaml { document, source }),
            ),
        }
    }
}

impl Iterator for YamlOrJsonDecoder<'_> {
    type Item = Result<Option<DynamicObject>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let Some(value) = self.next_value() else {
            self.exhausted = true;
            return None;
        };
        let document = self.position;
        self.position += 1;

        let decoded = value.and_then(|value| match value {
            Value::Null => Ok(None),
            value => DynamicObject::from_value(value)
                .map(Some)
                .map_err(|source| DecodeError::Object { document, source }),
        });
        if decoded.is_err() {
            self.exhausted = true;
        }
        Some(decoded)
    }
}

fn looks_like_json(buf: &[u8]) -> bool {
    buf.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}
