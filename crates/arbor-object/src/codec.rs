//! Canonical bincode settings shared by tree and commit payloads.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ObjectError, ObjectResult};

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

pub(crate) fn encode<T: Serialize>(value: &T) -> ObjectResult<Vec<u8>> {
    options()
        .serialize(value)
        .map_err(|e| ObjectError::Serialization(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ObjectResult<T> {
    options()
        .deserialize(bytes)
        .map_err(|e| ObjectError::Deserialization(e.to_string()))
}
