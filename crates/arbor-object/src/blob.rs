use serde::{Deserialize, Serialize};

use crate::error::ObjectResult;
use crate::object::{Object, ObjectKind};

/// Raw file contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Wrap as an [`Object`]. The payload is the data itself.
    pub fn to_object(&self) -> Object {
        Object::new(ObjectKind::Blob, self.data.clone())
    }

    /// Unwrap from an [`Object`].
    pub fn from_object(obj: &Object) -> ObjectResult<Self> {
        obj.expect_kind(ObjectKind::Blob)?;
        Ok(Self {
            data: obj.payload().to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
