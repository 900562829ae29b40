use chrono::{DateTime, Utc};

use crate::error::EncodeError;
use crate::fit::catalog::{MessageDefinition, MessageKind};
use crate::fit::encode::{encode_coord, encode_string, encode_timestamp, encode_uint};

/// One data record payload, laid out exactly like its catalog definition.
///
/// Fields start out holding their base type's invalid value, so only the
/// fields a message actually carries need to be set.
#[derive(Debug, Clone)]
pub struct DataRecord {
    kind: MessageKind,
    payload: Vec<u8>,
}

impl DataRecord {
    pub fn new(kind: MessageKind) -> Self {
        let definition = kind.definition();
        let mut payload = Vec::with_capacity(definition.payload_size());
        for field in definition.fields {
            let invalid = field.base_type.invalid_value();
            for _ in 0..(field.size as usize / invalid.len()) {
                payload.extend_from_slice(invalid);
            }
        }
        Self { kind, payload }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn definition(&self) -> &'static MessageDefinition {
        self.kind.definition()
    }

    /// Overwrites field `number` with already encoded bytes.
    pub fn set(&mut self, number: u8, bytes: &[u8]) -> Result<&mut Self, EncodeError> {
        let (offset, field) =
            self.definition()
                .field_span(number)
                .ok_or(EncodeError::UnknownField {
                    message: self.kind.name(),
                    field: number,
                })?;

        let size = field.size as usize;
        if bytes.len() != size {
            return Err(EncodeError::FieldSizeMismatch {
                message: self.kind.name(),
                field: number,
                expected: size,
                actual: bytes.len(),
            });
        }

        self.payload[offset..offset + size].copy_from_slice(bytes);
        Ok(self)
    }

    pub fn set_uint(&mut self, number: u8, value: u64) -> Result<&mut Self, EncodeError> {
        let width = self.width_of(number)?;
        let bytes = encode_uint(value, width)?;
        self.set(number, &bytes)
    }

    pub fn set_string(&mut self, number: u8, text: &str) -> Result<&mut Self, EncodeError> {
        let width = self.width_of(number)?;
        self.set(number, &encode_string(text, width))
    }

    pub fn set_coord(&mut self, number: u8, degrees: f64) -> Result<&mut Self, EncodeError> {
        self.set(number, &encode_coord(degrees))
    }

    pub fn set_timestamp(
        &mut self,
        number: u8,
        time: DateTime<Utc>,
    ) -> Result<&mut Self, EncodeError> {
        self.set(number, &encode_timestamp(time)?)
    }

    fn width_of(&self, number: u8) -> Result<usize, EncodeError> {
        self.definition()
            .field_span(number)
            .map(|(_, field)| field.size as usize)
            .ok_or(EncodeError::UnknownField {
                message: self.kind.name(),
                field: number,
            })
    }
}
