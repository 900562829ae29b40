use std::collections::HashMap;

use crate::error::EncodeError;
use crate::fit::catalog::{MessageDefinition, MessageKind};

/// Record header bit marking a definition message.
pub const DEFINITION_FLAG: u8 = 0x40;

/// Normal record headers carry the local message number in four bits.
pub const MAX_LOCAL_ID: u8 = 0x0F;

const LITTLE_ENDIAN: u8 = 0;

/// Per-file mapping from message type to local message number.
///
/// A definition record is written the first time a type is requested; later
/// requests return the same id without touching the output.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    assigned: HashMap<MessageKind, u8>,
    next_id: u8,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.assigned.clear();
        self.next_id = 0;
    }

    pub fn local_id(&self, kind: MessageKind) -> Option<u8> {
        self.assigned.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    pub fn ensure_definition(
        &mut self,
        kind: MessageKind,
        out: &mut Vec<u8>,
    ) -> Result<u8, EncodeError> {
        if let Some(id) = self.local_id(kind) {
            return Ok(id);
        }

        if self.next_id > MAX_LOCAL_ID {
            return Err(EncodeError::LocalIdsExhausted(kind.name()));
        }

        let id = self.next_id;
        write_definition(out, id, kind.definition());
        self.assigned.insert(kind, id);
        self.next_id += 1;

        tracing::debug!("Defined {} as local message {}", kind, id);
        Ok(id)
    }

    /// Same as [`ensure_definition`](Self::ensure_definition) for a message
    /// type given by name, e.g. `"lap"`.
    pub fn ensure_definition_named(
        &mut self,
        name: &str,
        out: &mut Vec<u8>,
    ) -> Result<u8, EncodeError> {
        let kind: MessageKind = name.parse()?;
        self.ensure_definition(kind, out)
    }
}

fn write_definition(out: &mut Vec<u8>, local_id: u8, definition: &MessageDefinition) {
    out.push(DEFINITION_FLAG | local_id);
    out.push(0); // reserved
    out.push(LITTLE_ENDIAN);
    out.extend_from_slice(&definition.global_number.to_le_bytes());
    out.push(definition.fields.len() as u8);
    for field in definition.fields {
        out.extend_from_slice(&[field.number, field.size, field.base_type.as_u8()]);
    }
}
