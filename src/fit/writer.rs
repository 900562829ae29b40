use crate::error::EncodeError;
use crate::fit::catalog::MessageKind;
use crate::fit::crc::calculate_crc;
use crate::fit::encode::encode_uint;
use crate::fit::record::DataRecord;
use crate::fit::registry::DefinitionRegistry;

pub const HEADER_SIZE: usize = 14;
pub const PROTOCOL_VERSION: u8 = 0x10;
pub const PROFILE_VERSION: u16 = 2141;
pub const DATA_TYPE: &[u8; 4] = b".FIT";

const DATA_SIZE_OFFSET: usize = 4;

/// Builds one FIT file in memory.
///
/// Construction writes the header with a zero body size and starts a fresh
/// definition registry; [`finish`](Self::finish) patches the body size and
/// appends the file CRC. A writer produces exactly one file.
#[derive(Debug)]
pub struct FitWriter {
    buffer: Vec<u8>,
    registry: DefinitionRegistry,
}

impl Default for FitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FitWriter {
    pub fn new() -> Self {
        let mut buffer = Vec::with_capacity(1024);
        buffer.push(HEADER_SIZE as u8);
        buffer.push(PROTOCOL_VERSION);
        buffer.extend_from_slice(&PROFILE_VERSION.to_le_bytes());
        buffer.extend_from_slice(&[0; 4]); // body size, patched in finish()
        buffer.extend_from_slice(DATA_TYPE);
        // the header CRC stays zero, only the trailing file CRC is used
        buffer.extend_from_slice(&[0; 2]);

        Self {
            buffer,
            registry: DefinitionRegistry::new(),
        }
    }

    /// Bytes written so far, header included.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == HEADER_SIZE
    }

    pub fn ensure_definition(&mut self, kind: MessageKind) -> Result<u8, EncodeError> {
        self.registry.ensure_definition(kind, &mut self.buffer)
    }

    /// Appends a data record, preceded by its definition on first use.
    pub fn write_record(&mut self, record: &DataRecord) -> Result<(), EncodeError> {
        let local_id = self.ensure_definition(record.kind())?;
        self.buffer.push(local_id);
        self.buffer.extend_from_slice(record.payload());
        Ok(())
    }

    pub fn finish(mut self) -> Result<Vec<u8>, EncodeError> {
        let body_size = (self.buffer.len() - HEADER_SIZE) as u64;
        let size_bytes = encode_uint(body_size, 4)?;
        self.buffer[DATA_SIZE_OFFSET..DATA_SIZE_OFFSET + 4].copy_from_slice(&size_bytes);

        let crc = calculate_crc(&self.buffer);
        self.buffer.extend_from_slice(&crc.to_le_bytes());

        tracing::debug!(
            "Finalized FIT file: {} body bytes, {} definitions, crc {:#06x}",
            body_size,
            self.registry.len(),
            crc
        );
        Ok(self.buffer)
    }
}
