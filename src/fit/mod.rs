pub mod catalog;
pub mod crc;
pub mod encode;
pub mod messages;
pub mod record;
pub mod registry;
pub mod writer;

pub use catalog::{BaseType, FieldDef, MessageDefinition, MessageKind};
pub use crc::calculate_crc;
pub use messages::{FileType, LapSummary, TimerEvent};
pub use record::DataRecord;
pub use registry::DefinitionRegistry;
pub use writer::{FitWriter, HEADER_SIZE};
