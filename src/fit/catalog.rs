use std::fmt;
use std::str::FromStr;

use crate::error::EncodeError;

/// FIT base types used by the catalog, tagged with their on-wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BaseType {
    Enum = 0x00,
    SInt8 = 0x01,
    UInt8 = 0x02,
    String = 0x07,
    SInt16 = 0x83,
    UInt16 = 0x84,
    SInt32 = 0x85,
    UInt32 = 0x86,
    UInt32z = 0x8C,
}

impl BaseType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Bytes of one element of this type.
    pub fn element_size(self) -> usize {
        match self {
            BaseType::Enum | BaseType::SInt8 | BaseType::UInt8 | BaseType::String => 1,
            BaseType::SInt16 | BaseType::UInt16 => 2,
            BaseType::SInt32 | BaseType::UInt32 | BaseType::UInt32z => 4,
        }
    }

    /// Little-endian "invalid" sentinel for one element.
    pub fn invalid_value(self) -> &'static [u8] {
        match self {
            BaseType::Enum | BaseType::UInt8 => &[0xFF],
            BaseType::SInt8 => &[0x7F],
            BaseType::String => &[0x00],
            BaseType::SInt16 => &[0xFF, 0x7F],
            BaseType::UInt16 => &[0xFF, 0xFF],
            BaseType::SInt32 => &[0xFF, 0xFF, 0xFF, 0x7F],
            BaseType::UInt32 => &[0xFF, 0xFF, 0xFF, 0xFF],
            BaseType::UInt32z => &[0x00, 0x00, 0x00, 0x00],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub number: u8,
    pub size: u8,
    pub base_type: BaseType,
}

const fn field(number: u8, size: u8, base_type: BaseType) -> FieldDef {
    FieldDef {
        number,
        size,
        base_type,
    }
}

#[derive(Debug)]
pub struct MessageDefinition {
    pub global_number: u16,
    pub fields: &'static [FieldDef],
}

impl MessageDefinition {
    /// Size of one data record payload, excluding the record header byte.
    pub fn payload_size(&self) -> usize {
        self.fields.iter().map(|f| f.size as usize).sum()
    }

    /// Byte range of `number` inside the payload.
    pub fn field_span(&self, number: u8) -> Option<(usize, &FieldDef)> {
        let mut offset = 0;
        for def in self.fields {
            if def.number == number {
                return Some((offset, def));
            }
            offset += def.size as usize;
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    FileId,
    Location,
    Course,
    Lap,
    Event,
    Record,
    CoursePoint,
}

impl MessageKind {
    pub const ALL: [MessageKind; 7] = [
        MessageKind::FileId,
        MessageKind::Location,
        MessageKind::Course,
        MessageKind::Lap,
        MessageKind::Event,
        MessageKind::Record,
        MessageKind::CoursePoint,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MessageKind::FileId => "file_id",
            MessageKind::Location => "location",
            MessageKind::Course => "course",
            MessageKind::Lap => "lap",
            MessageKind::Event => "event",
            MessageKind::Record => "record",
            MessageKind::CoursePoint => "course_point",
        }
    }

    pub fn definition(self) -> &'static MessageDefinition {
        match self {
            MessageKind::FileId => &FILE_ID,
            MessageKind::Location => &LOCATION,
            MessageKind::Course => &COURSE,
            MessageKind::Lap => &LAP,
            MessageKind::Event => &EVENT,
            MessageKind::Record => &RECORD,
            MessageKind::CoursePoint => &COURSE_POINT,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MessageKind {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| EncodeError::UnknownMessage(s.to_string()))
    }
}

static FILE_ID: MessageDefinition = MessageDefinition {
    global_number: 0,
    fields: layouts::FILE_ID_FIELDS,
};

static LOCATION: MessageDefinition = MessageDefinition {
    global_number: 29,
    fields: layouts::LOCATION_FIELDS,
};

static COURSE: MessageDefinition = MessageDefinition {
    global_number: 31,
    fields: layouts::COURSE_FIELDS,
};

static LAP: MessageDefinition = MessageDefinition {
    global_number: 19,
    fields: layouts::LAP_FIELDS,
};

static EVENT: MessageDefinition = MessageDefinition {
    global_number: 21,
    fields: layouts::EVENT_FIELDS,
};

static RECORD: MessageDefinition = MessageDefinition {
    global_number: 20,
    fields: layouts::RECORD_FIELDS,
};

static COURSE_POINT: MessageDefinition = MessageDefinition {
    global_number: 32,
    fields: layouts::COURSE_POINT_FIELDS,
};

// Field order and widths fix the byte layout of every data record.
mod layouts {
    use super::BaseType::*;
    use super::{field, FieldDef};

    pub(super) const FILE_ID_FIELDS: &[FieldDef] = &[
        field(3, 4, UInt32z),
        field(6, 4, UInt32),
        field(7, 4, UInt32),
        field(1, 2, UInt16),
        field(2, 2, UInt16),
        field(5, 2, UInt16),
        field(0, 1, Enum),
    ];

    pub(super) const LOCATION_FIELDS: &[FieldDef] = &[
        field(253, 4, UInt32),
        field(0, 16, String),
        field(1, 4, SInt32),
        field(2, 4, SInt32),
        field(254, 2, UInt16),
        field(3, 2, UInt16),
        field(4, 2, UInt16),
        field(5, 2, UInt16),
    ];

    pub(super) const COURSE_FIELDS: &[FieldDef] = &[
        field(5, 16, String),
        field(6, 4, UInt32z),
        field(4, 1, Enum),
    ];

    pub(super) const LAP_FIELDS: &[FieldDef] = &[
        field(253, 4, UInt32),
        field(2, 4, UInt32),
        field(3, 4, SInt32),
        field(4, 4, SInt32),
        field(5, 4, SInt32),
        field(6, 4, SInt32),
        field(7, 4, UInt32),
        field(8, 4, UInt32),
        field(9, 4, UInt32),
        field(10, 4, UInt32),
        field(27, 4, SInt32),
        field(28, 4, SInt32),
        field(29, 4, SInt32),
        field(30, 4, SInt32),
        field(41, 4, UInt32),
        field(70, 4, UInt32),
        field(98, 4, UInt32),
        field(102, 4, UInt8),
        field(103, 4, UInt8),
        field(104, 4, UInt8),
        field(105, 4, UInt8),
        field(106, 4, UInt16),
        field(107, 4, UInt16),
        field(110, 4, UInt32),
        field(111, 4, UInt32),
        field(112, 4, UInt32),
        field(113, 4, UInt32),
        field(114, 4, UInt32),
        field(254, 2, UInt16),
        field(11, 2, UInt16),
        field(12, 2, UInt16),
        field(13, 2, UInt16),
        field(14, 2, UInt16),
        field(19, 2, UInt16),
        field(20, 2, UInt16),
        field(21, 2, UInt16),
        field(22, 2, UInt16),
        field(32, 2, UInt16),
        field(33, 2, UInt16),
        field(34, 2, UInt16),
        field(35, 2, UInt16),
        field(37, 2, UInt16),
        field(40, 2, UInt16),
        field(71, 2, UInt16),
        field(73, 2, UInt16),
        field(77, 2, UInt16),
        field(78, 2, UInt16),
        field(79, 2, UInt16),
        field(90, 2, UInt16),
        field(96, 2, UInt16),
        field(97, 2, UInt16),
        field(99, 2, UInt16),
        field(118, 2, UInt16),
        field(119, 2, UInt16),
        field(120, 2, UInt16),
        field(125, 2, UInt16),
        field(126, 2, UInt16),
        field(136, 2, UInt16),
        field(137, 2, UInt16),
        field(155, 2, UInt16),
        field(0, 1, Enum),
        field(1, 1, Enum),
        field(15, 1, UInt8),
        field(16, 1, UInt8),
        field(17, 1, UInt8),
        field(18, 1, UInt8),
        field(23, 1, Enum),
        field(24, 1, Enum),
        field(25, 1, Enum),
        field(26, 1, UInt8),
        field(38, 1, Enum),
        field(39, 1, Enum),
        field(50, 1, SInt8),
        field(51, 1, SInt8),
        field(72, 1, Enum),
        field(80, 1, UInt8),
        field(81, 1, UInt8),
        field(82, 1, UInt8),
        field(91, 1, UInt8),
        field(92, 1, UInt8),
        field(93, 1, UInt8),
        field(94, 1, UInt8),
        field(95, 1, UInt8),
        field(100, 1, SInt8),
        field(101, 1, SInt8),
        field(108, 2, UInt8),
        field(109, 2, UInt8),
        field(124, 1, SInt8),
    ];

    pub(super) const EVENT_FIELDS: &[FieldDef] = &[
        field(253, 4, UInt32),
        field(3, 4, UInt32),
        field(0, 1, Enum),
        field(1, 1, Enum),
        field(4, 1, UInt8),
        field(19, 1, UInt8),
        field(20, 1, UInt8),
    ];

    pub(super) const RECORD_FIELDS: &[FieldDef] = &[
        field(253, 4, UInt32),
        field(0, 4, SInt32),
        field(1, 4, SInt32),
        field(5, 4, UInt32),
        field(11, 4, SInt32),
        field(29, 4, UInt32),
        field(73, 4, UInt32),
        field(74, 4, UInt32),
        field(75, 4, UInt32),
        field(76, 4, UInt32),
        field(77, 4, UInt32),
        field(78, 4, UInt32),
        field(79, 4, UInt32),
        field(80, 4, UInt32),
        field(2, 2, UInt16),
        field(6, 2, UInt16),
        field(7, 2, UInt16),
        field(39, 2, UInt16),
        field(40, 2, UInt16),
        field(41, 2, UInt16),
        field(54, 2, UInt16),
        field(57, 2, UInt16),
        field(61, 2, UInt16),
        field(63, 2, UInt16),
        field(64, 2, UInt16),
        field(65, 2, UInt16),
        field(66, 2, SInt16),
        field(83, 2, UInt16),
        field(84, 2, UInt16),
        field(85, 2, UInt16),
        field(87, 2, UInt16),
        field(88, 2, UInt16),
        field(108, 2, UInt16),
        field(116, 2, UInt16),
        field(3, 1, UInt8),
        field(4, 1, UInt8),
        field(13, 1, SInt8),
        field(18, 1, UInt8),
        field(30, 1, UInt8),
        field(42, 1, Enum),
        field(43, 1, UInt8),
        field(44, 1, UInt8),
        field(45, 1, UInt8),
        field(46, 1, UInt8),
        field(47, 1, UInt8),
        field(53, 1, UInt8),
        field(67, 1, SInt8),
        field(68, 1, SInt8),
        field(69, 2, UInt8),
        field(70, 2, UInt8),
        field(71, 2, UInt8),
        field(72, 2, UInt8),
        field(90, 1, SInt8),
        field(136, 1, UInt8),
    ];

    pub(super) const COURSE_POINT_FIELDS: &[FieldDef] = &[
        field(1, 4, UInt32),
        field(2, 4, SInt32),
        field(3, 4, SInt32),
        field(4, 4, UInt32),
        field(6, 16, String),
        field(254, 2, UInt16),
        field(5, 1, Enum),
        field(7, 33, String),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_sizes_match_protocol_layouts() {
        let sizes: Vec<(MessageKind, usize, usize)> = MessageKind::ALL
            .into_iter()
            .map(|kind| {
                let def = kind.definition();
                (kind, def.fields.len(), def.payload_size())
            })
            .collect();

        assert_eq!(
            sizes,
            vec![
                (MessageKind::FileId, 7, 19),
                (MessageKind::Location, 8, 36),
                (MessageKind::Course, 3, 21),
                (MessageKind::Lap, 88, 206),
                (MessageKind::Event, 7, 13),
                (MessageKind::Record, 54, 120),
                (MessageKind::CoursePoint, 8, 68),
            ]
        );
    }

    #[test]
    fn field_sizes_are_whole_elements() {
        for kind in MessageKind::ALL {
            for def in kind.definition().fields {
                assert_eq!(
                    def.size as usize % def.base_type.element_size(),
                    0,
                    "{kind} field {}",
                    def.number
                );
            }
        }
    }

    #[test]
    fn field_numbers_are_unique_per_message() {
        for kind in MessageKind::ALL {
            let fields = kind.definition().fields;
            let mut numbers: Vec<u8> = fields.iter().map(|f| f.number).collect();
            numbers.sort_unstable();
            numbers.dedup();
            assert_eq!(numbers.len(), fields.len(), "{kind}");
        }
    }

    #[test]
    fn field_span_accumulates_offsets() {
        let location = MessageKind::Location.definition();
        let (offset, def) = location.field_span(1).expect("latitude");
        assert_eq!(offset, 20);
        assert_eq!(def.base_type, BaseType::SInt32);
        assert!(location.field_span(42).is_none());
    }

    #[test]
    fn names_parse_back_to_kinds() {
        for kind in MessageKind::ALL {
            assert_eq!(kind.name().parse::<MessageKind>().unwrap(), kind);
        }
        assert!(matches!(
            "waypoint".parse::<MessageKind>(),
            Err(EncodeError::UnknownMessage(name)) if name == "waypoint"
        ));
    }
}
