use chrono::{DateTime, Utc};

use crate::error::EncodeError;
use crate::fit::catalog::MessageKind;
use crate::fit::record::DataRecord;
use crate::fit::writer::FitWriter;
use crate::types::geo::{Bounds, GeoPoint};

/// Timer milliseconds per meter at a walking pace of 4 km/h.
pub const WALKING_MS_PER_METER: u64 = 900;
/// 4 km/h in mm/s.
pub const WALKING_SPEED_MM_PER_S: u64 = 1111;

const SERIAL_NUMBER: u64 = 0xC95D_07C4;
const MANUFACTURER_DEVELOPMENT: u64 = 255;
const PRODUCT: u64 = 3126;
const COURSE_CAPABILITIES: u64 = 0x0203;
const SPORT_HIKING: u64 = 17;
const LOCATION_SYMBOL: u64 = 2991;

const EVENT_TIMER: u64 = 0;
const EVENT_LAP: u64 = 9;
const EVENT_TYPE_START: u64 = 0;
const EVENT_TYPE_STOP: u64 = 1;
const EVENT_TYPE_STOP_ALL: u64 = 4;
const LAP_TRIGGER_SESSION_END: u64 = 7;
const COURSE_POINT_GENERIC: u64 = 0;

const TIMESTAMP: u8 = 253;
const MESSAGE_INDEX: u8 = 254;

mod file_id {
    pub const TYPE: u8 = 0;
    pub const MANUFACTURER: u8 = 1;
    pub const PRODUCT: u8 = 2;
    pub const SERIAL_NUMBER: u8 = 3;
    pub const TIME_CREATED: u8 = 6;
}

mod location {
    pub const NAME: u8 = 0;
    pub const LAT: u8 = 1;
    pub const LON: u8 = 2;
    pub const SYMBOL: u8 = 4;
}

mod course {
    pub const SPORT: u8 = 4;
    pub const NAME: u8 = 5;
    pub const CAPABILITIES: u8 = 6;
}

mod lap {
    pub const EVENT: u8 = 0;
    pub const EVENT_TYPE: u8 = 1;
    pub const START_TIME: u8 = 2;
    pub const START_LAT: u8 = 3;
    pub const START_LON: u8 = 4;
    pub const END_LAT: u8 = 5;
    pub const END_LON: u8 = 6;
    pub const TOTAL_TIMER_TIME: u8 = 8;
    pub const TOTAL_DISTANCE: u8 = 9;
    pub const AVG_SPEED: u8 = 13;
    pub const LAP_TRIGGER: u8 = 24;
    pub const NEC_LAT: u8 = 27;
    pub const NEC_LON: u8 = 28;
    pub const SWC_LAT: u8 = 29;
    pub const SWC_LON: u8 = 30;
}

mod event {
    pub const EVENT: u8 = 0;
    pub const EVENT_TYPE: u8 = 1;
    pub const DATA: u8 = 3;
    pub const EVENT_GROUP: u8 = 4;
}

mod record {
    pub const LAT: u8 = 0;
    pub const LON: u8 = 1;
    pub const DISTANCE: u8 = 5;
}

mod course_point {
    pub const TIMESTAMP: u8 = 1;
    pub const LAT: u8 = 2;
    pub const LON: u8 = 3;
    pub const DISTANCE: u8 = 4;
    pub const TYPE: u8 = 5;
    pub const NAME: u8 = 6;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FileType {
    Course = 6,
    Waypoints = 8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Start,
    Stop,
}

/// Summary of a whole course, written as its single lap.
#[derive(Debug, Clone)]
pub struct LapSummary<'a> {
    pub time: DateTime<Utc>,
    pub start: &'a GeoPoint,
    pub end: &'a GeoPoint,
    pub bounds: Bounds,
    /// Total distance in meters.
    pub distance: u64,
}

fn centimeters(meters: u64) -> u64 {
    meters.saturating_mul(100)
}

impl FitWriter {
    pub fn file_id(
        &mut self,
        file_type: FileType,
        time_created: DateTime<Utc>,
    ) -> Result<(), EncodeError> {
        let mut data = DataRecord::new(MessageKind::FileId);
        data.set_uint(file_id::SERIAL_NUMBER, SERIAL_NUMBER)?
            .set_timestamp(file_id::TIME_CREATED, time_created)?
            .set_uint(file_id::MANUFACTURER, MANUFACTURER_DEVELOPMENT)?
            .set_uint(file_id::PRODUCT, PRODUCT)?
            .set_uint(file_id::TYPE, file_type as u64)?;
        self.write_record(&data)
    }

    /// Writes waypoint number `index`; unnamed points get an empty name.
    pub fn location(&mut self, index: u16, point: &GeoPoint) -> Result<(), EncodeError> {
        let mut data = DataRecord::new(MessageKind::Location);
        data.set_string(location::NAME, point.name.as_deref().unwrap_or_default())?
            .set_coord(location::LAT, point.lat)?
            .set_coord(location::LON, point.lon)?
            .set_uint(MESSAGE_INDEX, index as u64)?
            .set_uint(location::SYMBOL, LOCATION_SYMBOL)?;
        self.write_record(&data)
    }

    pub fn course(&mut self, name: &str) -> Result<(), EncodeError> {
        let mut data = DataRecord::new(MessageKind::Course);
        data.set_string(course::NAME, name)?
            .set_uint(course::CAPABILITIES, COURSE_CAPABILITIES)?
            .set_uint(course::SPORT, SPORT_HIKING)?;
        self.write_record(&data)
    }

    pub fn lap(&mut self, summary: &LapSummary<'_>) -> Result<(), EncodeError> {
        let mut data = DataRecord::new(MessageKind::Lap);
        data.set_timestamp(TIMESTAMP, summary.time)?
            .set_timestamp(lap::START_TIME, summary.time)?
            .set_coord(lap::START_LAT, summary.start.lat)?
            .set_coord(lap::START_LON, summary.start.lon)?
            .set_coord(lap::END_LAT, summary.end.lat)?
            .set_coord(lap::END_LON, summary.end.lon)?
            .set_uint(
                lap::TOTAL_TIMER_TIME,
                summary.distance.saturating_mul(WALKING_MS_PER_METER),
            )?
            .set_uint(lap::TOTAL_DISTANCE, centimeters(summary.distance))?
            .set_coord(lap::NEC_LAT, summary.bounds.north)?
            .set_coord(lap::NEC_LON, summary.bounds.east)?
            .set_coord(lap::SWC_LAT, summary.bounds.south)?
            .set_coord(lap::SWC_LON, summary.bounds.west)?
            .set_uint(MESSAGE_INDEX, 0)?
            .set_uint(lap::AVG_SPEED, WALKING_SPEED_MM_PER_S)?
            .set_uint(lap::EVENT, EVENT_LAP)?
            .set_uint(lap::EVENT_TYPE, EVENT_TYPE_STOP)?
            .set_uint(lap::LAP_TRIGGER, LAP_TRIGGER_SESSION_END)?;
        self.write_record(&data)
    }

    pub fn event(&mut self, kind: TimerEvent, time: DateTime<Utc>) -> Result<(), EncodeError> {
        let event_type = match kind {
            TimerEvent::Start => EVENT_TYPE_START,
            TimerEvent::Stop => EVENT_TYPE_STOP_ALL,
        };

        let mut data = DataRecord::new(MessageKind::Event);
        data.set_timestamp(TIMESTAMP, time)?
            .set_uint(event::DATA, 0)?
            .set_uint(event::EVENT, EVENT_TIMER)?
            .set_uint(event::EVENT_TYPE, event_type)?
            .set_uint(event::EVENT_GROUP, 0)?;
        self.write_record(&data)
    }

    pub fn record(&mut self, time: DateTime<Utc>, point: &GeoPoint) -> Result<(), EncodeError> {
        let mut data = DataRecord::new(MessageKind::Record);
        data.set_timestamp(TIMESTAMP, time)?
            .set_coord(record::LAT, point.lat)?
            .set_coord(record::LON, point.lon)?
            .set_uint(record::DISTANCE, centimeters(point.cumulative_distance))?;
        self.write_record(&data)
    }

    pub fn course_point(
        &mut self,
        time: DateTime<Utc>,
        point: &GeoPoint,
    ) -> Result<(), EncodeError> {
        let mut data = DataRecord::new(MessageKind::CoursePoint);
        data.set_timestamp(course_point::TIMESTAMP, time)?
            .set_coord(course_point::LAT, point.lat)?
            .set_coord(course_point::LON, point.lon)?
            .set_uint(
                course_point::DISTANCE,
                centimeters(point.cumulative_distance),
            )?
            .set_string(course_point::NAME, point.name.as_deref().unwrap_or_default())?
            .set_uint(course_point::TYPE, COURSE_POINT_GENERIC)?;
        self.write_record(&data)
    }
}
