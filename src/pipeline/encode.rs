use chrono::{DateTime, Utc};

use crate::error::EncodeError;
use crate::fit::{FileType, FitWriter, LapSummary, TimerEvent};
use crate::pipeline::distance::accumulate_route_distances;
use crate::types::geo::{Bounds, Route, WaypointSet};

/// Encodes a route as a FIT course file.
///
/// Body order: file id, course, lap, start event, one record per route
/// point, stop event, then any course points. Returns `Ok(None)` for a route
/// without points.
pub fn encode_course(
    route: &mut Route,
    time: DateTime<Utc>,
) -> Result<Option<Vec<u8>>, EncodeError> {
    let total = accumulate_route_distances(&mut route.points);
    let (Some(start), Some(end), Some(bounds)) = (
        route.points.first(),
        route.points.last(),
        Bounds::of(&route.points),
    ) else {
        return Ok(None);
    };

    let mut writer = FitWriter::new();
    writer.file_id(FileType::Course, time)?;
    writer.course(&route.name)?;
    writer.lap(&LapSummary {
        time,
        start,
        end,
        bounds,
        distance: total,
    })?;
    writer.event(TimerEvent::Start, time)?;
    for point in &route.points {
        writer.record(time, point)?;
    }
    writer.event(TimerEvent::Stop, time)?;
    for point in &route.course_points {
        writer.course_point(time, point)?;
    }

    tracing::debug!(
        "Encoded course {:?}: {} points, {} m",
        route.name,
        route.points.len(),
        total
    );
    writer.finish().map(Some)
}

/// Encodes all waypoints as one FIT locations file, indexed in input order.
pub fn encode_waypoints(
    waypoints: &WaypointSet,
    time: DateTime<Utc>,
) -> Result<Option<Vec<u8>>, EncodeError> {
    if waypoints.is_empty() {
        return Ok(None);
    }

    let mut writer = FitWriter::new();
    writer.file_id(FileType::Waypoints, time)?;
    for (index, point) in waypoints.points.iter().enumerate() {
        let index = u16::try_from(index).map_err(|_| EncodeError::ValueOutOfRange {
            value: index as u64,
            width: 2,
        })?;
        writer.location(index, point)?;
    }

    tracing::debug!("Encoded {} waypoints", waypoints.len());
    writer.finish().map(Some)
}
