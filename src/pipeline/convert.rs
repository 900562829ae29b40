use chrono::{DateTime, Utc};

use crate::error::EncodeError;
use crate::pipeline::encode::{encode_course, encode_waypoints};
use crate::types::geo::{GpxDocument, OutputFile};

/// Name of the FIT file for the `number`-th non-empty route (1-based).
pub fn course_file_name(base_name: &str, number: usize) -> String {
    format!("{}-rt{:02}.fit", base_name, number)
}

pub fn waypoint_file_name(base_name: &str) -> String {
    format!("{}-wpts.fit", base_name)
}

/// Strips a trailing `.gpx` (any case) from an uploaded file name.
pub fn gpx_base_name(filename: &str) -> Option<&str> {
    let (base, ext) = filename.rsplit_once('.')?;
    (ext.eq_ignore_ascii_case("gpx") && !base.is_empty()).then_some(base)
}

/// Converts one parsed document into its FIT files.
///
/// Every non-empty route becomes a course file, numbered in document order;
/// all waypoints together become one locations file, written last.
pub fn convert_document(
    mut document: GpxDocument,
    base_name: &str,
    time: DateTime<Utc>,
) -> Result<Vec<OutputFile>, EncodeError> {
    let mut files = Vec::new();

    for route in document.routes.iter_mut() {
        if let Some(bytes) = encode_course(route, time)? {
            files.push(OutputFile {
                name: course_file_name(base_name, files.len() + 1),
                bytes,
            });
        }
    }

    if let Some(bytes) = encode_waypoints(&document.waypoints, time)? {
        files.push(OutputFile {
            name: waypoint_file_name(base_name),
            bytes,
        });
    }

    Ok(files)
}
