use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;
use crate::pipeline::parse::Parser;
use crate::types::geo::{GeoPoint, GpxDocument, Route};

pub struct GpxParser;

/// Where the reader currently is, relative to the document root.
enum Scope {
    Route(Route),
    Waypoint(GeoPoint),
}

impl Parser for GpxParser {
    fn parse(&self, bytes: &[u8]) -> Result<GpxDocument, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut document = GpxDocument::default();
        let mut path: Vec<String> = Vec::new();
        let mut scope: Option<Scope> = None;
        let mut seen_root = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = local_name(&e)?;
                    seen_root = true;
                    open_element(&name, &e, path.len(), &mut scope)?;
                    path.push(name);
                }
                Ok(Event::Empty(e)) => {
                    let name = local_name(&e)?;
                    seen_root = true;
                    open_element(&name, &e, path.len(), &mut scope)?;
                    if path.len() == 1 {
                        close_scope(&mut document, scope.take());
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                    set_name(&path, &mut scope, &text);
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e);
                    set_name(&path, &mut scope, text.trim());
                }
                Ok(Event::End(_)) => {
                    path.pop();
                    if path.len() == 1 {
                        close_scope(&mut document, scope.take());
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::InvalidGpx(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if !seen_root {
            return Err(ParseError::InvalidGpx("no root element".to_string()));
        }

        Ok(document)
    }
}

fn local_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    let name = e.local_name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_string)
        .map_err(|e| ParseError::InvalidGpx(e.to_string()))
}

/// Handles the start of an element found at `depth` (the root is depth 0).
fn open_element(
    name: &str,
    e: &BytesStart<'_>,
    depth: usize,
    scope: &mut Option<Scope>,
) -> Result<(), ParseError> {
    match (depth, name) {
        (1, "rte") => *scope = Some(Scope::Route(Route::default())),
        (1, "wpt") => {
            let (lat, lon) = coordinates(e)?;
            *scope = Some(Scope::Waypoint(GeoPoint::new(lat, lon)));
        }
        (2, "rtept") => {
            if let Some(Scope::Route(route)) = scope {
                let (lat, lon) = coordinates(e)?;
                route.points.push(GeoPoint::new(lat, lon));
            }
        }
        _ => {}
    }
    Ok(())
}

/// `<name>` only counts as a direct child of `<rte>` or `<wpt>`.
fn set_name(path: &[String], scope: &mut Option<Scope>, text: &str) {
    if path.len() != 3 || path[2] != "name" || text.is_empty() {
        return;
    }
    match scope {
        Some(Scope::Route(route)) => route.name = text.to_string(),
        Some(Scope::Waypoint(point)) => point.name = Some(text.to_string()),
        None => {}
    }
}

fn close_scope(document: &mut GpxDocument, scope: Option<Scope>) {
    match scope {
        Some(Scope::Route(mut route)) => {
            if route.name.is_empty() {
                let numbered = document.routes.iter().filter(|r| !r.is_empty()).count();
                route.name = format!("R{:03}", numbered + 1);
            }
            document.routes.push(route);
        }
        Some(Scope::Waypoint(mut point)) => {
            if point.name.is_none() {
                point.name = Some(format!("W{:03}", document.waypoints.len() + 1));
            }
            document.waypoints.points.push(point);
        }
        None => {}
    }
}

fn coordinates(e: &BytesStart<'_>) -> Result<(f64, f64), ParseError> {
    let mut lat = None;
    let mut lon = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let value = std::str::from_utf8(&attr.value)
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

        let target = match key {
            "lat" => &mut lat,
            "lon" => &mut lon,
            _ => continue,
        };
        let parsed: f64 = value.trim().parse().map_err(|_| {
            ParseError::InvalidGpx(format!("invalid {} attribute: {:?}", key, value))
        })?;
        let limit = if key == "lat" { 90.0 } else { 180.0 };
        if !parsed.is_finite() || parsed.abs() > limit {
            return Err(ParseError::InvalidGpx(format!(
                "{} out of range: {:?}",
                key, value
            )));
        }
        *target = Some(parsed);
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok((lat, lon)),
        _ => Err(ParseError::InvalidGpx(
            "point without lat/lon attributes".to_string(),
        )),
    }
}
