#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    /// Meters along the route from its first point.
    pub cumulative_distance: u64,
    pub name: Option<String>,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            cumulative_distance: 0,
            name: None,
        }
    }

    pub fn named(lat: f64, lon: f64, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(lat, lon)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Route {
    pub name: String,
    pub points: Vec<GeoPoint>,
    /// Points of interest along the route, written as course points.
    pub course_points: Vec<GeoPoint>,
}

impl Route {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaypointSet {
    pub points: Vec<GeoPoint>,
}

impl WaypointSet {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Routes and waypoints read from one GPX document, in document order.
#[derive(Debug, Clone, Default)]
pub struct GpxDocument {
    pub routes: Vec<Route>,
    pub waypoints: WaypointSet,
}

/// North-east and south-west corners enclosing a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub north: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
}

impl Bounds {
    pub fn of(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let start = Bounds {
            north: first.lat,
            east: first.lon,
            south: first.lat,
            west: first.lon,
        };
        Some(points.iter().fold(start, |b, p| Bounds {
            north: b.north.max(p.lat),
            east: b.east.max(p.lon),
            south: b.south.min(p.lat),
            west: b.west.min(p.lon),
        }))
    }
}

/// A finished FIT file together with the name it is stored under.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}
