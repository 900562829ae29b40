mod gpx;

use crate::error::ParseError;
use crate::types::geo::GpxDocument;

pub trait Parser {
    fn parse(&self, bytes: &[u8]) -> Result<GpxDocument, ParseError>;
}

pub fn parse(bytes: &[u8]) -> Result<GpxDocument, ParseError> {
    gpx::GpxParser.parse(bytes)
}
