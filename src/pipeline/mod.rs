pub mod batch;
pub mod convert;
pub mod distance;
pub mod encode;
pub mod parse;
