pub mod config;
pub mod error;
pub mod fit;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod types;
