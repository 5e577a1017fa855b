pub mod handler;

pub use handler::{HealthResponse, VersionResponse, get_version, health_check};
