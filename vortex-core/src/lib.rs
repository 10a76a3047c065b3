pub mod client;
pub mod error;
pub mod observability;
pub mod types;

pub use client::{HttpVortexClient, VortexClient, VortexSettings};
pub use error::ClientError;
