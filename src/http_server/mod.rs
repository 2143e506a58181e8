//! # sharemap HTTP configuration API
//!
//! Serves one schema section to browser front ends and forwards validated
//! configurations to a radio as single UDP frames.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/schema`, `/api/layout`, `/api/defaults`, `/api/groups` - introspection
//! - `/api/validate` - advisory validation of a candidate configuration
//! - `/api/send` - validate, convert, pack and send one frame
//! - `/export` - defaults as a downloadable JSON file

pub mod config;
mod errors;
mod routes;
pub mod server;

pub use config::ServerConfig;
pub use errors::{ServerError, ServerResult};
pub use routes::{sharemap_routes, SharemapState};
pub use server::HttpServer;
