//! aircraft-ingest server: HTTP triggers for snapshot download and staging.

pub mod config;
pub mod transport;
pub mod types;

pub use config::{load_env_file, resolve_listen_addr};
pub use transport::{router, HttpTransport, ServerState};
