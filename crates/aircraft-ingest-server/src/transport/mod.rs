//! Transport layer: the HTTP server exposing the trigger operations.

pub mod http;

pub use http::{router, HttpTransport, ServerState};
