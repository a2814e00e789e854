//! Configuration loading and resolution.

use std::path::Path;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

/// Load a `.env` file into the process environment.
///
/// An explicit path must exist and parse. Without one, `./.env` is loaded when
/// present. Returns whether a file was loaded.
pub fn load_env_file(explicit: Option<&Path>) -> Result<bool, dotenvy::Error> {
    match explicit {
        Some(path) => dotenvy::from_path(path).map(|_| true),
        None => match dotenvy::dotenv() {
            Ok(_) => Ok(true),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err),
        },
    }
}

/// Resolve the HTTP listen address.
pub fn resolve_listen_addr(explicit: Option<&str>) -> String {
    if let Some(addr) = explicit {
        return addr.to_string();
    }

    if let Ok(env_addr) = std::env::var("BDI_LISTEN_ADDR") {
        return env_addr;
    }

    DEFAULT_LISTEN_ADDR.to_string()
}
