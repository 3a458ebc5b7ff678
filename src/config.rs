//! Settings: the serde schema and the layered loader (defaults, then the
//! TOML file, then `CADENCE__*` environment variables).

mod load;
mod schema;

pub use load::default_log_path;
pub use schema::*;
