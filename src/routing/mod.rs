//! Routing module
//!
//! Provides the path-pattern matcher and the per-server registry of
//! route and status handlers.

mod matcher;
mod registry;

pub use matcher::{is_param, match_path, split_path, PathMatch};
pub use registry::{Registry, RouteEntry, RouteTable, StatusEntry};
