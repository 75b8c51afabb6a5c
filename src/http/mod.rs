//! HTTP protocol layer module
//!
//! Body types, response builders, MIME detection, and request location
//! parsing, decoupled from dispatch logic.

pub mod body;
pub mod location;
pub mod mime;
pub mod response;

pub use body::{FileBody, RequestBody, ResponseBody};
pub use location::{parse_location, parse_params, Location, ParamValue, Params, Query};
pub use response::{
    build_400_response, build_500_response, build_response, POWERED_BY,
};
