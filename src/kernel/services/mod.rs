//! Services layer (ports + adapters).
//!
//! - `ports`: contracts the workspace core is written against.
//! - `adapters`: OS/runtime specific implementations (IO/async).

pub mod adapters;
pub mod ports;
