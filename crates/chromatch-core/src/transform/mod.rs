//! Transfer configuration.

pub mod params;
