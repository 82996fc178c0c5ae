//! Transform pipeline — filter parameters, the pixel engine, composites, and
//! spatial pass-throughs.

pub mod composite;
pub mod evaluate;
pub mod kernel;
pub mod params;
