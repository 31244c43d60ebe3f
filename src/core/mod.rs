pub mod bounds;
pub mod config;
pub mod constants;
pub mod geo;
pub mod lod;
pub mod map;
pub mod transform;
pub mod viewport;
