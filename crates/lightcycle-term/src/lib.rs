pub mod config;
pub mod error;
pub mod raster;
pub mod terminal;
