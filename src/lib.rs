pub mod config;
pub mod error;
pub mod gui;
pub mod logging;
pub mod math;
pub mod model;
