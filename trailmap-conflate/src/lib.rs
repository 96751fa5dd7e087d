pub mod algorithm;
pub mod config;
pub mod model;
pub mod pipeline;
