pub mod config;
pub mod outputs;
pub mod preview;
pub mod render;
