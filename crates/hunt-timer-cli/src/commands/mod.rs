pub mod config;
pub mod estimate;
pub mod timer;
