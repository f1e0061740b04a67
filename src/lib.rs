pub mod log_init;

pub use cssvars::*;
