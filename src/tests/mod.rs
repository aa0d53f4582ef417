#![warn(clippy::all, clippy::pedantic)]

pub mod config_loader_tests;
pub mod config_tests;
pub mod test_utils;
pub mod time_tests;
