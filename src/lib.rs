#[macro_use]
extern crate log;
#[macro_use]
extern crate derive_builder;

pub mod browser_controller;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod types;
pub mod utils;
