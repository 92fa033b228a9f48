//! Interpreter for station test fixtures: loads a suite of scripted tests,
//! replays each one against a fresh model of the timing station and reports
//! the outcome per test.

#[macro_use]
extern crate log;

#[macro_use]
extern crate derive_builder;

pub mod app;
pub mod configuration;
pub mod connection;
pub mod device;
pub mod error;
pub mod random;
pub mod reporter;
pub mod time;
