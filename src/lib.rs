//! poison-demo - a test harness that drives a fixed table through PostgreSQL
//! or MySQL and prints results in a binary-safe form.
//!
//! This library exposes the core modules for use in integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod render;
