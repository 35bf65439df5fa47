//! `housing-lens` library crate.
//!
//! The `housing-lens` binary is a thin eframe wrapper around this library so
//! the aggregation engine and chart adapters are testable without a window.

pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
