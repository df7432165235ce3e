//! impls-lens library: "impls" lenses on Go interface methods, with
//! navigation to their implementations and a container-aware debug launch.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod server;
