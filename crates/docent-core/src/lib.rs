//! Configuration and bootstrap for the Docent components.

pub mod bootstrap;
pub mod config;
