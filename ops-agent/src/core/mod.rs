//! Configuration, logging, and the wired service graph

pub mod config;
pub mod logger;
pub mod state;
