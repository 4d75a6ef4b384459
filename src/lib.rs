pub mod config;
pub mod domain;
pub mod embedder;
pub mod error;
pub mod experiment;
pub mod generator;
pub mod loader;
pub mod logger;
pub mod stats;
