// src/content/mod.rs — Board content generation

pub mod audit;
pub mod prompt;
pub mod service;
pub mod store;
pub mod types;
