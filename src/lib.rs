// src/lib.rs — Library root for Ghostquill

pub mod content;
pub mod infra;
pub mod provider;
