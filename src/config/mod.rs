// src/config/mod.rs
//! Service-level configuration. Engine constants are compiled in (see `features`).

pub mod service;

pub use service::{ExtractorKind, ServiceConfig};
