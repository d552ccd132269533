//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for local resources such as the photo upload directory.

pub mod storage;
