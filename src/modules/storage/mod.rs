//! Storage module for uploaded photos
//!
//! Provides the filesystem-backed photo store used by the UMKM feature.

mod photo_store;

pub use photo_store::PhotoStore;
