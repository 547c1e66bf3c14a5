//! # Catsync Model
//!
//! Catalogue resource types and the sync action vocabulary for catsync.
//!
//! This crate provides:
//! - `SyncAction` with its HTTP method and expected-status mapping
//! - The `CatalogueResource` trait implemented by every mirrored type
//! - Wire types for the built-in catalogue resources
//!
//! This is a pure model crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod resource;

pub use action::{Method, SyncAction};
pub use resource::{
    CatalogueResource, Datasource, Provider, Service, TrainingResource, VerifyState,
};
