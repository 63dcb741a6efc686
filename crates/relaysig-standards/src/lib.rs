//! Standard signal catalogs.
//!
//! [`ComtradeTemplate`] is the fixed list of standard COMTRADE names.
//! [`CatalogFile`] adds per-relay-model expectations loaded from CSV. Both
//! implement [`StandardCatalog`], the interface the validator consults.

#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod file;
pub mod template;

pub use crate::catalog::{SignalCategory, StandardCatalog, StandardSignal};
pub use crate::error::CatalogError;
pub use crate::file::{CatalogFile, block_kind};
pub use crate::template::ComtradeTemplate;
