//! Name normalization, the persistent alias store, and the signal validator.
//!
//! [`SignalValidator`] resolves relay-specific signal names against a
//! [`StandardCatalog`](relaysig_standards::StandardCatalog), an
//! [`AliasStore`] and optionally a loaded COMTRADE configuration, recording
//! what it learns back into the store.

#![deny(unsafe_code)]

pub mod error;
pub mod normalize;
pub mod store;
pub mod validator;

pub use crate::error::{Result, StoreError};
pub use crate::normalize::{
    DEFAULT_PREFIXES, NameNormalizer, PrefixTrim, extract_component, extract_phase,
};
pub use crate::store::{AliasStore, DEFAULT_STORE_PATH};
pub use crate::validator::{
    ALIAS_CONFIDENCE, COMTRADE_CONFIDENCE, EXACT_CONFIDENCE, HEURISTIC_CONFIDENCE,
    SignalValidator, Suggestion,
};
