//! URL handling module
//!
//! This module provides URL canonicalization, used both as the de-duplication
//! key for the visited set and for same-host comparison.

mod host;
mod normalize;

pub use host::{host_of, is_same_host};
pub use normalize::{normalize, normalize_url};
