//! Utility functions for sigshim

pub mod quiet;
pub mod url;

pub use self::quiet::*;
pub use self::url::*;
