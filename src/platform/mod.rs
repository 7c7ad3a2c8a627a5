//! Player script access and signature deciphering

pub mod cipher;
pub mod extractor;
pub mod player;

pub use cipher::*;
pub use extractor::*;
pub use player::*;
