//! Core invocation model for sigshim

pub mod invocation;

pub use invocation::*;
