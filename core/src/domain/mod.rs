//! Domain layer containing the persistent entities of the system.

pub mod entities;

pub use entities::*;
