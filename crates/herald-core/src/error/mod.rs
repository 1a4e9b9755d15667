//! Error types for Herald
//!
//! Every fallible operation in the crate returns [`HeraldResult`]. Load-time
//! schema violations carry the name of the offending command so a failed
//! startup points straight at the definition that broke it.

mod constructors;
mod conversions;
mod types;

pub use types::{HeraldError, HeraldResult, LoadError};
