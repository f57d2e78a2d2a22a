//! Shared primitive types.
mod batch;
pub use batch::*;

mod contracts;
pub use contracts::*;

mod signature;
pub use signature::*;

mod transaction;
pub use transaction::*;
