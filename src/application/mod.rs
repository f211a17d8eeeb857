// Application layer - the operations a caller (CLI, menu, tests) invokes.
// Name and amount rules are enforced here; the storage layer guards
// atomicity and the balance bounds.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
