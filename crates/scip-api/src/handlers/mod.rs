//! Handlers module - organized by resource

pub mod audit;
pub mod contracts;
pub mod health;
pub mod users;

pub use audit::*;
pub use contracts::*;
pub use health::*;
pub use users::*;
