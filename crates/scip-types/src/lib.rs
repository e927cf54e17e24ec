pub mod contract;
pub mod structure;
pub mod validation;
pub mod visualization;

pub use contract::*;
pub use structure::*;
pub use validation::*;
pub use visualization::*;
