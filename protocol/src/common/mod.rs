pub mod model;
pub mod task;

pub use model::*;
pub use task::*;
