mod plan;
mod trips;

pub use plan::*;
pub use trips::*;
