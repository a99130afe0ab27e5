mod plan;
mod trip;

pub use plan::*;
pub use trip::*;
