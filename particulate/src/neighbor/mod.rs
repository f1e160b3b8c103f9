mod build;
mod crs;
mod kind;

pub use build::*;
pub use crs::*;
pub use kind::*;
