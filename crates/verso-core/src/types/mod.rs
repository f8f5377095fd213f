//! Core types for verso.

mod batch;
mod input;
mod operation;
mod record;

pub use batch::*;
pub use input::*;
pub use operation::*;
pub use record::*;
