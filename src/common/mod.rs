//! Miscellaneous common structs used throughout the library.

mod node;
mod position;

pub use node::*;
pub use position::*;
