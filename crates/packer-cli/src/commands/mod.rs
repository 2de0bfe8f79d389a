//! Entry points for each mode of the binary.

pub mod completion;
pub mod list;
pub mod pack;
