//! Definitions used to describe the layout of a PLY file.

mod ply_data_structure;
mod key_map;
mod property;

pub use self::ply_data_structure::*;
pub use self::key_map::*;
pub use self::property::*;
