//! Pure domain types with minimal dependencies
//!
//! Types here carry no rendering or I/O concerns.

pub mod annotation;
pub mod diagram;
pub mod geometry;
pub mod selection;

pub use annotation::*;
pub use diagram::*;
pub use geometry::*;
pub use selection::*;
