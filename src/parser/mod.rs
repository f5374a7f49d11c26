//! Component 1 – reading the `.tmx` document.
//!
//! Everything here works on the raw text; nothing is validated beyond
//! what the generated C needs.
pub mod grid;
pub mod objects;
pub mod scanner;
pub mod slopes;

pub use grid::load_grid;
pub use objects::load_objects;
pub use slopes::load_slopes;
