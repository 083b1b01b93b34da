//! Rendering of grid state for plain-text surfaces.

pub mod table;

pub use table::render_table;
