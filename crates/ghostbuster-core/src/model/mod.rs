pub mod bucket;
pub mod cell;
pub mod color;
pub mod grid;
