//! Hidden ghost position and its relocation rule.

mod inquired;
mod mover;

pub use inquired::InquiredSet;
pub use mover::{DEFAULT_MOVEMENT_THRESHOLD, GhostMover, MoverState, Relocation, RelocationPolicy};
