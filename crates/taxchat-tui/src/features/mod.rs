//! Feature slices: each owns its state and rendering.

pub mod input;
pub mod starters;
pub mod transcript;
