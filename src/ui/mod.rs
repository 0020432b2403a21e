//! Terminal rendering

pub mod helpers;
pub mod markdown;
pub mod render;
pub mod theme;

pub use render::render;
