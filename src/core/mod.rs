pub mod constants;
pub mod context;
pub mod geometry;

pub use context::SimContext;
pub use geometry::{BoxRect, Rect};
