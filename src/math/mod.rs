pub mod geometry;
pub mod projection;
pub mod tween;
