pub mod blit;
pub mod rect;
