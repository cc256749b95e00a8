pub mod buffer;
pub mod tables;
