pub mod golden;
pub mod harness;
