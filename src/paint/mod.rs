pub mod color;
pub mod cycle;
