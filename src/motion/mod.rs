pub mod collection;
pub mod point;
