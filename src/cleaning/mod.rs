pub mod licenses;

pub use licenses::*;
