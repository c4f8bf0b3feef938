pub mod signs;

pub use signs::{degree_in_sign, Element, ZodiacSign};
