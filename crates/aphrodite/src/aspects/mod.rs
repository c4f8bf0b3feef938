pub mod calculator;
pub mod types;

pub use calculator::{detect_aspects, AspectCalculator};
pub use types::{Aspect, AspectKind, AspectRule, AspectTable, Motion};
