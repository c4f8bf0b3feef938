pub mod assembler;
pub mod birth;
pub mod natal;

pub use assembler::ChartAssembler;
pub use birth::{BirthData, ChartId};
pub use natal::{AnglePoint, NatalChart, PlacedBody};
