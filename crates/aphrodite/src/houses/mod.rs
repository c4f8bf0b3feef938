pub mod placement;
pub mod placidus;
pub mod types;

pub use placement::assign_house;
pub use placidus::compute_cusps;
pub use types::{ChartAngle, ChartAngles, HouseCusp, HouseCusps, HouseSettings, HouseSystem};
