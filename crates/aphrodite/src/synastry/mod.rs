pub mod scorer;
pub mod weights;

pub use scorer::{compare, CompatibilityResult, CompatibilityScorer, KindTally, ScoredAspect};
pub use weights::{BlockRule, BodyCategory, Membership, PairSelector, WeightRule, WeightTable};
