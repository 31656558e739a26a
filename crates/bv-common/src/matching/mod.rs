pub mod factors;
pub mod ranker;
pub mod weights;

pub use ranker::{rank, score_pair, CompatibilityMatch, FactorBreakdown, RankOptions};
pub use weights::{MatchWeights, STANDARD_MATCH_WEIGHTS};
