pub mod champion_stats;
pub mod matchup;
pub mod meta;
pub mod recommender;
pub mod stats;
pub mod synergy;

pub use champion_stats::{Champion, ChampionDirectory, DirectorySummary, RoleStats};
pub use matchup::{classify, MatchupClass, MatchupPair, MatchupStat, MatchupTable, TeamMatchups};
pub use meta::{GlobalStats, MetaAnalyzer, MetaStats, TeamMeta};
pub use recommender::{Recommendation, Recommender};
pub use stats::Summary;
pub use synergy::{
    apply_bayesian_smoothing, PairStat, SynergyPair, SynergyTable, TeamComparison, TeamSynergy,
};
