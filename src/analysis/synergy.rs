use serde::Serialize;
use std::collections::HashMap;

use super::stats::{mean, Summary};
use crate::config::ScoringConfig;
use crate::data::loader::SYNERGY_TABLE;
use crate::data::models::PairRecord;
use crate::draft::{Role, RolePick};
use crate::error::DataIntegrityError;

/// Shrinks `wins / games` towards `prior_mean` as if `prior_strength` extra
/// games at the prior rate had been observed.
pub fn apply_bayesian_smoothing(wins: u64, games: u64, prior_mean: f64, prior_strength: f64) -> f64 {
    if games == 0 {
        return prior_mean;
    }
    (wins as f64 + prior_mean * prior_strength) / (games as f64 + prior_strength)
}

/// Unordered pair of teammates. Built so that (a, b) and (b, a) collapse to
/// the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PairKey(RolePick, RolePick);

impl PairKey {
    fn new(a: RolePick, b: RolePick) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }

    fn other(&self, me: RolePick) -> Option<RolePick> {
        if self.0 == me {
            Some(self.1)
        } else if self.1 == me {
            Some(self.0)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairStat {
    pub games: u64,
    pub wins: u64,
    pub raw_win_rate: f64,
    pub smoothed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SynergyPair {
    pub first: RolePick,
    pub second: RolePick,
    pub score: f64,
    /// False when the pair was unknown and the neutral value was used.
    pub known: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSynergy {
    /// All pairs in pick order: (0,1), (0,2), ..., (1,2), ...
    pub pairs: Vec<SynergyPair>,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamComparison {
    pub blue: Summary,
    pub red: Summary,
    /// Blue mean minus red mean.
    pub difference: f64,
    /// Absolute difference of the two variances.
    pub balance: f64,
}

#[derive(Debug, Clone)]
pub struct SynergyTable {
    pairs: HashMap<PairKey, PairStat>,
    prior_mean: f64,
}

impl SynergyTable {
    /// Rows listing the same pair in either direction are merged. Pairs backed
    /// by fewer than `min_pair_games` games are dropped.
    pub fn from_records(
        records: &[PairRecord],
        config: &ScoringConfig,
    ) -> Result<Self, DataIntegrityError> {
        let mut totals: HashMap<PairKey, (u64, u64)> = HashMap::new();
        for (idx, rec) in records.iter().enumerate() {
            check_pair_row(SYNERGY_TABLE, rec, idx + 2)?;
            let key = PairKey::new(
                RolePick::new(rec.champion_a, rec.role_a),
                RolePick::new(rec.champion_b, rec.role_b),
            );
            let entry = totals.entry(key).or_insert((0, 0));
            entry.0 += rec.win_count;
            entry.1 += rec.pick_count;
        }

        let pairs: HashMap<PairKey, PairStat> = totals
            .into_iter()
            .filter(|(_, (_, games))| *games >= config.min_pair_games && *games > 0)
            .map(|(key, (wins, games))| {
                let stat = PairStat {
                    games,
                    wins,
                    raw_win_rate: wins as f64 / games as f64,
                    smoothed: apply_bayesian_smoothing(
                        wins,
                        games,
                        config.prior_mean,
                        config.prior_strength,
                    ),
                };
                (key, stat)
            })
            .collect();

        Ok(SynergyTable {
            pairs,
            prior_mean: config.prior_mean,
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn neutral(&self) -> f64 {
        self.prior_mean
    }

    pub fn lookup(&self, a: RolePick, b: RolePick) -> Option<&PairStat> {
        self.pairs.get(&PairKey::new(a, b))
    }

    /// Smoothed win rate of `a` and `b` on the same team; neutral if unknown.
    pub fn score(&self, a: RolePick, b: RolePick) -> f64 {
        self.lookup(a, b).map_or(self.prior_mean, |s| s.smoothed)
    }

    pub fn pair(&self, first: RolePick, second: RolePick) -> SynergyPair {
        match self.lookup(first, second) {
            Some(stat) => SynergyPair {
                first,
                second,
                score: stat.smoothed,
                known: true,
            },
            None => SynergyPair {
                first,
                second,
                score: self.prior_mean,
                known: false,
            },
        }
    }

    pub fn pairwise(&self, team: &[RolePick]) -> Vec<SynergyPair> {
        let mut pairs = Vec::new();
        for (i, &a) in team.iter().enumerate() {
            for &b in &team[i + 1..] {
                pairs.push(self.pair(a, b));
            }
        }
        pairs
    }

    pub fn team_synergy(&self, team: &[RolePick]) -> TeamSynergy {
        let pairs = self.pairwise(team);
        let scores: Vec<f64> = pairs.iter().map(|p| p.score).collect();
        let summary = Summary::of(&scores).unwrap_or_else(|| Summary::constant(self.prior_mean));
        TeamSynergy { pairs, summary }
    }

    /// Mean synergy of each role's champion with its teammates, indexed by
    /// [`Role::index`]. Unfilled roles and lone picks are neutral.
    pub fn role_synergies(&self, team: &[RolePick]) -> [f64; 5] {
        let mut out = [self.prior_mean; 5];
        for role in Role::ALL {
            let Some(&me) = team.iter().find(|p| p.role == role) else {
                continue;
            };
            let scores: Vec<f64> = team
                .iter()
                .filter(|p| **p != me)
                .map(|&mate| self.score(me, mate))
                .collect();
            if let Some(m) = mean(&scores) {
                out[role.index()] = m;
            }
        }
        out
    }

    /// Best known teammates for `pick`, strongest first.
    pub fn top_partners(&self, pick: RolePick, n: usize) -> Vec<(RolePick, PairStat)> {
        let mut partners: Vec<(RolePick, PairStat)> = self
            .pairs
            .iter()
            .filter_map(|(key, stat)| key.other(pick).map(|mate| (mate, *stat)))
            .collect();
        partners.sort_by(|a, b| b.1.smoothed.total_cmp(&a.1.smoothed).then(a.0.cmp(&b.0)));
        partners.truncate(n);
        partners
    }

    pub fn compare_teams(&self, blue: &[RolePick], red: &[RolePick]) -> TeamComparison {
        let blue = self.team_synergy(blue).summary;
        let red = self.team_synergy(red).summary;
        TeamComparison {
            difference: blue.mean - red.mean,
            balance: (blue.variance - red.variance).abs(),
            blue,
            red,
        }
    }
}

/// Largest allowed gap between `Win_Rate` and `Win_Count / Pick_Count`.
/// Exports round the rate to four places.
pub(crate) const WIN_RATE_TOLERANCE: f64 = 0.005;

pub(crate) fn check_pair_row(
    table: &'static str,
    rec: &PairRecord,
    line: usize,
) -> Result<(), DataIntegrityError> {
    if !(0.0..=1.0).contains(&rec.win_rate) {
        return Err(DataIntegrityError::RateOutOfRange {
            table,
            column: "Win_Rate",
            value: rec.win_rate,
            line,
        });
    }
    if rec.win_count > rec.pick_count {
        return Err(DataIntegrityError::MalformedRow {
            table,
            line,
            message: format!(
                "Win_Count {} exceeds Pick_Count {}",
                rec.win_count, rec.pick_count
            ),
        });
    }
    if rec.pick_count > 0 {
        let counted = rec.win_count as f64 / rec.pick_count as f64;
        if (rec.win_rate - counted).abs() > WIN_RATE_TOLERANCE {
            return Err(DataIntegrityError::MalformedRow {
                table,
                line,
                message: format!(
                    "Win_Rate {} disagrees with Win_Count/Pick_Count {:.4}",
                    rec.win_rate, counted
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(a: u32, ra: Role, b: u32, rb: Role, games: u64, wins: u64) -> PairRecord {
        PairRecord {
            champion_a: a,
            role_a: ra,
            champion_b: b,
            role_b: rb,
            pick_count: games,
            win_count: wins,
            win_rate: wins as f64 / games as f64,
        }
    }

    fn table() -> SynergyTable {
        SynergyTable::from_records(
            &[
                row(222, Role::Bottom, 412, Role::Utility, 200, 120),
                row(222, Role::Bottom, 64, Role::Jungle, 100, 40),
                row(64, Role::Jungle, 412, Role::Utility, 5, 5),
            ],
            &ScoringConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_smoothing_reference_values() {
        let one = apply_bayesian_smoothing(1, 1, 0.5, 20.0);
        assert!((one - 11.0 / 21.0).abs() < 1e-12);
        assert!((one - 0.524).abs() < 1e-3);
        assert_eq!(apply_bayesian_smoothing(50, 100, 0.5, 20.0), 0.5);
        assert_eq!(apply_bayesian_smoothing(0, 0, 0.5, 20.0), 0.5);
    }

    #[test]
    fn test_score_is_symmetric() {
        let t = table();
        let jinx = RolePick::new(222, Role::Bottom);
        let thresh = RolePick::new(412, Role::Utility);
        assert_eq!(t.score(jinx, thresh), t.score(thresh, jinx));
        assert!((t.score(jinx, thresh) - 130.0 / 220.0).abs() < 1e-12);
    }

    #[test]
    fn test_low_sample_pairs_are_neutral() {
        let t = table();
        let lee = RolePick::new(64, Role::Jungle);
        let thresh = RolePick::new(412, Role::Utility);
        assert!(t.lookup(lee, thresh).is_none());
        assert_eq!(t.score(lee, thresh), 0.5);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_team_synergy_needs_two_picks() {
        let t = table();
        let single = t.team_synergy(&[RolePick::new(222, Role::Bottom)]);
        assert!(single.pairs.is_empty());
        assert_eq!(single.summary.mean, 0.5);
        assert_eq!(single.summary.variance, 0.0);
    }

    #[test]
    fn test_team_synergy_pairs_follow_pick_order() {
        let t = table();
        let team = [
            RolePick::new(222, Role::Bottom),
            RolePick::new(412, Role::Utility),
            RolePick::new(64, Role::Jungle),
        ];
        let syn = t.team_synergy(&team);
        assert_eq!(syn.pairs.len(), 3);
        assert_eq!(syn.pairs[0].second, team[1]);
        assert_eq!(syn.pairs[1].second, team[2]);
        assert!(!syn.pairs[2].known);
        assert!(syn.summary.min <= syn.summary.mean && syn.summary.mean <= syn.summary.max);
    }

    #[test]
    fn test_role_synergies_default_neutral() {
        let t = table();
        let team = [
            RolePick::new(222, Role::Bottom),
            RolePick::new(412, Role::Utility),
        ];
        let roles = t.role_synergies(&team);
        assert_eq!(roles[Role::Top.index()], 0.5);
        assert_eq!(roles[Role::Bottom.index()], roles[Role::Utility.index()]);
        assert!(roles[Role::Bottom.index()] > 0.5);
    }

    #[test]
    fn test_top_partners_sorted() {
        let t = table();
        let partners = t.top_partners(RolePick::new(222, Role::Bottom), 5);
        assert_eq!(partners.len(), 2);
        assert_eq!(partners[0].0.champion_id, 412);
        assert!(partners[0].1.smoothed >= partners[1].1.smoothed);
    }

    #[test]
    fn test_rejects_more_wins_than_games() {
        let err = SynergyTable::from_records(
            &[PairRecord {
                win_rate: 0.5,
                ..row(1, Role::Top, 2, Role::Jungle, 10, 11)
            }],
            &ScoringConfig::default(),
        );
        assert!(matches!(err, Err(DataIntegrityError::MalformedRow { line: 2, .. })));
    }

    #[test]
    fn test_rejects_rate_that_disagrees_with_counts() {
        let rounded = PairRecord {
            win_rate: 0.5333,
            ..row(64, Role::Jungle, 103, Role::Middle, 90, 48)
        };
        let skewed = PairRecord {
            win_rate: 0.70,
            ..row(1, Role::Top, 2, Role::Jungle, 100, 50)
        };
        assert!(SynergyTable::from_records(&[rounded.clone()], &ScoringConfig::default()).is_ok());

        let err = SynergyTable::from_records(&[rounded, skewed], &ScoringConfig::default());
        assert!(matches!(err, Err(DataIntegrityError::MalformedRow { line: 3, .. })));
    }
}
