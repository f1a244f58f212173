use serde::Serialize;
use std::collections::HashMap;

use super::stats::Summary;
use super::synergy::check_pair_row;
use crate::config::ScoringConfig;
use crate::data::loader::MATCHUP_TABLE;
use crate::data::models::PairRecord;
use crate::draft::{Role, RolePick};
use crate::error::DataIntegrityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchupClass {
    Favorable,
    Unfavorable,
    Neutral,
}

/// Favorable strictly above `threshold`, unfavorable strictly below
/// `-threshold`. Used for every favorable/unfavorable decision in the crate.
pub fn classify(advantage: f64, threshold: f64) -> MatchupClass {
    if advantage > threshold {
        MatchupClass::Favorable
    } else if advantage < -threshold {
        MatchupClass::Unfavorable
    } else {
        MatchupClass::Neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchupStat {
    pub games: u64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchupPair {
    pub ally: RolePick,
    pub enemy: RolePick,
    pub win_rate: f64,
    pub known: bool,
}

impl MatchupPair {
    pub fn advantage(&self) -> f64 {
        self.win_rate - 0.5
    }
}

/// Cross-product summary from the first side's point of view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMatchups {
    pub pairs: Vec<MatchupPair>,
    pub favorable: usize,
    pub unfavorable: usize,
    pub neutral: usize,
    /// Summary of advantages (win rate minus 0.5). All zero when empty.
    pub advantage: Summary,
}

/// Directed head-to-head win rates. Every stored (A, B) has a stored (B, A)
/// equal to its complement.
#[derive(Debug, Clone)]
pub struct MatchupTable {
    rates: HashMap<(RolePick, RolePick), MatchupStat>,
}

impl MatchupTable {
    pub fn from_records(
        records: &[PairRecord],
        config: &ScoringConfig,
    ) -> Result<Self, DataIntegrityError> {
        // (wins for the first pick, games) keyed on the directed pair
        let mut totals: HashMap<(RolePick, RolePick), (u64, u64)> = HashMap::new();
        for (idx, rec) in records.iter().enumerate() {
            check_pair_row(MATCHUP_TABLE, rec, idx + 2)?;
            let a = RolePick::new(rec.champion_a, rec.role_a);
            let b = RolePick::new(rec.champion_b, rec.role_b);
            if a == b {
                continue;
            }
            let (key, wins) = if a < b {
                ((a, b), rec.win_count)
            } else {
                ((b, a), rec.pick_count - rec.win_count)
            };
            let entry = totals.entry(key).or_insert((0, 0));
            entry.0 += wins;
            entry.1 += rec.pick_count;
        }

        let mut rates = HashMap::with_capacity(totals.len() * 2);
        for ((a, b), (wins, games)) in totals {
            if games == 0 || games < config.min_pair_games {
                continue;
            }
            let win_rate = wins as f64 / games as f64;
            rates.insert((a, b), MatchupStat { games, win_rate });
            rates.insert(
                (b, a),
                MatchupStat {
                    games,
                    win_rate: 1.0 - win_rate,
                },
            );
        }

        Ok(MatchupTable { rates })
    }

    /// Number of directed entries (twice the number of distinct pairs).
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn lookup(&self, a: RolePick, b: RolePick) -> Option<&MatchupStat> {
        self.rates.get(&(a, b))
    }

    /// Win rate of `a` against `b`; 0.5 when unknown.
    pub fn score(&self, a: RolePick, b: RolePick) -> f64 {
        self.lookup(a, b).map_or(0.5, |s| s.win_rate)
    }

    pub fn pair(&self, ally: RolePick, enemy: RolePick) -> MatchupPair {
        let stat = self.lookup(ally, enemy);
        MatchupPair {
            ally,
            enemy,
            win_rate: stat.map_or(0.5, |s| s.win_rate),
            known: stat.is_some(),
        }
    }

    /// Every ally against every enemy, allies outermost.
    pub fn team_matchups(
        &self,
        allies: &[RolePick],
        enemies: &[RolePick],
        threshold: f64,
    ) -> TeamMatchups {
        let pairs: Vec<MatchupPair> = allies
            .iter()
            .flat_map(|&a| enemies.iter().map(move |&e| (a, e)))
            .map(|(a, e)| self.pair(a, e))
            .collect();

        let mut favorable = 0;
        let mut unfavorable = 0;
        let mut neutral = 0;
        for p in &pairs {
            match classify(p.advantage(), threshold) {
                MatchupClass::Favorable => favorable += 1,
                MatchupClass::Unfavorable => unfavorable += 1,
                MatchupClass::Neutral => neutral += 1,
            }
        }

        let advantages: Vec<f64> = pairs.iter().map(MatchupPair::advantage).collect();
        TeamMatchups {
            favorable,
            unfavorable,
            neutral,
            advantage: Summary::of(&advantages).unwrap_or_else(|| Summary::constant(0.0)),
            pairs,
        }
    }

    /// Same-lane advantage per role (ally win rate minus 0.5), indexed by
    /// [`Role::index`]. `None` when either lane is empty or the pairing is
    /// unknown.
    pub fn role_matchups(&self, allies: &[RolePick], enemies: &[RolePick]) -> [Option<f64>; 5] {
        let mut out = [None; 5];
        for role in Role::ALL {
            let ally = allies.iter().find(|p| p.role == role);
            let enemy = enemies.iter().find(|p| p.role == role);
            if let (Some(&a), Some(&e)) = (ally, enemy) {
                out[role.index()] = self.lookup(a, e).map(|s| s.win_rate - 0.5);
            }
        }
        out
    }

    /// Same-role champions with the best record against `target`.
    pub fn best_counters(&self, target: RolePick, n: usize) -> Vec<(RolePick, MatchupStat)> {
        self.ranked(n, |(a, b)| (*b == target && a.role == target.role).then_some(*a))
    }

    /// Opponents `pick` does best against, any role.
    pub fn favorable_matchups(&self, pick: RolePick, n: usize) -> Vec<(RolePick, MatchupStat)> {
        self.ranked(n, |(a, b)| (*a == pick).then_some(*b))
    }

    fn ranked<F>(&self, n: usize, select: F) -> Vec<(RolePick, MatchupStat)>
    where
        F: Fn(&(RolePick, RolePick)) -> Option<RolePick>,
    {
        let mut found: Vec<(RolePick, MatchupStat)> = self
            .rates
            .iter()
            .filter_map(|(key, stat)| select(key).map(|other| (other, *stat)))
            .filter(|(_, stat)| stat.win_rate > 0.5)
            .collect();
        found.sort_by(|a, b| b.1.win_rate.total_cmp(&a.1.win_rate).then(a.0.cmp(&b.0)));
        found.truncate(n);
        found
    }
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

    fn table() -> MatchupTable {
        MatchupTable::from_records(
            &[
                row(238, Role::Middle, 157, Role::Middle, 100, 56),
                row(103, Role::Middle, 238, Role::Middle, 80, 36),
                row(86, Role::Top, 122, Role::Top, 50, 25),
                row(1, Role::Middle, 157, Role::Middle, 10, 9),
            ],
            &ScoringConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_both_directions_complement() {
        let t = table();
        let zed = RolePick::new(238, Role::Middle);
        let yasuo = RolePick::new(157, Role::Middle);
        let ahri = RolePick::new(103, Role::Middle);
        for (a, b) in [(zed, yasuo), (ahri, zed)] {
            assert!((t.score(a, b) + t.score(b, a) - 1.0).abs() < 1e-12);
        }
        assert!((t.score(zed, yasuo) - 0.56).abs() < 1e-12);
        assert!((t.score(zed, ahri) - 0.55).abs() < 1e-12);
        assert_eq!(t.len(), 6);
    }

    #[test]
    fn test_low_sample_and_unknown_are_neutral() {
        let t = table();
        let annie = RolePick::new(1, Role::Middle);
        let yasuo = RolePick::new(157, Role::Middle);
        assert!(t.lookup(annie, yasuo).is_none());
        assert_eq!(t.score(annie, yasuo), 0.5);
    }

    #[test]
    fn test_classify_is_strict() {
        assert_eq!(classify(0.06, 0.05), MatchupClass::Favorable);
        assert_eq!(classify(0.05, 0.05), MatchupClass::Neutral);
        assert_eq!(classify(-0.05, 0.05), MatchupClass::Neutral);
        assert_eq!(classify(-0.051, 0.05), MatchupClass::Unfavorable);
    }

    #[test]
    fn test_team_matchups_counts() {
        let t = table();
        let blue = [RolePick::new(238, Role::Middle), RolePick::new(86, Role::Top)];
        let red = [RolePick::new(157, Role::Middle), RolePick::new(122, Role::Top)];
        let m = t.team_matchups(&blue, &red, 0.05);
        assert_eq!(m.pairs.len(), 4);
        assert_eq!(m.favorable, 1);
        assert_eq!(m.unfavorable, 0);
        assert_eq!(m.neutral, 3);
        assert!((m.advantage.max - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_empty_team_matchups() {
        let t = table();
        let m = t.team_matchups(&[], &[RolePick::new(157, Role::Middle)], 0.05);
        assert!(m.pairs.is_empty());
        assert_eq!(m.advantage.mean, 0.0);
    }

    #[test]
    fn test_role_matchups_same_lane_only() {
        let t = table();
        let blue = [RolePick::new(238, Role::Middle), RolePick::new(86, Role::Top)];
        let red = [RolePick::new(157, Role::Middle)];
        let roles = t.role_matchups(&blue, &red);
        assert!((roles[Role::Middle.index()].unwrap() - 0.06).abs() < 1e-12);
        assert_eq!(roles[Role::Top.index()], None);
    }

    #[test]
    fn test_counters_and_favorable() {
        let t = table();
        let zed = RolePick::new(238, Role::Middle);
        let counters = t.best_counters(zed, 3);
        assert!(counters.is_empty());

        let yasuo = RolePick::new(157, Role::Middle);
        let counters = t.best_counters(yasuo, 3);
        assert_eq!(counters[0].0, zed);

        let favorable = t.favorable_matchups(zed, 3);
        let ids: Vec<u32> = favorable.iter().map(|(p, _)| p.champion_id).collect();
        assert_eq!(ids, vec![157, 103]);
    }

    #[test]
    fn test_rejects_rate_that_disagrees_with_counts() {
        let skewed = PairRecord {
            win_rate: 0.40,
            ..row(222, Role::Bottom, 51, Role::Bottom, 300, 168)
        };
        let err = MatchupTable::from_records(&[skewed], &ScoringConfig::default());
        assert!(matches!(err, Err(DataIntegrityError::MalformedRow { line: 2, .. })));
    }
}
