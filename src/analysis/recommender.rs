use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use super::matchup::MatchupPair;
use super::meta::MetaStats;
use super::stats::mean;
use super::synergy::SynergyPair;
use crate::data::DraftData;
use crate::draft::{ChampionId, DraftState, HypotheticalPick, Role, RolePick, Side};
use crate::error::AppError;
use crate::features::FeatureEncoder;
use crate::oracle::{predict_or_neutral, side_probability, WinProbabilityOracle};

/// A (champion, role) the side could legally pick right now.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub champion_id: ChampionId,
    pub champion_name: String,
    pub role: Role,
    pub pick_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub champion_id: ChampionId,
    pub champion_name: String,
    pub role: Role,
    pub rank: usize,
    pub total_score: f64,
    pub win_probability: f64,
    pub synergy_score: f64,
    pub counter_score: f64,
    pub meta_score: f64,
    /// Candidate paired with each teammate already picked.
    pub synergy_pairs: Vec<SynergyPair>,
    /// Candidate against each opposing pick.
    pub counter_matchups: Vec<MatchupPair>,
    pub meta_stats: MetaStats,
    /// The model failed and the neutral probability was used.
    pub oracle_fallback: bool,
}

pub struct Recommender<'a> {
    data: &'a DraftData,
    oracle: &'a dyn WinProbabilityOracle,
    encoder: FeatureEncoder<'a>,
}

impl<'a> Recommender<'a> {
    pub fn new(data: &'a DraftData, oracle: &'a dyn WinProbabilityOracle) -> Self {
        Recommender {
            data,
            oracle,
            encoder: FeatureEncoder::new(data),
        }
    }

    /// Legal candidates for `side` in directory order, each champion's roles
    /// most played first. Roles under the pick-rate floor are skipped.
    pub fn candidates(&self, state: &DraftState, side: Side) -> Vec<Candidate> {
        let vacant = state.vacant_roles(side);
        if vacant.is_empty() {
            return Vec::new();
        }
        let floor = self.data.scoring.candidate_pick_rate_floor;

        self.data
            .directory
            .iter()
            .filter(|c| state.is_available(c.id))
            .flat_map(|c| {
                c.roles
                    .iter()
                    .filter(|r| vacant.contains(&r.role) && r.pick_rate >= floor)
                    .map(move |r| Candidate {
                        champion_id: c.id,
                        champion_name: c.name.clone(),
                        role: r.role,
                        pick_rate: r.pick_rate,
                    })
            })
            .collect()
    }

    /// Top `top_n` candidates for `side`, best first, ranked from 1.
    pub fn recommend(&self, state: &DraftState, side: Side, top_n: usize) -> Vec<Recommendation> {
        let mut candidates = self.candidates(state, side);
        candidates.truncate(self.data.scoring.candidate_limit);
        if candidates.is_empty() {
            return Vec::new();
        }

        let scored: Vec<Result<Recommendation, AppError>> = if self.data.scoring.parallel {
            candidates
                .par_iter()
                .map(|c| self.score_candidate(state, side, c))
                .collect()
        } else {
            candidates
                .iter()
                .map(|c| self.score_candidate(state, side, c))
                .collect()
        };

        let mut recommendations: Vec<Recommendation> = scored
            .into_iter()
            .filter_map(|r| match r {
                Ok(rec) => Some(rec),
                Err(e) => {
                    warn!(%side, error = %e, "skipping candidate");
                    None
                }
            })
            .collect();

        // stable: ties keep enumeration order
        recommendations.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        recommendations.truncate(top_n);
        for (idx, rec) in recommendations.iter_mut().enumerate() {
            rec.rank = idx + 1;
        }
        recommendations
    }

    pub fn score_candidate(
        &self,
        state: &DraftState,
        side: Side,
        candidate: &Candidate,
    ) -> Result<Recommendation, AppError> {
        let data = self.data;
        let champion = data
            .directory
            .get(candidate.champion_id)
            .ok_or_else(|| AppError::UnknownChampion(candidate.champion_id.to_string()))?;
        let me = RolePick::new(champion.id, candidate.role);

        let hypothetical = HypotheticalPick::new(side, me.champion_id, me.role);
        let features = self.encoder.extract(state, Some(hypothetical));
        let (reference, oracle_fallback) = predict_or_neutral(self.oracle, &features);
        let win_probability = side_probability(reference, side);

        let synergy_pairs: Vec<SynergyPair> = state
            .team(side)
            .slots()
            .into_iter()
            .map(|mate| data.synergy.pair(me, mate))
            .collect();
        let synergy_score = mean(&synergy_pairs.iter().map(|p| p.score).collect::<Vec<_>>())
            .unwrap_or_else(|| data.synergy.neutral());

        let counter_matchups: Vec<MatchupPair> = state
            .team(side.opponent())
            .slots()
            .into_iter()
            .map(|enemy| data.matchup.pair(me, enemy))
            .collect();
        let counter_score =
            mean(&counter_matchups.iter().map(|p| p.win_rate).collect::<Vec<_>>()).unwrap_or(0.5);

        let meta_stats = data.meta.champion_meta(me);
        let meta_score = (meta_stats.pick_rate + meta_stats.win_rate) / 2.0;

        let w = &data.scoring.weights;
        let total_score = w.win_probability * win_probability
            + w.synergy * synergy_score
            + w.counter * counter_score
            + w.meta * meta_score;

        debug!(
            %side,
            champion = %champion.name,
            role = %me.role,
            total_score,
            win_probability,
            synergy_score,
            counter_score,
            meta_score,
            "scored candidate"
        );

        Ok(Recommendation {
            champion_id: champion.id,
            champion_name: champion.name.clone(),
            role: me.role,
            rank: 0,
            total_score,
            win_probability,
            synergy_score,
            counter_score,
            meta_score,
            synergy_pairs,
            counter_matchups,
            meta_stats,
            oracle_fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScoringConfig, ScoringWeights};
    use crate::data::fixture::{sample_data, sample_dataset};
    use crate::draft::DraftEngine;
    use crate::error::OracleError;
    use crate::features::FeatureVector;
    use crate::oracle::HeuristicOracle;

    const BANS: [u32; 10] = [157, 238, 61, 18, 11, 201, 22, 64, 69, 110];

    struct FailingOracle;

    impl WinProbabilityOracle for FailingOracle {
        fn name(&self) -> &str {
            "failing"
        }

        fn predict(&self, _: &FeatureVector) -> Result<f64, OracleError> {
            Err(OracleError::Unavailable("offline".to_string()))
        }
    }

    fn after_bans() -> DraftEngine {
        let mut engine = DraftEngine::new(Side::Blue);
        for id in BANS {
            assert!(engine.apply_ban(id, None));
        }
        engine
    }

    #[test]
    fn test_candidates_respect_vacancy_and_floor() {
        let data = sample_data();
        let oracle = HeuristicOracle::default();
        let rec = Recommender::new(&data, &oracle);
        let mut engine = after_bans();
        assert!(engine.apply_pick(222, "Jinx", Role::Bottom, None));

        let candidates = rec.candidates(engine.state(), Side::Blue);
        assert!(candidates.iter().all(|c| c.role != Role::Bottom));
        assert!(candidates.iter().all(|c| c.champion_id != 222));
        assert!(candidates.iter().all(|c| !BANS.contains(&c.champion_id)));
        // Malphite support sits below the 1% floor
        assert!(!candidates
            .iter()
            .any(|c| c.champion_id == 54 && c.role == Role::Utility));
        assert!(candidates
            .iter()
            .any(|c| c.champion_id == 54 && c.role == Role::Top));

        let ids: Vec<u32> = candidates.iter().map(|c| c.champion_id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_recommend_ranks_and_order() {
        let data = sample_data();
        let oracle = HeuristicOracle::default();
        let rec = Recommender::new(&data, &oracle);
        let mut engine = after_bans();
        assert!(engine.apply_pick(222, "Jinx", Role::Bottom, None));

        let recs = rec.recommend(engine.state(), Side::Blue, 5);
        assert!(!recs.is_empty() && recs.len() <= 5);
        for pair in recs.windows(2) {
            assert!(pair[0].total_score >= pair[1].total_score);
        }
        let ranks: Vec<usize> = recs.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, (1..=recs.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_synergy_and_counter_components() {
        let data = sample_data();
        let oracle = HeuristicOracle::default();
        let rec = Recommender::new(&data, &oracle);
        let mut engine = after_bans();
        assert!(engine.apply_pick(222, "Jinx", Role::Bottom, None));
        assert!(engine.apply_pick(51, "Caitlyn", Role::Bottom, None));

        let thresh = Candidate {
            champion_id: 412,
            champion_name: "Thresh".to_string(),
            role: Role::Utility,
            pick_rate: 0.12,
        };
        let r = rec.score_candidate(engine.state(), Side::Blue, &thresh).unwrap();
        assert_eq!(r.synergy_pairs.len(), 1);
        assert!((r.synergy_score - (116.0 + 10.0) / 220.0).abs() < 1e-12);
        assert_eq!(r.counter_matchups.len(), 1);
        assert_eq!(r.counter_score, 0.5);
        assert!((r.meta_score - 0.31).abs() < 1e-12);
        assert!(!r.oracle_fallback);
    }

    #[test]
    fn test_red_side_probability_is_complemented() {
        let data = sample_data();
        let oracle = HeuristicOracle::default();
        let rec = Recommender::new(&data, &oracle);
        let mut engine = after_bans();
        assert!(engine.apply_pick(222, "Jinx", Role::Bottom, None));

        let cait = Candidate {
            champion_id: 51,
            champion_name: "Caitlyn".to_string(),
            role: Role::Bottom,
            pick_rate: 0.12,
        };
        let r = rec.score_candidate(engine.state(), Side::Red, &cait).unwrap();
        let features = FeatureEncoder::new(&data)
            .extract(engine.state(), Some(HypotheticalPick::new(Side::Red, 51, Role::Bottom)));
        let blue = oracle.predict(&features).unwrap();
        assert!((r.win_probability - (1.0 - blue)).abs() < 1e-12);
        assert!(r.counter_score < 0.5);
    }

    #[test]
    fn test_oracle_failure_uses_neutral() {
        let data = sample_data();
        let rec = Recommender::new(&data, &FailingOracle);
        let engine = after_bans();
        let recs = rec.recommend(engine.state(), Side::Blue, 5);
        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r.oracle_fallback && r.win_probability == 0.5));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let oracle = HeuristicOracle::default();
        let parallel = sample_data();
        let mut serial_config = ScoringConfig::default();
        serial_config.parallel = false;
        let serial = crate::data::DraftData::from_dataset(&sample_dataset(), serial_config).unwrap();

        let mut engine = after_bans();
        assert!(engine.apply_pick(222, "Jinx", Role::Bottom, None));
        assert!(engine.apply_pick(51, "Caitlyn", Role::Bottom, None));

        let a = Recommender::new(&parallel, &oracle).recommend(engine.state(), Side::Red, 10);
        let b = Recommender::new(&serial, &oracle).recommend(engine.state(), Side::Red, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        let weights = ScoringWeights {
            win_probability: 0.0,
            synergy: 1.0,
            counter: 0.0,
            meta: 0.0,
        };
        let scoring = ScoringConfig::default().with_weights(weights).unwrap();
        let data = crate::data::DraftData::from_dataset(&sample_dataset(), scoring).unwrap();
        let oracle = HeuristicOracle::default();
        let rec = Recommender::new(&data, &oracle);
        let engine = after_bans();

        // no picks yet: every candidate scores the neutral synergy
        let recs = rec.recommend(engine.state(), Side::Blue, 20);
        let candidates = rec.candidates(engine.state(), Side::Blue);
        let got: Vec<(u32, Role)> = recs.iter().map(|r| (r.champion_id, r.role)).collect();
        let want: Vec<(u32, Role)> = candidates
            .iter()
            .take(20)
            .map(|c| (c.champion_id, c.role))
            .collect();
        assert_eq!(got, want);
    }

    #[test]
    fn test_full_side_gets_nothing() {
        let data = sample_data();
        let oracle = HeuristicOracle::default();
        let rec = Recommender::new(&data, &oracle);
        let mut engine = after_bans();
        let picks = [
            (222, Role::Bottom),
            (51, Role::Bottom),
            (89, Role::Utility),
            (412, Role::Utility),
            (86, Role::Top),
            (122, Role::Top),
            (121, Role::Jungle),
            (103, Role::Middle),
            (1, Role::Jungle),
            (54, Role::Middle),
        ];
        for (id, role) in picks {
            assert!(engine.apply_pick(id, "", role, None));
        }
        assert!(rec.recommend(engine.state(), Side::Blue, 5).is_empty());
        assert!(rec.recommend(engine.state(), Side::Red, 5).is_empty());
    }
}
