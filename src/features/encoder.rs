//! Feature encoding for the draft schema.

use super::schema::{
    phase_slot, EMPTY_ID, EMPTY_ROLE, F, MATCHUP_OFFSET, MATCHUP_WIDTH, MAX_TEAM_PAIRS,
    META_OFFSET, META_WIDTH, NEUTRAL_RATE, SYNERGY_OFFSET, SYNERGY_WIDTH,
};
use crate::analysis::{classify, MatchupClass, TeamMeta};
use crate::data::DraftData;
use crate::draft::{DraftState, DraftView, HypotheticalPick, Phase, Role, Side};

/// Fixed-width encoding of one draft position.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f32; F]);

impl FeatureVector {
    pub fn from_array(values: [f32; F]) -> Self {
        FeatureVector(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        F
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Little-endian bytes; equal vectors always give equal bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|v| v.to_le_bytes()).collect()
    }
}

fn push_scalar(out: &mut [f32], offset: &mut usize, v: f32) {
    out[*offset] = v;
    *offset += 1;
}

fn push_f64(out: &mut [f32], offset: &mut usize, v: f64) {
    push_scalar(out, offset, v as f32);
}

fn push_count(out: &mut [f32], offset: &mut usize, n: usize) {
    push_scalar(out, offset, n as f32);
}

/// Maps draft positions to feature vectors. Reads statistics only; never
/// mutates the state it encodes.
#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder<'a> {
    data: &'a DraftData,
}

impl<'a> FeatureEncoder<'a> {
    pub fn new(data: &'a DraftData) -> Self {
        FeatureEncoder { data }
    }

    /// Encodes `state`, or `state` with `hypothetical` treated as applied.
    pub fn extract(&self, state: &DraftState, hypothetical: Option<HypotheticalPick>) -> FeatureVector {
        let view = match hypothetical {
            Some(pick) => state.with_hypothetical(pick),
            None => state.view(),
        };
        self.encode(&view)
    }

    pub fn encode(&self, view: &DraftView<'_>) -> FeatureVector {
        let mut out = [0.0f32; F];
        let mut off = 0usize;

        self.encode_draft(view, &mut out, &mut off);
        debug_assert_eq!(off, META_OFFSET);
        self.encode_meta(view, &mut out, &mut off);
        debug_assert_eq!(off, SYNERGY_OFFSET);
        self.encode_synergy(view, &mut out, &mut off);
        debug_assert_eq!(off, MATCHUP_OFFSET);
        self.encode_matchups(view, &mut out, &mut off);
        debug_assert_eq!(off, F);

        FeatureVector(out)
    }

    fn encode_draft(&self, view: &DraftView<'_>, out: &mut [f32], off: &mut usize) {
        for side in Side::ALL {
            for role in Role::ALL {
                let id = view.champion_in(side, role).map_or(EMPTY_ID, |id| id as f32);
                push_scalar(out, off, id);
            }
        }

        for side in Side::ALL {
            let bans = view.bans(side);
            for i in 0..5 {
                let id = bans.get(i).map_or(EMPTY_ID, |&id| id as f32);
                push_scalar(out, off, id);
            }
        }

        for side in Side::ALL {
            for role in Role::ALL {
                let v = match view.champion_in(side, role) {
                    Some(_) => role.index() as f32,
                    None => EMPTY_ROLE,
                };
                push_scalar(out, off, v);
            }
        }

        let phase = view.phase();
        let mut one_hot = [0.0f32; 9];
        one_hot[phase_slot(phase)] = 1.0;
        for v in one_hot {
            push_scalar(out, off, v);
        }

        push_count(out, off, view.pick_count(Side::Blue));
        push_count(out, off, view.pick_count(Side::Red));
        push_count(out, off, view.ban_count(Side::Blue));
        push_count(out, off, view.ban_count(Side::Red));

        let red_turn = view.current_side() == Some(Side::Red);
        push_scalar(out, off, if red_turn { 1.0 } else { 0.0 });

        for p in [Phase::BanRound1, Phase::BanRound2, Phase::Pick, Phase::Complete] {
            push_scalar(out, off, if phase == p { 1.0 } else { 0.0 });
        }
        push_count(out, off, view.picks_made());
    }

    fn encode_meta(&self, view: &DraftView<'_>, out: &mut [f32], off: &mut usize) {
        let start = *off;
        for side in Side::ALL {
            let team: TeamMeta = self.data.meta.team_meta(&view.slots(side));
            for v in [
                team.avg_pick_rate,
                team.avg_ban_rate,
                team.avg_win_rate,
                team.max_pick_rate,
                team.max_ban_rate,
                team.max_win_rate,
                team.total_presence,
            ] {
                push_f64(out, off, v);
            }
        }
        push_f64(out, off, self.data.meta.banned_meta(&view.all_bans()));
        debug_assert_eq!(*off - start, META_WIDTH);
    }

    fn encode_synergy(&self, view: &DraftView<'_>, out: &mut [f32], off: &mut usize) {
        let start = *off;
        let synergy = &self.data.synergy;
        let blue = view.slots(Side::Blue);
        let red = view.slots(Side::Red);

        for team in [&blue, &red] {
            let pairs = synergy.pairwise(team);
            for i in 0..MAX_TEAM_PAIRS {
                let v = pairs.get(i).map_or(NEUTRAL_RATE, |p| p.score as f32);
                push_scalar(out, off, v);
            }
        }

        for team in [&blue, &red] {
            for v in synergy.role_synergies(team) {
                push_f64(out, off, v);
            }
        }

        let comparison = synergy.compare_teams(&blue, &red);
        for s in [comparison.blue, comparison.red] {
            push_f64(out, off, s.mean);
            push_f64(out, off, s.min);
            push_f64(out, off, s.max);
            push_f64(out, off, s.variance);
        }
        push_f64(out, off, comparison.difference);
        push_f64(out, off, comparison.balance);
        debug_assert_eq!(*off - start, SYNERGY_WIDTH);
    }

    fn encode_matchups(&self, view: &DraftView<'_>, out: &mut [f32], off: &mut usize) {
        let start = *off;
        let matchup = &self.data.matchup;
        let threshold = self.data.scoring.advantage_threshold;
        let blue = view.slots(Side::Blue);
        let red = view.slots(Side::Red);

        let roles = matchup.role_matchups(&blue, &red);
        for adv in roles {
            push_f64(out, off, adv.unwrap_or(0.0));
        }

        let team = matchup.team_matchups(&blue, &red, threshold);
        // blue favorable is red unfavorable
        for n in [
            team.favorable,
            team.unfavorable,
            team.neutral,
            team.unfavorable,
            team.favorable,
            team.neutral,
        ] {
            push_count(out, off, n);
        }

        let adv = team.advantage;
        push_f64(out, off, adv.mean);
        push_f64(out, off, adv.min);
        push_f64(out, off, adv.max);
        push_f64(out, off, adv.std_dev());

        let total = team.pairs.len().max(1) as f64;
        push_f64(out, off, team.favorable as f64 / total);
        push_f64(out, off, team.unfavorable as f64 / total);
        push_f64(out, off, team.neutral as f64 / total);

        push_f64(out, off, 0.5 + adv.mean);

        let known: Vec<f64> = roles.iter().flatten().copied().collect();
        let ahead = |class: MatchupClass| {
            known
                .iter()
                .filter(|&&a| classify(a, threshold) == class)
                .count()
        };
        push_count(out, off, ahead(MatchupClass::Favorable));
        push_count(out, off, ahead(MatchupClass::Unfavorable));

        let best = known.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = known.iter().copied().fold(f64::INFINITY, f64::min);
        push_f64(out, off, if known.is_empty() { 0.0 } else { best });
        push_f64(out, off, if known.is_empty() { 0.0 } else { worst });

        push_f64(out, off, 1.0 / (1.0 + adv.std_dev()));
        push_count(out, off, team.pairs.len());
        debug_assert_eq!(*off - start, MATCHUP_WIDTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture::sample_data;
    use crate::draft::DraftEngine;
    use crate::features::schema::slot;

    const BANS: [u32; 10] = [157, 238, 61, 18, 11, 201, 22, 64, 69, 110];

    fn after_bans() -> DraftEngine {
        let mut engine = DraftEngine::new(Side::Blue);
        for id in BANS {
            assert!(engine.apply_ban(id, None));
        }
        engine
    }

    #[test]
    fn test_fresh_state_sentinels() {
        let data = sample_data();
        let v = FeatureEncoder::new(&data).extract(&DraftState::new(), None);
        let s = v.as_slice();
        assert_eq!(s.len(), F);
        assert!(s[0..20].iter().all(|&x| x == 0.0));
        assert!(s[20..30].iter().all(|&x| x == -1.0));
        assert_eq!(s[slot::PHASE_ONE_HOT], 1.0);
        assert_eq!(s[slot::TURN_IS_RED], 0.0);
        assert!(s[SYNERGY_OFFSET..SYNERGY_OFFSET + 20].iter().all(|&x| x == 0.5));
        assert_eq!(s[slot::BLUE_AVG_WIN], 0.5);
        assert_eq!(s[slot::MATCHUP_PAIRS], 0.0);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let data = sample_data();
        let mut engine = after_bans();
        assert!(engine.apply_pick(222, "Jinx", Role::Bottom, None));
        assert!(engine.apply_pick(51, "Caitlyn", Role::Bottom, None));
        let encoder = FeatureEncoder::new(&data);
        let a = encoder.extract(engine.state(), None);
        let b = encoder.extract(engine.state(), None);
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_hypothetical_matches_applied_pick() {
        let data = sample_data();
        let encoder = FeatureEncoder::new(&data);
        let mut engine = after_bans();
        let before = engine.state().clone();

        let hyp = HypotheticalPick::new(Side::Blue, 222, Role::Bottom);
        let hypothetical = encoder.extract(engine.state(), Some(hyp));
        assert_eq!(engine.state(), &before);

        assert!(engine.apply_pick(222, "Jinx", Role::Bottom, None));
        let applied = encoder.extract(engine.state(), None);
        assert_eq!(hypothetical.to_bytes(), applied.to_bytes());
    }

    #[test]
    fn test_draft_segment_after_first_picks() {
        let data = sample_data();
        let mut engine = after_bans();
        assert!(engine.apply_pick(222, "Jinx", Role::Bottom, None));
        assert!(engine.apply_pick(51, "Caitlyn", Role::Bottom, None));
        let v = FeatureEncoder::new(&data).extract(engine.state(), None);
        let s = v.as_slice();

        assert_eq!(s[Role::Bottom.index()], 222.0);
        assert_eq!(s[5 + Role::Bottom.index()], 51.0);
        assert_eq!(s[10], 157.0);
        assert_eq!(s[15], 238.0);
        assert_eq!(s[20 + Role::Bottom.index()], Role::Bottom.index() as f32);
        assert_eq!(s[20 + Role::Top.index()], -1.0);
        assert_eq!(s[slot::PHASE_ONE_HOT + 2], 1.0);
        // third pick is red's
        assert_eq!(s[slot::TURN_IS_RED], 1.0);
        assert_eq!(s[slot::TOTAL_PICKS], 2.0);
    }

    #[test]
    fn test_matchup_segment_uses_lane_pairs() {
        let data = sample_data();
        let mut engine = after_bans();
        assert!(engine.apply_pick(222, "Jinx", Role::Bottom, None));
        assert!(engine.apply_pick(51, "Caitlyn", Role::Bottom, None));
        let v = FeatureEncoder::new(&data).extract(engine.state(), None);
        let s = v.as_slice();

        let bottom = s[MATCHUP_OFFSET + Role::Bottom.index()];
        assert!((bottom - 0.06).abs() < 1e-6);
        // one favorable pair for blue, mirrored as unfavorable for red
        assert_eq!(s[MATCHUP_OFFSET + 5], 1.0);
        assert_eq!(s[MATCHUP_OFFSET + 9], 1.0);
        assert_eq!(s[slot::MATCHUP_PAIRS], 1.0);
        assert!((s[slot::MATCHUP_MEAN] - 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_complete_draft_has_no_turn() {
        let data = sample_data();
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
        let v = FeatureEncoder::new(&data).extract(engine.state(), None);
        let s = v.as_slice();
        assert_eq!(s[slot::PHASE_ONE_HOT + 8], 1.0);
        assert_eq!(s[slot::TURN_IS_RED], 0.0);
        assert_eq!(s[slot::TOTAL_PICKS], 10.0);
        assert_eq!(s[slot::MATCHUP_PAIRS], 25.0);
    }
}
