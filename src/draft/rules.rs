use super::types::{Phase, Side};
use crate::error::AppError;

/// Round structure of a draft, expressed as counts.
///
/// `ban_rounds[i]` is the number of bans each side makes in round `i`; bans
/// inside a round alternate starting with `first_side`. `pick_runs` are the
/// lengths of the consecutive same-side pick runs, the first run belonging to
/// `first_side`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftRules {
    pub ban_rounds: Vec<usize>,
    pub pick_runs: Vec<usize>,
    pub first_side: Side,
}

impl Default for DraftRules {
    /// 3-3 / 2-2 bans and a 1-2-2-2-2-1 snake pick.
    fn default() -> Self {
        DraftRules {
            ban_rounds: vec![3, 2],
            pick_runs: vec![1, 2, 2, 2, 2, 1],
            first_side: Side::Blue,
        }
    }
}

impl DraftRules {
    pub const BANS_PER_SIDE: usize = 5;
    pub const PICKS_PER_SIDE: usize = 5;

    pub fn validate(&self) -> Result<(), AppError> {
        let bans: usize = self.ban_rounds.iter().sum();
        if bans != Self::BANS_PER_SIDE {
            return Err(AppError::ConfigError(format!(
                "ban rounds give {} bans per side, expected {}",
                bans,
                Self::BANS_PER_SIDE
            )));
        }

        if self.pick_runs.iter().any(|&run| run == 0) {
            return Err(AppError::ConfigError(
                "pick runs must be non-empty".to_string(),
            ));
        }

        let order = TurnOrder::build(self);
        for side in Side::ALL {
            let count = order.picks.iter().filter(|&&s| s == side).count();
            if count != Self::PICKS_PER_SIDE {
                return Err(AppError::ConfigError(format!(
                    "pick runs give {} picks to {}, expected {}",
                    count,
                    side,
                    Self::PICKS_PER_SIDE
                )));
            }
        }

        Ok(())
    }
}

/// Precomputed ban and pick orders, indexed by the number of bans/picks
/// already made. There is no cursor: the counts in the draft are the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TurnOrder {
    bans: Vec<Side>,
    picks: Vec<Side>,
    first_round_bans: usize,
}

impl Default for TurnOrder {
    fn default() -> Self {
        TurnOrder::build(&DraftRules::default())
    }
}

impl TurnOrder {
    pub fn new(rules: &DraftRules) -> Result<Self, AppError> {
        rules.validate()?;
        Ok(TurnOrder::build(rules))
    }

    fn build(rules: &DraftRules) -> Self {
        let first = rules.first_side;

        let mut bans = Vec::new();
        for &per_side in &rules.ban_rounds {
            for _ in 0..per_side {
                bans.push(first);
                bans.push(first.opponent());
            }
        }

        let mut picks = Vec::new();
        let mut side = first;
        for &run in &rules.pick_runs {
            picks.extend(std::iter::repeat(side).take(run));
            side = side.opponent();
        }

        let first_round_bans = rules.ban_rounds.first().copied().unwrap_or(0) * 2;

        TurnOrder {
            bans,
            picks,
            first_round_bans,
        }
    }

    pub fn bans(&self) -> &[Side] {
        &self.bans
    }

    pub fn picks(&self) -> &[Side] {
        &self.picks
    }

    pub fn total_bans(&self) -> usize {
        self.bans.len()
    }

    pub fn total_picks(&self) -> usize {
        self.picks.len()
    }

    pub fn phase_at(&self, bans_made: usize, picks_made: usize) -> Phase {
        if picks_made >= self.picks.len() {
            Phase::Complete
        } else if bans_made < self.first_round_bans {
            Phase::BanRound1
        } else if bans_made < self.bans.len() {
            Phase::BanRound2
        } else {
            Phase::Pick
        }
    }

    pub fn side_at(&self, bans_made: usize, picks_made: usize) -> Option<Side> {
        match self.phase_at(bans_made, picks_made) {
            Phase::BanRound1 | Phase::BanRound2 => self.bans.get(bans_made).copied(),
            Phase::Pick => self.picks.get(picks_made).copied(),
            Phase::Complete => None,
        }
    }
}
