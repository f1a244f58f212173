use serde::Serialize;
use tracing::debug;

use super::rules::DraftRules;
use super::state::DraftState;
use super::types::{ActionKind, ChampionId, Phase, Pick, Role, Side};
use crate::error::{AppError, InvalidAction};

/// Snapshot of whose turn it is and what they may do.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnInfo {
    pub phase: Phase,
    pub side: Option<Side>,
    pub action: Option<ActionKind>,
    pub is_user_turn: bool,
    pub user_side: Side,
    pub blue_remaining: usize,
    pub red_remaining: usize,
    pub vacant_roles: Vec<Role>,
}

/// Owns the draft state and enforces the turn order and legality rules.
///
/// Every action is validated in full before the state is touched, so a
/// rejected action leaves the draft exactly as it was.
#[derive(Debug, Clone)]
pub struct DraftEngine {
    state: DraftState,
    rules: DraftRules,
    user_side: Side,
}

impl DraftEngine {
    pub fn new(user_side: Side) -> Self {
        DraftEngine {
            state: DraftState::new(),
            rules: DraftRules::default(),
            user_side,
        }
    }

    pub fn with_rules(user_side: Side, rules: DraftRules) -> Result<Self, AppError> {
        let state = DraftState::with_rules(&rules)?;
        Ok(DraftEngine {
            state,
            rules,
            user_side,
        })
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn user_side(&self) -> Side {
        self.user_side
    }

    pub fn current_side(&self) -> Option<Side> {
        self.state.current_side()
    }

    pub fn current_phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn vacant_roles(&self, side: Side) -> Vec<Role> {
        self.state.vacant_roles(side)
    }

    pub fn is_user_turn(&self) -> bool {
        self.current_side() == Some(self.user_side)
    }

    /// Bans `champion_id` for `side` (or the side on the clock), returning
    /// the side that banned.
    pub fn try_ban(
        &mut self,
        champion_id: ChampionId,
        side: Option<Side>,
    ) -> Result<Side, InvalidAction> {
        let side = self.check_turn(side)?;

        if self.state.is_bans_complete() {
            return Err(InvalidAction::BanPhaseOver);
        }
        if !self.state.is_available(champion_id) {
            return Err(InvalidAction::ChampionUnavailable(champion_id));
        }

        self.state.push_ban(side, champion_id);
        debug!(%side, champion_id, phase = %self.state.phase(), "ban applied");
        Ok(side)
    }

    pub fn apply_ban(&mut self, champion_id: ChampionId, side: Option<Side>) -> bool {
        self.try_ban(champion_id, side).is_ok()
    }

    pub fn try_pick(
        &mut self,
        champion_id: ChampionId,
        champion_name: &str,
        role: Role,
        side: Option<Side>,
    ) -> Result<Side, InvalidAction> {
        let side = self.check_turn(side)?;

        if !self.state.is_bans_complete() {
            return Err(InvalidAction::BansIncomplete);
        }
        if self.state.is_complete() {
            return Err(InvalidAction::PickPhaseOver);
        }
        if !self.state.is_available(champion_id) {
            return Err(InvalidAction::ChampionUnavailable(champion_id));
        }
        if self.state.team(side).has_role(role) {
            return Err(InvalidAction::RoleFilled { side, role });
        }

        self.state
            .push_pick(side, Pick::new(champion_id, champion_name, role));
        debug!(%side, champion_id, %role, phase = %self.state.phase(), "pick applied");
        Ok(side)
    }

    pub fn apply_pick(
        &mut self,
        champion_id: ChampionId,
        champion_name: &str,
        role: Role,
        side: Option<Side>,
    ) -> bool {
        self.try_pick(champion_id, champion_name, role, side).is_ok()
    }

    fn check_turn(&self, requested: Option<Side>) -> Result<Side, InvalidAction> {
        let expected = self.current_side();
        match requested.or(expected) {
            None => Err(InvalidAction::NoActiveTurn),
            Some(side) if Some(side) != expected => Err(InvalidAction::WrongTurn {
                requested: side,
                expected,
            }),
            Some(side) => Ok(side),
        }
    }

    pub fn turn_info(&self) -> TurnInfo {
        let phase = self.current_phase();
        let side = self.current_side();

        let (action, blue_remaining, red_remaining) = match phase {
            Phase::BanRound1 | Phase::BanRound2 => (
                Some(ActionKind::Ban),
                DraftRules::BANS_PER_SIDE - self.state.team(Side::Blue).bans().len(),
                DraftRules::BANS_PER_SIDE - self.state.team(Side::Red).bans().len(),
            ),
            Phase::Pick => (
                Some(ActionKind::Pick),
                DraftRules::PICKS_PER_SIDE - self.state.team(Side::Blue).picks().len(),
                DraftRules::PICKS_PER_SIDE - self.state.team(Side::Red).picks().len(),
            ),
            Phase::Complete => (None, 0, 0),
        };

        let vacant_roles = match (action, side) {
            (Some(ActionKind::Pick), Some(side)) => self.vacant_roles(side),
            _ => Vec::new(),
        };

        TurnInfo {
            phase,
            side,
            action,
            is_user_turn: self.is_user_turn(),
            user_side: self.user_side,
            blue_remaining,
            red_remaining,
            vacant_roles,
        }
    }

    /// Starts a fresh draft with the same rules and user side.
    pub fn reset(&mut self) {
        self.state = DraftState::with_rules(&self.rules).unwrap_or_default();
    }
}
