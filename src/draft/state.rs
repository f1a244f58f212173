use serde::Serialize;

use super::rules::{DraftRules, TurnOrder};
use super::types::{ChampionId, HypotheticalPick, Phase, Pick, Role, RolePick, Side};
use crate::error::AppError;

/// Bans and picks made by one side, in the order they happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TeamDraft {
    bans: Vec<ChampionId>,
    picks: Vec<Pick>,
}

impl TeamDraft {
    pub fn bans(&self) -> &[ChampionId] {
        &self.bans
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn pick_for(&self, role: Role) -> Option<&Pick> {
        self.picks.iter().find(|p| p.role == role)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.pick_for(role).is_some()
    }

    /// Unfilled roles in canonical role order.
    pub fn vacant_roles(&self) -> Vec<Role> {
        Role::ALL
            .iter()
            .copied()
            .filter(|&role| !self.has_role(role))
            .collect()
    }

    pub fn slots(&self) -> Vec<RolePick> {
        self.picks.iter().map(Pick::slot).collect()
    }

    fn contains(&self, champion_id: ChampionId) -> bool {
        self.bans.contains(&champion_id) || self.picks.iter().any(|p| p.champion_id == champion_id)
    }
}

/// Authoritative draft state. Phase and turn are always derived from the
/// ban/pick counts and never stored.
///
/// Mutation is crate-private: only [`DraftEngine`](super::DraftEngine)
/// appends bans and picks, after validating them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftState {
    blue: TeamDraft,
    red: TeamDraft,
    order: TurnOrder,
}

impl Default for DraftState {
    fn default() -> Self {
        DraftState::new()
    }
}

impl DraftState {
    pub fn new() -> Self {
        DraftState {
            blue: TeamDraft::default(),
            red: TeamDraft::default(),
            order: TurnOrder::default(),
        }
    }

    pub fn with_rules(rules: &DraftRules) -> Result<Self, AppError> {
        Ok(DraftState {
            blue: TeamDraft::default(),
            red: TeamDraft::default(),
            order: TurnOrder::new(rules)?,
        })
    }

    pub fn team(&self, side: Side) -> &TeamDraft {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }

    fn team_mut(&mut self, side: Side) -> &mut TeamDraft {
        match side {
            Side::Blue => &mut self.blue,
            Side::Red => &mut self.red,
        }
    }

    pub fn turn_order(&self) -> &TurnOrder {
        &self.order
    }

    pub fn bans_made(&self) -> usize {
        self.blue.bans.len() + self.red.bans.len()
    }

    pub fn picks_made(&self) -> usize {
        self.blue.picks.len() + self.red.picks.len()
    }

    pub fn phase(&self) -> Phase {
        self.order.phase_at(self.bans_made(), self.picks_made())
    }

    pub fn current_side(&self) -> Option<Side> {
        self.order.side_at(self.bans_made(), self.picks_made())
    }

    pub fn vacant_roles(&self, side: Side) -> Vec<Role> {
        self.team(side).vacant_roles()
    }

    pub fn is_available(&self, champion_id: ChampionId) -> bool {
        !self.blue.contains(champion_id) && !self.red.contains(champion_id)
    }

    /// Every banned or picked champion: blue bans, red bans, blue picks, red picks.
    pub fn unavailable_ids(&self) -> Vec<ChampionId> {
        self.all_bans()
            .into_iter()
            .chain(self.blue.picks.iter().map(|p| p.champion_id))
            .chain(self.red.picks.iter().map(|p| p.champion_id))
            .collect()
    }

    pub fn all_bans(&self) -> Vec<ChampionId> {
        self.blue.bans.iter().chain(self.red.bans.iter()).copied().collect()
    }

    pub fn is_bans_complete(&self) -> bool {
        self.bans_made() >= self.order.total_bans()
    }

    pub fn is_complete(&self) -> bool {
        self.picks_made() >= self.order.total_picks()
    }

    pub(crate) fn push_ban(&mut self, side: Side, champion_id: ChampionId) {
        self.team_mut(side).bans.push(champion_id);
    }

    pub(crate) fn push_pick(&mut self, side: Side, pick: Pick) {
        self.team_mut(side).picks.push(pick);
    }

    pub fn view(&self) -> DraftView<'_> {
        DraftView {
            state: self,
            extra: None,
        }
    }

    /// Read-only view of this state with `pick` treated as already applied.
    pub fn with_hypothetical(&self, pick: HypotheticalPick) -> DraftView<'_> {
        DraftView {
            state: self,
            extra: Some(pick),
        }
    }
}

/// A draft state plus at most one extra pick that was never applied.
///
/// The view does not validate the extra pick; callers only pass legal
/// candidates.
#[derive(Debug, Clone, Copy)]
pub struct DraftView<'a> {
    state: &'a DraftState,
    extra: Option<HypotheticalPick>,
}

impl<'a> DraftView<'a> {
    pub fn state(&self) -> &'a DraftState {
        self.state
    }

    pub fn hypothetical(&self) -> Option<HypotheticalPick> {
        self.extra
    }

    pub fn bans(&self, side: Side) -> &'a [ChampionId] {
        self.state.team(side).bans()
    }

    pub fn all_bans(&self) -> Vec<ChampionId> {
        self.state.all_bans()
    }

    /// Picks for `side` in pick order, the hypothetical one last.
    pub fn slots(&self, side: Side) -> Vec<RolePick> {
        let mut slots = self.state.team(side).slots();
        if let Some(extra) = self.extra.filter(|p| p.side == side) {
            slots.push(extra.slot());
        }
        slots
    }

    pub fn champion_in(&self, side: Side, role: Role) -> Option<ChampionId> {
        if let Some(pick) = self.state.team(side).pick_for(role) {
            return Some(pick.champion_id);
        }
        self.extra
            .filter(|p| p.side == side && p.role == role)
            .map(|p| p.champion_id)
    }

    pub fn pick_count(&self, side: Side) -> usize {
        let extra = self.extra.map_or(0, |p| usize::from(p.side == side));
        self.state.team(side).picks().len() + extra
    }

    pub fn ban_count(&self, side: Side) -> usize {
        self.state.team(side).bans().len()
    }

    pub fn picks_made(&self) -> usize {
        self.pick_count(Side::Blue) + self.pick_count(Side::Red)
    }

    pub fn phase(&self) -> Phase {
        self.state
            .turn_order()
            .phase_at(self.state.bans_made(), self.picks_made())
    }

    pub fn current_side(&self) -> Option<Side> {
        self.state
            .turn_order()
            .side_at(self.state.bans_made(), self.picks_made())
    }
}
