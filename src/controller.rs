use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::{Champion, Recommendation, Recommender};
use crate::data::DraftData;
use crate::draft::{ActionKind, ChampionId, DraftEngine, DraftState, Role, Side, TurnInfo};
use crate::error::{AppError, InvalidAction};
use crate::features::FeatureEncoder;
use crate::history::{ActionRecord, DraftExport, DraftSnapshot, ExportMetadata, WinnerPrediction};
use crate::oracle::{predict_or_neutral, WinProbabilityOracle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// The user drafts one side, the AI drafts the other
    UserVsAi,
    /// The user enters actions for both sides
    UserVsUser,
    /// The AI drafts both sides
    AiVsAi,
}

/// What the AI did on its turn and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiAction {
    pub kind: ActionKind,
    pub champion_id: ChampionId,
    pub champion_name: String,
    pub role: Option<Role>,
    pub side: Side,
    pub score: Option<f64>,
    pub reason: String,
}

/// Drives one draft: routes user and AI actions into the engine and keeps
/// the action log.
pub struct GameController<'a> {
    data: &'a DraftData,
    oracle: &'a dyn WinProbabilityOracle,
    engine: DraftEngine,
    mode: GameMode,
    actions: Vec<ActionRecord>,
    started_at: DateTime<Utc>,
}

impl<'a> GameController<'a> {
    pub fn new(
        data: &'a DraftData,
        oracle: &'a dyn WinProbabilityOracle,
        mode: GameMode,
        user_side: Side,
    ) -> Self {
        GameController {
            data,
            oracle,
            engine: DraftEngine::new(user_side),
            mode,
            actions: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn state(&self) -> &DraftState {
        self.engine.state()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn user_side(&self) -> Side {
        self.engine.user_side()
    }

    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn turn_info(&self) -> TurnInfo {
        self.engine.turn_info()
    }

    pub fn is_complete(&self) -> bool {
        self.state().is_complete()
    }

    pub fn is_ai_turn(&self) -> bool {
        let Some(side) = self.engine.current_side() else {
            return false;
        };
        match self.mode {
            GameMode::AiVsAi => true,
            GameMode::UserVsUser => false,
            GameMode::UserVsAi => side != self.user_side(),
        }
    }

    pub fn resolve(&self, name: &str) -> Result<&'a Champion, AppError> {
        self.data
            .directory
            .search(name)
            .ok_or_else(|| AppError::UnknownChampion(name.trim().to_string()))
    }

    pub fn user_ban(&mut self, name: &str) -> Result<ActionRecord, AppError> {
        let champion = self.resolve(name)?;
        let side = self.engine.try_ban(champion.id, None)?;
        Ok(self.record(ActionKind::Ban, champion.id, None, side, false))
    }

    /// Picks `name` for the side on the clock. Without an explicit role the
    /// champion's most played vacant role is used.
    pub fn user_pick(&mut self, name: &str, role: Option<Role>) -> Result<ActionRecord, AppError> {
        let champion = self.resolve(name)?;
        let side = self
            .engine
            .current_side()
            .ok_or(InvalidAction::NoActiveTurn)?;

        let role = match role {
            Some(role) => role,
            None => {
                let vacant = self.engine.vacant_roles(side);
                self.data
                    .directory
                    .best_role(champion.id, &vacant)
                    .filter(|r| vacant.contains(r))
                    .ok_or_else(|| {
                        AppError::InvalidInput(format!(
                            "{} has no recorded role among {}'s open roles; name one",
                            champion.name, side
                        ))
                    })?
            }
        };

        self.engine
            .try_pick(champion.id, &champion.name, role, Some(side))?;
        Ok(self.record(ActionKind::Pick, champion.id, Some(role), side, false))
    }

    /// Recommendations for `side`, or the side on the clock.
    pub fn recommendations(&self, side: Option<Side>) -> Vec<Recommendation> {
        let Some(side) = side.or_else(|| self.engine.current_side()) else {
            return Vec::new();
        };
        Recommender::new(self.data, self.oracle).recommend(
            self.state(),
            side,
            self.data.scoring.top_n,
        )
    }

    /// Plays the current turn for whichever side is on the clock. `None`
    /// when the draft is complete or no legal action exists.
    pub fn ai_turn(&mut self) -> Option<AiAction> {
        let info = self.engine.turn_info();
        let side = info.side?;
        match info.action? {
            ActionKind::Ban => self.ai_ban(side),
            ActionKind::Pick => self.ai_pick(side),
        }
    }

    fn ai_ban(&mut self, side: Side) -> Option<AiAction> {
        let opponent = side.opponent();
        let recs = self.recommendations(Some(opponent));
        for rec in recs {
            if self.engine.apply_ban(rec.champion_id, Some(side)) {
                self.record(ActionKind::Ban, rec.champion_id, None, side, true);
                return Some(AiAction {
                    kind: ActionKind::Ban,
                    champion_id: rec.champion_id,
                    champion_name: rec.champion_name,
                    role: None,
                    side,
                    score: Some(rec.total_score),
                    reason: format!("denying a strong pick for {opponent}"),
                });
            }
        }
        self.fallback_ban(side)
    }

    /// Bans the available champion with the highest pick rate in any role.
    fn fallback_ban(&mut self, side: Side) -> Option<AiAction> {
        let data = self.data;
        let state = self.engine.state();
        let mut best: Option<&'a Champion> = None;
        for champion in data.directory.iter() {
            if champion.roles.is_empty() || !state.is_available(champion.id) {
                continue;
            }
            if best.map_or(true, |b| champion.max_pick_rate() > b.max_pick_rate()) {
                best = Some(champion);
            }
        }

        let champion = best?;
        if !self.engine.apply_ban(champion.id, Some(side)) {
            return None;
        }
        warn!(%side, champion = %champion.name, "no recommendation usable, banned by meta priority");
        self.record(ActionKind::Ban, champion.id, None, side, true);
        Some(AiAction {
            kind: ActionKind::Ban,
            champion_id: champion.id,
            champion_name: champion.name.clone(),
            role: None,
            side,
            score: None,
            reason: "high meta priority".to_string(),
        })
    }

    fn ai_pick(&mut self, side: Side) -> Option<AiAction> {
        let recs = self.recommendations(Some(side));
        if let Some(top) = recs.into_iter().next() {
            if self
                .engine
                .apply_pick(top.champion_id, &top.champion_name, top.role, Some(side))
            {
                self.record(ActionKind::Pick, top.champion_id, Some(top.role), side, true);
                return Some(AiAction {
                    kind: ActionKind::Pick,
                    champion_id: top.champion_id,
                    champion_name: top.champion_name,
                    role: Some(top.role),
                    side,
                    score: Some(top.total_score),
                    reason: format!("top recommendation ({:.3})", top.total_score),
                });
            }
        }
        self.fallback_pick(side)
    }

    /// First available champion with data for a vacant role, trying roles in
    /// canonical order; failing that, any available champion in the first
    /// vacant role.
    fn fallback_pick(&mut self, side: Side) -> Option<AiAction> {
        let data = self.data;
        let state = self.engine.state();
        let vacant = state.vacant_roles(side);
        let first_role = *vacant.first()?;
        let directory = &data.directory;

        let with_data = vacant.iter().find_map(|&role| {
            directory
                .iter()
                .find(|c| state.is_available(c.id) && c.plays(role))
                .map(|c| (c, role))
        });
        let (champion, role) = match with_data {
            Some(found) => found,
            None => (
                directory.iter().find(|c| state.is_available(c.id))?,
                first_role,
            ),
        };

        if !self
            .engine
            .apply_pick(champion.id, &champion.name, role, Some(side))
        {
            return None;
        }
        warn!(%side, champion = %champion.name, %role, "no recommendation usable, fallback pick");
        self.record(ActionKind::Pick, champion.id, Some(role), side, true);
        Some(AiAction {
            kind: ActionKind::Pick,
            champion_id: champion.id,
            champion_name: champion.name.clone(),
            role: Some(role),
            side,
            score: None,
            reason: "fallback".to_string(),
        })
    }

    pub fn winner_prediction(&self) -> WinnerPrediction {
        let features = FeatureEncoder::new(self.data).extract(self.state(), None);
        let (blue, fallback) = predict_or_neutral(self.oracle, &features);
        WinnerPrediction::from_blue(blue, self.oracle.name(), fallback)
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot::capture(self.state(), &self.data.directory)
    }

    /// Export of the draft so far. The prediction is only filled in once the
    /// draft is complete.
    pub fn export(&self) -> DraftExport {
        DraftExport {
            metadata: ExportMetadata::new(
                self.mode,
                self.user_side(),
                self.oracle.name(),
                self.started_at,
            ),
            draft: self.snapshot(),
            actions: self.actions.clone(),
            prediction: self.is_complete().then(|| self.winner_prediction()),
        }
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.actions.clear();
        self.started_at = Utc::now();
    }

    fn record(
        &mut self,
        action: ActionKind,
        champion_id: ChampionId,
        role: Option<Role>,
        side: Side,
        is_ai: bool,
    ) -> ActionRecord {
        let entry = ActionRecord {
            turn: self.actions.len() + 1,
            action,
            champion_id,
            champion_name: self.data.directory.label(champion_id),
            role,
            side,
            is_ai,
            timestamp: Utc::now(),
        };
        debug!(turn = entry.turn, %action, %side, champion = %entry.champion_name, is_ai, "action logged");
        self.actions.push(entry.clone());
        entry
    }
}
