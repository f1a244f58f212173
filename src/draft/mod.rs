//! Draft state machine: turn order, legality checks and the state they guard.

mod engine;
mod rules;
mod state;
mod types;

pub use engine::{DraftEngine, TurnInfo};
pub use rules::{DraftRules, TurnOrder};
pub use state::{DraftState, DraftView, TeamDraft};
pub use types::{ActionKind, ChampionId, HypotheticalPick, Phase, Pick, Role, RolePick, Side};
