use std::sync::Arc;

use super::player::PlayerRef;

/// Lifecycle state of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    Unready,
    Queuing,
    Matched,
}

/// Party classification, derived from player count and intra-group MMR
/// variance. Only full five-player parties are `*Team` variants; everything
/// smaller is `NotTeam`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupType {
    NotTeam,
    NormalTeam,
    UnfriendlyTeam,
    MaliciousTeam,
}

/// A pre-formed party of 1–5 players, presented to the matchmaker as an
/// indivisible unit. Solo players queue as one-player groups. Groups are
/// never split before or after matching.
pub trait Group: Send + Sync {
    fn id(&self) -> String;

    fn players(&self) -> Vec<PlayerRef>;

    /// Add players, silently skipping IDs already present.
    fn add_players(&self, players: Vec<PlayerRef>);

    fn remove_player(&self, player_id: &str);

    /// Matchmaking MMR. Normal parties and partial groups use the mean;
    /// skill-stacked parties are penalised (see `GroupType`).
    fn mmr(&self) -> f64;

    /// Average star count, rounded down.
    fn star(&self) -> i32;

    /// Population variance of the members' MMRs.
    fn mmr_variance(&self) -> f64;

    fn average_mmr(&self) -> f64;

    fn biggest_mmr(&self) -> f64;

    fn state(&self) -> GroupState;
    fn set_state(&self, state: GroupState);

    /// Earliest nonzero start time among members; 0 while unset.
    fn start_match_time_sec(&self) -> i64;
    fn set_start_match_time_sec(&self, t: i64);

    fn finish_match_time_sec(&self) -> i64;
    fn set_finish_match_time_sec(&self, t: i64);

    fn group_type(&self) -> GroupType;

    /// Whether the group has waited long enough to accept AI opponents.
    fn can_fill_ai(&self) -> bool;
}

pub type GroupRef = Arc<dyn Group>;
