use std::sync::Arc;

use super::team::TeamRef;

/// A three-team match instance; the unit the engine emits.
pub trait Room: Send + Sync {
    /// Teams in insertion order until [`Room::sort_teams_by_rank`] reorders
    /// them post-match.
    fn teams(&self) -> Vec<TeamRef>;

    /// Append a team. The room's start time adopts the team's only when the
    /// incoming value is nonzero and strictly earlier (zero means unset).
    fn add_team(&self, team: TeamRef);

    fn remove_team(&self, team: &TeamRef);

    fn player_count(&self) -> usize;

    fn start_match_time_sec(&self) -> i64;

    fn finish_match_time_sec(&self) -> i64;

    /// Stamp the finish time, cascading to teams, groups, and players.
    fn set_finish_match_time_sec(&self, t: i64);

    fn has_ai(&self) -> bool;

    fn sort_teams_by_rank(&self) -> Vec<TeamRef>;
}

pub type RoomRef = Arc<dyn Room>;

/// Entity construction is owned by the host; the engine asks for fresh teams
/// and rooms through this contract. `new_room_with_ai` synthesizes the AI
/// opposition around a seed team per the host's own policy.
pub trait EntityFactory: Send + Sync {
    fn new_team(&self) -> TeamRef;
    fn new_room(&self) -> RoomRef;
    fn new_room_with_ai(&self, seed: TeamRef) -> RoomRef;
}
