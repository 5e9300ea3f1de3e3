use std::sync::Arc;

use super::group::GroupRef;
use super::player::PlayerRef;

/// A five-player competitor assembled from 1–3 groups.
pub trait Team: Send + Sync {
    fn groups(&self) -> Vec<GroupRef>;

    /// Add a group. Implementations accept only queuing groups and fold the
    /// group's nonzero start time into the team's.
    fn add_group(&self, group: GroupRef);

    fn remove_group(&self, group_id: &str);

    fn player_count(&self) -> usize;

    /// Mean of the member groups' matchmaking MMRs.
    fn average_mmr(&self) -> f64;

    fn star(&self) -> i32;

    fn start_match_time_sec(&self) -> i64;

    fn finish_match_time_sec(&self) -> i64;
    fn set_finish_match_time_sec(&self, t: i64);

    /// True when any member player is AI.
    fn is_ai(&self) -> bool;

    /// Post-match finish position within the room.
    fn rank(&self) -> i32;
    fn set_rank(&self, rank: i32);

    /// Members ordered by their post-match in-team rank.
    fn sort_players_by_rank(&self) -> Vec<PlayerRef>;
}

pub type TeamRef = Arc<dyn Team>;
