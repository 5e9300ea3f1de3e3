//! Wait-time-bucketed compatibility policy.
//!
//! Constraints loosen as participants wait: each [`MatchRange`] bucket names
//! the MMR gap, rank gap, and full-party gating allowed while the *shorter*
//! of two waits is still under its `max_match_sec`.

use serde::{Deserialize, Serialize};

use crate::model::{Group, Room, Team};

/// One relaxation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRange {
    /// Bucket applies while the elapsed wait is strictly below this.
    pub max_match_sec: i64,
    /// Allowed MMR gap as a percentage of the incumbent's MMR; 0 means
    /// unconstrained.
    pub mmr_gap_percent: u32,
    /// Whether a not-yet-full side may merge with a full five-player party.
    pub can_join_team: bool,
    /// Allowed star difference; 0 means unconstrained.
    pub rank_gap: i32,
}

impl MatchRange {
    /// Hard default used when no range table is configured.
    pub fn fallback() -> Self {
        Self {
            max_match_sec: 15,
            mmr_gap_percent: 10,
            can_join_team: false,
            rank_gap: 12,
        }
    }
}

/// Evaluates merge compatibility for a queue.
#[derive(Debug, Clone)]
pub struct MatchPolicy {
    ranges: Vec<MatchRange>,
    team_player_limit: usize,
}

impl MatchPolicy {
    pub fn new(ranges: Vec<MatchRange>, team_player_limit: usize) -> Self {
        Self {
            ranges,
            team_player_limit,
        }
    }

    /// Bucket for a pair of participants: the shorter wait (the younger of
    /// the two start times) picks the first bucket it is still under, the
    /// last bucket catches everyone else. Symmetric in the start arguments.
    pub fn range_for(&self, now_sec: i64, start_a: i64, start_b: i64) -> MatchRange {
        if self.ranges.is_empty() {
            return MatchRange::fallback();
        }
        let elapsed = now_sec - start_a.max(start_b);
        for range in &self.ranges {
            if elapsed < range.max_match_sec {
                return *range;
            }
        }
        *self.ranges.last().unwrap_or(&MatchRange::fallback())
    }

    /// May `candidate` join `team`? Every incumbent group gets a veto: the
    /// full-party gate, the MMR gap (incumbent's MMR as denominator), and the
    /// star gap must all pass.
    pub fn can_group_join_team(&self, now_sec: i64, team: &dyn Team, candidate: &dyn Group) -> bool {
        let candidate_players = candidate.players().len();
        for incumbent in team.groups() {
            let range = self.range_for(
                now_sec,
                incumbent.start_match_time_sec(),
                candidate.start_match_time_sec(),
            );

            if incumbent.players().len() != self.team_player_limit
                && !range.can_join_team
                && candidate_players == self.team_player_limit
            {
                return false;
            }

            let incumbent_mmr = incumbent.mmr();
            if range.mmr_gap_percent != 0
                && (incumbent_mmr - candidate.mmr()).abs()
                    > incumbent_mmr * range.mmr_gap_percent as f64 / 100.0
            {
                return false;
            }

            if range.rank_gap != 0 && (incumbent.star() - candidate.star()).abs() > range.rank_gap {
                return false;
            }
        }
        true
    }

    /// May `candidate` join `room`? Same shape against every incumbent team;
    /// the gate here rejects a single-group full party merging into a side
    /// that was itself assembled from several groups.
    pub fn can_team_join_room(&self, now_sec: i64, room: &dyn Room, candidate: &dyn Team) -> bool {
        let candidate_groups = candidate.groups().len();
        for incumbent in room.teams() {
            let range = self.range_for(
                now_sec,
                incumbent.start_match_time_sec(),
                candidate.start_match_time_sec(),
            );

            if incumbent.groups().len() > 1 && !range.can_join_team && candidate_groups == 1 {
                return false;
            }

            let incumbent_mmr = incumbent.average_mmr();
            if range.mmr_gap_percent != 0
                && (incumbent_mmr - candidate.average_mmr()).abs()
                    > incumbent_mmr * range.mmr_gap_percent as f64 / 100.0
            {
                return false;
            }

            if range.rank_gap != 0 && (incumbent.star() - candidate.star()).abs() > range.rank_gap {
                return false;
            }
        }
        true
    }
}
