use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::clock::ClockRef;
use crate::model::{EntityFactory, Group, GroupState, PlayerRef, Room, RoomRef, Team, TeamRef};
use crate::standard::{StandardGroup, StandardPlayer, StandardTeam};

/// In-memory [`Room`]: an ordered list of teams.
pub struct StandardRoom {
    id: Uuid,
    inner: RwLock<RoomInner>,
}

struct RoomInner {
    teams: Vec<TeamRef>,
    start_match_time_sec: i64,
    finish_match_time_sec: i64,
}

impl StandardRoom {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            inner: RwLock::new(RoomInner {
                teams: Vec::with_capacity(3),
                start_match_time_sec: 0,
                finish_match_time_sec: 0,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Default for StandardRoom {
    fn default() -> Self {
        Self::new()
    }
}

impl Room for StandardRoom {
    fn teams(&self) -> Vec<TeamRef> {
        self.inner.read().unwrap().teams.clone()
    }

    fn add_team(&self, team: TeamRef) {
        let mut inner = self.inner.write().unwrap();
        let start = team.start_match_time_sec();
        inner.teams.push(team);
        if start == 0 {
            return;
        }
        if inner.start_match_time_sec == 0 || inner.start_match_time_sec > start {
            inner.start_match_time_sec = start;
        }
    }

    fn remove_team(&self, team: &TeamRef) {
        let mut inner = self.inner.write().unwrap();
        if let Some(pos) = inner.teams.iter().position(|t| Arc::ptr_eq(t, team)) {
            inner.teams.remove(pos);
        }
    }

    fn player_count(&self) -> usize {
        self.inner
            .read()
            .unwrap()
            .teams
            .iter()
            .map(|t| t.player_count())
            .sum()
    }

    fn start_match_time_sec(&self) -> i64 {
        self.inner.read().unwrap().start_match_time_sec
    }

    fn finish_match_time_sec(&self) -> i64 {
        self.inner.read().unwrap().finish_match_time_sec
    }

    fn set_finish_match_time_sec(&self, t: i64) {
        let mut inner = self.inner.write().unwrap();
        for team in &inner.teams {
            team.set_finish_match_time_sec(t);
        }
        inner.finish_match_time_sec = t;
    }

    fn has_ai(&self) -> bool {
        self.inner.read().unwrap().teams.iter().any(|t| t.is_ai())
    }

    fn sort_teams_by_rank(&self) -> Vec<TeamRef> {
        let mut inner = self.inner.write().unwrap();
        inner.teams.sort_by_key(|t| t.rank());
        inner.teams.clone()
    }
}

/// The shipped [`EntityFactory`]. Synthesized AI rooms pad a seed team with
/// two full AI teams so every emitted room carries the complete player count.
pub struct StandardFactory {
    clock: ClockRef,
    team_player_limit: usize,
    ai_fill_wait_sec: i64,
}

impl StandardFactory {
    pub fn new(clock: ClockRef) -> Self {
        Self {
            clock,
            team_player_limit: 5,
            ai_fill_wait_sec: super::group::DEFAULT_AI_FILL_WAIT_SEC,
        }
    }

    /// AI-fill wait applied to groups this factory creates.
    pub fn with_ai_fill_wait(mut self, wait_sec: i64) -> Self {
        self.ai_fill_wait_sec = wait_sec;
        self
    }

    /// Build one queuing group of AI players wrapped in a fresh team.
    fn new_ai_team(&self, index: usize) -> TeamRef {
        let tag = Uuid::new_v4();
        let players: Vec<PlayerRef> = (0..self.team_player_limit)
            .map(|i| {
                Arc::new(StandardPlayer::new_ai(
                    format!("ai-player-{index}-{i}-{tag}"),
                    i as i64 + 1,
                )) as PlayerRef
            })
            .collect();
        let group = StandardGroup::new(format!("ai-group-{index}-{tag}"), players, self.clock.clone())
            .with_ai_fill_wait(self.ai_fill_wait_sec);
        group.set_state(GroupState::Queuing);

        let team = StandardTeam::new();
        team.add_group(Arc::new(group));
        Arc::new(team)
    }
}

impl EntityFactory for StandardFactory {
    fn new_team(&self) -> TeamRef {
        Arc::new(StandardTeam::new())
    }

    fn new_room(&self) -> RoomRef {
        Arc::new(StandardRoom::new())
    }

    fn new_room_with_ai(&self, seed: TeamRef) -> RoomRef {
        let room = StandardRoom::new();
        room.add_team(seed);
        room.add_team(self.new_ai_team(0));
        room.add_team(self.new_ai_team(1));
        Arc::new(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::mmr::Rating;
    use crate::model::Group;

    fn human_team(mmr: f64) -> TeamRef {
        let clock = Arc::new(ManualClock::new(0));
        let players = (0..5)
            .map(|i| {
                Arc::new(StandardPlayer::new(
                    format!("p{i}"),
                    Rating::new(mmr, 200.0, 0.06),
                )) as PlayerRef
            })
            .collect();
        let group = StandardGroup::new("g", players, clock);
        group.set_state(GroupState::Queuing);
        let team = StandardTeam::new();
        team.add_group(Arc::new(group));
        Arc::new(team)
    }

    #[test]
    fn ai_room_is_complete_and_flagged() {
        let clock = Arc::new(ManualClock::new(0));
        let factory = StandardFactory::new(clock);
        let room = factory.new_room_with_ai(human_team(1500.0));

        assert_eq!(room.teams().len(), 3);
        assert_eq!(room.player_count(), 15);
        assert!(room.has_ai());
        let ai_teams = room.teams().iter().filter(|t| t.is_ai()).count();
        assert_eq!(ai_teams, 2);
    }

    #[test]
    fn remove_team_uses_identity() {
        let room = StandardRoom::new();
        let a = human_team(1500.0);
        let b = human_team(1500.0);
        room.add_team(a.clone());
        room.add_team(b.clone());

        room.remove_team(&a);
        let left = room.teams();
        assert_eq!(left.len(), 1);
        assert!(Arc::ptr_eq(&left[0], &b));
    }

    fn stamped_team(start: i64) -> TeamRef {
        let team = human_team(1500.0);
        let fresh = StandardTeam::new();
        for g in team.groups() {
            g.set_start_match_time_sec(start);
            fresh.add_group(g);
        }
        Arc::new(fresh)
    }

    #[test]
    fn start_time_adopts_earliest_nonzero_team() {
        let room = StandardRoom::new();
        room.add_team(human_team(1500.0));
        assert_eq!(room.start_match_time_sec(), 0);

        room.add_team(stamped_team(42));
        assert_eq!(room.start_match_time_sec(), 42);
        room.add_team(stamped_team(30));
        assert_eq!(room.start_match_time_sec(), 30);
        room.add_team(stamped_team(99));
        assert_eq!(room.start_match_time_sec(), 30);
    }

    #[test]
    fn teams_sort_by_rank() {
        let room = StandardRoom::new();
        let a = human_team(1500.0);
        a.set_rank(2);
        let b = human_team(1500.0);
        b.set_rank(1);
        let c = human_team(1500.0);
        c.set_rank(3);
        room.add_team(a);
        room.add_team(b);
        room.add_team(c);

        let sorted = room.sort_teams_by_rank();
        let ranks: Vec<i32> = sorted.iter().map(|t| t.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        // The room's own order is rewritten too.
        let ranks: Vec<i32> = room.teams().iter().map(|t| t.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }
}
