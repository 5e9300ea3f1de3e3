use std::collections::HashMap;
use std::sync::RwLock;

use crate::model::{Group, GroupRef, GroupState, Player, PlayerRef, Team};

/// In-memory [`Team`]: a keyed map of groups.
pub struct StandardTeam {
    inner: RwLock<TeamInner>,
}

struct TeamInner {
    groups: HashMap<String, GroupRef>,
    start_match_time_sec: i64,
    rank: i32,
}

impl StandardTeam {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TeamInner {
                groups: HashMap::new(),
                start_match_time_sec: 0,
                rank: 0,
            }),
        }
    }
}

impl Default for StandardTeam {
    fn default() -> Self {
        Self::new()
    }
}

impl Team for StandardTeam {
    fn groups(&self) -> Vec<GroupRef> {
        self.inner.read().unwrap().groups.values().cloned().collect()
    }

    fn add_group(&self, group: GroupRef) {
        if group.state() != GroupState::Queuing {
            return;
        }
        let mut inner = self.inner.write().unwrap();
        let start = group.start_match_time_sec();
        inner.groups.insert(group.id(), group);
        if start == 0 {
            return;
        }
        if inner.start_match_time_sec == 0 || inner.start_match_time_sec > start {
            inner.start_match_time_sec = start;
        }
    }

    fn remove_group(&self, group_id: &str) {
        self.inner.write().unwrap().groups.remove(group_id);
    }

    fn player_count(&self) -> usize {
        self.inner
            .read()
            .unwrap()
            .groups
            .values()
            .map(|g| g.players().len())
            .sum()
    }

    fn average_mmr(&self) -> f64 {
        let inner = self.inner.read().unwrap();
        if inner.groups.is_empty() {
            return 0.0;
        }
        inner.groups.values().map(|g| g.mmr()).sum::<f64>() / inner.groups.len() as f64
    }

    fn star(&self) -> i32 {
        let inner = self.inner.read().unwrap();
        if inner.groups.is_empty() {
            return 0;
        }
        let total: i32 = inner.groups.values().map(|g| g.star()).sum();
        total / inner.groups.len() as i32
    }

    fn start_match_time_sec(&self) -> i64 {
        self.inner.read().unwrap().start_match_time_sec
    }

    fn finish_match_time_sec(&self) -> i64 {
        self.inner
            .read()
            .unwrap()
            .groups
            .values()
            .next()
            .map(|g| g.finish_match_time_sec())
            .unwrap_or(0)
    }

    fn set_finish_match_time_sec(&self, t: i64) {
        let inner = self.inner.read().unwrap();
        for g in inner.groups.values() {
            g.set_finish_match_time_sec(t);
        }
    }

    fn is_ai(&self) -> bool {
        self.inner
            .read()
            .unwrap()
            .groups
            .values()
            .any(|g| g.players().iter().any(|p| p.is_ai()))
    }

    fn rank(&self) -> i32 {
        self.inner.read().unwrap().rank
    }

    fn set_rank(&self, rank: i32) {
        self.inner.write().unwrap().rank = rank;
    }

    fn sort_players_by_rank(&self) -> Vec<PlayerRef> {
        let mut players: Vec<PlayerRef> = self
            .inner
            .read()
            .unwrap()
            .groups
            .values()
            .flat_map(|g| g.players())
            .collect();
        players.sort_by_key(|p| p.rank());
        players
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::clock::ManualClock;
    use crate::mmr::Rating;
    use crate::standard::{StandardGroup, StandardPlayer};

    fn queuing_group(id: &str, mmr: f64, count: usize) -> GroupRef {
        let clock = Arc::new(ManualClock::new(0));
        let players = (0..count)
            .map(|i| {
                Arc::new(StandardPlayer::new(
                    format!("{id}-p{i}"),
                    Rating::new(mmr, 200.0, 0.06),
                )) as PlayerRef
            })
            .collect();
        let group = StandardGroup::new(id, players, clock);
        group.set_state(GroupState::Queuing);
        Arc::new(group)
    }

    #[test]
    fn only_queuing_groups_join() {
        let team = StandardTeam::new();
        let clock = Arc::new(ManualClock::new(0));
        let unready = Arc::new(StandardGroup::new("unready", Vec::new(), clock)) as GroupRef;
        team.add_group(unready);
        assert_eq!(team.groups().len(), 0);

        team.add_group(queuing_group("ok", 1500.0, 2));
        assert_eq!(team.groups().len(), 1);
        assert_eq!(team.player_count(), 2);
    }

    #[test]
    fn start_time_keeps_earliest_nonzero() {
        let team = StandardTeam::new();
        let g1 = queuing_group("g1", 1500.0, 2);
        g1.set_start_match_time_sec(300);
        team.add_group(g1);
        assert_eq!(team.start_match_time_sec(), 300);

        let g2 = queuing_group("g2", 1500.0, 2);
        g2.set_start_match_time_sec(100);
        team.add_group(g2);
        assert_eq!(team.start_match_time_sec(), 100);

        // Zero means unset and never wins.
        let g3 = queuing_group("g3", 1500.0, 1);
        team.add_group(g3);
        assert_eq!(team.start_match_time_sec(), 100);
    }

    #[test]
    fn average_mmr_is_mean_of_group_mmrs() {
        let team = StandardTeam::new();
        team.add_group(queuing_group("a", 1200.0, 2));
        team.add_group(queuing_group("b", 1800.0, 3));
        assert_eq!(team.average_mmr(), 1500.0);
    }

    #[test]
    fn players_sort_by_in_team_rank() {
        let team = StandardTeam::new();
        let group = queuing_group("g", 1500.0, 5);
        for (i, p) in group.players().iter().enumerate() {
            p.set_rank(5 - i as i32);
        }
        team.add_group(group);
        let sorted = team.sort_players_by_rank();
        let ranks: Vec<i32> = sorted.iter().map(|p| p.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }
}
