//! A single matchmaking lane.
//!
//! The queue owns the groups waiting for placement plus the partial teams
//! and rooms carried between ticks. One `match_groups` pass per tick walks
//! the nested fitting: groups into teams, teams into rooms, rooms out
//! through the sink. Every fifth pass tears the partial assemblies apart to
//! escape bad local fits.

use std::sync::{Arc, Mutex};

use super::config::QueueConfig;
use super::constraints::MatchPolicy;
use crate::clock::ClockRef;
use crate::error::Result;
use crate::model::{EntityFactory, Group, GroupRef, GroupState, Player, Room, RoomRef, Team, TeamRef};
use crate::sink::RoomSink;

/// Every this many passes the partial state is shuffled back into loose
/// groups.
pub const REFRESH_TURN: u32 = 5;

/// Partial assemblies carried across ticks. Only touched inside
/// `match_groups`; the mutex makes "a queue is never matched concurrently
/// with itself" a hard guarantee.
#[derive(Default)]
struct Scratch {
    tmp_teams: Vec<TeamRef>,
    tmp_rooms: Vec<RoomRef>,
    match_turn: u32,
}

/// Point-in-time queue statistics, logged by the matcher every tick.
#[derive(Debug, Clone)]
pub struct QueueSnapshot {
    pub name: String,
    pub queued_groups: usize,
    pub tmp_teams: usize,
    pub tmp_rooms: usize,
    pub match_turn: u32,
}

/// One matchmaking lane (normal or team-exclusive).
pub struct Queue {
    name: String,
    config: QueueConfig,
    policy: MatchPolicy,
    factory: Arc<dyn EntityFactory>,
    sink: RoomSink,
    clock: ClockRef,
    groups: Mutex<Vec<GroupRef>>,
    scratch: Mutex<Scratch>,
}

impl Queue {
    pub fn new(
        name: impl Into<String>,
        config: QueueConfig,
        sink: RoomSink,
        factory: Arc<dyn EntityFactory>,
        clock: ClockRef,
    ) -> Result<Self> {
        config.validate()?;
        let policy = MatchPolicy::new(config.match_ranges.clone(), config.team_player_limit);
        Ok(Self {
            name: name.into(),
            config,
            policy,
            factory,
            sink,
            clock,
            groups: Mutex::new(Vec::new()),
            scratch: Mutex::new(Scratch::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append groups to the inbound buffer. Unset start times are stamped
    /// now; a group ID already buffered is silently ignored.
    pub fn add_groups(&self, groups: Vec<GroupRef>) {
        let now = self.clock.now_sec();
        let mut buffer = self.groups.lock().unwrap();
        for group in groups {
            if buffer.iter().any(|g| g.id() == group.id()) {
                continue;
            }
            if group.start_match_time_sec() == 0 {
                group.set_start_match_time_sec(now);
            }
            buffer.push(group);
        }
    }

    /// Drain the inbound buffer, keeping only groups still queuing.
    pub fn take_queuing(&self) -> Vec<GroupRef> {
        let mut buffer = self.groups.lock().unwrap();
        buffer
            .drain(..)
            .filter(|g| g.state() == GroupState::Queuing)
            .collect()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let queued_groups = self.groups.lock().unwrap().len();
        let scratch = self.scratch.lock().unwrap();
        QueueSnapshot {
            name: self.name.clone(),
            queued_groups,
            tmp_teams: scratch.tmp_teams.len(),
            tmp_rooms: scratch.tmp_rooms.len(),
            match_turn: scratch.match_turn,
        }
    }

    /// One assembly pass. Takes this tick's loose groups, returns the groups
    /// still loose afterwards; completed rooms leave through the sink.
    pub fn match_groups(&self, mut groups: Vec<GroupRef>) -> Vec<GroupRef> {
        let mut scratch = self.scratch.lock().unwrap();
        let mut tmp_teams = std::mem::take(&mut scratch.tmp_teams);
        let mut tmp_rooms = std::mem::take(&mut scratch.tmp_rooms);

        groups.sort_by(|a, b| a.mmr().total_cmp(&b.mmr()));

        let total_players: usize = groups.iter().map(|g| g.players().len()).sum::<usize>()
            + tmp_teams.iter().map(|t| t.player_count()).sum::<usize>()
            + tmp_rooms.iter().map(|r| r.player_count()).sum::<usize>();

        tmp_teams.sort_by(|a, b| a.average_mmr().total_cmp(&b.average_mmr()));

        for _ in 0..total_players / self.config.room_player_limit + 1 {
            // Top up the carried partial teams first.
            for team in &tmp_teams {
                while team.player_count() != self.config.team_player_limit {
                    if !self.find_group_for_team(team, &mut groups) {
                        break;
                    }
                }
            }

            // Build new teams from the groups still loose.
            let loose_players: usize = groups.iter().map(|g| g.players().len()).sum();
            for _ in 0..loose_players / self.config.team_player_limit + 1 {
                let team = self.factory.new_team();
                while team.player_count() != self.config.team_player_limit {
                    if !self.find_group_for_team(&team, &mut groups) {
                        break;
                    }
                }
                if team.player_count() == 0 {
                    break;
                }
                tmp_teams.push(team);
            }

            // Top up the carried partial rooms.
            for room in &tmp_rooms {
                if room.teams().len() == self.config.room_team_limit {
                    continue;
                }
                while room.teams().len() != self.config.room_team_limit {
                    if !self.find_team_for_room(room, &mut tmp_teams) {
                        break;
                    }
                }
            }

            // Build new rooms from the complete teams.
            let try_room_times = tmp_teams.len() / self.config.room_team_limit;
            for _ in 0..try_room_times + 1 {
                let room = self.factory.new_room();
                while room.teams().len() != self.config.room_team_limit {
                    if !self.find_team_for_room(&room, &mut tmp_teams) {
                        break;
                    }
                }
                if room.teams().is_empty() {
                    break;
                }
                tmp_rooms.push(room);
            }

            // Pad long-waiting partial rooms with AI opposition. The room's
            // current seed team gates eligibility for every extraction.
            let mut ai_rooms: Vec<RoomRef> = Vec::new();
            for room in &tmp_rooms {
                let teams = room.teams();
                if teams.is_empty() || teams.len() == self.config.room_team_limit {
                    continue;
                }
                for team in teams {
                    let Some(seed) = room.teams().into_iter().next() else {
                        break;
                    };
                    if !seed.groups().iter().all(|g| g.can_fill_ai()) {
                        continue;
                    }
                    room.remove_team(&team);
                    ai_rooms.push(self.factory.new_room_with_ai(team));
                }
            }
            tmp_rooms.extend(ai_rooms);

            // Emit what completed; keep the rest for the next pass.
            let mut kept: Vec<RoomRef> = Vec::with_capacity(tmp_rooms.len());
            for room in tmp_rooms {
                if room.teams().len() == self.config.room_team_limit {
                    self.emit_room(room);
                } else {
                    kept.push(room);
                }
            }
            tmp_rooms = kept;
        }

        scratch.match_turn = (scratch.match_turn + 1) % REFRESH_TURN;
        if scratch.match_turn == 0 {
            // Shuffle: tear every partial assembly back into loose groups.
            groups.extend(drain_partials(tmp_teams, tmp_rooms));
        } else {
            scratch.tmp_teams = tmp_teams;
            scratch.tmp_rooms = tmp_rooms;
        }

        groups
    }

    /// Find a group for `team` and absorb it.
    ///
    /// An empty team seeds with the first group unconditionally. Otherwise
    /// prefer candidates that exactly fill the team, then any that fit,
    /// picking the MMR closest to the team average (first seen wins ties).
    /// The single chosen candidate must pass compatibility; a veto is not
    /// retried against the next-closest this pass.
    fn find_group_for_team(&self, team: &TeamRef, groups: &mut Vec<GroupRef>) -> bool {
        if team.player_count() == 0 && !groups.is_empty() {
            team.add_group(groups.remove(0));
            return true;
        }

        let limit = self.config.team_player_limit;
        let have = team.player_count();
        let average = team.average_mmr();
        let distance = |g: &GroupRef| (g.mmr() - average).abs();

        let mut closest: Option<usize> = None;
        for (i, group) in groups.iter().enumerate() {
            if have + group.players().len() == limit
                && closest.map_or(true, |c| distance(group) < distance(&groups[c]))
            {
                closest = Some(i);
            }
        }
        if closest.is_none() {
            for (i, group) in groups.iter().enumerate() {
                if have + group.players().len() <= limit
                    && closest.map_or(true, |c| distance(group) < distance(&groups[c]))
                {
                    closest = Some(i);
                }
            }
        }
        let Some(index) = closest else {
            return false;
        };

        let now = self.clock.now_sec();
        if self
            .policy
            .can_group_join_team(now, team.as_ref(), groups[index].as_ref())
        {
            team.add_group(groups.remove(index));
            return true;
        }
        false
    }

    /// Find a complete team for `room` and move it in. An empty room accepts
    /// the first complete team unconditionally.
    fn find_team_for_room(&self, room: &RoomRef, tmp_teams: &mut Vec<TeamRef>) -> bool {
        let now = self.clock.now_sec();
        let mut chosen = None;
        for (i, team) in tmp_teams.iter().enumerate() {
            if room.teams().len() >= self.config.room_team_limit {
                break;
            }
            if team.player_count() != self.config.team_player_limit {
                continue;
            }
            if room.teams().is_empty()
                || self.policy.can_team_join_room(now, room.as_ref(), team.as_ref())
            {
                chosen = Some(i);
                break;
            }
        }
        match chosen {
            Some(i) => {
                room.add_team(tmp_teams.remove(i));
                true
            }
            None => false,
        }
    }

    fn emit_room(&self, room: RoomRef) {
        let now = self.clock.now_sec();
        room.set_finish_match_time_sec(now);
        for team in room.teams() {
            for group in team.groups() {
                group.set_state(GroupState::Matched);
            }
        }
        tracing::debug!(
            queue = %self.name,
            players = room.player_count(),
            has_ai = room.has_ai(),
            wait_sec = now - room.start_match_time_sec(),
            "room completed"
        );
        self.sink.deliver_detached(room);
    }

    /// Shutdown: drain partial state back into the buffer, cancel every
    /// still-queuing group, and hand the drained groups to the caller.
    pub fn stop_match(&self) -> Vec<GroupRef> {
        let mut scratch = self.scratch.lock().unwrap();
        let tmp_teams = std::mem::take(&mut scratch.tmp_teams);
        let tmp_rooms = std::mem::take(&mut scratch.tmp_rooms);
        drop(scratch);

        let mut buffer = self.groups.lock().unwrap();
        buffer.extend(drain_partials(tmp_teams, tmp_rooms));

        let drained: Vec<GroupRef> = buffer.drain(..).collect();
        for group in &drained {
            if group.state() != GroupState::Queuing {
                continue;
            }
            for player in group.players() {
                if !player.is_ai() {
                    player.force_cancel_match();
                }
            }
            group.set_state(GroupState::Unready);
        }
        drained
    }
}

/// Flatten partial teams and rooms back into their member groups.
fn drain_partials(tmp_teams: Vec<TeamRef>, tmp_rooms: Vec<RoomRef>) -> Vec<GroupRef> {
    let mut groups = Vec::new();
    for team in tmp_teams {
        groups.extend(team.groups());
    }
    for room in tmp_rooms {
        for team in room.teams() {
            groups.extend(team.groups());
        }
    }
    groups
}
