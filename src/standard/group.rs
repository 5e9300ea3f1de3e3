use std::collections::HashSet;
use std::sync::RwLock;

use crate::clock::ClockRef;
use crate::model::{Group, GroupState, GroupType, Player, PlayerRef};

/// Intra-group MMR variance at or above which a full party counts as
/// unfriendly (mildly skill-stacked).
pub const UNFRIENDLY_TEAM_VARIANCE_MIN: f64 = 1_000.0;
/// Variance at or above which a full party counts as malicious (a smurf
/// carry).
pub const MALICIOUS_TEAM_VARIANCE_MIN: f64 = 100_000.0;

/// How long every member must have waited before the group accepts AI
/// opponents.
pub const DEFAULT_AI_FILL_WAIT_SEC: i64 = 5;

const FULL_PARTY_SIZE: usize = 5;

/// In-memory [`Group`].
pub struct StandardGroup {
    id: String,
    clock: ClockRef,
    ai_fill_wait_sec: i64,
    inner: RwLock<GroupInner>,
}

struct GroupInner {
    players: Vec<PlayerRef>,
    ids: HashSet<String>,
    state: GroupState,
    start_match_time_sec: i64,
}

impl StandardGroup {
    pub fn new(id: impl Into<String>, players: Vec<PlayerRef>, clock: ClockRef) -> Self {
        let mut inner = GroupInner {
            players: Vec::with_capacity(players.len()),
            ids: HashSet::new(),
            state: GroupState::Unready,
            start_match_time_sec: 0,
        };
        for player in players {
            if !inner.ids.insert(player.id()) {
                continue;
            }
            let start = player.start_match_time_sec();
            if start != 0
                && (inner.start_match_time_sec == 0 || inner.start_match_time_sec > start)
            {
                inner.start_match_time_sec = start;
            }
            inner.players.push(player);
        }
        Self {
            id: id.into(),
            clock,
            ai_fill_wait_sec: DEFAULT_AI_FILL_WAIT_SEC,
            inner: RwLock::new(inner),
        }
    }

    /// Override the AI-fill wait threshold.
    pub fn with_ai_fill_wait(mut self, wait_sec: i64) -> Self {
        self.ai_fill_wait_sec = wait_sec;
        self
    }
}

impl Group for StandardGroup {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn players(&self) -> Vec<PlayerRef> {
        self.inner.read().unwrap().players.clone()
    }

    fn add_players(&self, players: Vec<PlayerRef>) {
        let mut inner = self.inner.write().unwrap();
        for player in players {
            if inner.ids.insert(player.id()) {
                inner.players.push(player);
            }
        }
    }

    fn remove_player(&self, player_id: &str) {
        let mut inner = self.inner.write().unwrap();
        if !inner.ids.remove(player_id) {
            return;
        }
        inner.players.retain(|p| p.id() != player_id);
        let mut min_start = 0;
        for p in &inner.players {
            let start = p.start_match_time_sec();
            if start != 0 && (min_start == 0 || min_start > start) {
                min_start = start;
            }
        }
        inner.start_match_time_sec = min_start;
    }

    fn mmr(&self) -> f64 {
        match self.group_type() {
            GroupType::UnfriendlyTeam => {
                let penalised = self.average_mmr() * 1.5;
                penalised.min(self.biggest_mmr())
            }
            GroupType::MaliciousTeam => self.biggest_mmr(),
            _ => self.average_mmr(),
        }
    }

    fn star(&self) -> i32 {
        let inner = self.inner.read().unwrap();
        if inner.players.is_empty() {
            return 0;
        }
        let total: i32 = inner.players.iter().map(|p| p.star()).sum();
        total / inner.players.len() as i32
    }

    fn mmr_variance(&self) -> f64 {
        let inner = self.inner.read().unwrap();
        if inner.players.is_empty() {
            return 0.0;
        }
        let n = inner.players.len() as f64;
        let mean = inner.players.iter().map(|p| p.mmr()).sum::<f64>() / n;
        inner
            .players
            .iter()
            .map(|p| (p.mmr() - mean).powi(2))
            .sum::<f64>()
            / n
    }

    fn average_mmr(&self) -> f64 {
        let inner = self.inner.read().unwrap();
        if inner.players.is_empty() {
            return 0.0;
        }
        inner.players.iter().map(|p| p.mmr()).sum::<f64>() / inner.players.len() as f64
    }

    fn biggest_mmr(&self) -> f64 {
        let inner = self.inner.read().unwrap();
        inner.players.iter().map(|p| p.mmr()).fold(0.0, f64::max)
    }

    fn state(&self) -> GroupState {
        self.inner.read().unwrap().state
    }

    fn set_state(&self, state: GroupState) {
        self.inner.write().unwrap().state = state;
    }

    fn start_match_time_sec(&self) -> i64 {
        self.inner.read().unwrap().start_match_time_sec
    }

    fn set_start_match_time_sec(&self, t: i64) {
        let mut inner = self.inner.write().unwrap();
        inner.start_match_time_sec = t;
        for p in &inner.players {
            p.set_start_match_time_sec(t);
        }
    }

    fn finish_match_time_sec(&self) -> i64 {
        let inner = self.inner.read().unwrap();
        inner
            .players
            .first()
            .map(|p| p.finish_match_time_sec())
            .unwrap_or(0)
    }

    fn set_finish_match_time_sec(&self, t: i64) {
        let inner = self.inner.read().unwrap();
        for p in &inner.players {
            p.set_finish_match_time_sec(t);
        }
    }

    fn group_type(&self) -> GroupType {
        let inner = self.inner.read().unwrap();
        if inner.players.len() != FULL_PARTY_SIZE {
            return GroupType::NotTeam;
        }
        drop(inner);
        let variance = self.mmr_variance();
        if variance >= MALICIOUS_TEAM_VARIANCE_MIN {
            GroupType::MaliciousTeam
        } else if variance >= UNFRIENDLY_TEAM_VARIANCE_MIN {
            GroupType::UnfriendlyTeam
        } else {
            GroupType::NormalTeam
        }
    }

    fn can_fill_ai(&self) -> bool {
        let now = self.clock.now_sec();
        let inner = self.inner.read().unwrap();
        inner
            .players
            .iter()
            .all(|p| now - p.start_match_time_sec() > self.ai_fill_wait_sec)
    }
}
