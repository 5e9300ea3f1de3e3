use serde::{Deserialize, Serialize};

use super::constraints::MatchRange;
use crate::error::{Result, RoomForgeError};

/// Per-queue matchmaking parameters. Both lanes of a matcher share one
/// config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Total players in an emitted room.
    pub room_player_limit: usize,
    /// Players per team.
    pub team_player_limit: usize,
    /// Teams per room.
    pub room_team_limit: usize,

    /// Longest stay in the team-exclusive lane for a normal party.
    pub normal_team_wait_time_sec: i64,
    /// Same, for an unfriendly party.
    pub unfriendly_team_wait_time_sec: i64,
    /// Same, for a malicious party.
    pub malicious_team_wait_time_sec: i64,

    /// Relaxation buckets, evaluated in order. Empty means the built-in
    /// fallback range applies to everyone.
    pub match_ranges: Vec<MatchRange>,
}

impl QueueConfig {
    pub fn validate(&self) -> Result<()> {
        if self.team_player_limit == 0 || self.room_team_limit == 0 {
            return Err(RoomForgeError::InvalidConfiguration(
                "team_player_limit and room_team_limit must be positive".to_string(),
            ));
        }
        if self.team_player_limit * self.room_team_limit != self.room_player_limit {
            return Err(RoomForgeError::InvalidConfiguration(format!(
                "room_player_limit {} != team_player_limit {} * room_team_limit {}",
                self.room_player_limit, self.team_player_limit, self.room_team_limit
            )));
        }
        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            room_player_limit: 15,
            team_player_limit: 5,
            room_team_limit: 3,
            normal_team_wait_time_sec: 5,
            unfriendly_team_wait_time_sec: 10,
            malicious_team_wait_time_sec: 15,
            match_ranges: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(QueueConfig::default().validate().is_ok());
    }

    #[test]
    fn mismatched_limits_are_fatal() {
        let config = QueueConfig {
            room_player_limit: 16,
            ..QueueConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RoomForgeError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = QueueConfig {
            match_ranges: vec![MatchRange {
                max_match_sec: 10,
                mmr_gap_percent: 20,
                can_join_team: true,
                rank_gap: 3,
            }],
            ..QueueConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: QueueConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.match_ranges, config.match_ranges);
        assert_eq!(back.room_player_limit, 15);
    }
}
