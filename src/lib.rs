//! roomforge
//!
//! A real-time matchmaking engine for team-based games: pre-formed parties
//! of 1–5 players are assembled into five-player teams and three-team rooms,
//! with wait-time-relaxed skill constraints, AI padding for lonely parties,
//! and Glicko-2 rating settlement once a room finishes.
//!
//! # Quick start
//!
//! ```no_run
//! use roomforge::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let clock: ClockRef = Arc::new(SystemClock);
//!     let (sink, mut rooms) = room_channel(DEFAULT_SINK_CAPACITY);
//!     let factory = Arc::new(StandardFactory::new(clock.clone()));
//!
//!     let matcher = Arc::new(Matcher::new(
//!         sink,
//!         QueueConfig::default(),
//!         factory,
//!         clock.clone(),
//!     )?);
//!
//!     // The tick loop runs on its own task.
//!     let driver = matcher.clone();
//!     tokio::spawn(async move {
//!         if let Err(e) = driver.run().await {
//!             eprintln!("matcher error: {e}");
//!         }
//!     });
//!
//!     // Queue a solo player.
//!     let players: Vec<PlayerRef> =
//!         vec![Arc::new(StandardPlayer::new("player-1", Rating::default_beginner()))];
//!     let group: GroupRef = Arc::new(StandardGroup::new("group-1", players, clock.clone()));
//!     matcher.add_groups(vec![group]);
//!
//!     // Consume completed rooms; settle once the match finishes.
//!     let settler = Settler::new();
//!     while let Some(room) = rooms.recv().await {
//!         println!("room ready: {} players, ai: {}", room.player_count(), room.has_ai());
//!         // ... play the match, assign ranks, then:
//!         settler.update_ratings(&room)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod error;
pub mod matcher;
pub mod mmr;
pub mod model;
pub mod queue;
pub mod settler;
pub mod sink;
pub mod standard;

// Re-export commonly used types
pub use clock::{Clock, ClockRef, ManualClock, SystemClock};
pub use error::{Result, RoomForgeError};
pub use matcher::{Matcher, NORMAL_QUEUE, TEAM_QUEUE};
pub use mmr::{Glicko2Period, Outcome, Rating, RatingPeriod};
pub use model::{
    EntityFactory, Group, GroupRef, GroupState, GroupType, Player, PlayerRef, Room, RoomRef, Team,
    TeamRef,
};
pub use queue::{MatchPolicy, MatchRange, Queue, QueueConfig, QueueSnapshot, REFRESH_TURN};
pub use settler::Settler;
pub use sink::{room_channel, RoomSink, DEFAULT_SINK_CAPACITY};
pub use standard::{StandardFactory, StandardGroup, StandardPlayer, StandardRoom, StandardTeam};

/// Prelude module for convenient imports
pub mod prelude;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn basic_matchmaking_flow() -> Result<()> {
        let clock: ClockRef = Arc::new(ManualClock::new(1_000));
        let (sink, mut rooms) = room_channel(DEFAULT_SINK_CAPACITY);
        let factory = Arc::new(StandardFactory::new(clock.clone()));
        let matcher = Matcher::new(sink, QueueConfig::default(), factory, clock.clone())?;

        // Three full parties of even skill.
        let groups: Vec<GroupRef> = (0..3)
            .map(|i| {
                let players: Vec<PlayerRef> = (0..5)
                    .map(|j| {
                        Arc::new(StandardPlayer::new(
                            format!("p-{i}-{j}"),
                            Rating::default_beginner(),
                        )) as PlayerRef
                    })
                    .collect();
                Arc::new(StandardGroup::new(format!("g-{i}"), players, clock.clone())) as GroupRef
            })
            .collect();
        matcher.add_groups(groups);

        matcher.tick().await;

        let room = rooms.recv().await.expect("room should be emitted");
        assert_eq!(room.teams().len(), 3);
        assert_eq!(room.player_count(), 15);
        assert!(!room.has_ai());
        Ok(())
    }
}
