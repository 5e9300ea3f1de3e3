//! Prelude module with commonly used types and traits
//!
//! Import this module to get all the essential types for using roomforge:
//!
//! ```rust
//! use roomforge::prelude::*;
//! ```

pub use crate::{
    clock::{Clock, ClockRef, ManualClock, SystemClock},
    error::{Result, RoomForgeError},
    matcher::{Matcher, NORMAL_QUEUE, TEAM_QUEUE},
    mmr::{Glicko2Period, Outcome, Rating, RatingPeriod},
    model::{
        EntityFactory, Group, GroupRef, GroupState, GroupType, Player, PlayerRef, Room, RoomRef,
        Team, TeamRef,
    },
    queue::{MatchPolicy, MatchRange, Queue, QueueConfig, QueueSnapshot, REFRESH_TURN},
    settler::Settler,
    sink::{room_channel, RoomSink, DEFAULT_SINK_CAPACITY},
    standard::{StandardFactory, StandardGroup, StandardPlayer, StandardRoom, StandardTeam},
};

// Re-export common external dependencies
pub use std::sync::Arc;
pub use uuid::Uuid;
