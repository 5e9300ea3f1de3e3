//! Reference entity implementations.
//!
//! Hosts with their own player and session models implement the
//! [`crate::model`] traits directly; these in-memory versions are complete
//! enough to run the engine as-is and back the crate's own tests.

pub mod group;
pub mod player;
pub mod room;
pub mod team;

pub use group::{
    StandardGroup, DEFAULT_AI_FILL_WAIT_SEC, MALICIOUS_TEAM_VARIANCE_MIN,
    UNFRIENDLY_TEAM_VARIANCE_MIN,
};
pub use player::StandardPlayer;
pub use room::{StandardFactory, StandardRoom};
pub use team::StandardTeam;
