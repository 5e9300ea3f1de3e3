//! Capability contracts for the entities the engine assembles.
//!
//! The matchmaker core never constructs or stores concrete players, groups,
//! teams, or rooms; it works against these traits and the
//! [`EntityFactory`] collaborator. Reference implementations live in
//! [`crate::standard`].

pub mod group;
pub mod player;
pub mod room;
pub mod team;

pub use group::{Group, GroupRef, GroupState, GroupType};
pub use player::{Player, PlayerRef};
pub use room::{EntityFactory, Room, RoomRef};
pub use team::{Team, TeamRef};
