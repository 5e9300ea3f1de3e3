pub mod config;
pub mod constraints;
pub mod lane;

pub use config::QueueConfig;
pub use constraints::{MatchPolicy, MatchRange};
pub use lane::{Queue, QueueSnapshot, REFRESH_TURN};
