pub mod glicko2;
pub mod rating;

pub use glicko2::{Glicko2Period, RatingPeriod, DEFAULT_TAU};
pub use rating::{Outcome, Rating};
