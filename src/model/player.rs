use std::sync::Arc;

use crate::error::Result;
use crate::mmr::Rating;

/// A player as seen by the matchmaker and the settler.
///
/// Implementations own their storage and locking; the engine only reads
/// aggregates and writes ratings, ranks, and match timestamps through this
/// contract.
pub trait Player: Send + Sync {
    fn id(&self) -> String;

    fn is_ai(&self) -> bool;

    /// Difficulty level for AI players; 0 for humans.
    fn ai_level(&self) -> i64;

    /// Current MMR, i.e. the rating component of the Glicko-2 triple.
    fn mmr(&self) -> f64;

    /// Progression rank ("star count"); the rank-gap constraint compares
    /// these.
    fn star(&self) -> i32;
    fn set_star(&self, star: i32);

    fn rating(&self) -> Rating;

    /// Replace the rating triple. Implementations reject non-finite values
    /// and leave state untouched on error.
    fn set_rating(&self, rating: Rating) -> Result<()>;

    fn start_match_time_sec(&self) -> i64;
    fn set_start_match_time_sec(&self, t: i64);

    fn finish_match_time_sec(&self) -> i64;
    fn set_finish_match_time_sec(&self, t: i64);

    /// Post-match rank within the player's team.
    fn rank(&self) -> i32;
    fn set_rank(&self, rank: i32);

    /// Host hook invoked for each queuing human player on engine shutdown.
    fn force_cancel_match(&self);
}

pub type PlayerRef = Arc<dyn Player>;
