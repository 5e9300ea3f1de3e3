use std::sync::RwLock;

use crate::error::{Result, RoomForgeError};
use crate::mmr::Rating;
use crate::model::Player;

/// In-memory [`Player`] backed by a read-write lock.
pub struct StandardPlayer {
    id: String,
    is_ai: bool,
    ai_level: i64,
    inner: RwLock<PlayerInner>,
}

#[derive(Debug, Clone, Copy)]
struct PlayerInner {
    rating: Rating,
    star: i32,
    rank: i32,
    start_match_time_sec: i64,
    finish_match_time_sec: i64,
}

impl StandardPlayer {
    pub fn new(id: impl Into<String>, rating: Rating) -> Self {
        Self {
            id: id.into(),
            is_ai: false,
            ai_level: 0,
            inner: RwLock::new(PlayerInner {
                rating,
                star: 0,
                rank: 0,
                start_match_time_sec: 0,
                finish_match_time_sec: 0,
            }),
        }
    }

    /// A synthesized AI opponent. AI carries a placeholder rating and is
    /// skipped by the settler.
    pub fn new_ai(id: impl Into<String>, ai_level: i64) -> Self {
        Self {
            id: id.into(),
            is_ai: true,
            ai_level,
            inner: RwLock::new(PlayerInner {
                rating: Rating::unrated(),
                star: 0,
                rank: 0,
                start_match_time_sec: 0,
                finish_match_time_sec: 0,
            }),
        }
    }

    pub fn with_star(self, star: i32) -> Self {
        self.inner.write().unwrap().star = star;
        self
    }
}

impl Player for StandardPlayer {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn is_ai(&self) -> bool {
        self.is_ai
    }

    fn ai_level(&self) -> i64 {
        self.ai_level
    }

    fn mmr(&self) -> f64 {
        self.inner.read().unwrap().rating.rating
    }

    fn star(&self) -> i32 {
        self.inner.read().unwrap().star
    }

    fn set_star(&self, star: i32) {
        self.inner.write().unwrap().star = star;
    }

    fn rating(&self) -> Rating {
        self.inner.read().unwrap().rating
    }

    fn set_rating(&self, rating: Rating) -> Result<()> {
        if !rating.is_finite() {
            return Err(RoomForgeError::InvalidRating {
                player: self.id.clone(),
                reason: format!("non-finite components: {rating:?}"),
            });
        }
        self.inner.write().unwrap().rating = rating;
        Ok(())
    }

    fn start_match_time_sec(&self) -> i64 {
        self.inner.read().unwrap().start_match_time_sec
    }

    fn set_start_match_time_sec(&self, t: i64) {
        self.inner.write().unwrap().start_match_time_sec = t;
    }

    fn finish_match_time_sec(&self) -> i64 {
        self.inner.read().unwrap().finish_match_time_sec
    }

    fn set_finish_match_time_sec(&self, t: i64) {
        self.inner.write().unwrap().finish_match_time_sec = t;
    }

    fn rank(&self) -> i32 {
        self.inner.read().unwrap().rank
    }

    fn set_rank(&self, rank: i32) {
        self.inner.write().unwrap().rank = rank;
    }

    fn force_cancel_match(&self) {
        tracing::debug!(player = %self.id, "match force-cancelled");
    }
}
