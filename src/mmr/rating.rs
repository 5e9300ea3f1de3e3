use serde::{Deserialize, Serialize};

/// A player's Glicko-2 skill triple.
///
/// `rating` is the MMR the matchmaker compares, `deviation` the uncertainty
/// around it, `volatility` the expected rate of change. The settler rewrites
/// the whole triple after every finished room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
}

impl Rating {
    pub fn new(rating: f64, deviation: f64, volatility: f64) -> Self {
        Self {
            rating,
            deviation,
            volatility,
        }
    }

    /// Rating for a player the system knows nothing about yet.
    pub fn default_beginner() -> Self {
        Self {
            rating: 1500.0,
            deviation: 350.0,
            volatility: 0.06,
        }
    }

    /// Placeholder rating carried by synthesized AI players. AI never takes
    /// part in rating settlement.
    pub fn unrated() -> Self {
        Self {
            rating: 0.0,
            deviation: 0.0,
            volatility: 0.0,
        }
    }

    /// All three components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.rating.is_finite() && self.deviation.is_finite() && self.volatility.is_finite()
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::default_beginner()
    }
}

/// Match outcome from the first (winner-slot) player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    pub fn score(&self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => 0.0,
            Outcome::Draw => 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_beginner() {
        let r = Rating::default();
        assert_eq!(r.rating, 1500.0);
        assert_eq!(r.deviation, 350.0);
        assert_eq!(r.volatility, 0.06);
    }

    #[test]
    fn finite_check_catches_nan() {
        let mut r = Rating::default_beginner();
        assert!(r.is_finite());
        r.deviation = f64::NAN;
        assert!(!r.is_finite());
    }

    #[test]
    fn outcome_scores() {
        assert_eq!(Outcome::Win.score(), 1.0);
        assert_eq!(Outcome::Loss.score(), 0.0);
        assert_eq!(Outcome::Draw.score(), 0.5);
    }
}
