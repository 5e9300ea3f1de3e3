//! Glicko-2 rating periods.
//!
//! A rating period accumulates pairwise match results between registered
//! players and, on [`RatingPeriod::calculate`], produces the updated rating
//! triple for every participant following Glickman's published algorithm.

use std::collections::HashMap;

use super::rating::{Outcome, Rating};

/// Glicko-2 internal scale factor between display ratings and `mu`/`phi`.
const GLICKO2_SCALE: f64 = 173.7178;
/// Display rating that maps to `mu = 0`.
const BASE_RATING: f64 = 1500.0;
/// Convergence bound for the volatility iteration.
const CONVERGENCE_TOLERANCE: f64 = 1e-6;

/// Default system constant constraining volatility change per period.
pub const DEFAULT_TAU: f64 = 0.5;

/// One rating period: register participants, record results, calculate.
///
/// The settler drives this through the trait so hosts can substitute their
/// own rating backend.
pub trait RatingPeriod {
    /// Make a player part of this period with their pre-period rating.
    /// Re-registering an id keeps the first rating.
    fn register(&mut self, player_id: &str, rating: Rating);

    /// Record a result between two registered players. `Outcome::Win` means
    /// the first player won. Results naming an unregistered id are dropped.
    fn add_match(&mut self, winner_id: &str, loser_id: &str, outcome: Outcome);

    /// Close the period and return the post-period rating for every
    /// registered player, including those without results (their deviation
    /// grows per the algorithm).
    fn calculate(&mut self) -> HashMap<String, Rating>;
}

struct GameResult {
    opponent_mu: f64,
    opponent_phi: f64,
    score: f64,
}

struct PeriodEntry {
    rating: Rating,
    results: Vec<GameResult>,
}

/// The shipped [`RatingPeriod`]: a full Glicko-2 implementation.
///
/// Registered ratings must have `volatility > 0`.
pub struct Glicko2Period {
    tau: f64,
    players: HashMap<String, PeriodEntry>,
}

impl Glicko2Period {
    pub fn new(tau: f64) -> Self {
        Self {
            tau,
            players: HashMap::new(),
        }
    }

    fn rating_of(&self, player_id: &str) -> Option<Rating> {
        self.players.get(player_id).map(|e| e.rating)
    }

    fn push_result(&mut self, player_id: &str, opponent: Rating, score: f64) {
        if let Some(entry) = self.players.get_mut(player_id) {
            entry.results.push(GameResult {
                opponent_mu: to_mu(opponent.rating),
                opponent_phi: to_phi(opponent.deviation),
                score,
            });
        }
    }

    fn updated_rating(&self, entry: &PeriodEntry) -> Rating {
        let mu = to_mu(entry.rating.rating);
        let phi = to_phi(entry.rating.deviation);
        let sigma = entry.rating.volatility;

        if entry.results.is_empty() {
            // No games this period: uncertainty drifts upward.
            let phi_star = (phi * phi + sigma * sigma).sqrt();
            return Rating::new(entry.rating.rating, phi_star * GLICKO2_SCALE, sigma);
        }

        let mut v_inv = 0.0;
        let mut delta_sum = 0.0;
        for game in &entry.results {
            let g = g(game.opponent_phi);
            let e = e(mu, game.opponent_mu, game.opponent_phi);
            v_inv += g * g * e * (1.0 - e);
            delta_sum += g * (game.score - e);
        }
        let v = 1.0 / v_inv;
        let delta = v * delta_sum;

        let sigma_prime = self.updated_volatility(phi, v, delta, sigma);
        let phi_star = (phi * phi + sigma_prime * sigma_prime).sqrt();
        let phi_prime = 1.0 / (1.0 / (phi_star * phi_star) + 1.0 / v).sqrt();
        let mu_prime = mu + phi_prime * phi_prime * delta_sum;

        Rating::new(
            BASE_RATING + mu_prime * GLICKO2_SCALE,
            phi_prime * GLICKO2_SCALE,
            sigma_prime,
        )
    }

    /// Volatility update via the Illinois variant of regula falsi.
    fn updated_volatility(&self, phi: f64, v: f64, delta: f64, sigma: f64) -> f64 {
        let a = (sigma * sigma).ln();
        let phi2 = phi * phi;
        let delta2 = delta * delta;
        let tau = self.tau;

        let f = |x: f64| {
            let ex = x.exp();
            ex * (delta2 - phi2 - v - ex) / (2.0 * (phi2 + v + ex).powi(2)) - (x - a) / (tau * tau)
        };

        let mut big_a = a;
        let mut big_b = if delta2 > phi2 + v {
            (delta2 - phi2 - v).ln()
        } else {
            let mut k = 1.0;
            while f(a - k * tau) < 0.0 {
                k += 1.0;
            }
            a - k * tau
        };

        let mut f_a = f(big_a);
        let mut f_b = f(big_b);
        while (big_b - big_a).abs() > CONVERGENCE_TOLERANCE {
            let big_c = big_a + (big_a - big_b) * f_a / (f_b - f_a);
            let f_c = f(big_c);
            if f_c * f_b <= 0.0 {
                big_a = big_b;
                f_a = f_b;
            } else {
                f_a /= 2.0;
            }
            big_b = big_c;
            f_b = f_c;
        }

        (big_a / 2.0).exp()
    }
}

impl Default for Glicko2Period {
    fn default() -> Self {
        Self::new(DEFAULT_TAU)
    }
}

impl RatingPeriod for Glicko2Period {
    fn register(&mut self, player_id: &str, rating: Rating) {
        self.players
            .entry(player_id.to_string())
            .or_insert(PeriodEntry {
                rating,
                results: Vec::new(),
            });
    }

    fn add_match(&mut self, winner_id: &str, loser_id: &str, outcome: Outcome) {
        let (Some(winner), Some(loser)) = (self.rating_of(winner_id), self.rating_of(loser_id))
        else {
            tracing::debug!(winner_id, loser_id, "dropping result for unregistered player");
            return;
        };
        self.push_result(winner_id, loser, outcome.score());
        self.push_result(loser_id, winner, 1.0 - outcome.score());
    }

    fn calculate(&mut self) -> HashMap<String, Rating> {
        let updated = self
            .players
            .iter()
            .map(|(id, entry)| (id.clone(), self.updated_rating(entry)))
            .collect();
        self.players.clear();
        updated
    }
}

fn to_mu(rating: f64) -> f64 {
    (rating - BASE_RATING) / GLICKO2_SCALE
}

fn to_phi(deviation: f64) -> f64 {
    deviation / GLICKO2_SCALE
}

fn g(phi: f64) -> f64 {
    1.0 / (1.0 + 3.0 * phi * phi / (std::f64::consts::PI * std::f64::consts::PI)).sqrt()
}

fn e(mu: f64, opponent_mu: f64, opponent_phi: f64) -> f64 {
    1.0 / (1.0 + (-g(opponent_phi) * (mu - opponent_mu)).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The worked example from Glickman's Glicko-2 paper: a 1500/200/0.06
    /// player beats 1400/30, then loses to 1550/100 and 1700/300.
    #[test]
    fn matches_published_example() {
        let mut period = Glicko2Period::default();
        period.register("subject", Rating::new(1500.0, 200.0, 0.06));
        period.register("a", Rating::new(1400.0, 30.0, 0.06));
        period.register("b", Rating::new(1550.0, 100.0, 0.06));
        period.register("c", Rating::new(1700.0, 300.0, 0.06));

        period.add_match("subject", "a", Outcome::Win);
        period.add_match("b", "subject", Outcome::Win);
        period.add_match("c", "subject", Outcome::Win);

        let updated = period.calculate();
        let subject = updated["subject"];
        assert!((subject.rating - 1464.06).abs() < 0.5);
        assert!((subject.deviation - 151.52).abs() < 0.5);
        assert!((subject.volatility - 0.05999).abs() < 0.001);
    }

    #[test]
    fn winner_gains_loser_drops() {
        let mut period = Glicko2Period::default();
        period.register("w", Rating::new(1500.0, 200.0, 0.06));
        period.register("l", Rating::new(1500.0, 200.0, 0.06));
        period.add_match("w", "l", Outcome::Win);

        let updated = period.calculate();
        assert!(updated["w"].rating > 1500.0);
        assert!(updated["l"].rating < 1500.0);
    }

    #[test]
    fn idle_player_deviation_grows() {
        let mut period = Glicko2Period::default();
        period.register("idle", Rating::new(1500.0, 200.0, 0.06));
        let updated = period.calculate();
        assert_eq!(updated["idle"].rating, 1500.0);
        assert!(updated["idle"].deviation > 200.0);
    }

    #[test]
    fn unregistered_results_are_dropped() {
        let mut period = Glicko2Period::default();
        period.register("w", Rating::new(1500.0, 200.0, 0.06));
        period.add_match("w", "ghost", Outcome::Win);
        let updated = period.calculate();
        assert_eq!(updated["w"].rating, 1500.0);
        assert!(!updated.contains_key("ghost"));
    }

    #[test]
    fn draw_moves_unequal_ratings_together() {
        let mut period = Glicko2Period::default();
        period.register("high", Rating::new(1700.0, 200.0, 0.06));
        period.register("low", Rating::new(1300.0, 200.0, 0.06));
        period.add_match("high", "low", Outcome::Draw);

        let updated = period.calculate();
        assert!(updated["high"].rating < 1700.0);
        assert!(updated["low"].rating > 1300.0);
    }
}
