//! Post-match rating settlement.
//!
//! A finished room arrives with its teams ranked 1..3 and each player ranked
//! within their team. The settler flattens those standings into pairwise WIN
//! results (better team beats worse team, better teammate beats worse
//! teammate), runs one rating period over them, and writes the new triples
//! back. AI players take part in neither results nor write-back.

use crate::error::Result;
use crate::mmr::{Glicko2Period, Outcome, RatingPeriod};
use crate::model::{Group, Player, PlayerRef, Room, RoomRef, Team};

/// Stateless converter from room standings to rating updates.
#[derive(Debug, Default)]
pub struct Settler;

impl Settler {
    pub fn new() -> Self {
        Self
    }

    /// Settle with the shipped Glicko-2 period.
    pub fn update_ratings(&self, room: &RoomRef) -> Result<()> {
        self.update_ratings_with(room, &mut Glicko2Period::default())
    }

    /// Settle against a caller-provided rating period.
    pub fn update_ratings_with<P: RatingPeriod>(
        &self,
        room: &RoomRef,
        period: &mut P,
    ) -> Result<()> {
        let teams = room.sort_teams_by_rank();

        let mut humans: Vec<PlayerRef> = Vec::new();
        for team in &teams {
            for group in team.groups() {
                for player in group.players() {
                    if player.is_ai() {
                        continue;
                    }
                    period.register(&player.id(), player.rating());
                    humans.push(player);
                }
            }
        }

        // Between teams: everyone on a better team beats everyone on every
        // worse team.
        for (i, winner_team) in teams.iter().enumerate() {
            for loser_team in teams.iter().skip(i + 1) {
                for winner_group in winner_team.groups() {
                    for winner in winner_group.players() {
                        if winner.is_ai() {
                            continue;
                        }
                        for loser_group in loser_team.groups() {
                            for loser in loser_group.players() {
                                if loser.is_ai() {
                                    continue;
                                }
                                period.add_match(&winner.id(), &loser.id(), Outcome::Win);
                            }
                        }
                    }
                }
            }
        }

        // Within each team: rank order decides, pairs touching an AI are
        // skipped.
        for team in &teams {
            let players = team.sort_players_by_rank();
            for (j, winner) in players.iter().enumerate() {
                if winner.is_ai() {
                    continue;
                }
                for loser in players.iter().skip(j + 1) {
                    if loser.is_ai() {
                        continue;
                    }
                    period.add_match(&winner.id(), &loser.id(), Outcome::Win);
                }
            }
        }

        let updated = period.calculate();
        for player in humans {
            if let Some(rating) = updated.get(&player.id()) {
                player.set_rating(*rating)?;
                tracing::debug!(
                    player = %player.id(),
                    mmr = rating.rating,
                    rd = rating.deviation,
                    sigma = rating.volatility,
                    "rating settled"
                );
            }
        }
        Ok(())
    }
}
