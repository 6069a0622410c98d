use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{DecisionRecord, Difficulty, Explanation, FinalScore, Listing, Rating};
use crate::tips::{legit_tips, scam_tips};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no listing at position {position}: session of {total} listings is complete")]
    OutOfRange { position: usize, total: usize },
}

/// Decision engine for one swipe session.
///
/// Owns the listing order, the cursor, the score and the append-only
/// decision history. `score` always equals the number of correct entries in
/// `history`, and `history.len()` always equals `position`.
#[derive(Debug, Clone)]
pub struct AccommodationGame {
    listings: Vec<Listing>,
    difficulty: Difficulty,
    position: usize,
    score: u32,
    history: Vec<DecisionRecord>,
}

impl AccommodationGame {
    pub fn new(listings: Vec<Listing>, difficulty: Difficulty) -> Self {
        Self {
            listings,
            difficulty,
            position: 0,
            score: 0,
            history: Vec::new(),
        }
    }

    /// Same as [`AccommodationGame::new`] but with the listing order shuffled first.
    pub fn shuffled(mut listings: Vec<Listing>, difficulty: Difficulty) -> Self {
        listings.shuffle(&mut rand::thread_rng());
        Self::new(listings, difficulty)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn history(&self) -> &[DecisionRecord] {
        &self.history
    }

    pub fn current_accommodation(&self) -> Option<&Listing> {
        self.listings.get(self.position)
    }

    pub fn is_complete(&self) -> bool {
        self.position >= self.listings.len()
    }

    /// Score the current listing. `user_choice == true` means "legitimate".
    pub fn submit_decision(&mut self, user_choice: bool) -> Result<&DecisionRecord, GameError> {
        let Some(listing) = self.listings.get(self.position) else {
            return Err(GameError::OutOfRange {
                position: self.position,
                total: self.listings.len(),
            });
        };

        let is_correct = user_choice != listing.is_scam;
        let explanation = if listing.is_scam {
            Explanation::Scam {
                flags: listing.red_flags.clone(),
                tips: scam_tips(self.difficulty),
            }
        } else {
            Explanation::Legitimate {
                flags: listing.green_flags.clone(),
                tips: legit_tips(self.difficulty),
            }
        };
        let points_awarded = u32::from(is_correct);

        debug!(
            listing_id = %listing.id,
            position = self.position,
            user_choice,
            is_correct,
            "game.submit_decision"
        );

        self.history.push(DecisionRecord {
            listing: listing.clone(),
            user_choice,
            is_correct,
            explanation,
            points_awarded,
        });
        self.score += points_awarded;
        self.position += 1;

        if self.is_complete() {
            info!(score = self.score, total = self.listings.len(), "game.complete");
        }

        Ok(&self.history[self.history.len() - 1])
    }

    /// Summary of the session so far. An empty session reports 0%.
    pub fn final_score(&self) -> FinalScore {
        let total = self.listings.len();
        let percentage = percentage(self.score, total);
        FinalScore {
            score: self.score,
            total,
            percentage,
            rating: Rating::from_percentage(percentage),
            history: self.history.clone(),
        }
    }

    pub fn reset(&mut self) {
        self.reset_with_rng(&mut rand::thread_rng());
    }

    /// Clear progress and reshuffle with a uniform (Fisher-Yates) permutation.
    pub fn reset_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.position = 0;
        self.score = 0;
        self.history.clear();
        self.listings.shuffle(rng);
        info!(total = self.listings.len(), "game.reset");
    }
}

fn percentage(score: u32, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * f64::from(score) / total as f64).round() as u32
}
