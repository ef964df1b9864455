//! Bracket: the round-partitioned match list of one tournament.

use crate::models::game::{GameMatch, MatchId};
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// All matches of a tournament across every round. Serialized as a plain list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bracket {
    matches: Vec<GameMatch>,
}

impl Bracket {
    pub fn new(matches: Vec<GameMatch>) -> Self {
        Self { matches }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn matches(&self) -> &[GameMatch] {
        &self.matches
    }

    pub fn get(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Highest round number, 0 for an empty bracket.
    pub fn round_count(&self) -> u32 {
        self.matches.iter().map(|m| m.round).max().unwrap_or(0)
    }

    /// Matches of one round, sorted by position.
    pub fn round(&self, round: u32) -> Vec<&GameMatch> {
        let mut matches: Vec<_> = self.matches.iter().filter(|m| m.round == round).collect();
        matches.sort_by_key(|m| m.position);
        matches
    }

    /// The single match of the last round.
    pub fn final_match(&self) -> Option<&GameMatch> {
        let last = self.round_count();
        self.matches.iter().find(|m| m.round == last)
    }

    pub fn is_final(&self, id: MatchId) -> bool {
        self.final_match().is_some_and(|m| m.id == id)
    }

    /// Whether round 1 is a preliminary round that trims the field to a power of two.
    pub fn has_preliminary_round(&self) -> bool {
        let first = self.round(1).len();
        let second = self.round(2).len();
        // A full round always has twice the matches of the one after it.
        second > 0 && first != second * 2
    }

    /// Winner of the final, once it has been played.
    pub fn champion(&self) -> Option<TeamId> {
        self.final_match()
            .filter(|m| m.is_completed())
            .and_then(|m| m.winner)
    }

    /// Display name of a round: "Final", "Semifinal", "Quarterfinal", or "Round N".
    pub fn round_name(&self, round: u32) -> String {
        let total = self.round_count();
        if round == 1 && self.has_preliminary_round() {
            return "Preliminary Round".to_string();
        }
        match total.checked_sub(round) {
            Some(0) => "Final".to_string(),
            Some(1) => "Semifinal".to_string(),
            Some(2) => "Quarterfinal".to_string(),
            _ => format!("Round {round}"),
        }
    }

    pub(crate) fn matches_mut(&mut self) -> &mut [GameMatch] {
        &mut self.matches
    }
}
