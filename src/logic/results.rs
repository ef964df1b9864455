//! Match results: recording outcomes and advancing winners into the next round.

use crate::models::{
    Bracket, GameMatch, MatchId, MatchStatus, Score, Slot, TeamId, TournamentError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result entered by the organizer. The winner is authoritative; the score is informational.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: TeamId,
    #[serde(default)]
    pub score: Option<Score>,
}

impl MatchResult {
    pub fn winner(winner: TeamId) -> Self {
        Self { winner, score: None }
    }

    pub fn with_score(winner: TeamId, score: Score) -> Self {
        Self {
            winner,
            score: Some(score),
        }
    }
}

/// What propagating a match's winner did to the next round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Propagation {
    /// Winner placed into `slot` of the next-round match `match_id`.
    Advanced { match_id: MatchId, slot: Slot },
    /// Winner already sits in the next round; nothing changed.
    AlreadyPlaced { match_id: MatchId },
    /// The match was the final; there is no next round.
    Final,
    /// The match has no winner yet.
    NotCompleted,
    /// The next round has no open slot for the winner. Signals an inconsistent bracket.
    TargetNotFound,
}

/// Record a completed result for one match and advance the winner.
///
/// Rejects unknown matches, matches missing a team, winners that are not playing, and a
/// different winner for an already completed match. On rejection the bracket is untouched.
/// Recording the same winner again only refreshes the score.
pub fn record_result(
    bracket: &mut Bracket,
    match_id: MatchId,
    result: MatchResult,
) -> Result<Propagation, TournamentError> {
    let game = bracket
        .get_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if !game.is_ready() {
        return Err(TournamentError::MatchNotReady(match_id));
    }
    if !game.contains_team(result.winner) {
        return Err(TournamentError::InvalidWinner {
            match_id,
            winner: result.winner,
        });
    }
    if game.is_completed() && game.winner != Some(result.winner) {
        return Err(TournamentError::ResultAlreadyRecorded(match_id));
    }

    game.status = MatchStatus::Completed;
    game.winner = Some(result.winner);
    if result.score.is_some() {
        game.score = result.score;
    }
    log::info!(
        "Match {} (round {}, position {}) completed, winner {}",
        match_id,
        game.round,
        game.position,
        result.winner
    );

    propagate_winner(bracket, match_id)
}

/// Record a result from goals alone: the team with more goals wins. Ties are rejected.
pub fn record_score(
    bracket: &mut Bracket,
    match_id: MatchId,
    score: Score,
) -> Result<Propagation, TournamentError> {
    let game = bracket
        .get(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if !game.is_ready() {
        return Err(TournamentError::MatchNotReady(match_id));
    }
    let slot = score.leader().ok_or(TournamentError::TiedScore(match_id))?;
    let winner = game
        .team(slot)
        .map(|t| t.id)
        .ok_or(TournamentError::MatchNotReady(match_id))?;
    record_result(bracket, match_id, MatchResult::with_score(winner, score))
}

/// Place the winner of a completed match into the first open slot of the next round.
///
/// Candidates are the next-round matches in ascending position order, narrowed to the
/// match's `next_position` when it has one. A linked `next_slot` that is still empty takes
/// the winner; otherwise the winner takes the first empty `team1`, then the first empty
/// `team2`. A winner already present in the candidates is left alone, so repeated calls are
/// harmless.
pub fn propagate_winner(
    bracket: &mut Bracket,
    match_id: MatchId,
) -> Result<Propagation, TournamentError> {
    let game = bracket
        .get(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let Some(winner) = game.winning_team().cloned() else {
        return Ok(Propagation::NotCompleted);
    };
    let next_round = game.round + 1;
    let next_position = game.next_position;
    let next_slot = game.next_slot;

    if bracket.round(next_round).is_empty() {
        return Ok(Propagation::Final);
    }

    let mut candidates: Vec<&mut GameMatch> = bracket
        .matches_mut()
        .iter_mut()
        .filter(|m| m.round == next_round && next_position.map_or(true, |p| m.position == p))
        .collect();
    candidates.sort_by_key(|m| m.position);

    if let Some(existing) = candidates.iter().find(|m| m.contains_team(winner.id)) {
        return Ok(Propagation::AlreadyPlaced {
            match_id: existing.id,
        });
    }

    let linked = next_slot
        .filter(|_| next_position.is_some() && candidates.len() == 1)
        .filter(|&slot| candidates[0].team(slot).is_none())
        .map(|slot| (0, slot));
    let open = linked
        .or_else(|| {
            candidates
                .iter()
                .position(|m| m.team1.is_none())
                .map(|i| (i, Slot::One))
        })
        .or_else(|| {
            candidates
                .iter()
                .position(|m| m.team2.is_none())
                .map(|i| (i, Slot::Two))
        });

    match open {
        Some((i, slot)) => {
            let target = &mut candidates[i];
            log::debug!(
                "Advancing {} into round {} position {} ({:?})",
                winner.name,
                target.round,
                target.position,
                slot
            );
            *target.team_mut(slot) = Some(winner);
            Ok(Propagation::Advanced {
                match_id: target.id,
                slot,
            })
        }
        None => {
            log::warn!(
                "No open slot in round {} for the winner of match {}; bracket may be inconsistent",
                next_round,
                match_id
            );
            Ok(Propagation::TargetNotFound)
        }
    }
}

/// Mark a match as being played. Both teams must be known.
pub fn start_match(bracket: &mut Bracket, match_id: MatchId) -> Result<(), TournamentError> {
    let game = bracket
        .get_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if game.is_completed() {
        return Err(TournamentError::InvalidState);
    }
    if !game.is_ready() {
        return Err(TournamentError::MatchNotReady(match_id));
    }
    game.status = MatchStatus::InProgress;
    Ok(())
}

/// Set (or clear) the kick-off time of a match that has not been played yet.
pub fn schedule_match(
    bracket: &mut Bracket,
    match_id: MatchId,
    time: Option<DateTime<Utc>>,
) -> Result<(), TournamentError> {
    let game = bracket
        .get_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if game.is_completed() {
        return Err(TournamentError::InvalidState);
    }
    game.scheduled_time = time;
    Ok(())
}
