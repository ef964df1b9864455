//! Tournament lifecycle: team assignment, bracket commit, result reporting and completion.

use crate::logic::bracket;
use crate::logic::formation::form_teams_with_rng;
use crate::logic::results::{self, MatchResult, Propagation};
use crate::models::{
    IndividualPlayer, MatchId, Score, Team, Tournament, TournamentError, TournamentStatus,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Field-write transitions driven by registration/admin actions (Draft, RegistrationOpen,
/// RegistrationClosed). InProgress and Completed are only reached through the bracket.
pub fn set_status(
    tournament: &mut Tournament,
    status: TournamentStatus,
) -> Result<(), TournamentError> {
    use TournamentStatus::*;
    if matches!(tournament.status, InProgress | Completed) || matches!(status, InProgress | Completed) {
        return Err(TournamentError::InvalidState);
    }
    log::info!("Tournament {}: {:?} -> {:?}", tournament.id, tournament.status, status);
    tournament.status = status;
    tournament.touch();
    Ok(())
}

/// Fill the tournament's slots: registered teams first (up to capacity), then teams auto-formed
/// from the individual pool for the remaining slots. The combined list is shuffled into a random
/// seed order and any previous bracket is discarded. A tournament whose bracket was already
/// committed drops back to RegistrationClosed until the bracket is committed again.
///
/// Not allowed once a result has been recorded or the tournament is completed.
pub fn assign_teams<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    registered: Vec<Team>,
    pool: Vec<IndividualPlayer>,
    rng: &mut R,
) -> Result<(), TournamentError> {
    if tournament.is_complete() || tournament.has_results() {
        return Err(TournamentError::InvalidState);
    }
    let capacity = tournament.details.max_teams;
    let mut teams: Vec<Team> = registered.into_iter().take(capacity).collect();
    let remaining = capacity - teams.len();
    if remaining > 0 {
        let formation = form_teams_with_rng(pool, Some(remaining), rng);
        teams.extend(formation.teams);
    }
    if teams.len() < 2 {
        return Err(TournamentError::InsufficientPlayers);
    }
    teams.shuffle(rng);

    log::info!(
        "Tournament {}: assigned {} team(s) for {} slot(s)",
        tournament.id,
        teams.len(),
        capacity
    );
    tournament.teams = teams;
    tournament.bracket = Default::default();
    tournament.champion = None;
    if tournament.status == TournamentStatus::InProgress {
        log::info!("Tournament {}: bracket discarded, back to RegistrationClosed", tournament.id);
        tournament.status = TournamentStatus::RegistrationClosed;
    }
    tournament.touch();
    Ok(())
}

/// Build the bracket from `tournament.teams` (seed order) and commit it: the tournament
/// becomes InProgress. Regenerating is allowed until the first result is recorded.
pub fn commit_bracket(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.is_complete() || tournament.has_results() {
        return Err(TournamentError::InvalidState);
    }
    if tournament.teams.len() < 2 {
        return Err(TournamentError::InsufficientPlayers);
    }
    let bracket = bracket::generate_bracket(&tournament.teams)?;
    tournament.bracket = bracket;
    tournament.status = TournamentStatus::InProgress;
    tournament.touch();
    log::info!(
        "Tournament {}: bracket committed with {} match(es), now in progress",
        tournament.id,
        tournament.bracket.len()
    );
    Ok(())
}

/// Record a result, advance the winner, and complete the tournament when the final is decided.
pub fn report_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    result: MatchResult,
) -> Result<Propagation, TournamentError> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::InvalidState);
    }
    let propagation = results::record_result(&mut tournament.bracket, match_id, result)?;
    finish_report(tournament, match_id);
    Ok(propagation)
}

/// Like [`report_result`], with the winner taken from the higher score.
pub fn report_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    score: Score,
) -> Result<Propagation, TournamentError> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::InvalidState);
    }
    let propagation = results::record_score(&mut tournament.bracket, match_id, score)?;
    finish_report(tournament, match_id);
    Ok(propagation)
}

fn finish_report(tournament: &mut Tournament, match_id: MatchId) {
    tournament.touch();
    if !tournament.bracket.is_final(match_id) {
        return;
    }
    if let Some(champion) = tournament.bracket.champion() {
        tournament.champion = Some(champion);
        tournament.status = TournamentStatus::Completed;
        let name = tournament
            .team(champion)
            .map(|t| t.name.as_str())
            .unwrap_or("unknown team");
        log::info!("Tournament {} completed, champion: {}", tournament.id, name);
    }
}

/// The final has been decided.
pub fn is_complete(tournament: &Tournament) -> bool {
    tournament.is_complete()
}
