//! Tournament, TournamentStatus, TournamentDetails and TournamentError.

use crate::models::bracket::Bracket;
use crate::models::game::MatchId;
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Team counts a bracket can be generated for.
pub const SUPPORTED_TEAM_COUNTS: [usize; 8] = [2, 4, 6, 8, 10, 12, 14, 16];

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Bracket requested for a team count outside 2, 4, ..., 16.
    UnsupportedTeamCount(usize),
    /// Fewer than 2 teams could be assembled.
    InsufficientPlayers,
    /// Recorded winner is neither of the match's teams.
    InvalidWinner { match_id: MatchId, winner: TeamId },
    /// Match is missing one or both teams.
    MatchNotReady(MatchId),
    /// No match with this id in the bracket.
    MatchNotFound(MatchId),
    /// Match already completed with a different winner.
    ResultAlreadyRecorded(MatchId),
    /// Score entry with equal goals cannot decide a knockout match.
    TiedScore(MatchId),
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Tournament details failed validation.
    InvalidDetails(&'static str),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::UnsupportedTeamCount(n) => {
                write!(f, "Cannot build a bracket for {} teams (must be even, 2 to 16)", n)
            }
            TournamentError::InsufficientPlayers => {
                write!(f, "Not enough players or teams to fill a bracket (need at least 2 teams)")
            }
            TournamentError::InvalidWinner { match_id, winner } => {
                write!(f, "Team {} is not playing in match {}", winner, match_id)
            }
            TournamentError::MatchNotReady(_) => write!(f, "Both teams of the match must be known"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::ResultAlreadyRecorded(_) => {
                write!(f, "A different result was already recorded for this match")
            }
            TournamentError::TiedScore(_) => write!(f, "A knockout match cannot end in a tie"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::InvalidDetails(reason) => write!(f, "Invalid tournament details: {}", reason),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Draft,
    RegistrationOpen,
    RegistrationClosed,
    /// A bracket has been committed.
    InProgress,
    /// The final has a winner.
    Completed,
}

/// Descriptive metadata entered by the organizer when creating a tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentDetails {
    pub name: String,
    /// Bracket capacity; one of `SUPPORTED_TEAM_COUNTS`.
    pub max_teams: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub registration_start: NaiveDate,
    pub registration_end: NaiveDate,
    /// Present only for paid tournaments.
    #[serde(default)]
    pub entry_fee: Option<f64>,
    #[serde(default)]
    pub description: String,
}

impl TournamentDetails {
    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.name.trim().is_empty() {
            return Err(TournamentError::InvalidDetails("name is required"));
        }
        if !SUPPORTED_TEAM_COUNTS.contains(&self.max_teams) {
            return Err(TournamentError::InvalidDetails(
                "team count must be even and between 2 and 16",
            ));
        }
        if self.start_date > self.end_date {
            return Err(TournamentError::InvalidDetails("start date is after end date"));
        }
        if self.registration_start > self.registration_end {
            return Err(TournamentError::InvalidDetails(
                "registration start is after registration end",
            ));
        }
        if self.entry_fee.is_some_and(|fee| fee <= 0.0) {
            return Err(TournamentError::InvalidDetails("entry fee must be positive"));
        }
        Ok(())
    }
}

/// Full tournament record: the unit of persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub details: TournamentDetails,
    pub status: TournamentStatus,
    /// Teams placed into the bracket, in seed order (strongest first).
    pub teams: Vec<Team>,
    pub bracket: Bracket,
    /// Winner of the final once the tournament is completed.
    #[serde(default)]
    pub champion: Option<TeamId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Draft state with no teams and no bracket.
    pub fn new(details: TournamentDetails) -> Result<Self, TournamentError> {
        details.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            details,
            status: TournamentStatus::Draft,
            teams: Vec::new(),
            bracket: Bracket::default(),
            champion: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// At least one bracket match has a recorded result.
    pub fn has_results(&self) -> bool {
        self.bracket.matches().iter().any(|m| m.is_completed())
    }

    pub fn is_complete(&self) -> bool {
        self.status == TournamentStatus::Completed
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
