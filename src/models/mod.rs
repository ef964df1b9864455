//! Data structures for the tournament: teams, matches, bracket, tournament state.

mod bracket;
mod game;
mod team;
mod tournament;

pub use bracket::Bracket;
pub use game::{GameMatch, MatchId, MatchStatus, Score, Slot};
pub use team::{is_goalkeeper_position, IndividualPlayer, Player, PlayerId, Team, TeamId, TeamOrigin};
pub use tournament::{
    Tournament, TournamentDetails, TournamentError, TournamentId, TournamentStatus,
    SUPPORTED_TEAM_COUNTS,
};
