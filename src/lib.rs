//! Single-elimination tournament engine: library with models, business logic and storage.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    assign_teams, commit_bracket, form_teams, form_teams_with_rng, generate_bracket, is_complete,
    propagate_winner, record_result, record_score, report_result, report_score, schedule_match,
    seed_order, set_status, start_match, template_size, Formation, MatchResult, Propagation,
    TemplateShape, FIELD_PLAYERS_PER_TEAM,
};
pub use models::{
    is_goalkeeper_position, Bracket, GameMatch, IndividualPlayer, MatchId, MatchStatus, Player,
    PlayerId, Score, Slot, Team, TeamId, TeamOrigin, Tournament, TournamentDetails,
    TournamentError, TournamentId, TournamentStatus, SUPPORTED_TEAM_COUNTS,
};
pub use store::{
    read_player_pool_csv, write_player_pool_csv, JsonFileStore, MemoryStore, StoreError,
    TournamentStore,
};
