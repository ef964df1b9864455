//! Tournament business logic: team formation, bracket generation, results, lifecycle.

mod bracket;
mod formation;
mod lifecycle;
mod results;

pub use bracket::{generate_bracket, seed_order, template_size, TemplateShape};
pub use formation::{form_teams, form_teams_with_rng, Formation, FIELD_PLAYERS_PER_TEAM};
pub use lifecycle::{
    assign_teams, commit_bracket, is_complete, report_result, report_score,
    set_status,
};
pub use results::{
    propagate_winner, record_result, record_score, schedule_match, start_match, MatchResult,
    Propagation,
};
