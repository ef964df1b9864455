//! Auto team formation: balanced 7-a-side teams from individually registered players.

use crate::models::{IndividualPlayer, Player, Team};
use rand::seq::SliceRandom;
use rand::Rng;

/// Field players per auto-generated team (plus one goalkeeper).
pub const FIELD_PLAYERS_PER_TEAM: usize = 6;

/// Result of auto formation. An empty `teams` list means there were not enough players.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Formation {
    pub teams: Vec<Team>,
    /// Players left over after the last complete team.
    pub unassigned: Vec<IndividualPlayer>,
}

impl Formation {
    /// Fewer than 2 teams could be formed.
    pub fn is_insufficient(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Form teams from the pool using the thread-local RNG. See [`form_teams_with_rng`].
pub fn form_teams(pool: Vec<IndividualPlayer>, max_teams: Option<usize>) -> Formation {
    form_teams_with_rng(pool, max_teams, &mut rand::thread_rng())
}

/// Build teams of 1 goalkeeper + 6 field players.
///
/// 1. Split the pool into goalkeepers and field players; shuffle each.
/// 2. Formable = min(goalkeepers, field / 6). Fewer than 2: no teams at all.
/// 3. Clamp to `max_teams` if given; otherwise drop to an even count.
/// 4. Team i takes goalkeeper i and field players [6i, 6i + 6).
pub fn form_teams_with_rng<R: Rng + ?Sized>(
    pool: Vec<IndividualPlayer>,
    max_teams: Option<usize>,
    rng: &mut R,
) -> Formation {
    let (mut goalkeepers, mut field): (Vec<_>, Vec<_>) =
        pool.into_iter().partition(|p| p.is_goalkeeper());
    goalkeepers.shuffle(rng);
    field.shuffle(rng);

    let formable = goalkeepers.len().min(field.len() / FIELD_PLAYERS_PER_TEAM);
    if formable < 2 {
        log::info!(
            "Auto formation: only {} team(s) formable from {} goalkeeper(s) and {} field player(s)",
            formable,
            goalkeepers.len(),
            field.len()
        );
        goalkeepers.append(&mut field);
        return Formation {
            teams: Vec::new(),
            unassigned: goalkeepers,
        };
    }

    let count = match max_teams {
        Some(max) => formable.min(max),
        None if formable % 2 == 1 => formable - 1,
        None => formable,
    };

    let mut field = field.into_iter();
    let mut goalkeepers = goalkeepers.into_iter();
    let teams: Vec<Team> = (0..count)
        .filter_map(|i| {
            let keeper = goalkeepers.next()?;
            let mut players = Vec::with_capacity(FIELD_PLAYERS_PER_TEAM + 1);
            players.push(Player::from(keeper));
            players.extend(field.by_ref().take(FIELD_PLAYERS_PER_TEAM).map(Player::from));
            Some(Team::auto_generated(format!("Auto Team {}", i + 1), players))
        })
        .collect();

    let unassigned: Vec<IndividualPlayer> = goalkeepers.chain(field).collect();
    log::info!(
        "Auto formation: built {} team(s), {} player(s) unassigned",
        teams.len(),
        unassigned.len()
    );
    Formation { teams, unassigned }
}
