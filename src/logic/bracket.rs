//! Bracket template generation: seeded single-elimination layouts for 2 to 16 teams.

use crate::models::{Bracket, GameMatch, Slot, Team, TournamentError, SUPPORTED_TEAM_COUNTS};

/// Size P of the full bracket for a supported team count: the first full round has P / 2 matches.
///
/// Counts between powers of two get a preliminary round of N - P matches that trims the
/// field down to P.
pub fn template_size(team_count: usize) -> Option<usize> {
    if !SUPPORTED_TEAM_COUNTS.contains(&team_count) {
        return None;
    }
    Some(match team_count {
        2 => 2,
        4 | 6 => 4,
        16 => 16,
        _ => 8,
    })
}

/// Shape of the bracket for N teams.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TemplateShape {
    pub team_count: usize,
    /// P: teams entering the first full round.
    pub size: usize,
    /// Top seeds placed straight into the first full round.
    pub byes: usize,
    pub preliminary_matches: usize,
}

impl TemplateShape {
    pub fn for_team_count(team_count: usize) -> Result<Self, TournamentError> {
        let size = template_size(team_count).ok_or(TournamentError::UnsupportedTeamCount(team_count))?;
        Ok(Self {
            team_count,
            size,
            byes: 2 * size - team_count,
            preliminary_matches: team_count - size,
        })
    }

    /// Rounds in the full bracket (log2 P), not counting the preliminary round.
    pub fn full_rounds(&self) -> u32 {
        self.size.trailing_zeros()
    }

    pub fn total_rounds(&self) -> u32 {
        self.full_rounds() + u32::from(self.preliminary_matches > 0)
    }
}

/// Standard seed order for a bracket of `size` slots: [1, 2], [1, 4, 2, 3], [1, 8, 4, 5, 2, 7, 3, 6], ...
///
/// Consecutive pairs are the first-round matches; seed 1 meets the weakest seed and the
/// top two seeds can only meet in the final.
pub fn seed_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let n = order.len() * 2;
        order = order.iter().flat_map(|&s| [s, n + 1 - s]).collect();
    }
    order
}

/// Generate the initial bracket for teams ordered strongest (index 0) to weakest.
///
/// The returned matches are: the preliminary round (round 1) when N is not a power of two,
/// then the first full round with byes and null placeholders for preliminary winners, then
/// empty placeholder rounds down to the final. Every match except the final records the
/// position and slot in the next round its winner advances to.
pub fn generate_bracket(teams: &[Team]) -> Result<Bracket, TournamentError> {
    let shape = TemplateShape::for_team_count(teams.len())?;
    let offset = u32::from(shape.preliminary_matches > 0);

    // Seed s (0-based) of the first full round: a real team, or the winner of a preliminary match.
    enum Entrant<'a> {
        Team(&'a Team),
        Winner(usize),
    }
    let mut entrants: Vec<Entrant> = teams[..shape.byes].iter().map(Entrant::Team).collect();

    let mut matches = Vec::with_capacity(teams.len() - 1);
    for j in 0..shape.preliminary_matches {
        let strong = &teams[shape.byes + j];
        let weak = &teams[teams.len() - 1 - j];
        matches.push(GameMatch::new(
            1,
            j as u32 + 1,
            Some(strong.clone()),
            Some(weak.clone()),
        ));
        entrants.push(Entrant::Winner(j));
    }

    let first_round = 1 + offset;
    let order = seed_order(shape.size);
    // Pairs are (stronger, weaker), so a bye always lands in team1 and leaves team2 open.
    for (k, pair) in order.chunks_exact(2).enumerate() {
        let position = k as u32 + 1;
        let mut game = GameMatch::placeholder(first_round, position);
        for (slot, &seed) in [Slot::One, Slot::Two].into_iter().zip(pair) {
            match entrants[seed - 1] {
                Entrant::Team(team) => *game.team_mut(slot) = Some(team.clone()),
                Entrant::Winner(j) => {
                    matches[j].next_position = Some(position);
                    matches[j].next_slot = Some(slot);
                }
            }
        }
        matches.push(game);
    }

    let mut round_matches = shape.size / 2;
    let mut round = first_round;
    while round_matches > 1 {
        round += 1;
        round_matches /= 2;
        for position in 1..=round_matches as u32 {
            matches.push(GameMatch::placeholder(round, position));
        }
    }

    for game in matches.iter_mut().filter(|m| m.round >= first_round && m.round < round) {
        game.next_position = Some(game.position.div_ceil(2));
        game.next_slot = Some(if game.position % 2 == 1 { Slot::One } else { Slot::Two });
    }

    log::debug!(
        "Generated bracket for {} teams: {} match(es) over {} round(s), {} preliminary",
        shape.team_count,
        matches.len(),
        shape.total_rounds(),
        shape.preliminary_matches
    );
    Ok(Bracket::new(matches))
}
