//! Match (game), Slot, Score and MatchStatus.

use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two team slots of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    #[default]
    One,
    Two,
}

/// Progress of a single match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Goals scored by team 1 and team 2. Informational only; the winner field decides.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub team1: u32,
    pub team2: u32,
}

impl Score {
    pub fn new(team1: u32, team2: u32) -> Self {
        Self { team1, team2 }
    }

    /// Slot with more goals, or None on a tie.
    pub fn leader(&self) -> Option<Slot> {
        match self.team1.cmp(&self.team2) {
            std::cmp::Ordering::Greater => Some(Slot::One),
            std::cmp::Ordering::Less => Some(Slot::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A single bracket match. `None` in a team slot means "not yet determined".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    /// 1 = earliest round.
    pub round: u32,
    /// 1-based index within the round, stable for the lifetime of the bracket.
    pub position: u32,
    pub team1: Option<Team>,
    pub team2: Option<Team>,
    pub status: MatchStatus,
    /// Set only when `status` is `Completed`.
    #[serde(default)]
    pub winner: Option<TeamId>,
    #[serde(default)]
    pub score: Option<Score>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Position in round + 1 that receives this match's winner. None for the final.
    #[serde(default)]
    pub next_position: Option<u32>,
    /// Slot of that match the winner takes. None for the final.
    #[serde(default)]
    pub next_slot: Option<Slot>,
}

impl GameMatch {
    pub fn new(round: u32, position: u32, team1: Option<Team>, team2: Option<Team>) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            position,
            team1,
            team2,
            status: MatchStatus::Pending,
            winner: None,
            score: None,
            scheduled_time: None,
            next_position: None,
            next_slot: None,
        }
    }

    /// An empty placeholder match filled later by propagation.
    pub fn placeholder(round: u32, position: u32) -> Self {
        Self::new(round, position, None, None)
    }

    pub fn team(&self, slot: Slot) -> Option<&Team> {
        match slot {
            Slot::One => self.team1.as_ref(),
            Slot::Two => self.team2.as_ref(),
        }
    }

    pub fn team_mut(&mut self, slot: Slot) -> &mut Option<Team> {
        match slot {
            Slot::One => &mut self.team1,
            Slot::Two => &mut self.team2,
        }
    }

    /// Both teams are known.
    pub fn is_ready(&self) -> bool {
        self.team1.is_some() && self.team2.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Slot holding the given team, if any.
    pub fn slot_of(&self, team_id: TeamId) -> Option<Slot> {
        if self.team1.as_ref().is_some_and(|t| t.id == team_id) {
            Some(Slot::One)
        } else if self.team2.as_ref().is_some_and(|t| t.id == team_id) {
            Some(Slot::Two)
        } else {
            None
        }
    }

    pub fn contains_team(&self, team_id: TeamId) -> bool {
        self.slot_of(team_id).is_some()
    }

    /// The winning team, once the match is completed.
    pub fn winning_team(&self) -> Option<&Team> {
        let winner = self.winner?;
        if !self.is_completed() {
            return None;
        }
        self.slot_of(winner).and_then(|slot| self.team(slot))
    }
}
