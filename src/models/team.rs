//! Team, Player and IndividualPlayer: the units entering a bracket.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Unique identifier for a player placed on a team.
pub type PlayerId = Uuid;

/// Position labels that mark a goalkeeper (compared case-insensitively).
const GOALKEEPER_LABELS: [&str; 5] = ["goalkeeper", "keeper", "gk", "goleira", "goleiro"];

/// Where a team came from.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamOrigin {
    /// Registered as a whole team by a captain.
    #[default]
    Registered,
    /// Built by auto formation from individually registered players.
    AutoGenerated,
}

/// A player registered on their own, supplied by the registration subsystem.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct IndividualPlayer {
    pub id: String,
    pub name: String,
    pub position: String,
}

impl IndividualPlayer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: position.into(),
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        is_goalkeeper_position(&self.position)
    }
}

/// True if any word of the position label names the goal ("Goalkeeper", "GK",
/// "Goleira/Zagueira", "goleira-reserva", ...).
pub fn is_goalkeeper_position(position: &str) -> bool {
    position
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| GOALKEEPER_LABELS.contains(&word))
}

/// A player on a team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: String,
    /// Back-reference to the individual registration this player was drawn from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_individual_id: Option<String>,
}

impl Player {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position: position.into(),
            source_individual_id: None,
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        is_goalkeeper_position(&self.position)
    }
}

impl From<IndividualPlayer> for Player {
    fn from(individual: IndividualPlayer) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: individual.name,
            position: individual.position,
            source_individual_id: Some(individual.id),
        }
    }
}

/// A team: a name and an ordered list of players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub origin: TeamOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_registration_id: Option<String>,
    pub players: Vec<Player>,
}

impl Team {
    /// Create a registered team. The registration id is kept as a back-reference.
    pub fn registered(
        name: impl Into<String>,
        source_registration_id: Option<String>,
        players: Vec<Player>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            origin: TeamOrigin::Registered,
            source_registration_id,
            players,
        }
    }

    /// Create an auto-generated team from already chosen players.
    pub fn auto_generated(name: impl Into<String>, players: Vec<Player>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            origin: TeamOrigin::AutoGenerated,
            source_registration_id: None,
            players,
        }
    }

    pub fn goalkeepers(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_goalkeeper())
    }
}
