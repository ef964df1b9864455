//! Persistence boundary: whole-record load/save of tournaments plus the registration data
//! (registered teams, individual player pools) the engine consumes.
//!
//! Saves overwrite the whole tournament. There is no record-level locking: two organizers
//! saving the same tournament race, and the last write wins.

use crate::models::{IndividualPlayer, Team, Tournament, TournamentId};
use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Errors from a [`TournamentStore`].
#[derive(Debug)]
pub enum StoreError {
    /// No tournament with this id.
    NotFound(TournamentId),
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    /// A thread panicked while holding the store lock.
    Poisoned,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "No tournament {}", id),
            StoreError::Io(e) => write!(f, "Storage I/O error: {}", e),
            StoreError::Json(e) => write!(f, "Corrupt tournament record: {}", e),
            StoreError::Csv(e) => write!(f, "Corrupt player pool: {}", e),
            StoreError::Poisoned => write!(f, "lock error"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
            StoreError::Csv(e) => Some(e),
            StoreError::NotFound(_) | StoreError::Poisoned => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::Csv(e)
    }
}

/// Where tournaments and registration data live.
pub trait TournamentStore: Send + Sync {
    fn load_tournament(&self, id: TournamentId) -> Result<Tournament, StoreError>;

    /// Overwrite the whole tournament record.
    fn save_tournament(&self, id: TournamentId, tournament: &Tournament) -> Result<(), StoreError>;

    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError>;

    /// Individually registered players available for auto formation.
    fn load_individual_player_pool(&self, id: TournamentId) -> Result<Vec<IndividualPlayer>, StoreError>;

    fn add_individual_player(&self, id: TournamentId, player: IndividualPlayer) -> Result<(), StoreError> {
        self.add_individual_players(id, vec![player])
    }

    /// Append players to the pool in one write. Either all are stored or none.
    fn add_individual_players(&self, id: TournamentId, players: Vec<IndividualPlayer>) -> Result<(), StoreError>;

    /// Teams registered as a whole, in registration order.
    fn load_registered_teams(&self, id: TournamentId) -> Result<Vec<Team>, StoreError>;

    fn add_registered_team(&self, id: TournamentId, team: Team) -> Result<(), StoreError>;
}

#[derive(Default)]
struct MemoryData {
    tournaments: HashMap<TournamentId, Tournament>,
    pools: HashMap<TournamentId, Vec<IndividualPlayer>>,
    teams: HashMap<TournamentId, Vec<Team>>,
}

/// In-process store; everything is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryData>, StoreError> {
        self.data.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryData>, StoreError> {
        self.data.write().map_err(|_| StoreError::Poisoned)
    }
}

impl TournamentStore for MemoryStore {
    fn load_tournament(&self, id: TournamentId) -> Result<Tournament, StoreError> {
        self.read()?
            .tournaments
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn save_tournament(&self, id: TournamentId, tournament: &Tournament) -> Result<(), StoreError> {
        self.write()?.tournaments.insert(id, tournament.clone());
        Ok(())
    }

    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        let mut all: Vec<_> = self.read()?.tournaments.values().cloned().collect();
        all.sort_by_key(|t| t.created_at);
        Ok(all)
    }

    fn load_individual_player_pool(&self, id: TournamentId) -> Result<Vec<IndividualPlayer>, StoreError> {
        Ok(self.read()?.pools.get(&id).cloned().unwrap_or_default())
    }

    fn add_individual_players(&self, id: TournamentId, players: Vec<IndividualPlayer>) -> Result<(), StoreError> {
        self.write()?.pools.entry(id).or_default().extend(players);
        Ok(())
    }

    fn load_registered_teams(&self, id: TournamentId) -> Result<Vec<Team>, StoreError> {
        Ok(self.read()?.teams.get(&id).cloned().unwrap_or_default())
    }

    fn add_registered_team(&self, id: TournamentId, team: Team) -> Result<(), StoreError> {
        self.write()?.teams.entry(id).or_default().push(team);
        Ok(())
    }
}

/// Directory-backed store:
///
/// - `tournaments/{id}.json`: the tournament record
/// - `teams/{id}.json`: registered teams
/// - `pools/{id}.csv`: individual players (`id,name,position`)
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        for dir in ["tournaments", "teams", "pools"] {
            fs::create_dir_all(root.join(dir))?;
        }
        log::info!("Using tournament data directory {}", root.display());
        Ok(Self { root })
    }

    fn path(&self, dir: &str, id: TournamentId, ext: &str) -> PathBuf {
        self.root.join(dir).join(format!("{id}.{ext}"))
    }
}

/// Write through a sibling temp file renamed over the target.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl TournamentStore for JsonFileStore {
    fn load_tournament(&self, id: TournamentId) -> Result<Tournament, StoreError> {
        let bytes = read_optional(&self.path("tournaments", id, "json"))?.ok_or(StoreError::NotFound(id))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save_tournament(&self, id: TournamentId, tournament: &Tournament) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(tournament)?;
        write_atomic(&self.path("tournaments", id, "json"), &bytes)
    }

    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        let mut all = Vec::new();
        for entry in fs::read_dir(self.root.join("tournaments"))? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                all.push(serde_json::from_slice::<Tournament>(&fs::read(&path)?)?);
            }
        }
        all.sort_by_key(|t| t.created_at);
        Ok(all)
    }

    fn load_individual_player_pool(&self, id: TournamentId) -> Result<Vec<IndividualPlayer>, StoreError> {
        match read_optional(&self.path("pools", id, "csv"))? {
            Some(bytes) => read_player_pool_csv(bytes.as_slice()),
            None => Ok(Vec::new()),
        }
    }

    fn add_individual_players(&self, id: TournamentId, players: Vec<IndividualPlayer>) -> Result<(), StoreError> {
        let mut pool = self.load_individual_player_pool(id)?;
        pool.extend(players);
        let mut bytes = Vec::new();
        write_player_pool_csv(&mut bytes, &pool)?;
        write_atomic(&self.path("pools", id, "csv"), &bytes)
    }

    fn load_registered_teams(&self, id: TournamentId) -> Result<Vec<Team>, StoreError> {
        match read_optional(&self.path("teams", id, "json"))? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn add_registered_team(&self, id: TournamentId, team: Team) -> Result<(), StoreError> {
        let mut teams = self.load_registered_teams(id)?;
        teams.push(team);
        write_atomic(&self.path("teams", id, "json"), &serde_json::to_vec_pretty(&teams)?)
    }
}

/// Parse a player pool from CSV with an `id,name,position` header.
pub fn read_player_pool_csv<R: Read>(reader: R) -> Result<Vec<IndividualPlayer>, StoreError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut pool = Vec::new();
    for record in rdr.deserialize::<IndividualPlayer>() {
        pool.push(record?);
    }
    Ok(pool)
}

/// Write a player pool as CSV with an `id,name,position` header.
pub fn write_player_pool_csv<W: Write>(writer: W, pool: &[IndividualPlayer]) -> Result<(), StoreError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for player in pool {
        wtr.serialize(player)?;
    }
    wtr.flush()?;
    Ok(())
}
