// Module store - in-memory road collection with optional JSON snapshot file
// Every mutation bumps the revision so cached graphs can be keyed on it.

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::Utc;
use uuid::Uuid;

use crate::models::{NewRoadRequest, Road};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Road not found: {0}")]
    NotFound(String),

    #[error("Invalid road: {0}")]
    InvalidRoad(String),

    #[error("Road file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Road file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable view of the roads at one revision.
#[derive(Debug, Clone)]
pub struct RoadSnapshot {
    pub revision: u64,
    pub roads: Arc<Vec<Road>>,
}

#[derive(Debug, Default)]
struct StoreState {
    roads: Arc<Vec<Road>>,
    revision: u64,
}

#[derive(Debug, Default)]
pub struct RoadStore {
    state: RwLock<StoreState>,
    /// Held for a whole mutation so the road file is written without holding
    /// `state`; readers only ever wait for the final swap.
    writer: Mutex<()>,
    snapshot_path: Option<PathBuf>,
}

impl RoadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store backed by `path`. A missing file starts an empty store;
    /// the file is created on the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let roads = if path.exists() {
            read_roads(&path)?
        } else {
            Vec::new()
        };

        for road in &roads {
            validate_coordinates(road)?;
        }

        tracing::info!(path = %path.display(), roads = roads.len(), "loaded road file");

        Ok(Self {
            state: RwLock::new(StoreState {
                roads: Arc::new(roads),
                revision: 0,
            }),
            writer: Mutex::new(()),
            snapshot_path: Some(path),
        })
    }

    pub fn snapshot(&self) -> RoadSnapshot {
        let state = self.read();
        RoadSnapshot {
            revision: state.revision,
            roads: Arc::clone(&state.roads),
        }
    }

    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    pub fn len(&self) -> usize {
        self.read().roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All roads in creation order.
    pub fn list(&self) -> Vec<Road> {
        self.read().roads.as_ref().clone()
    }

    pub fn get(&self, id: &str) -> Result<Road, StoreError> {
        self.read()
            .roads
            .iter()
            .find(|road| road.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn create(&self, request: NewRoadRequest) -> Result<Road, StoreError> {
        let _writer = self.lock_writer();
        let current = self.snapshot().roads;

        let name = match request.name.trim() {
            "" => format!("Road {}", current.len() + 1),
            name => name.to_string(),
        };
        let road = Road {
            id: Uuid::new_v4().to_string(),
            name,
            road_type: request.road_type,
            coordinates: request.coordinates,
            created_at: Utc::now(),
        };
        validate_coordinates(&road)?;

        let mut roads = current.as_ref().clone();
        roads.push(road.clone());
        self.persist(&roads)?;

        let revision = self.commit(roads);
        tracing::debug!(id = %road.id, revision, "road created");
        Ok(road)
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _writer = self.lock_writer();
        let current = self.snapshot().roads;

        let position = current
            .iter()
            .position(|road| road.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut roads = current.as_ref().clone();
        roads.remove(position);
        self.persist(&roads)?;

        let revision = self.commit(roads);
        tracing::debug!(id, revision, "road deleted");
        Ok(())
    }

    fn persist(&self, roads: &[Road]) -> Result<(), StoreError> {
        match &self.snapshot_path {
            Some(path) => write_roads(path, roads),
            None => Ok(()),
        }
    }

    fn commit(&self, roads: Vec<Road>) -> u64 {
        let mut state = self.write();
        state.roads = Arc::new(roads);
        state.revision += 1;
        state.revision
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate_coordinates(road: &Road) -> Result<(), StoreError> {
    if road.coordinates.len() < 2 {
        return Err(StoreError::InvalidRoad(format!(
            "road needs at least 2 coordinates, got {}",
            road.coordinates.len()
        )));
    }
    if let Some(bad) = road.coordinates.iter().find(|coord| !coord.is_valid()) {
        return Err(StoreError::InvalidRoad(format!(
            "coordinate out of range: lat={}, lng={}",
            bad.lat, bad.lng
        )));
    }
    Ok(())
}

/// Reads a JSON array of roads.
pub fn read_roads(path: &Path) -> Result<Vec<Road>, StoreError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Writes through a sibling temp file so a crash never leaves a truncated
/// road file behind. The temp file is removed when the write fails.
pub fn write_roads(path: &Path, roads: &[Road]) -> Result<(), StoreError> {
    let tmp_path = path.with_extension("json.tmp");
    let result = write_json(&tmp_path, roads)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(StoreError::from));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_json(path: &Path, roads: &[Road]) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, roads)?;
    writer.flush()?;
    Ok(())
}
