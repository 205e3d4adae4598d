//! PatternRepository: load/save port for the persisted blob
//!
//! The tracker owns a `Box<dyn PatternRepository>` and never lets a
//! repository error escape a tick.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use crate::core::TileStatsStore;
use crate::types::{
    AnalysisSection, BasicSection, PersistedState, RecentRoundsHistory, Settings,
    SuggestionSummary, TileRecord,
};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value blob store for learned state
pub trait PatternRepository: Send + Sync {
    /// `Ok(None)` when nothing was saved yet
    fn load(&self) -> Result<Option<PersistedState>, RepositoryError>;

    fn save(&self, state: &PersistedState) -> Result<(), RepositoryError>;
}

// =============================================================================
// IN-MEMORY
// =============================================================================

#[derive(Debug, Default)]
struct MemoryInner {
    state: Option<PersistedState>,
    fail_saves: bool,
    save_count: usize,
}

/// Shared in-memory store; clones see the same blob
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<Mutex<MemoryInner>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store
    pub fn with_state(state: PersistedState) -> Self {
        let repo = Self::new();
        if let Ok(mut inner) = repo.inner.lock() {
            inner.state = Some(state);
        }
        repo
    }

    /// Make every save fail until switched back
    pub fn set_fail_saves(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_saves = fail;
        }
    }

    /// Last successfully saved blob
    pub fn stored(&self) -> Option<PersistedState> {
        self.inner.lock().ok().and_then(|inner| inner.state.clone())
    }

    /// Successful saves so far
    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.save_count).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))
    }
}

impl PatternRepository for InMemoryRepository {
    fn load(&self) -> Result<Option<PersistedState>, RepositoryError> {
        Ok(self.lock()?.state.clone())
    }

    fn save(&self, state: &PersistedState) -> Result<(), RepositoryError> {
        let mut inner = self.lock()?;
        if inner.fail_saves {
            return Err(RepositoryError::Unavailable("saves disabled".to_string()));
        }
        inner.state = Some(state.clone());
        inner.save_count += 1;
        Ok(())
    }
}

// =============================================================================
// JSON FILE
// =============================================================================

/// Pretty JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PatternRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<PersistedState>, RepositoryError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&self, state: &PersistedState) -> Result<(), RepositoryError> {
        let json = serde_json::to_string_pretty(state)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

// =============================================================================
// BLOB <-> STATE
// =============================================================================

/// Learned state rebuilt from a blob
#[derive(Debug, Clone, Default)]
pub struct RestoredState {
    pub store: TileStatsStore,
    pub settings: Settings,
    pub history: RecentRoundsHistory,
    pub suggestions: SuggestionSummary,
}

/// Build the blob from the learned state
pub fn capture(
    store: &TileStatsStore,
    settings: &Settings,
    history: &RecentRoundsHistory,
    suggestions: &SuggestionSummary,
) -> PersistedState {
    PersistedState {
        basic: BasicSection {
            tiles: store.tiles().iter().map(TileRecord::to_basic).collect(),
            settings: settings.clone(),
            last_games: history.clone(),
        },
        analysis: Some(AnalysisSection {
            global_stats: store.global_stats().clone(),
            tile_stats: store.tiles().to_vec(),
            user_patterns: store.patterns().clone(),
            suggestions: suggestions.clone(),
        }),
    }
}

/// Rebuild learned state; `analysis` wins, otherwise tiles are seeded from `basic`
pub fn restore(state: PersistedState) -> RestoredState {
    let PersistedState { basic, analysis } = state;
    let settings = basic.settings.normalized();

    match analysis {
        Some(analysis) => RestoredState {
            store: TileStatsStore::from_parts(analysis.tile_stats, analysis.user_patterns, analysis.global_stats),
            settings,
            history: basic.last_games.normalized(),
            suggestions: analysis.suggestions,
        },
        None => RestoredState {
            store: TileStatsStore::from_parts(
                basic.tiles.iter().map(TileRecord::from_basic).collect(),
                Default::default(),
                Default::default(),
            ),
            settings,
            history: basic.last_games.normalized(),
            suggestions: SuggestionSummary::default(),
        },
    }
}

// =============================================================================
// TESTS
// =============================================================================
