use crossbeam_channel::{unbounded, Sender};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use thiserror::Error;

/// Somewhere the engine can read and record best scores.
///
/// Implementations must not block for long in `save_highscore()`, and must
/// deal with their own failures; a store that cannot be read reports 0.
pub(crate) trait HighScoreStore: fmt::Debug {
    fn load_highscore(&mut self, game_id: &str) -> u32;
    fn save_highscore(&mut self, game_id: &str, value: u32);
}

/// The contents of a highscores file: a JSON object mapping game IDs to
/// scores
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct HighScores(BTreeMap<String, u32>);

impl HighScores {
    /// Return the default highscores file path
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("wormgame").join("highscores.json"))
    }

    pub(crate) fn load(path: &Path) -> Result<HighScores, LoadError> {
        let src = match fs_err::read(path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HighScores::default()),
            Err(e) => return Err(LoadError::read(e)),
        };
        serde_json::from_slice(&src).map_err(LoadError::deserialize)
    }

    pub(crate) fn save(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string(self).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(path, &src).map_err(SaveError::write)?;
        Ok(())
    }

    pub(crate) fn get(&self, game_id: &str) -> Option<u32> {
        self.0.get(game_id).copied()
    }

    pub(crate) fn set(&mut self, game_id: &str, score: u32) {
        self.0.insert(game_id.to_owned(), score);
    }
}

/// Highscores stored in a JSON file, read and written synchronously
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HighScoreFile {
    path: Option<PathBuf>,
}

impl HighScoreFile {
    /// `path` is `None` when no location for the file could be determined, in
    /// which case nothing is ever read or written.
    pub(crate) fn new(path: Option<PathBuf>) -> HighScoreFile {
        HighScoreFile { path }
    }

    fn write(&self, game_id: &str, value: u32) -> Result<(), SaveError> {
        let path = self.path.as_deref().ok_or_else(SaveError::no_path)?;
        // Keep the scores of other games in the same file
        let mut scores = match HighScores::load(path) {
            Ok(scores) => scores,
            Err(e) => {
                log::warn!("{}; overwriting", format_error(&e));
                HighScores::default()
            }
        };
        scores.set(game_id, value);
        scores.save(path)
    }
}

impl HighScoreStore for HighScoreFile {
    fn load_highscore(&mut self, game_id: &str) -> u32 {
        let Some(path) = self.path.as_deref() else {
            log::warn!("{}", format_error(&LoadError::no_path()));
            return 0;
        };
        match HighScores::load(path) {
            Ok(scores) => scores.get(game_id).unwrap_or(0),
            Err(e) => {
                log::warn!("{}", format_error(&e));
                0
            }
        }
    }

    fn save_highscore(&mut self, game_id: &str, value: u32) {
        if let Err(e) = self.write(game_id, value) {
            log::warn!("{}", format_error(&e));
        }
    }
}

/// Highscores stored in a JSON file, with writes handed off to a background
/// thread.  Dropping the store waits for queued writes to finish.
///
/// The file is read at most once per game ID; after that, loads are answered
/// from the last score read or queued.
#[derive(Debug)]
pub(crate) struct QueuedHighScores {
    file: HighScoreFile,
    known: HighScores,
    sender: Option<Sender<(String, u32)>>,
    writer: Option<JoinHandle<()>>,
}

impl QueuedHighScores {
    pub(crate) fn new(file: HighScoreFile) -> std::io::Result<QueuedHighScores> {
        let (sender, receiver) = unbounded::<(String, u32)>();
        let mut background = file.clone();
        let writer = std::thread::Builder::new()
            .name(String::from("highscore-writer"))
            .spawn(move || {
                for (game_id, value) in receiver {
                    log::debug!("Writing highscore {value} for {game_id:?}");
                    background.save_highscore(&game_id, value);
                }
            })?;
        Ok(QueuedHighScores {
            file,
            known: HighScores::default(),
            sender: Some(sender),
            writer: Some(writer),
        })
    }
}

impl HighScoreStore for QueuedHighScores {
    fn load_highscore(&mut self, game_id: &str) -> u32 {
        if let Some(value) = self.known.get(game_id) {
            return value;
        }
        let value = self.file.load_highscore(game_id);
        self.known.set(game_id, value);
        value
    }

    fn save_highscore(&mut self, game_id: &str, value: u32) {
        self.known.set(game_id, value);
        let sent = self
            .sender
            .as_ref()
            .is_some_and(|s| s.send((game_id.to_owned(), value)).is_ok());
        if !sent {
            log::warn!("Highscore writer has stopped; score {value} for {game_id:?} not saved");
        }
    }
}

impl Drop for QueuedHighScores {
    fn drop(&mut self) {
        // Closing the channel ends the writer's loop once the queue is drained
        drop(self.sender.take());
        if let Some(handle) = self.writer.take() {
            if handle.join().is_err() {
                log::error!("Highscore writer thread panicked");
            }
        }
    }
}

/// Render an error and its chain of sources on one line
fn format_error(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(src) = source {
        msg.push_str(": ");
        msg.push_str(&src.to_string());
        source = src.source();
    }
    msg
}

#[derive(Debug, Error)]
#[error("Failed to save highscores to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn no_path() -> Self {
        SaveError(SaveErrorSource::NoPath)
    }

    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize highscores")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write highscores to disk")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read highscores from disk")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    fn no_path() -> Self {
        LoadError(LoadErrorSource::NoPath)
    }

    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to read highscores file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize highscores")]
    Deserialize(#[source] serde_json::Error),
}

/// An in-memory store whose contents stay visible to the test after the
/// engine has taken ownership of a clone
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub(crate) struct MemoryHighScores {
    inner: std::sync::Arc<parking_lot::Mutex<(HighScores, usize)>>,
}

#[cfg(test)]
impl MemoryHighScores {
    pub(crate) fn get(&self, game_id: &str) -> Option<u32> {
        self.inner.lock().0.get(game_id)
    }

    pub(crate) fn set(&self, game_id: &str, value: u32) {
        self.inner.lock().0.set(game_id, value);
    }

    /// How many times `save_highscore()` has been called
    pub(crate) fn saves(&self) -> usize {
        self.inner.lock().1
    }
}

#[cfg(test)]
impl HighScoreStore for MemoryHighScores {
    fn load_highscore(&mut self, game_id: &str) -> u32 {
        self.get(game_id).unwrap_or(0)
    }

    fn save_highscore(&mut self, game_id: &str, value: u32) {
        let mut inner = self.inner.lock();
        inner.0.set(game_id, value);
        inner.1 += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores").join("highscores.json");
        let mut scores = HighScores::default();
        scores.set("worm", 12);
        scores.set("game3", 4);
        scores.save(&path).unwrap();
        assert_eq!(
            fs_err::read_to_string(&path).unwrap(),
            "{\"game3\":4,\"worm\":12}\n"
        );
        assert_eq!(HighScores::load(&path).unwrap(), scores);
    }

    #[test]
    fn missing_file_reads_as_zero() {
        let dir = tempdir().unwrap();
        let mut store = HighScoreFile::new(Some(dir.path().join("nope.json")));
        assert_eq!(store.load_highscore("worm"), 0);
    }

    #[test]
    fn corrupt_file_reads_as_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highscores.json");
        fs_err::write(&path, "this is not JSON").unwrap();
        let mut store = HighScoreFile::new(Some(path));
        assert_eq!(store.load_highscore("worm"), 0);
    }

    #[test]
    fn no_path() {
        let mut store = HighScoreFile::new(None);
        assert_eq!(store.load_highscore("worm"), 0);
        store.save_highscore("worm", 5);
        assert_eq!(store.load_highscore("worm"), 0);
    }

    #[test]
    fn save_keeps_other_games() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highscores.json");
        fs_err::write(&path, "{\"game3\": 7}").unwrap();
        let mut store = HighScoreFile::new(Some(path.clone()));
        store.save_highscore("worm", 9);
        assert_eq!(store.load_highscore("worm"), 9);
        assert_eq!(store.load_highscore("game3"), 7);
        assert_eq!(HighScores::load(&path).unwrap().get("game3"), Some(7));
    }

    #[test]
    fn queued_writes_are_flushed_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highscores.json");
        let mut store = QueuedHighScores::new(HighScoreFile::new(Some(path.clone()))).unwrap();
        store.save_highscore("worm", 3);
        store.save_highscore("worm", 8);
        drop(store);
        let mut file = HighScoreFile::new(Some(path));
        assert_eq!(file.load_highscore("worm"), 8);
    }

    #[test]
    fn queued_store_reads_file_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highscores.json");
        fs_err::write(&path, "{\"worm\": 5}").unwrap();
        let mut store = QueuedHighScores::new(HighScoreFile::new(Some(path.clone()))).unwrap();
        assert_eq!(store.load_highscore("worm"), 5);
        fs_err::write(&path, "{\"worm\": 1, \"game3\": 2}").unwrap();
        assert_eq!(store.load_highscore("worm"), 5);
        assert_eq!(store.load_highscore("game3"), 2);
        store.save_highscore("worm", 9);
        assert_eq!(store.load_highscore("worm"), 9);
        drop(store);
        assert_eq!(HighScores::load(&path).unwrap().get("worm"), Some(9));
    }
}
