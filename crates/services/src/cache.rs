//! File-backed mirror of the player's stats, one file per user id.
//!
//! Cache failures never interrupt the game flow: a missing, unreadable or
//! corrupt file reads as "no cached data" and write errors are logged and
//! dropped.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::store::CachedStats;

pub struct StatsCache {
    dir: PathBuf,
}

impl StatsCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Cache rooted in the platform data directory, if one exists.
    pub fn for_default_dir() -> Option<Self> {
        ProjectDirs::from("", "", "bnet-arcade")
            .map(|dirs| Self::new(dirs.data_dir().join("stats")))
    }

    pub fn load(&self, user_id: &str) -> Option<CachedStats> {
        let path = self.path_for(user_id);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(?e, path = %path.display(), "failed to read stats cache");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!(?e, path = %path.display(), "corrupt stats cache, ignoring");
                None
            }
        }
    }

    pub fn save(&self, user_id: &str, stats: &CachedStats) {
        if let Err(e) = self.try_save(user_id, stats) {
            tracing::warn!(?e, user_id, "failed to persist stats cache");
        }
    }

    pub fn clear(&self, user_id: &str) {
        let _ = std::fs::remove_file(self.path_for(user_id));
    }

    fn try_save(&self, user_id: &str, stats: &CachedStats) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path_for(user_id);
        let tmp = path.with_extension("tmp");

        let file = std::fs::File::create(&tmp)?;
        serde_json::to_writer_pretty(&file, stats)?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&tmp, &path)
    }

    // Battletags carry `#` and the JSON fallback key can carry anything,
    // so the id is flattened into a safe file name.
    fn path_for(&self, user_id: &str) -> PathBuf {
        let mut name: String = user_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        name.truncate(64);
        self.dir.join(format!("{name}.json"))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn round_trips_per_user() {
        let dir = TempDir::new().unwrap();
        let cache = StatsCache::new(dir.path().to_path_buf());

        let mut stats = CachedStats::default();
        stats.high_score = 77;
        stats.wins = 3;

        cache.save("Player#1234", &stats);
        assert_eq!(cache.load("Player#1234"), Some(stats));
        assert_eq!(cache.load("Other#1"), None);
    }

    #[test]
    fn missing_and_corrupt_files_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let cache = StatsCache::new(dir.path().to_path_buf());

        assert_eq!(cache.load("guest"), None);

        std::fs::create_dir_all(dir.path()).unwrap();
        std::fs::write(dir.path().join("guest.json"), b"{ not json").unwrap();
        assert_eq!(cache.load("guest"), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let cache = StatsCache::new(dir.path().to_path_buf());

        cache.save("guest", &CachedStats::default());
        cache.clear("guest");
        cache.clear("guest");
        assert_eq!(cache.load("guest"), None);
    }

    #[test]
    fn unsafe_characters_are_flattened_into_the_file_name() {
        let dir = TempDir::new().unwrap();
        let cache = StatsCache::new(dir.path().to_path_buf());

        let mut first = CachedStats::default();
        first.wins = 1;
        let mut second = CachedStats::default();
        second.wins = 2;

        cache.save("a#b", &first);
        cache.save("a/b", &second);

        // Both flatten to `a_b`; last write wins, nothing panics.
        assert_eq!(cache.load("a#b"), Some(second));
    }
}
