//! Test helpers for isolated testing.
//!
//! Provides:
//! - `MemorySink`, a syslog sink that keeps records in memory
//! - `TestEnvironment`, a temp directory with target paths to write to
//!
//! # Usage
//!
//! ```ignore
//! use writer_config::testing::TestEnvironment;
//!
//! #[test]
//! fn test_something() -> anyhow::Result<()> {
//!     let env = TestEnvironment::new()?;
//!     let target = env.target_path("out.txt");
//!     // parent of `target` exists, parent of `env.orphan_path(..)` does not
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::syslog::{Priority, SyslogSink};

/// Atomic counter for unique test IDs
static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Syslog sink capturing records for assertions
#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<(Priority, String)>>>,
}

impl MemorySink {
    /// Snapshot of everything sent so far
    pub fn records(&self) -> Vec<(Priority, String)> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Messages sent at exactly `priority`
    pub fn messages_at(&self, priority: Priority) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(p, _)| *p == priority)
            .map(|(_, message)| message)
            .collect()
    }
}

impl SyslogSink for MemorySink {
    fn send(&self, priority: Priority, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((priority, message.to_string()));
        }
    }
}

/// Isolated test environment with unique paths
pub struct TestEnvironment {
    /// Temporary directory (dropped on cleanup)
    temp_dir: TempDir,
    /// Existing directory that targets are written into
    pub work_dir: PathBuf,
    /// Stand-in for $HOME so no user config leaks into tests
    pub home_dir: PathBuf,
    /// Unique test ID
    pub test_id: u32,
}

impl TestEnvironment {
    /// Create a new isolated test environment
    pub fn new() -> anyhow::Result<Self> {
        let test_id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        let work_dir = root.join("work");
        let home_dir = root.join("home");
        std::fs::create_dir_all(&work_dir)?;
        std::fs::create_dir_all(&home_dir)?;

        Ok(Self {
            temp_dir,
            work_dir,
            home_dir,
            test_id,
        })
    }

    /// Path inside an existing directory
    pub fn target_path(&self, name: &str) -> PathBuf {
        self.work_dir.join(name)
    }

    /// Path whose parent directory does not exist
    pub fn orphan_path(&self, name: &str) -> PathBuf {
        self.work_dir
            .join(format!("missing-{}", self.test_id))
            .join(name)
    }

    /// Write `~/.writer/config.toml` under the fake home
    pub fn write_config(&self, contents: &str) -> anyhow::Result<PathBuf> {
        let dir = self.home_dir.join(".writer");
        std::fs::create_dir_all(&dir)?;
        let path = dir.join("config.toml");
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }
}
