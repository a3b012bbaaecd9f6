use anyhow::Result;
use chrono::Utc;
use fs_err as fs;
use serde::Serialize;
use serde_json::{json, to_string_pretty, Value};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Per-session archive of generate/email exchanges, one JSON file each.
pub struct Transcript {
    dir: PathBuf,
    session: Uuid,
    seq: usize,
}

impl Transcript {
    pub fn new(root: &Path) -> Self {
        let session = Uuid::new_v4();
        Self { dir: root.join(session.to_string()), session, seq: 0 }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn save<T: Serialize>(&mut self, stage: &str, request: &T, outcome: Value) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        self.seq += 1;
        let path = self.dir.join(format!("{:03}-{stage}.json", self.seq));
        let record = json!({
            "session": self.session,
            "stage": stage,
            "timestamp": Utc::now(),
            "request": request,
            "outcome": outcome,
        });
        fs::write(&path, to_string_pretty(&record)?)?;
        Ok(path)
    }
}
