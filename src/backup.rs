//! Local JSON snapshots of what each import wrote to the database.

use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::Local;
use serde::Serialize;
use std::path::PathBuf;

/// Prefix for snapshots of imported transactions.
pub const IMPORT: &str = "import";

/// Manages backup file creation and rotation.
///
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
        }
    }

    /// Saves `data` as a pretty-printed JSON backup file named `{prefix}.YYYY-MM-DD-NNN.json`,
    /// where NNN is a sequence number, then rotates old backups, keeping `backup_copies` of them.
    ///
    /// Returns the path to the created backup file.
    pub async fn save_json<T>(&self, prefix: &str, data: &T) -> Result<PathBuf>
    where
        T: Serialize + ?Sized,
    {
        let date = today();
        let seq = self.next_sequence_number(prefix, &date).await?;
        let path = self.backups_dir.join(format!("{prefix}.{date}-{seq:03}.json"));

        let json = serde_json::to_string_pretty(data).context("Failed to serialize the backup")?;
        utils::write(&path, json).await?;

        self.rotate(prefix).await?;
        Ok(path)
    }

    /// Scans the backups directory for files with the given prefix and date and returns the next
    /// sequence number.
    async fn next_sequence_number(&self, prefix: &str, date: &str) -> Result<u32> {
        let mut max_seq: u32 = 0;
        for name in self.file_names().await? {
            if let Some(seq) = parse_sequence_number(&name, prefix, date) {
                max_seq = max_seq.max(seq);
            }
        }
        Ok(max_seq + 1)
    }

    /// Deletes the oldest backups with the given prefix beyond `backup_copies`.
    async fn rotate(&self, prefix: &str) -> Result<()> {
        let mut files: Vec<String> = self
            .file_names()
            .await?
            .into_iter()
            .filter(|name| is_backup_file(name, prefix))
            .collect();

        // The name format makes lexical order chronological.
        files.sort();

        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for name in files.into_iter().take(to_delete) {
            utils::remove(&self.backups_dir.join(name)).await?;
        }
        Ok(())
    }

    async fn file_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses the sequence number from a backup filename of the form `{prefix}.{date}-{NNN}.json`.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str) -> Option<u32> {
    filename
        .strip_prefix(&format!("{prefix}.{date}-"))?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

fn is_backup_file(filename: &str, prefix: &str) -> bool {
    filename.starts_with(&format!("{prefix}.")) && filename.ends_with(".json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_parse_sequence_number() {
        assert_eq!(
            parse_sequence_number("import.2025-12-14-001.json", "import", "2025-12-14"),
            Some(1)
        );
        assert_eq!(
            parse_sequence_number("import.2025-12-14-042.json", "import", "2025-12-14"),
            Some(42)
        );
        // Wrong prefix
        assert_eq!(
            parse_sequence_number("export.2025-12-14-001.json", "import", "2025-12-14"),
            None
        );
        // Wrong date
        assert_eq!(
            parse_sequence_number("import.2025-12-13-001.json", "import", "2025-12-14"),
            None
        );
        // Wrong extension
        assert_eq!(
            parse_sequence_number("import.2025-12-14-001.csv", "import", "2025-12-14"),
            None
        );
    }

    #[test]
    fn test_is_backup_file() {
        assert!(is_backup_file("import.2025-12-14-001.json", "import"));
        assert!(!is_backup_file("import.2025-12-14-001.json", "export"));
        assert!(!is_backup_file("import.2025-12-14-001", "import"));
        assert!(!is_backup_file("imports.json", "import"));
    }

    #[tokio::test]
    async fn test_save_json_numbers_and_rotates() {
        let env = TestEnv::new().await;
        let config = env.config();
        let backup = config.backup();

        let mut paths = Vec::new();
        for i in 0..7 {
            paths.push(backup.save_json(IMPORT, &vec![i]).await.unwrap());
        }

        let first = paths[0].file_name().unwrap().to_string_lossy().to_string();
        let last = paths[6].file_name().unwrap().to_string_lossy().to_string();
        assert!(first.ends_with("-001.json"));
        assert!(last.ends_with("-007.json"));

        let remaining = backup.file_names().await.unwrap();
        assert_eq!(remaining.len(), config.backup_copies() as usize);
        assert!(!paths[0].exists());
        assert!(paths[6].exists());

        let content = utils::read(&paths[6]).await.unwrap();
        assert_eq!(serde_json::from_str::<Vec<i32>>(&content).unwrap(), vec![6]);
    }
}
