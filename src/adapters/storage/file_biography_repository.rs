//! Local Filesystem Biography Repository
//!
//! Stores one pretty-printed JSON record per user.
//!
//! # Directory Structure
//!
//! ```text
//! {base_path}/
//! └── biographies/
//!     ├── user_alice.json
//!     └── user_bob%40example.com.json
//! ```
//!
//! User ids are percent-encoded into filenames. Writes go to a `.tmp`
//! sibling, are synced, then renamed over the record. All writes are
//! serialized through one mutex, which also makes `find_or_create` and
//! `update` atomic within the process.
//!
//! A record that is not valid JSON is reported as a storage error and left
//! untouched on disk.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::biography::{BiographyAggregate, BiographyNormalizer};
use crate::domain::foundation::{DomainError, PublicId, UserId};
use crate::ports::{BiographyMutation, BiographyRepository};

const RECORD_PREFIX: &str = "user_";
const RECORD_EXTENSION: &str = ".json";

/// File-backed biography storage.
#[derive(Debug)]
pub struct FileBiographyRepository {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBiographyRepository {
    /// Creates a repository rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            dir: base_path.into().join("biographies"),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the directory holding the records.
    pub fn records_dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, user_id: &UserId) -> PathBuf {
        self.dir.join(format!(
            "{}{}{}",
            RECORD_PREFIX,
            urlencoding::encode(user_id.as_str()),
            RECORD_EXTENSION
        ))
    }

    /// Extracts the user id from a record filename.
    fn parse_user_id(filename: &str) -> Option<UserId> {
        let encoded = filename
            .strip_prefix(RECORD_PREFIX)?
            .strip_suffix(RECORD_EXTENSION)?;
        let decoded = urlencoding::decode(encoded).ok()?;
        UserId::new(decoded.into_owned()).ok()
    }

    async fn read_raw(&self, path: &Path) -> Result<Option<Value>, DomainError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Corrupt biography record");
            DomainError::storage(format!("Corrupt record {}: {}", path.display(), e))
        })
    }

    /// Loads and normalizes the user's record, or a fresh biography.
    ///
    /// The flag is true when the stored record is already in normalized form.
    async fn load_or_new(
        &self,
        user_id: &UserId,
    ) -> Result<(BiographyAggregate, bool), DomainError> {
        let loaded = match self.read_raw(&self.record_path(user_id)).await? {
            Some(raw) => {
                let biography = BiographyNormalizer::normalize(user_id, &raw);
                let unchanged = biography.to_record().map(|r| r == raw).unwrap_or(false);
                (biography, unchanged)
            }
            None => (BiographyAggregate::new(user_id.clone()), false),
        };
        Ok(loaded)
    }

    async fn write_record(&self, biography: &BiographyAggregate) -> Result<(), DomainError> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let final_path = self.record_path(biography.user_id());
        let temp_path = final_path.with_extension("json.tmp");

        let record = biography
            .to_record()
            .and_then(|value| serde_json::to_vec_pretty(&value))
            .map_err(|e| DomainError::storage(format!("Failed to serialize biography: {}", e)))?;

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.write_all(&record).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to write to temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to sync temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        fs::rename(&temp_path, &final_path).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl BiographyRepository for FileBiographyRepository {
    async fn find_or_create(&self, user_id: &UserId) -> Result<BiographyAggregate, DomainError> {
        let _guard = self.write_lock.lock().await;

        let (biography, unchanged) = self.load_or_new(user_id).await?;
        if !unchanged {
            self.write_record(&biography).await?;
            tracing::debug!(user_id = %user_id, "Stored biography record");
        }
        Ok(biography)
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<BiographyAggregate>, DomainError> {
        let raw = self.read_raw(&self.record_path(user_id)).await?;
        Ok(raw.map(|raw| BiographyNormalizer::normalize(user_id, &raw)))
    }

    async fn find_by_public_id(
        &self,
        public_id: &PublicId,
    ) -> Result<Option<BiographyAggregate>, DomainError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to list {}: {}",
                    self.dir.display(),
                    e
                )))
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list records: {}", e)))?
        {
            let filename = entry.file_name();
            let Some(user_id) = filename.to_str().and_then(Self::parse_user_id) else {
                continue;
            };
            // One unreadable record must not hide the others.
            let raw = match self.read_raw(&entry.path()).await {
                Ok(Some(raw)) => raw,
                Ok(None) | Err(_) => continue,
            };
            let biography = BiographyNormalizer::normalize(&user_id, &raw);
            if biography.public_id() == Some(public_id) {
                return Ok(Some(biography));
            }
        }

        Ok(None)
    }

    async fn update(
        &self,
        user_id: &UserId,
        mutation: BiographyMutation,
    ) -> Result<BiographyAggregate, DomainError> {
        let _guard = self.write_lock.lock().await;

        let (mut biography, _) = self.load_or_new(user_id).await?;
        mutation(&mut biography)?;
        self.write_record(&biography).await?;
        Ok(biography)
    }

    async fn save(&self, biography: &BiographyAggregate) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        self.write_record(biography).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::biography::{LifeSectionKind, Voice};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn user_ids_round_trip_through_filenames() {
        let temp = TempDir::new().unwrap();
        let repo = FileBiographyRepository::new(temp.path());

        for id in ["alice", "bob@example.com", "../../etc", "ünïcode user"] {
            let path = repo.record_path(&user(id));
            assert_eq!(path.parent(), Some(repo.records_dir()));

            let filename = path.file_name().and_then(|f| f.to_str()).unwrap();
            assert!(!filename.contains('/'));
            assert_eq!(FileBiographyRepository::parse_user_id(filename), Some(user(id)));
        }
    }

    #[test]
    fn parse_user_id_ignores_foreign_files() {
        assert_eq!(
            FileBiographyRepository::parse_user_id("user_alice.json"),
            Some(user("alice"))
        );
        assert!(FileBiographyRepository::parse_user_id("user_alice.json.tmp").is_none());
        assert!(FileBiographyRepository::parse_user_id("notes.txt").is_none());
    }

    #[tokio::test]
    async fn find_or_create_persists_new_record() {
        let temp = TempDir::new().unwrap();
        let repo = FileBiographyRepository::new(temp.path());

        let bio = repo.find_or_create(&user("alice")).await.unwrap();
        assert!(repo.records_dir().join("user_alice.json").exists());

        let again = repo.find_or_create(&user("alice")).await.unwrap();
        assert_eq!(bio, again);
    }

    #[tokio::test]
    async fn concurrent_first_access_creates_one_record() {
        let temp = TempDir::new().unwrap();
        let repo = Arc::new(FileBiographyRepository::new(temp.path()));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.find_or_create(&user("racer")).await.unwrap()
            }));
        }
        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(std::fs::read_dir(repo.records_dir()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn save_and_reload() {
        let temp = TempDir::new().unwrap();
        let repo = FileBiographyRepository::new(temp.path());

        let mut bio = repo.find_or_create(&user("alice")).await.unwrap();
        bio.set_section_summary(LifeSectionKind::Childhood, "Grew up on a farm");
        bio.record_generated_story("# Alice\n\nShe grew up on a farm.", Voice::Simple);
        repo.save(&bio).await.unwrap();

        let loaded = repo.find_by_user(&user("alice")).await.unwrap().unwrap();
        assert_eq!(loaded, bio);
    }

    #[tokio::test]
    async fn find_by_public_id_scans_records() {
        let temp = TempDir::new().unwrap();
        let repo = FileBiographyRepository::new(temp.path());

        repo.find_or_create(&user("private")).await.unwrap();
        let mut shared = repo.find_or_create(&user("shared@example.com")).await.unwrap();
        shared.set_visibility(true);
        repo.save(&shared).await.unwrap();

        let token = shared.public_id().cloned().unwrap();
        let found = repo.find_by_public_id(&token).await.unwrap().unwrap();
        assert_eq!(found.user_id(), &user("shared@example.com"));
    }

    #[tokio::test]
    async fn missing_directory_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let repo = FileBiographyRepository::new(temp.path().join("absent"));

        assert!(repo.find_by_user(&user("x")).await.unwrap().is_none());
        let token = PublicId::generate();
        assert!(repo.find_by_public_id(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_record_is_reported_and_left_on_disk() {
        let temp = TempDir::new().unwrap();
        let repo = FileBiographyRepository::new(temp.path());

        let mut bio = repo.find_or_create(&user("bob")).await.unwrap();
        bio.set_section_summary(LifeSectionKind::Career, "Ship captain");
        repo.save(&bio).await.unwrap();

        let path = repo.records_dir().join("user_bob.json");
        let mut damaged = std::fs::read_to_string(&path).unwrap();
        damaged.push(',');
        std::fs::write(&path, &damaged).unwrap();

        let err = repo.find_or_create(&user("bob")).await.unwrap_err();
        assert_eq!(err.code, crate::domain::foundation::ErrorCode::StorageError);

        let update: BiographyMutation = Box::new(|bio: &mut BiographyAggregate| {
            bio.set_section_summary(LifeSectionKind::Dreams, "Sail again");
            Ok(())
        });
        assert!(repo.update(&user("bob"), update).await.is_err());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), damaged);
        assert!(damaged.contains("Ship captain"));
    }

    #[tokio::test]
    async fn corrupt_record_does_not_hide_other_shares() {
        let temp = TempDir::new().unwrap();
        let repo = FileBiographyRepository::new(temp.path());

        let mut shared = repo.find_or_create(&user("ann")).await.unwrap();
        shared.set_visibility(true);
        repo.save(&shared).await.unwrap();
        std::fs::write(repo.records_dir().join("user_aaa.json"), b"{not json").unwrap();

        let token = shared.public_id().cloned().unwrap();
        let found = repo.find_by_public_id(&token).await.unwrap().unwrap();
        assert_eq!(found.user_id(), &user("ann"));
    }

    #[tokio::test]
    async fn update_applies_mutation_to_current_record() {
        let temp = TempDir::new().unwrap();
        let repo = FileBiographyRepository::new(temp.path());

        let mut published = repo.find_or_create(&user("cat")).await.unwrap();
        published.set_visibility(true);
        repo.save(&published).await.unwrap();

        let updated = repo
            .update(
                &user("cat"),
                Box::new(|bio: &mut BiographyAggregate| {
                    bio.set_section_summary(LifeSectionKind::Education, "Night school");
                    Ok(())
                }),
            )
            .await
            .unwrap();

        assert!(updated.is_public());
        assert_eq!(updated.public_id(), published.public_id());
        assert_eq!(repo.find_by_user(&user("cat")).await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn failed_update_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let repo = FileBiographyRepository::new(temp.path());

        let result = repo
            .update(
                &user("dan"),
                Box::new(|_: &mut BiographyAggregate| {
                    Err(DomainError::validation("timeline", "duplicate id"))
                }),
            )
            .await;

        assert!(result.is_err());
        assert!(repo.find_by_user(&user("dan")).await.unwrap().is_none());
    }
}
