//! Document persistence module
//!
//! File-level operations behind the admin endpoints: backup-then-overwrite
//! for JSON documents, subscriber list maintenance, and upload writes.
//! There is no locking; concurrent saves to the same file race at the
//! filesystem level and the last writer wins.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Suffix timestamp for backup files, e.g. `news.json.20260829143015.bak`
const BACKUP_TIMESTAMP: &str = "%Y%m%d%H%M%S";

/// Human-readable capture date stored with each subscriber
const SUBSCRIPTION_DATE: &str = "%Y-%m-%d %H:%M:%S";

/// One entry in `subscribers.json`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub email: String,
    pub date: String,
}

/// Result of a subscribe attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Added,
    AlreadySubscribed,
}

/// Pretty-print with 4-space indentation, matching what the admin UI keeps
/// in version control
fn to_pretty_json<T: Serialize>(value: &T) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer).map_err(io::Error::from)?;
    Ok(buf)
}

/// Save a JSON document, preserving any previous revision as a
/// timestamp-suffixed backup. Returns whether a backup was taken.
pub async fn save_document(data_dir: &Path, file_name: &str, document: &Value) -> io::Result<bool> {
    fs::create_dir_all(data_dir).await?;
    let target = data_dir.join(file_name);

    let backed_up = if fs::try_exists(&target).await? {
        let stamp = Local::now().format(BACKUP_TIMESTAMP);
        let backup = data_dir.join(format!("{file_name}.{stamp}.bak"));
        fs::copy(&target, &backup).await?;
        true
    } else {
        false
    };

    fs::write(&target, to_pretty_json(document)?).await?;
    Ok(backed_up)
}

/// Load the subscriber list, empty when the file does not exist yet
pub async fn load_subscribers(path: &Path) -> io::Result<Vec<Subscriber>> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(io::Error::from),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Append a subscriber unless the email is already on the list.
/// No backup is taken for this path; the list only ever grows.
pub async fn add_subscriber(path: &Path, email: &str) -> io::Result<SubscribeOutcome> {
    let mut subscribers = load_subscribers(path).await?;

    if subscribers.iter().any(|s| s.email == email) {
        return Ok(SubscribeOutcome::AlreadySubscribed);
    }

    subscribers.push(Subscriber {
        email: email.to_string(),
        date: Local::now().format(SUBSCRIPTION_DATE).to_string(),
    });

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, to_pretty_json(&subscribers)?).await?;
    Ok(SubscribeOutcome::Added)
}

/// Write decoded upload bytes under `<uploads_dir>/<folder>/<filename>`,
/// creating the folder on demand
pub async fn save_upload(
    uploads_dir: &Path,
    folder: &str,
    filename: &str,
    bytes: &[u8],
) -> io::Result<PathBuf> {
    let target_dir = uploads_dir.join(folder);
    fs::create_dir_all(&target_dir).await?;

    let target = target_dir.join(filename);
    fs::write(&target, bytes).await?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn first_save_creates_file_without_backup() {
        let dir = TempDir::new().unwrap();
        let doc = json!({"machines": [{"model": "SM 74"}]});

        let backed_up = save_document(dir.path(), "inventory.json", &doc)
            .await
            .unwrap();
        assert!(!backed_up);

        let written = std::fs::read_to_string(dir.path().join("inventory.json")).unwrap();
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, doc);
        // 4-space indent, as the admin UI expects
        assert!(written.contains("\n    \"machines\""));
    }

    #[tokio::test]
    async fn second_save_preserves_previous_revision() {
        let dir = TempDir::new().unwrap();
        let first = json!({"rev": 1});
        let second = json!({"rev": 2});

        save_document(dir.path(), "settings.json", &first)
            .await
            .unwrap();
        let backed_up = save_document(dir.path(), "settings.json", &second)
            .await
            .unwrap();
        assert!(backed_up);

        let backup = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.path())
            .find(|p| p.extension().is_some_and(|ext| ext == "bak"))
            .expect("backup file present");
        let name = backup.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("settings.json."));

        let old: Value = serde_json::from_slice(&std::fs::read(&backup).unwrap()).unwrap();
        assert_eq!(old, first);
        let new: Value =
            serde_json::from_slice(&std::fs::read(dir.path().join("settings.json")).unwrap())
                .unwrap();
        assert_eq!(new, second);
    }

    #[tokio::test]
    async fn missing_subscriber_file_reads_as_empty_list() {
        let dir = TempDir::new().unwrap();
        let list = load_subscribers(&dir.path().join("subscribers.json"))
            .await
            .unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn add_subscriber_deduplicates_by_email() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subscribers.json");

        let outcome = add_subscriber(&path, "print@example.com").await.unwrap();
        assert_eq!(outcome, SubscribeOutcome::Added);

        let outcome = add_subscriber(&path, "print@example.com").await.unwrap();
        assert_eq!(outcome, SubscribeOutcome::AlreadySubscribed);

        let list = load_subscribers(&path).await.unwrap();
        assert_eq!(list.len(), 1);
        assert!(!list[0].date.is_empty());
    }

    #[tokio::test]
    async fn save_upload_creates_folder_on_demand() {
        let dir = TempDir::new().unwrap();
        let uploads = dir.path().join("uploads");

        let target = save_upload(&uploads, "gallery", "press.jpg", b"jpegdata")
            .await
            .unwrap();
        assert_eq!(target, uploads.join("gallery").join("press.jpg"));
        assert_eq!(std::fs::read(&target).unwrap(), b"jpegdata");
    }
}
