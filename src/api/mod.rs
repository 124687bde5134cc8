// Admin API module entry
// POST endpoints that persist admin UI documents to JSON files on disk

mod handlers;
pub mod response;
pub mod store;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// Fixed endpoint table: POST path -> document file in the data directory
const SAVE_ENDPOINTS: &[(&str, &str)] = &[
    ("/api/save-inventory", "inventory.json"),
    ("/api/save-news", "news.json"),
    ("/api/save-blogs", "blogs.json"),
    ("/api/save-videos", "videos.json"),
    ("/api/save-pages", "pages.json"),
    ("/api/save-staff", "our_staff.json"),
    ("/api/save-settings", "settings.json"),
    ("/api/save-subscribers", "subscribers.json"),
];

/// File written by the subscribe endpoint (same file the save endpoint
/// overwrites wholesale)
pub const SUBSCRIBERS_FILE: &str = "subscribers.json";

/// Look up the document file targeted by a save endpoint
pub fn save_target(path: &str) -> Option<&'static str> {
    SAVE_ENDPOINTS
        .iter()
        .find(|(endpoint, _)| *endpoint == path)
        .map(|(_, file)| *file)
}

/// Handle a POST request: collect the body, then dispatch by path
pub async fn handle_post(
    req: Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();
    let path = parts.uri.path();

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_api_request("POST", path, 400);
            return response::bad_request(&format!("Failed to read request body: {e}"));
        }
    };

    dispatch(path, &body, state).await
}

/// Body-level dispatch, separated from the hyper plumbing so tests can call
/// endpoints directly
pub async fn dispatch(path: &str, body: &Bytes, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    if let Some(file_name) = save_target(path) {
        return handlers::handle_save(state, path, file_name, body).await;
    }

    match path {
        "/api/subscribe" => handlers::handle_subscribe(state, body).await,
        "/api/upload" => handlers::handle_upload(state, body).await,
        "/api/sync-reviews" => handlers::handle_sync_reviews(state).await,
        _ => {
            logger::log_api_request("POST", path, 404);
            response::not_found()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::response::Envelope;
    use super::*;
    use crate::config::{
        Config, HttpConfig, LoggingConfig, ServerConfig, SiteConfig, SyncConfig,
    };
    use hyper::StatusCode;
    use serde_json::json;
    use tempfile::TempDir;

    fn state_for(site: &TempDir) -> Arc<AppState> {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            site: SiteConfig {
                root: site.path().to_str().unwrap().to_string(),
                data_dir: "data".to_string(),
                uploads_dir: "uploads".to_string(),
                index_files: vec!["index.html".to_string()],
            },
            http: HttpConfig {
                server_name: "SiteDev/test".to_string(),
                enable_cors: false,
                max_body_size: 1024 * 1024,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
            },
            sync: SyncConfig {
                command: vec!["echo".to_string(), r#"{"status": "success"}"#.to_string()],
            },
        };
        Arc::new(AppState::new(&config))
    }

    async fn envelope_of(resp: Response<Full<Bytes>>) -> Envelope {
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("envelope JSON")
    }

    fn backups_in(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
        std::fs::read_dir(dir)
            .expect("read data dir")
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "bak"))
            .collect()
    }

    #[tokio::test]
    async fn save_news_writes_document_and_backs_up_previous() {
        let site = TempDir::new().unwrap();
        let state = state_for(&site);

        let first = json!({"articles": [{"title": "Machine arrived"}]});
        let resp = dispatch("/api/save-news", &Bytes::from(first.to_string()), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let news_path = state.data_dir.join("news.json");
        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&news_path).unwrap()).unwrap();
        assert_eq!(on_disk, first);
        assert!(backups_in(&state.data_dir).is_empty());

        let second = json!({"articles": []});
        let resp = dispatch("/api/save-news", &Bytes::from(second.to_string()), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let envelope = envelope_of(resp).await;
        assert_eq!(envelope.status, "success");
        assert_eq!(envelope.message, "news.json saved and backed up");

        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&news_path).unwrap()).unwrap();
        assert_eq!(on_disk, second);

        let backups = backups_in(&state.data_dir);
        assert_eq!(backups.len(), 1);
        let backed_up: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&backups[0]).unwrap()).unwrap();
        assert_eq!(backed_up, first);
    }

    #[tokio::test]
    async fn save_rejects_malformed_json_with_500() {
        let site = TempDir::new().unwrap();
        let state = state_for(&site);

        let resp = dispatch("/api/save-pages", &Bytes::from_static(b"not json"), &state).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope_of(resp).await.status, "error");
        assert!(!state.data_dir.join("pages.json").exists());
    }

    #[tokio::test]
    async fn duplicate_subscribe_keeps_one_entry() {
        let site = TempDir::new().unwrap();
        let state = state_for(&site);
        let body = Bytes::from(json!({"email": "buyer@example.com"}).to_string());

        let resp = dispatch("/api/subscribe", &body, &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(envelope_of(resp).await.message, "Subscription successful");

        let resp = dispatch("/api/subscribe", &body, &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(envelope_of(resp).await.message, "Already subscribed");

        let subscribers: Vec<store::Subscriber> = serde_json::from_slice(
            &std::fs::read(state.data_dir.join(SUBSCRIBERS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(subscribers.len(), 1);
        assert_eq!(subscribers[0].email, "buyer@example.com");
    }

    #[tokio::test]
    async fn subscribe_without_email_is_400_and_writes_nothing() {
        let site = TempDir::new().unwrap();
        let state = state_for(&site);

        let resp = dispatch(
            "/api/subscribe",
            &Bytes::from(json!({"name": "no email"}).to_string()),
            &state,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(envelope_of(resp).await.message, "Email is required");
        assert!(!state.data_dir.join(SUBSCRIBERS_FILE).exists());
    }

    #[tokio::test]
    async fn upload_decodes_base64_into_folder() {
        let site = TempDir::new().unwrap();
        let state = state_for(&site);

        let body = json!({
            "folder": "brochures",
            "filename": "machine.txt",
            "content": "aGVsbG8gd29ybGQ=",
        });
        let resp = dispatch("/api/upload", &Bytes::from(body.to_string()), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            envelope_of(resp).await.message,
            "File saved to brochures/machine.txt"
        );

        let saved = std::fs::read(state.uploads_dir.join("brochures/machine.txt")).unwrap();
        assert_eq!(saved, b"hello world");
    }

    #[tokio::test]
    async fn upload_with_invalid_base64_is_400_and_creates_no_file() {
        let site = TempDir::new().unwrap();
        let state = state_for(&site);

        let body = json!({"filename": "x.bin", "content": "!!! not base64 !!!"});
        let resp = dispatch("/api/upload", &Bytes::from(body.to_string()), &state).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(envelope_of(resp).await.message, "Invalid base64 content");
        assert!(!state.uploads_dir.exists());
    }

    #[tokio::test]
    async fn upload_without_filename_is_400() {
        let site = TempDir::new().unwrap();
        let state = state_for(&site);

        let body = json!({"content": "aGk="});
        let resp = dispatch("/api/upload", &Bytes::from(body.to_string()), &state).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            envelope_of(resp).await.message,
            "Missing filename or content"
        );
    }

    #[tokio::test]
    async fn sync_reviews_relays_subprocess_stdout() {
        let site = TempDir::new().unwrap();
        let state = state_for(&site);

        let resp = dispatch("/api/sync-reviews", &Bytes::new(), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let stdout = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(stdout.contains(r#""status": "success""#));
    }

    #[tokio::test]
    async fn unknown_endpoint_is_404_with_error_envelope() {
        let site = TempDir::new().unwrap();
        let state = state_for(&site);

        let resp = dispatch("/api/save-everything", &Bytes::from_static(b"{}"), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let envelope = envelope_of(resp).await;
        assert_eq!(envelope.status, "error");
        assert_eq!(envelope.message, "Endpoint not found");
    }

    #[test]
    fn save_table_covers_all_admin_documents() {
        assert_eq!(save_target("/api/save-inventory"), Some("inventory.json"));
        assert_eq!(save_target("/api/save-staff"), Some("our_staff.json"));
        assert_eq!(save_target("/api/save-settings"), Some("settings.json"));
        assert_eq!(save_target("/api/subscribe"), None);
    }
}
