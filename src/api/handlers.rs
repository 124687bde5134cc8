// Admin API endpoint handlers

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde::Deserialize;
use std::sync::Arc;
use tokio::process::Command;

use super::response;
use super::store::{self, SubscribeOutcome};
use super::SUBSCRIBERS_FILE;
use crate::config::AppState;
use crate::logger;

/// Save a posted JSON document to its table file, backing up the previous
/// revision when one exists
pub async fn handle_save(
    state: &Arc<AppState>,
    path: &str,
    file_name: &str,
    body: &Bytes,
) -> Response<Full<Bytes>> {
    let document: serde_json::Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            // The admin UI always posts valid JSON, so a parse failure is an
            // unexpected fault rather than caller error
            logger::log_api_request("POST", path, 500);
            return response::server_error(&e.to_string());
        }
    };

    match store::save_document(&state.data_dir, file_name, &document).await {
        Ok(_) => {
            logger::log_api_request("POST", path, 200);
            response::success(&format!("{file_name} saved and backed up"))
        }
        Err(e) => {
            logger::log_api_request("POST", path, 500);
            response::server_error(&e.to_string())
        }
    }
}

#[derive(Deserialize)]
struct SubscribeRequest {
    #[serde(default)]
    email: Option<String>,
}

/// Lead capture endpoint: append `{email, date}` unless already present
pub async fn handle_subscribe(state: &Arc<AppState>, body: &Bytes) -> Response<Full<Bytes>> {
    let request: SubscribeRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => {
            logger::log_api_request("POST", "/api/subscribe", 500);
            return response::server_error(&e.to_string());
        }
    };

    let Some(email) = request.email.filter(|e| !e.is_empty()) else {
        logger::log_api_request("POST", "/api/subscribe", 400);
        return response::bad_request("Email is required");
    };

    let path = state.data_dir.join(SUBSCRIBERS_FILE);
    match store::add_subscriber(&path, &email).await {
        Ok(SubscribeOutcome::AlreadySubscribed) => {
            logger::log_api_request("POST", "/api/subscribe", 200);
            response::success("Already subscribed")
        }
        Ok(SubscribeOutcome::Added) => {
            logger::log_api_request("POST", "/api/subscribe", 200);
            response::success("Subscription successful")
        }
        Err(e) => {
            logger::log_api_request("POST", "/api/subscribe", 500);
            response::server_error(&e.to_string())
        }
    }
}

#[derive(Deserialize)]
struct UploadRequest {
    #[serde(default)]
    folder: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    /// Base64-encoded file content
    #[serde(default)]
    content: Option<String>,
}

/// Decode a base64 payload into `uploads/<folder>/<filename>`.
/// The admin UI is trusted to supply safe filenames.
pub async fn handle_upload(state: &Arc<AppState>, body: &Bytes) -> Response<Full<Bytes>> {
    let request: UploadRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => {
            logger::log_api_request("POST", "/api/upload", 500);
            return response::server_error(&e.to_string());
        }
    };

    let folder = request.folder.unwrap_or_else(|| "misc".to_string());
    let (Some(filename), Some(content)) = (
        request.filename.filter(|f| !f.is_empty()),
        request.content.filter(|c| !c.is_empty()),
    ) else {
        logger::log_api_request("POST", "/api/upload", 400);
        return response::bad_request("Missing filename or content");
    };

    let Ok(bytes) = STANDARD.decode(content.as_bytes()) else {
        logger::log_api_request("POST", "/api/upload", 400);
        return response::bad_request("Invalid base64 content");
    };

    match store::save_upload(&state.uploads_dir, &folder, &filename, &bytes).await {
        Ok(_) => {
            logger::log_api_request("POST", "/api/upload", 200);
            response::success(&format!("File saved to {folder}/{filename}"))
        }
        Err(e) => {
            logger::log_api_request("POST", "/api/upload", 500);
            response::server_error(&e.to_string())
        }
    }
}

/// Run the configured review-sync command and relay its stdout verbatim
pub async fn handle_sync_reviews(state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let command = &state.config.sync.command;
    let Some((program, args)) = command.split_first() else {
        logger::log_api_request("POST", "/api/sync-reviews", 500);
        return response::server_error("Sync command is not configured");
    };

    match Command::new(program).args(args).output().await {
        Ok(output) => {
            logger::log_api_request("POST", "/api/sync-reviews", 200);
            response::raw_json(output.stdout)
        }
        Err(e) => {
            logger::log_api_request("POST", "/api/sync-reviews", 500);
            response::server_error(&e.to_string())
        }
    }
}
