use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracker_runtime::store::{ResultStore, StoreEntry};

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Routes serving the published results.
///
/// Static routes take precedence over `/{key}`.
pub fn router(store: ResultStore) -> Router {
    Router::new()
        .route("/all", get(all_entries))
        .route("/updated", get(last_updated))
        .route("/{key}", get(entry_by_key))
        .with_state(store)
}

async fn all_entries(State(store): State<ResultStore>) -> Json<BTreeMap<String, StoreEntry>> {
    let entries = store
        .snapshot()
        .await
        .into_iter()
        .map(|(key, entry)| (key, StoreEntry::clone(&entry)))
        .collect();
    Json(entries)
}

async fn last_updated(State(store): State<ResultStore>) -> Json<MessageBody> {
    let message = match store.last_updated().await {
        Some(at) => format!("Last updated at: {}", at.to_rfc3339()),
        None => "Data has not been updated yet".to_string(),
    };
    Json(MessageBody { message })
}

async fn entry_by_key(State(store): State<ResultStore>, Path(key): Path<String>) -> Response {
    match store.get(&key).await {
        Some(entry) => Json(StoreEntry::clone(&entry)).into_response(),
        None => {
            tracing::debug!(%key, "no entry for key");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: "Data not found",
                }),
            )
                .into_response()
        }
    }
}
