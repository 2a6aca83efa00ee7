//! Relay endpoint handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::http::response::error_response;
use crate::http::server::AppState;
use crate::relay::payload::parse_payload;
use crate::relay::{ContactListSubmit, RecordFetch, RelayResult};

/// `POST /api/records`
pub async fn fetch_records(State(state): State<AppState>, body: Bytes) -> RelayResult<Response> {
    let payload = parse_payload(&body)?;
    let op = RecordFetch::from_payload(&payload)?;
    tracing::debug!(object_key = %op.object_key, "Relaying record fetch");
    Ok(state.relay.execute(&op).await?.into_response())
}

/// `POST /api/contact/list`
pub async fn submit_contact_list(State(state): State<AppState>, body: Bytes) -> RelayResult<Response> {
    let payload = parse_payload(&body)?;
    let op = ContactListSubmit::from_payload(&payload)?;
    tracing::debug!(
        group_list_name = %op.group_list_name,
        user_profile_ids = op.user_profile_ids.len(),
        "Relaying contact list"
    );
    Ok(state.relay.execute(&op).await?.into_response())
}

/// Fallback for anything no route or static file answers.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}
