use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    state::AppState,
    users::{
        dto::{MutationResult, Outcome, UserBody},
        repo_types::User,
        services,
        validation::parse_id,
    },
};

pub const MSG_INVALID_BODY: &str = "Invalid request body";

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
}

fn status_for(outcome: Outcome) -> StatusCode {
    match outcome {
        Outcome::Created => StatusCode::CREATED,
        Outcome::Updated | Outcome::Deleted => StatusCode::OK,
        Outcome::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        Outcome::Conflict => StatusCode::CONFLICT,
        Outcome::NotFound => StatusCode::NOT_FOUND,
        Outcome::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond(result: MutationResult) -> (StatusCode, Json<MutationResult>) {
    (status_for(result.outcome), Json(result))
}

/// Unwrap the JSON body, or turn the rejection into a fixed `Invalid` result.
fn body_or_invalid(
    body: Result<Json<UserBody>, JsonRejection>,
) -> Result<UserBody, (StatusCode, Json<MutationResult>)> {
    body.map(|Json(b)| b).map_err(|rejection| {
        warn!(error = %rejection, "rejected request body");
        respond(MutationResult::fail(Outcome::Invalid, MSG_INVALID_BODY))
    })
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, (StatusCode, Json<MutationResult>)> {
    services::list_users(state.store.as_ref())
        .await
        .map(Json)
        .map_err(|_| respond(MutationResult::fail(Outcome::Failed, services::MSG_LIST_FAILED)))
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<UserBody>, JsonRejection>,
) -> (StatusCode, Json<MutationResult>) {
    let body = match body_or_invalid(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    respond(services::create_user(state.store.as_ref(), body.into_form(None)).await)
}

/// `:id` stays raw text so a malformed id is reported as a validation failure.
#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UserBody>, JsonRejection>,
) -> (StatusCode, Json<MutationResult>) {
    let body = match body_or_invalid(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };
    respond(services::update_user(state.store.as_ref(), body.into_form(Some(id))).await)
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<MutationResult>) {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(v) => return respond(MutationResult::fail(Outcome::Invalid, v.to_string())),
    };
    respond(services::delete_user(state.store.as_ref(), id).await)
}
