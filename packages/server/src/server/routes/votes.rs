use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Query},
    http::{header::RETRY_AFTER, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::common::ServerId;
use crate::domains::votes::{cast_vote, vote_status, VoteError, VoteStatus};
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;

pub const VOTE_RECORDED_MESSAGE: &str = "Vote recorded! Thanks for supporting this server.";

const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteResponse {
    pub message: String,
    pub votes_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct VoteStatusParams {
    #[serde(rename = "serverId")]
    server_id: Option<String>,
}

impl IntoResponse for VoteError {
    fn into_response(self) -> Response {
        let status = match &self {
            VoteError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            VoteError::Unauthenticated => StatusCode::UNAUTHORIZED,
            VoteError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            VoteError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            VoteError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        };

        match self {
            VoteError::RateLimited {
                retry_at: Some(retry_at),
                ..
            } => {
                let seconds = (retry_at - Utc::now()).num_seconds().max(1);
                let body = ErrorResponse {
                    error: message,
                    retry_at: Some(retry_at),
                };
                (status, [(RETRY_AFTER, seconds.to_string())], Json(body)).into_response()
            }
            _ => (
                status,
                Json(ErrorResponse {
                    error: message,
                    retry_at: None,
                }),
            )
                .into_response(),
        }
    }
}

/// `POST /vote` - cast a vote for a server
///
/// Body: `{ "serverId": <integer> }`, header `Authorization: Bearer <token>`.
/// Authentication is checked before the body is looked at.
pub async fn cast_vote_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CastVoteResponse>, VoteError> {
    let Some(Extension(user)) = auth_user else {
        return Err(VoteError::Unauthenticated);
    };

    let Json(body) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected vote body");
        VoteError::InvalidArgument("Request body must be a JSON object with a serverId".to_string())
    })?;
    let server_id = ServerId::from_json(body.get("serverId"))?;

    let receipt = cast_vote(user.user_id, server_id, Utc::now(), &state.deps).await?;

    Ok(Json(CastVoteResponse {
        message: VOTE_RECORDED_MESSAGE.to_string(),
        votes_count: receipt.votes_count,
    }))
}

/// `GET /vote/status?serverId=N` - whether the caller may vote right now
pub async fn vote_status_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    params: Result<Query<VoteStatusParams>, QueryRejection>,
) -> Result<Json<VoteStatus>, VoteError> {
    let Some(Extension(user)) = auth_user else {
        return Err(VoteError::Unauthenticated);
    };

    let Query(params) = params
        .map_err(|rejection| VoteError::InvalidArgument(rejection.body_text()))?;
    let server_id = ServerId::parse(params.server_id.as_deref().unwrap_or_default())?;

    let status = vote_status(user.user_id, server_id, Utc::now(), &state.deps).await?;

    Ok(Json(status))
}

/// `OPTIONS /vote` - bare preflight; CORS headers come from the CORS layer
pub async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}
