/// 인증 협력자 — 토큰 발급/검증은 외부 책임이고, 여기서는 이미 발급된
/// Bearer 토큰을 사용자 신원으로 해석만 한다
// region:    --- Imports
use crate::database::DatabaseManager;
use crate::error::ApiError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::Serialize;
use std::sync::Arc;

// endregion: --- Imports

// region:    --- Identity

const LOOKUP_TOKEN: &str = "SELECT id, username FROM users WHERE token = $1";

/// 인증된 사용자 신원 — 핵심 로직은 이 값을 재검증 없이 신뢰한다
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Identity {
    pub id: i64,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<Arc<DatabaseManager>> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<DatabaseManager>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        sqlx::query_as::<_, Identity>(LOOKUP_TOKEN)
            .bind(token)
            .fetch_optional(state.pool())
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .ok_or(ApiError::Unauthorized)
    }
}

// endregion: --- Identity
