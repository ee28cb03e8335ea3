/// API 오류 모델 — 모든 거절 사유는 `{"error": ..., "code": ...}` JSON으로 응답
// region:    --- Imports
use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

// endregion: --- Imports

// region:    --- ApiError

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 생성 입력 검증 실패
    Validation(String),
    /// 경매 없음
    NotFound,
    /// 경매 종료
    AuctionEnded,
    /// 본인 경매 입찰
    SelfBidForbidden,
    /// 금액 누락 또는 0 이하
    AmountInvalid,
    /// 현재 가격 이하 입찰 — 표시용으로 현재 가격을 함께 전달
    PriceTooLow { current_price: i64 },
    /// 인증 실패
    Unauthorized,
    /// 내부 오류
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::AuctionEnded => "ALREADY_ENDED",
            ApiError::SelfBidForbidden => "SELF_BID",
            ApiError::AmountInvalid => "INVALID_AMOUNT",
            ApiError::PriceTooLow { .. } => "LOW_BID",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::NotFound => "Auction not found".to_string(),
            ApiError::AuctionEnded => "Auction has ended".to_string(),
            ApiError::SelfBidForbidden => "You cannot bid on your own auction".to_string(),
            ApiError::AmountInvalid => "Bid amount must be greater than 0".to_string(),
            ApiError::PriceTooLow { current_price } => {
                format!("Bid must be higher than current price ({})", current_price)
            }
            ApiError::Unauthorized => "Not authorized".to_string(),
            ApiError::Internal(_) => "Server error".to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({
            "error": self.message(),
            "code": self.code(),
        });
        if let ApiError::PriceTooLow { current_price } = &self {
            body["current_price"] = serde_json::json!(current_price);
        }
        (self.status(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

// endregion: --- ApiError

// region:    --- ApiJson

/// Json 추출기 래퍼 — 본문 파싱 실패(잘못된 JSON, 타입 불일치)도
/// 기본 422 평문 대신 `{"error", "code"}` 형태의 400으로 응답한다
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

// endregion: --- ApiJson

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_rejection_kinds() {
        assert_eq!(ApiError::AuctionEnded.code(), "ALREADY_ENDED");
        assert_eq!(ApiError::SelfBidForbidden.code(), "SELF_BID");
        assert_eq!(ApiError::AmountInvalid.code(), "INVALID_AMOUNT");
        assert_eq!(ApiError::PriceTooLow { current_price: 15 }.code(), "LOW_BID");
        assert_eq!(ApiError::NotFound.code(), "NOT_FOUND");
    }

    #[test]
    fn price_too_low_reports_current_price() {
        let msg = ApiError::PriceTooLow { current_price: 15 }.message();
        assert!(msg.contains("15"));
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(err, ApiError::NotFound);
    }
}

// endregion: --- Tests
