use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 경매 상태 — persisted as the `auction_status` Postgres enum.
/// `Ended` is terminal: nothing ever flips an auction back to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "auction_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Active,
    Ended,
}

// 경매 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Auction {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub starting_price: i64,
    pub current_price: i64,
    pub end_time: DateTime<Utc>,
    pub status: AuctionStatus,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

// 입찰 모델 — rows are append-only, never updated or deleted
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub auction_id: i64,
    pub bidder_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}
