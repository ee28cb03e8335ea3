/// 입찰 원장 — 수락된 입찰의 추가 전용(append-only) 기록
/// 수정/삭제 연산은 존재하지 않는다
// region:    --- Imports
use crate::auction::model::{AuctionStatus, Bid};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- SQL

/// 조건부 가격 갱신: 현재 가격보다 높고, 아직 active이며, end_time이 지나지 않은 경우에만
const ADVANCE_PRICE: &str = r#"
    UPDATE auctions
    SET current_price = $1
    WHERE id = $2 AND current_price < $1 AND status = 'active' AND end_time > $3
    RETURNING current_price
"#;

const INSERT_BID: &str = r#"
    INSERT INTO bids (auction_id, bidder_id, amount, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, auction_id, bidder_id, amount, created_at
"#;

const FETCH_FOR_REJECTION: &str =
    "SELECT current_price, status, end_time FROM auctions WHERE id = $1";

/// 입찰 이력: 금액 내림차순 == 최신순 (수락된 금액은 단조 증가하므로)
const BID_HISTORY: &str = r#"
    SELECT id, auction_id, bidder_id, amount, created_at
    FROM bids
    WHERE auction_id = $1
    ORDER BY amount DESC
"#;

// endregion: --- SQL

// region:    --- Commit Error

/// 커밋 단계에서의 거절 사유
#[derive(Debug)]
pub enum CommitError {
    /// 동시 입찰에 밀렸거나 검증 이후 가격이 올라감 — 최신 가격을 함께 보고
    Outbid { current_price: i64 },
    /// 커밋 시점에 경매가 이미 종료됨
    AuctionClosed,
    Db(sqlx::Error),
}

impl From<sqlx::Error> for CommitError {
    fn from(e: sqlx::Error) -> Self {
        CommitError::Db(e)
    }
}

// endregion: --- Commit Error

// region:    --- Bid Ledger Trait

/// 입찰 원장 트레이트
#[async_trait]
pub trait BidLedger {
    /// 가격 전진과 입찰 기록을 하나의 트랜잭션으로 커밋한다 (둘 다 또는 둘 다 아님)
    async fn commit_bid(
        &self,
        auction_id: i64,
        bidder_id: i64,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<Bid, CommitError>;

    /// 경매의 모든 입찰을 금액 내림차순으로 반환 (첫 항목이 현재 선두 입찰)
    async fn bid_history(&self, auction_id: i64) -> Result<Vec<Bid>, sqlx::Error>;
}

/// 입찰 원장 구현체
pub struct PostgresBidLedger {
    pool: Arc<PgPool>,
}

impl PostgresBidLedger {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BidLedger for PostgresBidLedger {
    async fn commit_bid(
        &self,
        auction_id: i64,
        bidder_id: i64,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<Bid, CommitError> {
        let mut tx = self.pool.begin().await?;

        // 조건부 UPDATE가 동시 입찰 경합의 유일한 심판이다:
        // 0건 갱신이면 누군가 먼저 가격을 올렸거나 경매가 닫힌 것
        let advanced = sqlx::query(ADVANCE_PRICE)
            .bind(amount)
            .bind(auction_id)
            .bind(now)
            .fetch_optional(&mut *tx)
            .await?;

        if advanced.is_none() {
            // 최신 상태를 읽어 구체적인 거절 사유를 보고
            let row = sqlx::query(FETCH_FOR_REJECTION)
                .bind(auction_id)
                .fetch_one(&mut *tx)
                .await?;
            tx.rollback().await?;

            let status: AuctionStatus = row.get("status");
            let end_time: DateTime<Utc> = row.get("end_time");
            if status == AuctionStatus::Ended || end_time <= now {
                return Err(CommitError::AuctionClosed);
            }
            return Err(CommitError::Outbid {
                current_price: row.get("current_price"),
            });
        }

        let bid = sqlx::query_as::<_, Bid>(INSERT_BID)
            .bind(auction_id)
            .bind(bidder_id)
            .bind(amount)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            "{:<12} --> 입찰 커밋 완료: 경매 {}, 가격 {}",
            "Ledger", auction_id, amount
        );
        Ok(bid)
    }

    async fn bid_history(&self, auction_id: i64) -> Result<Vec<Bid>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(BID_HISTORY)
            .bind(auction_id)
            .fetch_all(&*self.pool)
            .await
    }
}

// endregion: --- Bid Ledger Trait
