// region:    --- Imports
use super::queries;
use crate::auction::model::Auction;
use crate::database::DatabaseManager;
use sqlx::Error as SqlxError;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 진행 중 경매 목록 조회 (생성 시각 내림차순)
/// 이미 영속화된 만료 전환만 반영한다 — 지연 모델에서는 한 폴링 주기만큼의
/// 지연이 의도된 동작이다
pub async fn list_active_auctions(db_manager: &DatabaseManager) -> Result<Vec<Auction>, SqlxError> {
    info!("{:<12} --> 진행 중 경매 목록 조회", "Query");
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Auction>(queries::LIST_ACTIVE_AUCTIONS)
                    .fetch_all(&mut **tx)
                    .await
            })
        })
        .await
}

/// 경매 단건 조회
pub async fn get_auction(
    db_manager: &DatabaseManager,
    auction_id: i64,
) -> Result<Option<Auction>, SqlxError> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", auction_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Auction>(queries::GET_AUCTION)
                    .bind(auction_id)
                    .fetch_optional(&mut **tx)
                    .await
            })
        })
        .await
}

// endregion: --- Query Handlers
