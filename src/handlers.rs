// region:    --- Imports
use crate::auction::model::{Auction, Bid};
use crate::auth::Identity;
use crate::bidding::commands::{self, CreateAuctionCommand, PlaceBidCommand};
use crate::database::DatabaseManager;
use crate::error::{ApiError, ApiJson};
use crate::ledger::{BidLedger, PostgresBidLedger};
use crate::query;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Command Handlers

/// 경매 생성 요청 처리 (인증 필요)
pub async fn handle_create_auction(
    State(db_manager): State<Arc<DatabaseManager>>,
    creator: Identity,
    ApiJson(cmd): ApiJson<CreateAuctionCommand>,
) -> Result<(StatusCode, Json<Auction>), ApiError> {
    info!(
        "{:<12} --> 경매 생성 요청: 사용자 {}",
        "Handler", creator.username
    );
    let auction = commands::handle_create_auction(cmd, &creator, &db_manager).await?;
    Ok((StatusCode::CREATED, Json(auction)))
}

/// 입찰 요청 처리 (인증 필요)
pub async fn handle_place_bid(
    State(db_manager): State<Arc<DatabaseManager>>,
    bidder: Identity,
    Path(auction_id): Path<i64>,
    ApiJson(cmd): ApiJson<PlaceBidCommand>,
) -> Result<(StatusCode, Json<BidAccepted>), ApiError> {
    info!(
        "{:<12} --> 입찰 요청: 경매 {}, 사용자 {}",
        "Handler", auction_id, bidder.username
    );
    let ledger = PostgresBidLedger::new(db_manager.get_pool());
    let (bid, auction) =
        commands::handle_place_bid(auction_id, cmd, &bidder, &db_manager, &ledger).await?;
    Ok((
        StatusCode::CREATED,
        Json(BidAccepted {
            bid,
            current_price: auction.current_price,
        }),
    ))
}

/// 입찰 수락 응답
#[derive(Debug, Serialize)]
pub struct BidAccepted {
    pub bid: Bid,
    pub current_price: i64,
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 진행 중 경매 목록 조회
pub async fn handle_list_auctions(
    State(db_manager): State<Arc<DatabaseManager>>,
) -> Result<Json<Vec<Auction>>, ApiError> {
    info!("{:<12} --> 진행 중 경매 목록 조회", "Handler");
    let auctions = query::handlers::list_active_auctions(&db_manager).await?;
    Ok(Json(auctions))
}

/// 경매 상세 조회 — 경매와 입찰 이력을 함께 반환
/// 읽기 경로에서도 만료를 관찰하고 전환을 영속화한다 (지연 만료)
pub async fn handle_get_auction(
    State(db_manager): State<Arc<DatabaseManager>>,
    Path(auction_id): Path<i64>,
) -> Result<Json<AuctionDetail>, ApiError> {
    info!("{:<12} --> 경매 상세 조회 id: {}", "Handler", auction_id);
    let auction = query::handlers::get_auction(&db_manager, auction_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let auction = commands::observe_expiry(&db_manager, auction, Utc::now()).await?;

    let ledger = PostgresBidLedger::new(db_manager.get_pool());
    let bids = ledger
        .bid_history(auction_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(AuctionDetail { auction, bids }))
}

/// 경매 상세 응답 — bids는 금액 내림차순, 첫 항목이 현재 선두 입찰
#[derive(Debug, Serialize)]
pub struct AuctionDetail {
    pub auction: Auction,
    pub bids: Vec<Bid>,
}

// endregion: --- Query Handlers
