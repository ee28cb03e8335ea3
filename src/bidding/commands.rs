/// 입찰/경매 커맨드 처리
/// 1. 경매 생성
/// 2. 입찰
// region:    --- Imports
use crate::auction::lifecycle::{self, AuctionDraft};
use crate::auction::model::{Auction, Bid};
use crate::auth::Identity;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::ledger::{BidLedger, CommitError};
use crate::query::{handlers as query_handlers, queries};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands

/// 경매 생성 명령 — 필드 누락도 검증 오류로 보고해야 하므로 전부 Option
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateAuctionCommand {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starting_price: Option<i64>,
    pub end_time: Option<DateTime<Utc>>,
}

/// 입찰 명령 — 대상 경매는 경로에서, 입찰자는 인증에서 온다
/// 누락된 금액은 0 이하와 동일하게 INVALID_AMOUNT로 거절
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub amount: Option<i64>,
}

/// 누락 필드 검사: 하나라도 빠지면 생성 검증 실패
fn draft_from_command(cmd: CreateAuctionCommand) -> Result<AuctionDraft, ApiError> {
    match (cmd.title, cmd.description, cmd.starting_price, cmd.end_time) {
        (Some(title), Some(description), Some(starting_price), Some(end_time)) => {
            Ok(AuctionDraft {
                title,
                description,
                starting_price,
                end_time,
            })
        }
        _ => Err(ApiError::Validation("Please fill all the fields".into())),
    }
}

/// 금액 검사: 누락이거나 0 이하면 거절
fn required_amount(amount: Option<i64>) -> Result<i64, ApiError> {
    match amount {
        Some(amount) if amount > 0 => Ok(amount),
        _ => Err(ApiError::AmountInvalid),
    }
}

/// 1. 경매 생성
pub async fn handle_create_auction(
    cmd: CreateAuctionCommand,
    creator: &Identity,
    db_manager: &DatabaseManager,
) -> Result<Auction, ApiError> {
    info!("{:<12} --> 경매 생성 요청 처리 시작: {:?}", "Command", cmd);

    let now = Utc::now();
    let draft = draft_from_command(cmd)?;
    // 순수 검증을 먼저 통과해야 저장 단계로 간다
    let auction = lifecycle::create_auction(draft, creator.id, now)?;

    let created = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Auction>(queries::INSERT_AUCTION)
                    .bind(&auction.title)
                    .bind(&auction.description)
                    .bind(auction.starting_price)
                    .bind(auction.end_time)
                    .bind(auction.created_by)
                    .bind(auction.created_at)
                    .fetch_one(&mut **tx)
                    .await
            })
        })
        .await?;

    info!("{:<12} --> 경매 생성 완료 id: {}", "Command", created.id);
    Ok(created)
}

/// 2. 입찰
pub async fn handle_place_bid(
    auction_id: i64,
    cmd: PlaceBidCommand,
    bidder: &Identity,
    db_manager: &DatabaseManager,
    ledger: &impl BidLedger,
) -> Result<(Bid, Auction), ApiError> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작: 경매 {}, 금액 {:?}",
        "Command", auction_id, cmd.amount
    );

    // 금액 검증이 존재 확인보다 먼저다 (누락도 동일하게 거절)
    let amount = required_amount(cmd.amount)?;

    let auction = query_handlers::get_auction(db_manager, auction_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let now = Utc::now();
    let auction = observe_expiry(db_manager, auction, now).await?;

    lifecycle::validate_bid(&auction, bidder.id, amount, now)?;

    // 검증과 커밋 사이에 다른 입찰이 끼어들 수 있다 — 조건부 UPDATE가 최종 심판이며
    // 밀린 입찰은 최신 가격과 함께 LOW_BID로 거절된다 (투명 재시도 없음)
    match ledger.commit_bid(auction_id, bidder.id, amount, now).await {
        Ok(bid) => {
            // 커밋된 입찰과 갱신된 경매를 하나의 논리 단위로 반환
            let updated = Auction {
                current_price: bid.amount,
                ..auction
            };
            Ok((bid, updated))
        }
        Err(CommitError::Outbid { current_price }) => {
            warn!(
                "{:<12} --> 동시 입찰 경합 패배: 경매 {}, 최신 가격 {}",
                "Command", auction_id, current_price
            );
            Err(ApiError::PriceTooLow { current_price })
        }
        Err(CommitError::AuctionClosed) => Err(ApiError::AuctionEnded),
        Err(CommitError::Db(e)) => Err(e.into()),
    }
}

/// 지연 만료 관찰: 읽기/쓰기 경로에서 만료를 투영하고, 전환이 관찰되면 영속화한다
/// 이후의 목록 조회가 일관되게 ended를 보도록 하기 위함
pub async fn observe_expiry(
    db_manager: &DatabaseManager,
    auction: Auction,
    now: DateTime<Utc>,
) -> Result<Auction, ApiError> {
    let before = auction.status;
    let projected = lifecycle::evaluate_expiry(auction, now);
    if projected.status != before {
        info!(
            "{:<12} --> 경매 만료 관찰, 전환 영속화 id: {}",
            "Command", projected.id
        );
        let auction_id = projected.id;
        db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query(queries::MARK_ENDED)
                        .bind(auction_id)
                        .bind(now)
                        .execute(&mut **tx)
                        .await
                })
            })
            .await
            .map_err(ApiError::from)?;
    }
    Ok(projected)
}

// endregion: --- Commands

// region:    --- Tests


// endregion: --- Tests
