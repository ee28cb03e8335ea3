/// 경매 수명주기 핵심 로직 (순수 함수)
/// 1. 경매 생성 검증
/// 2. 지연 만료 판정
/// 3. 입찰 허용 검증
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus};
use crate::error::ApiError;
use chrono::{DateTime, Utc};

// endregion: --- Imports

// region:    --- Create

/// 경매 생성 입력
#[derive(Debug, Clone, PartialEq)]
pub struct AuctionDraft {
    pub title: String,
    pub description: String,
    pub starting_price: i64,
    pub end_time: DateTime<Utc>,
}

/// 경매 생성: 검증을 통과하면 current_price = starting_price, status = active
/// id와 created_at은 저장 시점에 확정되므로 여기서는 자리값(0, now)으로 채운다
pub fn create_auction(
    draft: AuctionDraft,
    creator_id: i64,
    now: DateTime<Utc>,
) -> Result<Auction, ApiError> {
    if draft.title.trim().is_empty() || draft.description.trim().is_empty() {
        return Err(ApiError::Validation("Please fill all the fields".into()));
    }
    if draft.end_time <= now {
        return Err(ApiError::Validation("End time must be in the future".into()));
    }
    if draft.starting_price <= 0 {
        return Err(ApiError::Validation(
            "Starting price must be greater than 0".into(),
        ));
    }
    Ok(Auction {
        id: 0,
        title: draft.title,
        description: draft.description,
        starting_price: draft.starting_price,
        current_price: draft.starting_price,
        end_time: draft.end_time,
        status: AuctionStatus::Active,
        created_by: creator_id,
        created_at: now,
    })
}

// endregion: --- Create

// region:    --- Expiry

/// 지연 만료 판정: active 경매의 end_time이 지났으면 ended로 전환한 사본을 반환
/// 이미 ended인 경매는 그대로 통과 (멱등)
pub fn evaluate_expiry(auction: Auction, now: DateTime<Utc>) -> Auction {
    if auction.status == AuctionStatus::Active && auction.end_time <= now {
        Auction {
            status: AuctionStatus::Ended,
            ..auction
        }
    } else {
        auction
    }
}

// endregion: --- Expiry

// region:    --- Bid Validation

/// 입찰 검증 — 순서가 곧 계약이다 (첫 실패가 곧 거절 사유)
/// 1. 금액 > 0
/// 2. (경매 존재 여부는 호출자가 확인)
/// 3. 만료/종료 여부
/// 4. 본인 경매 입찰 금지
/// 5. 금액 > 현재 가격
pub fn validate_bid(
    auction: &Auction,
    bidder_id: i64,
    amount: i64,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    if amount <= 0 {
        return Err(ApiError::AmountInvalid);
    }
    if auction.status == AuctionStatus::Ended || auction.end_time <= now {
        return Err(ApiError::AuctionEnded);
    }
    if bidder_id == auction.created_by {
        return Err(ApiError::SelfBidForbidden);
    }
    if amount <= auction.current_price {
        return Err(ApiError::PriceTooLow {
            current_price: auction.current_price,
        });
    }
    Ok(())
}

// endregion: --- Bid Validation

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(starting_price: i64, end_in: Duration, now: DateTime<Utc>) -> AuctionDraft {
        AuctionDraft {
            title: "Vintage camera".to_string(),
            description: "Working Leica M3 with original case".to_string(),
            starting_price,
            end_time: now + end_in,
        }
    }

    #[test]
    fn create_initializes_price_and_status() {
        let now = Utc::now();
        let auction = create_auction(draft(1000, Duration::hours(1), now), 7, now).unwrap();
        assert_eq!(auction.current_price, auction.starting_price);
        assert_eq!(auction.status, AuctionStatus::Active);
        assert_eq!(auction.created_by, 7);
    }

    #[test]
    fn create_rejects_empty_fields() {
        let now = Utc::now();
        let mut d = draft(1000, Duration::hours(1), now);
        d.title = "   ".to_string();
        assert!(matches!(
            create_auction(d, 7, now),
            Err(ApiError::Validation(_))
        ));

        let mut d = draft(1000, Duration::hours(1), now);
        d.description = String::new();
        assert!(matches!(
            create_auction(d, 7, now),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn create_rejects_past_or_present_end_time() {
        let now = Utc::now();
        for end_in in [Duration::hours(-1), Duration::zero(), Duration::seconds(-1)] {
            let result = create_auction(draft(1000, end_in, now), 7, now);
            assert!(matches!(result, Err(ApiError::Validation(_))));
        }
    }

    #[test]
    fn create_rejects_non_positive_starting_price() {
        let now = Utc::now();
        for price in [0, -1, -1000] {
            let result = create_auction(draft(price, Duration::hours(1), now), 7, now);
            assert!(matches!(result, Err(ApiError::Validation(_))));
        }
    }

    #[test]
    fn expiry_flips_active_auction_once_end_time_passes() {
        let now = Utc::now();
        let auction = create_auction(draft(1000, Duration::hours(1), now), 7, now).unwrap();

        let still_active = evaluate_expiry(auction.clone(), now + Duration::minutes(59));
        assert_eq!(still_active.status, AuctionStatus::Active);

        let ended = evaluate_expiry(auction, now + Duration::hours(1));
        assert_eq!(ended.status, AuctionStatus::Ended);
    }

    #[test]
    fn expiry_is_idempotent_on_ended_auction() {
        let now = Utc::now();
        let auction = create_auction(draft(1000, Duration::hours(1), now), 7, now).unwrap();
        let later = now + Duration::hours(2);

        let once = evaluate_expiry(auction, later);
        let twice = evaluate_expiry(once.clone(), later);
        assert_eq!(once.status, AuctionStatus::Ended);
        assert_eq!(twice.status, once.status);
        assert_eq!(twice.current_price, once.current_price);
        assert_eq!(twice.end_time, once.end_time);
    }

    #[test]
    fn strictly_increasing_bid_sequence_advances_price() {
        let now = Utc::now();
        let mut auction = create_auction(draft(1000, Duration::hours(1), now), 7, now).unwrap();

        let amounts = [1500, 1501, 3000, 9999];
        for amount in amounts {
            validate_bid(&auction, 42, amount, now).unwrap();
            auction.current_price = amount;
        }
        assert_eq!(auction.current_price, *amounts.last().unwrap());
        assert!(auction.current_price >= auction.starting_price);
    }

    #[test]
    fn bid_at_or_below_current_price_is_rejected() {
        let now = Utc::now();
        let auction = create_auction(draft(1000, Duration::hours(1), now), 7, now).unwrap();

        for amount in [1000, 999, 1] {
            let result = validate_bid(&auction, 42, amount, now);
            assert_eq!(
                result,
                Err(ApiError::PriceTooLow {
                    current_price: 1000
                })
            );
        }
    }

    #[test]
    fn creator_cannot_bid_on_own_auction() {
        let now = Utc::now();
        let auction = create_auction(draft(1000, Duration::hours(1), now), 7, now).unwrap();

        // 금액이 충분해도 본인 입찰은 항상 거절
        let result = validate_bid(&auction, 7, 1_000_000, now);
        assert_eq!(result, Err(ApiError::SelfBidForbidden));
    }

    #[test]
    fn no_bid_succeeds_after_expiry() {
        let now = Utc::now();
        let auction = create_auction(draft(1000, Duration::hours(1), now), 7, now).unwrap();
        let after_end = now + Duration::hours(1);

        // 만료 전환 이전이라도 end_time이 지났으면 거절
        let result = validate_bid(&auction, 42, 5000, after_end);
        assert_eq!(result, Err(ApiError::AuctionEnded));

        // 전환 이후에도 동일
        let ended = evaluate_expiry(auction, after_end);
        let result = validate_bid(&ended, 42, 5000, after_end);
        assert_eq!(result, Err(ApiError::AuctionEnded));
    }

    #[test]
    fn non_positive_amount_is_rejected_before_anything_else() {
        let now = Utc::now();
        let auction = create_auction(draft(1000, Duration::hours(1), now), 7, now).unwrap();
        let ended = evaluate_expiry(auction, now + Duration::hours(2));

        // 종료된 경매 + 본인 입찰이어도 금액 검증이 먼저
        let result = validate_bid(&ended, 7, 0, now + Duration::hours(2));
        assert_eq!(result, Err(ApiError::AmountInvalid));
    }

    /// 전체 입찰 시나리오: 시작가 10, B가 15 입찰 성공, C가 12 입찰 실패(LOW_BID),
    /// 생성자가 20 입찰 실패(SELF_BID), 종료 후 B의 20 입찰 실패(ALREADY_ENDED)
    #[test]
    fn full_bidding_scenario() {
        let creator = 1;
        let user_b = 2;
        let user_c = 3;
        let now = Utc::now();

        let mut auction = create_auction(draft(10, Duration::hours(1), now), creator, now).unwrap();

        validate_bid(&auction, user_b, 15, now).unwrap();
        auction.current_price = 15;

        assert_eq!(
            validate_bid(&auction, user_c, 12, now),
            Err(ApiError::PriceTooLow { current_price: 15 })
        );
        assert_eq!(
            validate_bid(&auction, creator, 20, now),
            Err(ApiError::SelfBidForbidden)
        );

        auction.end_time = now - Duration::seconds(1);
        let auction = evaluate_expiry(auction, now);
        assert_eq!(auction.status, AuctionStatus::Ended);
        assert_eq!(
            validate_bid(&auction, user_b, 20, now),
            Err(ApiError::AuctionEnded)
        );
    }
}

// endregion: --- Tests
