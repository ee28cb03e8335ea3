/// 진행 중 경매 목록 — 저장된 status만 본다 (만료를 즉석 재계산하지 않음)
pub const LIST_ACTIVE_AUCTIONS: &str = r#"
    SELECT id, title, description, starting_price, current_price, end_time, status, created_by, created_at
    FROM auctions
    WHERE status = 'active'
    ORDER BY created_at DESC
"#;

/// 경매 단건 조회
pub const GET_AUCTION: &str = r#"
    SELECT id, title, description, starting_price, current_price, end_time, status, created_by, created_at
    FROM auctions
    WHERE id = $1
"#;

/// 경매 생성 — current_price는 starting_price로 초기화
pub const INSERT_AUCTION: &str = r#"
    INSERT INTO auctions (title, description, starting_price, current_price, end_time, status, created_by, created_at)
    VALUES ($1, $2, $3, $3, $4, 'active', $5, $6)
    RETURNING id, title, description, starting_price, current_price, end_time, status, created_by, created_at
"#;

/// 지연 만료 전환 영속화 — active이고 end_time이 지났을 때만 ended로
/// ended는 종결 상태이므로 역방향 전환은 없다
pub const MARK_ENDED: &str = r#"
    UPDATE auctions
    SET status = 'ended'
    WHERE id = $1 AND status = 'active' AND end_time <= $2
"#;
