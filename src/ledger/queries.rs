// region:    --- Users
/// 사용자 생성
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, date_joined)
    VALUES ($1, $2, $3)
    RETURNING id, username, email, date_joined
"#;

/// 사용자 조회
pub const GET_USER: &str = "SELECT id, username, email, date_joined FROM users WHERE id = $1";

/// 사용자 삭제 (상품, 입찰, 관심 목록은 CASCADE)
pub const DELETE_USER: &str = "DELETE FROM users WHERE id = $1";
// endregion: --- Users

// region:    --- Listings
/// 상품 생성
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (title, category, description, starting_price, image_url, active, created_at, owner_id)
    VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7)
    RETURNING id, title, category, description, starting_price, image_url, active, created_at, owner_id
"#;

/// 상품 조회
pub const GET_LISTING: &str = "SELECT id, title, category, description, starting_price, image_url, active, created_at, owner_id FROM listings WHERE id = $1";

/// 상품 조회 + 행 잠금 (입찰 직렬화)
pub const LOCK_LISTING: &str = "SELECT id, title, category, description, starting_price, image_url, active, created_at, owner_id FROM listings WHERE id = $1 FOR UPDATE";

/// 상품 목록 조회 ($1: 진행 중인 경매만, $2: 카테고리)
pub const GET_LISTINGS: &str = r#"
    SELECT id, title, category, description, starting_price, image_url, active, created_at, owner_id
    FROM listings
    WHERE ($1 = FALSE OR active = TRUE)
      AND ($2::TEXT IS NULL OR category = $2)
    ORDER BY id
"#;

/// 경매 종료
pub const CLOSE_LISTING: &str = r#"
    UPDATE listings SET active = FALSE
    WHERE id = $1
    RETURNING id, title, category, description, starting_price, image_url, active, created_at, owner_id
"#;

/// 상품 삭제 (입찰, 댓글, 관심 목록은 CASCADE)
pub const DELETE_LISTING: &str = "DELETE FROM listings WHERE id = $1";
// endregion: --- Listings

// region:    --- Bids
/// 상품 입찰 조회
pub const GET_LISTING_BIDS: &str = r#"
    SELECT id, listing_id, bidder_id, amount, placed_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY id
"#;

/// 입찰 추가
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (listing_id, bidder_id, amount, placed_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, listing_id, bidder_id, amount, placed_at
"#;
// endregion: --- Bids

// region:    --- Comments
/// 상품 댓글 조회
pub const GET_LISTING_COMMENTS: &str = r#"
    SELECT id, text, created_at, listing_id, author_id
    FROM comments
    WHERE listing_id = $1
    ORDER BY id
"#;

/// 댓글 추가
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (text, created_at, listing_id, author_id)
    VALUES ($1, $2, $3, $4)
    RETURNING id, text, created_at, listing_id, author_id
"#;
// endregion: --- Comments

// region:    --- Watchlist
/// 관심 목록 항목 조회
pub const GET_WATCH_ENTRY: &str =
    "SELECT id, user_id, listing_id, added FROM watchlist WHERE user_id = $1 AND listing_id = $2";

/// 관심 목록 항목 생성 (이미 있으면 무시)
pub const INSERT_WATCH_ENTRY: &str = r#"
    INSERT INTO watchlist (user_id, listing_id, added)
    VALUES ($1, $2, FALSE)
    ON CONFLICT (user_id, listing_id) DO NOTHING
"#;

/// 관심 목록 상태 변경
pub const UPDATE_WATCH_FLAG: &str = r#"
    UPDATE watchlist SET added = $2
    WHERE id = $1
    RETURNING id, user_id, listing_id, added
"#;

/// 관심 목록에 추가된 상품 조회
pub const GET_WATCHED_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.category, l.description, l.starting_price, l.image_url, l.active, l.created_at, l.owner_id
    FROM watchlist w
    JOIN listings l ON l.id = w.listing_id
    WHERE w.user_id = $1 AND w.added = TRUE
    ORDER BY w.id
"#;
// endregion: --- Watchlist
