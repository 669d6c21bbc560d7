// region:    --- Imports
use crate::auction::model::{Category, Comment, Listing, NewListing, User};
use crate::bidding::model::Bid;
use crate::error::AuctionResult;
use crate::watchlist::model::WatchlistEntry;
use async_trait::async_trait;
use rust_decimal::Decimal;

// endregion: --- Imports

// region:    --- Modules
mod memory;
mod postgres;
pub mod queries;

pub use memory::MemoryLedger;
pub use postgres::PostgresLedger;

// endregion: --- Modules

// region:    --- Ledger Trait
/// 상품 목록 조회 조건
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingFilter {
    pub active_only: bool,
    pub category: Option<Category>,
}

impl ListingFilter {
    pub fn active() -> Self {
        Self {
            active_only: true,
            category: None,
        }
    }

    pub fn active_in(category: Category) -> Self {
        Self {
            active_only: true,
            category: Some(category),
        }
    }

    fn matches(&self, listing: &Listing) -> bool {
        (!self.active_only || listing.active)
            && self.category.map_or(true, |category| listing.category == category)
    }
}

/// 경매 원장 트레이트
///
/// 사용자, 상품, 입찰, 댓글, 관심 목록을 저장한다.
/// `place_bid`는 같은 상품에 대한 다른 `place_bid`와 원자적으로 실행되어야 한다.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// 사용자 생성. 중복된 이름이면 `DuplicateUser`
    async fn create_user(&self, username: &str, email: &str) -> AuctionResult<User>;

    async fn find_user(&self, user_id: i64) -> AuctionResult<Option<User>>;

    /// 사용자 삭제. 삭제된 행이 없으면 `false`
    async fn delete_user(&self, user_id: i64) -> AuctionResult<bool>;

    async fn create_listing(&self, listing: NewListing) -> AuctionResult<Listing>;

    async fn find_listing(&self, listing_id: i64) -> AuctionResult<Option<Listing>>;

    async fn list_listings(&self, filter: ListingFilter) -> AuctionResult<Vec<Listing>>;

    /// 경매 종료. 상품이 없으면 `None`
    async fn close_listing(&self, listing_id: i64) -> AuctionResult<Option<Listing>>;

    async fn delete_listing(&self, listing_id: i64) -> AuctionResult<bool>;

    /// 상품 입찰 조회 (id 오름차순)
    async fn listing_bids(&self, listing_id: i64) -> AuctionResult<Vec<Bid>>;

    /// 잠금 -> 입찰 조회 -> `evaluate_bid` -> 저장
    async fn place_bid(&self, listing_id: i64, bidder_id: i64, amount: Decimal)
        -> AuctionResult<Bid>;

    /// 상품 댓글 조회 (id 오름차순)
    async fn listing_comments(&self, listing_id: i64) -> AuctionResult<Vec<Comment>>;

    async fn add_comment(&self, listing_id: i64, author_id: i64, text: &str)
        -> AuctionResult<Comment>;

    async fn find_watch_entry(
        &self,
        user_id: i64,
        listing_id: i64,
    ) -> AuctionResult<Option<WatchlistEntry>>;

    /// 관심 목록 항목 조회, 없으면 `added = false`로 생성
    async fn get_or_create_watch_entry(
        &self,
        user_id: i64,
        listing_id: i64,
    ) -> AuctionResult<WatchlistEntry>;

    async fn set_watch_flag(&self, entry_id: i64, added: bool) -> AuctionResult<WatchlistEntry>;

    /// `added = true`인 상품 조회 (종료된 경매 포함)
    async fn watched_listings(&self, user_id: i64) -> AuctionResult<Vec<Listing>>;
}
// endregion: --- Ledger Trait
