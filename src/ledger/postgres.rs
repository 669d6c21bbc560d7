// region:    --- Imports
use super::{queries, Ledger, ListingFilter};
use crate::auction::model::{Comment, Listing, NewListing, User};
use crate::bidding::model::Bid;
use crate::bidding::resolver::evaluate_bid;
use crate::database::DatabaseManager;
use crate::error::{AuctionError, AuctionResult};
use crate::watchlist::model::WatchlistEntry;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Postgres Ledger
/// PostgreSQL 원장 구현체
pub struct PostgresLedger {
    db_manager: Arc<DatabaseManager>,
}

/// PostgreSQL 원장 생성
impl PostgresLedger {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

/// 외래 키 위반을 `NotFound`로 변환 (제약 조건 이름으로 대상 구분)
fn not_found_on_foreign_key(e: sqlx::Error) -> AuctionError {
    match e {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            match db_err.constraint() {
                Some(
                    "listings_owner_id_fkey" | "bids_bidder_id_fkey" | "watchlist_user_id_fkey",
                ) => AuctionError::NotFound("user"),
                _ => AuctionError::NotFound("listing"),
            }
        }
        e => AuctionError::Database(e),
    }
}

/// PostgreSQL 원장 메서드 구현
#[async_trait]
impl Ledger for PostgresLedger {
    async fn create_user(&self, username: &str, email: &str) -> AuctionResult<User> {
        info!("{:<12} --> 사용자 생성: {}", "Ledger", username);
        let result = sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(username)
            .bind(email)
            .bind(Utc::now())
            .fetch_one(self.db_manager.pool())
            .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuctionError::DuplicateUser(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(&self, user_id: i64) -> AuctionResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(user_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, user_id: i64) -> AuctionResult<bool> {
        info!("{:<12} --> 사용자 삭제 id: {}", "Ledger", user_id);
        let result = sqlx::query(queries::DELETE_USER)
            .bind(user_id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_listing(&self, listing: NewListing) -> AuctionResult<Listing> {
        let listing = sqlx::query_as::<_, Listing>(queries::INSERT_LISTING)
            .bind(&listing.title)
            .bind(listing.category.as_str())
            .bind(&listing.description)
            .bind(listing.starting_price)
            .bind(&listing.image_url)
            .bind(Utc::now())
            .bind(listing.owner_id)
            .fetch_one(self.db_manager.pool())
            .await
            .map_err(not_found_on_foreign_key)?;
        info!("{:<12} --> 상품 생성 id: {}", "Ledger", listing.id);
        Ok(listing)
    }

    async fn find_listing(&self, listing_id: i64) -> AuctionResult<Option<Listing>> {
        let listing = sqlx::query_as::<_, Listing>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(listing)
    }

    async fn list_listings(&self, filter: ListingFilter) -> AuctionResult<Vec<Listing>> {
        let listings = sqlx::query_as::<_, Listing>(queries::GET_LISTINGS)
            .bind(filter.active_only)
            .bind(filter.category.map(|category| category.as_str()))
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(listings)
    }

    async fn close_listing(&self, listing_id: i64) -> AuctionResult<Option<Listing>> {
        let listing = sqlx::query_as::<_, Listing>(queries::CLOSE_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(listing)
    }

    async fn delete_listing(&self, listing_id: i64) -> AuctionResult<bool> {
        let result = sqlx::query(queries::DELETE_LISTING)
            .bind(listing_id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn listing_bids(&self, listing_id: i64) -> AuctionResult<Vec<Bid>> {
        let bids = sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(bids)
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Decimal,
    ) -> AuctionResult<Bid> {
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    // 같은 상품에 대한 동시 입찰은 여기서 직렬화된다
                    let listing = sqlx::query_as::<_, Listing>(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(AuctionError::NotFound("listing"))?;

                    let bids = sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
                        .bind(listing_id)
                        .fetch_all(&mut **tx)
                        .await?;

                    let standing = evaluate_bid(&listing, &bids, amount)?;
                    debug!(
                        "{:<12} --> 입찰 검증 통과: 현재 가격 {}, 입찰가 {}",
                        "Ledger", standing.current_price, amount
                    );

                    let bid = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(listing_id)
                        .bind(bidder_id)
                        .bind(amount)
                        .bind(Utc::now())
                        .fetch_one(&mut **tx)
                        .await
                        .map_err(not_found_on_foreign_key)?;

                    Ok::<_, AuctionError>(bid)
                })
            })
            .await
    }

    async fn listing_comments(&self, listing_id: i64) -> AuctionResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(queries::GET_LISTING_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(comments)
    }

    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        text: &str,
    ) -> AuctionResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
            .bind(text)
            .bind(Utc::now())
            .bind(listing_id)
            .bind(author_id)
            .fetch_one(self.db_manager.pool())
            .await
            .map_err(not_found_on_foreign_key)?;
        Ok(comment)
    }

    async fn find_watch_entry(
        &self,
        user_id: i64,
        listing_id: i64,
    ) -> AuctionResult<Option<WatchlistEntry>> {
        let entry = sqlx::query_as::<_, WatchlistEntry>(queries::GET_WATCH_ENTRY)
            .bind(user_id)
            .bind(listing_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(entry)
    }

    async fn get_or_create_watch_entry(
        &self,
        user_id: i64,
        listing_id: i64,
    ) -> AuctionResult<WatchlistEntry> {
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query(queries::INSERT_WATCH_ENTRY)
                        .bind(user_id)
                        .bind(listing_id)
                        .execute(&mut **tx)
                        .await
                        .map_err(not_found_on_foreign_key)?;

                    let entry = sqlx::query_as::<_, WatchlistEntry>(queries::GET_WATCH_ENTRY)
                        .bind(user_id)
                        .bind(listing_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok::<_, AuctionError>(entry)
                })
            })
            .await
    }

    async fn set_watch_flag(&self, entry_id: i64, added: bool) -> AuctionResult<WatchlistEntry> {
        sqlx::query_as::<_, WatchlistEntry>(queries::UPDATE_WATCH_FLAG)
            .bind(entry_id)
            .bind(added)
            .fetch_optional(self.db_manager.pool())
            .await?
            .ok_or(AuctionError::NotFound("watchlist entry"))
    }

    async fn watched_listings(&self, user_id: i64) -> AuctionResult<Vec<Listing>> {
        let listings = sqlx::query_as::<_, Listing>(queries::GET_WATCHED_LISTINGS)
            .bind(user_id)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(listings)
    }
}
// endregion: --- Postgres Ledger
