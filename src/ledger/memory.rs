// region:    --- Imports
use super::{Ledger, ListingFilter};
use crate::auction::model::{Comment, Listing, NewListing, User};
use crate::bidding::model::Bid;
use crate::bidding::resolver::evaluate_bid;
use crate::error::{AuctionError, AuctionResult};
use crate::watchlist::model::WatchlistEntry;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::info;

// endregion: --- Imports

// region:    --- Memory Ledger
#[derive(Default)]
struct MemoryState {
    last_id: i64,
    users: BTreeMap<i64, User>,
    listings: BTreeMap<i64, Listing>,
    bids: Vec<Bid>,
    comments: Vec<Comment>,
    watchlist: Vec<WatchlistEntry>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    /// 상품과 딸린 입찰, 댓글, 관심 목록 삭제
    fn remove_listing(&mut self, listing_id: i64) -> bool {
        let removed = self.listings.remove(&listing_id).is_some();
        self.bids.retain(|bid| bid.listing_id != listing_id);
        self.comments.retain(|comment| comment.listing_id != listing_id);
        self.watchlist.retain(|entry| entry.listing_id != listing_id);
        removed
    }

    fn bids_of(&self, listing_id: i64) -> Vec<Bid> {
        self.bids
            .iter()
            .filter(|bid| bid.listing_id == listing_id)
            .cloned()
            .collect()
    }
}

/// 메모리 원장 구현체
///
/// 하나의 뮤텍스가 전체 상태를 보호하므로 모든 연산이 원자적이다.
#[derive(Default)]
pub struct MemoryLedger {
    state: Mutex<MemoryState>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn create_user(&self, username: &str, email: &str) -> AuctionResult<User> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|user| user.username == username) {
            return Err(AuctionError::DuplicateUser(username.to_string()));
        }

        let user = User {
            id: state.next_id(),
            username: username.to_string(),
            email: email.to_string(),
            date_joined: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        info!("{:<12} --> 사용자 생성: {}", "Ledger", username);
        Ok(user)
    }

    async fn find_user(&self, user_id: i64) -> AuctionResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn delete_user(&self, user_id: i64) -> AuctionResult<bool> {
        let mut state = self.state.lock().await;
        if state.users.remove(&user_id).is_none() {
            return Ok(false);
        }

        let owned: Vec<i64> = state
            .listings
            .values()
            .filter(|listing| listing.owner_id == user_id)
            .map(|listing| listing.id)
            .collect();
        for listing_id in owned {
            state.remove_listing(listing_id);
        }
        state.bids.retain(|bid| bid.bidder_id != user_id);
        state.watchlist.retain(|entry| entry.user_id != user_id);
        // 다른 상품에 남긴 댓글은 author_id가 그대로 남는다

        info!("{:<12} --> 사용자 삭제 id: {}", "Ledger", user_id);
        Ok(true)
    }

    async fn create_listing(&self, listing: NewListing) -> AuctionResult<Listing> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&listing.owner_id) {
            return Err(AuctionError::NotFound("user"));
        }

        let listing = Listing {
            id: state.next_id(),
            title: listing.title,
            category: listing.category,
            description: listing.description,
            starting_price: listing.starting_price,
            image_url: listing.image_url,
            active: true,
            created_at: Utc::now(),
            owner_id: listing.owner_id,
        };
        state.listings.insert(listing.id, listing.clone());
        info!("{:<12} --> 상품 생성 id: {}", "Ledger", listing.id);
        Ok(listing)
    }

    async fn find_listing(&self, listing_id: i64) -> AuctionResult<Option<Listing>> {
        Ok(self.state.lock().await.listings.get(&listing_id).cloned())
    }

    async fn list_listings(&self, filter: ListingFilter) -> AuctionResult<Vec<Listing>> {
        let state = self.state.lock().await;
        Ok(state
            .listings
            .values()
            .filter(|listing| filter.matches(listing))
            .cloned()
            .collect())
    }

    async fn close_listing(&self, listing_id: i64) -> AuctionResult<Option<Listing>> {
        let mut state = self.state.lock().await;
        Ok(state.listings.get_mut(&listing_id).map(|listing| {
            listing.active = false;
            listing.clone()
        }))
    }

    async fn delete_listing(&self, listing_id: i64) -> AuctionResult<bool> {
        Ok(self.state.lock().await.remove_listing(listing_id))
    }

    async fn listing_bids(&self, listing_id: i64) -> AuctionResult<Vec<Bid>> {
        Ok(self.state.lock().await.bids_of(listing_id))
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: Decimal,
    ) -> AuctionResult<Bid> {
        let mut state = self.state.lock().await;
        let listing = state
            .listings
            .get(&listing_id)
            .ok_or(AuctionError::NotFound("listing"))?;
        evaluate_bid(listing, &state.bids_of(listing_id), amount)?;
        if !state.users.contains_key(&bidder_id) {
            return Err(AuctionError::NotFound("user"));
        }

        let bid = Bid {
            id: state.next_id(),
            listing_id,
            bidder_id,
            amount,
            placed_at: Utc::now(),
        };
        state.bids.push(bid.clone());
        Ok(bid)
    }

    async fn listing_comments(&self, listing_id: i64) -> AuctionResult<Vec<Comment>> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .iter()
            .filter(|comment| comment.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn add_comment(
        &self,
        listing_id: i64,
        author_id: i64,
        text: &str,
    ) -> AuctionResult<Comment> {
        let mut state = self.state.lock().await;
        if !state.listings.contains_key(&listing_id) {
            return Err(AuctionError::NotFound("listing"));
        }

        let comment = Comment {
            id: state.next_id(),
            text: text.to_string(),
            created_at: Utc::now(),
            listing_id,
            author_id,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_watch_entry(
        &self,
        user_id: i64,
        listing_id: i64,
    ) -> AuctionResult<Option<WatchlistEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .watchlist
            .iter()
            .find(|entry| entry.user_id == user_id && entry.listing_id == listing_id)
            .cloned())
    }

    async fn get_or_create_watch_entry(
        &self,
        user_id: i64,
        listing_id: i64,
    ) -> AuctionResult<WatchlistEntry> {
        let mut state = self.state.lock().await;
        if let Some(entry) = state
            .watchlist
            .iter()
            .find(|entry| entry.user_id == user_id && entry.listing_id == listing_id)
        {
            return Ok(entry.clone());
        }
        if !state.users.contains_key(&user_id) {
            return Err(AuctionError::NotFound("user"));
        }
        if !state.listings.contains_key(&listing_id) {
            return Err(AuctionError::NotFound("listing"));
        }

        let entry = WatchlistEntry {
            id: state.next_id(),
            user_id,
            listing_id,
            added: false,
        };
        state.watchlist.push(entry.clone());
        Ok(entry)
    }

    async fn set_watch_flag(&self, entry_id: i64, added: bool) -> AuctionResult<WatchlistEntry> {
        let mut state = self.state.lock().await;
        let entry = state
            .watchlist
            .iter_mut()
            .find(|entry| entry.id == entry_id)
            .ok_or(AuctionError::NotFound("watchlist entry"))?;
        entry.added = added;
        Ok(entry.clone())
    }

    async fn watched_listings(&self, user_id: i64) -> AuctionResult<Vec<Listing>> {
        let state = self.state.lock().await;
        Ok(state
            .watchlist
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.added)
            .filter_map(|entry| state.listings.get(&entry.listing_id).cloned())
            .collect())
    }
}
// endregion: --- Memory Ledger
