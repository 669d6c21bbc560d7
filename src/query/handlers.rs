// region:    --- Imports
use crate::auction::model::{Category, Comment, Listing};
use crate::bidding::model::Bid;
use crate::bidding::resolver::resolve_best_bid;
use crate::error::{AuctionError, AuctionResult};
use crate::ledger::{Ledger, ListingFilter};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

// endregion: --- Imports

// region:    --- Views
/// 목록 화면용 상품 + 현재 가격
#[derive(Debug, Clone, Serialize)]
pub struct ListingSummary {
    #[serde(flatten)]
    pub listing: Listing,
    pub current_price: Decimal,
}

/// 상품 상세 화면
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetail {
    #[serde(flatten)]
    pub listing: Listing,
    pub current_price: Decimal,
    pub current_winner: Option<i64>,
    pub bids: Vec<Bid>,
    pub comments: Vec<Comment>,
    pub favorited: bool,
}
// endregion: --- Views

// region:    --- Query Handlers

/// 상품별 현재 가격 계산
async fn summarize(ledger: &dyn Ledger, listings: Vec<Listing>) -> AuctionResult<Vec<ListingSummary>> {
    let mut summaries = Vec::with_capacity(listings.len());
    for listing in listings {
        let bids = ledger.listing_bids(listing.id).await?;
        let standing = resolve_best_bid(&listing, &bids);
        summaries.push(ListingSummary {
            listing,
            current_price: standing.current_price,
        });
    }
    Ok(summaries)
}

/// 진행 중인 경매 조회
pub async fn get_active_listings(ledger: &dyn Ledger) -> AuctionResult<Vec<ListingSummary>> {
    info!("{:<12} --> 진행 중인 경매 조회", "Query");
    let listings = ledger.list_listings(ListingFilter::active()).await?;
    summarize(ledger, listings).await
}

/// 카테고리 목록 (`None` 제외)
pub fn get_categories() -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|category| *category != Category::None)
        .collect()
}

/// 카테고리별 진행 중인 경매 조회
pub async fn get_category_listings(
    ledger: &dyn Ledger,
    name: &str,
) -> AuctionResult<Vec<ListingSummary>> {
    info!("{:<12} --> 카테고리별 경매 조회: {}", "Query", name);
    let category = name
        .parse::<Category>()
        .ok()
        .filter(|category| *category != Category::None)
        .ok_or(AuctionError::NotFound("category"))?;

    let listings = ledger.list_listings(ListingFilter::active_in(category)).await?;
    summarize(ledger, listings).await
}

/// 상품 상세 조회 (읽기 전용)
pub async fn get_listing_detail(
    ledger: &dyn Ledger,
    listing_id: i64,
    user_id: i64,
) -> AuctionResult<ListingDetail> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "Query", listing_id);
    let listing = ledger
        .find_listing(listing_id)
        .await?
        .ok_or(AuctionError::NotFound("listing"))?;
    let bids = ledger.listing_bids(listing_id).await?;
    let comments = ledger.listing_comments(listing_id).await?;
    let favorited = ledger
        .find_watch_entry(user_id, listing_id)
        .await?
        .map_or(false, |entry| entry.added);

    let standing = resolve_best_bid(&listing, &bids);
    Ok(ListingDetail {
        listing,
        current_price: standing.current_price,
        current_winner: standing.current_winner,
        bids,
        comments,
        favorited,
    })
}

/// 사용자 관심 목록 조회 (종료된 경매 포함)
pub async fn get_watchlist(
    ledger: &dyn Ledger,
    user_id: i64,
) -> AuctionResult<Vec<ListingSummary>> {
    info!("{:<12} --> 관심 목록 조회 user: {}", "Query", user_id);
    let listings = ledger.watched_listings(user_id).await?;
    summarize(ledger, listings).await
}

// endregion: --- Query Handlers

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::NewListing;
    use crate::ledger::MemoryLedger;
    use rust_decimal_macros::dec;

    async fn listing(ledger: &MemoryLedger, owner: i64, category: Category, price: Decimal) -> Listing {
        ledger
            .create_listing(NewListing {
                owner_id: owner,
                title: format!("{} item", category),
                category,
                description: "-".to_string(),
                starting_price: price,
                image_url: None,
            })
            .await
            .unwrap()
    }

    #[test]
    fn categories_skip_none() {
        assert_eq!(
            get_categories(),
            vec![
                Category::Clothes,
                Category::Weapons,
                Category::Objects,
                Category::Extras
            ]
        );
    }

    #[tokio::test]
    async fn summaries_carry_current_price() {
        let ledger = MemoryLedger::new();
        let owner = ledger.create_user("owner", "").await.unwrap().id;
        let bidder = ledger.create_user("bidder", "").await.unwrap().id;
        let hat = listing(&ledger, owner, Category::Clothes, dec!(3.00)).await;
        let axe = listing(&ledger, owner, Category::Weapons, dec!(8.00)).await;
        ledger.place_bid(axe.id, bidder, dec!(9.50)).await.unwrap();

        let active = get_active_listings(&ledger).await.unwrap();
        let prices: Vec<_> = active.iter().map(|s| (s.listing.id, s.current_price)).collect();
        assert_eq!(prices, vec![(hat.id, dec!(3.00)), (axe.id, dec!(9.50))]);

        let weapons = get_category_listings(&ledger, "Weapons").await.unwrap();
        assert_eq!(weapons.len(), 1);
        assert_eq!(weapons[0].listing.id, axe.id);

        assert!(matches!(
            get_category_listings(&ledger, "Food").await,
            Err(AuctionError::NotFound("category"))
        ));
    }

    #[tokio::test]
    async fn detail_does_not_create_watch_entries() {
        let ledger = MemoryLedger::new();
        let owner = ledger.create_user("owner", "").await.unwrap().id;
        let viewer = ledger.create_user("viewer", "").await.unwrap().id;
        let item = listing(&ledger, owner, Category::Extras, dec!(1.00)).await;

        let detail = get_listing_detail(&ledger, item.id, viewer).await.unwrap();
        assert!(!detail.favorited);
        assert_eq!(detail.current_winner, None);
        assert!(ledger
            .find_watch_entry(viewer, item.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn watchlist_keeps_closed_listings() {
        let ledger = MemoryLedger::new();
        let owner = ledger.create_user("owner", "").await.unwrap().id;
        let item = listing(&ledger, owner, Category::Objects, dec!(2.00)).await;
        let entry = ledger.get_or_create_watch_entry(owner, item.id).await.unwrap();
        ledger.set_watch_flag(entry.id, true).await.unwrap();
        ledger.close_listing(item.id).await.unwrap();

        let watched = get_watchlist(&ledger, owner).await.unwrap();
        assert_eq!(watched.len(), 1);
        assert!(!watched[0].listing.active);
        assert!(get_active_listings(&ledger).await.unwrap().is_empty());
    }
}
