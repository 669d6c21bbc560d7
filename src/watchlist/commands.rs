//! 관심 목록 커맨드 처리
// region:    --- Imports
use super::model::WatchlistEntry;
use crate::error::{AuctionError, AuctionResult};
use crate::ledger::Ledger;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// endregion: --- Imports

/// 관심 목록 변경 명령
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct SetFavoriteCommand {
    pub added: bool,
}

/// 관심 목록 항목 조회 또는 생성 (`added = false`)
pub async fn get_or_create(
    user_id: i64,
    listing_id: i64,
    ledger: &dyn Ledger,
) -> AuctionResult<WatchlistEntry> {
    ledger.get_or_create_watch_entry(user_id, listing_id).await
}

/// 관심 목록 추가/제거. 이미 같은 상태면 아무것도 하지 않는다.
pub async fn set_favorite(
    user_id: i64,
    listing_id: i64,
    cmd: SetFavoriteCommand,
    ledger: &dyn Ledger,
) -> AuctionResult<WatchlistEntry> {
    let entry = get_or_create(user_id, listing_id, ledger).await?;
    if entry.added == cmd.added {
        debug!("{:<12} --> 관심 목록 변경 없음: {:?}", "Command", entry);
        return Ok(entry);
    }

    info!(
        "{:<12} --> 관심 목록 변경: user={}, listing={}, added={}",
        "Command", user_id, listing_id, cmd.added
    );
    ledger.set_watch_flag(entry.id, cmd.added).await
}

/// 관심 목록 페이지에서 제거. 항목이 없으면 `NotFound`
pub async fn remove_from_watchlist(
    user_id: i64,
    listing_id: i64,
    ledger: &dyn Ledger,
) -> AuctionResult<WatchlistEntry> {
    ledger
        .find_watch_entry(user_id, listing_id)
        .await?
        .ok_or(AuctionError::NotFound("watchlist entry"))?;

    set_favorite(
        user_id,
        listing_id,
        SetFavoriteCommand { added: false },
        ledger,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::{Category, NewListing};
    use crate::ledger::MemoryLedger;
    use rust_decimal::Decimal;

    async fn setup() -> (MemoryLedger, i64, i64) {
        let ledger = MemoryLedger::new();
        let user = ledger.create_user("watcher", "").await.unwrap().id;
        let listing = ledger
            .create_listing(NewListing {
                owner_id: user,
                title: "Boots".to_string(),
                category: Category::Clothes,
                description: "Leather".to_string(),
                starting_price: Decimal::ONE,
                image_url: None,
            })
            .await
            .unwrap()
            .id;
        (ledger, user, listing)
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let (ledger, user, listing) = setup().await;
        let first = get_or_create(user, listing, &ledger).await.unwrap();
        let second = get_or_create(user, listing, &ledger).await.unwrap();
        assert_eq!(first, second);
        assert!(!first.added);
    }

    #[tokio::test]
    async fn favorite_round_trip_restores_original_state() {
        let (ledger, user, listing) = setup().await;
        let original = get_or_create(user, listing, &ledger).await.unwrap();

        let on = set_favorite(user, listing, SetFavoriteCommand { added: true }, &ledger)
            .await
            .unwrap();
        assert!(on.added);
        let on_again = set_favorite(user, listing, SetFavoriteCommand { added: true }, &ledger)
            .await
            .unwrap();
        assert_eq!(on, on_again);

        let off = set_favorite(user, listing, SetFavoriteCommand { added: false }, &ledger)
            .await
            .unwrap();
        assert_eq!(off, original);
    }

    #[tokio::test]
    async fn set_favorite_creates_missing_entry() {
        let (ledger, user, listing) = setup().await;
        let entry = set_favorite(user, listing, SetFavoriteCommand { added: true }, &ledger)
            .await
            .unwrap();
        assert!(entry.added);
        assert_eq!(ledger.watched_listings(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_listing_or_entry_is_not_found() {
        let (ledger, user, listing) = setup().await;

        assert!(matches!(
            get_or_create(user, 777, &ledger).await,
            Err(AuctionError::NotFound(_))
        ));
        assert!(matches!(
            remove_from_watchlist(user, listing, &ledger).await,
            Err(AuctionError::NotFound("watchlist entry"))
        ));
    }
}
