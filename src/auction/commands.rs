//! 상품, 댓글, 사용자 관련 커맨드 처리
//! 1. 사용자 등록 / 삭제
//! 2. 상품 등록 / 삭제
//! 3. 댓글 작성
// region:    --- Imports
use super::model::{Category, Comment, Listing, NewListing, User};
use super::validation;
use crate::error::{AuctionError, AuctionResult};
use crate::ledger::Ledger;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 사용자 등록 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegisterUserCommand {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// 상품 등록 명령 (필수 항목 누락은 검증 단계에서 처리)
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CreateListingCommand {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub starting_price: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// 댓글 작성 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddCommentCommand {
    #[serde(default)]
    pub text: Option<String>,
}

// region:    --- Users
/// 1-1. 사용자 등록
pub async fn handle_register_user(
    cmd: RegisterUserCommand,
    ledger: &dyn Ledger,
) -> AuctionResult<User> {
    info!("{:<12} --> 사용자 등록 요청: {:?}", "Command", cmd.username);
    let username = validation::required_text(
        "username",
        cmd.username,
        Some(validation::USERNAME_MAX_CHARS),
    )?;
    let email = cmd.email.map(|e| e.trim().to_string()).unwrap_or_default();

    ledger.create_user(&username, &email).await
}

/// 1-2. 사용자 삭제
pub async fn handle_delete_user(user_id: i64, ledger: &dyn Ledger) -> AuctionResult<()> {
    info!("{:<12} --> 사용자 삭제 요청 id: {}", "Command", user_id);
    if ledger.delete_user(user_id).await? {
        Ok(())
    } else {
        Err(AuctionError::NotFound("user"))
    }
}
// endregion: --- Users

// region:    --- Listings
/// 2-1. 상품 등록 (항상 진행 중 상태로 시작)
pub async fn handle_create_listing(
    owner_id: i64,
    cmd: CreateListingCommand,
    ledger: &dyn Ledger,
) -> AuctionResult<Listing> {
    info!("{:<12} --> 상품 등록 요청: {:?}", "Command", cmd.title);
    let new_listing = NewListing {
        owner_id,
        title: validation::required_text("title", cmd.title, Some(validation::TITLE_MAX_CHARS))?,
        category: cmd.category.unwrap_or_default(),
        description: validation::required_text("description", cmd.description, None)?,
        starting_price: validation::starting_price(cmd.starting_price)?,
        image_url: validation::image_url(cmd.image_url)?,
    };

    ledger.create_listing(new_listing).await
}

/// 2-2. 상품 삭제 (판매자만 가능)
pub async fn handle_delete_listing(
    listing_id: i64,
    actor_id: i64,
    ledger: &dyn Ledger,
) -> AuctionResult<()> {
    info!("{:<12} --> 상품 삭제 요청 id: {}", "Command", listing_id);
    let listing = ledger
        .find_listing(listing_id)
        .await?
        .ok_or(AuctionError::NotFound("listing"))?;

    if listing.owner_id != actor_id {
        warn!(
            "{:<12} --> 판매자가 아닌 사용자의 삭제 시도: listing={}, actor={}",
            "Command", listing_id, actor_id
        );
        return Err(AuctionError::Forbidden(
            "Only the owner can delete this listing.".to_string(),
        ));
    }

    if ledger.delete_listing(listing_id).await? {
        Ok(())
    } else {
        Err(AuctionError::NotFound("listing"))
    }
}
// endregion: --- Listings

// region:    --- Comments
/// 3. 댓글 작성 (종료된 경매에도 가능)
pub async fn handle_add_comment(
    listing_id: i64,
    author_id: i64,
    cmd: AddCommentCommand,
    ledger: &dyn Ledger,
) -> AuctionResult<Comment> {
    info!("{:<12} --> 댓글 작성 요청 listing: {}", "Command", listing_id);
    let text = cmd
        .text
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            AuctionError::Validation("Make sure you filled out the comment form.".to_string())
        })?;

    ledger.add_comment(listing_id, author_id, &text).await
}
// endregion: --- Comments

// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use rust_decimal_macros::dec;

    fn listing_cmd() -> CreateListingCommand {
        CreateListingCommand {
            title: Some("Wooden shield".to_string()),
            category: Some(Category::Weapons),
            description: Some("Slightly used".to_string()),
            starting_price: Some(dec!(25.00)),
            image_url: Some("".to_string()),
        }
    }

    async fn register(ledger: &MemoryLedger, name: &str) -> User {
        handle_register_user(
            RegisterUserCommand {
                username: Some(name.to_string()),
                email: None,
            },
            ledger,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_listing_starts_open_with_defaults() {
        let ledger = MemoryLedger::new();
        let owner = register(&ledger, "owner").await;

        let mut cmd = listing_cmd();
        cmd.category = None;
        let listing = handle_create_listing(owner.id, cmd, &ledger).await.unwrap();

        assert!(listing.active);
        assert_eq!(listing.category, Category::None);
        assert_eq!(listing.image_url, None);
        assert_eq!(listing.owner_id, owner.id);
    }

    #[tokio::test]
    async fn create_listing_rejects_missing_or_negative_fields() {
        let ledger = MemoryLedger::new();
        let owner = register(&ledger, "owner").await;

        let mut no_title = listing_cmd();
        no_title.title = None;
        let mut negative = listing_cmd();
        negative.starting_price = Some(dec!(-1));
        let mut no_price = listing_cmd();
        no_price.starting_price = None;

        for cmd in [no_title, negative, no_price, CreateListingCommand::default()] {
            let err = handle_create_listing(owner.id, cmd, &ledger).await.unwrap_err();
            assert!(matches!(err, AuctionError::Validation(_)));
        }
        assert!(ledger
            .list_listings(Default::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let ledger = MemoryLedger::new();
        register(&ledger, "bob").await;

        let err = handle_register_user(
            RegisterUserCommand {
                username: Some(" bob ".to_string()),
                email: Some("bob2@example.com".to_string()),
            },
            &ledger,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AuctionError::DuplicateUser(_)));
    }

    #[tokio::test]
    async fn empty_comment_is_rejected() {
        let ledger = MemoryLedger::new();
        let owner = register(&ledger, "owner").await;
        let listing = handle_create_listing(owner.id, listing_cmd(), &ledger)
            .await
            .unwrap();

        for text in [None, Some("".to_string()), Some("  \n".to_string())] {
            let err = handle_add_comment(listing.id, owner.id, AddCommentCommand { text }, &ledger)
                .await
                .unwrap_err();
            assert!(matches!(err, AuctionError::Validation(_)));
        }

        let comment = handle_add_comment(
            listing.id,
            owner.id,
            AddCommentCommand {
                text: Some("Still available".to_string()),
            },
            &ledger,
        )
        .await
        .unwrap();
        assert_eq!(comment.text, "Still available");
        assert_eq!(ledger.listing_comments(listing.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn comment_on_missing_listing_is_not_found() {
        let ledger = MemoryLedger::new();
        let owner = register(&ledger, "owner").await;

        let err = handle_add_comment(
            404,
            owner.id,
            AddCommentCommand {
                text: Some("hello".to_string()),
            },
            &ledger,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AuctionError::NotFound("listing")));
    }

    #[tokio::test]
    async fn only_owner_deletes_listing() {
        let ledger = MemoryLedger::new();
        let owner = register(&ledger, "owner").await;
        let other = register(&ledger, "other").await;
        let listing = handle_create_listing(owner.id, listing_cmd(), &ledger)
            .await
            .unwrap();

        let err = handle_delete_listing(listing.id, other.id, &ledger)
            .await
            .unwrap_err();
        assert!(matches!(err, AuctionError::Forbidden(_)));

        handle_delete_listing(listing.id, owner.id, &ledger)
            .await
            .unwrap();
        assert!(ledger.find_listing(listing.id).await.unwrap().is_none());
    }
}
