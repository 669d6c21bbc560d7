// region:    --- Imports
use crate::auction::commands::{
    handle_add_comment, handle_create_listing, handle_delete_listing, handle_delete_user,
    handle_register_user, AddCommentCommand, CreateListingCommand, RegisterUserCommand,
};
use crate::auction::model::User;
use crate::bidding::commands::{
    handle_close_auction, handle_place_bid, CloseAuctionCommand, PlaceBidCommand,
};
use crate::bidding::resolver::resolve_best_bid;
use crate::config::AuctionConfig;
use crate::error::{AuctionError, AuctionResult};
use crate::ledger::Ledger;
use crate::query;
use crate::watchlist::commands::{self as watchlist, SetFavoriteCommand};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{async_trait, Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- State
/// 요청 간 공유 상태 (변경되지 않음)
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn Ledger>,
    pub auction: Arc<AuctionConfig>,
}

impl AppState {
    pub fn new(ledger: Arc<dyn Ledger>, auction: AuctionConfig) -> Self {
        Self {
            ledger,
            auction: Arc::new(auction),
        }
    }
}
// endregion: --- State

// region:    --- Acting User
/// 인증 게이트웨이가 넘겨주는 사용자 id 헤더
pub const USER_ID_HEADER: &str = "x-user-id";

/// 요청을 보낸 사용자
#[derive(Debug, Clone)]
pub struct ActingUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for ActingUser {
    type Rejection = AuctionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .ok_or(AuctionError::Unauthenticated)?;

        state
            .ledger
            .find_user(user_id)
            .await?
            .map(ActingUser)
            .ok_or(AuctionError::Unauthenticated)
    }
}
// endregion: --- Acting User

// region:    --- Router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", post(handle_register))
        .route("/users/me", delete(handle_delete_me))
        .route("/listings", get(handle_get_listings).post(handle_create))
        .route(
            "/listings/:id",
            get(handle_get_listing).delete(handle_delete),
        )
        .route("/listings/:id/bids", post(handle_bid))
        .route("/listings/:id/close", post(handle_close))
        .route("/listings/:id/comments", post(handle_comment))
        .route("/listings/:id/watchlist", put(handle_set_favorite))
        .route("/watchlist", get(handle_get_watchlist))
        .route("/watchlist/:id", delete(handle_remove_favorite))
        .route("/categories", get(handle_get_categories))
        .route("/categories/:name", get(handle_get_category))
        .with_state(state)
}
// endregion: --- Router

// region:    --- Command Handlers

/// 입찰 요청 본문
#[derive(Debug, Deserialize)]
pub struct BidRequest {
    pub amount: Decimal,
}

/// 사용자 등록
pub async fn handle_register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserCommand>, JsonRejection>,
) -> AuctionResult<impl IntoResponse> {
    let Json(cmd) = payload?;
    let user = handle_register_user(cmd, &*state.ledger).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// 본인 계정 삭제
pub async fn handle_delete_me(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> AuctionResult<StatusCode> {
    handle_delete_user(user.id, &*state.ledger).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 상품 등록
pub async fn handle_create(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    payload: Result<Json<CreateListingCommand>, JsonRejection>,
) -> AuctionResult<impl IntoResponse> {
    let Json(cmd) = payload?;
    let listing = handle_create_listing(user.id, cmd, &*state.ledger).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// 상품 삭제
pub async fn handle_delete(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    listing_id: Result<Path<i64>, PathRejection>,
) -> AuctionResult<StatusCode> {
    let Path(listing_id) = listing_id?;
    handle_delete_listing(listing_id, user.id, &*state.ledger).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 입찰 요청 처리
pub async fn handle_bid(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    listing_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BidRequest>, JsonRejection>,
) -> AuctionResult<impl IntoResponse> {
    let Path(listing_id) = listing_id?;
    let Json(request) = payload?;
    info!(
        "{:<12} --> 입찰 요청: listing={}, bidder={}",
        "Handler", listing_id, user.id
    );

    let cmd = PlaceBidCommand {
        listing_id,
        bidder_id: user.id,
        amount: request.amount,
    };
    let bid = handle_place_bid(cmd, &*state.ledger).await?;

    // 응답용 현재 가격
    let current_price = match state.ledger.find_listing(listing_id).await? {
        Some(listing) => {
            let bids = state.ledger.listing_bids(listing_id).await?;
            resolve_best_bid(&listing, &bids).current_price
        }
        None => bid.amount,
    };

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Bid placed.",
            "bid": bid,
            "current_price": current_price,
        })),
    ))
}

/// 경매 종료
pub async fn handle_close(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    listing_id: Result<Path<i64>, PathRejection>,
) -> AuctionResult<impl IntoResponse> {
    let Path(listing_id) = listing_id?;
    let cmd = CloseAuctionCommand {
        listing_id,
        actor_id: user.id,
    };
    let listing = handle_close_auction(cmd, &*state.ledger, &state.auction).await?;
    Ok(Json(listing))
}

/// 댓글 작성
pub async fn handle_comment(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    listing_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AddCommentCommand>, JsonRejection>,
) -> AuctionResult<impl IntoResponse> {
    let Path(listing_id) = listing_id?;
    let Json(cmd) = payload?;
    let comment = handle_add_comment(listing_id, user.id, cmd, &*state.ledger).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// 관심 목록 추가/제거
pub async fn handle_set_favorite(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    listing_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SetFavoriteCommand>, JsonRejection>,
) -> AuctionResult<impl IntoResponse> {
    let Path(listing_id) = listing_id?;
    let Json(cmd) = payload?;
    let entry = watchlist::set_favorite(user.id, listing_id, cmd, &*state.ledger).await?;
    Ok(Json(entry))
}

/// 관심 목록 화면에서 제거
pub async fn handle_remove_favorite(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    listing_id: Result<Path<i64>, PathRejection>,
) -> AuctionResult<StatusCode> {
    let Path(listing_id) = listing_id?;
    watchlist::remove_from_watchlist(user.id, listing_id, &*state.ledger).await?;
    Ok(StatusCode::NO_CONTENT)
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 진행 중인 경매 조회
pub async fn handle_get_listings(
    State(state): State<AppState>,
) -> AuctionResult<impl IntoResponse> {
    info!("{:<12} --> 진행 중인 경매 조회", "HandlerQuery");
    Ok(Json(query::handlers::get_active_listings(&*state.ledger).await?))
}

/// 상품 상세 조회
///
/// 조회 전에 관심 목록 항목을 명시적으로 만들어 둔다.
pub async fn handle_get_listing(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    listing_id: Result<Path<i64>, PathRejection>,
) -> AuctionResult<impl IntoResponse> {
    let Path(listing_id) = listing_id?;
    info!("{:<12} --> 상품 상세 조회 id: {}", "HandlerQuery", listing_id);
    watchlist::get_or_create(user.id, listing_id, &*state.ledger).await?;
    let detail = query::handlers::get_listing_detail(&*state.ledger, listing_id, user.id).await?;
    Ok(Json(detail))
}

/// 관심 목록 조회
pub async fn handle_get_watchlist(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> AuctionResult<impl IntoResponse> {
    info!("{:<12} --> 관심 목록 조회 user: {}", "HandlerQuery", user.id);
    Ok(Json(
        query::handlers::get_watchlist(&*state.ledger, user.id).await?,
    ))
}

/// 카테고리 목록 조회
pub async fn handle_get_categories() -> impl IntoResponse {
    Json(query::handlers::get_categories())
}

/// 카테고리별 경매 조회
pub async fn handle_get_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AuctionResult<impl IntoResponse> {
    info!("{:<12} --> 카테고리별 경매 조회: {}", "HandlerQuery", name);
    Ok(Json(
        query::handlers::get_category_listings(&*state.ledger, &name).await?,
    ))
}

// endregion: --- Query Handlers
