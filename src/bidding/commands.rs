//! 입찰 관련 커맨드 처리
//! 1. 입찰
//! 2. 경매 종료
// region:    --- Imports
use super::model::Bid;
use crate::auction::model::Listing;
use crate::auction::validation;
use crate::config::AuctionConfig;
use crate::error::{AuctionError, AuctionResult};
use crate::ledger::Ledger;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: Decimal,
}

/// 경매 종료 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CloseAuctionCommand {
    pub listing_id: i64,
    pub actor_id: i64,
}

/// 1. 입찰
///
/// 입찰가 형식을 검증한 뒤 원장에서 잠금 -> 현재가 계산 -> 저장을 한 번에 처리한다.
/// 거절된 입찰은 아무것도 남기지 않는다.
pub async fn handle_place_bid(cmd: PlaceBidCommand, ledger: &dyn Ledger) -> AuctionResult<Bid> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);
    let amount = validation::bid_amount(cmd.amount)?;

    match ledger.place_bid(cmd.listing_id, cmd.bidder_id, amount).await {
        Ok(bid) => {
            info!(
                "{:<12} --> 입찰 성공: listing={}, 입찰가 {}",
                "Command", bid.listing_id, bid.amount
            );
            Ok(bid)
        }
        Err(e @ AuctionError::BidTooLow { .. }) | Err(e @ AuctionError::AuctionClosed) => {
            info!("{:<12} --> 입찰 거절: {}", "Command", e);
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// 2. 경매 종료
///
/// 종료된 경매를 다시 종료하면 그대로 돌려준다.
/// 판매자가 아닌 사용자의 종료는 `owner_only_close`가 꺼져 있으면 경고만 남긴다.
pub async fn handle_close_auction(
    cmd: CloseAuctionCommand,
    ledger: &dyn Ledger,
    config: &AuctionConfig,
) -> AuctionResult<Listing> {
    info!("{:<12} --> 경매 종료 요청: {:?}", "Command", cmd);
    let listing = ledger
        .find_listing(cmd.listing_id)
        .await?
        .ok_or(AuctionError::NotFound("listing"))?;

    if listing.owner_id != cmd.actor_id {
        if config.owner_only_close {
            return Err(AuctionError::Forbidden(
                "Only the owner can close this auction.".to_string(),
            ));
        }
        warn!(
            "{:<12} --> 판매자가 아닌 사용자가 경매를 종료: listing={}, owner={}, actor={}",
            "Command", listing.id, listing.owner_id, cmd.actor_id
        );
    }

    if !listing.is_open() {
        return Ok(listing);
    }

    ledger
        .close_listing(cmd.listing_id)
        .await?
        .ok_or(AuctionError::NotFound("listing"))
}
// endregion: --- Commands
