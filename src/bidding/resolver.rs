//! 최고 입찰 계산
//! 1. 현재 가격 및 최고 입찰자 계산
//! 2. 신규 입찰 허용 여부 판단
// region:    --- Imports
use super::model::{Bid, BidStanding};
use crate::auction::model::Listing;
use crate::error::{AuctionError, AuctionResult};
use rust_decimal::Decimal;

// endregion: --- Imports

// region:    --- Resolver
/// 1. 현재 가격 및 최고 입찰자 계산
///
/// 입찰이 없으면 시작가와 `None`을 돌려준다.
/// 최고 금액이 같은 입찰이 여러 건이면 먼저 들어온 입찰(가장 작은 id)이 이긴다.
/// 입력 순서와 무관하게 같은 결과를 낸다.
pub fn resolve_best_bid(listing: &Listing, bids: &[Bid]) -> BidStanding {
    let best = bids.iter().fold(None::<&Bid>, |best, bid| match best {
        Some(current) if bid.amount < current.amount => Some(current),
        Some(current) if bid.amount == current.amount && bid.id > current.id => Some(current),
        _ => Some(bid),
    });

    match best {
        Some(bid) => BidStanding {
            current_price: bid.amount,
            current_winner: Some(bid.bidder_id),
        },
        None => BidStanding {
            current_price: listing.starting_price,
            current_winner: None,
        },
    }
}

/// 2. 신규 입찰 허용 여부 판단
///
/// 저장소의 원자적 범위 안에서 호출되어야 한다.
pub fn evaluate_bid(listing: &Listing, bids: &[Bid], amount: Decimal) -> AuctionResult<BidStanding> {
    if !listing.is_open() {
        return Err(AuctionError::AuctionClosed);
    }

    let standing = resolve_best_bid(listing, bids);
    let accepted = if bids.is_empty() {
        amount >= listing.starting_price
    } else {
        amount > standing.current_price
    };

    if accepted {
        Ok(standing)
    } else {
        Err(AuctionError::BidTooLow {
            amount,
            current_price: standing.current_price,
        })
    }
}
// endregion: --- Resolver
