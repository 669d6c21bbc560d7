//! 입력값 검증
// region:    --- Imports
use crate::error::{AuctionError, AuctionResult};
use rust_decimal::Decimal;
use url::Url;

// endregion: --- Imports

pub const TITLE_MAX_CHARS: usize = 64;
pub const USERNAME_MAX_CHARS: usize = 150;

/// 시작가 상한 (7자리, 소수점 2자리)
fn starting_price_limit() -> Decimal {
    Decimal::from(100_000)
}

/// 입찰가 상한 (9자리, 소수점 2자리)
fn bid_amount_limit() -> Decimal {
    Decimal::from(10_000_000)
}

// region:    --- Validators
/// 필수 텍스트: 비어 있거나 공백뿐이면 오류, 앞뒤 공백 제거
pub fn required_text(
    field: &str,
    value: Option<String>,
    max_chars: Option<usize>,
) -> AuctionResult<String> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(AuctionError::Validation(format!("{} is required.", field)));
    }
    if let Some(max) = max_chars {
        if value.chars().count() > max {
            return Err(AuctionError::Validation(format!(
                "{} must be at most {} characters.",
                field, max
            )));
        }
    }
    Ok(value)
}

/// 금액: 소수점 2자리까지, `limit` 미만
pub fn money(field: &str, value: Decimal, limit: Decimal) -> AuctionResult<Decimal> {
    if value.normalize().scale() > 2 {
        return Err(AuctionError::Validation(format!(
            "{} must have at most 2 decimal places.",
            field
        )));
    }
    if value >= limit {
        return Err(AuctionError::Validation(format!(
            "{} must be less than {}.",
            field, limit
        )));
    }
    Ok(value)
}

/// 시작가: 0 이상
pub fn starting_price(value: Option<Decimal>) -> AuctionResult<Decimal> {
    let value =
        value.ok_or_else(|| AuctionError::Validation("starting_price is required.".to_string()))?;
    if value < Decimal::ZERO {
        return Err(AuctionError::Validation(
            "starting_price must not be negative.".to_string(),
        ));
    }
    money("starting_price", value, starting_price_limit())
}

/// 입찰가: 0.01 이상
pub fn bid_amount(value: Decimal) -> AuctionResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(AuctionError::Validation(
            "amount must be at least 0.01.".to_string(),
        ));
    }
    money("amount", value, bid_amount_limit())
}

/// 이미지 주소: 선택 항목, http(s)만 허용
pub fn image_url(value: Option<String>) -> AuctionResult<Option<String>> {
    let value = match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => v,
        _ => return Ok(None),
    };
    match Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(Some(value)),
        _ => Err(AuctionError::Validation(
            "image_url must be a valid http(s) URL.".to_string(),
        )),
    }
}
// endregion: --- Validators
