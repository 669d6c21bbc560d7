// region:    --- Imports
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Error
/// 경매 서비스 에러
#[derive(Debug, Error)]
pub enum AuctionError {
    #[error("{0}")]
    Validation(String),

    #[error("Your bid must be greater than the current winning bid/initial price.")]
    BidTooLow {
        amount: Decimal,
        current_price: Decimal,
    },

    #[error("The auction has already been closed.")]
    AuctionClosed,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Username already taken: {0}")]
    DuplicateUser(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AuctionResult<T> = Result<T, AuctionError>;

impl AuctionError {
    pub fn code(&self) -> &'static str {
        match self {
            AuctionError::Validation(_) => "VALIDATION",
            AuctionError::BidTooLow { .. } => "LOW_BID",
            AuctionError::AuctionClosed => "ALREADY_ENDED",
            AuctionError::NotFound(_) => "NOT_FOUND",
            AuctionError::DuplicateUser(_) => "DUPLICATE_USER",
            AuctionError::Unauthenticated => "UNAUTHENTICATED",
            AuctionError::Forbidden(_) => "FORBIDDEN",
            AuctionError::Database(_) => "DATABASE",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AuctionError::Validation(_)
            | AuctionError::BidTooLow { .. }
            | AuctionError::AuctionClosed => StatusCode::BAD_REQUEST,
            AuctionError::NotFound(_) => StatusCode::NOT_FOUND,
            AuctionError::DuplicateUser(_) => StatusCode::CONFLICT,
            AuctionError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuctionError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuctionError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AuctionError {
    fn from(rejection: JsonRejection) -> Self {
        AuctionError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AuctionError {
    fn from(rejection: PathRejection) -> Self {
        AuctionError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{:<12} --> {}", "Error", self);
        } else {
            info!("{:<12} --> {} ({})", "Error", self, self.code());
        }

        let mut body = serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        if let AuctionError::BidTooLow {
            amount,
            current_price,
        } = &self
        {
            body["bid_amount"] = serde_json::json!(amount);
            body["current_price"] = serde_json::json!(current_price);
        }

        (status, Json(body)).into_response()
    }
}
// endregion: --- Error
