use serde::{Deserialize, Serialize};

// 관심 목록 모델
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchlistEntry {
    pub id: i64,
    pub user_id: i64,
    pub listing_id: i64,
    pub added: bool,
}
