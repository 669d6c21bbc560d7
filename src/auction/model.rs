use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// 사용자 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub date_joined: DateTime<Utc>,
}

// region:    --- Category
#[derive(Debug, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// 상품 카테고리. `None`은 빈 문자열로 저장 및 전송
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "")]
    None,
    Clothes,
    Weapons,
    Objects,
    Extras,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::None,
        Category::Clothes,
        Category::Weapons,
        Category::Objects,
        Category::Extras,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::None => "",
            Category::Clothes => "Clothes",
            Category::Weapons => "Weapons",
            Category::Objects => "Objects",
            Category::Extras => "Extras",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
// endregion: --- Category

// 경매 상품 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    #[sqlx(try_from = "String")]
    pub category: Category,
    pub description: String,
    pub starting_price: Decimal,
    pub image_url: Option<String>,
    /// `true` -> `false` 단방향으로만 변경
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: i64,
}

impl Listing {
    pub fn is_open(&self) -> bool {
        self.active
    }
}

/// 검증을 마친 신규 상품 정보
#[derive(Debug, Clone)]
pub struct NewListing {
    pub owner_id: i64,
    pub title: String,
    pub category: Category,
    pub description: String,
    pub starting_price: Decimal,
    pub image_url: Option<String>,
}

// 댓글 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub listing_id: i64,
    /// 작성자가 삭제되어도 그대로 유지
    pub author_id: i64,
}
