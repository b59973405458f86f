//! Tag DTOs

use sea_orm::FromQueryResult;
use serde::Serialize;
use utoipa::ToSchema;

/// A tag name with the number of questions using it
#[derive(Debug, Serialize, FromQueryResult, ToSchema)]
pub struct TagCategoryDto {
    pub name: String,
    /// Number of questions carrying this tag name
    pub usage: i64,
}
