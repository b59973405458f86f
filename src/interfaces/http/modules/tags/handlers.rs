//! Tag category handler.

use axum::{extract::State, Json};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};

use super::dto::TagCategoryDto;
use crate::infrastructure::database::entities::tag;
use crate::interfaces::http::common::ApiResponse;
use crate::shared::AppError;

/// Tag handler state
#[derive(Clone)]
pub struct TagState {
    pub db: DatabaseConnection,
}

#[utoipa::path(
    get,
    path = "/api/v1/tags",
    tag = "Tags",
    responses(
        (status = 200, description = "Tag names with usage counts", body = ApiResponse<Vec<TagCategoryDto>>)
    )
)]
pub async fn list_tag_categories(
    State(state): State<TagState>,
) -> Result<Json<ApiResponse<Vec<TagCategoryDto>>>, AppError> {
    // Tag rows are created per question, so grouping by name yields the
    // per-tag usage count directly.
    let rows = tag::Entity::find()
        .select_only()
        .column(tag::Column::Name)
        .column_as(tag::Column::Id.count(), "usage")
        .group_by(tag::Column::Name)
        .order_by_asc(tag::Column::Name)
        .into_model::<TagCategoryDto>()
        .all(&state.db)
        .await?;

    Ok(Json(ApiResponse::success(rows)))
}
