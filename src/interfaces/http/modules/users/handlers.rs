//! User profile, admin overview and account deletion.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::info;

use super::dto::{ActivityDto, AdminOverviewDto, AnswerSummaryDto, QuestionSummaryDto};
use crate::auth::AuthenticatedUser;
use crate::infrastructure::database::entities::{answer, question, question_tag, tag, user};
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::auth::dto::UserInfo;
use crate::shared::errors::DomainError;
use crate::shared::AppError;

/// User handler state
#[derive(Clone)]
pub struct UserState {
    pub db: DatabaseConnection,
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me/activity",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own questions and answers", body = ApiResponse<ActivityDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_activity(
    State(state): State<UserState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<ActivityDto>>, AppError> {
    let Some(found) = user::Entity::find_by_id(&auth_user.user_id)
        .one(&state.db)
        .await?
    else {
        return Err(DomainError::not_found("user", "id", auth_user.user_id).into());
    };

    let questions = question::Entity::find()
        .filter(question::Column::UserId.eq(&found.id))
        .order_by_desc(question::Column::Id)
        .all(&state.db)
        .await?;
    let answers = answer::Entity::find()
        .filter(answer::Column::UserId.eq(&found.id))
        .order_by_desc(answer::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(ApiResponse::success(ActivityDto {
        user: UserInfo::from(found),
        questions: questions.into_iter().map(QuestionSummaryDto::from).collect(),
        answers: answers.into_iter().map(AnswerSummaryDto::from).collect(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/overview",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users, questions and answers", body = ApiResponse<AdminOverviewDto>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn admin_overview(
    State(state): State<UserState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<AdminOverviewDto>>, AppError> {
    if !auth_user.is_admin() {
        return Err(DomainError::Forbidden("admin access required".to_string()).into());
    }

    let users = user::Entity::find().all(&state.db).await?;
    let questions = question::Entity::find()
        .order_by_desc(question::Column::Id)
        .all(&state.db)
        .await?;
    let answers = answer::Entity::find()
        .order_by_desc(answer::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(ApiResponse::success(AdminOverviewDto {
        users: users.into_iter().map(UserInfo::from).collect(),
        questions: questions.into_iter().map(QuestionSummaryDto::from).collect(),
        answers: answers.into_iter().map(AnswerSummaryDto::from).collect(),
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "May only delete own account unless admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if id != auth_user.user_id && !auth_user.is_admin() {
        return Err(DomainError::Forbidden(
            "may only delete your own account".to_string(),
        )
        .into());
    }

    let Some(target) = user::Entity::find_by_id(&id).one(&state.db).await? else {
        return Err(DomainError::not_found("user", "id", id).into());
    };

    // Tags of the user's questions go with the questions.
    let question_ids: Vec<i32> = question::Entity::find()
        .filter(question::Column::UserId.eq(&target.id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|q| q.id)
        .collect();
    let tag_ids: Vec<i32> = question_tag::Entity::find()
        .filter(question_tag::Column::QuestionId.is_in(question_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|row| row.tag_id)
        .collect();

    // Questions whose accepted answer was written by this user reopen.
    let accepted_question_ids: Vec<i32> = answer::Entity::find()
        .filter(
            answer::Column::UserId
                .eq(&target.id)
                .and(answer::Column::IsAccepted.eq(true)),
        )
        .all(&state.db)
        .await?
        .into_iter()
        .map(|a| a.question_id)
        .collect();
    if !accepted_question_ids.is_empty() {
        question::Entity::update_many()
            .col_expr(question::Column::AcceptedAnswer, Expr::value(false))
            .filter(question::Column::Id.is_in(accepted_question_ids))
            .exec(&state.db)
            .await?;
    }

    // Questions and answers are removed by the cascading foreign keys.
    user::Entity::delete_by_id(&target.id).exec(&state.db).await?;

    if !tag_ids.is_empty() {
        tag::Entity::delete_many()
            .filter(tag::Column::Id.is_in(tag_ids))
            .exec(&state.db)
            .await?;
    }

    info!(user_id = %target.id, by = %auth_user.username, "user deleted");
    Ok(Json(ApiResponse::success(())))
}
