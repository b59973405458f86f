//! Answer handlers: create, edit, delete, like and accept.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::info;

use super::dto::{AcceptResultDto, AnswerDto, CreateAnswerRequest, UpdateAnswerRequest};
use crate::auth::AuthenticatedUser;
use crate::infrastructure::database::entities::{answer, question, user};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::questions::dto::CounterDto;
use crate::session::{keys, SessionId, SharedActionGuard};
use crate::shared::errors::DomainError;
use crate::shared::AppError;

/// Answer handler state
#[derive(Clone)]
pub struct AnswerState {
    pub db: DatabaseConnection,
    pub guard: SharedActionGuard,
}

#[utoipa::path(
    post,
    path = "/api/v1/questions/{id}/answers",
    tag = "Answers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Question id")),
    request_body = CreateAnswerRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<AnswerDto>),
        (status = 404, description = "Question not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_answer(
    State(state): State<AnswerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(question_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<CreateAnswerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AnswerDto>>), AppError> {
    if question::Entity::find_by_id(question_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        return Err(DomainError::not_found("question", "id", question_id.to_string()).into());
    }

    let created = answer::ActiveModel {
        content: Set(request.content),
        created_at: Set(Utc::now()),
        like_count: Set(0),
        is_accepted: Set(false),
        user_id: Set(auth_user.user_id.clone()),
        question_id: Set(question_id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        answer_id = created.id,
        question_id,
        user = %auth_user.username,
        "answer created"
    );

    let author = user::Entity::find_by_id(&auth_user.user_id)
        .one(&state.db)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AnswerDto::new(created, author))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/answers/{id}",
    tag = "Answers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Answer id")),
    request_body = UpdateAnswerRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<AnswerDto>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_answer(
    State(state): State<AnswerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateAnswerRequest>,
) -> Result<Json<ApiResponse<AnswerDto>>, AppError> {
    let Some(existing) = answer::Entity::find_by_id(id).one(&state.db).await? else {
        return Err(DomainError::not_found("answer", "id", id.to_string()).into());
    };

    if existing.user_id != auth_user.user_id && !auth_user.is_admin() {
        return Err(
            DomainError::Forbidden("only the author or an admin may edit".to_string()).into(),
        );
    }

    let mut active: answer::ActiveModel = existing.into();
    active.content = Set(request.content);
    let updated = active.update(&state.db).await?;

    let author = user::Entity::find_by_id(&updated.user_id)
        .one(&state.db)
        .await?;
    Ok(Json(ApiResponse::success(AnswerDto::new(updated, author))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/answers/{id}",
    tag = "Answers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Answer id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_answer(
    State(state): State<AnswerState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Some(existing) = answer::Entity::find_by_id(id).one(&state.db).await? else {
        return Err(DomainError::not_found("answer", "id", id.to_string()).into());
    };

    if existing.user_id != auth_user.user_id && !auth_user.is_admin() {
        return Err(
            DomainError::Forbidden("only the author or an admin may delete".to_string()).into(),
        );
    }

    // Deleting the accepted answer reopens the question.
    if existing.is_accepted {
        if let Some(q) = question::Entity::find_by_id(existing.question_id)
            .one(&state.db)
            .await?
        {
            let mut active: question::ActiveModel = q.into();
            active.accepted_answer = Set(false);
            active.update(&state.db).await?;
        }
    }

    answer::Entity::delete_by_id(id).exec(&state.db).await?;

    info!(answer_id = id, user = %auth_user.username, "answer deleted");
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    post,
    path = "/api/v1/answers/{id}/like",
    tag = "Answers",
    params(("id" = i32, Path, description = "Answer id")),
    responses(
        (status = 200, description = "Like state after the request", body = ApiResponse<CounterDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn like_answer(
    State(state): State<AnswerState>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CounterDto>>, AppError> {
    let Some(existing) = answer::Entity::find_by_id(id).one(&state.db).await? else {
        return Err(DomainError::not_found("answer", "id", id.to_string()).into());
    };

    let key = keys::liked_answer(id);
    if state.guard.is_consumed(&session.0, &key) {
        return Ok(Json(ApiResponse::success(CounterDto {
            count: existing.like_count,
            applied: false,
        })));
    }

    let like_count = existing.like_count + 1;
    let mut active: answer::ActiveModel = existing.into();
    active.like_count = Set(like_count);
    let updated = active.update(&state.db).await?;
    state.guard.try_consume(&session.0, &key);

    Ok(Json(ApiResponse::success(CounterDto {
        count: updated.like_count,
        applied: true,
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/answers/{id}/accept",
    tag = "Answers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Answer id")),
    responses(
        (status = 200, description = "Accept state after the request", body = ApiResponse<AcceptResultDto>),
        (status = 403, description = "Only the question author may accept"),
        (status = 404, description = "Not found")
    )
)]
pub async fn accept_answer(
    State(state): State<AnswerState>,
    Extension(session): Extension<SessionId>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AcceptResultDto>>, AppError> {
    let Some(target) = answer::Entity::find_by_id(id).one(&state.db).await? else {
        return Err(DomainError::not_found("answer", "id", id.to_string()).into());
    };
    let Some(parent) = question::Entity::find_by_id(target.question_id)
        .one(&state.db)
        .await?
    else {
        return Err(
            DomainError::not_found("question", "id", target.question_id.to_string()).into(),
        );
    };

    if parent.user_id != auth_user.user_id {
        return Err(DomainError::Forbidden(
            "only the question author may accept an answer".to_string(),
        )
        .into());
    }

    let key = keys::accepted_answer(parent.id);
    if state.guard.is_consumed(&session.0, &key) {
        return Ok(Json(ApiResponse::success(AcceptResultDto {
            answer_id: target.id,
            question_id: parent.id,
            applied: false,
        })));
    }

    let answer_id = target.id;
    let question_id = parent.id;

    let mut accepted: answer::ActiveModel = target.into();
    accepted.is_accepted = Set(true);
    accepted.update(&state.db).await?;

    let mut solved: question::ActiveModel = parent.into();
    solved.accepted_answer = Set(true);
    solved.update(&state.db).await?;

    state.guard.try_consume(&session.0, &key);

    info!(answer_id, question_id, user = %auth_user.username, "answer accepted");

    Ok(Json(ApiResponse::success(AcceptResultDto {
        answer_id,
        question_id,
        applied: true,
    })))
}
