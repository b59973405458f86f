//! Question handlers: listing, detail, CRUD and the like counter.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use super::dto::{
    CounterDto, CreateQuestionRequest, ListQuestionsParams, QuestionDetailDto, QuestionDto,
    QuestionSort, UpdateQuestionRequest,
};
use crate::auth::AuthenticatedUser;
use crate::infrastructure::database::entities::{answer, question, question_tag, tag, user};
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, ValidatedJson};
use crate::interfaces::http::modules::answers::dto::AnswerDto;
use crate::session::{keys, SessionId, SharedActionGuard};
use crate::shared::errors::DomainError;
use crate::shared::{listing, pagination, AppError};

/// Question handler state
#[derive(Clone)]
pub struct QuestionState {
    pub db: DatabaseConnection,
    pub guard: SharedActionGuard,
    pub page_size: u32,
}

/// Tag names attached to a question.
async fn tag_names(db: &DatabaseConnection, question_id: i32) -> Result<Vec<String>, AppError> {
    let tag_ids: Vec<i32> = question_tag::Entity::find()
        .filter(question_tag::Column::QuestionId.eq(question_id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.tag_id)
        .collect();

    let tags = tag::Entity::find()
        .filter(tag::Column::Id.is_in(tag_ids))
        .all(db)
        .await?;
    Ok(tags.into_iter().map(|t| t.name).collect())
}

/// Question ids carrying any of the given tag ids.
async fn question_ids_for_tags(
    db: &DatabaseConnection,
    tag_ids: Vec<i32>,
) -> Result<Vec<i32>, AppError> {
    let rows = question_tag::Entity::find()
        .filter(question_tag::Column::TagId.is_in(tag_ids))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|row| row.question_id).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/questions",
    tag = "Questions",
    params(ListQuestionsParams),
    responses(
        (status = 200, description = "One page of questions", body = PaginatedResponse<QuestionDto>),
        (status = 400, description = "Invalid page number")
    )
)]
pub async fn list_questions(
    State(state): State<QuestionState>,
    Query(params): Query<ListQuestionsParams>,
) -> Result<Json<PaginatedResponse<QuestionDto>>, AppError> {
    let page = pagination::validate_page(params.page)?;

    let mut query = question::Entity::find();
    query = match params.sort {
        QuestionSort::Newest => query.order_by_desc(question::Column::Id),
        QuestionSort::Oldest => query.order_by_asc(question::Column::Id),
        QuestionSort::Views => query.order_by_desc(question::Column::ViewCount),
    };

    if let Some(solved) = params.solved {
        query = query.filter(question::Column::AcceptedAnswer.eq(solved));
    }

    if let Some(tag_name) = &params.tag {
        let tag_ids: Vec<i32> = tag::Entity::find()
            .filter(tag::Column::Name.eq(tag_name))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        let question_ids = question_ids_for_tags(&state.db, tag_ids).await?;
        query = query.filter(question::Column::Id.is_in(question_ids));
    }

    if let Some(term) = &params.q {
        let author_ids: Vec<String> = user::Entity::find()
            .filter(user::Column::Username.contains(term))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        let tag_ids: Vec<i32> = tag::Entity::find()
            .filter(tag::Column::Name.contains(term))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        let tagged_ids = question_ids_for_tags(&state.db, tag_ids).await?;

        query = query.filter(
            Condition::any()
                .add(question::Column::Title.contains(term))
                .add(question::Column::Content.contains(term))
                .add(question::Column::UserId.is_in(author_ids))
                .add(question::Column::Id.is_in(tagged_ids)),
        );
    }

    let total = query.clone().count(&state.db).await?;
    let bounds = pagination::compute(total, page, state.page_size);

    let rows = query
        .find_also_related(user::Entity)
        .offset(bounds.offset)
        .limit(u64::from(state.page_size))
        .all(&state.db)
        .await?;

    let db = state.db.clone();
    let rows = listing::assemble(rows, |(q, _)| {
        let db = db.clone();
        let id = q.id;
        async move {
            let answers = answer::Entity::find()
                .filter(answer::Column::QuestionId.eq(id))
                .count(&db)
                .await?;
            let tags = tag_names(&db, id).await?;
            Ok((answers, tags))
        }
    })
    .await?;

    let items = rows
        .into_iter()
        .map(|((q, author), (answers, tags))| QuestionDto::new(q, author, tags, answers))
        .collect();

    Ok(Json(PaginatedResponse::new(
        items,
        total,
        page,
        state.page_size,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/questions/{id}",
    tag = "Questions",
    params(("id" = i32, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question detail with answers", body = ApiResponse<QuestionDetailDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_question(
    State(state): State<QuestionState>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<QuestionDetailDto>>, AppError> {
    let Some((q, author)) = question::Entity::find_by_id(id)
        .find_also_related(user::Entity)
        .one(&state.db)
        .await?
    else {
        return Err(DomainError::not_found("question", "id", id.to_string()).into());
    };

    // View counter fires at most once per session. The increment is written
    // before the guard key is marked, so a failed write leaves the action
    // retryable.
    let key = keys::viewed_question(q.id);
    let q = if state.guard.is_consumed(&session.0, &key) {
        q
    } else {
        let view_count = q.view_count + 1;
        let mut active: question::ActiveModel = q.into();
        active.view_count = Set(view_count);
        let updated = active.update(&state.db).await?;
        state.guard.try_consume(&session.0, &key);
        updated
    };

    let answer_rows = answer::Entity::find()
        .filter(answer::Column::QuestionId.eq(id))
        .order_by_desc(answer::Column::Id)
        .find_also_related(user::Entity)
        .all(&state.db)
        .await?;
    let answer_count = answer_rows.len() as u64;
    let answers = answer_rows
        .into_iter()
        .map(|(a, u)| AnswerDto::new(a, u))
        .collect();

    let tags = tag_names(&state.db, q.id).await?;

    Ok(Json(ApiResponse::success(QuestionDetailDto {
        question: QuestionDto::new(q, author, tags, answer_count),
        answers,
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/questions",
    tag = "Questions",
    security(("bearer_auth" = [])),
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<QuestionDto>),
        (status = 400, description = "No usable tags"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_question(
    State(state): State<QuestionState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<QuestionDto>>), AppError> {
    let tags: Vec<String> = request
        .tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        return Err(DomainError::Validation("at least one tag is required".to_string()).into());
    }

    let new_question = question::ActiveModel {
        title: Set(request.title.clone()),
        slug: Set(question::slugify(&request.title)),
        content: Set(request.content),
        created_at: Set(Utc::now()),
        view_count: Set(0),
        like_count: Set(0),
        accepted_answer: Set(false),
        user_id: Set(auth_user.user_id.clone()),
        ..Default::default()
    };
    let created = new_question.insert(&state.db).await?;

    for name in &tags {
        let tag_row = tag::ActiveModel {
            name: Set(name.clone()),
            ..Default::default()
        }
        .insert(&state.db)
        .await?;
        question_tag::ActiveModel {
            question_id: Set(created.id),
            tag_id: Set(tag_row.id),
        }
        .insert(&state.db)
        .await?;
    }

    info!(question_id = created.id, user = %auth_user.username, "question created");

    let author = user::Entity::find_by_id(&auth_user.user_id)
        .one(&state.db)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(QuestionDto::new(
            created, author, tags, 0,
        ))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/questions/{id}",
    tag = "Questions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Question id")),
    request_body = UpdateQuestionRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<QuestionDto>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_question(
    State(state): State<QuestionState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateQuestionRequest>,
) -> Result<Json<ApiResponse<QuestionDto>>, AppError> {
    let Some(existing) = question::Entity::find_by_id(id).one(&state.db).await? else {
        return Err(DomainError::not_found("question", "id", id.to_string()).into());
    };

    if existing.user_id != auth_user.user_id && !auth_user.is_admin() {
        return Err(
            DomainError::Forbidden("only the author or an admin may edit".to_string()).into(),
        );
    }

    let mut active: question::ActiveModel = existing.into();
    if let Some(title) = request.title {
        active.slug = Set(question::slugify(&title));
        active.title = Set(title);
    }
    if let Some(content) = request.content {
        active.content = Set(content);
    }
    let updated = active.update(&state.db).await?;

    let author = user::Entity::find_by_id(&updated.user_id)
        .one(&state.db)
        .await?;
    let tags = tag_names(&state.db, updated.id).await?;
    let answers = answer::Entity::find()
        .filter(answer::Column::QuestionId.eq(updated.id))
        .count(&state.db)
        .await?;

    Ok(Json(ApiResponse::success(QuestionDto::new(
        updated, author, tags, answers,
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/questions/{id}",
    tag = "Questions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Question id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_question(
    State(state): State<QuestionState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Some(existing) = question::Entity::find_by_id(id).one(&state.db).await? else {
        return Err(DomainError::not_found("question", "id", id.to_string()).into());
    };

    if existing.user_id != auth_user.user_id && !auth_user.is_admin() {
        return Err(
            DomainError::Forbidden("only the author or an admin may delete".to_string()).into(),
        );
    }

    // Tags are owned by their question, so they go with it. Junction rows
    // and answers are removed by the cascading foreign keys.
    let tag_ids: Vec<i32> = question_tag::Entity::find()
        .filter(question_tag::Column::QuestionId.eq(id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|row| row.tag_id)
        .collect();

    question::Entity::delete_by_id(id).exec(&state.db).await?;

    if !tag_ids.is_empty() {
        tag::Entity::delete_many()
            .filter(tag::Column::Id.is_in(tag_ids))
            .exec(&state.db)
            .await?;
    }

    info!(question_id = id, user = %auth_user.username, "question deleted");
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    post,
    path = "/api/v1/questions/{id}/like",
    tag = "Questions",
    params(("id" = i32, Path, description = "Question id")),
    responses(
        (status = 200, description = "Like state after the request", body = ApiResponse<CounterDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn like_question(
    State(state): State<QuestionState>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CounterDto>>, AppError> {
    let Some(existing) = question::Entity::find_by_id(id).one(&state.db).await? else {
        return Err(DomainError::not_found("question", "id", id.to_string()).into());
    };

    let key = keys::liked_question(id);
    if state.guard.is_consumed(&session.0, &key) {
        return Ok(Json(ApiResponse::success(CounterDto {
            count: existing.like_count,
            applied: false,
        })));
    }

    let like_count = existing.like_count + 1;
    let mut active: question::ActiveModel = existing.into();
    active.like_count = Set(like_count);
    let updated = active.update(&state.db).await?;
    state.guard.try_consume(&session.0, &key);

    Ok(Json(ApiResponse::success(CounterDto {
        count: updated.like_count,
        applied: true,
    })))
}
