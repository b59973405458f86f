//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{auth_middleware, AuthState, JwtConfig};
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::modules::{answers, auth, health, questions, tags, users};
use crate::session::{session_middleware, SharedActionGuard};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        // Questions
        questions::list_questions,
        questions::get_question,
        questions::create_question,
        questions::update_question,
        questions::delete_question,
        questions::like_question,
        // Answers
        answers::create_answer,
        answers::update_answer,
        answers::delete_answer,
        answers::like_answer,
        answers::accept_answer,
        // Tags
        tags::list_tag_categories,
        // Users
        users::my_activity,
        users::admin_overview,
        users::delete_user,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<questions::QuestionDto>,
            PaginationParams,
            // Auth
            auth::LoginRequest,
            auth::RegisterRequest,
            auth::TokenResponse,
            auth::UserInfo,
            // Questions
            questions::AuthorDto,
            questions::QuestionDto,
            questions::QuestionDetailDto,
            questions::QuestionSort,
            questions::CreateQuestionRequest,
            questions::UpdateQuestionRequest,
            questions::CounterDto,
            // Answers
            answers::AnswerDto,
            answers::CreateAnswerRequest,
            answers::UpdateAnswerRequest,
            answers::AcceptResultDto,
            // Tags
            tags::TagCategoryDto,
            // Users
            users::QuestionSummaryDto,
            users::AnswerSummaryDto,
            users::ActivityDto,
            users::AdminOverviewDto,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Registration and login"),
        (name = "Questions", description = "Question listing, detail and CRUD"),
        (name = "Answers", description = "Answer CRUD, likes and acceptance"),
        (name = "Tags", description = "Tag categories"),
        (name = "Users", description = "Profiles and administration")
    ),
    info(
        title = "Q&A Forum API",
        version = "0.1.0",
        description = "REST API for a community question and answer forum"
    )
)]
pub struct ApiDoc;

/// Build the full API router.
///
/// Anonymous visitors can browse, search and like; writing requires a JWT.
pub fn create_api_router(
    db: DatabaseConnection,
    guard: SharedActionGuard,
    jwt_config: JwtConfig,
    page_size: u32,
) -> Router {
    let auth_mw_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    let question_state = questions::QuestionState {
        db: db.clone(),
        guard: guard.clone(),
        page_size,
    };
    let answer_state = answers::AnswerState {
        db: db.clone(),
        guard: guard.clone(),
    };
    let tag_state = tags::TagState { db: db.clone() };
    let auth_state = auth::AuthHandlerState {
        db: db.clone(),
        jwt_config,
    };
    let user_state = users::UserState { db: db.clone() };
    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .layer(middleware::from_fn_with_state(
            auth_mw_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Question routes (public: browse and session-guarded counters)
    let question_routes = Router::new()
        .route("/", get(questions::list_questions))
        .route("/{id}", get(questions::get_question))
        .route("/{id}/like", post(questions::like_question))
        .with_state(question_state.clone());

    // Question routes (protected: authoring)
    let question_protected_routes = Router::new()
        .route("/", post(questions::create_question))
        .route(
            "/{id}",
            put(questions::update_question).delete(questions::delete_question),
        )
        .layer(middleware::from_fn_with_state(
            auth_mw_state.clone(),
            auth_middleware,
        ))
        .with_state(question_state);

    // Answer creation lives under its question
    let answer_create_routes = Router::new()
        .route("/{id}/answers", post(answers::create_answer))
        .layer(middleware::from_fn_with_state(
            auth_mw_state.clone(),
            auth_middleware,
        ))
        .with_state(answer_state.clone());

    // Answer routes (public: session-guarded like)
    let answer_routes = Router::new()
        .route("/{id}/like", post(answers::like_answer))
        .with_state(answer_state.clone());

    // Answer routes (protected)
    let answer_protected_routes = Router::new()
        .route(
            "/{id}",
            put(answers::update_answer).delete(answers::delete_answer),
        )
        .route("/{id}/accept", post(answers::accept_answer))
        .layer(middleware::from_fn_with_state(
            auth_mw_state.clone(),
            auth_middleware,
        ))
        .with_state(answer_state);

    // Tag routes (public)
    let tag_routes = Router::new()
        .route("/", get(tags::list_tag_categories))
        .with_state(tag_state);

    // User routes (protected)
    let user_routes = Router::new()
        .route("/me/activity", get(users::my_activity))
        .route("/{id}", delete(users::delete_user))
        .layer(middleware::from_fn_with_state(
            auth_mw_state.clone(),
            auth_middleware,
        ))
        .with_state(user_state.clone());

    // Admin routes (protected, handler checks the role)
    let admin_routes = Router::new()
        .route("/overview", get(users::admin_overview))
        .layer(middleware::from_fn_with_state(
            auth_mw_state,
            auth_middleware,
        ))
        .with_state(user_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check).with_state(health_state))
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Questions
        .nest("/api/v1/questions", question_routes)
        .nest("/api/v1/questions", question_protected_routes)
        .nest("/api/v1/questions", answer_create_routes)
        // Answers
        .nest("/api/v1/answers", answer_routes)
        .nest("/api/v1/answers", answer_protected_routes)
        // Tags
        .nest("/api/v1/tags", tag_routes)
        // Users
        .nest("/api/v1/users", user_routes)
        // Admin
        .nest("/api/v1/admin", admin_routes)
        // Middleware
        .layer(middleware::from_fn_with_state(guard, session_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
