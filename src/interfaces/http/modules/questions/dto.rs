//! Question DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::infrastructure::database::entities::{question, user};

/// Question author as embedded in question responses
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorDto {
    pub id: String,
    pub username: String,
}

impl From<user::Model> for AuthorDto {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
        }
    }
}

/// Question as returned in listings and details
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionDto {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub created_at: String,
    pub view_count: i32,
    pub like_count: i32,
    pub accepted_answer: bool,
    pub author: Option<AuthorDto>,
    pub tags: Vec<String>,
    /// Number of answers this question has
    pub answer_count: u64,
}

impl QuestionDto {
    pub fn new(
        q: question::Model,
        author: Option<user::Model>,
        tags: Vec<String>,
        answer_count: u64,
    ) -> Self {
        Self {
            id: q.id,
            title: q.title,
            slug: q.slug,
            content: q.content,
            created_at: q.created_at.to_rfc3339(),
            view_count: q.view_count,
            like_count: q.like_count,
            accepted_answer: q.accepted_answer,
            author: author.map(AuthorDto::from),
            tags,
            answer_count,
        }
    }
}

/// Sort order for question listings
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSort {
    /// Newest first (default)
    #[default]
    Newest,
    /// Oldest first
    Oldest,
    /// Most viewed first
    Views,
}

/// Query parameters for the question listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuestionsParams {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    pub page: u32,
    /// Sort order: newest, oldest or views
    #[serde(default)]
    pub sort: QuestionSort,
    /// Filter on accepted-answer state (true = solved, false = open)
    pub solved: Option<bool>,
    /// Only questions carrying this tag
    pub tag: Option<String>,
    /// Search in title, content, author username and tag names
    pub q: Option<String>,
}

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    /// Tag names; blanks are discarded, the rest lowercased
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
}

/// Result of a guarded counter action (view or like)
#[derive(Debug, Serialize, ToSchema)]
pub struct CounterDto {
    /// Counter value after the request
    pub count: i32,
    /// Whether this request actually incremented the counter; false when
    /// the session had already performed the action
    pub applied: bool,
}

/// Question detail including its answers
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionDetailDto {
    #[serde(flatten)]
    pub question: QuestionDto,
    pub answers: Vec<super::super::answers::dto::AnswerDto>,
}
