//! User profile and admin DTOs

use serde::Serialize;
use utoipa::ToSchema;

use super::super::auth::dto::UserInfo;
use crate::infrastructure::database::entities::{answer, question};

/// Question row as shown on profile and admin pages
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionSummaryDto {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub created_at: String,
    pub view_count: i32,
    pub like_count: i32,
    pub accepted_answer: bool,
    pub user_id: String,
}

impl From<question::Model> for QuestionSummaryDto {
    fn from(q: question::Model) -> Self {
        Self {
            id: q.id,
            title: q.title,
            slug: q.slug,
            created_at: q.created_at.to_rfc3339(),
            view_count: q.view_count,
            like_count: q.like_count,
            accepted_answer: q.accepted_answer,
            user_id: q.user_id,
        }
    }
}

/// Answer row as shown on profile and admin pages
#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerSummaryDto {
    pub id: i32,
    pub content: String,
    pub created_at: String,
    pub like_count: i32,
    pub is_accepted: bool,
    pub question_id: i32,
    pub user_id: String,
}

impl From<answer::Model> for AnswerSummaryDto {
    fn from(a: answer::Model) -> Self {
        Self {
            id: a.id,
            content: a.content,
            created_at: a.created_at.to_rfc3339(),
            like_count: a.like_count,
            is_accepted: a.is_accepted,
            question_id: a.question_id,
            user_id: a.user_id,
        }
    }
}

/// The current user's own contributions
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityDto {
    pub user: UserInfo,
    pub questions: Vec<QuestionSummaryDto>,
    pub answers: Vec<AnswerSummaryDto>,
}

/// Admin dashboard payload: everything at a glance
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOverviewDto {
    pub users: Vec<UserInfo>,
    pub questions: Vec<QuestionSummaryDto>,
    pub answers: Vec<AnswerSummaryDto>,
}
