//! Answer DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::infrastructure::database::entities::{answer, user};

use super::super::questions::dto::AuthorDto;

/// Answer as returned in question details and activity listings
#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerDto {
    pub id: i32,
    pub content: String,
    pub created_at: String,
    pub like_count: i32,
    pub is_accepted: bool,
    pub question_id: i32,
    pub author: Option<AuthorDto>,
}

impl AnswerDto {
    pub fn new(a: answer::Model, author: Option<user::Model>) -> Self {
        Self {
            id: a.id,
            content: a.content,
            created_at: a.created_at.to_rfc3339(),
            like_count: a.like_count,
            is_accepted: a.is_accepted,
            question_id: a.question_id,
            author: author.map(AuthorDto::from),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAnswerRequest {
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAnswerRequest {
    #[validate(length(min = 1))]
    pub content: String,
}

/// Result of accepting an answer
#[derive(Debug, Serialize, ToSchema)]
pub struct AcceptResultDto {
    pub answer_id: i32,
    pub question_id: i32,
    /// False when the session had already marked an accepted answer for
    /// this question
    pub applied: bool,
}
