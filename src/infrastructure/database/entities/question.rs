//! Question entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Question model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// URL slug derived from the title
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Incremented at most once per visitor session
    pub view_count: i32,
    /// Incremented at most once per visitor session
    pub like_count: i32,
    /// Whether one of this question's answers has been accepted
    pub accepted_answer: bool,
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::answer::Entity")]
    Answers,
    #[sea_orm(has_many = "super::question_tag::Entity")]
    QuestionTags,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::answer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::question_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::question_tag::Relation::Question.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Build the URL slug for a question title.
pub fn slugify(title: &str) -> String {
    title.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn slug_joins_lowercased_words_with_dashes() {
        assert_eq!(slugify("How Do I Borrow"), "how-do-i-borrow");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
        assert_eq!(slugify("one"), "one");
    }
}
