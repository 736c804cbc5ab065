use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 제출물 추천 (행의 존재 여부가 곧 추천 상태)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission_vote")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub submission_vote_id: i64,
    pub submission_id: i64,
    pub member_id: i64,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submission::Entity",
        from = "Column::SubmissionId",
        to = "super::submission::Column::SubmissionId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Submission,
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
