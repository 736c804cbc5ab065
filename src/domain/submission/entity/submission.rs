use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 제출 상태
///
/// DRAFT -> SUBMITTED -> JUDGED 방향으로만 이동합니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "SUBMITTED")]
    Submitted,
    #[sea_orm(string_value = "JUDGED")]
    Judged,
}

/// 해커톤 제출물 (프로젝트 단위, 팀과 직접 연결되지 않음)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub submission_id: i64,
    pub hackathon_id: i64,
    pub project_id: i64,
    /// 제출자
    pub member_id: i64,
    pub pitch_video_url: Option<String>,
    pub pitch_deck_url: Option<String>,
    pub notes: Option<String>,
    pub status: SubmissionStatus,
    pub judge_score: Option<i32>,
    pub judge_feedback: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::hackathon::entity::hackathon::Entity",
        from = "Column::HackathonId",
        to = "crate::domain::hackathon::entity::hackathon::Column::HackathonId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Hackathon,
    #[sea_orm(
        belongs_to = "crate::domain::project::entity::project::Entity",
        from = "Column::ProjectId",
        to = "crate::domain::project::entity::project::Column::ProjectId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Project,
    #[sea_orm(has_many = "super::submission_vote::Entity")]
    SubmissionVote,
}

impl Related<crate::domain::hackathon::entity::hackathon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hackathon.def()
    }
}

impl Related<crate::domain::project::entity::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::submission_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubmissionVote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
