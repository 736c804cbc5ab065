use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 프로젝트 (외부 프로젝트 서비스가 관리, 소유권/카테고리 조회 전용)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub project_id: i64,
    pub author_id: i64,
    pub title: String,
    pub category: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::submission::entity::submission::Entity")]
    Submission,
}

impl Related<crate::domain::submission::entity::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
