use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 해커톤 참가 등록 (생성 후 변경되지 않음)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registration")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub registration_id: i64,
    pub hackathon_id: i64,
    pub member_id: i64,
    /// 등록 시 입력한 희망 팀 이름 (팀을 만들지는 않음)
    pub team_name: Option<String>,
    pub created_at: DateTime,
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
        belongs_to = "crate::domain::member::entity::member::Entity",
        from = "Column::MemberId",
        to = "crate::domain::member::entity::member::Column::MemberId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Member,
}

impl Related<crate::domain::hackathon::entity::hackathon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hackathon.def()
    }
}

impl Related<crate::domain::member::entity::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
