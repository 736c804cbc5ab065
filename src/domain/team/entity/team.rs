use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub team_id: i64,
    pub hackathon_id: i64,
    /// 해커톤 내에서 유일 (uq_team_hackathon_name)
    pub name: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub leader_id: i64,
    pub max_members: i32,
    /// 모집 중 표시용 (가입은 초대로만 가능)
    pub is_open: bool,
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
    #[sea_orm(has_many = "super::team_member::Entity")]
    TeamMember,
    #[sea_orm(has_many = "crate::domain::invitation::entity::team_invitation::Entity")]
    TeamInvitation,
}

impl Related<crate::domain::hackathon::entity::hackathon::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hackathon.def()
    }
}

impl Related<super::team_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMember.def()
    }
}

impl Related<crate::domain::invitation::entity::team_invitation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamInvitation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
