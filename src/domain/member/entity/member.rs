use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 회원 디렉터리 (외부 인증 서비스가 관리, 표시 정보 조회 전용)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub member_id: i64,
    pub email: String,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    /// 표시용 이름 (닉네임이 없으면 이메일 @ 앞부분)
    pub fn display_name(&self) -> String {
        match &self.nickname {
            Some(nickname) if !nickname.trim().is_empty() => nickname.clone(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or(&self.email)
                .to_string(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::team::entity::team_member::Entity")]
    TeamMember,
    #[sea_orm(has_many = "crate::domain::registration::entity::registration::Entity")]
    Registration,
}

impl Related<crate::domain::team::entity::team_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamMember.def()
    }
}

impl Related<crate::domain::registration::entity::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registration.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn member(nickname: Option<&str>) -> Model {
        let now = Utc::now().naive_utc();
        Model {
            member_id: 1,
            email: "hacker@example.com".to_string(),
            nickname: nickname.map(str::to_string),
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn display_name_should_prefer_nickname() {
        assert_eq!(member(Some("해커")).display_name(), "해커");
    }

    #[test]
    fn display_name_should_fall_back_to_email_local_part() {
        assert_eq!(member(None).display_name(), "hacker");
        assert_eq!(member(Some("  ")).display_name(), "hacker");
    }
}
