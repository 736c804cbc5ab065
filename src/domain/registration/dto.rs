use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::registration;
use crate::domain::member::entity::member;

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// 희망 팀 이름 (참고용, 팀을 만들지 않음)
    #[validate(length(min = 1, max = 50, message = "팀 이름은 1~50자여야 합니다."))]
    pub team_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub registration_id: i64,
    pub hackathon_id: i64,
    pub member_id: i64,
    pub team_name: Option<String>,
    pub registered_at: NaiveDateTime,
}

impl From<registration::Model> for RegistrationResponse {
    fn from(model: registration::Model) -> Self {
        Self {
            registration_id: model.registration_id,
            hackathon_id: model.hackathon_id,
            member_id: model.member_id,
            team_name: model.team_name,
            registered_at: model.created_at,
        }
    }
}

/// 등록 여부 조회 결과 (미등록도 정상 응답)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatusResponse {
    pub is_registered: bool,
    pub registration: Option<RegistrationResponse>,
}

impl RegistrationStatusResponse {
    pub fn not_registered() -> Self {
        Self {
            is_registered: false,
            registration: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantItem {
    pub member_id: i64,
    pub nickname: String,
    pub avatar_url: Option<String>,
    pub team_name: Option<String>,
    pub registered_at: NaiveDateTime,
}

impl ParticipantItem {
    pub fn new(registration: registration::Model, member: Option<member::Model>) -> Self {
        let (nickname, avatar_url) = match member {
            Some(m) => (m.display_name(), m.avatar_url),
            None => (format!("member-{}", registration.member_id), None),
        };

        Self {
            member_id: registration.member_id,
            nickname,
            avatar_url,
            team_name: registration.team_name,
            registered_at: registration.created_at,
        }
    }
}
