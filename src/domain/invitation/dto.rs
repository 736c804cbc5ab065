use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::entity::team_invitation::{self, InvitationStatus};
use crate::domain::member::entity::member;
use crate::domain::team::entity::team;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    /// 초대할 사용자 ID
    #[validate(range(min = 1, message = "유효하지 않은 사용자 ID입니다."))]
    pub invitee_id: i64,

    #[validate(length(max = 500, message = "초대 메시지는 500자를 초과할 수 없습니다."))]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub invitation_id: i64,
    pub team_id: i64,
    pub inviter_id: i64,
    pub invitee_id: i64,
    pub message: Option<String>,
    pub status: InvitationStatus,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub responded_at: Option<NaiveDateTime>,
}

impl From<team_invitation::Model> for InvitationResponse {
    fn from(model: team_invitation::Model) -> Self {
        Self {
            invitation_id: model.invitation_id,
            team_id: model.team_id,
            inviter_id: model.inviter_id,
            invitee_id: model.invitee_id,
            message: model.message,
            status: model.status,
            created_at: model.created_at,
            expires_at: model.expires_at,
            responded_at: model.responded_at,
        }
    }
}

/// 내가 받은 초대 항목
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyInvitationItem {
    pub invitation_id: i64,
    pub team_id: i64,
    pub team_name: String,
    pub hackathon_id: i64,
    pub inviter_id: i64,
    pub inviter_nickname: String,
    pub message: Option<String>,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl MyInvitationItem {
    pub fn new(
        invitation: team_invitation::Model,
        team: &team::Model,
        inviter: Option<&member::Model>,
    ) -> Self {
        Self {
            invitation_id: invitation.invitation_id,
            team_id: team.team_id,
            team_name: team.name.clone(),
            hackathon_id: team.hackathon_id,
            inviter_id: invitation.inviter_id,
            inviter_nickname: nickname_or_fallback(inviter, invitation.inviter_id),
            message: invitation.message,
            created_at: invitation.created_at,
            expires_at: invitation.expires_at,
        }
    }
}

/// 팀이 보낸 대기 중 초대 항목
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamInvitationItem {
    pub invitation_id: i64,
    pub invitee_id: i64,
    pub invitee_nickname: String,
    pub invitee_avatar_url: Option<String>,
    pub inviter_id: i64,
    pub message: Option<String>,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl TeamInvitationItem {
    pub fn new(invitation: team_invitation::Model, invitee: Option<&member::Model>) -> Self {
        Self {
            invitation_id: invitation.invitation_id,
            invitee_id: invitation.invitee_id,
            invitee_nickname: nickname_or_fallback(invitee, invitation.invitee_id),
            invitee_avatar_url: invitee.and_then(|m| m.avatar_url.clone()),
            inviter_id: invitation.inviter_id,
            message: invitation.message,
            created_at: invitation.created_at,
            expires_at: invitation.expires_at,
        }
    }
}

fn nickname_or_fallback(member: Option<&member::Model>, member_id: i64) -> String {
    member
        .map(member::Model::display_name)
        .unwrap_or_else(|| format!("member-{}", member_id))
}
