use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::entity::team;
use super::entity::team_member::{self, TeamRole};
use crate::domain::member::entity::member;
use crate::utils::error::AppError;
use crate::utils::pagination::PageQuery;
use crate::utils::patch::double_option;

/// 팀 기본 정원
pub const DEFAULT_MAX_MEMBERS: i32 = 5;
/// 팀 최대 정원
pub const MAX_TEAM_CAPACITY: i32 = 20;
pub const TEAM_DESCRIPTION_MAX_LENGTH: usize = 500;

/// 현재 인원이 정원 이상이면 가득 찬 팀
pub fn is_full(member_count: u64, max_members: i32) -> bool {
    member_count as i64 >= i64::from(max_members)
}

// ============== 팀 생성 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 50, message = "팀 이름은 1~50자여야 합니다."))]
    pub name: String,

    #[validate(length(max = 500, message = "팀 소개는 500자를 초과할 수 없습니다."))]
    pub description: Option<String>,

    #[validate(url(message = "유효한 URL 형식이 아닙니다."))]
    pub avatar_url: Option<String>,

    /// 정원 (기본 5)
    #[validate(range(min = 1, max = 20, message = "팀 정원은 1~20명이어야 합니다."))]
    pub max_members: Option<i32>,

    /// 모집 중 표시 (기본 false)
    pub is_open: Option<bool>,
}

// ============== 팀 수정 ==============

/// 팀 수정 요청
///
/// 보내지 않은 필드는 변경하지 않습니다. description/avatarUrl은 `null`로 비울 수 있습니다.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 50, message = "팀 이름은 1~50자여야 합니다."))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub avatar_url: Option<Option<String>>,

    #[validate(range(min = 1, max = 20, message = "팀 정원은 1~20명이어야 합니다."))]
    pub max_members: Option<i32>,

    pub is_open: Option<bool>,
}

impl UpdateTeamRequest {
    /// validator가 다루지 않는 비울 수 있는 필드 검증
    pub fn validate_clearable_fields(&self) -> Result<(), AppError> {
        if let Some(Some(description)) = &self.description {
            if description.chars().count() > TEAM_DESCRIPTION_MAX_LENGTH {
                return Err(AppError::ValidationError(
                    "팀 소개는 500자를 초과할 수 없습니다.".to_string(),
                ));
            }
        }
        if let Some(Some(avatar_url)) = &self.avatar_url {
            if !validator::ValidateUrl::validate_url(avatar_url) {
                return Err(AppError::ValidationError(
                    "유효한 URL 형식이 아닙니다.".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// 바꿀 필드가 하나도 없는 요청
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.avatar_url.is_none()
            && self.max_members.is_none()
            && self.is_open.is_none()
    }
}

// ============== 조회 ==============

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberItem {
    pub member_id: i64,
    pub nickname: String,
    pub avatar_url: Option<String>,
    pub role: TeamRole,
    pub joined_at: NaiveDateTime,
}

impl TeamMemberItem {
    pub fn new(membership: team_member::Model, member: Option<member::Model>) -> Self {
        let (nickname, avatar_url) = match member {
            Some(m) => (m.display_name(), m.avatar_url),
            None => (format!("member-{}", membership.member_id), None),
        };

        Self {
            member_id: membership.member_id,
            nickname,
            avatar_url,
            role: membership.role,
            joined_at: membership.joined_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetailResponse {
    pub team_id: i64,
    pub hackathon_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub leader_id: i64,
    pub max_members: i32,
    pub is_open: bool,
    pub member_count: u64,
    pub is_full: bool,
    /// 팀장 먼저, 이후 가입순
    pub members: Vec<TeamMemberItem>,
    /// 조회자가 팀원이면 역할
    pub my_role: Option<TeamRole>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TeamDetailResponse {
    pub fn new(team: team::Model, members: Vec<TeamMemberItem>, viewer_id: Option<i64>) -> Self {
        let member_count = members.len() as u64;
        let my_role = viewer_id.and_then(|viewer| {
            members
                .iter()
                .find(|m| m.member_id == viewer)
                .map(|m| m.role)
        });

        Self {
            team_id: team.team_id,
            hackathon_id: team.hackathon_id,
            name: team.name,
            description: team.description,
            avatar_url: team.avatar_url,
            leader_id: team.leader_id,
            max_members: team.max_members,
            is_open: team.is_open,
            member_count,
            is_full: is_full(member_count, team.max_members),
            members,
            my_role,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamListItem {
    pub team_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub leader_id: i64,
    pub max_members: i32,
    pub is_open: bool,
    pub member_count: u64,
    pub is_full: bool,
    pub created_at: NaiveDateTime,
}

impl TeamListItem {
    pub fn new(team: team::Model, member_count: u64) -> Self {
        Self {
            team_id: team.team_id,
            name: team.name,
            description: team.description,
            avatar_url: team.avatar_url,
            leader_id: team.leader_id,
            max_members: team.max_members,
            is_open: team.is_open,
            member_count,
            is_full: is_full(member_count, team.max_members),
            created_at: team.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TeamListQuery {
    /// 팀 이름 부분 검색
    pub search: Option<String>,
    /// 모집 중 여부 필터
    pub is_open: Option<bool>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl TeamListQuery {
    pub fn page(&self) -> PageQuery {
        PageQuery {
            limit: self.limit,
            offset: self.offset,
        }
    }

    /// 공백만 있는 검색어는 무시
    pub fn search_keyword(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }
}

/// 내 팀 조회 결과 (팀이 없으면 둘 다 null)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyTeamResponse {
    pub team: Option<TeamDetailResponse>,
    pub role: Option<TeamRole>,
}

impl MyTeamResponse {
    pub fn none() -> Self {
        Self {
            team: None,
            role: None,
        }
    }
}
