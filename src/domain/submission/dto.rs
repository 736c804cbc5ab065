use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::entity::submission::{self, SubmissionStatus};
use crate::utils::error::AppError;
use crate::utils::pagination::PageQuery;
use crate::utils::patch::double_option;

pub const NOTES_MAX_LENGTH: usize = 2000;
/// 프로젝트에 카테고리가 없을 때 통계에 쓰는 이름
pub const UNCATEGORIZED: &str = "UNCATEGORIZED";

// ============== 제출 ==============

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    #[validate(range(min = 1, message = "유효하지 않은 프로젝트 ID입니다."))]
    pub project_id: i64,

    #[validate(url(message = "유효한 URL 형식이 아닙니다."))]
    pub pitch_video_url: Option<String>,

    #[validate(url(message = "유효한 URL 형식이 아닙니다."))]
    pub pitch_deck_url: Option<String>,

    #[validate(length(max = 2000, message = "메모는 2000자를 초과할 수 없습니다."))]
    pub notes: Option<String>,
}

/// 제출물 수정 요청 (`null`은 값 비우기, 생략은 유지)
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubmissionRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub pitch_video_url: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub pitch_deck_url: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl UpdateSubmissionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        for url in [&self.pitch_video_url, &self.pitch_deck_url]
            .into_iter()
            .flatten()
            .flatten()
        {
            if !validator::ValidateUrl::validate_url(url) {
                return Err(AppError::ValidationError(
                    "유효한 URL 형식이 아닙니다.".to_string(),
                ));
            }
        }
        if let Some(Some(notes)) = &self.notes {
            if notes.chars().count() > NOTES_MAX_LENGTH {
                return Err(AppError::ValidationError(
                    "메모는 2000자를 초과할 수 없습니다.".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// 비어 있지 않은 발표 영상 URL을 보냈는지
    pub fn supplies_pitch_video(&self) -> bool {
        matches!(&self.pitch_video_url, Some(Some(url)) if !url.trim().is_empty())
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub submission_id: i64,
    pub hackathon_id: i64,
    pub project_id: i64,
    pub project_title: Option<String>,
    pub member_id: i64,
    pub pitch_video_url: Option<String>,
    pub pitch_deck_url: Option<String>,
    pub notes: Option<String>,
    pub status: SubmissionStatus,
    pub judge_score: Option<i32>,
    pub judge_feedback: Option<String>,
    pub vote_count: u64,
    pub has_voted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SubmissionResponse {
    pub fn new(
        model: submission::Model,
        project_title: Option<String>,
        vote_count: u64,
        has_voted: bool,
    ) -> Self {
        Self {
            submission_id: model.submission_id,
            hackathon_id: model.hackathon_id,
            project_id: model.project_id,
            project_title,
            member_id: model.member_id,
            pitch_video_url: model.pitch_video_url,
            pitch_deck_url: model.pitch_deck_url,
            notes: model.notes,
            status: model.status,
            judge_score: model.judge_score,
            judge_feedback: model.judge_feedback,
            vote_count,
            has_voted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

// ============== 목록 ==============

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionSort {
    /// 최신 제출순
    #[default]
    Recent,
    /// 추천 많은 순
    Votes,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListQuery {
    /// recent | votes (기본 recent)
    #[param(value_type = Option<String>)]
    pub sort: Option<SubmissionSort>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SubmissionListQuery {
    pub fn page(&self) -> PageQuery {
        PageQuery {
            limit: self.limit,
            offset: self.offset,
        }
    }

    pub fn sort(&self) -> SubmissionSort {
        self.sort.unwrap_or_default()
    }
}

// ============== 추천 / 심사 ==============

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub submission_id: i64,
    pub vote_count: u64,
    pub has_voted: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    /// 0~100
    #[validate(range(min = 0, max = 100, message = "점수는 0~100 사이여야 합니다."))]
    pub score: i32,

    #[validate(length(max = 2000, message = "심사평은 2000자를 초과할 수 없습니다."))]
    pub feedback: Option<String>,
}

// ============== 통계 ==============

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HackathonStatsResponse {
    pub submission_count: u64,
    pub participant_count: u64,
    pub team_count: u64,
    pub vote_count: u64,
    /// 제출 수 내림차순, 같으면 이름순
    pub categories: Vec<CategoryCount>,
}
