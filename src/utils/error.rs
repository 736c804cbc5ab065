use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use tracing::{error, warn};

use super::response::ErrorResponse;

/// 애플리케이션 전역 에러 타입
///
/// 각 variant는 HTTP 상태 코드와 고정된 에러 코드에 대응합니다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ===== 400 =====
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("잘못된 요청 형식입니다: {0}")]
    JsonParseFailed(String),

    // ===== 401 =====
    #[error("{0}")]
    Unauthorized(String),

    // ===== 403 =====
    /// 해커톤 참가 등록이 필요한 작업
    #[error("{0}")]
    NotRegistered(String),
    /// 팀장만 가능한 작업
    #[error("{0}")]
    TeamLeaderOnly(String),
    /// 팀원만 가능한 작업
    #[error("{0}")]
    TeamMemberOnly(String),
    /// 팀장은 팀을 떠나거나 스스로를 내보낼 수 없음
    #[error("{0}")]
    LeaderCannotLeave(String),
    /// 초대의 당사자가 아님
    #[error("{0}")]
    InvitationAccessDenied(String),
    /// 제출물 소유자/심사자가 아님
    #[error("{0}")]
    SubmissionAccessDenied(String),

    // ===== 404 =====
    #[error("{0}")]
    HackathonNotFound(String),
    #[error("{0}")]
    MemberNotFound(String),
    #[error("{0}")]
    ProjectNotFound(String),
    #[error("{0}")]
    TeamNotFound(String),
    #[error("{0}")]
    TeamMemberNotFound(String),
    #[error("{0}")]
    InvitationNotFound(String),
    #[error("{0}")]
    SubmissionNotFound(String),

    // ===== 409 =====
    #[error("{0}")]
    AlreadyRegistered(String),
    #[error("{0}")]
    AlreadyInTeam(String),
    #[error("{0}")]
    TeamNameDuplicate(String),
    #[error("{0}")]
    TeamFull(String),
    #[error("{0}")]
    TeamCapacityTooSmall(String),
    #[error("{0}")]
    InvitationDuplicate(String),
    #[error("{0}")]
    InvitationAlreadyResponded(String),
    #[error("{0}")]
    InvitationExpired(String),
    #[error("{0}")]
    SubmissionDuplicate(String),

    // ===== 500 =====
    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    /// 에러 메시지 반환
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// 에러 코드 반환
    pub fn error_code(&self) -> String {
        match self {
            AppError::BadRequest(_) => "COMMON400",
            AppError::ValidationError(_) => "COMMON400",
            AppError::JsonParseFailed(_) => "COMMON400",
            AppError::Unauthorized(_) => "AUTH4001",
            AppError::NotRegistered(_) => "REGISTRATION4031",
            AppError::TeamLeaderOnly(_) => "TEAM4031",
            AppError::TeamMemberOnly(_) => "TEAM4032",
            AppError::LeaderCannotLeave(_) => "TEAM4033",
            AppError::InvitationAccessDenied(_) => "INVITE4031",
            AppError::SubmissionAccessDenied(_) => "SUBMISSION4031",
            AppError::HackathonNotFound(_) => "HACKATHON4041",
            AppError::MemberNotFound(_) => "MEMBER4041",
            AppError::ProjectNotFound(_) => "PROJECT4041",
            AppError::TeamNotFound(_) => "TEAM4041",
            AppError::TeamMemberNotFound(_) => "TEAM4042",
            AppError::InvitationNotFound(_) => "INVITE4041",
            AppError::SubmissionNotFound(_) => "SUBMISSION4041",
            AppError::AlreadyRegistered(_) => "REGISTRATION4091",
            AppError::AlreadyInTeam(_) => "TEAM4091",
            AppError::TeamNameDuplicate(_) => "TEAM4092",
            AppError::TeamFull(_) => "TEAM4093",
            AppError::TeamCapacityTooSmall(_) => "TEAM4094",
            AppError::InvitationDuplicate(_) => "INVITE4091",
            AppError::InvitationAlreadyResponded(_) => "INVITE4092",
            AppError::InvitationExpired(_) => "INVITE4093",
            AppError::SubmissionDuplicate(_) => "SUBMISSION4091",
            AppError::InternalError(_) => "COMMON500",
        }
        .to_string()
    }

    /// HTTP 상태 코드 반환
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::ValidationError(_) | AppError::JsonParseFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotRegistered(_)
            | AppError::TeamLeaderOnly(_)
            | AppError::TeamMemberOnly(_)
            | AppError::LeaderCannotLeave(_)
            | AppError::InvitationAccessDenied(_)
            | AppError::SubmissionAccessDenied(_) => StatusCode::FORBIDDEN,
            AppError::HackathonNotFound(_)
            | AppError::MemberNotFound(_)
            | AppError::ProjectNotFound(_)
            | AppError::TeamNotFound(_)
            | AppError::TeamMemberNotFound(_)
            | AppError::InvitationNotFound(_)
            | AppError::SubmissionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyRegistered(_)
            | AppError::AlreadyInTeam(_)
            | AppError::TeamNameDuplicate(_)
            | AppError::TeamFull(_)
            | AppError::TeamCapacityTooSmall(_)
            | AppError::InvitationDuplicate(_)
            | AppError::InvitationAlreadyResponded(_)
            | AppError::InvitationExpired(_)
            | AppError::SubmissionDuplicate(_) => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.message();

        match &self {
            AppError::InternalError(_) => {
                error!("Internal Server Error: {}", message);
            }
            _ => {
                warn!(code = %error_code, "Error [{}]: {}", error_code, message);
            }
        }

        let error_response = ErrorResponse::new(error_code, message);

        (status, Json(error_response)).into_response()
    }
}

/// JsonRejection을 AppError로 변환
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::JsonParseFailed(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// validator 검증 실패를 400으로 변환 (첫 번째 메시지 사용)
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "입력값이 올바르지 않습니다.".to_string());
        AppError::ValidationError(message)
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::InternalError(err.to_string())
    }
}

/// DB 유니크 제약 위반 여부
///
/// 드라이버가 에러 코드를 제공하지 않는 경우 메시지로 판별합니다.
pub fn is_unique_violation(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    let error_msg = err.to_string().to_lowercase();
    error_msg.contains("duplicate") || error_msg.contains("unique constraint")
}
