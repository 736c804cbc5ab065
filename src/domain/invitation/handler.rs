use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use validator::Validate;

use super::dto::{InvitationResponse, InviteRequest, MyInvitationItem, TeamInvitationItem};
use super::service::InvitationService;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
use crate::utils::BaseResponse;

/// 팀원 초대 API
///
/// 팀원 누구나 초대할 수 있으며, 초대는 설정된 시간이 지나면 만료됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/hackathons/teams/{teamId}/invite",
    params(("teamId" = i64, Path, description = "팀 ID")),
    request_body = InviteRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "초대 성공", body = InvitationResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "팀원 아님", body = ErrorResponse),
        (status = 404, description = "팀 또는 사용자 없음", body = ErrorResponse),
        (status = 409, description = "정원 초과, 이미 팀 소속, 중복 초대", body = ErrorResponse)
    ),
    tag = "Invitation"
)]
pub async fn invite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<i64>,
    body: Result<Json<InviteRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<InvitationResponse>>, AppError> {
    let Json(req) = body?;
    req.validate()?;

    let member_id = user.user_id()?;
    let result = InvitationService::invite(&state, team_id, member_id, req).await?;

    Ok(Json(BaseResponse::success_with_message(
        result,
        "초대를 보냈습니다.",
    )))
}

/// 팀이 보낸 대기 중 초대 목록 API
#[utoipa::path(
    get,
    path = "/api/v1/hackathons/teams/{teamId}/invites",
    params(("teamId" = i64, Path, description = "팀 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [TeamInvitationItem]),
        (status = 403, description = "팀원 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 팀", body = ErrorResponse)
    ),
    tag = "Invitation"
)]
pub async fn list_team_invites(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<i64>,
) -> Result<Json<BaseResponse<Vec<TeamInvitationItem>>>, AppError> {
    let member_id = user.user_id()?;
    let result = InvitationService::list_team_invites(&state, team_id, member_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 내가 받은 초대 목록 API
#[utoipa::path(
    get,
    path = "/api/v1/hackathons/teams/invites/my",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공", body = [MyInvitationItem]),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Invitation"
)]
pub async fn get_my_invites(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<BaseResponse<Vec<MyInvitationItem>>>, AppError> {
    let member_id = user.user_id()?;
    let result = InvitationService::get_my_invites(&state, member_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 초대 수락 API
#[utoipa::path(
    post,
    path = "/api/v1/hackathons/teams/invites/{invitationId}/accept",
    params(("invitationId" = i64, Path, description = "초대 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수락 성공", body = InvitationResponse),
        (status = 403, description = "초대 당사자 아님 또는 참가 등록 필요", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 초대", body = ErrorResponse),
        (status = 409, description = "이미 처리됨, 만료, 정원 초과, 이미 팀 소속", body = ErrorResponse)
    ),
    tag = "Invitation"
)]
pub async fn accept_invite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(invitation_id): Path<i64>,
) -> Result<Json<BaseResponse<InvitationResponse>>, AppError> {
    let member_id = user.user_id()?;
    let result = InvitationService::accept(&state, invitation_id, member_id).await?;

    Ok(Json(BaseResponse::success_with_message(
        result,
        "팀에 합류했습니다.",
    )))
}

/// 초대 거절 API
#[utoipa::path(
    post,
    path = "/api/v1/hackathons/teams/invites/{invitationId}/reject",
    params(("invitationId" = i64, Path, description = "초대 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "거절 성공", body = InvitationResponse),
        (status = 403, description = "초대 당사자 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 초대", body = ErrorResponse),
        (status = 409, description = "이미 처리됨 또는 만료", body = ErrorResponse)
    ),
    tag = "Invitation"
)]
pub async fn reject_invite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(invitation_id): Path<i64>,
) -> Result<Json<BaseResponse<InvitationResponse>>, AppError> {
    let member_id = user.user_id()?;
    let result = InvitationService::reject(&state, invitation_id, member_id).await?;

    Ok(Json(BaseResponse::success_with_message(
        result,
        "초대를 거절했습니다.",
    )))
}

/// 초대 취소 API (초대한 사람만)
#[utoipa::path(
    delete,
    path = "/api/v1/hackathons/teams/invites/{invitationId}",
    params(("invitationId" = i64, Path, description = "초대 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "취소 성공"),
        (status = 403, description = "초대한 사람 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 초대", body = ErrorResponse),
        (status = 409, description = "이미 처리됨 또는 만료", body = ErrorResponse)
    ),
    tag = "Invitation"
)]
pub async fn cancel_invite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(invitation_id): Path<i64>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    let member_id = user.user_id()?;
    InvitationService::cancel(&state, invitation_id, member_id).await?;

    Ok(Json(BaseResponse::empty("초대를 취소했습니다.")))
}
