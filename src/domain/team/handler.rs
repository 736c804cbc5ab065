use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use validator::Validate;

use super::dto::{
    CreateTeamRequest, MyTeamResponse, TeamDetailResponse, TeamListItem, TeamListQuery,
    UpdateTeamRequest,
};
use super::service::TeamService;
use crate::state::AppState;
use crate::utils::auth::{AuthUser, OptionalAuthUser};
use crate::utils::error::AppError;
use crate::utils::{BaseResponse, Page};

/// 팀 생성 API
///
/// 참가 등록한 사용자만 만들 수 있으며, 생성자가 팀장이 됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/hackathons/{hackathonId}/teams",
    params(("hackathonId" = String, Path, description = "해커톤 ID 또는 slug")),
    request_body = CreateTeamRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "팀 생성 성공", body = TeamDetailResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 403, description = "참가 등록 필요", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 해커톤", body = ErrorResponse),
        (status = 409, description = "이미 팀 소속 또는 팀 이름 중복", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn create_team(
    State(state): State<AppState>,
    user: AuthUser,
    Path(hackathon_id): Path<String>,
    body: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<TeamDetailResponse>>, AppError> {
    let Json(req) = body?;
    req.validate()?;

    let member_id = user.user_id()?;
    let result = TeamService::create_team(&state, &hackathon_id, member_id, req).await?;

    Ok(Json(BaseResponse::success_with_message(
        result,
        "팀이 생성되었습니다.",
    )))
}

/// 팀 목록 조회 API
#[utoipa::path(
    get,
    path = "/api/v1/hackathons/{hackathonId}/teams",
    params(
        ("hackathonId" = String, Path, description = "해커톤 ID 또는 slug"),
        TeamListQuery
    ),
    responses(
        (status = 200, description = "조회 성공 (items/total/limit/offset)"),
        (status = 400, description = "잘못된 쿼리", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn list_teams(
    State(state): State<AppState>,
    Path(hackathon_id): Path<String>,
    query: Result<Query<TeamListQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<Page<TeamListItem>>>, AppError> {
    let Query(query) = query?;
    let result = TeamService::list_teams(&state, &hackathon_id, query).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 내 팀 조회 API
#[utoipa::path(
    get,
    path = "/api/v1/hackathons/{hackathonId}/my-team",
    params(("hackathonId" = String, Path, description = "해커톤 ID 또는 slug")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공 (팀이 없으면 null)", body = MyTeamResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn get_my_team(
    State(state): State<AppState>,
    user: AuthUser,
    Path(hackathon_id): Path<String>,
) -> Result<Json<BaseResponse<MyTeamResponse>>, AppError> {
    let member_id = user.user_id()?;
    let result = TeamService::get_my_team(&state, &hackathon_id, member_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 팀 상세 조회 API
///
/// 로그인한 팀원이 조회하면 myRole이 채워집니다.
#[utoipa::path(
    get,
    path = "/api/v1/hackathons/teams/{teamId}",
    params(("teamId" = i64, Path, description = "팀 ID")),
    responses(
        (status = 200, description = "조회 성공", body = TeamDetailResponse),
        (status = 401, description = "유효하지 않은 토큰", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 팀", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn get_team(
    State(state): State<AppState>,
    user: OptionalAuthUser,
    Path(team_id): Path<i64>,
) -> Result<Json<BaseResponse<TeamDetailResponse>>, AppError> {
    let viewer_id = user.user_id()?;
    let result = TeamService::get_team(&state, team_id, viewer_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 팀 정보 수정 API (팀장 전용)
#[utoipa::path(
    put,
    path = "/api/v1/hackathons/teams/{teamId}",
    params(("teamId" = i64, Path, description = "팀 ID")),
    request_body = UpdateTeamRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정 성공", body = TeamDetailResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "팀장 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 팀", body = ErrorResponse),
        (status = 409, description = "팀 이름 중복 또는 정원 부족", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn update_team(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<i64>,
    body: Result<Json<UpdateTeamRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<TeamDetailResponse>>, AppError> {
    let Json(req) = body?;
    req.validate()?;
    req.validate_clearable_fields()?;

    let member_id = user.user_id()?;
    let result = TeamService::update_team(&state, team_id, member_id, req).await?;

    Ok(Json(BaseResponse::success_with_message(
        result,
        "팀 정보가 수정되었습니다.",
    )))
}

/// 팀 삭제 API (팀장 전용)
#[utoipa::path(
    delete,
    path = "/api/v1/hackathons/teams/{teamId}",
    params(("teamId" = i64, Path, description = "팀 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 성공"),
        (status = 403, description = "팀장 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 팀", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn delete_team(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<i64>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    let member_id = user.user_id()?;
    TeamService::delete_team(&state, team_id, member_id).await?;

    Ok(Json(BaseResponse::empty("팀이 삭제되었습니다.")))
}

/// 팀 탈퇴 API
#[utoipa::path(
    post,
    path = "/api/v1/hackathons/teams/{teamId}/leave",
    params(("teamId" = i64, Path, description = "팀 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "탈퇴 성공"),
        (status = 403, description = "팀장은 탈퇴 불가", body = ErrorResponse),
        (status = 404, description = "팀 또는 팀원 없음", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn leave_team(
    State(state): State<AppState>,
    user: AuthUser,
    Path(team_id): Path<i64>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    let member_id = user.user_id()?;
    TeamService::leave_team(&state, team_id, member_id).await?;

    Ok(Json(BaseResponse::empty("팀에서 탈퇴했습니다.")))
}

/// 팀원 내보내기 API (팀장 전용)
#[utoipa::path(
    delete,
    path = "/api/v1/hackathons/teams/{teamId}/members/{memberId}",
    params(
        ("teamId" = i64, Path, description = "팀 ID"),
        ("memberId" = i64, Path, description = "내보낼 사용자 ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "내보내기 성공"),
        (status = 403, description = "팀장 아님 또는 팀장 자신", body = ErrorResponse),
        (status = 404, description = "팀 또는 팀원 없음", body = ErrorResponse)
    ),
    tag = "Team"
)]
pub async fn kick_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((team_id, target_id)): Path<(i64, i64)>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    let member_id = user.user_id()?;
    TeamService::kick_member(&state, team_id, member_id, target_id).await?;

    Ok(Json(BaseResponse::empty("팀원을 내보냈습니다.")))
}
