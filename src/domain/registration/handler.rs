use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use validator::Validate;

use super::dto::{ParticipantItem, RegisterRequest, RegistrationResponse, RegistrationStatusResponse};
use super::service::RegistrationService;
use crate::state::AppState;
use crate::utils::auth::AuthUser;
use crate::utils::error::AppError;
use crate::utils::pagination::PageQuery;
use crate::utils::{BaseResponse, Page};

/// 해커톤 참가 등록 API
///
/// 팀은 만들지 않으며, body의 teamName은 참고용입니다. body는 생략할 수 있습니다.
#[utoipa::path(
    post,
    path = "/api/v1/hackathons/{hackathonId}/register",
    params(("hackathonId" = String, Path, description = "해커톤 ID 또는 slug")),
    request_body = RegisterRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "등록 성공", body = RegistrationResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 해커톤", body = ErrorResponse),
        (status = 409, description = "이미 등록됨", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn register(
    State(state): State<AppState>,
    user: AuthUser,
    Path(hackathon_id): Path<String>,
    body: Option<Json<RegisterRequest>>,
) -> Result<Json<BaseResponse<RegistrationResponse>>, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    req.validate()?;

    let member_id = user.user_id()?;
    let result = RegistrationService::register(&state, &hackathon_id, member_id, req).await?;

    Ok(Json(BaseResponse::success_with_message(
        result,
        "해커톤 참가 등록이 완료되었습니다.",
    )))
}

/// 내 참가 등록 여부 조회 API
#[utoipa::path(
    get,
    path = "/api/v1/hackathons/{hackathonId}/registration",
    params(("hackathonId" = String, Path, description = "해커톤 ID 또는 slug")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "조회 성공 (미등록 포함)", body = RegistrationStatusResponse),
        (status = 401, description = "인증 실패", body = ErrorResponse)
    ),
    tag = "Registration"
)]
pub async fn get_registration(
    State(state): State<AppState>,
    user: AuthUser,
    Path(hackathon_id): Path<String>,
) -> Result<Json<BaseResponse<RegistrationStatusResponse>>, AppError> {
    let member_id = user.user_id()?;
    let result = RegistrationService::get_registration(&state, &hackathon_id, member_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 참가자 목록 조회 API
#[utoipa::path(
    get,
    path = "/api/v1/hackathons/{hackathonId}/participants",
    params(
        ("hackathonId" = String, Path, description = "해커톤 ID 또는 slug"),
        PageQuery
    ),
    responses(
        (status = 200, description = "조회 성공 (items/total/limit/offset)")
    ),
    tag = "Registration"
)]
pub async fn list_participants(
    State(state): State<AppState>,
    Path(hackathon_id): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<Page<ParticipantItem>>>, AppError> {
    let Query(page) = query?;
    let result = RegistrationService::list_participants(&state, &hackathon_id, page).await?;

    Ok(Json(BaseResponse::success(result)))
}
