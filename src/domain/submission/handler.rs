use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use validator::Validate;

use super::dto::{
    CreateSubmissionRequest, HackathonStatsResponse, ScoreRequest, SubmissionListQuery,
    SubmissionResponse, UpdateSubmissionRequest, VoteResponse,
};
use super::service::SubmissionService;
use crate::state::AppState;
use crate::utils::auth::{AuthUser, OptionalAuthUser};
use crate::utils::error::AppError;
use crate::utils::{BaseResponse, Page};

/// 프로젝트 제출 API
#[utoipa::path(
    post,
    path = "/api/v1/hackathons/{hackathonId}/submissions",
    params(("hackathonId" = String, Path, description = "해커톤 ID 또는 slug")),
    request_body = CreateSubmissionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "제출 성공", body = SubmissionResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "본인 프로젝트 아님", body = ErrorResponse),
        (status = 404, description = "해커톤 또는 프로젝트 없음", body = ErrorResponse),
        (status = 409, description = "이미 제출된 프로젝트", body = ErrorResponse)
    ),
    tag = "Submission"
)]
pub async fn create_submission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(hackathon_id): Path<String>,
    body: Result<Json<CreateSubmissionRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<SubmissionResponse>>, AppError> {
    let Json(req) = body?;
    req.validate()?;

    let member_id = user.user_id()?;
    let result =
        SubmissionService::create_submission(&state, &hackathon_id, member_id, req).await?;

    Ok(Json(BaseResponse::success_with_message(
        result,
        "제출이 완료되었습니다.",
    )))
}

/// 제출물 목록 API
#[utoipa::path(
    get,
    path = "/api/v1/hackathons/{hackathonId}/submissions",
    params(
        ("hackathonId" = String, Path, description = "해커톤 ID 또는 slug"),
        SubmissionListQuery
    ),
    responses(
        (status = 200, description = "조회 성공 (items/total/limit/offset)"),
        (status = 400, description = "잘못된 쿼리", body = ErrorResponse)
    ),
    tag = "Submission"
)]
pub async fn list_submissions(
    State(state): State<AppState>,
    user: OptionalAuthUser,
    Path(hackathon_id): Path<String>,
    query: Result<Query<SubmissionListQuery>, QueryRejection>,
) -> Result<Json<BaseResponse<Page<SubmissionResponse>>>, AppError> {
    let Query(query) = query?;
    let viewer_id = user.user_id()?;
    let result =
        SubmissionService::list_submissions(&state, &hackathon_id, query, viewer_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 제출물 상세 조회 API
#[utoipa::path(
    get,
    path = "/api/v1/hackathons/submissions/{submissionId}",
    params(("submissionId" = i64, Path, description = "제출물 ID")),
    responses(
        (status = 200, description = "조회 성공", body = SubmissionResponse),
        (status = 404, description = "존재하지 않는 제출물", body = ErrorResponse)
    ),
    tag = "Submission"
)]
pub async fn get_submission(
    State(state): State<AppState>,
    user: OptionalAuthUser,
    Path(submission_id): Path<i64>,
) -> Result<Json<BaseResponse<SubmissionResponse>>, AppError> {
    let viewer_id = user.user_id()?;
    let result = SubmissionService::get_submission(&state, submission_id, viewer_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 제출물 수정 API
///
/// DRAFT 상태에서 발표 영상을 등록하면 SUBMITTED로 바뀝니다.
#[utoipa::path(
    put,
    path = "/api/v1/hackathons/submissions/{submissionId}",
    params(("submissionId" = i64, Path, description = "제출물 ID")),
    request_body = UpdateSubmissionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정 성공", body = SubmissionResponse),
        (status = 400, description = "잘못된 요청", body = ErrorResponse),
        (status = 403, description = "제출자 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 제출물", body = ErrorResponse)
    ),
    tag = "Submission"
)]
pub async fn update_submission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(submission_id): Path<i64>,
    body: Result<Json<UpdateSubmissionRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<SubmissionResponse>>, AppError> {
    let Json(req) = body?;
    req.validate()?;

    let member_id = user.user_id()?;
    let result =
        SubmissionService::update_submission(&state, submission_id, member_id, req).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 제출물 삭제 API
#[utoipa::path(
    delete,
    path = "/api/v1/hackathons/submissions/{submissionId}",
    params(("submissionId" = i64, Path, description = "제출물 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "삭제 성공"),
        (status = 403, description = "제출자 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 제출물", body = ErrorResponse)
    ),
    tag = "Submission"
)]
pub async fn delete_submission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(submission_id): Path<i64>,
) -> Result<Json<BaseResponse<()>>, AppError> {
    let member_id = user.user_id()?;
    SubmissionService::delete_submission(&state, submission_id, member_id).await?;

    Ok(Json(BaseResponse::empty("제출물이 삭제되었습니다.")))
}

/// 추천 토글 API
#[utoipa::path(
    post,
    path = "/api/v1/hackathons/submissions/{submissionId}/vote",
    params(("submissionId" = i64, Path, description = "제출물 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "토글 성공", body = VoteResponse),
        (status = 404, description = "존재하지 않는 제출물", body = ErrorResponse)
    ),
    tag = "Submission"
)]
pub async fn vote_submission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(submission_id): Path<i64>,
) -> Result<Json<BaseResponse<VoteResponse>>, AppError> {
    let member_id = user.user_id()?;
    let result = SubmissionService::vote(&state, submission_id, member_id).await?;

    Ok(Json(BaseResponse::success(result)))
}

/// 심사 점수 입력 API (주최자 전용)
#[utoipa::path(
    post,
    path = "/api/v1/hackathons/submissions/{submissionId}/score",
    params(("submissionId" = i64, Path, description = "제출물 ID")),
    request_body = ScoreRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "심사 성공", body = SubmissionResponse),
        (status = 400, description = "잘못된 점수 또는 미제출 상태", body = ErrorResponse),
        (status = 403, description = "주최자 아님", body = ErrorResponse),
        (status = 404, description = "존재하지 않는 제출물", body = ErrorResponse)
    ),
    tag = "Submission"
)]
pub async fn score_submission(
    State(state): State<AppState>,
    user: AuthUser,
    Path(submission_id): Path<i64>,
    body: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<SubmissionResponse>>, AppError> {
    let Json(req) = body?;
    req.validate()?;

    let judge_id = user.user_id()?;
    let result = SubmissionService::score(&state, submission_id, judge_id, req).await?;

    Ok(Json(BaseResponse::success_with_message(
        result,
        "심사 점수가 저장되었습니다.",
    )))
}

/// 해커톤 통계 API
#[utoipa::path(
    get,
    path = "/api/v1/hackathons/{hackathonId}/stats",
    params(("hackathonId" = String, Path, description = "해커톤 ID 또는 slug")),
    responses(
        (status = 200, description = "조회 성공 (해커톤이 없으면 0)", body = HackathonStatsResponse)
    ),
    tag = "Submission"
)]
pub async fn get_stats(
    State(state): State<AppState>,
    Path(hackathon_id): Path<String>,
) -> Result<Json<BaseResponse<HackathonStatsResponse>>, AppError> {
    let result = SubmissionService::get_stats(&state, &hackathon_id).await?;

    Ok(Json(BaseResponse::success(result)))
}
