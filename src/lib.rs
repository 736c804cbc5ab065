pub mod config;
pub mod domain;
pub mod global;
pub mod shutdown;
pub mod state;
pub mod utils;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use domain::{health, invitation, registration, submission, team};
pub use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::handler::health_check,
        registration::handler::register,
        registration::handler::get_registration,
        registration::handler::list_participants,
        team::handler::create_team,
        team::handler::list_teams,
        team::handler::get_my_team,
        team::handler::get_team,
        team::handler::update_team,
        team::handler::delete_team,
        team::handler::leave_team,
        team::handler::kick_member,
        invitation::handler::invite,
        invitation::handler::list_team_invites,
        invitation::handler::get_my_invites,
        invitation::handler::accept_invite,
        invitation::handler::reject_invite,
        invitation::handler::cancel_invite,
        submission::handler::create_submission,
        submission::handler::list_submissions,
        submission::handler::get_submission,
        submission::handler::update_submission,
        submission::handler::delete_submission,
        submission::handler::vote_submission,
        submission::handler::score_submission,
        submission::handler::get_stats,
    ),
    components(
        schemas(
            health::dto::HealthStatus,
            health::dto::HealthState,
            health::dto::HealthChecks,
            health::dto::CheckResult,
            registration::dto::RegisterRequest,
            registration::dto::RegistrationResponse,
            registration::dto::RegistrationStatusResponse,
            registration::dto::ParticipantItem,
            team::entity::team_member::TeamRole,
            team::dto::CreateTeamRequest,
            team::dto::UpdateTeamRequest,
            team::dto::TeamMemberItem,
            team::dto::TeamDetailResponse,
            team::dto::TeamListItem,
            team::dto::MyTeamResponse,
            invitation::entity::team_invitation::InvitationStatus,
            invitation::dto::InviteRequest,
            invitation::dto::InvitationResponse,
            invitation::dto::MyInvitationItem,
            invitation::dto::TeamInvitationItem,
            submission::entity::submission::SubmissionStatus,
            submission::dto::CreateSubmissionRequest,
            submission::dto::UpdateSubmissionRequest,
            submission::dto::SubmissionResponse,
            submission::dto::SubmissionSort,
            submission::dto::VoteResponse,
            submission::dto::ScoreRequest,
            submission::dto::CategoryCount,
            submission::dto::HackathonStatsResponse,
            utils::response::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "헬스체크 API"),
        (name = "Registration", description = "해커톤 참가 등록 API"),
        (name = "Team", description = "해커톤 팀 API"),
        (name = "Invitation", description = "팀 초대 API"),
        (name = "Submission", description = "제출/추천/심사 API")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // 참가 등록
        .route(
            "/hackathons/:hackathon_id/register",
            post(registration::handler::register),
        )
        .route(
            "/hackathons/:hackathon_id/registration",
            get(registration::handler::get_registration),
        )
        .route(
            "/hackathons/:hackathon_id/participants",
            get(registration::handler::list_participants),
        )
        // 팀
        .route(
            "/hackathons/:hackathon_id/teams",
            post(team::handler::create_team).get(team::handler::list_teams),
        )
        .route(
            "/hackathons/:hackathon_id/my-team",
            get(team::handler::get_my_team),
        )
        .route(
            "/hackathons/teams/:team_id",
            get(team::handler::get_team)
                .put(team::handler::update_team)
                .delete(team::handler::delete_team),
        )
        .route(
            "/hackathons/teams/:team_id/leave",
            post(team::handler::leave_team),
        )
        .route(
            "/hackathons/teams/:team_id/members/:member_id",
            delete(team::handler::kick_member),
        )
        // 초대
        .route(
            "/hackathons/teams/:team_id/invite",
            post(invitation::handler::invite),
        )
        .route(
            "/hackathons/teams/:team_id/invites",
            get(invitation::handler::list_team_invites),
        )
        .route(
            "/hackathons/teams/invites/my",
            get(invitation::handler::get_my_invites),
        )
        .route(
            "/hackathons/teams/invites/:invitation_id",
            delete(invitation::handler::cancel_invite),
        )
        .route(
            "/hackathons/teams/invites/:invitation_id/accept",
            post(invitation::handler::accept_invite),
        )
        .route(
            "/hackathons/teams/invites/:invitation_id/reject",
            post(invitation::handler::reject_invite),
        )
        // 제출 / 추천 / 심사
        .route(
            "/hackathons/:hackathon_id/submissions",
            post(submission::handler::create_submission).get(submission::handler::list_submissions),
        )
        .route(
            "/hackathons/:hackathon_id/stats",
            get(submission::handler::get_stats),
        )
        .route(
            "/hackathons/submissions/:submission_id",
            get(submission::handler::get_submission)
                .put(submission::handler::update_submission)
                .delete(submission::handler::delete_submission),
        )
        .route(
            "/hackathons/submissions/:submission_id/vote",
            post(submission::handler::vote_submission),
        )
        .route(
            "/hackathons/submissions/:submission_id/score",
            post(submission::handler::score_submission),
        )
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes())
        .layer(middleware::from_fn(global::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
