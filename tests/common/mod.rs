//! 통합 테스트 공용 헬퍼
//!
//! 인메모리 SQLite에 운영과 같은 `create_tables` 경로로 스키마를 만듭니다.
//! 연결을 하나만 두기 때문에 트랜잭션 안에서는 같은 커넥션만 쓰입니다.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};

use hackathon_server::config::{database::create_tables, AppConfig};
use hackathon_server::domain::hackathon::entity::hackathon::{self, HackathonStatus};
use hackathon_server::domain::member::entity::member;
use hackathon_server::domain::project::entity::project;
use hackathon_server::domain::registration::dto::RegisterRequest;
use hackathon_server::domain::registration::RegistrationService;
use hackathon_server::domain::team::dto::CreateTeamRequest;
use hackathon_server::domain::team::TeamService;
use hackathon_server::utils::jwt::encode_token;
use hackathon_server::AppState;

pub const TEST_SECRET: &str = "test-secret-key";
pub const HACKATHON_ID: i64 = 1;
pub const HACKATHON_SLUG: &str = "spring-2026";
pub const ORGANIZER_ID: i64 = 100;

pub async fn setup() -> AppState {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt).await.unwrap();
    create_tables(&db).await.unwrap();

    let state = AppState {
        db,
        config: AppConfig::for_database("sqlite::memory:", TEST_SECRET),
    };

    seed_member(&state, ORGANIZER_ID, "organizer").await;
    seed_hackathon(&state, HACKATHON_ID, HACKATHON_SLUG).await;

    state
}

pub async fn seed_member(state: &AppState, member_id: i64, nickname: &str) {
    let now = Utc::now().naive_utc();
    member::ActiveModel {
        member_id: Set(member_id),
        email: Set(format!("{}@example.com", nickname)),
        nickname: Set(Some(nickname.to_string())),
        avatar_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .unwrap();
}

pub async fn seed_members(state: &AppState, member_ids: &[i64]) {
    for id in member_ids {
        seed_member(state, *id, &format!("user{}", id)).await;
    }
}

pub async fn seed_hackathon(state: &AppState, hackathon_id: i64, slug: &str) {
    let now = Utc::now().naive_utc();
    hackathon::ActiveModel {
        hackathon_id: Set(hackathon_id),
        slug: Set(slug.to_string()),
        title: Set(format!("Hackathon {}", slug)),
        status: Set(HackathonStatus::Active),
        organizer_id: Set(ORGANIZER_ID),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .unwrap();
}

pub async fn seed_project(
    state: &AppState,
    project_id: i64,
    author_id: i64,
    category: Option<&str>,
) {
    project::ActiveModel {
        project_id: Set(project_id),
        author_id: Set(author_id),
        title: Set(format!("Project {}", project_id)),
        category: Set(category.map(str::to_string)),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(&state.db)
    .await
    .unwrap();
}

/// 회원 생성 + 기본 해커톤 참가 등록
pub async fn registered_member(state: &AppState, member_id: i64) {
    seed_member(state, member_id, &format!("user{}", member_id)).await;
    RegistrationService::register(
        state,
        &HACKATHON_ID.to_string(),
        member_id,
        RegisterRequest::default(),
    )
    .await
    .unwrap();
}

pub fn team_request(name: &str, max_members: Option<i32>) -> CreateTeamRequest {
    CreateTeamRequest {
        name: name.to_string(),
        description: None,
        avatar_url: None,
        max_members,
        is_open: Some(true),
    }
}

/// 팀장을 등록시키고 팀을 만든 뒤 team_id 반환
pub async fn create_team(
    state: &AppState,
    leader_id: i64,
    name: &str,
    max_members: Option<i32>,
) -> i64 {
    registered_member(state, leader_id).await;
    TeamService::create_team(
        state,
        HACKATHON_SLUG,
        leader_id,
        team_request(name, max_members),
    )
    .await
    .unwrap()
    .team_id
}

pub fn bearer(member_id: i64) -> String {
    let token = encode_token(member_id.to_string(), TEST_SECRET, 3600).unwrap();
    format!("Bearer {}", token)
}

pub fn hours(n: i64) -> Duration {
    Duration::hours(n)
}
