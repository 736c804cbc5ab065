use crate::domain::{
    hackathon::entity::hackathon,
    invitation::entity::team_invitation,
    member::entity::member,
    project::entity::project,
    registration::entity::registration,
    submission::entity::{submission, submission_vote},
    team::entity::{team, team_member},
};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema, Statement};
use std::env;
use tracing::info;

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    info!("Successfully connected to the database.");

    let should_update_schema = env::var("DB_SCHEMA_UPDATE")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid DB_SCHEMA_UPDATE value, defaulting to false. Use 'true' or 'false'."
            );
            false
        });

    if should_update_schema {
        create_tables(&db).await?;
    } else {
        info!("Skipping database schema synchronization (DB_SCHEMA_UPDATE is not true).");
    }

    Ok(db)
}

/// 엔티티 기반 테이블과 제약 인덱스 생성
///
/// 동시 요청 경쟁은 아래 유니크 인덱스가 최종적으로 막습니다.
/// - 해커톤별 팀 이름
/// - 해커톤별 사용자 팀 소속 (한 사람당 한 팀)
/// - 해커톤별 참가 등록
/// - 해커톤별 프로젝트 제출
/// - 제출물별 사용자 추천
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    info!("Starting database schema synchronization...");

    // Order matters for foreign keys! (Parent first, then Child)

    // 1. 외부 서비스가 채우는 테이블
    create_table_if_not_exists(db, &schema, member::Entity).await?;
    create_table_if_not_exists(db, &schema, hackathon::Entity).await?;
    create_table_if_not_exists(db, &schema, project::Entity).await?;

    // 2. 해커톤 하위
    create_table_if_not_exists(db, &schema, registration::Entity).await?;
    create_table_if_not_exists(db, &schema, team::Entity).await?;
    create_table_if_not_exists(db, &schema, submission::Entity).await?;

    // 3. 팀/제출물 하위
    create_table_if_not_exists(db, &schema, team_member::Entity).await?;
    create_table_if_not_exists(db, &schema, team_invitation::Entity).await?;
    create_table_if_not_exists(db, &schema, submission_vote::Entity).await?;

    create_unique_index_if_not_exists(
        db,
        "uq_registration_hackathon_member",
        "registration",
        &["hackathon_id", "member_id"],
    )
    .await?;
    create_unique_index_if_not_exists(db, "uq_team_hackathon_name", "team", &["hackathon_id", "name"])
        .await?;
    create_unique_index_if_not_exists(
        db,
        "uq_team_member_hackathon_member",
        "team_member",
        &["hackathon_id", "member_id"],
    )
    .await?;
    create_unique_index_if_not_exists(
        db,
        "uq_submission_hackathon_project",
        "submission",
        &["hackathon_id", "project_id"],
    )
    .await?;
    create_unique_index_if_not_exists(
        db,
        "uq_submission_vote_submission_member",
        "submission_vote",
        &["submission_id", "member_id"],
    )
    .await?;

    // 조회 최적화 인덱스
    create_index_if_not_exists(db, "idx_team_member_team", "team_member", &["team_id"]).await?;
    create_index_if_not_exists(
        db,
        "idx_team_invitation_team",
        "team_invitation",
        &["team_id"],
    )
    .await?;
    create_index_if_not_exists(
        db,
        "idx_team_invitation_invitee",
        "team_invitation",
        &["invitee_id"],
    )
    .await?;

    info!("Database schema synchronization completed.");
    Ok(())
}

/// 이미 존재한다는 에러는 멱등성을 위해 무시
fn is_already_exists(err: &DbErr) -> bool {
    let err_str = err.to_string().to_lowercase();
    err_str.contains("duplicate") || err_str.contains("already exists")
}

async fn create_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    let sql = format!(
        "CREATE INDEX {} ON {} ({})",
        index_name,
        table_name,
        columns.join(", ")
    );
    execute_ddl(db, index_name, sql).await
}

async fn create_unique_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    let sql = format!(
        "CREATE UNIQUE INDEX {} ON {} ({})",
        index_name,
        table_name,
        columns.join(", ")
    );
    execute_ddl(db, index_name, sql).await
}

async fn execute_ddl(db: &DatabaseConnection, name: &str, sql: String) -> Result<(), DbErr> {
    let stmt = Statement::from_string(db.get_database_backend(), sql);
    match db.execute(stmt).await {
        Ok(_) => Ok(()),
        Err(e) if is_already_exists(&e) => Ok(()),
        Err(e) => {
            tracing::error!("Failed to create index {}: {}", name, e);
            Err(e)
        }
    }
}

async fn create_table_if_not_exists<E>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: sea_orm::EntityTrait,
{
    let backend = db.get_database_backend();
    let table_name = entity.table_name().to_string();
    let create_stmt: Statement =
        backend.build(schema.create_table_from_entity(entity).if_not_exists());

    db.execute(create_stmt).await.map(|_| ()).map_err(|e| {
        tracing::error!("Failed to create table {}: {}", table_name, e);
        e
    })
}
