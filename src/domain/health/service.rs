use std::time::{Duration, Instant};

use sea_orm::DatabaseConnection;
use tokio::time::timeout;

use super::dto::{CheckResult, HealthChecks, HealthState, HealthStatus};

/// 서버 시작 시간 (전역)
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// DB ping 타임아웃
const DB_PING_TIMEOUT: Duration = Duration::from_secs(3);

/// 서버 시작 시간 초기화
///
/// main 함수에서 서버 시작 시 호출해야 합니다.
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

pub fn get_uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

/// 전체 헬스 체크 수행
pub async fn check_health(db: &DatabaseConnection) -> HealthStatus {
    let database = check_database(db).await;
    let status = determine_health_state(&database);

    HealthStatus {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: get_uptime_secs(),
        checks: HealthChecks { database },
    }
}

fn determine_health_state(database: &CheckResult) -> HealthState {
    if database.status {
        HealthState::Healthy
    } else {
        HealthState::Unhealthy
    }
}

async fn check_database(db: &DatabaseConnection) -> CheckResult {
    let start = Instant::now();
    let result = timeout(DB_PING_TIMEOUT, db.ping()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(())) => CheckResult::success(latency_ms),
        Ok(Err(e)) => {
            tracing::warn!(latency_ms, error = %e, "database health check failed");
            CheckResult::failure(latency_ms, e.to_string())
        }
        Err(_) => {
            tracing::warn!("database health check timed out");
            CheckResult::timeout(DB_PING_TIMEOUT.as_millis() as u64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_start_time_should_set_once() {
        init_start_time();
        let first = START_TIME.get();
        assert!(first.is_some());

        init_start_time();
        assert_eq!(first, START_TIME.get());
    }

    #[test]
    fn determine_health_state_should_follow_database_check() {
        assert_eq!(
            determine_health_state(&CheckResult::success(2)),
            HealthState::Healthy
        );
        assert_eq!(
            determine_health_state(&CheckResult::failure(2, "down".to_string())),
            HealthState::Unhealthy
        );
        assert_eq!(
            determine_health_state(&CheckResult::timeout(3000)),
            HealthState::Unhealthy
        );
    }
}
