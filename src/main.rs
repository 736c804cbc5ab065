use std::net::SocketAddr;

use hackathon_server::config::{establish_connection, AppConfig};
use hackathon_server::domain::health::init_start_time;
use hackathon_server::shutdown::shutdown_signal;
use hackathon_server::utils::logging::init_logging;
use hackathon_server::{app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();
    init_start_time();

    // 2. 설정 로드 및 로깅 초기화 (guard는 종료까지 유지)
    let config = AppConfig::from_env()?;
    let _log_guard = init_logging(&config.log_dir);

    // 3. DB 연결
    let db = establish_connection(&config.database_url).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let state = AppState { db, config };

    // 4. 서버 실행
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
