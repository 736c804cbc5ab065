use std::env;

/// 초대 기본 유효 기간 (7일)
const DEFAULT_INVITE_EXPIRATION_HOURS: i64 = 24 * 7;

/// 초대 유효 시간 상한 (10년)
const MAX_INVITE_EXPIRATION_HOURS: i64 = 24 * 365 * 10;

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub log_dir: String,
    /// 팀 초대 유효 시간 (시간 단위)
    pub invite_expiration_hours: i64,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!(
                "JWT_SECRET 환경변수가 설정되지 않았습니다. 프로덕션 환경에서는 반드시 설정하세요."
            );
            "secret".to_string()
        });

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let invite_expiration_hours = match env::var("INVITE_EXPIRATION_HOURS") {
            Ok(raw) => parse_expiration_hours(&raw)?,
            Err(_) => DEFAULT_INVITE_EXPIRATION_HOURS,
        };

        Ok(Self {
            server_port,
            database_url,
            jwt_secret,
            log_dir,
            invite_expiration_hours,
        })
    }

    /// 테스트 및 로컬 실행용 설정
    pub fn for_database(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            server_port: 8080,
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            log_dir: "logs".to_string(),
            invite_expiration_hours: DEFAULT_INVITE_EXPIRATION_HOURS,
        }
    }
}

fn parse_expiration_hours(raw: &str) -> Result<i64, ConfigError> {
    match raw.parse::<i64>() {
        Ok(hours) if (1..=MAX_INVITE_EXPIRATION_HOURS).contains(&hours) => Ok(hours),
        _ => Err(ConfigError::InvalidExpiration),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Invalid invite expiration hours")]
    InvalidExpiration,
    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,
}
