use axum::{
    async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts,
};

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::jwt::{decode_access_token, Claims};

/// 인증된 사용자 정보를 담는 Extractor
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// JWT Claims에서 사용자 ID를 추출합니다.
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("유효하지 않은 사용자 ID입니다.".to_string()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?
            .ok_or_else(|| AppError::Unauthorized("로그인이 필요합니다.".to_string()))?;

        let claims = decode_access_token(&token, &state.config.jwt_secret)?;

        Ok(AuthUser(claims))
    }
}

/// 로그인하지 않아도 되는 API용 Extractor
///
/// 헤더가 없으면 `None`, 헤더가 있는데 유효하지 않으면 401을 반환합니다.
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Result<Option<i64>, AppError> {
        self.0.as_ref().map(AuthUser::user_id).transpose()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match extract_bearer_token(parts)? {
            Some(token) => {
                let claims = decode_access_token(&token, &state.config.jwt_secret)?;
                Ok(OptionalAuthUser(Some(AuthUser(claims))))
            }
            None => Ok(OptionalAuthUser(None)),
        }
    }
}

/// Authorization 헤더에서 Bearer 토큰 추출
fn extract_bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(auth_header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_header_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("잘못된 헤더 형식입니다.".to_string()))?;

    let token = auth_header_str
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("토큰 형식이 올바르지 않습니다.".to_string()))?;

    Ok(Some(token.to_string()))
}
