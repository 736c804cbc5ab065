use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use super::entity::hackathon;
use crate::utils::error::AppError;

/// 해커톤 식별자 해석기
///
/// 경로의 `{hackathonId}`에는 숫자 ID 또는 slug가 올 수 있습니다.
/// 조회 API는 해석 실패 시 빈 결과를 돌려주고, 변경 API는 404로 실패합니다.
pub struct HackathonResolver;

impl HackathonResolver {
    /// 양의 10진수 문자열이면 정규 ID로 간주
    pub fn parse_canonical_id(id_or_slug: &str) -> Option<i64> {
        if id_or_slug.is_empty() || !id_or_slug.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        id_or_slug.parse::<i64>().ok().filter(|id| *id > 0)
    }

    /// 조회용 해석 (없으면 `None`)
    pub async fn resolve<C>(db: &C, id_or_slug: &str) -> Result<Option<hackathon::Model>, AppError>
    where
        C: ConnectionTrait,
    {
        let id_or_slug = id_or_slug.trim();

        let found = match Self::parse_canonical_id(id_or_slug) {
            Some(id) => hackathon::Entity::find_by_id(id).one(db).await?,
            None => {
                hackathon::Entity::find()
                    .filter(hackathon::Column::Slug.eq(id_or_slug))
                    .one(db)
                    .await?
            }
        };

        if found.is_none() {
            tracing::debug!(id_or_slug = %id_or_slug, "hackathon not resolved");
        }

        Ok(found)
    }

    /// 변경용 해석 (없으면 404)
    pub async fn resolve_for_write<C>(db: &C, id_or_slug: &str) -> Result<hackathon::Model, AppError>
    where
        C: ConnectionTrait,
    {
        Self::resolve(db, id_or_slug)
            .await?
            .ok_or_else(|| AppError::HackathonNotFound("존재하지 않는 해커톤입니다.".to_string()))
    }
}
