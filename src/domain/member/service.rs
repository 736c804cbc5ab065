use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::domain::member::entity::member;
use crate::utils::error::AppError;

/// 회원 디렉터리 조회 (표시 정보 조인용)
pub struct MemberService;

impl MemberService {
    /// 회원 존재 여부 확인
    pub async fn ensure_exists<C>(db: &C, member_id: i64) -> Result<member::Model, AppError>
    where
        C: ConnectionTrait,
    {
        member::Entity::find_by_id(member_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::MemberNotFound("존재하지 않는 사용자입니다.".to_string()))
    }

    /// ID 목록으로 회원 일괄 조회
    pub async fn find_by_ids<C>(
        db: &C,
        member_ids: impl IntoIterator<Item = i64>,
    ) -> Result<HashMap<i64, member::Model>, AppError>
    where
        C: ConnectionTrait,
    {
        let mut ids: Vec<i64> = member_ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let members = member::Entity::find()
            .filter(member::Column::MemberId.is_in(ids))
            .all(db)
            .await?;

        Ok(members.into_iter().map(|m| (m.member_id, m)).collect())
    }
}
