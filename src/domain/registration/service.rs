use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::info;

use super::dto::{ParticipantItem, RegisterRequest, RegistrationResponse, RegistrationStatusResponse};
use super::entity::registration;
use crate::domain::hackathon::HackathonResolver;
use crate::domain::member::entity::member;
use crate::domain::member::MemberService;
use crate::state::AppState;
use crate::utils::error::{is_unique_violation, AppError};
use crate::utils::pagination::PageQuery;
use crate::utils::Page;

pub struct RegistrationService;

impl RegistrationService {
    /// 해커톤 참가 등록
    pub async fn register(
        state: &AppState,
        hackathon_key: &str,
        member_id: i64,
        req: RegisterRequest,
    ) -> Result<RegistrationResponse, AppError> {
        let hackathon = HackathonResolver::resolve_for_write(&state.db, hackathon_key).await?;
        MemberService::ensure_exists(&state.db, member_id).await?;

        // 1. 중복 등록 확인 (친절한 에러 메시지용, 최종 판단은 유니크 인덱스)
        if Self::find(&state.db, hackathon.hackathon_id, member_id)
            .await?
            .is_some()
        {
            return Err(Self::already_registered());
        }

        // 2. 등록 저장
        let team_name = req
            .team_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let inserted = registration::ActiveModel {
            hackathon_id: Set(hackathon.hackathon_id),
            member_id: Set(member_id),
            team_name: Set(team_name),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Self::already_registered()
            } else {
                AppError::from(e)
            }
        })?;

        info!(
            hackathon_id = hackathon.hackathon_id,
            member_id = member_id,
            "member registered for hackathon"
        );

        Ok(inserted.into())
    }

    /// 등록 여부 조회 (미등록/미존재 해커톤도 에러 없이 응답)
    pub async fn get_registration(
        state: &AppState,
        hackathon_key: &str,
        member_id: i64,
    ) -> Result<RegistrationStatusResponse, AppError> {
        let Some(hackathon) = HackathonResolver::resolve(&state.db, hackathon_key).await? else {
            return Ok(RegistrationStatusResponse::not_registered());
        };

        let status = match Self::find(&state.db, hackathon.hackathon_id, member_id).await? {
            Some(model) => RegistrationStatusResponse {
                is_registered: true,
                registration: Some(model.into()),
            },
            None => RegistrationStatusResponse::not_registered(),
        };

        Ok(status)
    }

    /// 참가자 목록 (최신 등록순)
    pub async fn list_participants(
        state: &AppState,
        hackathon_key: &str,
        page: PageQuery,
    ) -> Result<Page<ParticipantItem>, AppError> {
        let (limit, offset) = (page.limit(), page.offset());

        let Some(hackathon) = HackathonResolver::resolve(&state.db, hackathon_key).await? else {
            return Ok(Page::empty(limit, offset));
        };

        let base = registration::Entity::find()
            .filter(registration::Column::HackathonId.eq(hackathon.hackathon_id));

        let total = base.clone().count(&state.db).await?;

        let rows = base
            .find_also_related(member::Entity)
            .order_by_desc(registration::Column::CreatedAt)
            .order_by_desc(registration::Column::RegistrationId)
            .offset(offset)
            .limit(limit)
            .all(&state.db)
            .await?;

        let items = rows
            .into_iter()
            .map(|(registration, member)| ParticipantItem::new(registration, member))
            .collect();

        Ok(Page {
            items,
            total,
            limit,
            offset,
        })
    }

    /// 팀 생성/가입 전 등록 확인
    pub async fn ensure_registered<C>(db: &C, hackathon_id: i64, member_id: i64) -> Result<(), AppError>
    where
        C: ConnectionTrait,
    {
        match Self::find(db, hackathon_id, member_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotRegistered(
                "해커톤 참가 등록이 필요합니다.".to_string(),
            )),
        }
    }

    /// 해커톤 참가자 수
    pub async fn count_participants<C>(db: &C, hackathon_id: i64) -> Result<u64, AppError>
    where
        C: ConnectionTrait,
    {
        let count = registration::Entity::find()
            .filter(registration::Column::HackathonId.eq(hackathon_id))
            .count(db)
            .await?;
        Ok(count)
    }

    async fn find<C>(
        db: &C,
        hackathon_id: i64,
        member_id: i64,
    ) -> Result<Option<registration::Model>, AppError>
    where
        C: ConnectionTrait,
    {
        let found = registration::Entity::find()
            .filter(registration::Column::HackathonId.eq(hackathon_id))
            .filter(registration::Column::MemberId.eq(member_id))
            .one(db)
            .await?;
        Ok(found)
    }

    fn already_registered() -> AppError {
        AppError::AlreadyRegistered("이미 참가 등록된 해커톤입니다.".to_string())
    }
}
