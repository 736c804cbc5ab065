use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info};

use super::dto::{InvitationResponse, InviteRequest, MyInvitationItem, TeamInvitationItem};
use super::entity::team_invitation::{self, InvitationStatus};
use crate::domain::member::MemberService;
use crate::domain::registration::RegistrationService;
use crate::domain::team::entity::team;
use crate::domain::team::entity::team_member::{self, TeamRole};
use crate::domain::team::dto::is_full;
use crate::domain::team::TeamService;
use crate::state::AppState;
use crate::utils::error::{is_unique_violation, AppError};

/// 초대에 대한 응답 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Response {
    Accept,
    Reject,
    Cancel,
}

pub struct InvitationService;

impl InvitationService {
    /// 팀원 초대
    pub async fn invite(
        state: &AppState,
        team_id: i64,
        inviter_id: i64,
        req: InviteRequest,
    ) -> Result<InvitationResponse, AppError> {
        // 1. 팀 / 초대 대상 / 초대자 권한 확인
        TeamService::find_team(&state.db, team_id).await?;
        MemberService::ensure_exists(&state.db, req.invitee_id).await?;

        if TeamService::find_membership(&state.db, team_id, inviter_id)
            .await?
            .is_none()
        {
            return Err(AppError::TeamMemberOnly(
                "팀원만 초대할 수 있습니다.".to_string(),
            ));
        }

        // 2. 팀 행을 잠근 채로 정원/소속/중복 초대 확인 후 저장
        let now = Utc::now().naive_utc();
        let txn = state.db.begin().await?;

        let team = TeamService::lock_team(&txn, team_id).await?;
        let member_count = TeamService::count_members(&txn, team_id).await?;
        if is_full(member_count, team.max_members) {
            return Err(Self::team_full());
        }

        if TeamService::find_membership_in_hackathon(&txn, team.hackathon_id, req.invitee_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyInTeam(
                "초대 대상이 이미 이 해커톤의 팀에 소속되어 있습니다.".to_string(),
            ));
        }

        let existing = team_invitation::Entity::find()
            .filter(team_invitation::Column::TeamId.eq(team_id))
            .filter(team_invitation::Column::InviteeId.eq(req.invitee_id))
            .filter(team_invitation::Column::Status.eq(InvitationStatus::Pending))
            .all(&txn)
            .await?;

        for pending in existing {
            if pending.is_stale(now) {
                Self::expire(&txn, pending.invitation_id).await?;
            } else {
                return Err(AppError::InvitationDuplicate(
                    "이미 대기 중인 초대가 있습니다.".to_string(),
                ));
            }
        }

        let expires_at = Duration::try_hours(state.config.invite_expiration_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::InternalError("Invalid invite expiration".into()))?;

        let message = req
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let inserted = team_invitation::ActiveModel {
            team_id: Set(team_id),
            inviter_id: Set(inviter_id),
            invitee_id: Set(req.invitee_id),
            message: Set(message),
            status: Set(InvitationStatus::Pending),
            created_at: Set(now),
            expires_at: Set(expires_at),
            responded_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            invitation_id = inserted.invitation_id,
            team_id = team_id,
            inviter_id = inviter_id,
            invitee_id = req.invitee_id,
            "team invitation created"
        );

        Ok(inserted.into())
    }

    /// 초대 수락 (초대받은 사용자만)
    pub async fn accept(
        state: &AppState,
        invitation_id: i64,
        member_id: i64,
    ) -> Result<InvitationResponse, AppError> {
        let now = Utc::now().naive_utc();
        let invitation =
            Self::ensure_respondable(&state.db, invitation_id, member_id, Response::Accept, now)
                .await?;

        let team = TeamService::find_team(&state.db, invitation.team_id).await?;
        RegistrationService::ensure_registered(&state.db, team.hackathon_id, member_id).await?;

        let txn = state.db.begin().await?;

        // 정원 확인과 멤버 추가는 팀 행 잠금 아래에서만
        let team = TeamService::lock_team(&txn, team.team_id).await?;

        if TeamService::find_membership_in_hackathon(&txn, team.hackathon_id, member_id)
            .await?
            .is_some()
        {
            return Err(Self::already_in_team());
        }

        let member_count = TeamService::count_members(&txn, team.team_id).await?;
        if is_full(member_count, team.max_members) {
            return Err(Self::team_full());
        }

        Self::transition(&txn, invitation_id, InvitationStatus::Accepted, now).await?;

        team_member::ActiveModel {
            team_id: Set(team.team_id),
            hackathon_id: Set(team.hackathon_id),
            member_id: Set(member_id),
            role: Set(TeamRole::Member),
            joined_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Self::already_in_team()
            } else {
                AppError::from(e)
            }
        })?;

        txn.commit().await?;

        info!(
            invitation_id = invitation_id,
            team_id = team.team_id,
            member_id = member_id,
            "team invitation accepted"
        );

        Ok(InvitationResponse {
            status: InvitationStatus::Accepted,
            responded_at: Some(now),
            ..invitation.into()
        })
    }

    /// 초대 거절 (초대받은 사용자만)
    pub async fn reject(
        state: &AppState,
        invitation_id: i64,
        member_id: i64,
    ) -> Result<InvitationResponse, AppError> {
        let now = Utc::now().naive_utc();
        let invitation =
            Self::ensure_respondable(&state.db, invitation_id, member_id, Response::Reject, now)
                .await?;

        Self::transition(&state.db, invitation_id, InvitationStatus::Rejected, now).await?;

        info!(
            invitation_id = invitation_id,
            team_id = invitation.team_id,
            member_id = member_id,
            "team invitation rejected"
        );

        Ok(InvitationResponse {
            status: InvitationStatus::Rejected,
            responded_at: Some(now),
            ..invitation.into()
        })
    }

    /// 초대 취소 (초대한 사용자만, 행 삭제)
    pub async fn cancel(
        state: &AppState,
        invitation_id: i64,
        member_id: i64,
    ) -> Result<(), AppError> {
        let now = Utc::now().naive_utc();
        let invitation =
            Self::ensure_respondable(&state.db, invitation_id, member_id, Response::Cancel, now)
                .await?;

        let result = team_invitation::Entity::delete_many()
            .filter(team_invitation::Column::InvitationId.eq(invitation_id))
            .filter(team_invitation::Column::Status.eq(InvitationStatus::Pending))
            .exec(&state.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(Self::already_responded());
        }

        info!(
            invitation_id = invitation_id,
            team_id = invitation.team_id,
            inviter_id = member_id,
            "team invitation cancelled"
        );

        Ok(())
    }

    /// 내가 받은 대기 중 초대 (최신순)
    pub async fn get_my_invites(
        state: &AppState,
        member_id: i64,
    ) -> Result<Vec<MyInvitationItem>, AppError> {
        let now = Utc::now().naive_utc();

        let pending = team_invitation::Entity::find()
            .filter(team_invitation::Column::InviteeId.eq(member_id))
            .filter(team_invitation::Column::Status.eq(InvitationStatus::Pending))
            .order_by_desc(team_invitation::Column::CreatedAt)
            .order_by_desc(team_invitation::Column::InvitationId)
            .all(&state.db)
            .await?;

        let live = Self::drop_stale(&state.db, pending, now).await?;
        if live.is_empty() {
            return Ok(Vec::new());
        }

        let team_ids: Vec<i64> = live.iter().map(|i| i.team_id).collect();
        let teams: HashMap<i64, team::Model> = team::Entity::find()
            .filter(team::Column::TeamId.is_in(team_ids))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|t| (t.team_id, t))
            .collect();
        let inviters =
            MemberService::find_by_ids(&state.db, live.iter().map(|i| i.inviter_id)).await?;

        let items = live
            .into_iter()
            .filter_map(|invitation| {
                let team = teams.get(&invitation.team_id)?;
                let inviter = inviters.get(&invitation.inviter_id);
                Some(MyInvitationItem::new(invitation, team, inviter))
            })
            .collect();

        Ok(items)
    }

    /// 팀이 보낸 대기 중 초대 (팀원 전용)
    pub async fn list_team_invites(
        state: &AppState,
        team_id: i64,
        member_id: i64,
    ) -> Result<Vec<TeamInvitationItem>, AppError> {
        TeamService::find_team(&state.db, team_id).await?;

        if TeamService::find_membership(&state.db, team_id, member_id)
            .await?
            .is_none()
        {
            return Err(AppError::TeamMemberOnly(
                "팀원만 조회할 수 있습니다.".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let pending = team_invitation::Entity::find()
            .filter(team_invitation::Column::TeamId.eq(team_id))
            .filter(team_invitation::Column::Status.eq(InvitationStatus::Pending))
            .order_by_desc(team_invitation::Column::CreatedAt)
            .order_by_desc(team_invitation::Column::InvitationId)
            .all(&state.db)
            .await?;

        let live = Self::drop_stale(&state.db, pending, now).await?;
        let invitees =
            MemberService::find_by_ids(&state.db, live.iter().map(|i| i.invitee_id)).await?;

        Ok(live
            .into_iter()
            .map(|invitation| {
                let invitee = invitees.get(&invitation.invitee_id);
                TeamInvitationItem::new(invitation, invitee)
            })
            .collect())
    }

    // ============== 내부 헬퍼 ==============

    /// 응답 가능한 초대인지 확인
    ///
    /// 존재, 당사자, PENDING, 만료 순으로 검사합니다. 만료된 초대는 EXPIRED로 저장한 뒤 실패합니다.
    async fn ensure_respondable<C>(
        db: &C,
        invitation_id: i64,
        member_id: i64,
        response: Response,
        now: NaiveDateTime,
    ) -> Result<team_invitation::Model, AppError>
    where
        C: ConnectionTrait,
    {
        let invitation = team_invitation::Entity::find_by_id(invitation_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                AppError::InvitationNotFound("존재하지 않는 초대입니다.".to_string())
            })?;

        let party = match response {
            Response::Accept | Response::Reject => invitation.invitee_id,
            Response::Cancel => invitation.inviter_id,
        };
        if party != member_id {
            return Err(AppError::InvitationAccessDenied(
                "해당 초대에 대한 권한이 없습니다.".to_string(),
            ));
        }

        if invitation.status != InvitationStatus::Pending {
            return Err(Self::already_responded());
        }

        if invitation.is_stale(now) {
            Self::expire(db, invitation.invitation_id).await?;
            return Err(AppError::InvitationExpired(
                "만료된 초대입니다.".to_string(),
            ));
        }

        Ok(invitation)
    }

    /// PENDING인 경우에만 상태 변경 (동시 응답 중 하나만 성공)
    async fn transition<C>(
        db: &C,
        invitation_id: i64,
        status: InvitationStatus,
        now: NaiveDateTime,
    ) -> Result<(), AppError>
    where
        C: ConnectionTrait,
    {
        let result = team_invitation::Entity::update_many()
            .set(team_invitation::ActiveModel {
                status: Set(status),
                responded_at: Set(Some(now)),
                ..Default::default()
            })
            .filter(team_invitation::Column::InvitationId.eq(invitation_id))
            .filter(team_invitation::Column::Status.eq(InvitationStatus::Pending))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(Self::already_responded());
        }
        Ok(())
    }

    async fn expire<C>(db: &C, invitation_id: i64) -> Result<(), AppError>
    where
        C: ConnectionTrait,
    {
        Self::expire_all(db, vec![invitation_id]).await
    }

    async fn expire_all<C>(db: &C, invitation_ids: Vec<i64>) -> Result<(), AppError>
    where
        C: ConnectionTrait,
    {
        if invitation_ids.is_empty() {
            return Ok(());
        }

        let result = team_invitation::Entity::update_many()
            .set(team_invitation::ActiveModel {
                status: Set(InvitationStatus::Expired),
                ..Default::default()
            })
            .filter(team_invitation::Column::InvitationId.is_in(invitation_ids))
            .filter(team_invitation::Column::Status.eq(InvitationStatus::Pending))
            .exec(db)
            .await?;

        debug!(expired = result.rows_affected, "stale invitations expired");
        Ok(())
    }

    /// 만료된 초대는 EXPIRED로 저장하고 나머지만 반환
    async fn drop_stale<C>(
        db: &C,
        invitations: Vec<team_invitation::Model>,
        now: NaiveDateTime,
    ) -> Result<Vec<team_invitation::Model>, AppError>
    where
        C: ConnectionTrait,
    {
        let (stale, live): (Vec<_>, Vec<_>) =
            invitations.into_iter().partition(|i| i.is_stale(now));

        Self::expire_all(db, stale.iter().map(|i| i.invitation_id).collect()).await?;

        Ok(live)
    }

    fn team_full() -> AppError {
        AppError::TeamFull("팀 정원이 가득 찼습니다.".to_string())
    }

    fn already_in_team() -> AppError {
        AppError::AlreadyInTeam("이미 이 해커톤의 팀에 소속되어 있습니다.".to_string())
    }

    fn already_responded() -> AppError {
        AppError::InvitationAlreadyResponded("이미 처리된 초대입니다.".to_string())
    }
}
