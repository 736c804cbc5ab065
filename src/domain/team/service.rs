use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use super::dto::{
    CreateTeamRequest, MyTeamResponse, TeamDetailResponse, TeamListItem, TeamListQuery,
    TeamMemberItem, UpdateTeamRequest, DEFAULT_MAX_MEMBERS,
};
use super::entity::team;
use super::entity::team_member::{self, TeamRole};
use crate::domain::hackathon::HackathonResolver;
use crate::domain::invitation::entity::team_invitation;
use crate::domain::member::entity::member;
use crate::domain::registration::RegistrationService;
use crate::state::AppState;
use crate::utils::error::{is_unique_violation, AppError};
use crate::utils::Page;

pub struct TeamService;

impl TeamService {
    /// 팀 생성 (생성자가 팀장)
    pub async fn create_team(
        state: &AppState,
        hackathon_key: &str,
        leader_id: i64,
        req: CreateTeamRequest,
    ) -> Result<TeamDetailResponse, AppError> {
        let hackathon = HackathonResolver::resolve_for_write(&state.db, hackathon_key).await?;
        let hackathon_id = hackathon.hackathon_id;
        let name = normalize_name(&req.name)?;

        // 1. 참가 등록 확인
        RegistrationService::ensure_registered(&state.db, hackathon_id, leader_id).await?;

        // 2. 해커톤 내 다른 팀 소속 여부
        if Self::find_membership_in_hackathon(&state.db, hackathon_id, leader_id)
            .await?
            .is_some()
        {
            return Err(Self::already_in_team());
        }

        // 3. 팀 + 팀장 멤버십을 한 트랜잭션으로 저장
        let now = Utc::now().naive_utc();
        let txn = state.db.begin().await?;

        let team = team::ActiveModel {
            hackathon_id: Set(hackathon_id),
            name: Set(name),
            description: Set(req.description),
            avatar_url: Set(req.avatar_url),
            leader_id: Set(leader_id),
            max_members: Set(req.max_members.unwrap_or(DEFAULT_MAX_MEMBERS)),
            is_open: Set(req.is_open.unwrap_or(false)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Self::name_duplicate()
            } else {
                AppError::from(e)
            }
        })?;

        team_member::ActiveModel {
            team_id: Set(team.team_id),
            hackathon_id: Set(hackathon_id),
            member_id: Set(leader_id),
            role: Set(TeamRole::Leader),
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
            team_id = team.team_id,
            hackathon_id = hackathon_id,
            leader_id = leader_id,
            "team created"
        );

        Self::build_detail(&state.db, team, Some(leader_id)).await
    }

    /// 팀 상세 조회
    pub async fn get_team(
        state: &AppState,
        team_id: i64,
        viewer_id: Option<i64>,
    ) -> Result<TeamDetailResponse, AppError> {
        let team = Self::find_team(&state.db, team_id).await?;
        Self::build_detail(&state.db, team, viewer_id).await
    }

    /// 해커톤 내 내 팀 조회 (팀이 없으면 null)
    pub async fn get_my_team(
        state: &AppState,
        hackathon_key: &str,
        member_id: i64,
    ) -> Result<MyTeamResponse, AppError> {
        let Some(hackathon) = HackathonResolver::resolve(&state.db, hackathon_key).await? else {
            return Ok(MyTeamResponse::none());
        };

        let Some(membership) =
            Self::find_membership_in_hackathon(&state.db, hackathon.hackathon_id, member_id).await?
        else {
            return Ok(MyTeamResponse::none());
        };

        let Some(team) = team::Entity::find_by_id(membership.team_id)
            .one(&state.db)
            .await?
        else {
            return Ok(MyTeamResponse::none());
        };

        let detail = Self::build_detail(&state.db, team, Some(member_id)).await?;

        Ok(MyTeamResponse {
            team: Some(detail),
            role: Some(membership.role),
        })
    }

    /// 팀 목록 (최신 생성순)
    pub async fn list_teams(
        state: &AppState,
        hackathon_key: &str,
        query: TeamListQuery,
    ) -> Result<Page<TeamListItem>, AppError> {
        let page = query.page();
        let (limit, offset) = (page.limit(), page.offset());

        let Some(hackathon) = HackathonResolver::resolve(&state.db, hackathon_key).await? else {
            return Ok(Page::empty(limit, offset));
        };

        let mut base =
            team::Entity::find().filter(team::Column::HackathonId.eq(hackathon.hackathon_id));

        if let Some(keyword) = query.search_keyword() {
            let pattern = format!("%{}%", escape_like(keyword));
            base = base
                .filter(team::Column::Name.like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)));
        }
        if let Some(is_open) = query.is_open {
            base = base.filter(team::Column::IsOpen.eq(is_open));
        }

        let total = base.clone().count(&state.db).await?;

        let teams = base
            .order_by_desc(team::Column::CreatedAt)
            .order_by_desc(team::Column::TeamId)
            .offset(offset)
            .limit(limit)
            .all(&state.db)
            .await?;

        let counts =
            Self::count_members_by_team(&state.db, teams.iter().map(|t| t.team_id)).await?;

        let items = teams
            .into_iter()
            .map(|team| {
                let member_count = counts.get(&team.team_id).copied().unwrap_or(0);
                TeamListItem::new(team, member_count)
            })
            .collect();

        Ok(Page {
            items,
            total,
            limit,
            offset,
        })
    }

    /// 팀 정보 수정 (팀장 전용)
    pub async fn update_team(
        state: &AppState,
        team_id: i64,
        requester_id: i64,
        req: UpdateTeamRequest,
    ) -> Result<TeamDetailResponse, AppError> {
        if req.is_empty() {
            return Err(AppError::BadRequest("수정할 항목이 없습니다.".to_string()));
        }

        let txn = state.db.begin().await?;

        let team = Self::lock_team(&txn, team_id).await?;
        Self::ensure_leader(&team, requester_id)?;

        let mut active = team.clone().into_active_model();

        if let Some(name) = req.name.as_deref() {
            let name = normalize_name(name)?;
            if name != team.name {
                let taken = team::Entity::find()
                    .filter(team::Column::HackathonId.eq(team.hackathon_id))
                    .filter(team::Column::Name.eq(name.as_str()))
                    .filter(team::Column::TeamId.ne(team.team_id))
                    .one(&txn)
                    .await?;
                if taken.is_some() {
                    return Err(Self::name_duplicate());
                }
                active.name = Set(name);
            }
        }

        if let Some(max_members) = req.max_members {
            let member_count = Self::count_members(&txn, team.team_id).await?;
            if (member_count as i64) > i64::from(max_members) {
                return Err(AppError::TeamCapacityTooSmall(format!(
                    "현재 팀원 수({})보다 작은 정원으로 변경할 수 없습니다.",
                    member_count
                )));
            }
            active.max_members = Set(max_members);
        }

        if let Some(description) = req.description {
            active.description = Set(description);
        }
        if let Some(avatar_url) = req.avatar_url {
            active.avatar_url = Set(avatar_url);
        }
        if let Some(is_open) = req.is_open {
            active.is_open = Set(is_open);
        }
        active.updated_at = Set(Utc::now().naive_utc());

        let updated = active.update(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                Self::name_duplicate()
            } else {
                AppError::from(e)
            }
        })?;

        txn.commit().await?;

        info!(team_id = team_id, leader_id = requester_id, "team updated");

        Self::build_detail(&state.db, updated, Some(requester_id)).await
    }

    /// 팀 삭제 (팀장 전용, 초대와 멤버십을 함께 삭제)
    pub async fn delete_team(
        state: &AppState,
        team_id: i64,
        requester_id: i64,
    ) -> Result<(), AppError> {
        let txn = state.db.begin().await?;

        let team = Self::lock_team(&txn, team_id).await?;
        Self::ensure_leader(&team, requester_id)?;

        let invitations = team_invitation::Entity::delete_many()
            .filter(team_invitation::Column::TeamId.eq(team_id))
            .exec(&txn)
            .await?;
        let memberships = team_member::Entity::delete_many()
            .filter(team_member::Column::TeamId.eq(team_id))
            .exec(&txn)
            .await?;
        team::Entity::delete_by_id(team_id).exec(&txn).await?;

        txn.commit().await?;

        info!(
            team_id = team_id,
            hackathon_id = team.hackathon_id,
            deleted_invitations = invitations.rows_affected,
            deleted_memberships = memberships.rows_affected,
            "team deleted"
        );

        Ok(())
    }

    /// 팀 탈퇴 (팀장은 불가)
    pub async fn leave_team(state: &AppState, team_id: i64, member_id: i64) -> Result<(), AppError> {
        let team = Self::find_team(&state.db, team_id).await?;

        if team.leader_id == member_id {
            return Err(AppError::LeaderCannotLeave(
                "팀장은 팀을 탈퇴할 수 없습니다. 팀을 삭제해주세요.".to_string(),
            ));
        }

        Self::remove_membership(&state.db, team_id, member_id).await?;

        info!(team_id = team_id, member_id = member_id, "member left team");

        Ok(())
    }

    /// 팀원 내보내기 (팀장 전용)
    pub async fn kick_member(
        state: &AppState,
        team_id: i64,
        requester_id: i64,
        target_id: i64,
    ) -> Result<(), AppError> {
        let team = Self::find_team(&state.db, team_id).await?;
        Self::ensure_leader(&team, requester_id)?;

        if target_id == team.leader_id {
            return Err(AppError::LeaderCannotLeave(
                "팀장은 스스로를 내보낼 수 없습니다.".to_string(),
            ));
        }

        Self::remove_membership(&state.db, team_id, target_id).await?;

        info!(
            team_id = team_id,
            leader_id = requester_id,
            member_id = target_id,
            "member removed from team"
        );

        Ok(())
    }

    // ============== 다른 도메인에서 쓰는 조회 ==============

    pub async fn find_team<C>(db: &C, team_id: i64) -> Result<team::Model, AppError>
    where
        C: ConnectionTrait,
    {
        team::Entity::find_by_id(team_id)
            .one(db)
            .await?
            .ok_or_else(Self::team_not_found)
    }

    /// 트랜잭션 안에서 팀 행 잠금 (정원 확인과 멤버 추가를 직렬화)
    pub async fn lock_team<C>(db: &C, team_id: i64) -> Result<team::Model, AppError>
    where
        C: ConnectionTrait,
    {
        team::Entity::find_by_id(team_id)
            .lock_exclusive()
            .one(db)
            .await?
            .ok_or_else(Self::team_not_found)
    }

    /// 해커톤 내 사용자의 팀 멤버십
    pub async fn find_membership_in_hackathon<C>(
        db: &C,
        hackathon_id: i64,
        member_id: i64,
    ) -> Result<Option<team_member::Model>, AppError>
    where
        C: ConnectionTrait,
    {
        let found = team_member::Entity::find()
            .filter(team_member::Column::HackathonId.eq(hackathon_id))
            .filter(team_member::Column::MemberId.eq(member_id))
            .one(db)
            .await?;
        Ok(found)
    }

    pub async fn find_membership<C>(
        db: &C,
        team_id: i64,
        member_id: i64,
    ) -> Result<Option<team_member::Model>, AppError>
    where
        C: ConnectionTrait,
    {
        let found = team_member::Entity::find()
            .filter(team_member::Column::TeamId.eq(team_id))
            .filter(team_member::Column::MemberId.eq(member_id))
            .one(db)
            .await?;
        Ok(found)
    }

    pub async fn count_members<C>(db: &C, team_id: i64) -> Result<u64, AppError>
    where
        C: ConnectionTrait,
    {
        let count = team_member::Entity::find()
            .filter(team_member::Column::TeamId.eq(team_id))
            .count(db)
            .await?;
        Ok(count)
    }

    pub async fn count_teams<C>(db: &C, hackathon_id: i64) -> Result<u64, AppError>
    where
        C: ConnectionTrait,
    {
        let count = team::Entity::find()
            .filter(team::Column::HackathonId.eq(hackathon_id))
            .count(db)
            .await?;
        Ok(count)
    }

    // ============== 내부 헬퍼 ==============

    async fn count_members_by_team<C>(
        db: &C,
        team_ids: impl IntoIterator<Item = i64>,
    ) -> Result<HashMap<i64, u64>, AppError>
    where
        C: ConnectionTrait,
    {
        let ids: Vec<i64> = team_ids.into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = team_member::Entity::find()
            .select_only()
            .column(team_member::Column::TeamId)
            .column_as(Expr::col(team_member::Column::TeamMemberId).count(), "member_count")
            .filter(team_member::Column::TeamId.is_in(ids))
            .group_by(team_member::Column::TeamId)
            .into_tuple()
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(team_id, count)| (team_id, count.max(0) as u64))
            .collect())
    }

    /// 팀장 먼저, 이후 가입순으로 멤버를 붙인 상세 응답
    async fn build_detail<C>(
        db: &C,
        team: team::Model,
        viewer_id: Option<i64>,
    ) -> Result<TeamDetailResponse, AppError>
    where
        C: ConnectionTrait,
    {
        let rows = team_member::Entity::find()
            .filter(team_member::Column::TeamId.eq(team.team_id))
            .find_also_related(member::Entity)
            .order_by_asc(team_member::Column::JoinedAt)
            .order_by_asc(team_member::Column::TeamMemberId)
            .all(db)
            .await?;

        let mut members: Vec<TeamMemberItem> = rows
            .into_iter()
            .map(|(membership, member)| TeamMemberItem::new(membership, member))
            .collect();
        members.sort_by_key(|m| m.role != TeamRole::Leader);

        Ok(TeamDetailResponse::new(team, members, viewer_id))
    }

    async fn remove_membership<C>(db: &C, team_id: i64, member_id: i64) -> Result<(), AppError>
    where
        C: ConnectionTrait,
    {
        let result = team_member::Entity::delete_many()
            .filter(team_member::Column::TeamId.eq(team_id))
            .filter(team_member::Column::MemberId.eq(member_id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::TeamMemberNotFound(
                "해당 팀의 팀원이 아닙니다.".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_leader(team: &team::Model, requester_id: i64) -> Result<(), AppError> {
        if team.leader_id != requester_id {
            return Err(AppError::TeamLeaderOnly(
                "팀장만 수행할 수 있는 작업입니다.".to_string(),
            ));
        }
        Ok(())
    }

    fn team_not_found() -> AppError {
        AppError::TeamNotFound("존재하지 않는 팀입니다.".to_string())
    }

    fn already_in_team() -> AppError {
        AppError::AlreadyInTeam("이미 이 해커톤의 팀에 소속되어 있습니다.".to_string())
    }

    fn name_duplicate() -> AppError {
        AppError::TeamNameDuplicate("이미 사용 중인 팀 이름입니다.".to_string())
    }
}

fn normalize_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError(
            "팀 이름은 1~50자여야 합니다.".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// LIKE 패턴 이스케이프 문자
const LIKE_ESCAPE: char = '!';

/// LIKE 패턴에서 `%`, `_`, 이스케이프 문자를 문자 그대로 매칭하도록 이스케이프
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
