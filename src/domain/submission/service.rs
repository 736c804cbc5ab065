use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tracing::info;

use super::dto::{
    CategoryCount, CreateSubmissionRequest, HackathonStatsResponse, ScoreRequest,
    SubmissionListQuery, SubmissionResponse, SubmissionSort, UpdateSubmissionRequest,
    VoteResponse, UNCATEGORIZED,
};
use super::entity::submission::{self, SubmissionStatus};
use super::entity::submission_vote;
use crate::domain::hackathon::entity::hackathon;
use crate::domain::hackathon::HackathonResolver;
use crate::domain::project::entity::project;
use crate::domain::registration::RegistrationService;
use crate::domain::team::TeamService;
use crate::state::AppState;
use crate::utils::error::{is_unique_violation, AppError};
use crate::utils::Page;

pub struct SubmissionService;

impl SubmissionService {
    /// 해커톤에 프로젝트 제출
    pub async fn create_submission(
        state: &AppState,
        hackathon_key: &str,
        member_id: i64,
        req: CreateSubmissionRequest,
    ) -> Result<SubmissionResponse, AppError> {
        let hackathon = HackathonResolver::resolve_for_write(&state.db, hackathon_key).await?;

        let project = project::Entity::find_by_id(req.project_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::ProjectNotFound("존재하지 않는 프로젝트입니다.".to_string()))?;

        // 중복 제출은 요청자와 무관하게 먼저 확인
        let duplicate = submission::Entity::find()
            .filter(submission::Column::HackathonId.eq(hackathon.hackathon_id))
            .filter(submission::Column::ProjectId.eq(project.project_id))
            .one(&state.db)
            .await?;
        if duplicate.is_some() {
            return Err(Self::duplicate());
        }

        if project.author_id != member_id {
            return Err(AppError::SubmissionAccessDenied(
                "본인의 프로젝트만 제출할 수 있습니다.".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let inserted = submission::ActiveModel {
            hackathon_id: Set(hackathon.hackathon_id),
            project_id: Set(project.project_id),
            member_id: Set(member_id),
            pitch_video_url: Set(req.pitch_video_url),
            pitch_deck_url: Set(req.pitch_deck_url),
            notes: Set(req.notes),
            status: Set(SubmissionStatus::Submitted),
            judge_score: Set(None),
            judge_feedback: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Self::duplicate()
            } else {
                AppError::from(e)
            }
        })?;

        info!(
            submission_id = inserted.submission_id,
            hackathon_id = hackathon.hackathon_id,
            project_id = project.project_id,
            member_id = member_id,
            "submission created"
        );

        Ok(SubmissionResponse::new(inserted, Some(project.title), 0, false))
    }

    /// 제출물 조회 (추천 수, 조회자 추천 여부 포함)
    pub async fn get_submission(
        state: &AppState,
        submission_id: i64,
        viewer_id: Option<i64>,
    ) -> Result<SubmissionResponse, AppError> {
        let (submission, project) = submission::Entity::find_by_id(submission_id)
            .find_also_related(project::Entity)
            .one(&state.db)
            .await?
            .ok_or_else(Self::not_found)?;

        let vote_count = Self::count_votes(&state.db, submission_id).await?;
        let has_voted = match viewer_id {
            Some(viewer) => Self::find_vote(&state.db, submission_id, viewer)
                .await?
                .is_some(),
            None => false,
        };

        Ok(SubmissionResponse::new(
            submission,
            project.map(|p| p.title),
            vote_count,
            has_voted,
        ))
    }

    /// 해커톤 제출물 목록
    pub async fn list_submissions(
        state: &AppState,
        hackathon_key: &str,
        query: SubmissionListQuery,
        viewer_id: Option<i64>,
    ) -> Result<Page<SubmissionResponse>, AppError> {
        let page = query.page();
        let (limit, offset) = (page.limit(), page.offset());

        let Some(hackathon) = HackathonResolver::resolve(&state.db, hackathon_key).await? else {
            return Ok(Page::empty(limit, offset));
        };

        let base = submission::Entity::find()
            .filter(submission::Column::HackathonId.eq(hackathon.hackathon_id));
        let total = base.clone().count(&state.db).await?;

        let rows = base
            .find_also_related(project::Entity)
            .order_by_desc(submission::Column::CreatedAt)
            .order_by_desc(submission::Column::SubmissionId);

        // 추천순은 집계 후 정렬해야 하므로 해커톤 전체를 읽어 메모리에서 자릅니다.
        let rows = match query.sort() {
            SubmissionSort::Recent => rows.offset(offset).limit(limit).all(&state.db).await?,
            SubmissionSort::Votes => rows.all(&state.db).await?,
        };

        let ids: Vec<i64> = rows.iter().map(|(s, _)| s.submission_id).collect();
        let counts = Self::count_votes_by_submission(&state.db, &ids).await?;
        let voted = match viewer_id {
            Some(viewer) => Self::voted_by(&state.db, &ids, viewer).await?,
            None => HashSet::new(),
        };

        let mut items: Vec<SubmissionResponse> = rows
            .into_iter()
            .map(|(submission, project)| {
                let id = submission.submission_id;
                SubmissionResponse::new(
                    submission,
                    project.map(|p| p.title),
                    counts.get(&id).copied().unwrap_or(0),
                    voted.contains(&id),
                )
            })
            .collect();

        if query.sort() == SubmissionSort::Votes {
            // 안정 정렬이라 동점은 최신순 유지
            items.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
            items = items
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect();
        }

        Ok(Page {
            items,
            total,
            limit,
            offset,
        })
    }

    /// 제출물 수정 (제출자 전용)
    pub async fn update_submission(
        state: &AppState,
        submission_id: i64,
        member_id: i64,
        req: UpdateSubmissionRequest,
    ) -> Result<SubmissionResponse, AppError> {
        let submission = Self::find_owned(&state.db, submission_id, member_id).await?;

        let promote = submission.status == SubmissionStatus::Draft && req.supplies_pitch_video();

        let mut active = submission.into_active_model();
        if let Some(pitch_video_url) = req.pitch_video_url {
            active.pitch_video_url = Set(pitch_video_url);
        }
        if let Some(pitch_deck_url) = req.pitch_deck_url {
            active.pitch_deck_url = Set(pitch_deck_url);
        }
        if let Some(notes) = req.notes {
            active.notes = Set(notes);
        }
        if promote {
            active.status = Set(SubmissionStatus::Submitted);
        }
        active.updated_at = Set(Utc::now().naive_utc());

        active.update(&state.db).await?;

        info!(
            submission_id = submission_id,
            member_id = member_id,
            promoted = promote,
            "submission updated"
        );

        Self::get_submission(state, submission_id, Some(member_id)).await
    }

    /// 제출물 삭제 (추천도 함께 삭제)
    pub async fn delete_submission(
        state: &AppState,
        submission_id: i64,
        member_id: i64,
    ) -> Result<(), AppError> {
        Self::find_owned(&state.db, submission_id, member_id).await?;

        let txn = state.db.begin().await?;

        let votes = submission_vote::Entity::delete_many()
            .filter(submission_vote::Column::SubmissionId.eq(submission_id))
            .exec(&txn)
            .await?;
        submission::Entity::delete_by_id(submission_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(
            submission_id = submission_id,
            member_id = member_id,
            deleted_votes = votes.rows_affected,
            "submission deleted"
        );

        Ok(())
    }

    /// 추천 토글
    pub async fn vote(
        state: &AppState,
        submission_id: i64,
        member_id: i64,
    ) -> Result<VoteResponse, AppError> {
        submission::Entity::find_by_id(submission_id)
            .one(&state.db)
            .await?
            .ok_or_else(Self::not_found)?;

        let txn = state.db.begin().await?;

        let existing = Self::find_vote(&txn, submission_id, member_id).await?;
        let has_voted = match existing {
            Some(existing) => {
                submission_vote::Entity::delete_by_id(existing.submission_vote_id)
                    .exec(&txn)
                    .await?;
                txn.commit().await?;
                false
            }
            None => {
                let inserted = submission_vote::ActiveModel {
                    submission_id: Set(submission_id),
                    member_id: Set(member_id),
                    created_at: Set(Utc::now().naive_utc()),
                    ..Default::default()
                }
                .insert(&txn)
                .await;

                match inserted {
                    Ok(_) => {
                        txn.commit().await?;
                    }
                    // 동시 요청이 먼저 추천을 넣은 경우
                    Err(e) if is_unique_violation(&e) => {
                        txn.rollback().await?;
                    }
                    Err(e) => return Err(e.into()),
                }
                true
            }
        };

        let vote_count = Self::count_votes(&state.db, submission_id).await?;

        info!(
            submission_id = submission_id,
            member_id = member_id,
            has_voted = has_voted,
            vote_count = vote_count,
            "submission vote toggled"
        );

        Ok(VoteResponse {
            submission_id,
            vote_count,
            has_voted,
        })
    }

    /// 심사 점수 입력 (해커톤 주최자 전용)
    pub async fn score(
        state: &AppState,
        submission_id: i64,
        judge_id: i64,
        req: ScoreRequest,
    ) -> Result<SubmissionResponse, AppError> {
        let (submission, hackathon) = submission::Entity::find_by_id(submission_id)
            .find_also_related(hackathon::Entity)
            .one(&state.db)
            .await?
            .ok_or_else(Self::not_found)?;

        let organizer_id = hackathon.map(|h| h.organizer_id);
        if organizer_id != Some(judge_id) {
            return Err(AppError::SubmissionAccessDenied(
                "해커톤 주최자만 심사할 수 있습니다.".to_string(),
            ));
        }

        if submission.status == SubmissionStatus::Draft {
            return Err(AppError::BadRequest(
                "제출이 완료되지 않은 작품은 심사할 수 없습니다.".to_string(),
            ));
        }

        let mut active = submission.into_active_model();
        active.judge_score = Set(Some(req.score));
        active.judge_feedback = Set(req.feedback);
        active.status = Set(SubmissionStatus::Judged);
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(&state.db).await?;

        info!(
            submission_id = submission_id,
            judge_id = judge_id,
            score = req.score,
            "submission judged"
        );

        Self::get_submission(state, submission_id, Some(judge_id)).await
    }

    /// 해커톤 통계 (해석 실패 시 모두 0)
    pub async fn get_stats(
        state: &AppState,
        hackathon_key: &str,
    ) -> Result<HackathonStatsResponse, AppError> {
        let Some(hackathon) = HackathonResolver::resolve(&state.db, hackathon_key).await? else {
            return Ok(HackathonStatsResponse::default());
        };
        let hackathon_id = hackathon.hackathon_id;

        let rows = submission::Entity::find()
            .filter(submission::Column::HackathonId.eq(hackathon_id))
            .find_also_related(project::Entity)
            .all(&state.db)
            .await?;

        let participant_count =
            RegistrationService::count_participants(&state.db, hackathon_id).await?;
        let team_count = TeamService::count_teams(&state.db, hackathon_id).await?;
        let vote_count = submission_vote::Entity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                submission_vote::Relation::Submission.def(),
            )
            .filter(submission::Column::HackathonId.eq(hackathon_id))
            .count(&state.db)
            .await?;

        let submission_count = rows.len() as u64;
        let categories = category_breakdown(
            rows.into_iter()
                .map(|(_, project)| project.and_then(|p| p.category)),
        );

        Ok(HackathonStatsResponse {
            submission_count,
            participant_count,
            team_count,
            vote_count,
            categories,
        })
    }

    // ============== 내부 헬퍼 ==============

    async fn find_owned<C>(
        db: &C,
        submission_id: i64,
        member_id: i64,
    ) -> Result<submission::Model, AppError>
    where
        C: ConnectionTrait,
    {
        let submission = submission::Entity::find_by_id(submission_id)
            .one(db)
            .await?
            .ok_or_else(Self::not_found)?;

        if submission.member_id != member_id {
            return Err(AppError::SubmissionAccessDenied(
                "본인의 제출물만 수정하거나 삭제할 수 있습니다.".to_string(),
            ));
        }
        Ok(submission)
    }

    async fn find_vote<C>(
        db: &C,
        submission_id: i64,
        member_id: i64,
    ) -> Result<Option<submission_vote::Model>, AppError>
    where
        C: ConnectionTrait,
    {
        let found = submission_vote::Entity::find()
            .filter(submission_vote::Column::SubmissionId.eq(submission_id))
            .filter(submission_vote::Column::MemberId.eq(member_id))
            .one(db)
            .await?;
        Ok(found)
    }

    async fn count_votes<C>(db: &C, submission_id: i64) -> Result<u64, AppError>
    where
        C: ConnectionTrait,
    {
        let count = submission_vote::Entity::find()
            .filter(submission_vote::Column::SubmissionId.eq(submission_id))
            .count(db)
            .await?;
        Ok(count)
    }

    async fn count_votes_by_submission<C>(
        db: &C,
        submission_ids: &[i64],
    ) -> Result<HashMap<i64, u64>, AppError>
    where
        C: ConnectionTrait,
    {
        if submission_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = submission_vote::Entity::find()
            .select_only()
            .column(submission_vote::Column::SubmissionId)
            .column_as(
                Expr::col(submission_vote::Column::SubmissionVoteId).count(),
                "vote_count",
            )
            .filter(submission_vote::Column::SubmissionId.is_in(submission_ids.to_vec()))
            .group_by(submission_vote::Column::SubmissionId)
            .into_tuple()
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, count.max(0) as u64))
            .collect())
    }

    async fn voted_by<C>(
        db: &C,
        submission_ids: &[i64],
        member_id: i64,
    ) -> Result<HashSet<i64>, AppError>
    where
        C: ConnectionTrait,
    {
        if submission_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let votes = submission_vote::Entity::find()
            .filter(submission_vote::Column::SubmissionId.is_in(submission_ids.to_vec()))
            .filter(submission_vote::Column::MemberId.eq(member_id))
            .all(db)
            .await?;

        Ok(votes.into_iter().map(|v| v.submission_id).collect())
    }

    fn not_found() -> AppError {
        AppError::SubmissionNotFound("존재하지 않는 제출물입니다.".to_string())
    }

    fn duplicate() -> AppError {
        AppError::SubmissionDuplicate("이미 이 해커톤에 제출된 프로젝트입니다.".to_string())
    }
}

/// 카테고리별 제출 수 (많은 순, 같으면 이름순)
fn category_breakdown(categories: impl IntoIterator<Item = Option<String>>) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for category in categories {
        let key = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        *counts.entry(key).or_default() += 1;
    }

    let mut breakdown: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    breakdown.sort_by(|a, b| b.count.cmp(&a.count));
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_breakdown_should_group_and_sort_by_count() {
        let breakdown = category_breakdown(vec![
            Some("AI".to_string()),
            Some("Web3".to_string()),
            Some("AI".to_string()),
            None,
            Some("  ".to_string()),
        ]);

        let pairs: Vec<(&str, u64)> = breakdown
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(pairs, vec![("AI", 2), (UNCATEGORIZED, 2), ("Web3", 1)]);
    }

    #[test]
    fn category_breakdown_should_be_empty_without_submissions() {
        assert!(category_breakdown(Vec::<Option<String>>::new()).is_empty());
    }
}
