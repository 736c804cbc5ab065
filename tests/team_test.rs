//! 팀 레지스트리 테스트
//!
//! 테스트 대상:
//! - TeamService 생성/조회/수정/삭제/탈퇴/내보내기
//! - 해커톤당 한 팀, 팀장 한 명, 정원 불변식

mod common;

use chrono::Utc;
use common::*;
use hackathon_server::domain::invitation::dto::InviteRequest;
use hackathon_server::domain::invitation::entity::team_invitation;
use hackathon_server::domain::invitation::InvitationService;
use hackathon_server::domain::team::dto::{TeamListQuery, UpdateTeamRequest};
use hackathon_server::domain::team::entity::team_member::{self, TeamRole};
use hackathon_server::domain::team::TeamService;
use hackathon_server::domain::team::entity::team;
use hackathon_server::utils::error::{is_unique_violation, AppError};
use hackathon_server::AppState;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

/// 초대 후 수락으로 팀원 추가
async fn join(state: &AppState, team_id: i64, inviter_id: i64, member_id: i64) {
    registered_member(state, member_id).await;
    let invitation = InvitationService::invite(
        state,
        team_id,
        inviter_id,
        InviteRequest {
            invitee_id: member_id,
            message: None,
        },
    )
    .await
    .unwrap();
    InvitationService::accept(state, invitation.invitation_id, member_id)
        .await
        .unwrap();
}

// ============== 생성 ==============

#[tokio::test]
async fn should_create_team_with_leader_membership() {
    // Arrange
    let state = setup().await;
    registered_member(&state, 1).await;

    // Act
    let team = TeamService::create_team(&state, HACKATHON_SLUG, 1, team_request("Alpha", None))
        .await
        .unwrap();

    // Assert
    assert_eq!(team.leader_id, 1);
    assert_eq!(team.max_members, 5);
    assert_eq!(team.member_count, 1);
    assert!(!team.is_full);
    assert_eq!(team.my_role, Some(TeamRole::Leader));
    assert_eq!(team.members.len(), 1);
    assert_eq!(team.members[0].role, TeamRole::Leader);
}

#[tokio::test]
async fn should_require_registration_to_create_team() {
    let state = setup().await;
    seed_member(&state, 1, "alice").await;

    let result =
        TeamService::create_team(&state, HACKATHON_SLUG, 1, team_request("Alpha", None)).await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::NotRegistered(_)));
    assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_reject_second_team_in_same_hackathon() {
    // Arrange
    let state = setup().await;
    create_team(&state, 1, "Alpha", None).await;

    // Act
    let result =
        TeamService::create_team(&state, HACKATHON_SLUG, 1, team_request("Beta", None)).await;

    // Assert
    assert!(matches!(result, Err(AppError::AlreadyInTeam(_))));
    assert_eq!(TeamService::count_teams(&state.db, HACKATHON_ID).await.unwrap(), 1);
}

#[tokio::test]
async fn should_reject_member_creating_team_after_joining_another() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    join(&state, team_id, 1, 2).await;

    let result =
        TeamService::create_team(&state, HACKATHON_SLUG, 2, team_request("Beta", None)).await;

    assert!(matches!(result, Err(AppError::AlreadyInTeam(_))));
}

#[tokio::test]
async fn should_reject_duplicate_team_name() {
    let state = setup().await;
    create_team(&state, 1, "Alpha", None).await;
    registered_member(&state, 2).await;

    let result =
        TeamService::create_team(&state, HACKATHON_SLUG, 2, team_request(" Alpha ", None)).await;

    assert!(matches!(result, Err(AppError::TeamNameDuplicate(_))));
    // 실패한 생성은 멤버십을 남기지 않아야 함
    let my_team = TeamService::get_my_team(&state, HACKATHON_SLUG, 2).await.unwrap();
    assert!(my_team.team.is_none());
}

#[tokio::test]
async fn should_fail_with_not_found_for_unknown_hackathon() {
    let state = setup().await;
    registered_member(&state, 1).await;

    let result = TeamService::create_team(&state, "missing", 1, team_request("Alpha", None)).await;

    assert!(matches!(result, Err(AppError::HackathonNotFound(_))));
}

#[tokio::test]
async fn team_with_single_seat_should_be_full_immediately() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Solo", Some(1)).await;

    let team = TeamService::get_team(&state, team_id, None).await.unwrap();

    assert!(team.is_full);
    assert_eq!(team.my_role, None);
}

// ============== 조회 ==============

#[tokio::test]
async fn get_team_should_list_leader_first_and_viewer_role() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    join(&state, team_id, 1, 2).await;
    join(&state, team_id, 2, 3).await;

    let team = TeamService::get_team(&state, team_id, Some(3)).await.unwrap();

    let ids: Vec<i64> = team.members.iter().map(|m| m.member_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(team.member_count, 3);
    assert_eq!(team.my_role, Some(TeamRole::Member));
}

#[tokio::test]
async fn get_team_should_fail_for_unknown_team() {
    let state = setup().await;

    let result = TeamService::get_team(&state, 999, None).await;

    assert!(matches!(result, Err(AppError::TeamNotFound(_))));
}

#[tokio::test]
async fn get_my_team_should_return_nulls_without_team() {
    let state = setup().await;
    registered_member(&state, 1).await;

    let none = TeamService::get_my_team(&state, HACKATHON_SLUG, 1).await.unwrap();
    let unknown = TeamService::get_my_team(&state, "missing", 1).await.unwrap();

    assert!(none.team.is_none() && none.role.is_none());
    assert!(unknown.team.is_none() && unknown.role.is_none());
}

#[tokio::test]
async fn get_my_team_should_return_team_and_role() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    join(&state, team_id, 1, 2).await;

    let mine = TeamService::get_my_team(&state, "1", 2).await.unwrap();

    assert_eq!(mine.team.unwrap().team_id, team_id);
    assert_eq!(mine.role, Some(TeamRole::Member));
}

#[tokio::test]
async fn list_teams_should_filter_and_count_members() {
    // Arrange
    let state = setup().await;
    let alpha = create_team(&state, 1, "Alpha Squad", None).await;
    create_team(&state, 2, "Beta", None).await;
    join(&state, alpha, 1, 3).await;

    // Act
    let all = TeamService::list_teams(&state, HACKATHON_SLUG, TeamListQuery::default())
        .await
        .unwrap();
    let searched = TeamService::list_teams(
        &state,
        HACKATHON_SLUG,
        TeamListQuery {
            search: Some("alpha".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let closed = TeamService::list_teams(
        &state,
        HACKATHON_SLUG,
        TeamListQuery {
            is_open: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Assert
    assert_eq!(all.total, 2);
    assert_eq!(all.items[0].name, "Beta");
    let alpha_item = all.items.iter().find(|t| t.team_id == alpha).unwrap();
    assert_eq!(alpha_item.member_count, 2);
    assert_eq!(searched.total, 1);
    assert_eq!(searched.items[0].team_id, alpha);
    assert_eq!(closed.total, 0);
}

#[tokio::test]
async fn list_teams_search_should_match_wildcards_literally() {
    let state = setup().await;
    create_team(&state, 1, "Alpha", None).await;
    let percent = create_team(&state, 2, "100% Club", None).await;

    let search = |keyword: &str| TeamListQuery {
        search: Some(keyword.to_string()),
        ..Default::default()
    };

    let by_percent = TeamService::list_teams(&state, HACKATHON_SLUG, search("%"))
        .await
        .unwrap();
    let by_underscore = TeamService::list_teams(&state, HACKATHON_SLUG, search("_"))
        .await
        .unwrap();

    assert_eq!(by_percent.total, 1);
    assert_eq!(by_percent.items[0].team_id, percent);
    assert_eq!(by_underscore.total, 0);
}

// ============== 수정 ==============

#[tokio::test]
async fn update_team_should_be_leader_only() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    join(&state, team_id, 1, 2).await;

    let result = TeamService::update_team(
        &state,
        team_id,
        2,
        UpdateTeamRequest {
            is_open: Some(false),
            ..Default::default()
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::TeamLeaderOnly(_))));
}

#[tokio::test]
async fn update_team_should_apply_only_present_fields() {
    // Arrange
    let state = setup().await;
    registered_member(&state, 1).await;
    let mut req = team_request("Alpha", None);
    req.description = Some("처음 소개".to_string());
    req.avatar_url = Some("https://example.com/a.png".to_string());
    let team_id = TeamService::create_team(&state, HACKATHON_SLUG, 1, req)
        .await
        .unwrap()
        .team_id;

    // Act
    let patch: UpdateTeamRequest =
        serde_json::from_str(r#"{"description": null, "maxMembers": 3}"#).unwrap();
    let updated = TeamService::update_team(&state, team_id, 1, patch)
        .await
        .unwrap();

    // Assert
    assert_eq!(updated.name, "Alpha");
    assert_eq!(updated.description, None);
    assert_eq!(updated.avatar_url.as_deref(), Some("https://example.com/a.png"));
    assert_eq!(updated.max_members, 3);
}

#[tokio::test]
async fn update_team_should_reject_capacity_below_member_count() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    join(&state, team_id, 1, 2).await;

    let result = TeamService::update_team(
        &state,
        team_id,
        1,
        UpdateTeamRequest {
            max_members: Some(1),
            ..Default::default()
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::TeamCapacityTooSmall(_))));
}

#[tokio::test]
async fn update_team_should_reject_rename_onto_existing_name() {
    let state = setup().await;
    let alpha = create_team(&state, 1, "Alpha", None).await;
    create_team(&state, 2, "Beta", None).await;

    let result = TeamService::update_team(
        &state,
        alpha,
        1,
        UpdateTeamRequest {
            name: Some("Beta".to_string()),
            ..Default::default()
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::TeamNameDuplicate(_))));
}

#[tokio::test]
async fn update_team_should_allow_keeping_same_name() {
    let state = setup().await;
    let alpha = create_team(&state, 1, "Alpha", None).await;

    let updated = TeamService::update_team(
        &state,
        alpha,
        1,
        UpdateTeamRequest {
            name: Some("Alpha".to_string()),
            is_open: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(!updated.is_open);
}

// ============== 삭제 ==============

#[tokio::test]
async fn delete_team_should_remove_invitations_and_memberships() {
    // Arrange
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    join(&state, team_id, 1, 2).await;
    seed_member(&state, 3, "carol").await;
    InvitationService::invite(
        &state,
        team_id,
        1,
        InviteRequest {
            invitee_id: 3,
            message: None,
        },
    )
    .await
    .unwrap();

    // Act
    TeamService::delete_team(&state, team_id, 1).await.unwrap();

    // Assert
    let invitations = team_invitation::Entity::find()
        .filter(team_invitation::Column::TeamId.eq(team_id))
        .count(&state.db)
        .await
        .unwrap();
    let memberships = team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(team_id))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(invitations, 0);
    assert_eq!(memberships, 0);
    assert!(matches!(
        TeamService::get_team(&state, team_id, None).await,
        Err(AppError::TeamNotFound(_))
    ));

    // 팀이 사라지면 다시 팀을 만들 수 있음
    let again = TeamService::create_team(&state, HACKATHON_SLUG, 2, team_request("Alpha", None))
        .await
        .unwrap();
    assert_eq!(again.leader_id, 2);
}

#[tokio::test]
async fn delete_team_should_be_leader_only() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    join(&state, team_id, 1, 2).await;

    let result = TeamService::delete_team(&state, team_id, 2).await;

    assert!(matches!(result, Err(AppError::TeamLeaderOnly(_))));
}

// ============== 탈퇴 / 내보내기 ==============

#[tokio::test]
async fn leave_team_should_remove_membership() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    join(&state, team_id, 1, 2).await;

    TeamService::leave_team(&state, team_id, 2).await.unwrap();

    let team = TeamService::get_team(&state, team_id, Some(2)).await.unwrap();
    assert_eq!(team.member_count, 1);
    assert_eq!(team.my_role, None);
}

#[tokio::test]
async fn leader_should_not_leave_team() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;

    let result = TeamService::leave_team(&state, team_id, 1).await;

    assert!(matches!(result, Err(AppError::LeaderCannotLeave(_))));
}

#[tokio::test]
async fn non_member_leave_should_fail_with_not_found() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    registered_member(&state, 2).await;

    let result = TeamService::leave_team(&state, team_id, 2).await;

    assert!(matches!(result, Err(AppError::TeamMemberNotFound(_))));
}

#[tokio::test]
async fn kick_member_should_check_leader_and_target() {
    // Arrange
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    join(&state, team_id, 1, 2).await;
    join(&state, team_id, 1, 3).await;

    // Act & Assert
    assert!(matches!(
        TeamService::kick_member(&state, team_id, 2, 3).await,
        Err(AppError::TeamLeaderOnly(_))
    ));
    assert!(matches!(
        TeamService::kick_member(&state, team_id, 1, 1).await,
        Err(AppError::LeaderCannotLeave(_))
    ));
    assert!(matches!(
        TeamService::kick_member(&state, team_id, 1, 99).await,
        Err(AppError::TeamMemberNotFound(_))
    ));

    TeamService::kick_member(&state, team_id, 1, 3).await.unwrap();
    let team = TeamService::get_team(&state, team_id, None).await.unwrap();
    assert_eq!(team.member_count, 2);
}

#[tokio::test]
async fn every_team_should_have_exactly_one_leader_row() {
    let state = setup().await;
    let alpha = create_team(&state, 1, "Alpha", None).await;
    let beta = create_team(&state, 2, "Beta", None).await;
    join(&state, alpha, 1, 3).await;

    for (team_id, leader_id) in [(alpha, 1), (beta, 2)] {
        let leaders = team_member::Entity::find()
            .filter(team_member::Column::TeamId.eq(team_id))
            .filter(team_member::Column::Role.eq(TeamRole::Leader))
            .all(&state.db)
            .await
            .unwrap();
        assert_eq!(leaders.len(), 1);
        assert_eq!(leaders[0].member_id, leader_id);
    }
}

#[tokio::test]
async fn update_team_should_reject_empty_patch() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;

    let result = TeamService::update_team(&state, team_id, 1, UpdateTeamRequest::default()).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

// ============== 한 사람 한 팀 ==============

#[tokio::test]
async fn membership_index_should_reject_second_team_in_same_hackathon() {
    let state = setup().await;
    create_team(&state, 1, "Alpha", None).await;
    let beta = create_team(&state, 2, "Beta", None).await;

    let result = team_member::ActiveModel {
        team_id: Set(beta),
        hackathon_id: Set(HACKATHON_ID),
        member_id: Set(1),
        role: Set(TeamRole::Member),
        joined_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&state.db)
    .await;

    let err = result.unwrap_err();
    assert!(is_unique_violation(&err));
}

#[tokio::test]
async fn concurrent_create_and_accept_should_leave_one_membership() {
    // Arrange
    let state = setup().await;
    let alpha = create_team(&state, 1, "Alpha", None).await;
    registered_member(&state, 2).await;
    let invitation = InvitationService::invite(
        &state,
        alpha,
        1,
        InviteRequest {
            invitee_id: 2,
            message: None,
        },
    )
    .await
    .unwrap();

    // Act
    let (created, accepted) = tokio::join!(
        TeamService::create_team(&state, HACKATHON_SLUG, 2, team_request("Beta", None)),
        InvitationService::accept(&state, invitation.invitation_id, 2),
    );

    // Assert
    assert_eq!(
        [created.is_ok(), accepted.is_ok()]
            .iter()
            .filter(|ok| **ok)
            .count(),
        1
    );
    match (&created, &accepted) {
        (Ok(_), Err(err)) | (Err(err), Ok(_)) => {
            assert!(matches!(err, AppError::AlreadyInTeam(_)), "{:?}", err)
        }
        _ => unreachable!(),
    }

    let memberships = team_member::Entity::find()
        .filter(team_member::Column::HackathonId.eq(HACKATHON_ID))
        .filter(team_member::Column::MemberId.eq(2))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(memberships, 1);

    let teams = team::Entity::find().count(&state.db).await.unwrap();
    assert_eq!(teams, if created.is_ok() { 2 } else { 1 });
}
