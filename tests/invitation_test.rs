//! 팀 초대 워크플로 테스트
//!
//! 테스트 대상:
//! - InvitationService 초대/수락/거절/취소/조회
//! - 지연 만료 (조회·응답 시 EXPIRED로 저장)

mod common;

use chrono::Utc;
use common::*;
use hackathon_server::domain::invitation::dto::InviteRequest;
use hackathon_server::domain::invitation::entity::team_invitation::{self, InvitationStatus};
use hackathon_server::domain::invitation::InvitationService;
use hackathon_server::domain::team::TeamService;
use hackathon_server::utils::error::AppError;
use hackathon_server::AppState;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

fn invite_req(invitee_id: i64) -> InviteRequest {
    InviteRequest {
        invitee_id,
        message: Some("같이 해요".to_string()),
    }
}

async fn invite(state: &AppState, team_id: i64, inviter_id: i64, invitee_id: i64) -> i64 {
    InvitationService::invite(state, team_id, inviter_id, invite_req(invitee_id))
        .await
        .unwrap()
        .invitation_id
}

async fn stored(state: &AppState, invitation_id: i64) -> Option<team_invitation::Model> {
    team_invitation::Entity::find_by_id(invitation_id)
        .one(&state.db)
        .await
        .unwrap()
}

/// 만료 시각을 과거로 돌려 지연 만료 대상으로 만듦
async fn make_past_due(state: &AppState, invitation_id: i64) {
    let mut active: team_invitation::ActiveModel =
        stored(state, invitation_id).await.unwrap().into();
    active.expires_at = Set(Utc::now().naive_utc() - hours(1));
    active.update(&state.db).await.unwrap();
}

// ============== 초대 ==============

#[tokio::test]
async fn should_create_pending_invitation_with_ttl() {
    // Arrange
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    seed_member(&state, 2, "bob").await;

    // Act
    let invitation = InvitationService::invite(&state, team_id, 1, invite_req(2))
        .await
        .unwrap();

    // Assert
    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert_eq!(invitation.invitee_id, 2);
    let ttl = invitation.expires_at - invitation.created_at;
    assert_eq!(ttl.num_hours(), state.config.invite_expiration_hours);
}

#[tokio::test]
async fn invite_with_out_of_range_expiration_should_fail_without_panic() {
    let mut state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    seed_member(&state, 2, "bob").await;

    for hours in [2_400_000_000, i64::MAX] {
        state.config.invite_expiration_hours = hours;

        let result = InvitationService::invite(&state, team_id, 1, invite_req(2)).await;

        assert!(matches!(result, Err(AppError::InternalError(_))));
    }
}

#[tokio::test]
async fn invite_should_check_guards_in_order() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    seed_member(&state, 2, "bob").await;
    seed_member(&state, 3, "carol").await;

    // 팀 없음
    assert!(matches!(
        InvitationService::invite(&state, 999, 1, invite_req(2)).await,
        Err(AppError::TeamNotFound(_))
    ));
    // 초대 대상 없음
    assert!(matches!(
        InvitationService::invite(&state, team_id, 1, invite_req(77)).await,
        Err(AppError::MemberNotFound(_))
    ));
    // 초대자가 팀원이 아님
    assert!(matches!(
        InvitationService::invite(&state, team_id, 3, invite_req(2)).await,
        Err(AppError::TeamMemberOnly(_))
    ));
}

#[tokio::test]
async fn invite_into_full_team_should_conflict_at_invite_time() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Solo", Some(1)).await;
    seed_member(&state, 2, "bob").await;

    let err = InvitationService::invite(&state, team_id, 1, invite_req(2))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::TeamFull(_)));
    assert_eq!(err.error_code(), "TEAM4093");
}

#[tokio::test]
async fn invite_should_reject_invitee_already_in_a_team() {
    let state = setup().await;
    let alpha = create_team(&state, 1, "Alpha", None).await;
    create_team(&state, 2, "Beta", None).await;

    let result = InvitationService::invite(&state, alpha, 1, invite_req(2)).await;

    assert!(matches!(result, Err(AppError::AlreadyInTeam(_))));
}

#[tokio::test]
async fn invite_should_reject_duplicate_pending_invitation() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    seed_member(&state, 2, "bob").await;
    invite(&state, team_id, 1, 2).await;

    let result = InvitationService::invite(&state, team_id, 1, invite_req(2)).await;

    assert!(matches!(result, Err(AppError::InvitationDuplicate(_))));
}

#[tokio::test]
async fn invite_should_replace_past_due_pending_invitation() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    seed_member(&state, 2, "bob").await;
    let first = invite(&state, team_id, 1, 2).await;
    make_past_due(&state, first).await;

    let second = invite(&state, team_id, 1, 2).await;

    assert_ne!(first, second);
    assert_eq!(
        stored(&state, first).await.unwrap().status,
        InvitationStatus::Expired
    );
}

// ============== 수락 ==============

#[tokio::test]
async fn accept_should_add_member_and_mark_accepted() {
    // Arrange
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    registered_member(&state, 2).await;
    let invitation_id = invite(&state, team_id, 1, 2).await;

    // Act
    let accepted = InvitationService::accept(&state, invitation_id, 2)
        .await
        .unwrap();

    // Assert
    assert_eq!(accepted.status, InvitationStatus::Accepted);
    assert!(accepted.responded_at.is_some());
    let saved = stored(&state, invitation_id).await.unwrap();
    assert_eq!(saved.status, InvitationStatus::Accepted);
    assert!(saved.responded_at.is_some());
    let membership = TeamService::find_membership(&state.db, team_id, 2)
        .await
        .unwrap();
    assert!(membership.is_some());
}

#[tokio::test]
async fn accept_by_someone_else_should_be_forbidden() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    registered_member(&state, 2).await;
    registered_member(&state, 3).await;
    let invitation_id = invite(&state, team_id, 1, 2).await;

    let result = InvitationService::accept(&state, invitation_id, 3).await;

    assert!(matches!(result, Err(AppError::InvitationAccessDenied(_))));
}

#[tokio::test]
async fn accept_unknown_invitation_should_fail_with_not_found() {
    let state = setup().await;

    let result = InvitationService::accept(&state, 404, 2).await;

    assert!(matches!(result, Err(AppError::InvitationNotFound(_))));
}

#[tokio::test]
async fn accept_should_require_registration() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    seed_member(&state, 2, "bob").await;
    let invitation_id = invite(&state, team_id, 1, 2).await;

    let result = InvitationService::accept(&state, invitation_id, 2).await;

    assert!(matches!(result, Err(AppError::NotRegistered(_))));
    assert_eq!(
        stored(&state, invitation_id).await.unwrap().status,
        InvitationStatus::Pending
    );
}

#[tokio::test]
async fn past_due_accept_should_persist_expired_and_conflict() {
    // Arrange
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    registered_member(&state, 2).await;
    let invitation_id = invite(&state, team_id, 1, 2).await;
    make_past_due(&state, invitation_id).await;

    // Act
    let err = InvitationService::accept(&state, invitation_id, 2)
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, AppError::InvitationExpired(_)));
    assert_eq!(
        stored(&state, invitation_id).await.unwrap().status,
        InvitationStatus::Expired
    );
    let mine = InvitationService::get_my_invites(&state, 2).await.unwrap();
    assert!(mine.is_empty());
    assert!(TeamService::find_membership(&state.db, team_id, 2)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn accept_should_conflict_when_last_seat_was_taken() {
    // Arrange: 정원 2명 팀에 두 명을 초대
    let state = setup().await;
    let team_id = create_team(&state, 1, "Pair", Some(2)).await;
    registered_member(&state, 2).await;
    registered_member(&state, 3).await;
    let first = invite(&state, team_id, 1, 2).await;
    let second = invite(&state, team_id, 1, 3).await;

    // Act
    InvitationService::accept(&state, first, 2).await.unwrap();
    let result = InvitationService::accept(&state, second, 3).await;

    // Assert
    assert!(matches!(result, Err(AppError::TeamFull(_))));
    let team = TeamService::get_team(&state, team_id, None).await.unwrap();
    assert_eq!(team.member_count, 2);
    assert!(team.is_full);
    assert_eq!(
        stored(&state, second).await.unwrap().status,
        InvitationStatus::Pending
    );
}

#[tokio::test]
async fn accept_should_conflict_when_invitee_joined_another_team() {
    let state = setup().await;
    let alpha = create_team(&state, 1, "Alpha", None).await;
    registered_member(&state, 3).await;
    let invitation_id = invite(&state, alpha, 1, 3).await;
    // 초대 이후 다른 팀을 직접 만듦
    TeamService::create_team(&state, HACKATHON_SLUG, 3, team_request("Gamma", None))
        .await
        .unwrap();

    let result = InvitationService::accept(&state, invitation_id, 3).await;

    assert!(matches!(result, Err(AppError::AlreadyInTeam(_))));
}

#[tokio::test]
async fn terminal_invitation_should_reject_further_responses() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    registered_member(&state, 2).await;
    let invitation_id = invite(&state, team_id, 1, 2).await;
    InvitationService::accept(&state, invitation_id, 2)
        .await
        .unwrap();

    assert!(matches!(
        InvitationService::accept(&state, invitation_id, 2).await,
        Err(AppError::InvitationAlreadyResponded(_))
    ));
    assert!(matches!(
        InvitationService::reject(&state, invitation_id, 2).await,
        Err(AppError::InvitationAlreadyResponded(_))
    ));
    assert!(matches!(
        InvitationService::cancel(&state, invitation_id, 1).await,
        Err(AppError::InvitationAlreadyResponded(_))
    ));
}

// ============== 거절 / 취소 ==============

#[tokio::test]
async fn reject_should_mark_rejected() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    seed_member(&state, 2, "bob").await;
    let invitation_id = invite(&state, team_id, 1, 2).await;

    let rejected = InvitationService::reject(&state, invitation_id, 2)
        .await
        .unwrap();

    assert_eq!(rejected.status, InvitationStatus::Rejected);
    assert_eq!(
        stored(&state, invitation_id).await.unwrap().status,
        InvitationStatus::Rejected
    );
    // 거절 후에는 다시 초대 가능
    invite(&state, team_id, 1, 2).await;
}

#[tokio::test]
async fn past_due_reject_should_persist_expired() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    seed_member(&state, 2, "bob").await;
    let invitation_id = invite(&state, team_id, 1, 2).await;
    make_past_due(&state, invitation_id).await;

    let result = InvitationService::reject(&state, invitation_id, 2).await;

    assert!(matches!(result, Err(AppError::InvitationExpired(_))));
    assert_eq!(
        stored(&state, invitation_id).await.unwrap().status,
        InvitationStatus::Expired
    );
}

#[tokio::test]
async fn cancel_should_delete_invitation_by_inviter_only() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    seed_member(&state, 2, "bob").await;
    let invitation_id = invite(&state, team_id, 1, 2).await;

    assert!(matches!(
        InvitationService::cancel(&state, invitation_id, 2).await,
        Err(AppError::InvitationAccessDenied(_))
    ));

    InvitationService::cancel(&state, invitation_id, 1)
        .await
        .unwrap();

    assert!(stored(&state, invitation_id).await.is_none());
}

#[tokio::test]
async fn responses_after_cancel_should_fail_with_not_found() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    registered_member(&state, 2).await;
    let invitation_id = invite(&state, team_id, 1, 2).await;

    InvitationService::cancel(&state, invitation_id, 1)
        .await
        .unwrap();

    assert!(matches!(
        InvitationService::accept(&state, invitation_id, 2).await,
        Err(AppError::InvitationNotFound(_))
    ));
    assert!(matches!(
        InvitationService::reject(&state, invitation_id, 2).await,
        Err(AppError::InvitationNotFound(_))
    ));
    assert!(matches!(
        InvitationService::cancel(&state, invitation_id, 1).await,
        Err(AppError::InvitationNotFound(_))
    ));
}

#[tokio::test]
async fn past_due_cancel_should_persist_expired_and_conflict() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    seed_member(&state, 2, "bob").await;
    let invitation_id = invite(&state, team_id, 1, 2).await;
    make_past_due(&state, invitation_id).await;

    let result = InvitationService::cancel(&state, invitation_id, 1).await;

    assert!(matches!(result, Err(AppError::InvitationExpired(_))));
    assert_eq!(
        stored(&state, invitation_id).await.unwrap().status,
        InvitationStatus::Expired
    );
}

// ============== 조회 ==============

#[tokio::test]
async fn get_my_invites_should_list_live_pending_with_team_and_inviter() {
    // Arrange
    let state = setup().await;
    let alpha = create_team(&state, 1, "Alpha", None).await;
    let beta = create_team(&state, 3, "Beta", None).await;
    seed_member(&state, 2, "bob").await;
    let stale = invite(&state, alpha, 1, 2).await;
    let live = invite(&state, beta, 3, 2).await;
    make_past_due(&state, stale).await;

    // Act
    let mine = InvitationService::get_my_invites(&state, 2).await.unwrap();

    // Assert
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].invitation_id, live);
    assert_eq!(mine[0].team_name, "Beta");
    assert_eq!(mine[0].inviter_nickname, "user3");
    assert_eq!(mine[0].hackathon_id, HACKATHON_ID);
    assert_eq!(
        stored(&state, stale).await.unwrap().status,
        InvitationStatus::Expired
    );
}

#[tokio::test]
async fn list_team_invites_should_be_member_only() {
    let state = setup().await;
    let team_id = create_team(&state, 1, "Alpha", None).await;
    seed_member(&state, 2, "bob").await;
    seed_member(&state, 5, "eve").await;
    invite(&state, team_id, 1, 2).await;

    let listed = InvitationService::list_team_invites(&state, team_id, 1)
        .await
        .unwrap();
    let forbidden = InvitationService::list_team_invites(&state, team_id, 5).await;

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].invitee_nickname, "bob");
    assert!(matches!(forbidden, Err(AppError::TeamMemberOnly(_))));
}
