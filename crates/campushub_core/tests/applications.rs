use campushub_core::model::recruitment::{ApplicationStatus, ApplyControl, Position, Recruitment};
use campushub_core::model::team::TeamPost;
use campushub_core::{LocalProfile, MemoryKvStorage, RecruitmentService, ServiceError, TeamService};

fn seed_posting(id: i64, organizer: &str) -> Recruitment {
    Recruitment {
        id,
        club: "计算机协会".to_string(),
        title: "技术部纳新".to_string(),
        description: "欢迎报名".to_string(),
        organizer: organizer.to_string(),
        urgent: false,
        positions: vec![Position {
            name: "干事".to_string(),
            count: 2,
            filled: 0,
        }],
        applications: 0,
        time_label: "昨天".to_string(),
    }
}

fn seed_team(id: i64) -> TeamPost {
    TeamPost {
        id,
        title: format!("队伍{id}"),
        description: "找队友".to_string(),
        organizer: "别人".to_string(),
        skills: Vec::new(),
        members: 1,
        capacity: 5,
        time_label: "昨天".to_string(),
    }
}

#[test]
fn apply_moves_to_pending_and_disables_control() {
    let storage = MemoryKvStorage::new();
    let mut service = RecruitmentService::open_with_seed(
        &storage,
        LocalProfile::default(),
        vec![seed_posting(1, "别人")],
    );
    assert_eq!(service.control(1), ApplyControl::Enabled);

    let status = service.apply_to(1).unwrap();
    assert_eq!(status, ApplicationStatus::PendingReview);
    assert_eq!(service.control(1), ApplyControl::DisabledPending);
    assert!(service.has_applied(1));
    assert_eq!(service.get(1).unwrap().applications, 1);
}

#[test]
fn apply_is_idempotent() {
    let storage = MemoryKvStorage::new();
    let mut service = RecruitmentService::open_with_seed(
        &storage,
        LocalProfile::default(),
        vec![seed_posting(1, "别人")],
    );

    service.apply_to(1).unwrap();
    let counter_after_first = service.get(1).unwrap().applications;

    // Second call is a no-op on the set, the status and the counter.
    let status = service.apply_to(1).unwrap();
    assert_eq!(status, ApplicationStatus::PendingReview);
    assert_eq!(service.get(1).unwrap().applications, counter_after_first);
    assert_eq!(service.control(1), ApplyControl::DisabledPending);
}

#[test]
fn application_state_survives_reopen() {
    let storage = MemoryKvStorage::new();
    {
        let mut service = RecruitmentService::open_with_seed(
            &storage,
            LocalProfile::default(),
            vec![seed_posting(1, "别人")],
        );
        service.apply_to(1).unwrap();
    }

    let service = RecruitmentService::open_with_seed(
        &storage,
        LocalProfile::default(),
        vec![seed_posting(1, "别人")],
    );
    assert_eq!(service.status(1), ApplicationStatus::PendingReview);
    assert_eq!(service.control(1), ApplyControl::DisabledPending);
}

#[test]
fn approval_fills_a_vacancy_and_control_stays_disabled() {
    let storage = MemoryKvStorage::new();
    let profile = LocalProfile::default();
    let mut service = RecruitmentService::open_with_seed(
        &storage,
        profile.clone(),
        vec![seed_posting(1, &profile.display_name)],
    );

    service.apply_to(1).unwrap();
    let decided = service.review_application(1, true).unwrap();
    assert_eq!(decided, ApplicationStatus::Approved);
    assert_eq!(service.get(1).unwrap().positions[0].filled, 1);
    assert_eq!(service.control(1), ApplyControl::DisabledApproved);

    // Once decided, there is nothing left to review and no way back.
    assert!(matches!(
        service.review_application(1, false),
        Err(ServiceError::InvalidTransition(_))
    ));
    assert_eq!(service.apply_to(1).unwrap(), ApplicationStatus::Approved);
}

#[test]
fn rejection_keeps_positions_untouched() {
    let storage = MemoryKvStorage::new();
    let profile = LocalProfile::default();
    let mut service = RecruitmentService::open_with_seed(
        &storage,
        profile.clone(),
        vec![seed_posting(1, &profile.display_name)],
    );

    service.apply_to(1).unwrap();
    let decided = service.review_application(1, false).unwrap();
    assert_eq!(decided, ApplicationStatus::Rejected);
    assert_eq!(service.get(1).unwrap().positions[0].filled, 0);
    assert_eq!(service.control(1), ApplyControl::DisabledRejected);
}

#[test]
fn manual_position_edit_rejects_overfill() {
    let storage = MemoryKvStorage::new();
    let profile = LocalProfile::default();
    let mut service = RecruitmentService::open_with_seed(
        &storage,
        profile.clone(),
        vec![seed_posting(1, &profile.display_name)],
    );

    let err = service
        .update_positions(
            1,
            vec![Position {
                name: "干事".to_string(),
                count: 2,
                filled: 3,
            }],
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::PositionOverfilled(_)));
    assert_eq!(service.get(1).unwrap().positions[0].filled, 0);
}

#[test]
fn team_apply_allocates_max_plus_one_in_the_id_map() {
    let storage = MemoryKvStorage::new();
    let mut service = TeamService::open_with_seed(
        &storage,
        LocalProfile::default(),
        vec![seed_team(6), seed_team(9)],
    );
    assert!(service.joined_teams().is_empty());

    let first = service.apply_to(6).unwrap();
    assert_eq!(first, 1);
    assert_eq!(service.joined_teams().len(), 1);
    assert_eq!(service.joined_teams()[0].team_id, 6);

    let second = service.apply_to(9).unwrap();
    assert_eq!(second, 2);
    assert_eq!(service.joined_teams().len(), 2);
}

#[test]
fn team_apply_twice_changes_nothing() {
    let storage = MemoryKvStorage::new();
    let mut service =
        TeamService::open_with_seed(&storage, LocalProfile::default(), vec![seed_team(6)]);

    let allocated = service.apply_to(6).unwrap();
    let again = service.apply_to(6).unwrap();
    assert_eq!(allocated, again);
    assert_eq!(service.joined_teams().len(), 1);
}
