use campushub_core::model::academic::MaterialCategory;
use campushub_core::model::feed::FeedCategory;
use campushub_core::service::academic_service::{MaterialSort, NewMaterial, UploadTicker};
use campushub_core::service::admin_service::{NewScheduleEntry, NewTrainee};
use campushub_core::service::feed_service::NewFeedPost;
use campushub_core::service::life_service::NewLifePost;
use campushub_core::{
    AcademicService, AdminService, FeedService, LifeService, LocalProfile, MemoryKvStorage,
    ServiceError, SortOrder,
};

fn profile() -> LocalProfile {
    LocalProfile::default()
}

#[test]
fn validation_reports_only_the_first_missing_field() {
    let storage = MemoryKvStorage::new();
    let mut service = FeedService::open(&storage, profile());

    let err = service
        .create_post(NewFeedPost {
            title: "".to_string(),
            content: "".to_string(),
            category: FeedCategory::Study,
        })
        .unwrap_err();
    match err {
        ServiceError::Validation(message) => assert_eq!(message, "title is required"),
        other => panic!("unexpected error: {other}"),
    }

    // With the title present, validation advances to the next field.
    let err = service
        .create_post(NewFeedPost {
            title: "有标题".to_string(),
            content: "   ".to_string(),
            category: FeedCategory::Study,
        })
        .unwrap_err();
    match err {
        ServiceError::Validation(message) => assert_eq!(message, "content is required"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn creator_only_edits_are_enforced_by_name() {
    let storage = MemoryKvStorage::new();
    let mut service = FeedService::open(&storage, profile());

    // Seed posts belong to other authors; editing them is rejected.
    let foreign = service.posts()[0].id;
    assert!(matches!(
        service.update_post(foreign, Some("改".to_string()), None),
        Err(ServiceError::NotOwner { .. })
    ));
    assert!(matches!(
        service.request_delete(foreign),
        Err(ServiceError::NotOwner { .. })
    ));

    // Own posts are editable.
    let own = service
        .create_post(NewFeedPost {
            title: "我的帖子".to_string(),
            content: "正文".to_string(),
            category: FeedCategory::Chatter,
        })
        .unwrap()
        .id;
    service
        .update_post(own, Some("改过的标题".to_string()), None)
        .unwrap();
    assert_eq!(service.get(own).unwrap().title, "改过的标题");
}

#[test]
fn delete_is_two_phase_with_cancel() {
    let storage = MemoryKvStorage::new();
    let mut service = LifeService::open(&storage, profile());

    let own = service
        .create_post(NewLifePost {
            title: "要删的".to_string(),
            content: "正文".to_string(),
            images: Vec::new(),
        })
        .unwrap()
        .id;
    let before = service.posts().len();

    // Request then cancel: nothing happens.
    service.request_delete(own).unwrap();
    assert_eq!(service.pending_delete(), Some(own));
    service.cancel_delete();
    assert!(matches!(
        service.confirm_delete(),
        Err(ServiceError::NoPendingDelete)
    ));
    assert_eq!(service.posts().len(), before);

    // Request then confirm: the post is gone.
    service.request_delete(own).unwrap();
    let removed = service.confirm_delete().unwrap();
    assert_eq!(removed.id, own);
    assert_eq!(service.posts().len(), before - 1);
    assert!(service.get(own).is_none());
}

#[test]
fn material_download_bumps_counter() {
    let storage = MemoryKvStorage::new();
    let mut service = AcademicService::open(&storage, profile());

    let id = service.list_materials(None, "", MaterialSort::Latest, SortOrder::Desc)[0].id;
    let before = service.get_material(id).unwrap().downloads;
    let after = service.download_material(id).unwrap();
    assert_eq!(after, before + 1);
}

#[test]
fn material_upload_validates_and_ticker_clamps_at_hundred() {
    let storage = MemoryKvStorage::new();
    let mut service = AcademicService::open(&storage, profile());

    let err = service
        .create_material(NewMaterial {
            title: " ".to_string(),
            category: MaterialCategory::Notes,
            size_label: "1MB".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let created = service
        .create_material(NewMaterial {
            title: "线代笔记".to_string(),
            category: MaterialCategory::Notes,
            size_label: "1.2MB".to_string(),
        })
        .unwrap();
    assert_eq!(created.downloads, 0);
    assert_eq!(created.uploader, profile().display_name);

    let mut ticker = UploadTicker::new();
    let mut ticks = 0;
    while !ticker.is_done() {
        ticker.tick();
        ticks += 1;
        assert!(ticks < 100, "ticker must reach 100");
    }
    assert_eq!(ticker.percent(), 100);
    ticker.tick();
    assert_eq!(ticker.percent(), 100);
}

#[test]
fn tech_comments_use_epoch_ids_and_bump_replies() {
    let storage = MemoryKvStorage::new();
    let mut service = AcademicService::open(&storage, profile());
    let post_id = 7;
    let replies_before = service.get_tech_post(post_id).unwrap().replies;

    let comment = service.add_comment(post_id, "讲得真好", 1_754_500_000_000).unwrap();
    assert_eq!(comment.id, 1_754_500_000_000);

    let thread = service.comments_for(post_id);
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].content, "讲得真好");
    assert_eq!(
        service.get_tech_post(post_id).unwrap().replies,
        replies_before + 1
    );

    assert!(matches!(
        service.add_comment(post_id, "  ", 1),
        Err(ServiceError::Validation(_))
    ));
}

#[test]
fn life_comments_append_inline() {
    let storage = MemoryKvStorage::new();
    let mut service = LifeService::open(&storage, profile());
    let id = service.posts()[0].id;
    let before = service.get(id).unwrap().comments.len();

    service.add_comment(id, "羡慕", 1_754_500_000_001).unwrap();
    assert_eq!(service.get(id).unwrap().comments.len(), before + 1);
}

#[test]
fn life_preview_derives_image_and_text() {
    let storage = MemoryKvStorage::new();
    let service = LifeService::open(&storage, profile());

    let preview = service.preview(1).unwrap();
    assert_eq!(preview.image.as_deref(), Some("images/sunset.png"));
    let text = preview.text.expect("preview text");
    assert!(!text.contains('!'));
}

#[test]
fn admin_schedule_rejects_double_booking() {
    let storage = MemoryKvStorage::new();
    let mut service = AdminService::open(&storage);

    // Same trainer, same slot.
    let err = service
        .add_schedule_entry(NewScheduleEntry {
            course_id: 2,
            trainer_id: 1,
            branch_id: 2,
            slot_label: "周二 19:00-21:00".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::ScheduleConflict { .. }));

    // Same branch, same slot.
    let err = service
        .add_schedule_entry(NewScheduleEntry {
            course_id: 2,
            trainer_id: 2,
            branch_id: 1,
            slot_label: "周二 19:00-21:00".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::ScheduleConflict { .. }));

    // A free slot is accepted.
    let entry = service
        .add_schedule_entry(NewScheduleEntry {
            course_id: 2,
            trainer_id: 2,
            branch_id: 2,
            slot_label: "周五 19:00-21:00".to_string(),
        })
        .unwrap();
    assert!(entry.id > 3);
}

#[test]
fn admin_trainee_crud_checks_references() {
    let storage = MemoryKvStorage::new();
    let mut service = AdminService::open(&storage);

    assert!(matches!(
        service.register_trainee(NewTrainee {
            name: "新学员".to_string(),
            course_id: 99,
            branch_id: 1,
        }),
        Err(ServiceError::NotFound(99))
    ));

    let created = service
        .register_trainee(NewTrainee {
            name: "新学员".to_string(),
            course_id: 1,
            branch_id: 1,
        })
        .unwrap();
    assert!(created.id > 4);

    service.request_delete_trainee(created.id).unwrap();
    let removed = service.confirm_delete_trainee().unwrap();
    assert_eq!(removed.id, created.id);
    assert!(service.list_trainees(None, None, "新学员").is_empty());
}

#[test]
fn admin_filters_and_analytics_snapshot() {
    let storage = MemoryKvStorage::new();
    let service = AdminService::open(&storage);

    for trainer in service.list_trainers(Some(1), "") {
        assert_eq!(trainer.branch_id, 1);
    }
    for trainee in service.list_trainees(Some(1), Some(1), "") {
        assert_eq!(trainee.course_id, 1);
        assert_eq!(trainee.branch_id, 1);
    }

    // Analytics is a fixed display mock, identical on every call.
    let first = service.analytics();
    let second = service.analytics();
    assert_eq!(first, second);
    assert_eq!(first.monthly_signups.len(), 3);
}
