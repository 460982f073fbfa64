//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `campushub_core` wiring.
//! - Keep output deterministic for quick local sanity checks.

use campushub_core::{
    AcademicService, AdminService, ChatService, FeedService, LifeService, LocalProfile,
    MemoryKvStorage, RecruitmentService, TeamService,
};

fn main() {
    println!("campushub_core ping={}", campushub_core::ping());
    println!("campushub_core version={}", campushub_core::core_version());

    // Seed every collection into a throwaway in-memory store and report
    // counts, so a broken seed or repository fails loudly here.
    let storage = MemoryKvStorage::new();
    let profile = LocalProfile::default();

    let feed = FeedService::open(&storage, profile.clone());
    let academic = AcademicService::open(&storage, profile.clone());
    let recruitment = RecruitmentService::open(&storage, profile.clone());
    let team = TeamService::open(&storage, profile.clone());
    let life = LifeService::open(&storage, profile);
    let chat = ChatService::open(&storage);
    let admin = AdminService::open(&storage);

    println!("feed_posts={}", feed.posts().len());
    println!("courses={}", academic.list_courses(None, "").len());
    println!("recruitments={}", recruitment.postings().len());
    println!("teams={}", team.teams().len());
    println!("life_posts={}", life.posts().len());
    println!("conversations={}", chat.conversations().len());
    println!("schedule_entries={}", admin.schedule().len());
}
