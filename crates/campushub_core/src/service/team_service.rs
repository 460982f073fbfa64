//! Team formation use-case service.
//!
//! # Responsibility
//! - Project team postings through the wide search (title, description,
//!   skills, organizer) and the recency sort.
//! - Keep the membership side set and the member counter in lockstep.
//! - Allocate joined-team record ids through the persisted team-id map.
//!
//! # Invariants
//! - `toggle_membership` is self-inverse.
//! - `apply_to` allocates `max(map values) + 1` exactly once per team.

use crate::model::entity::LocalProfile;
use crate::model::team::{JoinedTeam, TeamPost};
use crate::repo::{CollectionRepository, EntityId, IdMap, IdSet};
use crate::seed;
use crate::service::{ensure_owner, validate_required, PendingDelete, ServiceError, ServiceResult};
use crate::store::{KvStorage, StorageKey};
use crate::view::{ListQuery, RecencyRankTable, SortOrder};

const TEAM_TIME_LABELS: &[&str] = &["刚刚", "1小时前", "3小时前", "昨天", "2天前"];

/// Form input for a new team posting.
#[derive(Debug, Clone)]
pub struct NewTeamPost {
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub capacity: u32,
}

/// Outcome of a membership toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipState {
    pub joined: bool,
    pub members: u32,
}

/// Team facade over the postings, the joined collection and the id map.
pub struct TeamService<'s> {
    teams: CollectionRepository<'s, TeamPost>,
    joined: CollectionRepository<'s, JoinedTeam>,
    team_id_map: IdMap<'s>,
    memberships: IdSet<'s>,
    profile: LocalProfile,
    pending_delete: PendingDelete,
    rank_table: RecencyRankTable,
}

impl<'s> TeamService<'s> {
    pub fn open(storage: &'s dyn KvStorage, profile: LocalProfile) -> Self {
        Self::open_with_seed(storage, profile, seed::teams())
    }

    pub fn open_with_seed(
        storage: &'s dyn KvStorage,
        profile: LocalProfile,
        seed: Vec<TeamPost>,
    ) -> Self {
        Self {
            teams: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("team", "postings"),
                seed,
            ),
            joined: CollectionRepository::load_or_seed(
                storage,
                StorageKey::new("team", "joined"),
                Vec::new(),
            ),
            team_id_map: IdMap::load(storage, StorageKey::new("team", "id_map")),
            memberships: IdSet::load(storage, StorageKey::new("team", "memberships")),
            profile,
            pending_delete: PendingDelete::default(),
            rank_table: RecencyRankTable::from_labels(TEAM_TIME_LABELS),
        }
    }

    pub fn teams(&self) -> &[TeamPost] {
        self.teams.all()
    }

    pub fn get(&self, id: EntityId) -> Option<&TeamPost> {
        self.teams.get(id)
    }

    /// Search spans title, description, skills and organizer, the widest
    /// haystack of any module.
    pub fn list(&self, search: &str, order: SortOrder) -> Vec<TeamPost> {
        let query = ListQuery::new()
            .search(search, |team: &TeamPost| {
                let mut haystack = vec![
                    team.title.clone(),
                    team.description.clone(),
                    team.organizer.clone(),
                ];
                haystack.extend(team.skills.iter().cloned());
                haystack
            })
            .sort_by(|a: &TeamPost, b: &TeamPost| {
                self.rank_table.compare_desc(&a.time_label, &b.time_label)
            })
            .order(order);
        query.apply(self.teams.all())
    }

    pub fn create_team(&mut self, form: NewTeamPost) -> ServiceResult<TeamPost> {
        validate_required(&[("title", &form.title), ("description", &form.description)])?;

        let team = TeamPost {
            id: self.teams.next_id(),
            title: form.title,
            description: form.description,
            organizer: self.profile.display_name.clone(),
            skills: form.skills,
            members: 1,
            capacity: form.capacity,
            time_label: "刚刚".to_string(),
        };
        self.teams.insert(team.clone());
        Ok(team)
    }

    pub fn is_joined(&self, id: EntityId) -> bool {
        self.memberships.contains(id)
    }

    /// Joins or leaves a team: flips the side set and moves the member
    /// counter in the same operation. Joining a full team is rejected.
    pub fn toggle_membership(&mut self, id: EntityId) -> ServiceResult<MembershipState> {
        let team = self.teams.get(id).ok_or(ServiceError::NotFound(id))?;
        let joining = !self.memberships.contains(id);
        if joining && team.members >= team.capacity {
            return Err(ServiceError::Validation("team is full".to_string()));
        }

        let joined = self.memberships.toggle(id);
        self.teams.update(id, |team| {
            if joined {
                team.members += 1;
            } else {
                team.members = team.members.saturating_sub(1);
            }
        })?;

        let members = self.teams.get(id).map(|team| team.members).unwrap_or(0);
        Ok(MembershipState { joined, members })
    }

    /// Files a team application.
    ///
    /// First call allocates a joined-record id (`max(map values) + 1`),
    /// stores it in the persisted map and appends the joined-team record.
    /// Any later call for the same team leaves both untouched and returns
    /// the existing id.
    pub fn apply_to(&mut self, team_id: EntityId) -> ServiceResult<EntityId> {
        let team = self.teams.get(team_id).ok_or(ServiceError::NotFound(team_id))?;

        if let Some(existing) = self.team_id_map.get(team_id) {
            return Ok(existing);
        }

        let allocated = self.team_id_map.allocate_value();
        let title = team.title.clone();
        self.team_id_map.insert(team_id, allocated);
        self.joined.insert(JoinedTeam {
            id: allocated,
            team_id,
            title,
        });
        Ok(allocated)
    }

    pub fn joined_teams(&self) -> &[JoinedTeam] {
        self.joined.all()
    }

    pub fn update_team(
        &mut self,
        id: EntityId,
        title: Option<String>,
        description: Option<String>,
    ) -> ServiceResult<()> {
        let team = self.teams.get(id).ok_or(ServiceError::NotFound(id))?;
        ensure_owner(Some(team.organizer.as_str()), &self.profile, id)?;

        self.teams.update(id, |team| {
            if let Some(title) = title {
                team.title = title;
            }
            if let Some(description) = description {
                team.description = description;
            }
        })?;
        Ok(())
    }

    pub fn request_delete(&mut self, id: EntityId) -> ServiceResult<()> {
        let team = self.teams.get(id).ok_or(ServiceError::NotFound(id))?;
        ensure_owner(Some(team.organizer.as_str()), &self.profile, id)?;
        self.pending_delete.request(id);
        Ok(())
    }

    pub fn confirm_delete(&mut self) -> ServiceResult<TeamPost> {
        let id = self.pending_delete.confirm()?;
        Ok(self.teams.remove(id)?)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete.cancel();
    }
}
