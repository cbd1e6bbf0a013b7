use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{
    modules::{
        friend::{
            model::{SearchUsersQuery, UserSummary},
            repository::FriendRepository,
            schema::FriendshipEntity,
        },
        profile::{
            model::ProfileFields,
            repository::ProfileRepository,
            schema::{EmployerEntity, ProfileEntity, SchoolEntity},
        },
        user::{model::InsertUser, repository::UserRepository, schema::UserEntity},
    },
    storage::StoreError,
};

#[derive(Default)]
struct State {
    users: HashMap<String, UserEntity>,
    profiles: HashMap<String, ProfileFields>,
    friendships: Vec<FriendshipEntity>,
    schools: Vec<SchoolEntity>,
    employers: Vec<EmployerEntity>,
}

/// In-process backend for every repository trait. A single lock serializes
/// all mutations, which gives the same per-pair and per-profile atomicity
/// the relational backend gets from its constraints and transactions.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(schools: Vec<SchoolEntity>, employers: Vec<EmployerEntity>) -> Self {
        let store = Self::default();
        {
            let mut state = store.state();
            state.schools = schools;
            state.employers = employers;
        }
        store
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, StoreError> {
        Ok(self.state().users.get(email).cloned())
    }

    async fn create(&self, user: &InsertUser) -> Result<(), StoreError> {
        let mut state = self.state();
        if state.users.contains_key(&user.email) {
            return Err(StoreError::AlreadyExists("users_pkey".into()));
        }
        state.users.insert(
            user.email.clone(),
            UserEntity {
                email: user.email.clone(),
                hash_password: user.hash_password.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                created_at: chrono::Utc::now(),
            },
        );
        state.profiles.insert(user.email.clone(), ProfileFields::default());
        Ok(())
    }
}

#[async_trait::async_trait]
impl FriendRepository for MemoryStore {
    async fn get_by_ordered_pair(
        &self,
        requester_email: &str,
        recipient_email: &str,
    ) -> Result<Option<FriendshipEntity>, StoreError> {
        let state = self.state();
        let found = state
            .friendships
            .iter()
            .find(|f| f.requester_email == requester_email && f.recipient_email == recipient_email)
            .cloned();
        Ok(found)
    }

    async fn insert(&self, friendship: &FriendshipEntity) -> Result<(), StoreError> {
        let mut state = self.state();
        for email in [&friendship.requester_email, &friendship.recipient_email] {
            if !state.users.contains_key(email) {
                return Err(StoreError::ForeignKey("friendships_email_fkey".into()));
            }
        }
        let taken = state.friendships.iter().any(|f| {
            f.requester_email == friendship.requester_email
                && f.recipient_email == friendship.recipient_email
        });
        if taken {
            return Err(StoreError::AlreadyExists("friendships_pkey".into()));
        }
        state.friendships.push(friendship.clone());
        Ok(())
    }

    async fn update(&self, friendship: &FriendshipEntity) -> Result<(), StoreError> {
        let mut state = self.state();
        let row = state
            .friendships
            .iter_mut()
            .find(|f| {
                f.requester_email == friendship.requester_email
                    && f.recipient_email == friendship.recipient_email
            })
            .ok_or(StoreError::NotFound)?;
        *row = friendship.clone();
        Ok(())
    }

    async fn delete_by_ordered_pair(
        &self,
        requester_email: &str,
        recipient_email: &str,
    ) -> Result<(), StoreError> {
        self.state()
            .friendships
            .retain(|f| !(f.requester_email == requester_email && f.recipient_email == recipient_email));
        Ok(())
    }

    async fn list_pending_touching(
        &self,
        email: &str,
    ) -> Result<Vec<FriendshipEntity>, StoreError> {
        let state = self.state();
        Ok(state
            .friendships
            .iter()
            .filter(|f| (f.requester_email == email || f.recipient_email == email) && !f.is_connected())
            .cloned()
            .collect())
    }

    async fn list_connected(&self, email: &str) -> Result<Vec<FriendshipEntity>, StoreError> {
        let state = self.state();
        Ok(state
            .friendships
            .iter()
            .filter(|f| (f.requester_email == email || f.recipient_email == email) && f.is_connected())
            .cloned()
            .collect())
    }

    async fn search_users(
        &self,
        filter: &SearchUsersQuery,
    ) -> Result<Vec<UserSummary>, StoreError> {
        let state = self.state();
        let mut users: Vec<UserSummary> = state
            .users
            .values()
            .filter_map(|u| {
                let hometown = state
                    .profiles
                    .get(&u.email)
                    .and_then(|p| p.hometown.clone())
                    .unwrap_or_default();

                let by_email = filter.email().is_some_and(|e| u.email.eq_ignore_ascii_case(e));
                let by_name = filter.name().is_some_and(|n| {
                    contains_ignore_case(&u.first_name, n) || contains_ignore_case(&u.last_name, n)
                });
                let by_hometown = filter
                    .hometown()
                    .is_some_and(|h| !hometown.is_empty() && contains_ignore_case(&hometown, h));

                (by_email || by_name || by_hometown).then(|| UserSummary {
                    email: u.email.clone(),
                    first_name: u.first_name.clone(),
                    last_name: u.last_name.clone(),
                    hometown,
                })
            })
            .collect();
        users.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(users)
    }
}

#[async_trait::async_trait]
impl ProfileRepository for MemoryStore {
    async fn get(&self, email: &str) -> Result<ProfileEntity, StoreError> {
        let state = self.state();
        let user = state.users.get(email).ok_or(StoreError::NotFound)?;
        let fields = state.profiles.get(email).cloned().unwrap_or_default();

        Ok(ProfileEntity {
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            sex: fields.sex,
            birthdate: fields.birthdate,
            current_city: fields.current_city,
            hometown: fields.hometown,
            interests: fields.interests,
            education: fields.education,
            professional: fields.professional,
        })
    }

    async fn replace_all(&self, email: &str, fields: &ProfileFields) -> Result<(), StoreError> {
        let mut state = self.state();
        if !state.users.contains_key(email) {
            return Err(StoreError::NotFound);
        }

        let unknown_school = fields
            .education
            .iter()
            .any(|a| !state.schools.iter().any(|s| s.school_name == a.school_name));
        if unknown_school {
            return Err(StoreError::ForeignKey("attends_school_name_fkey".into()));
        }

        let unknown_employer = fields
            .professional
            .iter()
            .any(|e| !state.employers.iter().any(|x| x.employer_name == e.employer_name));
        if unknown_employer {
            return Err(StoreError::ForeignKey("employments_employer_name_fkey".into()));
        }

        state.profiles.insert(email.to_string(), fields.clone());
        Ok(())
    }

    async fn list_schools(&self) -> Result<Vec<SchoolEntity>, StoreError> {
        Ok(self.state().schools.clone())
    }

    async fn list_employers(&self) -> Result<Vec<EmployerEntity>, StoreError> {
        Ok(self.state().employers.clone())
    }
}

#[cfg(test)]
impl MemoryStore {
    pub fn insert_test_user(&self, email: &str, first_name: &str, last_name: &str) {
        let mut state = self.state();
        state.users.insert(
            email.to_string(),
            UserEntity {
                email: email.to_string(),
                hash_password: String::new(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                created_at: chrono::Utc::now(),
            },
        );
        state.profiles.entry(email.to_string()).or_default();
    }

    pub fn set_test_hometown(&self, email: &str, hometown: &str) {
        let mut state = self.state();
        state.profiles.entry(email.to_string()).or_default().hometown = Some(hometown.to_string());
    }
}
