//! In-memory repositories - the default persistence when no database is configured.
//!
//! Data lives for the lifetime of the process. Each table is a `HashMap`
//! behind an async `RwLock`, so concurrent handlers never observe a
//! half-applied write.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use tripgenius_core::domain::{Trip, User, normalize_email};
use tripgenius_core::error::RepoError;
use tripgenius_core::ports::{BaseRepository, TripRepository, UserRepository};

struct Table<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    async fn get(&self, id: Uuid) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    async fn remove(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

/// In-memory user repository. Emails are unique, compared case-insensitively.
pub struct InMemoryUserRepository {
    table: Table<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.table.get(id).await)
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut rows = self.table.rows.write().await;

        let email = normalize_email(&user.email);
        let taken = rows
            .values()
            .any(|existing| existing.id != user.id && existing.email == email);
        if taken {
            return Err(RepoError::Constraint("Email already registered".to_string()));
        }

        let stored = User { email, ..user };
        rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.table.remove(id).await
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let email = normalize_email(email);
        Ok(self
            .table
            .rows
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}

/// In-memory trip repository.
pub struct InMemoryTripRepository {
    table: Table<Trip>,
}

impl InMemoryTripRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryTripRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Trip, Uuid> for InMemoryTripRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Trip>, RepoError> {
        Ok(self.table.get(id).await)
    }

    async fn save(&self, trip: Trip) -> Result<Trip, RepoError> {
        self.table.rows.write().await.insert(trip.id, trip.clone());
        Ok(trip)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.table.remove(id).await
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Trip>, RepoError> {
        let mut trips: Vec<Trip> = self
            .table
            .rows
            .read()
            .await
            .values()
            .filter(|trip| trip.user_id == user_id)
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(trips)
    }

    async fn update(&self, trip: Trip) -> Result<Trip, RepoError> {
        match self.table.rows.write().await.get_mut(&trip.id) {
            Some(row) => {
                *row = trip.clone();
                Ok(trip)
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use tripgenius_core::domain::TripDraft;

    fn trip_for(user_id: Uuid, destination: &str) -> Trip {
        Trip::create(
            user_id,
            TripDraft {
                destination: destination.to_string(),
                start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
                budget: 500.0,
                members: vec![],
                mood: None,
                itinerary: None,
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_user_save_and_lookup_by_email() {
        let repo = InMemoryUserRepository::new();
        let user = User::new("Ada".to_string(), "ada@example.com", "hash".to_string());
        repo.save(user.clone()).await.unwrap();

        let found = repo.find_by_email("  ADA@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(repo.find_by_id(user.id).await.unwrap().is_some());
        assert!(repo.find_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let repo = InMemoryUserRepository::new();
        repo.save(User::new("A".to_string(), "a@example.com", "h".to_string()))
            .await
            .unwrap();

        let err = repo
            .save(User::new("B".to_string(), "A@example.com", "h".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_user_update_keeps_own_email() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo
            .save(User::new("A".to_string(), "a@example.com", "h".to_string()))
            .await
            .unwrap();

        user.name = "Renamed".to_string();
        let saved = repo.save(user.clone()).await.unwrap();
        assert_eq!(saved.name, "Renamed");
    }

    #[tokio::test]
    async fn test_trips_listed_per_owner_newest_first() {
        let repo = InMemoryTripRepository::new();
        let owner = Uuid::new_v4();

        let mut older = trip_for(owner, "Rome");
        older.created_at -= Duration::hours(1);
        let newer = trip_for(owner, "Paris");
        let foreign = trip_for(Uuid::new_v4(), "Cairo");

        for trip in [older.clone(), newer.clone(), foreign] {
            repo.save(trip).await.unwrap();
        }

        let trips = repo.find_by_user_id(owner).await.unwrap();
        let names: Vec<_> = trips.iter().map(|t| t.destination.as_str()).collect();
        assert_eq!(names, vec!["Paris", "Rome"]);
    }

    #[tokio::test]
    async fn test_trip_save_overwrites_and_delete() {
        let repo = InMemoryTripRepository::new();
        let mut trip = repo.save(trip_for(Uuid::new_v4(), "Rome")).await.unwrap();

        trip.favorite = true;
        repo.save(trip.clone()).await.unwrap();
        assert!(repo.find_by_id(trip.id).await.unwrap().unwrap().favorite);

        repo.delete(trip.id).await.unwrap();
        assert!(repo.find_by_id(trip.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(trip.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_after_delete_does_not_resurrect() {
        let repo = InMemoryTripRepository::new();
        let mut trip = repo.save(trip_for(Uuid::new_v4(), "Kyoto")).await.unwrap();

        trip.budget = 750.0;
        let updated = repo.update(trip.clone()).await.unwrap();
        assert_eq!(updated.budget, 750.0);
        assert_eq!(repo.find_by_id(trip.id).await.unwrap().unwrap().budget, 750.0);

        // A favorite toggle that read the trip before a concurrent delete.
        repo.delete(trip.id).await.unwrap();
        trip.toggle_favorite();
        assert!(matches!(repo.update(trip.clone()).await, Err(RepoError::NotFound)));
        assert!(repo.find_by_id(trip.id).await.unwrap().is_none());
    }
}
