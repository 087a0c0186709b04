//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use tripgenius_core::domain::{Trip, User, mask_email, normalize_email};
use tripgenius_core::error::RepoError;
use tripgenius_core::ports::{TripRepository, UserRepository};

use super::entity::trip::{self, Entity as TripEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL trip repository.
pub type PostgresTripRepository = PostgresBaseRepository<TripEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let email = normalize_email(email);
        tracing::debug!(user_email = %mask_email(&email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl TripRepository for PostgresTripRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Trip>, RepoError> {
        let result = TripEntity::find()
            .filter(trip::Column::UserId.eq(user_id))
            .order_by_desc(trip::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update(&self, trip: Trip) -> Result<Trip, RepoError> {
        let active: trip::ActiveModel = trip.into();
        let model = active.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => RepoError::NotFound,
            other => map_db_err(other),
        })?;

        Ok(model.into())
    }
}
