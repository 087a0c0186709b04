#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};
    use uuid::Uuid;

    use crate::database::entity::{trip, user};
    use crate::database::postgres_base::map_db_err;
    use crate::database::postgres_repo::{PostgresTripRepository, PostgresUserRepository};
    use tripgenius_core::domain::{DayPlan, Itinerary, Mood, Trip, TripDraft};
    use tripgenius_core::error::RepoError;
    use tripgenius_core::ports::{BaseRepository, TripRepository, UserRepository};

    fn trip_model(id: Uuid, user_id: Uuid, destination: &str) -> trip::Model {
        let now = Utc::now();
        trip::Model {
            id,
            user_id,
            destination: destination.to_owned(),
            start_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 9).unwrap(),
            budget: 2400.0,
            members: serde_json::json!(["Mia", "Leo"]),
            mood: Some("adventure".to_owned()),
            itinerary: None,
            favorite: true,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_trip_by_id() {
        let trip_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![trip_model(trip_id, user_id, "Reykjavik")]])
            .into_connection();

        let repo = PostgresTripRepository::new(db);

        let trip: Trip = repo.find_by_id(trip_id).await.unwrap().unwrap();

        assert_eq!(trip.id, trip_id);
        assert_eq!(trip.destination, "Reykjavik");
        assert_eq!(trip.members, vec!["Mia".to_string(), "Leo".to_string()]);
        assert_eq!(trip.mood, Some(Mood::Adventure));
        assert!(trip.favorite);
    }

    #[tokio::test]
    async fn test_find_trips_by_user() {
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                trip_model(Uuid::new_v4(), user_id, "Lima"),
                trip_model(Uuid::new_v4(), user_id, "Quito"),
            ]])
            .into_connection();

        let trips = PostgresTripRepository::new(db)
            .find_by_user_id(user_id)
            .await
            .unwrap();

        assert_eq!(trips.len(), 2);
        assert!(trips.iter().all(|t| t.user_id == user_id));
    }

    #[tokio::test]
    async fn test_delete_missing_trip_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresTripRepository::new(db);
        let result = BaseRepository::<Trip, Uuid>::delete(&repo, Uuid::new_v4()).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    fn planned_trip(user_id: Uuid) -> Trip {
        Trip::create(
            user_id,
            TripDraft {
                destination: "Oaxaca".to_owned(),
                start_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
                budget: 1800.0,
                members: vec!["Mia".to_owned(), "Leo".to_owned()],
                mood: Some(Mood::Foodie),
                itinerary: Some(Itinerary {
                    destination: "Oaxaca".to_owned(),
                    mood: Mood::Foodie,
                    days: vec![DayPlan {
                        day: 1,
                        theme: "Markets".to_owned(),
                        activities: vec!["Breakfast at Mercado 20 de Noviembre".to_owned()],
                    }],
                }),
            },
        )
        .unwrap()
    }

    /// The row Postgres hands back from `INSERT ... RETURNING`.
    fn stored_row(trip: &Trip) -> trip::Model {
        trip::Model {
            id: trip.id,
            user_id: trip.user_id,
            destination: trip.destination.clone(),
            start_date: trip.start_date,
            end_date: trip.end_date,
            budget: trip.budget,
            members: serde_json::to_value(&trip.members).unwrap(),
            mood: trip.mood.map(|m| m.as_str().to_owned()),
            itinerary: trip
                .itinerary
                .as_ref()
                .map(|i| serde_json::to_value(i).unwrap()),
            favorite: trip.favorite,
            created_at: trip.created_at.into(),
            updated_at: trip.updated_at.into(),
        }
    }

    #[tokio::test]
    async fn test_save_inserts_trip_with_json_columns() {
        let trip = planned_trip(Uuid::new_v4());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored_row(&trip)]])
            .into_connection();
        let repo = PostgresTripRepository::new(db);

        let saved = BaseRepository::<Trip, Uuid>::save(&repo, trip.clone())
            .await
            .unwrap();

        assert_eq!(saved.id, trip.id);
        assert_eq!(saved.members, vec!["Mia".to_string(), "Leo".to_string()]);
        assert_eq!(saved.mood, Some(Mood::Foodie));
        assert_eq!(saved.itinerary, trip.itinerary);
        assert!(!saved.favorite);
    }

    #[tokio::test]
    async fn test_update_writes_existing_trip() {
        let mut trip = planned_trip(Uuid::new_v4());
        trip.toggle_favorite();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored_row(&trip)]])
            .into_connection();

        let updated = PostgresTripRepository::new(db)
            .update(trip.clone())
            .await
            .unwrap();
        assert!(updated.favorite);
    }

    #[tokio::test]
    async fn test_update_of_deleted_trip_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<trip::Model>::new()])
            .into_connection();

        let result = PostgresTripRepository::new(db)
            .update(planned_trip(Uuid::new_v4()))
            .await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[test]
    fn test_db_errors_map_to_repo_errors() {
        assert!(matches!(
            map_db_err(DbErr::RecordNotFound("trips".to_owned())),
            RepoError::NotFound
        ));
        assert!(matches!(
            map_db_err(DbErr::Query(RuntimeErr::Internal("syntax error".to_owned()))),
            RepoError::Query(msg) if msg.contains("syntax error")
        ));
        assert!(matches!(
            map_db_err(DbErr::Custom("pool closed".to_owned())),
            RepoError::Query(_)
        ));
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id,
                name: "Ada".to_owned(),
                email: "ada@example.com".to_owned(),
                password_hash: "hash".to_owned(),
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let user = PostgresUserRepository::new(db)
            .find_by_email("Ada@Example.com")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.name, "Ada");
    }
}
