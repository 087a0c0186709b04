//! Trip entity for SeaORM.
//!
//! `members` and `itinerary` are stored as JSON columns; `mood` as its
//! lowercase name.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use tripgenius_core::domain::{Itinerary, Mood, Trip};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub destination: String,
    pub start_date: Date,
    pub end_date: Date,
    #[sea_orm(column_type = "Double")]
    pub budget: f64,
    pub members: Json,
    pub mood: Option<String>,
    pub itinerary: Option<Json>,
    pub favorite: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Trip.
///
/// Rows written by this service always decode; anything else is logged and
/// degraded (empty members, no itinerary, no mood) rather than failing reads.
impl From<Model> for Trip {
    fn from(model: Model) -> Self {
        let members = serde_json::from_value::<Vec<String>>(model.members).unwrap_or_else(|e| {
            tracing::warn!(trip_id = %model.id, error = %e, "Undecodable members column");
            Vec::new()
        });
        let itinerary = model
            .itinerary
            .and_then(|raw| serde_json::from_value::<Itinerary>(raw).ok());
        let mood = model.mood.and_then(|raw| raw.parse::<Mood>().ok());

        Self {
            id: model.id,
            user_id: model.user_id,
            destination: model.destination,
            start_date: model.start_date,
            end_date: model.end_date,
            budget: model.budget,
            members,
            mood,
            itinerary,
            favorite: model.favorite,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Trip to SeaORM ActiveModel.
impl From<Trip> for ActiveModel {
    fn from(trip: Trip) -> Self {
        Self {
            id: Set(trip.id),
            user_id: Set(trip.user_id),
            destination: Set(trip.destination),
            start_date: Set(trip.start_date),
            end_date: Set(trip.end_date),
            budget: Set(trip.budget),
            members: Set(serde_json::json!(trip.members)),
            mood: Set(trip.mood.map(|m| m.as_str().to_string())),
            itinerary: Set(trip.itinerary.and_then(|i| serde_json::to_value(i).ok())),
            favorite: Set(trip.favorite),
            created_at: Set(trip.created_at.into()),
            updated_at: Set(trip.updated_at.into()),
        }
    }
}
