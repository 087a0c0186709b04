//! Mood-driven itinerary generation.
//!
//! Plans are assembled from an [`ActivityCatalog`]: for every mood an ordered
//! list of day templates whose activity strings may reference the destination
//! through a `{destination}` placeholder. The catalog is data, so deployments
//! can ship their own JSON file instead of the built-in table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{DayPlan, Itinerary, Mood};
use crate::error::DomainError;

pub const DEFAULT_DAYS: u32 = 3;
pub const MAX_DAYS: u32 = 14;

const PLACEHOLDER: &str = "{destination}";

/// A single day's theme and activity templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTemplate {
    pub theme: String,
    pub activities: Vec<String>,
}

impl DayTemplate {
    fn new(theme: &str, activities: &[&str]) -> Self {
        Self {
            theme: theme.to_string(),
            activities: activities.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Mood to day-template lookup table.
#[derive(Debug, Clone)]
pub struct ActivityCatalog {
    templates: HashMap<Mood, Vec<DayTemplate>>,
}

impl ActivityCatalog {
    /// Build a catalog, checking that every mood is covered.
    pub fn new(templates: HashMap<Mood, Vec<DayTemplate>>) -> Result<Self, DomainError> {
        for mood in Mood::ALL {
            let days = templates.get(&mood).ok_or_else(|| {
                DomainError::validation(format!("catalog has no templates for mood '{mood}'"))
            })?;
            if days.is_empty() {
                return Err(DomainError::validation(format!(
                    "catalog has no templates for mood '{mood}'"
                )));
            }
            if let Some(day) = days.iter().find(|d| d.activities.is_empty()) {
                return Err(DomainError::validation(format!(
                    "template '{}' for mood '{mood}' has no activities",
                    day.theme
                )));
            }
        }
        Ok(Self { templates })
    }

    /// Parse a catalog from a JSON object keyed by mood name.
    ///
    /// ```json
    /// { "foodie": [{ "theme": "Markets", "activities": ["Eat in {destination}"] }], ... }
    /// ```
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let parsed: HashMap<String, Vec<DayTemplate>> = serde_json::from_str(raw)
            .map_err(|e| DomainError::validation(format!("invalid catalog JSON: {e}")))?;

        let mut templates = HashMap::with_capacity(parsed.len());
        for (key, days) in parsed {
            templates.insert(key.parse::<Mood>()?, days);
        }
        Self::new(templates)
    }

    /// The table shipped with the server.
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();

        templates.insert(
            Mood::Foodie,
            vec![
                DayTemplate::new(
                    "Markets & street food",
                    &[
                        "Morning stroll through the central market of {destination}",
                        "Street-food tasting tour in the old town",
                        "Dinner at a family-run local restaurant",
                    ],
                ),
                DayTemplate::new(
                    "Hands-on cooking",
                    &[
                        "Cooking class featuring classic {destination} dishes",
                        "Visit a spice or specialty ingredient shop",
                        "Evening food walk through the nightlife district",
                    ],
                ),
                DayTemplate::new(
                    "Farm to table",
                    &[
                        "Day trip to a farm or vineyard outside {destination}",
                        "Cheese, wine or tea tasting session",
                        "Chef's tasting menu dinner",
                    ],
                ),
                DayTemplate::new(
                    "Sweet tooth",
                    &[
                        "Bakery and pastry crawl across {destination}",
                        "Coffee roastery visit",
                        "Dessert bar hopping after dark",
                    ],
                ),
            ],
        );

        templates.insert(
            Mood::Adventure,
            vec![
                DayTemplate::new(
                    "Summits & trails",
                    &[
                        "Sunrise hike to the best viewpoint near {destination}",
                        "Picnic lunch on the trail",
                        "Evening recovery at a local hot spring or spa",
                    ],
                ),
                DayTemplate::new(
                    "On the water",
                    &[
                        "Kayaking or rafting excursion around {destination}",
                        "Cliff-side or lakeside swim",
                        "Sunset boat ride",
                    ],
                ),
                DayTemplate::new(
                    "Adrenaline",
                    &[
                        "Zip-lining or paragliding session",
                        "Mountain-bike tour of the {destination} outskirts",
                        "Campfire dinner under the stars",
                    ],
                ),
                DayTemplate::new(
                    "Off the beaten path",
                    &[
                        "Guided trek to a hidden spot locals love in {destination}",
                        "Cave or canyon exploration",
                        "Night photography walk",
                    ],
                ),
            ],
        );

        templates.insert(
            Mood::Relax,
            vec![
                DayTemplate::new(
                    "Slow morning",
                    &[
                        "Late breakfast at a quiet cafe in {destination}",
                        "Spa treatment or massage",
                        "Sunset drinks with a view",
                    ],
                ),
                DayTemplate::new(
                    "Green spaces",
                    &[
                        "Leisurely walk through the gardens of {destination}",
                        "Reading afternoon in a park",
                        "Early dinner and an early night",
                    ],
                ),
                DayTemplate::new(
                    "By the water",
                    &[
                        "Beach or lakeside lounging near {destination}",
                        "Gentle yoga session",
                        "Seafood dinner by the shore",
                    ],
                ),
                DayTemplate::new(
                    "Unplugged",
                    &[
                        "Scenic train or ferry ride out of {destination}",
                        "Afternoon tea in a historic hotel",
                        "Stargazing from a rooftop",
                    ],
                ),
            ],
        );

        templates.insert(
            Mood::Culture,
            vec![
                DayTemplate::new(
                    "History walk",
                    &[
                        "Guided walking tour of historic {destination}",
                        "Visit the main history museum",
                        "Dinner in a centuries-old tavern",
                    ],
                ),
                DayTemplate::new(
                    "Art & architecture",
                    &[
                        "Morning at the leading art gallery of {destination}",
                        "Architecture tour of landmark buildings",
                        "Evening concert or theatre performance",
                    ],
                ),
                DayTemplate::new(
                    "Living traditions",
                    &[
                        "Traditional craft workshop with a local artisan",
                        "Explore a neighbourhood festival or market in {destination}",
                        "Folk music or dance show",
                    ],
                ),
                DayTemplate::new(
                    "Sacred & secular",
                    &[
                        "Tour of temples, churches or mosques in {destination}",
                        "Afternoon at a literary cafe or bookshop",
                        "Local history talk or lecture",
                    ],
                ),
            ],
        );

        Self { templates }
    }

    pub fn templates(&self, mood: Mood) -> &[DayTemplate] {
        self.templates.get(&mood).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for ActivityCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Builds itineraries from a catalog.
#[derive(Debug, Clone, Default)]
pub struct ItineraryGenerator {
    catalog: ActivityCatalog,
}

impl ItineraryGenerator {
    pub fn new(catalog: ActivityCatalog) -> Self {
        Self { catalog }
    }

    /// Generate a plan of `days` days (default 3, at most 14).
    pub fn generate(
        &self,
        destination: &str,
        mood: Mood,
        days: Option<u32>,
    ) -> Result<Itinerary, DomainError> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(DomainError::validation("destination is required"));
        }

        let days = days.unwrap_or(DEFAULT_DAYS);
        if !(1..=MAX_DAYS).contains(&days) {
            return Err(DomainError::validation(format!(
                "days must be between 1 and {MAX_DAYS}"
            )));
        }

        let templates = self.catalog.templates(mood);
        if templates.is_empty() {
            return Err(DomainError::Internal(format!(
                "no templates for mood '{mood}'"
            )));
        }

        let plans = (0..days as usize)
            .map(|index| {
                let template = &templates[index % templates.len()];
                let round = index / templates.len();
                let theme = if round == 0 {
                    template.theme.clone()
                } else {
                    format!("{} (part {})", template.theme, round + 1)
                };
                DayPlan {
                    day: index as u32 + 1,
                    theme,
                    activities: template
                        .activities
                        .iter()
                        .map(|a| a.replace(PLACEHOLDER, destination))
                        .collect(),
                }
            })
            .collect();

        Ok(Itinerary {
            destination: destination.to_string(),
            mood,
            days: plans,
        })
    }
}
