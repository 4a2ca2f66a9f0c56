// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The user's saved plants.
//!
//! An ordered, in-memory list keyed by scientific name (exact, case-sensitive).
//! Created empty, never persisted.

use serde::Serialize;
use sprout_core::PlantRecord;
use thiserror::Error;
use tracing::{debug, info};

/// Returned by [`GardenCollection::add`] when the plant is already saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{common_name} is already in your garden!")]
pub struct DuplicatePlant {
    pub common_name: String,
    pub scientific_name: String,
}

/// Ordered set of saved plant records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GardenCollection {
    plants: Vec<PlantRecord>,
}

impl GardenCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` unless a plant with the same scientific name exists.
    ///
    /// On duplicate the collection is left unchanged.
    pub fn add(&mut self, record: PlantRecord) -> Result<(), DuplicatePlant> {
        if self.contains(&record.scientific_name) {
            debug!(
                scientific_name = record.scientific_name.as_str(),
                "rejected duplicate plant"
            );
            return Err(DuplicatePlant {
                common_name: record.common_name,
                scientific_name: record.scientific_name,
            });
        }

        info!(
            scientific_name = record.scientific_name.as_str(),
            count = self.plants.len() + 1,
            "plant added to garden"
        );
        self.plants.push(record);
        Ok(())
    }

    /// Removes the plant with `scientific_name`. Missing names are ignored.
    ///
    /// Returns whether a plant was removed.
    pub fn remove(&mut self, scientific_name: &str) -> bool {
        let before = self.plants.len();
        self.plants.retain(|p| p.scientific_name != scientific_name);
        let removed = self.plants.len() != before;
        if removed {
            info!(scientific_name, "plant removed from garden");
        }
        removed
    }

    /// Read-only view in insertion order.
    pub fn list(&self) -> &[PlantRecord] {
        &self.plants
    }

    pub fn get(&self, scientific_name: &str) -> Option<&PlantRecord> {
        self.plants
            .iter()
            .find(|p| p.scientific_name == scientific_name)
    }

    pub fn contains(&self, scientific_name: &str) -> bool {
        self.get(scientific_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::{CareInstructions, ImageData};

    fn plant(common: &str, scientific: &str) -> PlantRecord {
        PlantRecord {
            common_name: common.into(),
            scientific_name: scientific.into(),
            description: "No description provided.".into(),
            care: CareInstructions {
                sunlight: "N/A".into(),
                watering: "N/A".into(),
                soil: "N/A".into(),
                fertilizer: "N/A".into(),
            },
            toxicity: "N/A".into(),
            common_pests: "N/A".into(),
            source_image: ImageData::from_bytes("image/png", b"leaf"),
        }
    }

    #[test]
    fn duplicate_scientific_name_is_rejected() {
        let mut garden = GardenCollection::new();
        garden
            .add(plant("Fiddle-leaf Fig", "Ficus lyrata"))
            .expect("first add succeeds");

        let err = garden
            .add(plant("Banjo Fig", "Ficus lyrata"))
            .expect_err("second add is a duplicate");
        assert_eq!(err.to_string(), "Banjo Fig is already in your garden!");
        assert_eq!(garden.len(), 1);
        assert_eq!(garden.list()[0].common_name, "Fiddle-leaf Fig");
    }

    #[test]
    fn scientific_name_match_is_case_sensitive() {
        let mut garden = GardenCollection::new();
        garden.add(plant("Fig", "Ficus lyrata")).unwrap();
        garden.add(plant("Fig", "ficus lyrata")).unwrap();
        assert_eq!(garden.len(), 2);
    }

    #[test]
    fn remove_nonexistent_is_a_noop() {
        let mut garden = GardenCollection::new();
        garden.add(plant("Fig", "Ficus lyrata")).unwrap();

        let before = garden.list().to_vec();

        assert!(!garden.remove("nonexistent"));
        assert_eq!(garden.list(), before.as_slice());
        assert_eq!(garden.list()[0].scientific_name, "Ficus lyrata");
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut garden = GardenCollection::new();
        garden.add(plant("Fig", "Ficus lyrata")).unwrap();
        garden.add(plant("Pothos", "Epipremnum aureum")).unwrap();
        garden.add(plant("Jade", "Crassula ovata")).unwrap();

        assert!(garden.remove("Epipremnum aureum"));
        let names: Vec<&str> = garden
            .list()
            .iter()
            .map(|p| p.scientific_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ficus lyrata", "Crassula ovata"]);
        assert!(!garden.contains("Epipremnum aureum"));
    }

    #[test]
    fn starts_empty_and_serializes_as_list() {
        let mut garden = GardenCollection::new();
        assert!(garden.is_empty());
        garden.add(plant("Jade", "Crassula ovata")).unwrap();

        let json = serde_json::to_value(&garden).unwrap();
        assert_eq!(json["plants"][0]["scientific_name"], "Crassula ovata");
    }
}
