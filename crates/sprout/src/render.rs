// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering for plant cards, the garden list, and chat turns.

use colored::Colorize;
use serde::Serialize;
use sprout_core::{CareInstructions, ChatTurn, PlantRecord, Sender};
use sprout_garden::GardenCollection;

/// A plant as printed by `sprout identify --json`. The image is left out.
#[derive(Serialize)]
struct PlantJson<'a> {
    common_name: &'a str,
    scientific_name: &'a str,
    description: &'a str,
    care: &'a CareInstructions,
    toxicity: &'a str,
    common_pests: &'a str,
    image_mime_type: &'a str,
}

pub fn plant_json(record: &PlantRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&PlantJson {
        common_name: &record.common_name,
        scientific_name: &record.scientific_name,
        description: &record.description,
        care: &record.care,
        toxicity: &record.toxicity,
        common_pests: &record.common_pests,
        image_mime_type: &record.source_image.mime_type,
    })
}

/// Full card for one plant.
pub fn plant_card(record: &PlantRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", record.common_name.bold().green()));
    out.push_str(&format!("{}\n\n", record.scientific_name.italic().dimmed()));
    out.push_str(&format!("{}\n\n", record.description));

    out.push_str(&format!("{}\n", "Care Instructions".bold()));
    for (label, value) in [
        ("Sunlight", &record.care.sunlight),
        ("Watering", &record.care.watering),
        ("Soil", &record.care.soil),
        ("Fertilizer", &record.care.fertilizer),
    ] {
        out.push_str(&format!("  {:<12}{value}\n", format!("{label}:").cyan()));
    }

    out.push_str(&format!("\n{}\n", "Additional Details".bold()));
    out.push_str(&format!("  {:<14}{}\n", "Toxicity:".red(), record.toxicity));
    out.push_str(&format!("  {:<14}{}\n", "Common Pests:".yellow(), record.common_pests));
    out
}

/// Header with the collection count badge.
pub fn garden_header(garden: &GardenCollection) -> String {
    format!(
        "{} {}",
        "My Plants Corner".bold().green(),
        format!("({})", garden.len()).dimmed()
    )
}

/// Numbered garden listing.
pub fn garden_list(garden: &GardenCollection) -> String {
    let mut out = format!("{}\n", garden_header(garden));
    if garden.is_empty() {
        out.push_str("Your garden is empty.\n");
        out.push_str(&format!(
            "{}\n",
            "Identify a plant and use /add to start your collection!".dimmed()
        ));
        return out;
    }
    for (i, plant) in garden.list().iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} {}\n",
            i + 1,
            plant.common_name.bold(),
            format!("({})", plant.scientific_name).italic()
        ));
    }
    out
}

pub fn chat_turn(turn: &ChatTurn) -> String {
    match turn.sender {
        Sender::User => format!("{} {}", "you>".blue().bold(), turn.text),
        Sender::Bot if turn.pending => format!("{} {}", "sprout>".green().bold(), "...".dimmed()),
        Sender::Bot => format!("{} {}", "sprout>".green().bold(), turn.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::ImageData;

    fn fern() -> PlantRecord {
        PlantRecord {
            common_name: "Boston Fern".into(),
            scientific_name: "Nephrolepis exaltata".into(),
            description: "Feathery fronds.".into(),
            care: CareInstructions {
                sunlight: "Indirect".into(),
                watering: "Keep moist".into(),
                soil: "Peaty".into(),
                fertilizer: "Monthly".into(),
            },
            toxicity: "Non-toxic".into(),
            common_pests: "Scale".into(),
            source_image: ImageData::from_bytes("image/webp", b"fern"),
        }
    }

    #[test]
    fn card_lists_every_field() {
        colored::control::set_override(false);
        let card = plant_card(&fern());
        for needle in [
            "Boston Fern",
            "Nephrolepis exaltata",
            "Feathery fronds.",
            "Sunlight:",
            "Keep moist",
            "Peaty",
            "Monthly",
            "Non-toxic",
            "Scale",
        ] {
            assert!(card.contains(needle), "missing {needle} in {card}");
        }
    }

    #[test]
    fn json_omits_image_bytes() {
        let json: serde_json::Value = serde_json::from_str(&plant_json(&fern()).unwrap()).unwrap();
        assert_eq!(json["scientific_name"], "Nephrolepis exaltata");
        assert_eq!(json["care"]["watering"], "Keep moist");
        assert_eq!(json["image_mime_type"], "image/webp");
        assert!(json.get("source_image").is_none());
    }

    #[test]
    fn garden_list_counts_and_numbers() {
        colored::control::set_override(false);
        let mut garden = GardenCollection::new();
        assert!(garden_list(&garden).contains("Your garden is empty."));
        assert!(garden_header(&garden).contains("(0)"));

        garden.add(fern()).unwrap();
        let listing = garden_list(&garden);
        assert!(listing.contains("My Plants Corner (1)"));
        assert!(listing.contains("1. Boston Fern (Nephrolepis exaltata)"));
    }

    #[test]
    fn pending_turn_shows_ellipsis() {
        colored::control::set_override(false);
        assert_eq!(chat_turn(&ChatTurn::pending_bot()), "sprout> ...");
        assert_eq!(chat_turn(&ChatTurn::user("hi")), "you> hi");
    }
}
