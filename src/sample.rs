//! Seed register used on first run and on reset.

use crate::models::AssetRecord;
use crate::validator::new_id;

struct Seed {
    name: &'static str,
    asset_type: &'static str,
    country: &'static str,
    location: &'static str,
    // C, A, R, V, E, Rz
    ratings: [f64; 6],
    notes: &'static str,
}

const SEEDS: [Seed; 5] = [
    Seed {
        name: "Kivu Ridge VHF Site",
        asset_type: "VHF Comms",
        country: "DRC",
        location: "North Kivu",
        ratings: [5.0, 4.0, 3.0, 4.0, 5.0, 5.0],
        notes: "Primary ATC coverage; community tensions nearby; guarded 12h/day.",
    },
    Seed {
        name: "Shamal Radar Tower",
        asset_type: "Primary Radar",
        country: "Iraq",
        location: "Nineveh",
        ratings: [5.0, 3.0, 3.0, 3.0, 5.0, 4.0],
        notes: "Dual-use air picture node; intermittent power grid stability.",
    },
    Seed {
        name: "Coastal SATCOM Hub",
        asset_type: "SATCOM Relay",
        country: "Somalia",
        location: "Puntland",
        ratings: [4.0, 4.0, 2.0, 3.0, 4.0, 4.0],
        notes: "Backbone for remote sites; subject to cyclones; private guard force.",
    },
    Seed {
        name: "Highland Fuel Depot",
        asset_type: "Logistics",
        country: "Peru",
        location: "Cajamarca",
        ratings: [5.0, 3.0, 2.0, 4.0, 5.0, 5.0],
        notes: "Feeds remote extraction site; protest risk; visible/identifiable target.",
    },
    Seed {
        name: "Eastern Fiber POP",
        asset_type: "Telecom POP",
        country: "Georgia",
        location: "Kvemo Kartli",
        ratings: [4.0, 2.0, 4.0, 3.0, 3.0, 3.0],
        notes: "Regional backhaul; redundancy available; moderate recognizability.",
    },
];

/// The five sample sites, each with a fresh identifier.
pub fn sample_records() -> Vec<AssetRecord> {
    SEEDS
        .iter()
        .map(|seed| {
            let [c, a, r, v, e, rz] = seed.ratings;
            AssetRecord {
                id: new_id(),
                name: seed.name.to_string(),
                asset_type: seed.asset_type.to_string(),
                country: seed.country.to_string(),
                location: seed.location.to_string(),
                criticality: c,
                accessibility: a,
                recuperability: r,
                vulnerability: v,
                effect: e,
                recognizability: rz,
                notes: seed.notes.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::derive;

    #[test]
    fn test_sample_register() {
        let records = sample_records();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].name, "Kivu Ridge VHF Site");
        assert_eq!(records[0].recognizability, 5.0);

        // L = mean(4,4,5) = 4.33, I = mean(5,5,3) = 4.33
        let d = derive(&records[0]);
        assert_eq!(d.likelihood, 4.33);
        assert_eq!(d.impact, 4.33);
        assert_eq!(d.score, 18.75);
    }

    #[test]
    fn test_sample_ids_are_fresh() {
        let first = sample_records();
        let second = sample_records();
        assert_ne!(first[0].id, second[0].id);
    }
}
