//! Entity kinds, their allowed key sets and the field classification tables
//! that drive value coercion.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// An open JSON object. Entities carry no fixed schema; the allowed key set
/// of their kind is applied by filtering.
pub type Entity = Map<String, Value>;

pub const PEOPLE_KEYS: &[&str] = &[
    "url", "name", "height", "mass", "hair_color", "skin_color", "eye_color",
    "birth_year", "gender", "homeworld", "species",
];

pub const HOTH_KEYS: &[&str] = &[
    "url", "name", "system_position", "natural_satellites", "rotation_period",
    "orbital_period", "diameter", "climate", "gravity", "terrain",
    "surface_water", "population", "indigenous_life_forms",
];

pub const PLANET_KEYS: &[&str] = &[
    "url", "name", "rotation_period", "orbital_period", "diameter", "climate",
    "gravity", "terrain", "surface_water", "population",
];

pub const STARSHIP_KEYS: &[&str] = &[
    "url", "starship_class", "name", "model", "manufacturer", "length", "width",
    "max_atmosphering_speed", "hyperdrive_rating", "MGLT", "crew", "passengers",
    "cargo_capacity", "consumables", "armament",
];

pub const SPECIES_KEYS: &[&str] = &[
    "url", "name", "classification", "designation", "average_height",
    "skin_colors", "hair_colors", "eye_colors", "average_lifespan", "language",
];

pub const VEHICLE_KEYS: &[&str] = &[
    "url", "vehicle_class", "name", "model", "manufacturer", "length",
    "max_atmosphering_speed", "crew", "passengers", "cargo_capacity",
    "consumables", "armament",
];

const FLOAT_FIELDS: &[&str] = &["gravity", "length", "hyperdrive_rating"];

const INT_FIELDS: &[&str] = &[
    "rotation_period", "orbital_period", "diameter", "surface_water",
    "population", "height", "mass", "average_height", "average_lifespan",
    "max_atmosphering_speed", "MGLT", "crew", "passengers", "cargo_capacity",
];

const LIST_FIELDS: &[&str] = &[
    "hair_color", "skin_color", "climate", "terrain", "skin_colors",
    "hair_colors", "eye_colors",
];

/// Kind of record, passed explicitly to the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Person,
    Planet,
    /// Planet record with the Echo Base extras (system position, satellites, life forms)
    HothPlanet,
    Starship,
    Vehicle,
    Species,
}

impl EntityKind {
    pub fn allowed_keys(self) -> &'static [&'static str] {
        match self {
            EntityKind::Person => PEOPLE_KEYS,
            EntityKind::Planet => PLANET_KEYS,
            EntityKind::HothPlanet => HOTH_KEYS,
            EntityKind::Starship => STARSHIP_KEYS,
            EntityKind::Vehicle => VEHICLE_KEYS,
            EntityKind::Species => SPECIES_KEYS,
        }
    }

    /// Guess the kind of an untagged record from a discriminating key.
    ///
    /// Checked in order: `gender`, `surface_water`, `starship_class`,
    /// `classification`, `vehicle_class`. Returns `None` when nothing matches.
    pub fn infer(entity: &Entity) -> Option<EntityKind> {
        const SIGNATURES: &[(&str, EntityKind)] = &[
            ("gender", EntityKind::Person),
            ("surface_water", EntityKind::HothPlanet),
            ("starship_class", EntityKind::Starship),
            ("classification", EntityKind::Species),
            ("vehicle_class", EntityKind::Vehicle),
        ];

        SIGNATURES
            .iter()
            .find(|(key, _)| entity.contains_key(*key))
            .map(|(_, kind)| *kind)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Person => "person",
            EntityKind::Planet => "planet",
            EntityKind::HothPlanet => "hoth_planet",
            EntityKind::Starship => "starship",
            EntityKind::Vehicle => "vehicle",
            EntityKind::Species => "species",
        };
        f.write_str(name)
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "person" | "people" => Ok(EntityKind::Person),
            "planet" | "planets" => Ok(EntityKind::Planet),
            "hoth" | "hoth_planet" => Ok(EntityKind::HothPlanet),
            "starship" | "starships" => Ok(EntityKind::Starship),
            "vehicle" | "vehicles" => Ok(EntityKind::Vehicle),
            "species" => Ok(EntityKind::Species),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

/// How a field's string value is coerced during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Float,
    List,
    Homeworld,
    Species,
    Text,
}

impl FieldType {
    pub fn of(key: &str) -> FieldType {
        if INT_FIELDS.contains(&key) {
            FieldType::Integer
        } else if FLOAT_FIELDS.contains(&key) {
            FieldType::Float
        } else if LIST_FIELDS.contains(&key) {
            FieldType::List
        } else if key == "homeworld" {
            FieldType::Homeworld
        } else if key == "species" {
            FieldType::Species
        } else {
            FieldType::Text
        }
    }
}
