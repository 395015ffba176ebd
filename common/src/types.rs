//! Domain types
//!
//! Types shared by the CLI and any front end:
//! - Camper: a normalized catalog item (built by the parser module)
//! - Review: one normalized review
//! - Features: fixed feature table with integer counts

use serde::{Deserialize, Serialize};

/// Normalized camper
///
/// Every field carries a default so that a partial record never leaves
/// anything undefined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camper {
    pub id: String,
    pub name: String,
    /// Price per night, never negative
    pub price: f64,
    /// 0.0 - 5.0
    pub rating: f64,
    pub location: String,
    pub description: String,
    /// Sleeping capacity derived from the body form
    pub adults: u32,
    pub engine: String,
    pub transmission: String,
    pub details: CamperDetails,
    /// Absolute image URLs, original size
    pub gallery: Vec<String>,
    pub reviews: Vec<Review>,
    pub features: Features,
}

/// Vehicle details table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CamperDetails {
    pub form: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub tank: String,
    pub consumption: String,
}

/// Normalized review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub reviewer_name: String,
    /// Clamped to 0.0 - 5.0
    pub reviewer_rating: f64,
    pub comment: String,
}

impl Default for Review {
    fn default() -> Self {
        Self {
            reviewer_name: "Anonymous".to_string(),
            reviewer_rating: 0.0,
            comment: String::new(),
        }
    }
}

/// Feature keys known to the catalog, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    AirConditioner,
    Bathroom,
    Kitchen,
    Beds,
    Tv,
    Cd,
    Radio,
    Shower,
    Toilet,
    Freezer,
    Hob,
    Microwave,
    Gas,
    Water,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 14] = [
        FeatureKey::AirConditioner,
        FeatureKey::Bathroom,
        FeatureKey::Kitchen,
        FeatureKey::Beds,
        FeatureKey::Tv,
        FeatureKey::Cd,
        FeatureKey::Radio,
        FeatureKey::Shower,
        FeatureKey::Toilet,
        FeatureKey::Freezer,
        FeatureKey::Hob,
        FeatureKey::Microwave,
        FeatureKey::Gas,
        FeatureKey::Water,
    ];

    /// Key as it appears in the serialized domain model
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::AirConditioner => "airConditioner",
            FeatureKey::Bathroom => "bathroom",
            FeatureKey::Kitchen => "kitchen",
            FeatureKey::Beds => "beds",
            FeatureKey::Tv => "TV",
            FeatureKey::Cd => "CD",
            FeatureKey::Radio => "radio",
            FeatureKey::Shower => "shower",
            FeatureKey::Toilet => "toilet",
            FeatureKey::Freezer => "freezer",
            FeatureKey::Hob => "hob",
            FeatureKey::Microwave => "microwave",
            FeatureKey::Gas => "gas",
            FeatureKey::Water => "water",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FeatureKey::AirConditioner => "AC",
            FeatureKey::Bathroom => "Bathroom",
            FeatureKey::Kitchen => "Kitchen",
            FeatureKey::Beds => "Beds",
            FeatureKey::Tv => "TV",
            FeatureKey::Cd => "CD",
            FeatureKey::Radio => "Radio",
            FeatureKey::Shower => "Shower",
            FeatureKey::Toilet => "Toilet",
            FeatureKey::Freezer => "Freezer",
            FeatureKey::Hob => "Hob",
            FeatureKey::Microwave => "Microwave",
            FeatureKey::Gas => "Gas",
            FeatureKey::Water => "Water",
        }
    }

    /// Raw API flag this feature is derived from.
    ///
    /// `shower`/`toilet` come from `bathroom`, `hob` from `kitchen`,
    /// `freezer` from `refrigerator`. `beds` and `CD` have no source flag.
    pub fn api_field(&self) -> Option<&'static str> {
        match self {
            FeatureKey::AirConditioner => Some("AC"),
            FeatureKey::Bathroom | FeatureKey::Shower | FeatureKey::Toilet => Some("bathroom"),
            FeatureKey::Kitchen | FeatureKey::Hob => Some("kitchen"),
            FeatureKey::Tv => Some("TV"),
            FeatureKey::Radio => Some("radio"),
            FeatureKey::Freezer => Some("refrigerator"),
            FeatureKey::Microwave => Some("microwave"),
            FeatureKey::Gas => Some("gas"),
            FeatureKey::Water => Some("water"),
            FeatureKey::Beds | FeatureKey::Cd => None,
        }
    }

    /// Accepts the serialized key (`"airConditioner"`, `"TV"`) or the
    /// display name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim();
        Self::ALL.into_iter().find(|key| {
            key.as_str().eq_ignore_ascii_case(needle) || key.display_name().eq_ignore_ascii_case(needle)
        })
    }
}

impl std::str::FromStr for FeatureKey {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::error::Error::Parse(format!("unknown feature: {s}")))
    }
}

impl std::fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Feature counts, 0 when absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Features {
    pub air_conditioner: u32,
    pub bathroom: u32,
    pub kitchen: u32,
    pub beds: u32,
    #[serde(rename = "TV")]
    pub tv: u32,
    #[serde(rename = "CD")]
    pub cd: u32,
    pub radio: u32,
    pub shower: u32,
    pub toilet: u32,
    pub freezer: u32,
    pub hob: u32,
    pub microwave: u32,
    pub gas: u32,
    pub water: u32,
}

impl Features {
    pub fn get(&self, key: FeatureKey) -> u32 {
        match key {
            FeatureKey::AirConditioner => self.air_conditioner,
            FeatureKey::Bathroom => self.bathroom,
            FeatureKey::Kitchen => self.kitchen,
            FeatureKey::Beds => self.beds,
            FeatureKey::Tv => self.tv,
            FeatureKey::Cd => self.cd,
            FeatureKey::Radio => self.radio,
            FeatureKey::Shower => self.shower,
            FeatureKey::Toilet => self.toilet,
            FeatureKey::Freezer => self.freezer,
            FeatureKey::Hob => self.hob,
            FeatureKey::Microwave => self.microwave,
            FeatureKey::Gas => self.gas,
            FeatureKey::Water => self.water,
        }
    }

    pub fn set(&mut self, key: FeatureKey, count: u32) {
        let slot = match key {
            FeatureKey::AirConditioner => &mut self.air_conditioner,
            FeatureKey::Bathroom => &mut self.bathroom,
            FeatureKey::Kitchen => &mut self.kitchen,
            FeatureKey::Beds => &mut self.beds,
            FeatureKey::Tv => &mut self.tv,
            FeatureKey::Cd => &mut self.cd,
            FeatureKey::Radio => &mut self.radio,
            FeatureKey::Shower => &mut self.shower,
            FeatureKey::Toilet => &mut self.toilet,
            FeatureKey::Freezer => &mut self.freezer,
            FeatureKey::Hob => &mut self.hob,
            FeatureKey::Microwave => &mut self.microwave,
            FeatureKey::Gas => &mut self.gas,
            FeatureKey::Water => &mut self.water,
        };
        *slot = count;
    }

    /// Keys with a count above zero, in table order
    pub fn present(&self) -> Vec<FeatureKey> {
        FeatureKey::ALL
            .into_iter()
            .filter(|key| self.get(*key) > 0)
            .collect()
    }
}

/// Body type offered by the catalog filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CamperType {
    #[serde(rename = "van")]
    Van,
    #[serde(rename = "fully-integrated", alias = "fullyIntegrated")]
    FullyIntegrated,
    #[serde(rename = "alcove")]
    Alcove,
    #[serde(rename = "panelTruck")]
    PanelTruck,
}

impl CamperType {
    /// Value of the API `form` field for this body type
    pub fn form(&self) -> &'static str {
        match self {
            CamperType::Van => "van",
            CamperType::FullyIntegrated => "fullyIntegrated",
            CamperType::Alcove => "alcove",
            CamperType::PanelTruck => "panelTruck",
        }
    }
}

impl std::str::FromStr for CamperType {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "van" => Ok(CamperType::Van),
            "fully-integrated" | "fullyintegrated" => Ok(CamperType::FullyIntegrated),
            "alcove" => Ok(CamperType::Alcove),
            "paneltruck" | "panel-truck" => Ok(CamperType::PanelTruck),
            other => Err(crate::error::Error::Parse(format!("unknown camper type: {other}"))),
        }
    }
}

/// One page of the list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampersPage {
    pub total: usize,
    pub items: Vec<Camper>,
}
