//! Static hideout reference data, the `tarkovdata/hideout` singleton.

use serde::Deserialize;

/// Station id of the stash. Its levels are what game editions unlock.
pub const STASH_STATION_ID: &str = "5d484fc0654e76006657e0ab";

/// The hideout definition document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HideoutData {
    #[serde(default)]
    pub hideout_stations: Vec<HideoutStation>,
}

/// One hideout station with its upgrade levels.
#[derive(Debug, Clone, Deserialize)]
pub struct HideoutStation {
    pub id: String,
    #[serde(default)]
    pub levels: Vec<StationLevel>,
}

/// One upgrade level of a station.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationLevel {
    pub id: String,
    /// Numeric tier of this level within the station.
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub item_requirements: Vec<ItemRequirement>,
}

/// Material cost of a station level.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRequirement {
    pub id: String,
    #[serde(default)]
    pub count: i64,
}
