// Asset inventory domain model
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Furniture,
    Vehicle,
    OfficeEquipment,
    Other,
}

impl AssetType {
    /// Fixed enumeration order used for every scan over the types
    pub const ALL: [AssetType; 4] = [
        AssetType::Furniture,
        AssetType::Vehicle,
        AssetType::OfficeEquipment,
        AssetType::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AssetType::Furniture => "furniture",
            AssetType::Vehicle => "vehicle",
            AssetType::OfficeEquipment => "office_equipment",
            AssetType::Other => "other",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AssetType::Furniture => "Furniture",
            AssetType::Vehicle => "Vehicles",
            AssetType::OfficeEquipment => "Office Equipment",
            AssetType::Other => "Other Assets",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            AssetType::Furniture => "#D1495B",
            AssetType::Vehicle => "#30638E",
            AssetType::OfficeEquipment => "#EDAE49",
            AssetType::Other => "#00798C",
        }
    }
}

/// Summed quantity and price for one (asset type, station) pair.
///
/// Values are kept as raw JSON because the data layer sends them as numbers,
/// numeric strings with grouping separators, or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationAggregate {
    #[serde(default, deserialize_with = "lenient_station_name")]
    pub station_name: String,
    #[serde(default)]
    pub total_quantity: serde_json::Value,
    #[serde(default)]
    pub total_price: serde_json::Value,
}

/// A null or non-string station name becomes a blank label instead of
/// failing the whole response
fn lenient_station_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(name) => name,
        serde_json::Value::Number(n) => n.to_string(),
        other => {
            tracing::warn!("Invalid station name {}, using blank label", other);
            String::new()
        }
    })
}

#[cfg(test)]
impl StationAggregate {
    pub fn new(
        station_name: impl Into<String>,
        total_quantity: impl Into<serde_json::Value>,
        total_price: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            station_name: station_name.into(),
            total_quantity: total_quantity.into(),
            total_price: total_price.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "HashMap<String, Vec<StationAggregate>>")]
pub struct AssetCountsByStation {
    by_type: HashMap<AssetType, Vec<StationAggregate>>,
}

impl AssetCountsByStation {
    /// Aggregates for a type; a type the data layer omitted is empty
    pub fn stations(&self, asset_type: AssetType) -> &[StationAggregate] {
        self.by_type
            .get(&asset_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// (type, aggregates) pairs in fixed enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (AssetType, &[StationAggregate])> {
        AssetType::ALL.into_iter().map(|t| (t, self.stations(t)))
    }
}

#[cfg(test)]
impl AssetCountsByStation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, asset_type: AssetType, aggregates: Vec<StationAggregate>) -> Self {
        self.by_type.insert(asset_type, aggregates);
        self
    }
}

impl From<HashMap<String, Vec<StationAggregate>>> for AssetCountsByStation {
    fn from(raw: HashMap<String, Vec<StationAggregate>>) -> Self {
        let mut by_type = HashMap::new();
        for (key, aggregates) in raw {
            match AssetType::from_key(&key) {
                Some(asset_type) => {
                    by_type.insert(asset_type, aggregates);
                }
                None => tracing::warn!("Ignoring unknown asset type: {}", key),
            }
        }
        Self { by_type }
    }
}
