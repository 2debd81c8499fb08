//! Shared types for the pick-distance analyzer

use serde::{Deserialize, Serialize};

/// Newtype wrapper for trip identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(pub String);

impl std::fmt::Display for TripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for item identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Physical storage location, e.g. "AB0123"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub String);

impl SlotId {
    /// Aisle prefix: the identifier with every digit removed, including
    /// non-ASCII numerals
    pub fn aisle(&self) -> String {
        self.0.chars().filter(|c| !c.is_numeric()).collect()
    }

    /// True if both slots sit in the same aisle
    #[inline]
    pub fn same_aisle(&self, other: &SlotId) -> bool {
        let a = self.0.chars().filter(|c| !c.is_numeric());
        let b = other.0.chars().filter(|c| !c.is_numeric());
        a.eq(b)
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        SlotId(s.to_string())
    }
}

/// Floor position in layout units (inches)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn euclidean(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One row of the layout table
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRow {
    pub item: ItemId,
    pub slot: SlotId,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub pick_seq: Option<i64>,
}

/// One row of raw pick data
#[derive(Debug, Clone, PartialEq)]
pub struct PickRecord {
    pub trip: TripId,
    pub item: ItemId,
    pub trip_type: String,
    pub whse_area: String,
    pub trip_category: Option<String>,
    pub pick_slot: Option<String>,
}

/// Which pick-record label categories are reported under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    TripCategory,
    TripType,
    WhseArea,
}

impl CategoryKey {
    /// Label of a record under this key; None for a record without a trip
    /// category when grouping by category
    pub fn label<'a>(&self, record: &'a PickRecord) -> Option<&'a str> {
        match self {
            CategoryKey::TripCategory => record.trip_category.as_deref(),
            CategoryKey::TripType => Some(&record.trip_type),
            CategoryKey::WhseArea => Some(&record.whse_area),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::TripCategory => "trip_category",
            CategoryKey::TripType => "trip_type",
            CategoryKey::WhseArea => "whse_area",
        }
    }
}

impl std::str::FromStr for CategoryKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trip_category" => Ok(CategoryKey::TripCategory),
            "trip_type" => Ok(CategoryKey::TripType),
            "whse_area" => Ok(CategoryKey::WhseArea),
            other => Err(format!(
                "unknown category key '{other}', expected trip_category, trip_type or whse_area"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aisle_strips_all_digits() {
        assert_eq!(SlotId::from("AB0123").aisle(), "AB");
        assert_eq!(SlotId::from("A1B2").aisle(), "AB");
        assert_eq!(SlotId::from("0042").aisle(), "");
        // Arabic-Indic and fullwidth digits
        assert_eq!(SlotId::from("B\u{0663}\u{0661}").aisle(), "B");
        assert_eq!(SlotId::from("C\u{FF11}\u{FF12}").aisle(), "C");
    }

    #[test]
    fn test_same_aisle() {
        assert!(SlotId::from("C10").same_aisle(&SlotId::from("C2204")));
        assert!(!SlotId::from("C10").same_aisle(&SlotId::from("CD10")));
        assert!(SlotId::from("B\u{0663}").same_aisle(&SlotId::from("B7")));
    }

    #[test]
    fn test_category_label_without_category() {
        let record = PickRecord {
            trip: TripId("T1".into()),
            item: ItemId("I1".into()),
            trip_type: "Cart".into(),
            whse_area: "Storage".into(),
            trip_category: None,
            pick_slot: None,
        };
        assert_eq!(CategoryKey::TripCategory.label(&record), None);
        assert_eq!(CategoryKey::TripType.label(&record), Some("Cart"));
        assert_eq!(CategoryKey::WhseArea.label(&record), Some("Storage"));
    }

    #[test]
    fn test_category_key_from_str() {
        assert_eq!("trip_type".parse::<CategoryKey>(), Ok(CategoryKey::TripType));
        assert!("area".parse::<CategoryKey>().is_err());
    }
}
