//! The fixed US state hex grid.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Offset-coordinate convention of a hex grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexLayoutMode {
    #[default]
    #[serde(rename = "odd-r")]
    OddR,
    #[serde(rename = "even-r")]
    EvenR,
    #[serde(rename = "odd-q")]
    OddQ,
    #[serde(rename = "even-q")]
    EvenQ,
}

impl HexLayoutMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OddR => "odd-r",
            Self::EvenR => "even-r",
            Self::OddQ => "odd-q",
            Self::EvenQ => "even-q",
        }
    }

    /// Row layouts have pointy-top hexes and shift alternate rows.
    pub fn is_row_offset(self) -> bool {
        matches!(self, Self::OddR | Self::EvenR)
    }
}

impl fmt::Display for HexLayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HexLayoutMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "odd-r" => Ok(Self::OddR),
            "even-r" => Ok(Self::EvenR),
            "odd-q" => Ok(Self::OddQ),
            "even-q" => Ok(Self::EvenQ),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDefinition {
    pub full_name: String,
    pub abbreviation: String,
    /// Axial column (`q`).
    pub axial_column: i32,
    /// Axial row (`r`).
    pub axial_row: i32,
}

impl RegionDefinition {
    /// Case-sensitive match against the full name or the abbreviation.
    pub fn matches(&self, category: &str) -> bool {
        category == self.full_name || category == self.abbreviation
    }
}

/// Region table keyed by canonical full name, in display order.
///
/// Built once per component; its keys and coordinates never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionLayout {
    pub mode: HexLayoutMode,
    regions: IndexMap<String, RegionDefinition>,
}

// (full name, abbreviation, q, r)
const US_STATES: &[(&str, &str, i32, i32)] = &[
    ("Alaska", "AK", 1, 8),
    ("Alabama", "AL", 9, 2),
    ("Arkansas", "AR", 7, 3),
    ("Arizona", "AZ", 4, 3),
    ("California", "CA", 3, 3),
    ("Colorado", "CO", 5, 4),
    ("Connecticut", "CT", 12, 5),
    ("District of Columbia", "DC", 13, 3),
    ("Delaware", "DE", 11, 4),
    ("Florida", "FL", 10, 0),
    ("Georgia", "GA", 9, 1),
    ("Hawaii", "HI", 1, 0),
    ("Iowa", "IA", 6, 5),
    ("Idaho", "ID", 3, 5),
    ("Illinois", "IL", 7, 5),
    ("Indiana", "IN", 8, 5),
    ("Kansas", "KS", 6, 3),
    ("Kentucky", "KY", 8, 4),
    ("Louisiana", "LA", 7, 2),
    ("Massachusetts", "MA", 13, 6),
    ("Maryland", "MD", 10, 4),
    ("Maine", "ME", 13, 8),
    ("Michigan", "MI", 9, 6),
    ("Minnesota", "MN", 6, 6),
    ("Missouri", "MO", 7, 4),
    ("Mississippi", "MS", 8, 2),
    ("Montana", "MT", 4, 6),
    ("North Carolina", "NC", 10, 3),
    ("North Dakota", "ND", 5, 6),
    ("Nebraska", "NE", 6, 4),
    ("New Hampshire", "NH", 12, 7),
    ("New Jersey", "NJ", 11, 5),
    ("New Mexico", "NM", 5, 2),
    ("Nevada", "NV", 4, 4),
    ("New York", "NY", 11, 6),
    ("Ohio", "OH", 9, 5),
    ("Oklahoma", "OK", 6, 2),
    ("Oregon", "OR", 3, 4),
    ("Pennsylvania", "PA", 10, 5),
    ("Rhode Island", "RI", 12, 6),
    ("South Carolina", "SC", 10, 2),
    ("South Dakota", "SD", 5, 5),
    ("Tennessee", "TN", 8, 3),
    ("Texas", "TX", 5, 1),
    ("Utah", "UT", 5, 3),
    ("Virginia", "VA", 9, 3),
    ("Vermont", "VT", 11, 7),
    ("Washington", "WA", 3, 6),
    ("Wisconsin", "WI", 7, 6),
    ("West Virginia", "WV", 9, 4),
    ("Wyoming", "WY", 4, 5),
];

impl Default for RegionLayout {
    fn default() -> Self {
        Self::us_states()
    }
}

impl RegionLayout {
    /// The 50 states plus the District of Columbia on an `odd-r` grid.
    pub fn us_states() -> Self {
        let regions = US_STATES
            .iter()
            .map(|&(name, abbr, q, r)| {
                (
                    name.to_string(),
                    RegionDefinition {
                        full_name: name.to_string(),
                        abbreviation: abbr.to_string(),
                        axial_column: q,
                        axial_row: r,
                    },
                )
            })
            .collect();
        Self {
            mode: HexLayoutMode::OddR,
            regions,
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&RegionDefinition> {
        self.regions.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionDefinition)> {
        self.regions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Region named by `category`, by full name or abbreviation.
    pub fn find(&self, category: &str) -> Option<(&str, &RegionDefinition)> {
        self.iter().find(|(_, def)| def.matches(category))
    }
}
