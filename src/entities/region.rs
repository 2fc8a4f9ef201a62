//! Manufacturing regions

use serde::{Deserialize, Serialize};

/// A manufacturing region a strap can be sourced from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Usa,
    Mexico,
    Taiwan,
    Vietnam,
    Cambodia,
    China,
}

impl Region {
    /// Every supported region, in catalog display order
    pub const ALL: [Region; 6] = [
        Region::Usa,
        Region::Mexico,
        Region::Taiwan,
        Region::Vietnam,
        Region::Cambodia,
        Region::China,
    ];

    /// Human-readable label shown on comparison cards
    pub fn label(&self) -> &'static str {
        match self {
            Region::Usa => "USA (Domestic)",
            Region::Mexico => "Mexico (Nearshore)",
            Region::Taiwan => "Taiwan",
            Region::Vietnam => "Vietnam",
            Region::Cambodia => "Cambodia",
            Region::China => "China",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Region::Usa => write!(f, "usa"),
            Region::Mexico => write!(f, "mexico"),
            Region::Taiwan => write!(f, "taiwan"),
            Region::Vietnam => write!(f, "vietnam"),
            Region::Cambodia => write!(f, "cambodia"),
            Region::China => write!(f, "china"),
        }
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "usa" => Ok(Region::Usa),
            "mexico" => Ok(Region::Mexico),
            "taiwan" => Ok(Region::Taiwan),
            "vietnam" => Ok(Region::Vietnam),
            "cambodia" => Ok(Region::Cambodia),
            "china" => Ok(Region::China),
            _ => Err(format!(
                "Unknown region: {}. Use usa, mexico, taiwan, vietnam, cambodia, or china",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_roundtrip_through_display() {
        for region in Region::ALL {
            let parsed: Region = region.to_string().parse().unwrap();
            assert_eq!(parsed, region);
        }
    }

    #[test]
    fn test_region_labels() {
        assert_eq!(Region::Usa.label(), "USA (Domestic)");
        assert_eq!(Region::Mexico.label(), "Mexico (Nearshore)");
        assert_eq!(Region::China.label(), "China");
    }

    #[test]
    fn test_region_parse_is_case_insensitive() {
        assert_eq!("USA".parse::<Region>().unwrap(), Region::Usa);
        assert!("mars".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_serializes_lowercase() {
        let yaml = serde_yml::to_string(&Region::Vietnam).unwrap();
        assert_eq!(yaml.trim(), "vietnam");
    }
}
