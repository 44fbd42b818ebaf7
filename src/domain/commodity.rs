use crate::domain::errors::UnknownCommodityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of crops with trained price models.
///
/// Each variant keys exactly one entry in the model registry. Adding a
/// variant requires a trained model blob and a price anchor for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Commodity {
    Jowar,
    Wheat,
    Cotton,
    Sugarcane,
    Bajra,
}

impl Commodity {
    pub const ALL: [Commodity; 5] = [
        Commodity::Jowar,
        Commodity::Wheat,
        Commodity::Cotton,
        Commodity::Sugarcane,
        Commodity::Bajra,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Commodity::Jowar => "Jowar",
            Commodity::Wheat => "Wheat",
            Commodity::Cotton => "Cotton",
            Commodity::Sugarcane => "Sugarcane",
            Commodity::Bajra => "Bajra",
        }
    }

    /// File stem used for this commodity's model blob on disk.
    pub fn file_stem(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Commodity {
    type Err = UnknownCommodityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jowar" => Ok(Commodity::Jowar),
            "wheat" => Ok(Commodity::Wheat),
            "cotton" => Ok(Commodity::Cotton),
            "sugarcane" => Ok(Commodity::Sugarcane),
            "bajra" => Ok(Commodity::Bajra),
            _ => Err(UnknownCommodityError {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("wheat".parse::<Commodity>().unwrap(), Commodity::Wheat);
        assert_eq!("  COTTON ".parse::<Commodity>().unwrap(), Commodity::Cotton);
    }

    #[test]
    fn test_unsupported_commodity_is_rejected() {
        let err = "Paddy".parse::<Commodity>().unwrap_err();
        assert!(err.to_string().contains("Paddy"));
    }

    #[test]
    fn test_file_stem_round_trip() {
        for commodity in Commodity::ALL {
            assert_eq!(
                commodity.file_stem().parse::<Commodity>().unwrap(),
                commodity
            );
        }
    }
}
