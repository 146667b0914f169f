//! Package catalog.
//!
//! Every package a client buys belongs to one of five fixed tiers. A tier
//! fixes how many sessions the package holds and the list price suggested
//! when the package is created (staff may override the price).

use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageTier {
    S1,
    S5,
    S10,
    S15,
    S20,
}

impl PackageTier {
    pub const ALL: [PackageTier; 5] = [Self::S1, Self::S5, Self::S10, Self::S15, Self::S20];

    /// Maximum number of session records a package of this tier may hold.
    #[must_use]
    pub const fn session_ceiling(self) -> u32 {
        match self {
            Self::S1 => 1,
            Self::S5 => 5,
            Self::S10 => 10,
            Self::S15 => 15,
            Self::S20 => 20,
        }
    }

    #[must_use]
    pub const fn suggested_price(self) -> Money {
        match self {
            Self::S1 => Money::from_major(350),
            Self::S5 => Money::from_major(1250),
            Self::S10 => Money::from_major(2500),
            Self::S15 => Money::from_major(3900),
            Self::S20 => Money::from_major(5200),
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::S1 => "1 sesión",
            Self::S5 => "5 sesiones",
            Self::S10 => "10 sesiones",
            Self::S15 => "15 sesiones",
            Self::S20 => "20 sesiones",
        }
    }

    /// Canonical code stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S1 => "S1",
            Self::S5 => "S5",
            Self::S10 => "S10",
            Self::S15 => "S15",
            Self::S20 => "S20",
        }
    }
}

impl core::fmt::Display for PackageTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PackageTier {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "S1" => Ok(Self::S1),
            "S5" => Ok(Self::S5),
            "S10" => Ok(Self::S10),
            "S15" => Ok(Self::S15),
            "S20" => Ok(Self::S20),
            other => Err(EngineError::Validation(format!(
                "tipo de paquete inválido: {other}"
            ))),
        }
    }
}

/// One row of the price list shown when selling a package.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub tier: PackageTier,
    pub sessions: u32,
    pub suggested_price: Money,
    pub display_name: &'static str,
}

/// The full price list, smallest tier first.
pub fn catalog() -> Vec<CatalogEntry> {
    PackageTier::ALL
        .iter()
        .map(|tier| CatalogEntry {
            tier: *tier,
            sessions: tier.session_ceiling(),
            suggested_price: tier.suggested_price(),
            display_name: tier.display_name(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceilings_and_prices_match_the_price_list() {
        let table: Vec<(u32, i64)> = PackageTier::ALL
            .iter()
            .map(|t| (t.session_ceiling(), t.suggested_price().minor() / 100))
            .collect();
        assert_eq!(
            table,
            vec![(1, 350), (5, 1250), (10, 2500), (15, 3900), (20, 5200)]
        );
    }

    #[test]
    fn parses_stored_codes() {
        for tier in PackageTier::ALL {
            assert_eq!(PackageTier::try_from(tier.as_str()).unwrap(), tier);
        }
        assert!(PackageTier::try_from("S3").is_err());
    }

    #[test]
    fn display_names() {
        assert_eq!(PackageTier::S1.display_name(), "1 sesión");
        assert_eq!(PackageTier::S5.display_name(), "5 sesiones");
    }

    #[test]
    fn catalog_lists_every_tier_in_order() {
        let rows = catalog();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].tier, PackageTier::S1);
        assert_eq!(rows[1].display_name, "5 sesiones");
        assert_eq!(rows[4].sessions, 20);
    }
}
