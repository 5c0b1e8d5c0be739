use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    MartianPotato,
    LunarLettuce,
    NebulaRose,
    QuantumFern,
}

/// Static coefficients for one species.
#[derive(Debug, Clone, Copy)]
pub struct SpeciesDefinition {
    pub species: Species,
    pub id: &'static str,
    pub display: &'static str,
    pub growth_rate: f64,
    pub water_consumption: f64,
    pub oxygen_production: u32,
    pub price: u32,
}

const SPECIES_TABLE: &[SpeciesDefinition] = &[
    SpeciesDefinition {
        species: Species::MartianPotato,
        id: "martian_potato",
        display: "Martian Potato",
        growth_rate: 0.8,
        water_consumption: 0.7,
        oxygen_production: 5,
        price: 20,
    },
    SpeciesDefinition {
        species: Species::LunarLettuce,
        id: "lunar_lettuce",
        display: "Lunar Lettuce",
        growth_rate: 1.5,
        water_consumption: 1.2,
        oxygen_production: 8,
        price: 30,
    },
    SpeciesDefinition {
        species: Species::NebulaRose,
        id: "nebula_rose",
        display: "Nebula Rose",
        growth_rate: 0.5,
        water_consumption: 0.9,
        oxygen_production: 3,
        price: 50,
    },
    SpeciesDefinition {
        species: Species::QuantumFern,
        id: "quantum_fern",
        display: "Quantum Fern",
        growth_rate: 0.3,
        water_consumption: 0.4,
        oxygen_production: 10,
        price: 100,
    },
];

impl Species {
    pub const ALL: [Species; 4] = [
        Species::MartianPotato,
        Species::LunarLettuce,
        Species::NebulaRose,
        Species::QuantumFern,
    ];

    pub fn definition(self) -> &'static SpeciesDefinition {
        // The table is ordered like the enum, one row per variant.
        &SPECIES_TABLE[self as usize]
    }

    pub fn growth_rate(self) -> f64 {
        self.definition().growth_rate
    }

    pub fn water_consumption(self) -> f64 {
        self.definition().water_consumption
    }

    pub fn oxygen_production(self) -> u32 {
        self.definition().oxygen_production
    }

    pub fn price(self) -> u32 {
        self.definition().price
    }
}

pub fn definition(id: &str) -> Option<&'static SpeciesDefinition> {
    SPECIES_TABLE.iter().find(|def| def.id == id)
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition().display)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown species '{0}'")]
pub struct UnknownSpecies(pub String);

impl FromStr for Species {
    type Err = UnknownSpecies;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        definition(&normalized)
            .map(|def| def.species)
            .ok_or_else(|| UnknownSpecies(s.to_string()))
    }
}
