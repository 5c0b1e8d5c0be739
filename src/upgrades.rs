use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Upgrade {
    WaterRecycler,
    SolarPanels,
    GeneticEngine,
    GravityControl,
}

#[derive(Debug, Clone, Copy)]
pub struct UpgradeDefinition {
    pub upgrade: Upgrade,
    pub id: &'static str,
    pub display: &'static str,
    pub research_cost: u32,
}

const UPGRADE_TABLE: &[UpgradeDefinition] = &[
    UpgradeDefinition {
        upgrade: Upgrade::WaterRecycler,
        id: "water_recycler",
        display: "Water Recycling System",
        research_cost: 30,
    },
    UpgradeDefinition {
        upgrade: Upgrade::SolarPanels,
        id: "solar_panels",
        display: "Improved Solar Panels",
        research_cost: 50,
    },
    UpgradeDefinition {
        upgrade: Upgrade::GeneticEngine,
        id: "genetic_engine",
        display: "Genetic Engineer",
        research_cost: 80,
    },
    UpgradeDefinition {
        upgrade: Upgrade::GravityControl,
        id: "gravity_control",
        display: "Gravity Control",
        research_cost: 120,
    },
];

impl Upgrade {
    pub const ALL: [Upgrade; 4] = [
        Upgrade::WaterRecycler,
        Upgrade::SolarPanels,
        Upgrade::GeneticEngine,
        Upgrade::GravityControl,
    ];

    pub fn definition(self) -> &'static UpgradeDefinition {
        &UPGRADE_TABLE[self as usize]
    }

    pub fn research_cost(self) -> u32 {
        self.definition().research_cost
    }
}

impl fmt::Display for Upgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition().display)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown upgrade '{0}'")]
pub struct UnknownUpgrade(pub String);

impl FromStr for Upgrade {
    type Err = UnknownUpgrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        UPGRADE_TABLE
            .iter()
            .find(|def| def.id == normalized)
            .map(|def| def.upgrade)
            .ok_or_else(|| UnknownUpgrade(s.to_string()))
    }
}

/// Unlock flags. Once set a flag stays set until the ledger is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLedger {
    unlocked: BTreeMap<Upgrade, bool>,
}

impl UpgradeLedger {
    pub fn new() -> Self {
        Self {
            unlocked: Upgrade::ALL.iter().map(|u| (*u, false)).collect(),
        }
    }

    pub fn is_unlocked(&self, upgrade: Upgrade) -> bool {
        self.unlocked.get(&upgrade).copied().unwrap_or(false)
    }

    /// Returns false when the upgrade was already unlocked.
    pub fn unlock(&mut self, upgrade: Upgrade) -> bool {
        let slot = self.unlocked.entry(upgrade).or_insert(false);
        if *slot {
            return false;
        }
        *slot = true;
        true
    }

    pub fn unlocked(&self) -> impl Iterator<Item = Upgrade> + '_ {
        self.unlocked
            .iter()
            .filter(|(_, on)| **on)
            .map(|(upgrade, _)| *upgrade)
    }

    pub fn none_unlocked(&self) -> bool {
        self.unlocked().next().is_none()
    }
}

impl Default for UpgradeLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn costs_follow_research_tree() {
        let costs: Vec<u32> = Upgrade::ALL.iter().map(|u| u.research_cost()).collect();
        assert_eq!(costs, vec![30, 50, 80, 120]);
    }

    #[test]
    fn ledger_unlock_is_one_way() {
        let mut ledger = UpgradeLedger::new();
        assert!(ledger.none_unlocked());
        assert!(ledger.unlock(Upgrade::SolarPanels));
        assert!(!ledger.unlock(Upgrade::SolarPanels));
        assert!(ledger.is_unlocked(Upgrade::SolarPanels));
        assert!(!ledger.is_unlocked(Upgrade::WaterRecycler));
        assert_eq!(ledger.unlocked().collect::<Vec<_>>(), vec![Upgrade::SolarPanels]);
    }

    #[test]
    fn parses_upgrade_ids() {
        assert_eq!(
            "gravity-control".parse::<Upgrade>().unwrap(),
            Upgrade::GravityControl
        );
        assert!("warp_drive".parse::<Upgrade>().is_err());
    }
}
