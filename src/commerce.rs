//! Validate-then-apply actions. Each returns whether it changed anything;
//! a refused action leaves the state untouched.

use serde::{Deserialize, Serialize};

use crate::{
    shop::ShopItem,
    species::Species,
    state::{GardenState, Plant},
    upgrades::Upgrade,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Harvest {
    pub plants: usize,
    pub credits: u32,
    pub oxygen: u32,
}

impl GardenState {
    pub fn buy_plant(&mut self, species: Species) -> bool {
        if !self.spend_credits(species.price()) {
            return false;
        }
        self.plants.push(Plant::new(species));
        true
    }

    /// Sells every ripe plant. Oxygen is capped, credits are not.
    pub fn collect_harvest(&mut self) -> Harvest {
        let mut harvest = Harvest::default();
        for plant in self.plants.iter().filter(|p| p.is_ripe()) {
            harvest.plants += 1;
            harvest.credits += plant.species.price() * 2;
            harvest.oxygen += plant.species.oxygen_production() * 2;
        }
        if harvest.plants == 0 {
            return harvest;
        }
        self.add_credits(harvest.credits);
        self.add_oxygen(harvest.oxygen);
        self.plants.retain(|p| !p.is_ripe());
        harvest
    }

    pub fn remove_plant(&mut self, index: usize) -> Option<Plant> {
        if index < self.plants.len() {
            Some(self.plants.remove(index))
        } else {
            None
        }
    }

    pub fn restock(&mut self, item: ShopItem) -> bool {
        if !self.spend_credits(item.cost()) {
            return false;
        }
        match item {
            ShopItem::Water => self.change_water(item.restores()),
            ShopItem::Nutrients => self.change_nutrients(item.restores()),
            ShopItem::Energy => self.change_energy(item.restores()),
        }
        true
    }

    /// Already unlocked upgrades are not charged twice.
    pub fn purchase_upgrade(&mut self, upgrade: Upgrade) -> bool {
        if self.has_upgrade(upgrade) {
            return false;
        }
        if !self.spend_research_points(upgrade.research_cost()) {
            return false;
        }
        self.upgrades.unlock(upgrade)
    }
}
