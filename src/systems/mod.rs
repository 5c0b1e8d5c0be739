mod growth;
mod life_support;
mod regeneration;
mod upkeep;

pub use growth::GrowthSystem;
pub use life_support::LifeSupportSystem;
pub use regeneration::RegenerationSystem;
pub use upkeep::UpkeepSystem;
