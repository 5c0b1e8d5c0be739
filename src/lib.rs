pub mod commerce;
pub mod config;
pub mod driver;
pub mod engine;
pub mod events;
pub mod journal;
pub mod progress;
pub mod reminders;
pub mod rng;
pub mod session;
pub mod shop;
pub mod snapshot;
pub mod species;
pub mod state;
pub mod systems;
pub mod upgrades;

pub use config::{ConfigLoader, GardenConfig};
pub use driver::{DriverHandle, TickDriver};
pub use engine::{Engine, EngineBuilder, TickSummary};
pub use session::{Intent, Session};
pub use species::Species;
pub use state::GardenState;
