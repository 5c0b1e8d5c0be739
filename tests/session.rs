use std::path::PathBuf;

use space_garden::{
    config::{ConfigLoader, GardenConfig},
    session::{Intent, Session},
    shop::ShopItem,
    species::Species,
    upgrades::Upgrade,
};

fn config_loader() -> ConfigLoader {
    ConfigLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from("scenarios").join(format!("{name}.yaml"))
}

fn mars_base() -> GardenConfig {
    config_loader()
        .load(scenario_path("mars_base"))
        .expect("fixture parses")
}

fn assert_within_bounds(session: &Session) {
    let state = session.state();
    let limits = state.limits();
    for (label, value) in [
        ("water", state.water()),
        ("nutrients", state.nutrients()),
        ("energy", state.energy()),
    ] {
        assert!(
            (0.0..=limits.max_resource).contains(&value),
            "{label} out of bounds: {value}"
        );
    }
    assert!(state.oxygen() <= limits.max_oxygen);
    for plant in state.plants() {
        assert!((0.0..=100.0).contains(&plant.growth), "growth {}", plant.growth);
        assert!((0.0..=100.0).contains(&plant.health), "health {}", plant.health);
    }
}

#[test]
fn loader_reads_fixture() {
    let config = mars_base();
    assert_eq!(config.name, "mars_base");
    assert_eq!(config.seed, 2026);
    assert_eq!(config.initial.credits, 200);
    assert_eq!(config.limits.slots, 6);
}

#[test]
fn one_tick_with_three_plants() {
    let mut session = Session::new(mars_base()).unwrap();
    for species in [Species::MartianPotato, Species::LunarLettuce, Species::NebulaRose] {
        assert!(session.buy_plant(species));
    }

    let summary = session.tick().unwrap();

    assert!(summary.ran);
    assert_eq!(summary.tick, 1);
    let state = session.state();
    for plant in state.plants() {
        let expected = plant.species.growth_rate() * 1.08;
        assert!(
            (plant.growth - expected).abs() < 1e-9,
            "{} grew {} instead of {}",
            plant.species,
            plant.growth,
            expected
        );
    }
    assert!((state.plants()[0].growth - 0.864).abs() < 1e-9);

    let total_draw = 0.7 + 1.2 + 0.9;
    assert!((state.water() - (100.0 - total_draw * 22.0 / 20.0)).abs() < 1e-9);
    assert!((state.nutrients() - (100.0 - total_draw * 0.5)).abs() < 1e-9);
    assert!((state.energy() - (100.0 - (0.5 + 0.2 * 3.0))).abs() < 1e-9);
    assert_eq!(state.oxygen(), 100);
    assert_eq!(state.credits(), 200 - 20 - 30 - 50);
}

#[test]
fn bounds_hold_through_a_long_session() {
    let mut config = mars_base();
    config.event_chance = 1.0;
    config.initial.credits = 10_000;
    let mut session = Session::new(config).unwrap();
    for species in Species::ALL.iter().chain(Species::ALL[..2].iter()) {
        assert!(session.buy_plant(*species));
    }
    session.apply(Intent::Restock {
        item: ShopItem::Energy,
    });

    for tick in 1..=400u64 {
        session.tick().unwrap();
        assert_within_bounds(&session);
        if tick % 5 == 0 {
            session.advance_day();
            assert_within_bounds(&session);
        }
        if tick % 40 == 0 {
            session.collect_harvest();
            session.buy_plant(Species::LunarLettuce);
            session.restock(ShopItem::Water);
            assert_within_bounds(&session);
        }
    }
}

#[test]
fn unaffordable_plant_leaves_session_unchanged() {
    let mut config = mars_base();
    config.initial.credits = 19;
    let mut session = Session::new(config).unwrap();

    assert!(!session.buy_plant(Species::MartianPotato));

    assert_eq!(session.state().credits(), 19);
    assert!(session.state().plants().is_empty());
}

#[test]
fn harvest_pays_for_ripe_plants_only() {
    let mut session = Session::new(mars_base()).unwrap();
    session.buy_plant(Species::LunarLettuce);
    session.buy_plant(Species::QuantumFern);

    for _ in 0..62 {
        session.tick().unwrap();
    }
    let state = session.state();
    assert_eq!(state.plants()[0].growth, 100.0);
    assert!(state.plants()[1].growth < 100.0);
    let credits_before = state.credits();
    let oxygen_before = state.oxygen();

    let harvest = session.collect_harvest();

    assert_eq!(harvest.plants, 1);
    assert_eq!(harvest.credits, 60);
    assert_eq!(harvest.oxygen, 16);
    let state = session.state();
    assert_eq!(state.credits(), credits_before + 60);
    assert_eq!(state.oxygen(), (oxygen_before + 16).min(200));
    assert_eq!(state.plant_count(), 1);
    assert_eq!(state.plants()[0].species, Species::QuantumFern);
}

#[test]
fn depleted_oxygen_ends_the_session() {
    let config = config_loader()
        .load(scenario_path("thin_air"))
        .expect("fixture parses");
    let mut session = Session::new(config).unwrap();

    let first = session.tick().unwrap();
    assert!(first.ran);
    assert!(first.game_over);
    assert!(session.state().is_game_over());

    let water = session.state().water();
    for _ in 0..5 {
        let summary = session.tick().unwrap();
        assert!(!summary.ran);
        assert!(summary.game_over);
    }
    assert_eq!(session.current_tick(), 1);
    assert_eq!(session.state().water(), water);
    assert!(!session.buy_plant(Species::MartianPotato));

    session.reset();
    assert!(!session.state().is_game_over());
    assert_eq!(session.current_tick(), 0);
}

#[test]
fn reset_restores_documented_defaults() {
    let mut session = Session::new(GardenConfig::default()).unwrap();
    session.buy_plant(Species::QuantumFern);
    session.buy_plant(Species::MartianPotato);
    for tick in 1..=30 {
        session.tick().unwrap();
        if tick % 3 == 0 {
            session.advance_day();
        }
    }
    session.restock(ShopItem::Nutrients);

    session.reset();

    let state = session.state();
    assert_eq!(state.water(), 100.0);
    assert_eq!(state.nutrients(), 100.0);
    assert_eq!(state.energy(), 100.0);
    assert_eq!(state.oxygen(), 100);
    assert_eq!(state.credits(), 200);
    assert_eq!(state.day(), 1);
    assert_eq!(state.research_points(), 0);
    assert_eq!(state.temperature(), 22.0);
    assert!(state.plants().is_empty());
    assert!(state.upgrades().none_unlocked());
    assert!(!state.is_game_over());
    assert!(!state.oxygen_warning());
    assert!(session.last_event().is_none());
}

#[test]
fn research_unlocks_regeneration() {
    let mut config = mars_base();
    config.event_chance = 0.0;
    config.initial.credits = 1_000;
    let mut session = Session::new(config).unwrap();
    for _ in 0..6 {
        session.buy_plant(Species::MartianPotato);
    }
    // Six plants earn six research points per day.
    for _ in 0..5 {
        session.advance_day();
    }
    assert_eq!(session.state().research_points(), 30);
    assert!(session.apply(Intent::Research {
        upgrade: Upgrade::WaterRecycler
    }));
    assert_eq!(session.state().research_points(), 0);
    assert!(!session.apply(Intent::Research {
        upgrade: Upgrade::SolarPanels
    }));
    assert!(session.state().has_upgrade(Upgrade::WaterRecycler));
}

#[test]
fn same_seed_replays_identically() {
    let run = || {
        let mut config = mars_base();
        config.event_chance = 0.5;
        let mut session = Session::new(config).unwrap();
        session.buy_plant(Species::LunarLettuce);
        session.buy_plant(Species::NebulaRose);
        let mut events = Vec::new();
        for tick in 1..=60 {
            session.tick().unwrap();
            if tick % 4 == 0 {
                events.push(session.advance_day().and_then(|report| report.event));
            }
        }
        (
            events,
            session.state().temperature(),
            session.state().water(),
            session.state().research_points(),
        )
    };

    assert_eq!(run(), run());
}

#[test]
fn reset_replays_the_same_weather() {
    let mut session = Session::new(mars_base()).unwrap();
    let first: Vec<f64> = (0..5)
        .map(|_| session.advance_day().unwrap().temperature_delta)
        .collect();
    session.reset();
    let second: Vec<f64> = (0..5)
        .map(|_| session.advance_day().unwrap().temperature_delta)
        .collect();
    assert_eq!(first, second);
}

#[test]
fn session_emits_snapshots() {
    let temp_dir = tempfile::tempdir().unwrap();
    let snapshot_dir = temp_dir.path().join("snaps");
    let mut config = mars_base();
    config.snapshot.interval_ticks = 10;
    config.snapshot.output_dir = snapshot_dir.clone();
    let mut session = Session::new(config).unwrap();
    session.buy_plant(Species::MartianPotato);

    for _ in 0..30 {
        session.tick().unwrap();
    }

    for tick in [10, 20, 30] {
        let expected = snapshot_dir
            .join("mars_base")
            .join(format!("tick_{tick:06}.json"));
        assert!(expected.exists(), "expected snapshot {}", expected.display());
    }
    let data = std::fs::read_to_string(snapshot_dir.join("mars_base").join("tick_000010.json"))
        .unwrap();
    assert!(data.contains("\"name\": \"mars_base\""));
    assert!(data.contains("\"species\": \"martian_potato\""));
    assert!(!snapshot_dir.join("mars_base").join("tick_000005.json").exists());
}

#[test]
fn session_refuses_out_of_range_config() {
    let mut config = mars_base();
    config.initial.energy = 250.0;
    config.initial.water = -40.0;
    assert!(config.validate().is_err());
    assert!(Session::new(config).is_err());
}
