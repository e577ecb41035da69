use std::collections::HashSet;

use farmo::{
    engine::{EngineBuilder, EngineSettings},
    farm::{ClickOutcome, Farm, Plot, PLOT_COUNT},
    systems::GrowthSystem,
    weather::{Weather, WeatherCondition},
    Engine,
};

fn growth_only_engine() -> Engine {
    EngineBuilder::new(EngineSettings {
        farm_name: "plot_grid".into(),
        seed: 17,
    })
    .with_system(GrowthSystem::new())
    .build()
}

fn plot(x: u32, y: u32) -> Plot {
    Plot::new(x, y).expect("plot inside grid")
}

fn plant(engine: &mut Engine, farm: &mut Farm, at: Plot) {
    assert_eq!(engine.click(farm, at), ClickOutcome::Selected { plot: at });
    assert!(matches!(
        engine.click(farm, at),
        ClickOutcome::Planted { plot, .. } if plot == at
    ));
}

fn grow_to_ready(engine: &mut Engine, farm: &mut Farm) {
    farm.set_weather(Weather::default().with_condition(WeatherCondition::Rainy));
    engine.advance(farm, 500).unwrap();
}

#[test]
fn new_farm_is_empty() {
    let farm = Farm::new();
    assert_eq!(farm.crop_count(), 0);
    assert_eq!(farm.selected(), None);
    assert_eq!(Plot::all().count(), PLOT_COUNT);
    assert!(Plot::all().all(|plot| farm.crop_at(plot).is_none()));
    assert!(farm.is_day());
}

#[test]
fn single_click_only_selects() {
    let mut engine = growth_only_engine();
    let mut farm = Farm::new();
    let target = plot(0, 0);

    assert_eq!(
        engine.click(&mut farm, target),
        ClickOutcome::Selected { plot: target }
    );
    assert_eq!(farm.selected(), Some(target));
    assert_eq!(farm.crop_count(), 0);
}

#[test]
fn clicking_another_empty_plot_moves_selection() {
    let mut engine = growth_only_engine();
    let mut farm = Farm::new();
    let a = plot(1, 1);
    let b = plot(4, 2);

    engine.click(&mut farm, a);
    assert_eq!(
        engine.click(&mut farm, b),
        ClickOutcome::Selected { plot: b }
    );
    assert_eq!(farm.selected(), Some(b));
    assert_eq!(farm.crop_count(), 0);
    assert!(farm.crop_at(a).is_none());
    assert!(farm.crop_at(b).is_none());
}

#[test]
fn confirming_selection_plants_once_and_clears_it() {
    let mut engine = growth_only_engine();
    let mut farm = Farm::new();
    let target = plot(2, 1);

    plant(&mut engine, &mut farm, target);

    assert_eq!(farm.crop_count(), 1);
    assert_eq!(farm.selected(), None);
    let crop = farm.crop_at(target).expect("crop planted");
    assert_eq!((crop.x(), crop.y()), (2, 1));
    assert_eq!(crop.growth_stage(), 0.0);
    assert!(!crop.harvest_ready());
}

#[test]
fn growing_crop_ignores_clicks() {
    let mut engine = growth_only_engine();
    let mut farm = Farm::new();
    let target = plot(3, 3);
    plant(&mut engine, &mut farm, target);
    engine.advance(&mut farm, 30).unwrap();
    let before = farm.crop_at(target).cloned();

    assert_eq!(
        engine.click(&mut farm, target),
        ClickOutcome::Ignored { plot: target }
    );
    assert_eq!(farm.crop_at(target).cloned(), before);
    assert_eq!(farm.selected(), None);
    assert_eq!(farm.crop_count(), 1);
}

#[test]
fn ready_crop_is_harvested_on_click() {
    let mut engine = growth_only_engine();
    let mut farm = Farm::new();
    let target = plot(5, 0);
    plant(&mut engine, &mut farm, target);
    grow_to_ready(&mut engine, &mut farm);
    let crop_id = farm.crop_at(target).map(|crop| crop.id()).unwrap();

    assert!(matches!(
        engine.click(&mut farm, target),
        ClickOutcome::Harvested { plot, crop, .. } if plot == target && crop == crop_id
    ));
    assert!(farm.crop_at(target).is_none());
    assert_eq!(farm.selected(), None);
    assert_eq!(farm.crop_count(), 0);

    // The plot is back to empty-unselected: the next click only selects.
    assert_eq!(
        engine.click(&mut farm, target),
        ClickOutcome::Selected { plot: target }
    );
}

#[test]
fn harvest_clears_a_selection_on_another_plot() {
    let mut engine = growth_only_engine();
    let mut farm = Farm::new();
    let ready = plot(1, 2);
    let pending = plot(4, 3);
    plant(&mut engine, &mut farm, ready);
    grow_to_ready(&mut engine, &mut farm);

    assert_eq!(
        engine.click(&mut farm, pending),
        ClickOutcome::Selected { plot: pending }
    );
    assert!(matches!(
        engine.click(&mut farm, ready),
        ClickOutcome::Harvested { plot, .. } if plot == ready
    ));
    assert_eq!(farm.selected(), None);
    assert!(farm.crop_at(pending).is_none());
    assert_eq!(farm.crop_count(), 0);

    // The old selection is gone, so clicking it again only re-selects.
    assert_eq!(
        engine.click(&mut farm, pending),
        ClickOutcome::Selected { plot: pending }
    );
}

#[test]
fn planting_never_overwrites_an_occupied_plot() {
    let mut engine = growth_only_engine();
    let mut farm = Farm::new();
    let target = plot(0, 3);
    plant(&mut engine, &mut farm, target);
    let original = farm.crop_at(target).map(|crop| crop.id());

    for _ in 0..5 {
        engine.click(&mut farm, target);
    }

    assert_eq!(farm.crop_count(), 1);
    assert_eq!(farm.crop_at(target).map(|crop| crop.id()), original);
}

#[test]
fn filling_the_grid_gives_unique_plots_and_ids() {
    let mut engine = growth_only_engine();
    let mut farm = Farm::new();
    for target in Plot::all() {
        plant(&mut engine, &mut farm, target);
    }

    assert_eq!(farm.crop_count(), PLOT_COUNT);
    let plots: HashSet<Plot> = farm.crops().map(|crop| crop.plot()).collect();
    let ids: HashSet<_> = farm.crops().map(|crop| crop.id()).collect();
    assert_eq!(plots.len(), PLOT_COUNT);
    assert_eq!(ids.len(), PLOT_COUNT);
}

#[test]
fn stats_split_ready_and_growing() {
    let mut engine = growth_only_engine();
    let mut farm = Farm::new();
    plant(&mut engine, &mut farm, plot(0, 0));
    grow_to_ready(&mut engine, &mut farm);
    plant(&mut engine, &mut farm, plot(1, 0));

    let snapshot = farm.snapshot("stats");
    assert_eq!(snapshot.stats.total, 2);
    assert_eq!(snapshot.stats.ready, 1);
    assert_eq!(snapshot.stats.growing, 1);
}
