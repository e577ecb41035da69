use std::time::Duration;

use farmo::{
    engine::{EngineBuilder, EngineSettings},
    farm::ClickOutcome,
    systems::GrowthSystem,
    FarmConfig, FarmError, FarmRuntime,
};
use tokio::time;

fn config() -> FarmConfig {
    FarmConfig {
        name: "runtime".into(),
        seed: Some(5),
        time_unit_ms: 1_000,
        ..FarmConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn mount_starts_with_an_empty_farm() {
    let handle = FarmRuntime::mount(&config());
    let snapshot = handle.snapshot().await.unwrap();

    assert_eq!(snapshot.elapsed_units, 0);
    assert_eq!(snapshot.stats.total, 0);
    assert_eq!(snapshot.selected, None);
    assert!(snapshot.is_day);

    handle.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn clicks_and_timers_share_one_farm() {
    let handle = FarmRuntime::mount(&config());

    assert!(matches!(
        handle.click(2, 1).await.unwrap(),
        ClickOutcome::Selected { .. }
    ));
    assert!(matches!(
        handle.click(2, 1).await.unwrap(),
        ClickOutcome::Planted { .. }
    ));

    time::sleep(Duration::from_millis(10_500)).await;

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.elapsed_units, 10);
    let crop = snapshot.plots[6 + 2].crop.as_ref().expect("crop at (2, 1)");
    // Initial weather is sunny.
    assert_eq!(crop.growth_stage, 1.5);

    handle.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn click_snapshot_reflects_the_click() {
    let handle = FarmRuntime::mount(&config());

    let (outcome, snapshot) = handle.click_with_snapshot(3, 2).await.unwrap();
    assert!(matches!(outcome, ClickOutcome::Selected { .. }));
    assert_eq!(snapshot.selected.map(|plot| (plot.x(), plot.y())), Some((3, 2)));

    time::sleep(Duration::from_millis(4_500)).await;
    let (outcome, snapshot) = handle.click_with_snapshot(3, 2).await.unwrap();
    assert!(matches!(outcome, ClickOutcome::Planted { .. }));
    assert_eq!(snapshot.elapsed_units, 4);
    assert_eq!(snapshot.selected, None);
    assert_eq!(snapshot.stats.total, 1);
    assert!(snapshot.plots[2 * 6 + 3].crop.is_some());

    handle.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn phase_flips_on_the_wall_clock() {
    let handle = FarmRuntime::mount(&config());

    time::sleep(Duration::from_millis(29_500)).await;
    assert!(handle.snapshot().await.unwrap().is_day);

    time::sleep(Duration::from_secs(1)).await;
    assert!(!handle.snapshot().await.unwrap().is_day);

    handle.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn out_of_bounds_click_is_rejected() {
    let handle = FarmRuntime::mount(&config());
    assert_eq!(
        handle.click(6, 0).await,
        Err(FarmError::OutOfBounds {
            x: 6,
            y: 0,
            columns: 6,
            rows: 4
        })
    );
    handle.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn no_ticks_after_unmount() {
    let handle = FarmRuntime::mount(&config());
    let client = handle.client();
    time::sleep(Duration::from_millis(3_500)).await;
    assert_eq!(client.snapshot().await.unwrap().elapsed_units, 3);

    handle.unmount().await;
    time::sleep(Duration::from_secs(60)).await;

    assert_eq!(client.snapshot().await, Err(FarmError::Unmounted));
    assert_eq!(client.click(0, 0).await, Err(FarmError::Unmounted));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_the_farm() {
    let handle = FarmRuntime::mount(&config());
    let client = handle.client();
    drop(handle);
    time::sleep(Duration::from_secs(5)).await;

    assert_eq!(client.snapshot().await, Err(FarmError::Unmounted));
}

#[tokio::test(start_paused = true)]
async fn remount_starts_fresh() {
    let first = FarmRuntime::mount(&config());
    first.click(0, 0).await.unwrap();
    first.click(0, 0).await.unwrap();
    time::sleep(Duration::from_millis(20_500)).await;
    first.unmount().await;

    let second = FarmRuntime::mount(&config());
    let snapshot = second.snapshot().await.unwrap();
    assert_eq!(snapshot.elapsed_units, 0);
    assert_eq!(snapshot.stats.total, 0);
    second.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn subscribers_receive_published_snapshots() {
    let engine = EngineBuilder::new(EngineSettings {
        farm_name: "broadcast".into(),
        seed: 2,
    })
    .with_system(GrowthSystem::new())
    .build();
    let handle = FarmRuntime::mount_with(engine, Duration::from_secs(1), 5);
    let mut snapshots = handle.subscribe();

    handle.click(1, 1).await.unwrap();
    let after_click = snapshots.recv().await.unwrap();
    assert_eq!(after_click.selected.map(|plot| (plot.x(), plot.y())), Some((1, 1)));

    let periodic = snapshots.recv().await.unwrap();
    assert_eq!(periodic.elapsed_units, 5);

    handle.unmount().await;
}
