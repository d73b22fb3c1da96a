//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `danmaku::game::configure_headless` to install gameplay plugins.
//! - time advances by exactly one fixed tick per `app.update()` (after the first).

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

/// Default `Time<Fixed>` timestep (64 Hz).
pub const TICK: Duration = Duration::from_micros(15_625);

pub fn app_headless() -> App {
    let mut app = App::new();

    // AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(TICK));

    danmaku::game::configure_headless(&mut app);
    // Plugins such as Avian's broad phase insert resources in `finish`.
    app.finish();
    app.cleanup();
    app
}

/// A headless app that has entered `InGame` and is past its zero-delta first frame.
pub fn app_in_game() -> App {
    let mut app = app_headless();
    app.update();
    app.update();
    app
}

/// Number of fixed ticks covering `secs`, rounded up.
pub fn ticks_for(secs: f32) -> usize {
    (secs / TICK.as_secs_f32()).ceil() as usize
}

pub fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

pub fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, F>()
        .iter(app.world())
        .count()
}

/// Collects every message of type `M` as it is written, so tests can inspect
/// messages that were already consumed by gameplay systems.
#[derive(Resource)]
pub struct Seen<M: Message + Clone>(pub Vec<M>);

impl<M: Message + Clone> Default for Seen<M> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

pub fn record<M: Message + Clone>(app: &mut App) {
    app.init_resource::<Seen<M>>();
    app.add_systems(Last, |mut reader: MessageReader<M>, mut seen: ResMut<Seen<M>>| {
        seen.0.extend(reader.read().cloned());
    });
}

pub fn seen<M: Message + Clone>(app: &App) -> &[M] {
    &app.world().resource::<Seen<M>>().0
}
