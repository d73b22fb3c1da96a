//! Test helpers.
//!
//! Bevy provides `World::run_system_once` (via the `RunSystemOnce` trait) for quickly
//! executing a system in tests without building a full schedule.
//!
//! Systems that use `Commands` enqueue structural changes; applying them is normally handled by
//! `ApplyDeferred` / schedule boundaries. We call `world.flush()` after running so queued commands
//! are applied before assertions.

use std::time::Duration;

use bevy::ecs::message::{Message, Messages};
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// A `Time` whose last delta is exactly one tick of `secs`.
///
/// Systems in the fixed schedule read `Res<Time>`, which is the fixed clock while
/// `FixedMain` runs, so tests insert this as the generic `Time`.
pub fn time_with_delta(secs: f32) -> Time {
    let mut t = Time::<()>::default();
    t.advance_by(Duration::from_secs_f32(secs));
    t
}

/// Register message storage if a test world does not have it yet.
pub fn ensure_messages<M: Message>(world: &mut World) {
    if world.get_resource::<Messages<M>>().is_none() {
        world.init_resource::<Messages<M>>();
    }
}

/// Drain every message of type `M` currently buffered in the world.
pub fn drain_messages<M: Message>(world: &mut World) -> Vec<M> {
    ensure_messages::<M>(world);
    world.resource_mut::<Messages<M>>().drain().collect()
}
