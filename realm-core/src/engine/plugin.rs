use bevy::prelude::*;

use crate::engine::config::SessionConfig;
use crate::engine::input::InputIntent;
use crate::engine::simulation::Simulation;
use crate::events::GameEvent;

/// Runs a realm session inside a bevy app: one simulation frame per
/// `Update` pass, with notifications forwarded as `GameEvent`s.
pub struct SimulationPlugin {
    pub config: SessionConfig,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            config: SessionConfig::default(),
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Simulation::realm(self.config.clone()))
            .init_resource::<InputIntent>()
            .add_event::<GameEvent>()
            .add_systems(Update, simulation_tick_system);
    }
}

fn simulation_tick_system(
    time: Res<Time>,
    mut sim: ResMut<Simulation>,
    mut input: ResMut<InputIntent>,
    mut events: EventWriter<GameEvent>,
) {
    sim.update(time.delta_secs(), &input);
    input.clear_triggers();
    for event in sim.drain_events() {
        events.send(event);
    }
}
