//! Two scripted tanks duel in a walled room.
//!
//! Run with `RUST_LOG=ricochet_core=debug cargo run --example duel` to see
//! the core's own log lines next to the host's.

use ricochet_core::entity::{EntityId, EntityKind};
use ricochet_core::math::try_normalize;
use ricochet_core::simulation::{ContactTarget, MoveReport, MoveRequest};
use ricochet_core::{
    ControlInput, ControlInputs, RespawnQueue, Simulation, SimulationConfig, SpatialMover, Vector2,
};
use tracing::info;

const HALF_EXTENT: f64 = 300.0;
const TANK_RADIUS: f64 = 16.0;

/// Host-side collision detection: four walls plus round tank hulls.
struct Room {
    half_extent: f64,
    tanks: Vec<(EntityId, Vector2)>,
}

impl Room {
    fn wall_hit(&self, to: Vector2) -> Option<(Vector2, Vector2)> {
        let h = self.half_extent;
        let clamped = Vector2::new(to.x.clamp(-h, h), to.y.clamp(-h, h));
        if clamped == to {
            return None;
        }
        let normal = if to.x.abs() > h {
            Vector2::new(-to.x.signum(), 0.0)
        } else {
            Vector2::new(0.0, -to.y.signum())
        };
        Some((clamped, normal))
    }

    fn tank_hit(&self, request: &MoveRequest) -> Option<(EntityId, Vector2)> {
        self.tanks
            .iter()
            .filter(|(id, _)| *id != request.id)
            .find(|(_, centre)| centre.distance(request.to) <= TANK_RADIUS)
            .map(|&(id, centre)| (id, try_normalize(request.to - centre).unwrap_or(Vector2::Y)))
    }
}

impl SpatialMover for Room {
    fn sweep(&mut self, request: &MoveRequest) -> MoveReport {
        if request.kind == EntityKind::Projectile {
            if let Some((tank, normal)) = self.tank_hit(request) {
                return MoveReport::collision(request.to, normal, ContactTarget::Entity(tank));
            }
        }
        match self.wall_hit(request.to) {
            Some((clamped, normal)) => MoveReport::collision(clamped, normal, ContactTarget::Surface),
            None => MoveReport::clear(request.to),
        }
    }
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = SimulationConfig::default();
    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("invalid config: {err}");
            return;
        }
    };
    let red = sim.spawn_tank(Vector2::new(-200.0, -100.0), 0.0);
    let blue = sim.spawn_tank(Vector2::new(200.0, 100.0), std::f64::consts::PI);
    for id in [red, blue] {
        sim.subscribe(id, move |signal| info!(victim = %signal.victim, "listener saw death"));
    }

    let mut respawns = RespawnQueue::new(sim.config().respawn_delay);
    let mut room = Room {
        half_extent: HALF_EXTENT,
        tanks: Vec::new(),
    };
    let dt = sim.config().fixed_dt;
    let mut score = [0u32; 2];

    for tick in 0..1800u32 {
        room.tanks = sim
            .arena()
            .tanks()
            .filter(|t| t.is_alive())
            .map(|t| (t.id(), t.position()))
            .collect();

        let mut inputs = ControlInputs::new();
        for (id, other) in [(red, blue), (blue, red)] {
            let target = sim.arena().tank(other).map(|t| t.position());
            let mut input = ControlInput::drive(if tick % 240 < 120 { 1.0 } else { -1.0 }, 0.6);
            if let Some(aim) = target.filter(|_| tick % 45 == 0) {
                input = input.firing_at(aim);
            }
            inputs.insert(id, input);
        }

        let report = sim.step(dt, &inputs, &mut room);
        for death in &report.deaths {
            let winner = usize::from(death.victim == red);
            score[winner] += 1;
            info!(tick, victim = %death.victim, red = score[0], blue = score[1], "kill");
        }
        respawns.schedule_all(&report.deaths);

        for victim in respawns.advance(dt) {
            let spot = if victim == red {
                Vector2::new(-200.0, -100.0)
            } else {
                Vector2::new(200.0, 100.0)
            };
            sim.respawn(victim, spot, 0.0);
            info!(%victim, "respawned");
        }
    }

    info!(red = score[0], blue = score[1], "final score");
}
