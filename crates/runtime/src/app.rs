//! Simulation loop driven by a scene.

use anyhow::{Context, Result};
use glam::Vec3;
use physics::{Entity, EntityId, Message, PhysicsSystem};
use tracing::info;

use crate::scene::{Scene, World};

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub steps: u64,
    pub dt: f32,
    /// Log a progress line every this many frames; 0 disables it.
    pub log_every: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { steps: 600, dt: 1.0 / 60.0, log_every: 60 }
    }
}

/// Totals over a run and the final body positions.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub collisions: usize,
    pub impulses: usize,
    pub degenerate: usize,
    pub positions: Vec<(String, Vec3)>,
}

impl RunSummary {
    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<Vec3> {
        self.positions.iter().find(|(n, _)| n == name).map(|(_, p)| *p)
    }
}

/// Build the scene and step it `options.steps` times.
///
/// # Errors
///
/// Scene build failures and any physics frame that aborts.
pub fn run(scene: &Scene, options: RunOptions) -> Result<RunSummary> {
    let World { config, gravity, mut entities, names } = scene.build()?;
    let mut system = PhysicsSystem::new(config).context("invalid physics configuration")?;
    for entity in &mut entities {
        system.insert(entity).with_context(|| format!("registering entity {}", entity.id))?;
    }
    info!(
        bodies = entities.len(),
        cells_per_side = system.grid().cells_per_side(),
        "scene loaded"
    );

    let mut summary = RunSummary::default();
    let mut messages = Vec::new();
    for frame in 0..options.steps {
        apply_gravity(&mut entities, gravity);
        for input in scene.inputs.iter().filter(|input| input.frame == frame) {
            if let Some(id) = names.get(&input.body) {
                messages.push(Message::movement(*id, input.intent()));
            }
        }

        let report = system
            .update(options.dt, &mut entities, &mut messages)
            .with_context(|| format!("physics frame {frame} aborted"))?;
        summary.frames += 1;
        summary.collisions += report.collisions.len();
        summary.impulses += report.solver.impulses;
        summary.degenerate += report.solver.degenerate;

        if options.log_every > 0 && (frame + 1) % options.log_every == 0 {
            let stats = system.grid_stats();
            info!(
                frame = frame + 1,
                collisions = report.collisions.len(),
                impulses = report.solver.impulses,
                occupied_cells = stats.occupied_cells,
                "simulation progress"
            );
        }
    }

    summary.positions = names
        .iter()
        .filter_map(|(name, id)| position(&entities, *id).map(|p| (name.clone(), p)))
        .collect();
    summary.positions.sort_by(|a, b| a.0.cmp(&b.0));
    info!(frames = summary.frames, collisions = summary.collisions, "simulation finished");
    Ok(summary)
}

/// Gravity is a force, so it must be re-applied before every step.
fn apply_gravity(entities: &mut [Entity], gravity: Vec3) {
    for body in entities.iter_mut().filter_map(|e| e.physics.as_mut()) {
        if let Some(mass) = body.mass() {
            body.apply_force(gravity * mass);
        }
    }
}

fn position(entities: &[Entity], id: EntityId) -> Option<Vec3> {
    entities
        .iter()
        .find(|e| e.id == id)
        .and_then(|e| e.physics.as_ref())
        .map(|body| body.position)
}
