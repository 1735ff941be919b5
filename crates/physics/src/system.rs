//! # Physics System
//!
//! Frame orchestration. One call to [`PhysicsSystem::update`] runs, in order:
//! message application, integration (which re-files moved colliders), the
//! broad-phase query with narrow-phase contact generation, impulse
//! resolution and debug capture. No phase starts before the previous one
//! has finished.

use std::collections::HashMap;

use glam::Vec3;
use tracing::{debug, trace};

use crate::body::RigidBody;
use crate::collision::{Collision, NarrowPhase};
use crate::config::PhysicsConfig;
use crate::debug::DebugFrame;
use crate::entity::Entity;
use crate::error::PhysicsError;
use crate::grid::{SpatialGrid, SpatialGridStats};
use crate::index::BodyIndex;
use crate::integrator;
use crate::message::{Message, MessagePayload, MoveIntent};
use crate::solver::{ContactSolver, SequentialImpulseSolver, SolverStats};
use crate::types::{ColliderKey, EntityId};

/// Everything one frame produced.
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Zero-based frame counter.
    pub frame: u64,
    pub collisions: Vec<Collision>,
    pub solver: SolverStats,
    /// Present when debug drawing is enabled.
    pub debug: Option<DebugFrame>,
    /// Bodies integrated this frame.
    pub integrated: usize,
    /// Colliders that changed grid cell this frame.
    pub rebucketed: usize,
    /// Messages consumed this frame.
    pub messages: usize,
}

pub struct PhysicsSystem {
    config: PhysicsConfig,
    grid: SpatialGrid,
    narrow_phase: NarrowPhase,
    solver: Box<dyn ContactSolver>,
    frame: u64,
}

impl PhysicsSystem {
    /// # Errors
    ///
    /// [`PhysicsError::InvalidConfig`] when the configuration does not validate.
    pub fn new(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self {
            grid: SpatialGrid::new(config.grid_length, config.cell_half_width),
            narrow_phase: NarrowPhase::new(),
            solver: Box::new(SequentialImpulseSolver::new(config.elasticity)),
            frame: 0,
            config,
        })
    }

    /// Replace the contact solver.
    #[must_use]
    pub fn with_solver(mut self, solver: Box<dyn ContactSolver>) -> Self {
        self.solver = solver;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    #[must_use]
    pub const fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    #[must_use]
    pub fn grid_stats(&self) -> SpatialGridStats {
        self.grid.stats()
    }

    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Register an entity's colliders with the grid and stamp them with the
    /// entity id. Returns how many colliders were filed.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::AlreadyInGrid`] when the entity was inserted before.
    pub fn insert(&mut self, entity: &mut Entity) -> Result<usize, PhysicsError> {
        let id = entity.id;
        let Some(body) = entity.physics.as_mut() else {
            return Ok(0);
        };
        for (slot, collider) in (0u32..).zip(body.colliders.iter_mut()) {
            collider.entity = id;
            self.grid.insert(ColliderKey::new(id, slot), collider)?;
        }
        debug!(entity = %id, colliders = body.colliders.len(), "entity registered");
        Ok(body.colliders.len())
    }

    /// Unfile an entity's colliders. Must be called before the entity is dropped.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::NotInGrid`] when a collider is not filed.
    pub fn remove(&mut self, entity: &mut Entity) -> Result<usize, PhysicsError> {
        let id = entity.id;
        let Some(body) = entity.physics.as_mut() else {
            return Ok(0);
        };
        for (slot, collider) in (0u32..).zip(body.colliders.iter_mut()) {
            self.grid.remove(ColliderKey::new(id, slot), collider)?;
        }
        debug!(entity = %id, "entity unregistered");
        Ok(body.colliders.len())
    }

    /// Advance the simulation by `dt`. Consumes every message in `messages`;
    /// the queue is left empty when the frame succeeds.
    ///
    /// # Errors
    ///
    /// Any invariant violation (duplicate or unknown ids, colliders missing
    /// from the grid, stale buckets) aborts the frame.
    pub fn update(
        &mut self,
        dt: f32,
        entities: &mut [Entity],
        messages: &mut Vec<Message>,
    ) -> Result<StepReport, PhysicsError> {
        let inbox = group_by_sender(messages);
        let mut index = BodyIndex::build(entities)?;
        self.ensure_filed(&index)?;

        let mut integrated = 0;
        let mut rebucketed = 0;
        for (id, body, transform) in index.bodies_mut() {
            if body.is_static() {
                continue;
            }
            if let Some(payloads) = inbox.get(&id) {
                for payload in payloads {
                    self.apply_message(id, body, payload);
                }
            }
            rebucketed += integrator::integrate(id, body, dt, &mut self.grid)?;
            transform.position = body.position;
            transform.orientation = body.orientation;
            integrated += 1;
        }

        if cfg!(debug_assertions) {
            self.grid.verify(&index)?;
        }

        let collisions = self.grid.check_collisions(&index, &self.narrow_phase)?;
        let solver = self.solver.solve(&collisions, &mut index)?;
        let debug = self
            .config
            .debug_draw
            .then(|| DebugFrame::capture(index.colliders(), &collisions));

        let report = StepReport {
            frame: self.frame,
            collisions,
            solver,
            debug,
            integrated,
            rebucketed,
            messages: messages.len(),
        };
        debug!(
            frame = report.frame,
            bodies = integrated,
            rebucketed,
            collisions = report.collisions.len(),
            impulses = report.solver.impulses,
            "physics step"
        );

        messages.clear();
        self.frame += 1;
        Ok(report)
    }

    /// Every collider of every moving body must be filed before any body is
    /// touched, so a failing frame leaves no partial state behind.
    fn ensure_filed(&self, index: &BodyIndex<'_>) -> Result<(), PhysicsError> {
        for (id, body) in index.bodies().filter(|(_, body)| !body.is_static()) {
            for (slot, collider) in (0u32..).zip(&body.colliders) {
                let key = ColliderKey::new(id, slot);
                if collider.cell().is_none() || self.grid.cell_of(key) != collider.cell() {
                    return Err(PhysicsError::NotInGrid(key));
                }
            }
        }
        Ok(())
    }

    fn apply_message(&self, id: EntityId, body: &mut RigidBody, payload: &MessagePayload) {
        match payload {
            MessagePayload::Move(intent) => {
                body.velocity = planar_velocity(*intent, self.config.move_speed, body.velocity);
                trace!(entity = %id, velocity = ?body.velocity, "move intent applied");
            }
            MessagePayload::MouseMove { .. } => {}
        }
    }
}

fn group_by_sender(messages: &[Message]) -> HashMap<EntityId, Vec<MessagePayload>> {
    let mut inbox: HashMap<EntityId, Vec<MessagePayload>> = HashMap::new();
    for message in messages {
        inbox.entry(message.sender).or_default().push(message.payload);
    }
    inbox
}

/// Velocity after a move intent: the planar part is replaced, the vertical
/// part is kept.
fn planar_velocity(intent: MoveIntent, speed: f32, current: Vec3) -> Vec3 {
    let planar = intent.direction().unwrap_or(Vec3::ZERO) * speed;
    Vec3::new(planar.x, current.y, planar.z)
}
