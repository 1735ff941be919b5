#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Physics Core
//!
//! Real-time rigid-body physics for a 3D game engine: integrates body
//! motion, detects collisions through a uniform spatial grid, and resolves
//! them with a sequential impulse solver acting on linear and angular
//! velocity.
//!
//! ## Key Components
//!
//! -   **Colliders:** [`Collider`] is a tagged [`Shape`] (box or triangle)
//!     with cached world-space points, edges and bounds. Loaded geometry
//!     enters through [`ColliderBuilder`].
//! -   **Bodies:** [`RigidBody`] holds mass properties, kinematic state,
//!     force accumulators and the colliders it owns. An [`Entity`] takes part
//!     in physics when it carries both a body and a [`Transform`].
//! -   **Broad phase:** [`SpatialGrid`] buckets colliders by the cell of their
//!     center and pairs them with the colliders around them.
//! -   **Narrow phase:** [`NarrowPhase`] dispatches each pair on its shape
//!     kinds to a contact detector.
//! -   **Resolution:** [`SequentialImpulseSolver`] behind the
//!     [`ContactSolver`] trait.
//! -   **Orchestration:** [`PhysicsSystem::update`] runs one frame and returns
//!     a [`StepReport`].
//!
//! ## Usage
//!
//! ```rust
//! use glam::{Quat, Vec3};
//! use physics::{
//!     box_inertia, Collider, DynamicType, Entity, EntityId, PhysicsConfig, PhysicsSystem,
//!     RigidBody,
//! };
//!
//! let mut system = PhysicsSystem::new(PhysicsConfig::default())?;
//!
//! let id = EntityId(1);
//! let half = Vec3::splat(0.5);
//! let body = RigidBody::new_dynamic(1.0, Vec3::ZERO, Quat::IDENTITY, box_inertia(1.0, half))
//!     .with_velocity(Vec3::X)
//!     .with_collider(Collider::new_box(id, DynamicType::Dynamic, Vec3::ZERO, half));
//! let mut entities = vec![Entity::with_body(id, body)];
//! system.insert(&mut entities[0])?;
//!
//! let report = system.update(1.0 / 60.0, &mut entities, &mut Vec::new())?;
//! assert_eq!(report.integrated, 1);
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod body;
pub mod builder;
pub mod collider;
pub mod collision;
pub mod config;
pub mod debug;
pub mod entity;
pub mod error;
pub mod grid;
pub mod index;
pub mod integrator;
pub mod message;
pub mod solver;
pub mod system;
pub mod transform;
pub mod types;

pub use body::RigidBody;
pub use builder::{box_inertia, bounding_box_inertia, calculate_box_mass, ColliderBuilder};
pub use collider::{Aabb, Collider, Shape, ShapeKind};
pub use collision::{Collision, Contact, NarrowPhase};
pub use config::PhysicsConfig;
pub use debug::{DebugDraw, DebugFrame, DebugVertex};
pub use entity::Entity;
pub use error::{ColliderError, PhysicsError};
pub use grid::{CellCoord, ColliderSource, SpatialGrid, SpatialGridStats};
pub use index::BodyIndex;
pub use message::{Message, MessagePayload, MoveIntent};
pub use solver::{ContactSolver, SequentialImpulseSolver, SolverStats};
pub use system::{PhysicsSystem, StepReport};
pub use transform::Transform;
pub use types::{ColliderKey, DynamicType, EntityId};
