//! JSON scene descriptions.
//!
//! A scene lists bodies with their colliders as raw point lists (or boxes,
//! expanded to their corners) relative to the body position, plus optional
//! configuration overrides, gravity and scripted move inputs. Every collider
//! goes through [`ColliderBuilder`].

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::{Quat, Vec3};
use physics::{
    bounding_box_inertia, ColliderBuilder, DynamicType, Entity, EntityId, MoveIntent,
    PhysicsConfig, RigidBody,
};
use serde::Deserialize;

/// Scene compiled into the binary.
pub const BUILTIN_SCENE: &str = include_str!("../../../scenes/drop.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    #[serde(default)]
    pub config: ConfigOverrides,
    #[serde(default = "default_gravity")]
    pub gravity: [f32; 3],
    pub bodies: Vec<BodySpec>,
    #[serde(default)]
    pub inputs: Vec<InputSpec>,
}

fn default_gravity() -> [f32; 3] {
    [0.0, -9.81, 0.0]
}

fn default_mass() -> f32 {
    1.0
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub grid_length: Option<f32>,
    pub cell_half_width: Option<f32>,
    pub elasticity: Option<f32>,
    pub move_speed: Option<f32>,
    pub debug_draw: Option<bool>,
}

impl ConfigOverrides {
    #[must_use]
    pub fn apply(&self, base: PhysicsConfig) -> PhysicsConfig {
        PhysicsConfig {
            grid_length: self.grid_length.unwrap_or(base.grid_length),
            cell_half_width: self.cell_half_width.unwrap_or(base.cell_half_width),
            elasticity: self.elasticity.unwrap_or(base.elasticity),
            move_speed: self.move_speed.unwrap_or(base.move_speed),
            debug_draw: self.debug_draw.unwrap_or(base.debug_draw),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodySpec {
    pub name: String,
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default = "default_mass")]
    pub mass: f32,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub velocity: [f32; 3],
    pub colliders: Vec<ColliderSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderSpec {
    /// Three points for a triangle, more for a bounding box.
    Points(Vec<[f32; 3]>),
    Box {
        #[serde(default)]
        center: [f32; 3],
        half_extents: [f32; 3],
    },
}

impl ColliderSpec {
    /// Body-relative points handed to the builder.
    fn points(&self) -> Vec<Vec3> {
        match self {
            ColliderSpec::Points(points) => points.iter().copied().map(Vec3::from).collect(),
            ColliderSpec::Box { center, half_extents } => {
                let center = Vec3::from(*center);
                let half = Vec3::from(*half_extents);
                [-1.0, 1.0]
                    .into_iter()
                    .flat_map(|x| [-1.0, 1.0].into_iter().map(move |y| (x, y)))
                    .flat_map(|(x, y)| [-1.0, 1.0].into_iter().map(move |z| Vec3::new(x, y, z)))
                    .map(|sign| center + half * sign)
                    .collect()
            }
        }
    }
}

/// A move request applied to a named body on one frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSpec {
    pub frame: u64,
    pub body: String,
    #[serde(default)]
    pub forward: bool,
    #[serde(default)]
    pub backward: bool,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
}

impl InputSpec {
    #[must_use]
    pub fn intent(&self) -> MoveIntent {
        MoveIntent {
            forward: self.forward,
            backward: self.backward,
            left: self.left,
            right: self.right,
        }
    }
}

/// Entities and settings built from a scene.
#[derive(Debug)]
pub struct World {
    pub config: PhysicsConfig,
    pub gravity: Vec3,
    pub entities: Vec<Entity>,
    pub names: HashMap<String, EntityId>,
}

impl Scene {
    /// # Errors
    ///
    /// Malformed JSON or unknown fields.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse scene JSON")
    }

    /// # Errors
    ///
    /// Unreadable file or malformed JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in scene {}", path.display()))
    }

    /// Build entities with ids starting at 1, in listing order.
    ///
    /// # Errors
    ///
    /// Duplicate body names, bodies without colliders, invalid collider
    /// points, or inputs naming unknown bodies.
    pub fn build(&self) -> Result<World> {
        let mut entities = Vec::with_capacity(self.bodies.len());
        let mut names = HashMap::new();

        for (spec, raw_id) in self.bodies.iter().zip(1u32..) {
            let id = EntityId(raw_id);
            if names.insert(spec.name.clone(), id).is_some() {
                bail!("duplicate body name {:?}", spec.name);
            }
            entities.push(build_entity(id, spec)?);
        }

        for input in &self.inputs {
            if !names.contains_key(&input.body) {
                bail!("input on frame {} names unknown body {:?}", input.frame, input.body);
            }
        }

        Ok(World {
            config: self.config.apply(PhysicsConfig::default()),
            gravity: Vec3::from(self.gravity),
            entities,
            names,
        })
    }
}

fn build_entity(id: EntityId, spec: &BodySpec) -> Result<Entity> {
    if spec.colliders.is_empty() {
        bail!("body {:?} has no colliders", spec.name);
    }
    let dynamic_type = if spec.dynamic { DynamicType::Dynamic } else { DynamicType::Static };
    let position = Vec3::from(spec.position);

    let colliders = spec
        .colliders
        .iter()
        .enumerate()
        .map(|(i, collider)| {
            let points: Vec<Vec3> = collider.points().into_iter().map(|p| p + position).collect();
            ColliderBuilder::build(id, dynamic_type, &points)
                .with_context(|| format!("collider {i} of body {:?}", spec.name))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut body = if spec.dynamic {
        let inertia = bounding_box_inertia(spec.mass, &colliders);
        RigidBody::new_dynamic(spec.mass, position, Quat::IDENTITY, inertia)
            .with_velocity(Vec3::from(spec.velocity))
    } else {
        RigidBody::new_static(position, Quat::IDENTITY)
    };
    for collider in colliders {
        body.add_collider(collider);
    }
    Ok(Entity::with_body(id, body))
}
