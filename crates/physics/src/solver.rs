//! Velocity-level contact resolution.
//!
//! Contacts are resolved one at a time in the order the broad phase reported
//! them, so later contacts see the impulses of earlier ones. There is no
//! positional correction: overlapping shapes are only stopped from
//! approaching further.

use glam::{Mat3, Vec3};
use tracing::{trace, warn};

use crate::collision::{Collision, Contact};
use crate::error::PhysicsError;
use crate::grid::ColliderSource;
use crate::index::BodyIndex;
use crate::types::{DynamicType, EntityId};

/// Effective-mass denominators below this produce no impulse.
pub const MIN_EFFECTIVE_MASS: f32 = 1e-6;

/// Counters for one solver pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub contacts: usize,
    pub impulses: usize,
    /// Contacts already moving apart.
    pub separating: usize,
    /// Contacts whose denominator was clamped.
    pub degenerate: usize,
}

/// Resolves a frame's collisions into body velocity changes.
pub trait ContactSolver {
    /// # Errors
    ///
    /// Fails when a collision names an entity or collider missing from
    /// `bodies`, or pairs an entity with itself.
    fn solve(
        &self,
        collisions: &[Collision],
        bodies: &mut BodyIndex<'_>,
    ) -> Result<SolverStats, PhysicsError>;
}

/// One side of a contact as seen by the impulse formula.
#[derive(Debug, Clone, Copy)]
pub struct ContactSide {
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub inverse_mass: f32,
    pub inverse_inertia: Mat3,
    /// Collider center to contact point.
    pub arm: Vec3,
}

impl ContactSide {
    fn point_velocity(&self) -> Vec3 {
        self.velocity + self.angular_velocity.cross(self.arm)
    }

    fn angular_term(&self, normal: Vec3) -> Vec3 {
        (self.inverse_inertia * self.arm.cross(normal)).cross(self.arm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Impulse {
    /// Scalar impulse along the contact normal.
    Applied(f32),
    Separating,
    /// Denominator too small or not finite; no impulse.
    Degenerate,
}

/// Impulse magnitude for a contact whose normal points from `second` toward
/// `first`.
#[must_use]
pub fn compute_impulse(
    first: &ContactSide,
    second: &ContactSide,
    normal: Vec3,
    elasticity: f32,
) -> Impulse {
    let relative = first.point_velocity() - second.point_velocity();
    let approach = relative.dot(normal);
    if approach > 0.0 {
        return Impulse::Separating;
    }

    let inverse_mass_sum = first.inverse_mass
        + second.inverse_mass
        + normal.dot(first.angular_term(normal) + second.angular_term(normal));
    if !inverse_mass_sum.is_finite() || inverse_mass_sum < MIN_EFFECTIVE_MASS {
        return Impulse::Degenerate;
    }

    Impulse::Applied(((-1.0 - elasticity) * relative).dot(normal) / inverse_mass_sum)
}

/// Single-pass sequential impulse solver with a fixed restitution.
#[derive(Debug, Clone, Copy)]
pub struct SequentialImpulseSolver {
    pub elasticity: f32,
}

impl SequentialImpulseSolver {
    #[must_use]
    pub const fn new(elasticity: f32) -> Self {
        Self { elasticity }
    }

    fn side(
        bodies: &BodyIndex<'_>,
        entity: EntityId,
        center: Vec3,
        point: Vec3,
    ) -> Result<ContactSide, PhysicsError> {
        let body = bodies.body(entity)?;
        Ok(ContactSide {
            velocity: body.velocity,
            angular_velocity: body.angular_velocity,
            inverse_mass: body.inverse_mass(),
            inverse_inertia: body.inverse_inertia_tensor(),
            arm: point - center,
        })
    }

    fn resolve_contact(
        &self,
        collision: &Collision,
        contact: &Contact,
        bodies: &mut BodyIndex<'_>,
        stats: &mut SolverStats,
    ) -> Result<(), PhysicsError> {
        let first_collider = bodies.collider(collision.first_collider)?;
        let second_collider = bodies.collider(collision.second_collider)?;
        let (first_center, first_type) = (first_collider.center(), first_collider.dynamic_type);
        let (second_center, second_type) = (second_collider.center(), second_collider.dynamic_type);

        let first = Self::side(bodies, collision.first, first_center, contact.point)?;
        let second = Self::side(bodies, collision.second, second_center, contact.point)?;

        let magnitude = match compute_impulse(&first, &second, contact.normal, self.elasticity) {
            Impulse::Applied(magnitude) => magnitude,
            Impulse::Separating => {
                stats.separating += 1;
                return Ok(());
            }
            Impulse::Degenerate => {
                warn!(
                    first = %collision.first,
                    second = %collision.second,
                    "near-zero effective mass, impulse clamped to zero"
                );
                stats.degenerate += 1;
                return Ok(());
            }
        };

        let impulse = contact.normal * magnitude;
        if first_type == DynamicType::Dynamic {
            let body = bodies.body_mut(collision.first)?;
            body.velocity += impulse * first.inverse_mass;
            body.angular_velocity += first.inverse_inertia * first.arm.cross(impulse);
        }
        if second_type == DynamicType::Dynamic {
            let body = bodies.body_mut(collision.second)?;
            body.velocity -= impulse * second.inverse_mass;
            body.angular_velocity -= second.inverse_inertia * second.arm.cross(impulse);
        }
        stats.impulses += 1;
        trace!(
            first = %collision.first,
            second = %collision.second,
            magnitude,
            normal = ?contact.normal,
            "impulse applied"
        );
        Ok(())
    }
}

impl ContactSolver for SequentialImpulseSolver {
    fn solve(
        &self,
        collisions: &[Collision],
        bodies: &mut BodyIndex<'_>,
    ) -> Result<SolverStats, PhysicsError> {
        let mut stats = SolverStats::default();
        for collision in collisions {
            if collision.first == collision.second {
                return Err(PhysicsError::SelfPair(collision.first));
            }
            for contact in &collision.contacts {
                stats.contacts += 1;
                self.resolve_contact(collision, contact, bodies, &mut stats)?;
            }
        }
        Ok(stats)
    }
}
