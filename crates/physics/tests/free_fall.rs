use glam::{Quat, Vec3};
use physics::integrator::{integrate_body, integrate_orientation};
use physics::{
    box_inertia, Collider, DynamicType, Entity, EntityId, PhysicsConfig, PhysicsSystem, RigidBody,
};

const GRAVITY: f32 = -9.81;

fn falling_box(id: u32, position: Vec3) -> Entity {
    let half = Vec3::splat(0.5);
    let body = RigidBody::new_dynamic(2.0, position, Quat::IDENTITY, box_inertia(2.0, half))
        .with_collider(Collider::new_box(EntityId(id), DynamicType::Dynamic, position, half));
    Entity::with_body(EntityId(id), body)
}

#[test]
fn box_free_fall_matches_semi_implicit_euler() -> anyhow::Result<()> {
    let mut system = PhysicsSystem::new(PhysicsConfig::default())?;
    let mut entities = vec![falling_box(1, Vec3::new(0.0, 10.0, 0.0))];
    system.insert(&mut entities[0])?;

    let dt = 0.01_f32;
    let steps = 100_u32;
    for _ in 0..steps {
        let body = entities[0].physics.as_mut().unwrap();
        let weight = Vec3::new(0.0, GRAVITY * body.mass().unwrap(), 0.0);
        body.apply_force(weight);
        system.update(dt, &mut entities, &mut Vec::new())?;
    }

    // Velocity is updated before position, so y_n = y_0 + g dt^2 n(n+1)/2.
    let n = steps as f32;
    let expected = 10.0 + GRAVITY * dt * dt * n * (n + 1.0) / 2.0;
    let body = entities[0].physics.as_ref().unwrap();
    let diff = (body.position.y - expected).abs();
    assert!(diff < 1e-3, "diff={diff}");
    assert!((body.velocity.y - GRAVITY * dt * n).abs() < 1e-3);

    // Collider and transform follow the body.
    assert!((body.colliders[0].center() - body.position).length() < 1e-4);
    let transform = entities[0].transform.unwrap();
    assert_eq!(transform.position, body.position);

    Ok(())
}

#[test]
fn integration_is_deterministic() -> anyhow::Result<()> {
    let mut body = RigidBody::new_dynamic(3.0, Vec3::ONE, Quat::IDENTITY, box_inertia(3.0, Vec3::ONE))
        .with_velocity(Vec3::new(0.5, 2.0, -1.0));
    body.angular_velocity = Vec3::new(0.3, -0.2, 0.9);
    body.apply_force(Vec3::new(1.0, -30.0, 0.0));
    body.apply_torque(Vec3::new(0.0, 0.5, 0.0));

    let mut a = body.clone();
    let mut b = body;
    let delta_a = integrate_body(&mut a, 1.0 / 60.0);
    let delta_b = integrate_body(&mut b, 1.0 / 60.0);

    assert_eq!(delta_a, delta_b);
    assert_eq!(a.position, b.position);
    assert_eq!(a.velocity, b.velocity);
    assert_eq!(a.angular_velocity, b.angular_velocity);
    assert_eq!(a.orientation, b.orientation);

    Ok(())
}

#[test]
fn accumulators_are_cleared_every_step() -> anyhow::Result<()> {
    let mut body = RigidBody::new_dynamic(1.0, Vec3::ZERO, Quat::IDENTITY, box_inertia(1.0, Vec3::ONE));
    body.apply_force(Vec3::new(0.0, 10.0, 0.0));
    body.apply_torque(Vec3::X);
    integrate_body(&mut body, 0.1);
    assert_eq!(body.force_accumulator, Vec3::ZERO);
    assert_eq!(body.torque_accumulator, Vec3::ZERO);

    // A force applied once only changes velocity once.
    let velocity = body.velocity;
    integrate_body(&mut body, 0.1);
    assert_eq!(body.velocity, velocity);

    Ok(())
}

#[test]
fn orientation_stays_normalised_while_spinning() -> anyhow::Result<()> {
    let mut orientation = Quat::IDENTITY;
    let spin = Vec3::new(1.5, -4.0, 2.5);
    for _ in 0..10_000 {
        orientation = integrate_orientation(orientation, spin, 1.0 / 60.0);
    }
    assert!((orientation.length() - 1.0).abs() < 1e-5);

    Ok(())
}

#[test]
fn torque_spins_body() -> anyhow::Result<()> {
    let mut body = RigidBody::new_dynamic(1.0, Vec3::ZERO, Quat::IDENTITY, box_inertia(6.0, Vec3::splat(0.5)));
    body.apply_torque(Vec3::new(0.0, 2.0, 0.0));
    integrate_body(&mut body, 0.5);
    // I = 1, so w = 2 * 0.5.
    assert!((body.angular_velocity.y - 1.0).abs() < 1e-5);
    assert!(body.orientation.y > 0.0);

    Ok(())
}
