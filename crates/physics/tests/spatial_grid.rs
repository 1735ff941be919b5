use glam::{Quat, Vec3};
use physics::{
    box_inertia, BodyIndex, Collider, ColliderBuilder, DynamicType, Entity, EntityId,
    PhysicsConfig, PhysicsError, PhysicsSystem, RigidBody,
};

fn cube(id: u32, position: Vec3, velocity: Vec3) -> Entity {
    let half = Vec3::splat(0.5);
    let body = RigidBody::new_dynamic(1.0, position, Quat::IDENTITY, box_inertia(1.0, half))
        .with_velocity(velocity)
        .with_collider(Collider::new_box(EntityId(id), DynamicType::Dynamic, position, half));
    Entity::with_body(EntityId(id), body)
}

fn floor(id: u32, size: f32) -> anyhow::Result<Entity> {
    let collider = ColliderBuilder::build(
        EntityId(id),
        DynamicType::Static,
        &[
            Vec3::new(-size, 0.0, -size),
            Vec3::new(0.0, 0.0, size),
            Vec3::new(size, 0.0, -size),
        ],
    )?;
    let body = RigidBody::new_static(Vec3::ZERO, Quat::IDENTITY).with_collider(collider);
    Ok(Entity::with_body(EntityId(id), body))
}

fn quiet_system() -> anyhow::Result<PhysicsSystem> {
    Ok(PhysicsSystem::new(PhysicsConfig { debug_draw: false, ..PhysicsConfig::default() })?)
}

#[test]
fn grid_stays_consistent_while_bodies_cross_cells() -> anyhow::Result<()> {
    let mut system = quiet_system()?;
    let mut entities: Vec<Entity> = (1..=12)
        .map(|i| {
            let f = i as f32;
            cube(
                i,
                Vec3::new(-30.0 + 5.0 * f, 2.0 * f, 25.0 - 4.0 * f),
                Vec3::new((f * 1.7).sin() * 20.0, 0.0, (f * 0.9).cos() * 20.0),
            )
        })
        .collect();
    for entity in &mut entities {
        system.insert(entity)?;
    }

    let mut rebucketed = 0;
    for frame in 0..240 {
        let report = system.update(1.0 / 60.0, &mut entities, &mut Vec::new())?;
        rebucketed += report.rebucketed;

        if frame == 120 {
            // Drop one body mid-run.
            system.remove(&mut entities[3])?;
            entities.remove(3);
        }

        let index = BodyIndex::build(&mut entities)?;
        system.grid().verify(&index)?;
    }

    assert!(rebucketed > 0, "bodies should have changed cells");
    assert_eq!(system.grid().len(), 11);

    Ok(())
}

#[test]
fn colliders_of_one_entity_never_pair() -> anyhow::Result<()> {
    let half = Vec3::splat(0.5);
    let id = EntityId(1);
    let body = RigidBody::new_dynamic(1.0, Vec3::ZERO, Quat::IDENTITY, box_inertia(1.0, half))
        .with_collider(Collider::new_box(id, DynamicType::Dynamic, Vec3::ZERO, half))
        .with_collider(Collider::new_box(id, DynamicType::Dynamic, Vec3::new(0.5, 0.0, 0.0), half));
    let mut entities = vec![Entity::with_body(id, body)];

    let mut system = quiet_system()?;
    assert_eq!(system.insert(&mut entities[0])?, 2);
    let report = system.update(1.0 / 60.0, &mut entities, &mut Vec::new())?;
    assert!(report.collisions.is_empty());

    Ok(())
}

#[test]
fn overlapping_pair_is_reported_once() -> anyhow::Result<()> {
    let mut system = quiet_system()?;
    let mut entities = vec![
        cube(1, Vec3::new(1.0, 0.0, 1.0), Vec3::ZERO),
        cube(2, Vec3::new(1.5, 0.0, 1.0), Vec3::ZERO),
        cube(3, Vec3::new(20.0, 0.0, 20.0), Vec3::ZERO),
    ];
    for entity in &mut entities {
        system.insert(entity)?;
    }

    let report = system.update(1.0 / 60.0, &mut entities, &mut Vec::new())?;
    assert_eq!(report.collisions.len(), 1);
    let collision = &report.collisions[0];
    assert_ne!(collision.first, collision.second);
    assert_eq!((collision.first, collision.second), (EntityId(1), EntityId(2)));

    Ok(())
}

#[test]
fn large_floor_reaches_boxes_far_from_its_cell() -> anyhow::Result<()> {
    let mut system = quiet_system()?;
    let mut entities = vec![
        floor(1, 30.0)?,
        cube(2, Vec3::new(20.0, 0.45, -20.0), Vec3::ZERO),
    ];
    for entity in &mut entities {
        system.insert(entity)?;
    }
    let floor_cell = entities[0].physics.as_ref().unwrap().colliders[0].cell().unwrap();
    let box_cell = entities[1].physics.as_ref().unwrap().colliders[0].cell().unwrap();
    assert!((floor_cell.col - box_cell.col).abs() > 1);

    let report = system.update(1.0 / 60.0, &mut entities, &mut Vec::new())?;
    assert_eq!(report.collisions.len(), 1);
    assert_eq!(report.collisions[0].first, EntityId(1));

    Ok(())
}

#[test]
fn static_pairs_are_skipped() -> anyhow::Result<()> {
    let mut system = quiet_system()?;
    let mut entities = vec![floor(1, 10.0)?, floor(2, 10.0)?];
    for entity in &mut entities {
        system.insert(entity)?;
    }
    let report = system.update(1.0 / 60.0, &mut entities, &mut Vec::new())?;
    assert!(report.collisions.is_empty());
    assert_eq!(report.integrated, 0);

    Ok(())
}

#[test]
fn unregistered_entity_aborts_the_frame() -> anyhow::Result<()> {
    let mut system = quiet_system()?;
    let mut entities = vec![cube(1, Vec3::ZERO, Vec3::X)];
    let result = system.update(1.0 / 60.0, &mut entities, &mut Vec::new());
    assert!(matches!(result, Err(PhysicsError::NotInGrid(_))));

    Ok(())
}

#[test]
fn failed_frame_leaves_registered_bodies_untouched() -> anyhow::Result<()> {
    let mut system = quiet_system()?;
    let start = Vec3::new(2.0, 1.0, 2.0);
    let mut entities = vec![cube(1, start, Vec3::X), cube(2, Vec3::new(-9.0, 0.0, 0.0), Vec3::Z)];
    system.insert(&mut entities[0])?;
    let cell = entities[0].physics.as_ref().unwrap().colliders[0].cell();

    let result = system.update(1.0 / 60.0, &mut entities, &mut Vec::new());
    assert!(matches!(result, Err(PhysicsError::NotInGrid(_))));

    let body = entities[0].physics.as_ref().unwrap();
    assert_eq!(body.position, start);
    assert_eq!(body.velocity, Vec3::X);
    assert_eq!(body.colliders[0].center(), start);
    assert_eq!(body.colliders[0].cell(), cell);
    assert_eq!(entities[0].transform.unwrap().position, start);

    Ok(())
}

#[test]
fn duplicate_ids_abort_the_frame() -> anyhow::Result<()> {
    let mut system = quiet_system()?;
    let mut entities = vec![cube(1, Vec3::ZERO, Vec3::ZERO), cube(1, Vec3::new(9.0, 0.0, 0.0), Vec3::ZERO)];
    let result = system.update(1.0 / 60.0, &mut entities, &mut Vec::new());
    assert!(matches!(result, Err(PhysicsError::DuplicateEntity(EntityId(1)))));

    Ok(())
}
