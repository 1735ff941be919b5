use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Quat, Vec3};
use physics::{
    box_inertia, Collider, ColliderBuilder, DynamicType, Entity, EntityId, PhysicsConfig,
    PhysicsSystem, RigidBody,
};

fn scene(columns: u32) -> (PhysicsSystem, Vec<Entity>) {
    let config = PhysicsConfig { debug_draw: false, ..PhysicsConfig::default() };
    let mut system = PhysicsSystem::new(config).unwrap();

    let floor = ColliderBuilder::build(
        EntityId(1),
        DynamicType::Static,
        &[
            Vec3::new(-35.0, 0.0, -35.0),
            Vec3::new(0.0, 0.0, 35.0),
            Vec3::new(35.0, 0.0, -35.0),
        ],
    )
    .unwrap();
    let mut entities = vec![Entity::with_body(
        EntityId(1),
        RigidBody::new_static(Vec3::ZERO, Quat::IDENTITY).with_collider(floor),
    )];

    let half = Vec3::splat(0.5);
    let mut id = 2;
    for x in 0..columns {
        for z in 0..columns {
            for y in 0..4 {
                let position = Vec3::new(
                    x as f32 * 3.0 - 15.0,
                    0.5 + y as f32 * 1.1,
                    z as f32 * 3.0 - 20.0,
                );
                let inertia = box_inertia(1.0, half);
                let collider =
                    Collider::new_box(EntityId(id), DynamicType::Dynamic, position, half);
                let body = RigidBody::new_dynamic(1.0, position, Quat::IDENTITY, inertia)
                    .with_collider(collider);
                entities.push(Entity::with_body(EntityId(id), body));
                id += 1;
            }
        }
    }

    for entity in &mut entities {
        system.insert(entity).unwrap();
    }
    (system, entities)
}

fn bench_box_stacks(c: &mut Criterion) {
    let (mut system, mut entities) = scene(8);
    let mut messages = Vec::new();
    c.bench_function("box_stacks_step", |b| {
        b.iter(|| {
            for entity in &mut entities {
                if let Some(body) = entity.physics.as_mut() {
                    if let Some(mass) = body.mass() {
                        body.apply_force(Vec3::new(0.0, -9.81 * mass, 0.0));
                    }
                }
            }
            black_box(system.update(1.0 / 60.0, &mut entities, &mut messages).unwrap());
        });
    });
}

criterion_group!(benches, bench_box_stacks);
criterion_main!(benches);
