//! Compositor hot-path benchmark: flatten + sort + paint for a
//! plausibly busy room (pet, furniture, a fan of child icons).
//!
//! Run with: `cargo bench --package burrow_engine`

#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use burrow_engine::{render_room, Entity, EntityFlags, EntityKind, SceneTree};
use burrow_sprite::{Pixel, Rgb, SpriteMatrix};

fn busy_room() -> (SceneTree, Vec<burrow_engine::EntityId>) {
    let mut scene = SceneTree::new();
    let mut roots = Vec::new();

    let tile = Arc::new(SpriteMatrix::filled(16, 16, Pixel::Solid(Rgb::hex(0x8b5a2b))).unwrap());
    let small = Arc::new(SpriteMatrix::filled(6, 6, Pixel::Solid(Rgb::hex(0x6266d1))).unwrap());

    for i in 0..12 {
        roots.push(scene.insert(
            Entity::new(EntityKind::Image)
                .with_frames(vec![Arc::clone(&tile)])
                .at((i % 6) * 20, (i / 6) * 40)
                .with_z(i),
        ));
    }

    // A parent with a fan of offset children.
    let parent = scene.insert(
        Entity::new(EntityKind::Image)
            .with_frames(vec![Arc::clone(&tile)])
            .at(30, 70)
            .with_z(20)
            .with_flags(EntityFlags::none().with(EntityFlags::RENDER_CHILDREN)),
    );
    for i in 0..24 {
        scene
            .add_child(
                parent,
                Entity::new(EntityKind::Image)
                    .with_frames(vec![Arc::clone(&small)])
                    .at((i % 8) * 8, (i / 8) * 8)
                    .with_z(21 + i),
            )
            .unwrap();
    }
    roots.push(parent);

    (scene, roots)
}

fn bench_render_room(c: &mut Criterion) {
    let (scene, roots) = busy_room();
    c.bench_function("render_room_128", |b| {
        b.iter(|| black_box(render_room(&scene, &roots, 128, 128)));
    });
}

criterion_group!(benches, bench_render_room);
criterion_main!(benches);
