//! Golden path: build a den, feed the pet, print the screen.
//!
//! Runs headless — the "host" here is a terminal blit that draws
//! solid cells as `#` and transparent cells as `.`.

use std::sync::Arc;

use burrow_engine::{
    AnimationStateMachine, Engine, EngineConfig, Entity, EntityKind, Room, StateTable,
};
use burrow_sprite::{Pixel, Rgb, SpriteMatrix};

fn main() {
    let config = EngineConfig::default();
    let mut engine = Engine::new(config);
    engine.resize(640.0, 640.0);

    // "Decode" a two-frame 8x8 pet sheet in place of the real asset
    // pipeline.
    let fur = Pixel::Solid(Rgb::hex(0x8b5a2b));
    let blink = Pixel::Solid(Rgb::hex(0x5a3a1b));
    let mut rows = vec![Vec::new(); 8];
    for pixel in [fur, blink] {
        for row in &mut rows {
            row.extend(std::iter::repeat(pixel).take(8));
        }
    }
    engine.preload(vec![(
        "pet".to_owned(),
        SpriteMatrix::from_rows(rows).expect("pet sheet"),
    )]);

    let frames = engine.catalog().sprites("pet", 8, 8);
    let table = Arc::new(
        StateTable::from_json(
            r#"{
                "states": {"default": [0], "blink": [0, 1, 0]},
                "groups": {"fidget": [
                    {"state": "blink", "weight": 1},
                    {"state": "default", "weight": 3}
                ]}
            }"#,
            frames.len(),
        )
        .expect("pet state table"),
    );
    let anim = AnimationStateMachine::starting_in(table, "fidget", engine.session.rng_mut());

    let spring = engine.config().spring;
    let pet = engine.session.scene.insert(
        Entity::new(EntityKind::Character { accessory: None })
            .with_frames(frames)
            .with_spring(spring)
            .at(2, 2)
            .with_z(1),
    );
    engine.session.scene.entity_mut(pet).expect("pet").anim = anim;
    engine
        .session
        .scene
        .entity_mut(pet)
        .expect("pet")
        .motion
        .start_moving_to(16, 6);

    let mut room = Room::new("den");
    room.add_entity(pet);
    engine.add_room(room);
    engine.switch_room("den").expect("den exists");

    for tick in 0..32 {
        let buffer = engine.tick();
        if tick % 8 == 0 {
            println!("tick {tick}:");
            for row in buffer.rows().take(16) {
                let line: String = row
                    .iter()
                    .take(32)
                    .map(|p| if p.is_clear() { '.' } else { '#' })
                    .collect();
                println!("  {line}");
            }
        }
    }

    let at = engine.session.scene.entity(pet).map(|e| (e.x, e.y));
    println!("pet settled at {at:?}");
}
