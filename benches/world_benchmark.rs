//! World and frame benchmarks.
//!
//! The world worker must scroll well inside its 80ms tick and the renderer
//! must diff and draw an 80x50 frame well inside 33ms.

use std::sync::Arc;

use clappy::buffer::diff::{render_diff, render_full, DiffState};
use clappy::{
    Actor, Frame, FrameSurface, GameState, PhysicsConfig, SharedState, Sprite, Style, World,
    WorldConfig,
};
use clappy::worker::Renderer;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn world_scroll(c: &mut Criterion) {
    let mut world = World::new(WorldConfig::default(), Sprite::default().hitbox(), 42);

    c.bench_function("world_scroll_100x50", |b| {
        b.iter(|| {
            world.scroll();
            black_box(world.collides(25))
        });
    });
}

fn world_step_running(c: &mut Criterion) {
    let state = SharedState::new();
    state.start();
    let actor = Actor::new(PhysicsConfig::default());
    let mut world = World::new(WorldConfig::default(), Sprite::default().hitbox(), 42);

    c.bench_function("world_step_running", |b| {
        b.iter(|| {
            if state.get() == GameState::Dead {
                state.restart();
                state.start();
            }
            black_box(world.step(&state, &actor))
        });
    });
}

fn terrain_frame(seed: u64, ticks: usize) -> Frame {
    let mut world = World::new(WorldConfig::default(), Sprite::default().hitbox(), seed);
    for _ in 0..ticks {
        world.scroll();
    }
    let mut frame = Frame::new(80, 50);
    for row in 0..50u16 {
        let text = world.terrain().row_text(usize::from(row), 0..80);
        frame.draw_text(0, row, &text, Style::BOLD);
    }
    frame
}

fn diff_scrolled_frame(c: &mut Criterion) {
    let before = terrain_frame(7, 120);
    let after = terrain_frame(7, 121);

    c.bench_function("diff_80x50_one_column_scroll", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(8192);
            let mut state = DiffState::new();
            render_diff(
                black_box(&before),
                black_box(&after),
                (0, 0),
                &mut output,
                &mut state,
            )
        });
    });
}

fn full_frame(c: &mut Criterion) {
    let frame = terrain_frame(7, 120);

    c.bench_function("full_80x50", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(16384);
            let mut state = DiffState::new();
            render_full(black_box(&frame), (0, 0), &mut output, &mut state)
        });
    });
}

fn draw_frame(c: &mut Criterion) {
    let state = Arc::new(SharedState::new());
    let actor = Arc::new(Actor::new(PhysicsConfig::default()));
    let mut world = World::new(WorldConfig::default(), Sprite::default().hitbox(), 3);
    for _ in 0..120 {
        world.scroll();
    }
    let renderer = Renderer::new(
        state,
        Arc::clone(world.terrain()),
        actor,
        Sprite::default(),
        (80, 50),
        40,
    );
    let mut surface = FrameSurface::new(std::io::sink(), 80, 50, (0, 0));

    c.bench_function("draw_frame_80x50", |b| {
        b.iter(|| {
            world.scroll();
            renderer.draw_frame(&mut surface)
        });
    });
}

criterion_group!(
    benches,
    world_scroll,
    world_step_running,
    diff_scrolled_frame,
    full_frame,
    draw_frame,
);
criterion_main!(benches);
