//! Render worker: draws terrain and actor at the frame rate.
//!
//! Drawing reads the terrain and actor cells without synchronisation, so a
//! frame can show a half-scrolled row. The next frame corrects it.

use std::sync::Arc;
use std::time::Duration;

use super::ticker::Cadence;
use crate::buffer::Style;
use crate::game::{Actor, Sprite, Terrain};
use crate::state::{GameState, SharedState};
use crate::terminal::Surface;

/// Composes one frame from the shared game cells.
#[derive(Debug)]
pub struct Renderer {
    state: Arc<SharedState>,
    terrain: Arc<Terrain>,
    actor: Arc<Actor>,
    sprite: Sprite,
    width: u16,
    height: u16,
    entity_column: u16,
}

impl Renderer {
    /// Create a renderer for a `width` x `height` viewport.
    pub fn new(
        state: Arc<SharedState>,
        terrain: Arc<Terrain>,
        actor: Arc<Actor>,
        sprite: Sprite,
        (width, height): (u16, u16),
        entity_column: u16,
    ) -> Self {
        Self {
            state,
            terrain,
            actor,
            sprite,
            width,
            height,
            entity_column,
        }
    }

    /// Draw the visible terrain and the actor, then refresh.
    pub fn draw_frame<S: Surface>(&self, surface: &mut S) -> crate::Result<()> {
        surface.clear();

        let columns = 0..usize::from(self.width);
        for row in 0..self.height {
            let text = self.terrain.row_text(usize::from(row), columns.clone());
            surface.draw(row, 0, &text, Style::BOLD);
        }

        let position = self.actor.position();
        let dead = self.state.get() == GameState::Dead;
        if position >= 1 {
            surface.draw(
                position - 1,
                self.entity_column,
                self.sprite.head_for(dead),
                Style::BOLD,
            );
        }
        surface.draw(position, self.entity_column, self.sprite.body, Style::BOLD);

        surface.refresh()?;
        Ok(())
    }
}

/// Runs a [`Renderer`] against a surface on the frame cadence.
pub struct RenderWorker<S> {
    renderer: Renderer,
    surface: S,
    interval: Duration,
}

impl<S: Surface> RenderWorker<S> {
    /// Create a worker drawing every `interval`.
    pub const fn new(renderer: Renderer, surface: S, interval: Duration) -> Self {
        Self {
            renderer,
            surface,
            interval,
        }
    }

    /// Draw until the game exits. A surface error ends the loop.
    pub fn run(mut self) -> crate::Result<()> {
        let mut cadence = Cadence::new(self.interval);
        while !self.renderer.state.is_exit() {
            self.renderer.draw_frame(&mut self.surface)?;
            cadence.wait();
        }
        log::debug!("renderer stopped after {} frames", cadence.ticks());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{PhysicsConfig, Tile};
    use crate::terminal::FrameSurface;
    use std::io;

    struct Fixture {
        state: Arc<SharedState>,
        terrain: Arc<Terrain>,
        actor: Arc<Actor>,
        renderer: Renderer,
    }

    fn fixture() -> Fixture {
        let state = Arc::new(SharedState::new());
        let terrain = Arc::new(Terrain::new(100, 50));
        let actor = Arc::new(Actor::new(PhysicsConfig::default()));
        let renderer = Renderer::new(
            Arc::clone(&state),
            Arc::clone(&terrain),
            Arc::clone(&actor),
            Sprite::default(),
            (80, 50),
            40,
        );
        Fixture {
            state,
            terrain,
            actor,
            renderer,
        }
    }

    fn surface() -> FrameSurface<Vec<u8>> {
        FrameSurface::new(Vec::new(), 80, 50, (0, 0))
    }

    #[test]
    fn test_draws_actor_at_entity_column() {
        let f = fixture();
        let mut surface = surface();
        f.renderer.draw_frame(&mut surface).unwrap();

        let head = surface.front().row_text(24);
        let body = surface.front().row_text(25);
        assert_eq!(&head[40..45], "__(o>");
        assert_eq!(&body[40..44], "\\__/");
        assert!(surface.front().get(40, 25).unwrap().style().contains(Style::BOLD));
    }

    #[test]
    fn test_dead_head_glyph() {
        let f = fixture();
        f.state.start();
        f.state.die();
        let mut surface = surface();
        f.renderer.draw_frame(&mut surface).unwrap();
        assert_eq!(&surface.front().row_text(24)[40..45], "__(x>");
    }

    #[test]
    fn test_draws_visible_terrain_only() {
        let f = fixture();
        f.terrain.set(3, 0, Tile::Obstacle);
        f.terrain.set(3, 79, Tile::Obstacle);
        f.terrain.set(3, 80, Tile::Obstacle);
        let mut surface = surface();
        f.renderer.draw_frame(&mut surface).unwrap();

        let row = surface.front().row_text(3);
        assert_eq!(row.chars().count(), 80);
        assert!(row.starts_with('#'));
        assert!(row.ends_with('#'));
        assert_eq!(row.matches('#').count(), 2);
    }

    #[test]
    fn test_head_clipped_at_top_row() {
        let f = fixture();
        f.actor.place(0);
        let mut surface = surface();
        f.renderer.draw_frame(&mut surface).unwrap();
        assert_eq!(&surface.front().row_text(0)[40..44], "\\__/");
        assert!(!surface.front().row_text(0).contains('('));
    }

    #[test]
    fn test_actor_move_redraws() {
        let f = fixture();
        let mut surface = surface();
        f.renderer.draw_frame(&mut surface).unwrap();
        f.actor.place(30);
        f.renderer.draw_frame(&mut surface).unwrap();

        assert_eq!(surface.front().row_text(25).trim(), "");
        assert_eq!(&surface.front().row_text(30)[40..44], "\\__/");
        assert_eq!(surface.frames(), 2);
    }

    struct Broken;

    impl Surface for Broken {
        fn clear(&mut self) {}
        fn draw(&mut self, _: u16, _: u16, _: &str, _: Style) {}
        fn refresh(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn test_surface_error_is_fatal() {
        let f = fixture();
        let worker = RenderWorker::new(f.renderer, Broken, Duration::from_millis(1));
        assert!(matches!(worker.run(), Err(crate::Error::Io(_))));
        assert!(!f.state.is_exit());
    }
}
