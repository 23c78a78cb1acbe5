//! Actor: the falling, flapping entity.
//!
//! All fields are atomics so the world (collision) and renderer (drawing)
//! can read them while the physics worker writes. A flap arrives from the
//! input thread and may interleave with a physics tick; the loser's write
//! is simply overwritten on the next tick.

use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};

/// Physics constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Field height in rows.
    pub height: u16,
    /// Velocity gained per elapsed tick since the last flap.
    pub gravity: f32,
    /// Maximum downward velocity in rows per tick.
    pub max_fall_speed: f32,
    /// Rows gained by a flap.
    pub lift: u16,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            height: 50,
            gravity: 1.0,
            max_fall_speed: 25.0,
            lift: 3,
        }
    }
}

impl PhysicsConfig {
    /// Row the actor starts and hovers at.
    #[inline]
    pub const fn start_position(&self) -> u16 {
        self.height / 2
    }

    /// Lowest row.
    #[inline]
    pub const fn floor(&self) -> u16 {
        self.height.saturating_sub(1)
    }
}

/// `f32` stored as bits in an `AtomicU32`.
#[derive(Debug)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

/// The actor's shared cells.
#[derive(Debug)]
pub struct Actor {
    config: PhysicsConfig,
    position: AtomicU16,
    velocity: AtomicF32,
    ticks_since_impulse: AtomicU32,
}

impl Actor {
    /// Create an actor at its start position.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            position: AtomicU16::new(config.start_position()),
            velocity: AtomicF32::new(0.0),
            ticks_since_impulse: AtomicU32::new(0),
            config,
        }
    }

    /// Physics constants.
    #[inline]
    pub const fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Current row, always in `[0, height - 1]`.
    #[inline]
    pub fn position(&self) -> u16 {
        self.position.load(Ordering::Acquire)
    }

    /// Current downward velocity in rows per tick.
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity.load()
    }

    /// Physics ticks since the last flap.
    #[inline]
    pub fn ticks_since_impulse(&self) -> u32 {
        self.ticks_since_impulse.load(Ordering::Acquire)
    }

    /// Idle bounce while `Ready`: alternate between the start row and the row below.
    pub fn hover(&self) {
        let start = self.config.start_position();
        let next = if self.position() == start {
            start.saturating_add(1).min(self.config.floor())
        } else {
            start
        };
        self.position.store(next, Ordering::Release);
    }

    /// One `Running` tick: accelerate, then move by the whole rows of velocity.
    ///
    /// Returns the new position.
    pub fn fall(&self) -> u16 {
        let ticks = self.ticks_since_impulse.fetch_add(1, Ordering::AcqRel).saturating_add(1);

        let velocity = (self.velocity() + self.config.gravity * ticks as f32)
            .min(self.config.max_fall_speed);
        self.velocity.store(velocity);

        let position = clamp_row(
            i64::from(self.position()) + velocity.floor() as i64,
            self.config.floor(),
        );
        self.position.store(position, Ordering::Release);

        log::trace!("fall: ticks={ticks} velocity={velocity} position={position}");
        position
    }

    /// Upward impulse: zero the velocity and tick count, jump up by `lift` rows.
    pub fn flap(&self) {
        self.ticks_since_impulse.store(0, Ordering::Release);
        self.velocity.store(0.0);
        let position = self.position().saturating_sub(self.config.lift);
        self.position.store(position, Ordering::Release);
        log::debug!("flap to row {position}");
    }

    /// Back to the start row, at rest.
    pub fn reset(&self) {
        self.ticks_since_impulse.store(0, Ordering::Release);
        self.velocity.store(0.0);
        self.position.store(self.config.start_position(), Ordering::Release);
    }

    /// Place the actor on a row, clamped into the field.
    pub fn place(&self, row: u16) {
        self.position.store(row.min(self.config.floor()), Ordering::Release);
    }
}

/// Clamp a possibly out-of-range row into `[0, floor]`.
#[inline]
fn clamp_row(row: i64, floor: u16) -> u16 {
    row.clamp(0, i64::from(floor)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn actor(height: u16) -> Actor {
        Actor::new(PhysicsConfig {
            height,
            ..PhysicsConfig::default()
        })
    }

    #[test]
    fn test_starts_centered() {
        let actor = actor(50);
        assert_eq!(actor.position(), 25);
        assert_eq!(actor.velocity(), 0.0);
        assert_eq!(actor.ticks_since_impulse(), 0);
    }

    #[test]
    fn test_hover_bounces() {
        let actor = actor(50);
        actor.hover();
        assert_eq!(actor.position(), 26);
        actor.hover();
        assert_eq!(actor.position(), 25);
        actor.hover();
        assert_eq!(actor.position(), 26);
    }

    #[test]
    fn test_ten_ticks_fall_to_floor() {
        let actor = actor(50);
        let mut trajectory = Vec::new();
        for _ in 0..10 {
            trajectory.push(actor.fall());
        }

        assert_eq!(trajectory, vec![26, 29, 35, 45, 49, 49, 49, 49, 49, 49]);
        assert!(trajectory.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(actor.velocity(), 25.0);
        assert_eq!(actor.ticks_since_impulse(), 10);
    }

    #[test]
    fn test_trajectory_is_reproducible() {
        let a = actor(50);
        let b = actor(50);
        for _ in 0..7 {
            assert_eq!(a.fall(), b.fall());
        }
    }

    #[test]
    fn test_flap_resets_impulse() {
        let actor = actor(50);
        actor.fall();
        actor.fall();
        assert_eq!(actor.position(), 29);

        actor.flap();
        assert_eq!(actor.ticks_since_impulse(), 0);
        assert_eq!(actor.velocity(), 0.0);
        assert_eq!(actor.position(), 26);
    }

    #[test]
    fn test_flap_clamps_at_ceiling() {
        let actor = actor(50);
        actor.place(1);
        actor.flap();
        assert_eq!(actor.position(), 0);
        actor.flap();
        assert_eq!(actor.position(), 0);
    }

    #[test]
    fn test_reset() {
        let actor = actor(50);
        for _ in 0..4 {
            actor.fall();
        }
        actor.reset();
        assert_eq!(actor.position(), 25);
        assert_eq!(actor.velocity(), 0.0);
        assert_eq!(actor.ticks_since_impulse(), 0);
    }

    #[test]
    fn test_place_clamps() {
        let actor = actor(10);
        actor.place(200);
        assert_eq!(actor.position(), 9);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Fall,
        Flap,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![3 => Just(Op::Fall), 1 => Just(Op::Flap)]
    }

    proptest! {
        #[test]
        fn prop_position_stays_in_field(
            height in 2u16..200,
            gravity in 0.0f32..10.0,
            max_fall_speed in 0.0f32..100.0,
            lift in 0u16..20,
            ops in prop::collection::vec(op(), 0..200),
        ) {
            let actor = Actor::new(PhysicsConfig { height, gravity, max_fall_speed, lift });
            for op in ops {
                match op {
                    Op::Fall => { actor.fall(); }
                    Op::Flap => actor.flap(),
                }
                prop_assert!(actor.position() < height);
                prop_assert!(actor.velocity() <= max_fall_speed);
            }
        }

        #[test]
        fn prop_flap_always_zeroes(ticks in 0usize..50) {
            let actor = Actor::new(PhysicsConfig::default());
            for _ in 0..ticks {
                actor.fall();
            }
            actor.flap();
            prop_assert_eq!(actor.ticks_since_impulse(), 0);
            prop_assert_eq!(actor.velocity(), 0.0);
        }
    }
}
