use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sampler::Roller;

/// Number of particles in one burst.
pub const CONFETTI_PIECES: usize = 100;

/// Wall-clock lifetime of a burst. The whole batch is torn down when this
/// elapses, whether or not individual particles are still falling.
pub const CONFETTI_DURATION: Duration = Duration::from_millis(3000);

/// Particles spawn this far above the top edge.
const SPAWN_OFFSET: f32 = 10.0;

/// The seven hues of the burst, rainbow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfettiColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Violet,
}

impl ConfettiColor {
    pub const ALL: [ConfettiColor; 7] = [
        ConfettiColor::Red,
        ConfettiColor::Orange,
        ConfettiColor::Yellow,
        ConfettiColor::Green,
        ConfettiColor::Blue,
        ConfettiColor::Indigo,
        ConfettiColor::Violet,
    ];

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            ConfettiColor::Red => (0xFF, 0x00, 0x00),
            ConfettiColor::Orange => (0xFF, 0x7F, 0x00),
            ConfettiColor::Yellow => (0xFF, 0xFF, 0x00),
            ConfettiColor::Green => (0x00, 0xFF, 0x00),
            ConfettiColor::Blue => (0x00, 0x00, 0xFF),
            ConfettiColor::Indigo => (0x4B, 0x00, 0x82),
            ConfettiColor::Violet => (0x8B, 0x00, 0xFF),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub fall_speed: f32,
    pub drift: f32,
    pub color: ConfettiColor,
    pub opacity: f32,
    pub rotation_deg: f32,
    falling: bool,
}

impl Particle {
    fn spawn(viewport: Viewport, roller: &mut Roller) -> Self {
        Self {
            x: roller.range_f32(0.0, viewport.width),
            y: -SPAWN_OFFSET,
            fall_speed: roller.range_f32(2.0, 7.0),
            drift: roller.range_f32(-1.0, 1.0),
            color: ConfettiColor::ALL[roller.index(ConfettiColor::ALL.len())],
            opacity: roller.range_f32(0.0, 1.0),
            rotation_deg: roller.range_f32(0.0, 360.0),
            falling: true,
        }
    }

    pub fn is_falling(&self) -> bool {
        self.falling
    }
}

/// One burst of decorative particles, spawned when a roll completes.
///
/// The batch is clock-free: the adapter calls `advance` once per rendering
/// frame and checks `expired` against its own elapsed time, then drops the
/// batch. Particles that cross the bottom edge stop moving but stay in the
/// batch until teardown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfettiBatch {
    viewport: Viewport,
    particles: Vec<Particle>,
}

impl ConfettiBatch {
    pub fn launch(viewport: Viewport, roller: &mut Roller) -> Self {
        let particles = (0..CONFETTI_PIECES)
            .map(|_| Particle::spawn(viewport, roller))
            .collect();
        Self {
            viewport,
            particles,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn falling_count(&self) -> usize {
        self.particles.iter().filter(|p| p.falling).count()
    }

    /// One rendering-refresh tick: every particle still above the bottom
    /// edge moves by its drift and fall speed; a particle that has crossed
    /// the edge stops moving for good.
    pub fn advance(&mut self) {
        for particle in &mut self.particles {
            if !particle.falling {
                continue;
            }
            if particle.y >= self.viewport.height {
                particle.falling = false;
                continue;
            }
            particle.y += particle.fall_speed;
            particle.x += particle.drift;
        }
    }

    pub fn expired(&self, elapsed: Duration) -> bool {
        elapsed >= CONFETTI_DURATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn test_launch_spawns_exactly_100() {
        let mut roller = Roller::test_rng();
        let batch = ConfettiBatch::launch(viewport(), &mut roller);
        assert_eq!(batch.particles().len(), CONFETTI_PIECES);
        assert_eq!(batch.falling_count(), CONFETTI_PIECES);
    }

    #[test]
    fn test_spawn_attribute_ranges() {
        let mut roller = Roller::test_rng();
        let batch = ConfettiBatch::launch(viewport(), &mut roller);
        for particle in batch.particles() {
            assert!((0.0..800.0).contains(&particle.x));
            assert_eq!(particle.y, -10.0);
            assert!((2.0..7.0).contains(&particle.fall_speed));
            assert!((-1.0..1.0).contains(&particle.drift));
            assert!((0.0..1.0).contains(&particle.opacity));
            assert!((0.0..360.0).contains(&particle.rotation_deg));
        }
    }

    #[test]
    fn test_all_hues_appear() {
        let mut roller = Roller::test_rng();
        let batch = ConfettiBatch::launch(viewport(), &mut roller);
        for color in ConfettiColor::ALL {
            assert!(
                batch.particles().iter().any(|p| p.color == color),
                "{color:?} missing from a 100-piece batch"
            );
        }
    }

    #[test]
    fn test_advance_moves_falling_particles() {
        let mut roller = Roller::test_rng();
        let mut batch = ConfettiBatch::launch(viewport(), &mut roller);
        let before: Vec<(f32, f32)> = batch.particles().iter().map(|p| (p.x, p.y)).collect();
        batch.advance();
        for (particle, (x, y)) in batch.particles().iter().zip(before) {
            assert_eq!(particle.y, y + particle.fall_speed);
            assert_eq!(particle.x, x + particle.drift);
        }
    }

    #[test]
    fn test_particles_stop_past_bottom_edge() {
        let small = Viewport {
            width: 100.0,
            height: 20.0,
        };
        let mut roller = Roller::test_rng();
        let mut batch = ConfettiBatch::launch(small, &mut roller);

        // Slowest fall speed is 2.0/frame from y = -10, so every particle
        // crosses a 20-unit viewport within 16 frames and freezes on the
        // frame after.
        for _ in 0..20 {
            batch.advance();
        }
        assert_eq!(batch.falling_count(), 0);
        assert_eq!(batch.particles().len(), CONFETTI_PIECES);

        let frozen: Vec<(f32, f32)> = batch.particles().iter().map(|p| (p.x, p.y)).collect();
        batch.advance();
        let after: Vec<(f32, f32)> = batch.particles().iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(frozen, after);
    }

    #[test]
    fn test_expiry_is_unconditional() {
        let mut roller = Roller::test_rng();
        let batch = ConfettiBatch::launch(viewport(), &mut roller);
        // No particle has moved, but the clock has run out.
        assert!(!batch.expired(Duration::from_millis(2999)));
        assert!(batch.expired(Duration::from_millis(3000)));
        assert!(batch.expired(Duration::from_millis(10_000)));
    }
}
