//! Visual state derived from the phase flags.
//!
//! Nothing here is stored: a renderer calls `VisualState::derive` whenever
//! the flags change (or once per frame) and animates each property towards
//! the derived value with the motion profile of the step that changed it.

use super::phase::AnimationPhaseState;
use crate::geometry::{ring_shape, Path, Point, Rect, Size};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Point size of the heart icon.
pub const ICON_SIZE: f32 = 46.0;
/// Frame of the background disc before scaling.
pub const DISC_FRAME: Size = Size::new(50.0, 50.0);
/// Scale of the background disc once expanded.
pub const DISC_EXPANDED_SCALE: f32 = 2.2;
/// Radius of the ring cutout once revealed.
pub const RING_TARGET_RADIUS: f32 = 29.0;
/// Particles per ring.
pub const PARTICLES_PER_RING: usize = 6;
/// Angle between neighbouring particles, in degrees.
pub const PARTICLE_SPACING_DEGREES: f32 = 60.0;

/// Colours a particle may take.
pub const PALETTE: [Color; 5] = [
    Color::Red,
    Color::Purple,
    Color::Green,
    Color::Yellow,
    Color::Pink,
];

/// Geometry of one particle ring: particle diameter, then offset from the
/// centre before and after the burst.
struct RingSpec {
    diameter: f32,
    resting_offset: f32,
    burst_offset: f32,
}

const PARTICLE_RINGS: [RingSpec; 2] = [
    RingSpec {
        diameter: 12.0,
        resting_offset: 40.0,
        burst_offset: 80.0,
    },
    RingSpec {
        diameter: 8.0,
        resting_offset: 24.0,
        burst_offset: 64.0,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Purple,
    Green,
    Yellow,
    Pink,
    Gray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconGlyph {
    Outline,
    Filled,
}

impl IconGlyph {
    /// The system symbol name of the glyph.
    pub fn symbol_name(self) -> &'static str {
        match self {
            IconGlyph::Outline => "suit.heart",
            IconGlyph::Filled => "suit.heart.fill",
        }
    }
}

/// Supplies particle colours.
///
/// Colours carry no stability guarantee across derivations. Tests stub this
/// with a closure.
pub trait ColorSource {
    fn next_color(&mut self) -> Color;
}

impl<F: FnMut() -> Color> ColorSource for F {
    fn next_color(&mut self) -> Color {
        self()
    }
}

/// Draws colours uniformly from `PALETTE`.
#[derive(Debug, Clone)]
pub struct PaletteColors {
    rng: Pcg32,
}

impl PaletteColors {
    /// A reproducible source for `seed`, or an entropy-seeded one for `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_os_rng(),
        };
        Self { rng }
    }
}

impl ColorSource for PaletteColors {
    fn next_color(&mut self) -> Color {
        PALETTE[self.rng.random_range(0..PALETTE.len())]
    }
}

/// One firework particle, positioned relative to the icon centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub diameter: f32,
    pub angle_degrees: f32,
    pub color: Color,
}

/// Every property the renderer needs for one button.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualState {
    pub icon_glyph: IconGlyph,
    pub icon_color: Color,
    pub icon_scale: f32,
    pub icon_opacity: f32,
    /// Opacity of the disc and particle layer.
    pub background_opacity: f32,
    pub disc_scale: f32,
    pub ring_radius: f32,
    pub particles: Vec<Particle>,
}

impl VisualState {
    pub fn derive(state: &AnimationPhaseState, colors: &mut impl ColorSource) -> Self {
        let revealed = state.ring_revealed();
        let ended = state.sequence_ended();

        let particles = PARTICLE_RINGS
            .iter()
            .flat_map(|ring| {
                let offset = if state.firework_fired() {
                    ring.burst_offset
                } else {
                    ring.resting_offset
                };
                (1..=PARTICLES_PER_RING).map(move |index| (ring.diameter, offset, index))
            })
            .map(|(diameter, offset, index)| {
                let angle_degrees = index as f32 * PARTICLE_SPACING_DEGREES;
                Particle {
                    position: Point::default().offset_polar(offset, angle_degrees.to_radians()),
                    diameter,
                    angle_degrees,
                    color: colors.next_color(),
                }
            })
            .collect();

        Self {
            icon_glyph: if revealed {
                IconGlyph::Filled
            } else {
                IconGlyph::Outline
            },
            icon_color: if revealed { Color::Red } else { Color::Gray },
            icon_scale: if state.started() && !revealed { 0.0 } else { 1.0 },
            icon_opacity: if ended { 0.0 } else { 1.0 },
            background_opacity: if revealed && !ended { 1.0 } else { 0.0 },
            disc_scale: if state.background_expanded() {
                DISC_EXPANDED_SCALE
            } else {
                0.0
            },
            ring_radius: if revealed { RING_TARGET_RADIUS } else { 0.0 },
            particles,
        }
    }

    /// The disc's ring shape at the current cutout radius, before scaling.
    pub fn ring_path(&self) -> Path {
        ring_shape(Rect::from_size(DISC_FRAME), self.ring_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::phase::Phase;

    fn state_at(phase: Phase) -> AnimationPhaseState {
        let mut state = AnimationPhaseState::new(false);
        let mut current = Phase::Idle;
        while current < phase {
            let Some(next) = current.next() else { break };
            state.advance_to(next);
            current = next;
        }
        state
    }

    fn derive(phase: Phase) -> VisualState {
        VisualState::derive(&state_at(phase), &mut || Color::Green)
    }

    #[test]
    fn test_idle_visuals() {
        let visual = derive(Phase::Idle);
        assert_eq!(visual.icon_glyph, IconGlyph::Outline);
        assert_eq!(visual.icon_color, Color::Gray);
        assert_eq!(visual.icon_scale, 1.0);
        assert_eq!(visual.icon_opacity, 1.0);
        assert_eq!(visual.background_opacity, 0.0);
        assert_eq!(visual.disc_scale, 0.0);
        assert_eq!(visual.ring_radius, 0.0);
    }

    #[test]
    fn test_started_collapses_icon() {
        let visual = derive(Phase::Started);
        assert_eq!(visual.icon_scale, 0.0);
        assert_eq!(visual.icon_opacity, 1.0);
        assert_eq!(derive(Phase::BackgroundExpanded).disc_scale, DISC_EXPANDED_SCALE);
    }

    #[test]
    fn test_ring_revealed_fills_icon() {
        let visual = derive(Phase::RingRevealed);
        assert_eq!(visual.icon_glyph, IconGlyph::Filled);
        assert_eq!(visual.icon_glyph.symbol_name(), "suit.heart.fill");
        assert_eq!(visual.icon_color, Color::Red);
        assert_eq!(visual.icon_scale, 1.0);
        assert_eq!(visual.background_opacity, 1.0);
        assert_eq!(visual.ring_radius, RING_TARGET_RADIUS);
    }

    #[test]
    fn test_sequence_end_hides_layers() {
        for phase in [Phase::SequenceEnded, Phase::ReadyToReset] {
            let visual = derive(phase);
            assert_eq!(visual.icon_opacity, 0.0);
            assert_eq!(visual.background_opacity, 0.0);
            assert_eq!(visual.icon_glyph, IconGlyph::Filled);
        }
    }

    #[test]
    fn test_particle_layout() {
        let resting = derive(Phase::BackgroundExpanded);
        let burst = derive(Phase::RingRevealed);
        assert_eq!(resting.particles.len(), 12);
        assert_eq!(burst.particles.len(), 12);

        let distance = |p: &Particle| (p.position.x.powi(2) + p.position.y.powi(2)).sqrt();
        let expected_resting = [40.0, 24.0];
        let expected_burst = [80.0, 64.0];
        for (ring, chunk) in resting.particles.chunks(PARTICLES_PER_RING).enumerate() {
            for (i, particle) in chunk.iter().enumerate() {
                assert!((distance(particle) - expected_resting[ring]).abs() < 1e-3);
                assert_eq!(particle.angle_degrees, (i + 1) as f32 * 60.0);
            }
        }
        for (ring, chunk) in burst.particles.chunks(PARTICLES_PER_RING).enumerate() {
            for particle in chunk {
                assert!((distance(particle) - expected_burst[ring]).abs() < 1e-3);
            }
        }
        assert_eq!(burst.particles[0].diameter, 12.0);
        assert_eq!(burst.particles[6].diameter, 8.0);
    }

    #[test]
    fn test_seeded_palette_is_reproducible() {
        let state = state_at(Phase::RingRevealed);
        let a = VisualState::derive(&state, &mut PaletteColors::new(Some(7)));
        let b = VisualState::derive(&state, &mut PaletteColors::new(Some(7)));
        assert_eq!(a, b);
        assert!(a.particles.iter().all(|p| PALETTE.contains(&p.color)));
    }

    #[test]
    fn test_ring_path_follows_radius() {
        let path = derive(Phase::RingRevealed).ring_path();
        assert_eq!(path.subpaths().len(), 2);
        assert!(!path.contains(Point::new(25.5, 24.0), crate::geometry::FillRule::EvenOdd));
        let idle = derive(Phase::Idle).ring_path();
        assert!(idle.contains(Point::new(25.5, 24.0), crate::geometry::FillRule::EvenOdd));
    }
}
