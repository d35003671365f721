use nalgebra::{Isometry3, Point3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::geometry::{polar_transform, wrap_degrees};
use crate::render::{disc, orbit_path, ring_loops, Backend, RenderError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BodyError {
    #[error("{name}: radius must be positive and finite, got {radius}")]
    InvalidRadius { name: String, radius: f32 },
    #[error("{name}: orbit distance must be non-negative and finite, got {distance}")]
    InvalidDistance { name: String, distance: f64 },
    #[error("{name}: color channels must lie in [0, 1], got {color}")]
    ColorOutOfRange { name: String, color: Point3<f32> },
    #[error("{name}: angular speed must be finite, got {speed}")]
    NonFiniteSpeed { name: String, speed: f64 },
    #[error("{name}: starting angle must be finite, got {angle}")]
    NonFiniteAngle { name: String, angle: f64 },
}

/// What sort of thing a body is. This decides how it gets drawn; the name
/// never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Star,
    RockyPlanet,
    RingedPlanet,
    Moon,
}

impl BodyKind {
    pub fn has_ring_system(self) -> bool {
        matches!(self, BodyKind::RingedPlanet)
    }
}

// All the immutable info about a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInfo {
    pub name: String,
    pub kind: BodyKind,
    pub radius: f32,
    pub color: Point3<f32>,
}

/// Uniform circular motion around the parent's origin. Angles are in degrees,
/// speed is in degrees per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    distance: f64,
    speed: f64,
    angle: f64,
}

impl CircularOrbit {
    pub fn new(distance: f64, speed: f64, angle: f64) -> Self {
        CircularOrbit {
            distance,
            speed,
            angle: wrap_degrees(angle),
        }
    }

    /// An orbit that never moves away from the parent's origin.
    pub fn fixed() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Sweeps the body along by `speed * delta_tick` degrees. Non-finite
    /// steps are ignored, so the angle always stays in [0, 360).
    pub fn advance(&mut self, delta_tick: f64) {
        if !delta_tick.is_finite() {
            return;
        }
        let mut sweep = self.speed * delta_tick;
        if !sweep.is_finite() {
            // Only the sweep modulo a revolution matters. Reducing both
            // factors first is exact for whole ticks.
            sweep = wrap_degrees(self.speed) * wrap_degrees(delta_tick);
        }
        self.angle = wrap_degrees(self.angle + sweep);
    }

    /// Transform from the body's own frame to its parent's frame.
    pub fn local_transform(&self) -> Isometry3<f64> {
        polar_transform(self.angle, self.distance)
    }

    fn validate(&self, name: &str) -> Result<(), BodyError> {
        if !(self.distance.is_finite() && self.distance >= 0.0) {
            return Err(BodyError::InvalidDistance {
                name: name.to_owned(),
                distance: self.distance,
            });
        }
        if !self.speed.is_finite() {
            return Err(BodyError::NonFiniteSpeed {
                name: name.to_owned(),
                speed: self.speed,
            });
        }
        if !self.angle.is_finite() {
            return Err(BodyError::NonFiniteAngle {
                name: name.to_owned(),
                angle: self.angle,
            });
        }
        Ok(())
    }
}

pub(super) fn validate_appearance(
    name: &str,
    radius: f32,
    color: &Point3<f32>,
) -> Result<(), BodyError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(BodyError::InvalidRadius {
            name: name.to_owned(),
            radius,
        });
    }
    if !color.iter().all(|c| (0.0..=1.0).contains(c)) {
        return Err(BodyError::ColorOutOfRange {
            name: name.to_owned(),
            color: *color,
        });
    }
    Ok(())
}

pub(super) fn validate_orbit(name: &str, orbit: &CircularOrbit) -> Result<(), BodyError> {
    orbit.validate(name)
}

/// A star, planet or moon. Children (moons) orbit this body's current
/// position instead of the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingBody {
    info: BodyInfo,
    orbit: CircularOrbit,
    children: Vec<OrbitingBody>,
}

impl OrbitingBody {
    pub fn new(info: BodyInfo, orbit: CircularOrbit) -> Result<Self, BodyError> {
        validate_appearance(&info.name, info.radius, &info.color)?;
        validate_orbit(&info.name, &orbit)?;

        Ok(OrbitingBody {
            info,
            orbit,
            children: vec![],
        })
    }

    pub fn with_child(mut self, child: OrbitingBody) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: OrbitingBody) {
        self.children.push(child);
    }

    pub fn info(&self) -> &BodyInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn kind(&self) -> BodyKind {
        self.info.kind
    }

    pub fn orbit(&self) -> &CircularOrbit {
        &self.orbit
    }

    pub fn angle(&self) -> f64 {
        self.orbit.angle()
    }

    pub fn children(&self) -> &[OrbitingBody] {
        &self.children
    }

    pub(super) fn children_mut(&mut self) -> &mut [OrbitingBody] {
        &mut self.children
    }

    /// Moves this body (and only this body) along its orbit.
    pub fn advance(&mut self, delta_tick: f64) {
        self.orbit.advance(delta_tick);
    }

    pub fn world_transform(&self, parent: &Isometry3<f64>) -> Isometry3<f64> {
        parent * self.orbit.local_transform()
    }

    /// Emits this body's own geometry: the orbit path around the parent, the
    /// body itself, and its ring system if it has one. Children are left to
    /// the caller.
    pub fn render_geometry(
        &self,
        parent: &Isometry3<f64>,
        backend: &mut dyn Backend,
    ) -> Result<(), RenderError> {
        let parent_f32: Isometry3<f32> = nalgebra::convert(*parent);
        let world: Isometry3<f32> = nalgebra::convert(self.world_transform(parent));
        let center = world * Point3::origin();

        backend.submit(orbit_path(parent_f32, self.orbit.distance() as f32))?;
        backend.submit(disc(center, self.info.radius, self.info.color))?;

        if self.info.kind.has_ring_system() {
            for ring in ring_loops(center, self.info.radius, self.info.color) {
                backend.submit(ring)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::render::{DrawList, Topology};

    fn planet(kind: BodyKind, distance: f64, speed: f64) -> OrbitingBody {
        let info = BodyInfo {
            name: String::from("Test"),
            kind,
            radius: 1.0,
            color: Point3::new(0.2, 0.4, 0.6),
        };
        OrbitingBody::new(info, CircularOrbit::new(distance, speed, 0.0)).unwrap()
    }

    #[test]
    fn test_advance_wraps() {
        let mut body = planet(BodyKind::RockyPlanet, 10.0, 7.0);
        for n in 1..=1000 {
            body.advance(1.0);
            let expected = (7.0 * n as f64) % 360.0;
            let diff = (body.angle() - expected).abs();
            assert!(diff < 1e-9 || (360.0 - diff) < 1e-9);
            assert!((0.0..360.0).contains(&body.angle()));
        }

        // Backwards works too
        let mut body = planet(BodyKind::RockyPlanet, 10.0, -45.0);
        body.advance(1.0);
        assert_relative_eq!(body.angle(), 315.0);
    }

    #[test]
    fn test_zero_tick_is_noop() {
        let mut body = planet(BodyKind::RockyPlanet, 10.0, 3.5);
        body.advance(1.0);
        let before = body.angle();
        body.advance(0.0);
        assert_eq!(body.angle(), before);
    }

    #[test]
    fn test_world_transform() {
        let body = planet(BodyKind::RockyPlanet, 10.0, 1.0);
        let position = body.world_transform(&Isometry3::identity()) * Point3::origin();
        assert_relative_eq!(position, Point3::new(10.0, 0.0, 0.0));

        let parent = polar_transform(90.0, 10.0);
        let moon = planet(BodyKind::Moon, 2.0, 1.0);
        let position = moon.world_transform(&parent) * Point3::origin();
        assert_relative_eq!(position, Point3::new(0.0, 12.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_ring_system() {
        let mut plain = DrawList::new();
        planet(BodyKind::RockyPlanet, 10.0, 1.0)
            .render_geometry(&Isometry3::identity(), &mut plain)
            .unwrap();
        assert_eq!(plain.count(Topology::LineLoop), 1);
        assert_eq!(plain.count(Topology::TriangleFan), 1);

        let mut ringed = DrawList::new();
        planet(BodyKind::RingedPlanet, 10.0, 1.0)
            .render_geometry(&Isometry3::identity(), &mut ringed)
            .unwrap();
        assert_eq!(ringed.count(Topology::LineLoop), 3);
        assert_eq!(ringed.count(Topology::TriangleFan), 1);
        assert_eq!(ringed.len(), plain.len() + 2);
    }

    #[test]
    fn test_validation() {
        let good = BodyInfo {
            name: String::from("Rock"),
            kind: BodyKind::RockyPlanet,
            radius: 0.5,
            color: Point3::new(1.0, 1.0, 1.0),
        };

        let bad_radius = BodyInfo {
            radius: 0.0,
            ..good.clone()
        };
        assert!(matches!(
            OrbitingBody::new(bad_radius, CircularOrbit::fixed()),
            Err(BodyError::InvalidRadius { .. })
        ));

        let bad_color = BodyInfo {
            color: Point3::new(1.5, 0.0, 0.0),
            ..good.clone()
        };
        assert!(matches!(
            OrbitingBody::new(bad_color, CircularOrbit::fixed()),
            Err(BodyError::ColorOutOfRange { .. })
        ));

        assert!(matches!(
            OrbitingBody::new(good.clone(), CircularOrbit::new(-1.0, 0.0, 0.0)),
            Err(BodyError::InvalidDistance { .. })
        ));
        assert!(matches!(
            OrbitingBody::new(good.clone(), CircularOrbit::new(1.0, f64::INFINITY, 0.0)),
            Err(BodyError::NonFiniteSpeed { .. })
        ));
        assert!(matches!(
            OrbitingBody::new(good.clone(), CircularOrbit::new(1.0, 0.0, f64::NAN)),
            Err(BodyError::NonFiniteAngle { .. })
        ));
        assert!(matches!(
            OrbitingBody::new(good.clone(), CircularOrbit::new(1.0, 0.0, f64::INFINITY)),
            Err(BodyError::NonFiniteAngle { .. })
        ));

        let body = OrbitingBody::new(good, CircularOrbit::fixed()).unwrap();
        assert_eq!(body.info().radius, 0.5);
        assert_eq!(body.info().color, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_huge_speed_stays_on_circle() {
        let mut body = planet(BodyKind::RockyPlanet, 10.0, 1.0e308);
        body.advance(2.0);

        let angle = body.angle();
        assert!((0.0..360.0).contains(&angle));
        assert_eq!(angle, wrap_degrees(2.0 * wrap_degrees(1.0e308)));

        let mut list = DrawList::new();
        body.render_geometry(&Isometry3::identity(), &mut list).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_non_finite_tick_is_ignored() {
        let mut body = planet(BodyKind::RockyPlanet, 10.0, 3.0);
        body.advance(1.0);
        body.advance(f64::NAN);
        body.advance(f64::INFINITY);
        assert_eq!(body.angle(), 3.0);
    }
}
