use nalgebra::{Isometry3, Point3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::body::{validate_appearance, validate_orbit, BodyError, CircularOrbit};
use crate::math::geometry::FULL_REVOLUTION;
use crate::render::{disc, Backend, RenderError};

/// A loose rock circling the origin. Meteors have no parent and no moons, and
/// aren't drawn with an orbit path.
#[derive(Debug, Clone, PartialEq)]
pub struct Meteor {
    radius: f32,
    color: Point3<f32>,
    orbit: CircularOrbit,
}

impl Meteor {
    pub fn new(radius: f32, color: Point3<f32>, orbit: CircularOrbit) -> Result<Self, BodyError> {
        validate_appearance("meteor", radius, &color)?;
        validate_orbit("meteor", &orbit)?;
        Ok(Meteor {
            radius,
            color,
            orbit,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> Point3<f32> {
        self.color
    }

    pub fn orbit(&self) -> &CircularOrbit {
        &self.orbit
    }

    pub fn angle(&self) -> f64 {
        self.orbit.angle()
    }

    pub fn advance(&mut self, delta_tick: f64) {
        self.orbit.advance(delta_tick);
    }

    pub fn world_transform(&self) -> Isometry3<f64> {
        self.orbit.local_transform()
    }

    pub fn render_geometry(&self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        let position: Point3<f32> = nalgebra::convert(self.world_transform() * Point3::origin());
        backend.submit(disc(position, self.radius, self.color))
    }
}

/// Parameters for scattering meteors in a band around the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeltParams {
    pub count: usize,
    /// Closest a meteor may orbit.
    pub inner_distance: f64,
    /// Meteors stay strictly inside this distance.
    pub outer_distance: f64,
    pub speed: f64,
    pub radius: f32,
    pub color: [f32; 3],
}

impl Default for BeltParams {
    fn default() -> Self {
        // Between Mars and Jupiter
        BeltParams {
            count: 60,
            inner_distance: 17.0,
            outer_distance: 19.0,
            speed: 0.55,
            radius: 0.08,
            color: [0.6, 0.55, 0.5],
        }
    }
}

impl BeltParams {
    /// Draws the meteors. Distances and starting angles are picked here, once,
    /// and never change afterwards.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Vec<Meteor>, BodyError> {
        let color = Point3::from(self.color);
        let meteors = (0..self.count)
            .map(|_| {
                let distance = if self.inner_distance < self.outer_distance {
                    rng.gen_range(self.inner_distance..self.outer_distance)
                } else {
                    self.inner_distance
                };
                let angle = rng.gen_range(0.0..FULL_REVOLUTION);
                Meteor::new(
                    self.radius,
                    color,
                    CircularOrbit::new(distance, self.speed, angle),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            count = meteors.len(),
            inner = self.inner_distance,
            outer = self.outer_distance,
            "generated meteor belt"
        );
        Ok(meteors)
    }
}
