//! Background stars.
//!
//! The field is scattered once when the scene is built and then drawn exactly
//! the same way every frame. Re-rolling it per frame makes the sky flicker.

use nalgebra::Point3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::render::{Backend, Primitive, RenderError, Topology};

/// Largest usable `bound`. rand needs the width of the sampling range,
/// stretched slightly, to stay finite.
pub const MAX_BOUND: f32 = f32::MAX / 4.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StarFieldError {
    #[error("bound must be positive and at most {max}, got {bound}")]
    InvalidBound { bound: f32, max: f32 },
    #[error("brightness range [{min}, {max}] must be an ordered range inside [0, 1]")]
    InvalidBrightness { min: f32, max: f32 },
}

/// A single fixed point of light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Point3<f32>,
    pub color: Point3<f32>,
}

/// How star colors are picked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StarColors {
    /// Every channel uniform in [0, 1].
    Rainbow,
    /// Shades of gray, with brightness uniform in `[min, max]`.
    Grayscale { min: f32, max: f32 },
}

impl Default for StarColors {
    fn default() -> Self {
        StarColors::Rainbow
    }
}

impl StarColors {
    fn sample<R: Rng>(&self, rng: &mut R) -> Point3<f32> {
        match *self {
            StarColors::Rainbow => Point3::new(rng.gen(), rng.gen(), rng.gen()),
            StarColors::Grayscale { min, max } => {
                let b = if min < max {
                    rng.gen_range(min..=max)
                } else {
                    min
                };
                Point3::new(b, b, b)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarFieldParams {
    pub count: usize,
    /// Stars are placed in the cube [-bound, bound]^3.
    pub bound: f32,
    pub colors: StarColors,
}

impl Default for StarFieldParams {
    fn default() -> Self {
        StarFieldParams {
            count: 200,
            bound: 40.0,
            colors: StarColors::Rainbow,
        }
    }
}

impl StarFieldParams {
    /// An empty field may have any bound; otherwise it has to be something
    /// rand can sample from.
    pub fn validate(&self) -> Result<(), StarFieldError> {
        if self.count > 0 && !(self.bound > 0.0 && self.bound <= MAX_BOUND) {
            return Err(StarFieldError::InvalidBound {
                bound: self.bound,
                max: MAX_BOUND,
            });
        }
        if let StarColors::Grayscale { min, max } = self.colors {
            if !(0.0 <= min && min <= max && max <= 1.0) {
                return Err(StarFieldError::InvalidBrightness { min, max });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarField {
    stars: Vec<Star>,
}

impl StarField {
    pub fn generate<R: Rng>(params: &StarFieldParams, rng: &mut R) -> Result<Self, StarFieldError> {
        params.validate()?;

        let bound = params.bound;
        let mut stars = Vec::with_capacity(params.count);
        for _ in 0..params.count {
            let x = rng.gen_range(-bound..=bound);
            let y = rng.gen_range(-bound..=bound);
            let z = rng.gen_range(-bound..=bound);
            let color = params.colors.sample(rng);
            stars.push(Star {
                position: Point3::new(x, y, z),
                color,
            });
        }

        debug!(count = stars.len(), bound, "generated star field");
        Ok(StarField { stars })
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// One point per star.
    pub fn render(&self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        for star in self.stars.iter() {
            backend.submit(Primitive::new(
                Topology::Points,
                star.color,
                std::iter::once(star.position),
            ))?;
        }
        Ok(())
    }
}
