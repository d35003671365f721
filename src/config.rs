//! Scene descriptions.
//!
//! A scene is read from a RON file whose fields all fall back to the built-in
//! solar system, so a file only needs to mention what it changes. Everything
//! is checked when the scene is built; nothing is validated per frame.

use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::model::orrery::{
    BeltParams, BodyError, BodyInfo, BodyKind, CircularOrbit, OrbitingBody, Orrery,
};
use crate::model::starfield::{StarField, StarFieldError, StarFieldParams};
use crate::model::Scene;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scene file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scene: {0}")]
    Parse(#[source] ron::error::SpannedError),
    #[error("failed to serialize scene: {0}")]
    Serialize(#[source] ron::Error),
    #[error("invalid window settings: {0}")]
    Window(String),
    #[error("invalid star field: {0}")]
    StarField(#[from] StarFieldError),
    #[error("invalid meteor belt: {0}")]
    Belt(String),
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid body: {0}")]
    Body(#[from] BodyError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Frames per second to cap at; `None` runs as fast as possible.
    pub framerate_limit: Option<u64>,
    pub point_size: f32,
    /// Ticks the simulation advances per frame.
    pub ticks_per_frame: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: String::from("The Solar System Simulation"),
            width: 1800,
            height: 700,
            // Roughly a 10ms wait between frames
            framerate_limit: Some(100),
            point_size: 4.0,
            ticks_per_frame: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub name: String,
    pub kind: BodyKind,
    pub color: [f32; 3],
    pub radius: f32,
    pub distance: f64,
    /// Degrees per tick.
    pub speed: f64,
    /// Starting angle, in degrees.
    pub angle: f64,
    pub moons: Vec<BodyConfig>,
}

impl Default for BodyConfig {
    fn default() -> Self {
        BodyConfig {
            name: String::from("Unnamed"),
            kind: BodyKind::RockyPlanet,
            color: [1.0, 1.0, 1.0],
            radius: 1.0,
            distance: 0.0,
            speed: 0.0,
            angle: 0.0,
            moons: vec![],
        }
    }
}

impl BodyConfig {
    fn new(name: &str, kind: BodyKind, color: [f32; 3], radius: f32, distance: f64, speed: f64) -> Self {
        BodyConfig {
            name: name.to_owned(),
            kind,
            color,
            radius,
            distance,
            speed,
            ..Default::default()
        }
    }

    fn with_moon(mut self, moon: BodyConfig) -> Self {
        self.moons.push(moon);
        self
    }

    /// Builds the body and all of its moons.
    pub fn build(&self) -> Result<OrbitingBody, BodyError> {
        let info = BodyInfo {
            name: self.name.clone(),
            kind: self.kind,
            radius: self.radius,
            color: Point3::from(self.color),
        };
        let orbit = CircularOrbit::new(self.distance, self.speed, self.angle);

        let mut body = OrbitingBody::new(info, orbit)?;
        for moon in self.moons.iter() {
            body.add_child(moon.build()?);
        }
        Ok(body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    /// Seed for the meteor belt and star field. Without one, every run looks
    /// different.
    pub seed: Option<u64>,
    pub bodies: Vec<BodyConfig>,
    pub belt: Option<BeltParams>,
    pub stars: StarFieldParams,
}

impl Default for SceneConfig {
    fn default() -> Self {
        use BodyKind::*;

        let bodies = vec![
            BodyConfig::new("Sun", Star, [1.0, 1.0, 0.0], 2.2, 0.0, 0.0),
            BodyConfig::new("Mercury", RockyPlanet, [0.7, 0.7, 0.7], 0.3, 4.0, 0.9),
            BodyConfig::new("Venus", RockyPlanet, [0.8, 0.5, 0.0], 0.6, 8.0, 0.8),
            BodyConfig::new("Earth", RockyPlanet, [0.0, 0.0, 1.0], 0.9, 12.0, 0.7)
                .with_moon(BodyConfig::new("Moon", Moon, [0.8, 0.8, 0.8], 0.25, 1.6, 3.0)),
            BodyConfig::new("Mars", RockyPlanet, [1.0, 0.0, 0.0], 0.45, 16.0, 0.6),
            BodyConfig::new("Jupiter", RockyPlanet, [0.9, 0.6, 0.0], 2.0, 20.0, 0.5),
            BodyConfig::new("Saturn", RingedPlanet, [1.0, 0.5, 0.0], 2.5, 24.0, 0.4),
            BodyConfig::new("Uranus", RockyPlanet, [0.0, 0.5, 0.5], 2.4, 28.0, 0.3),
            BodyConfig::new("Neptune", RockyPlanet, [0.4, 0.5, 0.5], 2.1, 32.0, 0.2),
            BodyConfig::new("Pluto", RockyPlanet, [0.5, 0.5, 0.5], 0.4, 36.0, 0.1),
        ];

        SceneConfig {
            window: WindowConfig::default(),
            seed: None,
            bodies,
            belt: Some(BeltParams::default()),
            stars: StarFieldParams::default(),
        }
    }
}

impl SceneConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_ron(&contents)
    }

    pub fn from_ron(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(ConfigError::Parse)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(ConfigError::Serialize)
    }

    /// Checks the settings that aren't covered by body validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let window = &self.window;
        if window.width == 0 || window.height == 0 {
            return Err(ConfigError::Window(format!(
                "window must have a non-zero size, got {}x{}",
                window.width, window.height
            )));
        }
        if !(window.point_size.is_finite() && window.point_size > 0.0) {
            return Err(ConfigError::Window(format!(
                "point size must be positive, got {}",
                window.point_size
            )));
        }
        if !window.ticks_per_frame.is_finite() {
            return Err(ConfigError::Window(format!(
                "ticks per frame must be finite, got {}",
                window.ticks_per_frame
            )));
        }

        self.stars.validate()?;

        if let Some(belt) = &self.belt {
            let ordered = 0.0 <= belt.inner_distance && belt.inner_distance < belt.outer_distance;
            if !(ordered && belt.outer_distance.is_finite()) {
                return Err(ConfigError::Belt(format!(
                    "distances [{}, {}) must be an ordered, non-negative range",
                    belt.inner_distance, belt.outer_distance
                )));
            }
        }
        Ok(())
    }

    pub fn make_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Builds the scene. This is the only place randomness is used: the belt
    /// and the star field are rolled here and never again.
    pub fn build(&self) -> Result<Scene, SceneError> {
        self.validate()?;
        let mut rng = self.make_rng();

        let mut orrery = Orrery::new();
        for body in self.bodies.iter() {
            orrery.add_body(body.build()?);
        }
        if let Some(belt) = &self.belt {
            for meteor in belt.generate(&mut rng)? {
                orrery.add_meteor(meteor);
            }
        }
        let stars = StarField::generate(&self.stars, &mut rng).map_err(ConfigError::from)?;

        info!(
            bodies = orrery.body_count(),
            meteors = orrery.meteors().len(),
            stars = stars.len(),
            seed = ?self.seed,
            "built scene"
        );
        Ok(Scene::new(orrery, stars))
    }
}
