//! Immediate-mode geometry submission.
//!
//! Everything visible in the scene is turned into a [Primitive] every frame
//! and handed to a [Backend]. The backend decides how the primitive actually
//! reaches the screen; the scene never queries it for anything.

use nalgebra::Point3;
use thiserror::Error;

mod shapes;

pub use shapes::{disc, orbit_path, ring_loops, ORBIT_COLOR, RING_OFFSETS, TESSELLATION};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("{topology:?} primitive has a non-finite vertex {vertex}")]
    NonFiniteVertex {
        topology: Topology,
        vertex: Point3<f32>,
    },
    #[error("{topology:?} primitive needs at least {needed} vertices, got {got}")]
    Degenerate {
        topology: Topology,
        needed: usize,
        got: usize,
    },
    #[error("rendering backend has already been released")]
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Each vertex is drawn as its own point.
    Points,
    /// A closed polyline; the last vertex connects back to the first.
    LineLoop,
    /// The first vertex is the hub, the rest trace the rim.
    TriangleFan,
}

impl Topology {
    pub fn min_vertices(self) -> usize {
        match self {
            Topology::Points => 1,
            Topology::LineLoop => 2,
            Topology::TriangleFan => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub topology: Topology,
    pub color: Point3<f32>,
    pub vertices: Vec<Point3<f32>>,
}

impl Primitive {
    pub fn new<I>(topology: Topology, color: Point3<f32>, vertices: I) -> Self
    where
        I: IntoIterator<Item = Point3<f32>>,
    {
        Primitive {
            topology,
            color,
            vertices: vertices.into_iter().collect(),
        }
    }

    /// Checks that the primitive can be drawn at all. Backends call this
    /// before touching the graphics context.
    pub fn validate(&self) -> Result<(), RenderError> {
        let needed = self.topology.min_vertices();
        if self.vertices.len() < needed {
            return Err(RenderError::Degenerate {
                topology: self.topology,
                needed,
                got: self.vertices.len(),
            });
        }

        let bad_vertex = self
            .vertices
            .iter()
            .find(|v| !v.coords.iter().all(|c| c.is_finite()));
        match bad_vertex {
            Some(vertex) => Err(RenderError::NonFiniteVertex {
                topology: self.topology,
                vertex: *vertex,
            }),
            None => Ok(()),
        }
    }
}

/// Something that can put primitives on the screen (or somewhere else).
pub trait Backend {
    /// Called once at the start of every frame.
    fn clear(&mut self) -> Result<(), RenderError>;

    fn submit(&mut self, primitive: Primitive) -> Result<(), RenderError>;
}

/// A backend that just remembers what it was given. Useful for running the
/// scene without a window.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DrawList {
    primitives: Vec<Primitive>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn count(&self, topology: Topology) -> usize {
        self.primitives
            .iter()
            .filter(|p| p.topology == topology)
            .count()
    }
}

impl Backend for DrawList {
    fn clear(&mut self) -> Result<(), RenderError> {
        self.primitives.clear();
        Ok(())
    }

    fn submit(&mut self, primitive: Primitive) -> Result<(), RenderError> {
        primitive.validate()?;
        self.primitives.push(primitive);
        Ok(())
    }
}
