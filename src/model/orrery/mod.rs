use nalgebra::{Isometry3, Point3};

use crate::render::{Backend, RenderError};

mod body;
mod meteor;

pub use body::{BodyError, BodyInfo, BodyKind, CircularOrbit, OrbitingBody};
pub use meteor::{BeltParams, Meteor};

/// The moving part of the scene: a forest of orbiting bodies (stars with
/// planets, planets with moons) plus a flat list of meteors.
///
/// Every body's position is recomputed from its ancestors' current angles
/// whenever it's needed, so nothing here ever goes stale.
#[derive(Debug, Clone, Default)]
pub struct Orrery {
    bodies: Vec<OrbitingBody>,
    meteors: Vec<Meteor>,
}

impl Orrery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a body orbiting the origin.
    pub fn add_body(&mut self, body: OrbitingBody) {
        self.bodies.push(body);
    }

    pub fn add_meteor(&mut self, meteor: Meteor) {
        self.meteors.push(meteor);
    }

    pub fn bodies(&self) -> &[OrbitingBody] {
        &self.bodies
    }

    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    pub fn meteors_mut(&mut self) -> &mut [Meteor] {
        &mut self.meteors
    }

    /// Advances every body, moon and meteor by `delta_tick` ticks.
    pub fn tick(&mut self, delta_tick: f64) {
        fn tick_tree(body: &mut OrbitingBody, delta_tick: f64) {
            body.advance(delta_tick);
            for child in body.children_mut() {
                tick_tree(child, delta_tick);
            }
        }

        for body in self.bodies.iter_mut() {
            tick_tree(body, delta_tick);
        }
        for meteor in self.meteors.iter_mut() {
            meteor.advance(delta_tick);
        }
    }

    pub fn render(&self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        fn render_tree(
            body: &OrbitingBody,
            parent: &Isometry3<f64>,
            backend: &mut dyn Backend,
        ) -> Result<(), RenderError> {
            body.render_geometry(parent, backend)?;
            let world = body.world_transform(parent);
            for child in body.children() {
                render_tree(child, &world, backend)?;
            }
            Ok(())
        }

        let root = Isometry3::identity();
        for body in self.bodies.iter() {
            render_tree(body, &root, backend)?;
        }
        for meteor in self.meteors.iter() {
            meteor.render_geometry(backend)?;
        }
        Ok(())
    }

    /// Where every body is right now, parents before their children.
    pub fn world_positions(&self) -> Vec<(&str, Point3<f64>)> {
        fn collect<'a>(
            body: &'a OrbitingBody,
            parent: &Isometry3<f64>,
            out: &mut Vec<(&'a str, Point3<f64>)>,
        ) {
            let world = body.world_transform(parent);
            out.push((body.name(), world * Point3::origin()));
            for child in body.children() {
                collect(child, &world, out);
            }
        }

        let mut out = vec![];
        let root = Isometry3::identity();
        for body in self.bodies.iter() {
            collect(body, &root, &mut out);
        }
        out
    }

    /// Looks up a body anywhere in the tree.
    pub fn find_body(&self, name: &str) -> Option<&OrbitingBody> {
        fn search<'a>(bodies: &'a [OrbitingBody], name: &str) -> Option<&'a OrbitingBody> {
            bodies.iter().find_map(|b| {
                if b.name() == name {
                    Some(b)
                } else {
                    search(b.children(), name)
                }
            })
        }
        search(&self.bodies, name)
    }

    pub fn body_count(&self) -> usize {
        fn count(bodies: &[OrbitingBody]) -> usize {
            bodies.iter().map(|b| 1 + count(b.children())).sum()
        }
        count(&self.bodies)
    }
}
