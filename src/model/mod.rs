use crate::render::{Backend, RenderError};

pub mod orrery;
pub mod starfield;

pub use orrery::Orrery;
pub use starfield::StarField;

/// Everything that gets simulated and drawn: the orrery and the star field
/// behind it. The star field is built once, alongside the orrery, and owned
/// here for the whole run.
#[derive(Debug, Clone)]
pub struct Scene {
    orrery: Orrery,
    stars: StarField,
}

impl Scene {
    pub fn new(orrery: Orrery, stars: StarField) -> Self {
        Scene { orrery, stars }
    }

    pub fn orrery(&self) -> &Orrery {
        &self.orrery
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn tick(&mut self, delta_tick: f64) {
        self.orrery.tick(delta_tick);
    }

    /// Draws one whole frame: clear, stars, then bodies and meteors.
    pub fn render(&self, backend: &mut dyn Backend) -> Result<(), RenderError> {
        backend.clear()?;
        self.stars.render(backend)?;
        self.orrery.render(backend)
    }
}
