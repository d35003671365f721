use std::time::Instant;

use kiss3d::window::Window;
use nalgebra::Point3;
use tracing::debug;

use self::camera::OverviewCamera;
use crate::config::WindowConfig;
use crate::frame_loop::Platform;
use crate::model::Scene;
use crate::render::{Backend, Primitive, RenderError, Topology};

mod camera;

/// Feeds primitives to kiss3d's immediate-mode line and point drawing.
/// kiss3d only draws lines and points this way, so fans come out as spokes
/// around their rim.
pub struct WindowBackend<'a> {
    window: &'a mut Window,
}

impl<'a> WindowBackend<'a> {
    pub fn new(window: &'a mut Window) -> Self {
        WindowBackend { window }
    }
}

impl Backend for WindowBackend<'_> {
    fn clear(&mut self) -> Result<(), RenderError> {
        // kiss3d wipes the color and depth buffers itself at the start of
        // every render, and forgets last frame's lines and points.
        Ok(())
    }

    fn submit(&mut self, primitive: Primitive) -> Result<(), RenderError> {
        primitive.validate()?;

        let color = &primitive.color;
        let vertices = &primitive.vertices;
        match primitive.topology {
            Topology::Points => {
                for v in vertices.iter() {
                    self.window.draw_point(v, color);
                }
            }
            Topology::LineLoop => {
                let closed = vertices.iter().chain(vertices.first());
                draw_path(self.window, closed, color);
            }
            Topology::TriangleFan => {
                let hub = &vertices[0];
                let rim = &vertices[1..];
                for v in rim.iter() {
                    self.window.draw_line(hub, v, color);
                }
                draw_path(self.window, rim.iter(), color);
            }
        }
        Ok(())
    }
}

fn draw_path<'a, I: Iterator<Item = &'a Point3<f32>>>(
    window: &mut Window,
    points: I,
    color: &Point3<f32>,
) {
    let mut prev_pt = None;
    for pt in points {
        if let Some(prev_pt) = prev_pt {
            window.draw_line(prev_pt, pt, color);
        }
        prev_pt = Some(pt);
    }
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: usize,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: usize) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn reset(&mut self) {
        self.instant = Instant::now();
        self.counter = 0;
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    /// Counts a frame. Returns the new rate whenever a measuring window
    /// closes.
    pub fn increment(&mut self) -> Option<f64> {
        self.counter += 1;

        let elapsed = self.instant.elapsed();
        if elapsed.as_millis() > self.window_size_millis as u128 {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed.as_millis() as f64;
            self.reset();
            Some(self.previous_fps)
        } else {
            None
        }
    }
}

/// A kiss3d window looking down on the orbital plane.
pub struct WindowPlatform {
    window: Window,
    camera: OverviewCamera,
    fps_counter: FpsCounter,
}

impl WindowPlatform {
    pub fn new(config: &WindowConfig) -> Self {
        let mut window = Window::new_with_size(&config.title, config.width, config.height);
        window.set_background_color(0.0, 0.0, 0.0);
        window.set_framerate_limit(config.framerate_limit);
        window.set_point_size(config.point_size);

        // The projection is set up once from the requested size; after that
        // only resizes change it.
        let camera = OverviewCamera::new(config.width, config.height);
        debug!(
            width = config.width,
            height = config.height,
            fovy = camera.fovy().to_degrees(),
            "opened window"
        );

        WindowPlatform {
            window,
            camera,
            fps_counter: FpsCounter::new(1000),
        }
    }
}

impl Platform for WindowPlatform {
    fn draw(&mut self, scene: &Scene) -> Result<(), RenderError> {
        scene.render(&mut WindowBackend::new(&mut self.window))
    }

    fn present(&mut self) -> bool {
        let keep_going = self.window.render_with_camera(&mut self.camera);
        if let Some(fps) = self.fps_counter.increment() {
            debug!(fps = fps.round(), "frame rate");
        }
        keep_going
    }

    fn release(&mut self) {
        self.window.close();
    }
}
