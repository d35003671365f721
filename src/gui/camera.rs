use kiss3d::camera::Camera;
use kiss3d::event::WindowEvent;
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};

// This camera is fixed: it sits on the +z axis and looks down at the orbital
// plane, with +y up. The only thing that changes is the aspect ratio, when the
// window gets resized.
pub struct OverviewCamera {
    // -- position --
    distance: f32,
    // -- perspective --
    width: u32,
    height: u32,
    fovy: f32,
    z_near: f32,
    z_far: f32,
}

impl OverviewCamera {
    pub fn new(width: u32, height: u32) -> Self {
        OverviewCamera {
            distance: 20.0,
            width,
            height,
            fovy: 80f32.to_radians(),
            z_near: 0.1,
            z_far: 50.0,
        }
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect(), self.fovy, self.z_near, self.z_far)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }

    pub fn aspect(&self) -> f32 {
        // A minimized window reports a zero height
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    pub fn fovy(&self) -> f32 {
        self.fovy
    }
}

impl Camera for OverviewCamera {
    fn handle_event(&mut self, _canvas: &Canvas, event: &WindowEvent) {
        if let WindowEvent::FramebufferSize(w, h) = *event {
            self.width = w;
            self.height = h;
        }
    }

    fn eye(&self) -> Point3<f32> {
        Point3::new(0.0, 0.0, self.distance)
    }

    fn view_transform(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::y())
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.projection().znear(), self.projection().zfar())
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}
