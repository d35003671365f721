//! The per-frame update/draw cycle.
//!
//! Each frame: tick the scene, draw it, present it. Presenting is also where
//! the platform reports whether the user wants to quit. The loop keeps an
//! explicit state so that shutdown always goes Running -> ExitRequested ->
//! Terminated, with resources released in between.

use tracing::{debug, error, info};

use crate::model::Scene;
use crate::render::{DrawList, RenderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    ExitRequested,
    Terminated,
}

impl LoopState {
    /// Only a running loop can be asked to stop; asking twice changes nothing.
    pub fn request_exit(self) -> Self {
        match self {
            LoopState::Running => LoopState::ExitRequested,
            other => other,
        }
    }

    /// A loop terminates once it has been asked to exit and has cleaned up.
    pub fn terminate(self) -> Self {
        match self {
            LoopState::ExitRequested | LoopState::Terminated => LoopState::Terminated,
            LoopState::Running => LoopState::Running,
        }
    }
}

/// Whatever owns the screen: takes finished scenes and shows them.
pub trait Platform {
    /// Submits the scene's geometry for the current frame.
    fn draw(&mut self, scene: &Scene) -> Result<(), RenderError>;

    /// Shows the frame and waits out the frame pacing. Returns `false` once
    /// the user has asked to quit.
    fn present(&mut self) -> bool;

    /// Gives back the window, context, or whatever else was held.
    fn release(&mut self);
}

pub struct FrameLoop {
    state: LoopState,
    ticks_per_frame: f64,
    frames: u64,
}

impl FrameLoop {
    pub fn new(ticks_per_frame: f64) -> Self {
        FrameLoop {
            state: LoopState::Running,
            ticks_per_frame,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs frames until the platform reports an exit or a frame fails to
    /// render. Either way the platform is released before this returns.
    pub fn run<P: Platform>(&mut self, scene: &mut Scene, platform: &mut P) -> Result<(), RenderError> {
        info!(ticks_per_frame = self.ticks_per_frame, "starting frame loop");

        let mut result = Ok(());
        while self.state == LoopState::Running {
            if let Err(e) = self.step(scene, platform) {
                error!("frame {} failed to render: {}", self.frames, e);
                result = Err(e);
                self.state = self.state.request_exit();
            }
        }

        debug!(frames = self.frames, "releasing platform");
        platform.release();
        self.state = self.state.terminate();
        info!(frames = self.frames, "frame loop terminated");
        result
    }

    fn step<P: Platform>(&mut self, scene: &mut Scene, platform: &mut P) -> Result<(), RenderError> {
        scene.tick(self.ticks_per_frame);
        platform.draw(scene)?;
        self.frames += 1;

        if !platform.present() {
            info!(frames = self.frames, "exit requested");
            self.state = self.state.request_exit();
        }
        Ok(())
    }
}

/// A platform with no window: it records each frame into a [DrawList] and
/// asks to exit after a fixed number of frames.
#[derive(Debug, Default)]
pub struct Headless {
    frames_left: u64,
    last_frame: DrawList,
    released: bool,
}

impl Headless {
    pub fn new(frames: u64) -> Self {
        Headless {
            frames_left: frames,
            last_frame: DrawList::new(),
            released: false,
        }
    }

    pub fn last_frame(&self) -> &DrawList {
        &self.last_frame
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Platform for Headless {
    fn draw(&mut self, scene: &Scene) -> Result<(), RenderError> {
        if self.released {
            return Err(RenderError::Released);
        }
        scene.render(&mut self.last_frame)
    }

    fn present(&mut self) -> bool {
        self.frames_left = self.frames_left.saturating_sub(1);
        self.frames_left > 0
    }

    fn release(&mut self) {
        self.released = true;
    }
}
