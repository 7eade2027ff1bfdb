//! Rendering boundary
//!
//! The simulation never draws. It projects the world into a [`Frame`] and
//! hands it to a [`FrameSink`], which owns any window or device.

pub mod frame;

pub use frame::{Circle, Color, Frame, Line, Text};

use thiserror::Error;

/// Failure inside a frame sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("display surface lost")]
    SurfaceLost,
    #[error("display backend error: {0}")]
    Backend(String),
}

/// Result of handing a frame to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presented {
    Shown,
    /// The sink failed; the frame was dropped
    Ignored,
}

/// Something that can show frames (window, terminal, recorder)
pub trait FrameSink {
    fn present(&mut self, frame: &Frame) -> Result<(), SinkError>;

    /// Release any resources. Default is a no-op.
    fn close(&mut self) {}
}

/// Discards every frame
#[derive(Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &Frame) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Logs the HUD line every `every` frames at debug level
#[derive(Debug)]
pub struct LogSink {
    every: u64,
    frames: u64,
}

impl LogSink {
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1), frames: 0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl FrameSink for LogSink {
    fn present(&mut self, frame: &Frame) -> Result<(), SinkError> {
        if self.frames % self.every == 0 {
            let hud = frame.texts.first().map(|t| t.content.as_str()).unwrap_or("");
            let nearest = frame.lidar.iter().copied().fold(1.0f32, f32::min);
            log::debug!("frame {}: {} nearest={:.2}", self.frames, hud, nearest);
        }
        self.frames += 1;
        Ok(())
    }

    fn close(&mut self) {
        log::info!("Frame sink closed after {} frames", self.frames);
    }
}
