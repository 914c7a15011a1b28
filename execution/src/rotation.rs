//! Rotation calculator.
//!
//! The wheel is split into equal segments, segment 0 starting at 0 degrees.
//! Rotation is cumulative and never wrapped, so every spin can add whole
//! revolutions and still come to rest with the pointer on the center of the
//! winning segment:
//!
//! ```text
//! width  = 360 / segments
//! center = index * width + width / 2
//! offset = (pointer - center + 360) mod 360
//! target = previous + revolutions * 360 + offset - (previous mod 360)
//! ```

use thiserror::Error as ThisError;

/// Pointer position: top of the wheel.
pub const DEFAULT_POINTER_ANGLE: f64 = 270.0;

/// Full turns added to every spin.
pub const DEFAULT_REVOLUTIONS: u32 = 6;

const FULL_TURN: f64 = 360.0;

#[derive(Debug, ThisError, Clone, PartialEq)]
pub enum RotationError {
    #[error("wheel must have at least one segment")]
    NoSegments,
    #[error("segment {index} out of range (segments={segments})")]
    SegmentOutOfRange { index: usize, segments: usize },
}

/// Fixed wheel layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinGeometry {
    segments: usize,
    pointer_angle: f64,
    revolutions: u32,
}

impl SpinGeometry {
    pub fn new(segments: usize) -> Result<Self, RotationError> {
        if segments == 0 {
            return Err(RotationError::NoSegments);
        }
        Ok(Self {
            segments,
            pointer_angle: DEFAULT_POINTER_ANGLE,
            revolutions: DEFAULT_REVOLUTIONS,
        })
    }

    pub fn with_pointer_angle(mut self, angle: f64) -> Self {
        self.pointer_angle = angle.rem_euclid(FULL_TURN);
        self
    }

    pub fn with_revolutions(mut self, revolutions: u32) -> Self {
        self.revolutions = revolutions;
        self
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn segment_width(&self) -> f64 {
        FULL_TURN / self.segments as f64
    }

    /// Angle of the middle of a segment, before any rotation.
    pub fn segment_center(&self, index: usize) -> Result<f64, RotationError> {
        if index >= self.segments {
            return Err(RotationError::SegmentOutOfRange {
                index,
                segments: self.segments,
            });
        }
        let width = self.segment_width();
        Ok(index as f64 * width + width / 2.0)
    }

    /// Rotation (mod 360) that puts a segment's center under the pointer.
    pub fn resting_offset(&self, index: usize) -> Result<f64, RotationError> {
        let center = self.segment_center(index)?;
        Ok((self.pointer_angle - center + FULL_TURN).rem_euclid(FULL_TURN))
    }

    /// Next cumulative rotation target for a win on segment `index`.
    ///
    /// Always ahead of `previous`, by more than `revolutions - 1` full turns.
    pub fn target(&self, index: usize, previous: f64) -> Result<f64, RotationError> {
        let offset = self.resting_offset(index)?;
        Ok(previous + f64::from(self.revolutions) * FULL_TURN + offset
            - previous.rem_euclid(FULL_TURN))
    }

    /// Segment currently under the pointer for a given cumulative rotation.
    pub fn segment_at(&self, rotation: f64) -> usize {
        // The wheel turned by `rotation`, so the pointer reads the angle
        // `pointer - rotation` in the wheel's own frame.
        let angle = (self.pointer_angle - rotation).rem_euclid(FULL_TURN);
        ((angle / self.segment_width()) as usize).min(self.segments - 1)
    }
}
