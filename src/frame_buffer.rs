// SPDX-License-Identifier: GPL-3.0-or-later
use tracing::trace;

use crate::error::Error;
use crate::frame::RawFrame;

/// Holds the most recent generation of sensor readings.
///
/// The buffer is owned by the capture cycle. Updates take `&mut self`, so a frame can never be
/// rewritten while something else is borrowing it for interpolation.
#[derive(Clone, Debug)]
pub(crate) struct FrameBuffer {
    frame: RawFrame,
    generation: u64,
}

impl FrameBuffer {
    /// Create a buffer holding a frame of zeros.
    pub(crate) fn new() -> Self {
        Self {
            frame: RawFrame::zeroed(),
            generation: 0,
        }
    }

    /// Replace the buffered frame with a new set of row-major readings.
    ///
    /// If the wrong number of readings is given, [`Error::InvalidInput`] is returned and the
    /// previous frame is kept.
    pub(crate) fn update(&mut self, readings: &[f32]) -> Result<(), Error> {
        self.frame.overwrite(readings)?;
        self.generation += 1;
        trace!(generation = self.generation, "frame buffer updated");
        Ok(())
    }

    /// A copy of the current frame.
    pub(crate) fn read(&self) -> RawFrame {
        self.frame.clone()
    }

    /// How many successful updates the buffer has seen.
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::FrameBuffer;
    use crate::error::Error;

    #[test]
    fn starts_zeroed() {
        let buffer = FrameBuffer::new();
        assert!(buffer.read().view().iter().all(|t| *t == 0.0));
        assert_eq!(buffer.generation(), 0);
    }

    #[test]
    fn update_replaces_everything() {
        let mut buffer = FrameBuffer::new();
        buffer.update(&[21.5; 64]).unwrap();
        assert!(buffer.read().view().iter().all(|t| *t == 21.5));
        buffer.update(&[30.0; 64]).unwrap();
        assert!(buffer.read().view().iter().all(|t| *t == 30.0));
        assert_eq!(buffer.generation(), 2);
    }

    #[test]
    fn wrong_length_keeps_previous_frame() {
        let mut buffer = FrameBuffer::new();
        buffer.update(&[24.0; 64]).unwrap();
        let res = buffer.update(&[40.0; 10]);
        assert_eq!(
            res,
            Err(Error::InvalidInput {
                expected: 64,
                actual: 10
            })
        );
        assert!(buffer.read().view().iter().all(|t| *t == 24.0));
        assert_eq!(buffer.generation(), 1);
    }

    #[test]
    fn empty_update() {
        let mut buffer = FrameBuffer::new();
        assert!(buffer.update(&[]).is_err());
    }

    #[test]
    fn read_is_a_snapshot() {
        let mut buffer = FrameBuffer::new();
        buffer.update(&[22.0; 64]).unwrap();
        let snapshot = buffer.read();
        buffer.update(&[35.0; 64]).unwrap();
        assert!(snapshot.view().iter().all(|t| *t == 22.0));
    }
}
