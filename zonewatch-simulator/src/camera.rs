use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::{BufMut, BytesMut};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use zonewatch_core::collaborators::{Frame, FrameSource};
use zonewatch_core::error::CaptureError;

/// Produces small synthetic JPEG-framed buffers, failing with a seeded probability.
#[derive(Debug)]
pub struct SimulatedCamera {
    failure_probability: f64,
    rng: Mutex<StdRng>,
    frames: AtomicU64,
}

impl SimulatedCamera {
    pub fn new(seed: u64, failure_probability: f64) -> Self {
        Self {
            failure_probability: failure_probability.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            frames: AtomicU64::new(0),
        }
    }

    pub fn frames_captured(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FrameSource for SimulatedCamera {
    async fn capture(&self) -> Result<Frame, CaptureError> {
        let offline = self.failure_probability > 0.0
            && self.rng.lock().random_bool(self.failure_probability);
        if offline {
            return Err(CaptureError::Unavailable("simulated camera offline".into()));
        }

        let n = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
        let mut data = BytesMut::with_capacity(12);
        data.put_slice(&[0xFF, 0xD8]);
        data.put_u64(n);
        data.put_slice(&[0xFF, 0xD9]);
        Ok(Frame::jpeg(data.freeze()))
    }
}
