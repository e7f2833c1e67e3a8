//! Stand-in for the audio callback
//!
//! Polls the published velocity once per render block and accumulates a
//! playback position, the way a variable-speed sampler would step through
//! its buffer.

use crate::state::SharedState;
use log::{info, trace};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub struct RenderLoop {
    state: SharedState,
    block: Duration,
    running: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl RenderLoop {
    pub fn new(state: SharedState, block: Duration) -> Self {
        Self {
            state,
            block,
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    /// Renders a single block and returns the new playback position
    pub fn render_block(&self) -> f64 {
        render_once(&self.state, block_ms(self.block))
    }

    pub fn start(&mut self) {
        if self.thread_handle.is_some() {
            return; // Already running
        }

        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let block = self.block;

        self.running.store(true, Ordering::SeqCst);
        info!("Render loop started with {:?} blocks", block);

        self.thread_handle = Some(thread::spawn(move || {
            let ms = block_ms(block);
            while running.load(Ordering::SeqCst) {
                let block_start = Instant::now();
                render_once(&state, ms);

                let elapsed = block_start.elapsed();
                if elapsed < block {
                    thread::sleep(block - elapsed);
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
            info!("Render loop stopped at {:.1} ms", self.state.position_ms());
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn block_ms(block: Duration) -> f64 {
    block.as_nanos() as f64 / 1_000_000.0
}

fn render_once(state: &SharedState, ms: f64) -> f64 {
    let advance = state.request_advance(ms);
    let position = state.advance_position(advance);
    trace!("Rendered {} ms block: advance {}, position {}", ms, advance, position);
    position
}
