use crate::core::framebuffer::ScreenBuffer;
use crate::io::image::to_rgb_image;
use crate::pipeline::passes::draw_scene;
use crate::pipeline::renderer::Renderer;
use crate::scene::context::Scene;
use image::RgbImage;
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Runs whole-scene draws on a background thread for an interactive front end.
///
/// At most one draw runs at a time: a request made while one is in flight is
/// refused, never queued. The last finished frame is kept as an image
/// snapshot that readers can copy at any time without seeing a half-drawn
/// frame.
pub struct RenderService {
    scene: Arc<Mutex<Scene>>,
    snapshot: Arc<Mutex<RgbImage>>,
    busy: Arc<AtomicBool>,
    width: usize,
    height: usize,
    worker: Option<JoinHandle<()>>,
}

/// Clears the busy flag when the draw thread ends, including by unwinding.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicked draw leaves the data intact; keep serving it.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RenderService {
    pub fn new(scene: Scene, width: usize, height: usize) -> Self {
        Self {
            scene: Arc::new(Mutex::new(scene)),
            snapshot: Arc::new(Mutex::new(RgbImage::new(width as u32, height as u32))),
            busy: Arc::new(AtomicBool::new(false)),
            width,
            height,
            worker: None,
        }
    }

    /// Shared handle for editing the scene between draws (camera moves,
    /// option toggles). A draw holds the lock for its whole duration.
    pub fn scene(&self) -> Arc<Mutex<Scene>> {
        Arc::clone(&self.scene)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Starts a draw unless one is already running. Returns whether a draw
    /// was started.
    pub fn request_draw(&mut self) -> bool {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Draw request refused: a draw is in flight");
            return false;
        }

        // The previous worker has already cleared the flag, so this only reaps it.
        if let Some(handle) = self.worker.take() {
            Self::join(handle);
        }

        let scene = Arc::clone(&self.scene);
        let snapshot = Arc::clone(&self.snapshot);
        let busy = BusyGuard(Arc::clone(&self.busy));
        let (width, height) = (self.width, self.height);

        self.worker = Some(thread::spawn(move || {
            let _busy = busy;
            let start = Instant::now();
            let mut screen = ScreenBuffer::new(width, height);
            let mut renderer = Renderer::new();

            let stats = {
                let scene = lock(&scene);
                draw_scene(&scene, &mut renderer, &mut screen)
            };
            let image = to_rgb_image(&screen);
            *lock(&snapshot) = image;

            info!(
                "Frame finished in {:.2?} ({} triangles rasterized)",
                start.elapsed(),
                stats.rasterized
            );
        }));
        true
    }

    /// Copy of the last completed frame.
    pub fn snapshot(&self) -> RgbImage {
        lock(&self.snapshot).clone()
    }

    /// Blocks until the in-flight draw, if any, has finished.
    pub fn wait_idle(&mut self) {
        if let Some(handle) = self.worker.take() {
            Self::join(handle);
        }
    }

    fn join(handle: JoinHandle<()>) {
        if handle.join().is_err() {
            error!("Render thread panicked");
        }
    }
}

impl Drop for RenderService {
    fn drop(&mut self) {
        self.wait_idle();
    }
}
