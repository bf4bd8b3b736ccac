use crate::buffer::FrameBuffer;
use crate::material::ScatterRecord;
use crate::pdf::{MixturePdf, Pdf, ShapePdf};
use crate::ray::Ray;
use crate::scene::Scene;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use utils::Color;

/// Pixels are claimed in 32x32 tiles when the image divides evenly, purely
/// to keep concurrent writes close together in memory.
const TILE_LENGTH: usize = 32;

/// Everything the scheduler needs to know before a trace starts.
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    /// Output image width in pixels.
    pub width: usize,
    /// Output image height in pixels.
    pub height: usize,
    /// How many samples each pixel accumulates over a full trace.
    pub samples_per_pixel: u32,
    /// Hard bound on recursion depth; no Russian roulette.
    pub max_depth: u32,
    /// Size of the worker pool.
    pub num_threads: usize,
    /// Couple BSDF sampling with explicit light sampling.
    pub pdf_enabled: bool,
    /// Master seed every worker derives its thread RNG from.
    pub seed: u64,
}

impl RenderSettings {
    pub fn new(
        width: usize,
        height: usize,
        samples_per_pixel: u32,
        max_depth: u32,
        num_threads: usize,
        pdf_enabled: bool,
        seed: u64,
    ) -> RenderSettings {
        RenderSettings {
            width,
            height,
            samples_per_pixel,
            max_depth,
            num_threads: num_threads.max(1),
            pdf_enabled,
            seed,
        }
    }
}

/// Progress counters, readable at any time while a trace runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    /// Rays fired so far, primary and secondary.
    pub total_rays_fired: i64,
    /// Pixel-samples claimed so far (the scheduler's counter).
    pub num_pixel_samples: i64,
    /// `width * height * samples_per_pixel`.
    pub total_num_pixel_samples: i64,
    /// Full-image passes completed.
    pub completed_sample_count: i64,
    /// Position within the current pass.
    pub current_pixel_offset: i64,
    /// How often a non-finite PDF value was clamped to one.
    pub num_pdf_query_retries: i64,
    /// Wall-clock seconds since the trace began.
    pub total_time_seconds: u64,
}

/// Invoked by the last worker to finish; the flag says whether the trace ran
/// to natural completion rather than being cancelled.
pub type OnTraceComplete = Box<dyn FnOnce(bool) + Send>;

struct TraceState {
    settings: RenderSettings,
    buffer: Arc<FrameBuffer>,

    sample_offset: AtomicI64,
    rays_fired: AtomicI64,
    pdf_retries: AtomicI64,
    threads_done: AtomicUsize,
    exit_requested: AtomicBool,
    restart_flags: Vec<AtomicBool>,

    done: Mutex<bool>,
    done_cv: Condvar,
    on_complete: Mutex<Option<OnTraceComplete>>,
    start_time: Mutex<Instant>,
    end_time: Mutex<Option<Instant>>,
}

impl TraceState {
    fn total_pixel_samples(&self) -> i64 {
        (self.settings.width * self.settings.height) as i64 * self.settings.samples_per_pixel as i64
    }

    fn reset_counters(&self) {
        self.rays_fired.store(0, Ordering::Relaxed);
        self.pdf_retries.store(0, Ordering::Relaxed);
        *self.start_time.lock().unwrap() = Instant::now();
        *self.end_time.lock().unwrap() = None;
        self.buffer.reset();
    }
}

/// The parallel sampling scheduler: a fixed pool of workers draining one
/// atomic pixel-sample counter.
pub struct Renderer {
    settings: RenderSettings,
    buffer: Arc<FrameBuffer>,
    state: Option<Arc<TraceState>>,
    workers: Vec<JoinHandle<()>>,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Renderer {
        Renderer {
            settings,
            buffer: Arc::new(FrameBuffer::new(settings.width, settings.height)),
            state: None,
            workers: Vec::new(),
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn buffer(&self) -> &Arc<FrameBuffer> {
        &self.buffer
    }

    pub fn is_tracing(&self) -> bool {
        self.state.is_some()
    }

    /// Spawns the worker pool and starts tracing `scene`.
    ///
    /// # Parameters
    /// - `scene`: The world, light shapes, and camera to render. Read-only
    ///   for the duration of the trace.
    /// - `on_complete`: Invoked by the last worker to finish, with `true`
    ///   when the trace ran to natural completion.
    ///
    /// Any previous trace is cancelled and joined first.
    pub fn begin_trace(&mut self, scene: Arc<Scene>, on_complete: Option<OnTraceComplete>) {
        self.cleanup_trace();

        let state = Arc::new(TraceState {
            settings: self.settings,
            buffer: self.buffer.clone(),
            sample_offset: AtomicI64::new(0),
            rays_fired: AtomicI64::new(0),
            pdf_retries: AtomicI64::new(0),
            threads_done: AtomicUsize::new(0),
            exit_requested: AtomicBool::new(false),
            restart_flags: (0..self.settings.num_threads)
                .map(|_| AtomicBool::new(false))
                .collect(),
            done: Mutex::new(false),
            done_cv: Condvar::new(),
            on_complete: Mutex::new(on_complete),
            start_time: Mutex::new(Instant::now()),
            end_time: Mutex::new(None),
        });
        state.reset_counters();

        debug!(
            width = self.settings.width,
            height = self.settings.height,
            samples = self.settings.samples_per_pixel,
            threads = self.settings.num_threads,
            "starting trace"
        );

        for id in 0..self.settings.num_threads {
            let state = state.clone();
            let scene = scene.clone();
            self.workers
                .push(std::thread::spawn(move || worker_loop(id, state, scene)));
        }

        self.state = Some(state);
    }

    /// Zero the accumulator and send every worker back to sample zero.
    /// Workers observe the flag lazily between samples; the brief overlap
    /// is harmless because the buffers have just been cleared.
    pub fn restart_current(&self) {
        if let Some(state) = &self.state {
            state.sample_offset.store(0, Ordering::SeqCst);
            for flag in &state.restart_flags {
                flag.store(true, Ordering::Relaxed);
            }
            state.reset_counters();
            info!("trace restarted");
        }
    }

    /// Ask the workers to stop. Each in-flight `trace` returns at its next
    /// recursion step, so the pool drains within one bounce.
    pub fn request_exit(&self) {
        if let Some(state) = &self.state {
            state.exit_requested.store(true, Ordering::SeqCst);
        }
    }

    /// Blocks until every worker has finished.
    ///
    /// # Parameters
    /// - `timeout`: How long to wait; `None` waits forever.
    ///
    /// # Returns
    /// - `true` when the trace is complete (or none is running), `false`
    ///   when the timeout elapsed first.
    pub fn wait_for_trace_to_finish(&self, timeout: Option<Duration>) -> bool {
        let Some(state) = &self.state else {
            return true;
        };

        let mut done = state.done.lock().unwrap();
        match timeout {
            Some(timeout) => {
                let deadline = Instant::now() + timeout;
                while !*done {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    let (guard, wait) = state
                        .done_cv
                        .wait_timeout(done, deadline - now)
                        .unwrap();
                    done = guard;
                    if wait.timed_out() && !*done {
                        return false;
                    }
                }
                true
            }
            None => {
                while !*done {
                    done = state.done_cv.wait(done).unwrap();
                }
                true
            }
        }
    }

    /// Snapshots the progress counters.
    ///
    /// # Returns
    /// - A `Stats` value consistent enough for progress display; the
    ///   counters are read individually and may be mid-update.
    pub fn stats(&self) -> Stats {
        let Some(state) = &self.state else {
            return Stats::default();
        };

        let num_pixels = (self.settings.width * self.settings.height) as i64;
        let offset = state.sample_offset.load(Ordering::Relaxed);
        let start = *state.start_time.lock().unwrap();
        let end = state.end_time.lock().unwrap().unwrap_or_else(Instant::now);

        Stats {
            total_rays_fired: state.rays_fired.load(Ordering::Relaxed),
            num_pixel_samples: offset,
            total_num_pixel_samples: state.total_pixel_samples(),
            completed_sample_count: offset / num_pixels,
            current_pixel_offset: offset % num_pixels,
            num_pdf_query_retries: state.pdf_retries.load(Ordering::Relaxed),
            total_time_seconds: end.duration_since(start).as_secs(),
        }
    }

    fn cleanup_trace(&mut self) {
        if let Some(state) = self.state.take() {
            state.exit_requested.store(true, Ordering::SeqCst);
            let mut done = state.done.lock().unwrap();
            while !*done {
                done = state.done_cv.wait(done).unwrap();
            }
            drop(done);
            for worker in self.workers.drain(..) {
                let _ = worker.join();
            }
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.cleanup_trace();
    }
}

fn worker_loop(id: usize, state: Arc<TraceState>, scene: Arc<Scene>) {
    // Thread-distinct but reproducible sampling.
    utils::seed_thread_rng(state.settings.seed.wrapping_add(1 + id as u64));

    let width = state.settings.width;
    let height = state.settings.height;
    let num_pixels = (width * height) as i64;
    let total_pixel_samples = state.total_pixel_samples();

    let tile_area = (TILE_LENGTH * TILE_LENGTH) as i64;
    let num_x_tiles = width / TILE_LENGTH;
    let tile_enabled = width % TILE_LENGTH == 0 && height % TILE_LENGTH == 0;

    let mut offset = state.sample_offset.load(Ordering::Acquire);
    while !state.exit_requested.load(Ordering::Relaxed) && offset < total_pixel_samples {
        // Claim the next pixel-sample index.
        while offset < total_pixel_samples {
            if state.restart_flags[id].swap(false, Ordering::Relaxed) {
                offset = state.sample_offset.load(Ordering::Acquire);
            }
            match state.sample_offset.compare_exchange(
                offset,
                offset + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(observed) => offset = observed,
            }
        }

        if offset < total_pixel_samples {
            let cur_offset = offset % num_pixels;

            let (x, y, out_idx) = if tile_enabled {
                let tile_id = (cur_offset / tile_area) as usize;
                let tile_offset = (cur_offset % tile_area) as usize;
                let tile_x = tile_id % num_x_tiles;
                let tile_y = tile_id / num_x_tiles;
                let x = tile_x * TILE_LENGTH + tile_offset % TILE_LENGTH;
                let y = tile_y * TILE_LENGTH + tile_offset / TILE_LENGTH;
                (x, y, y * width + x)
            } else {
                let x = (cur_offset % width as i64) as usize;
                let y = (cur_offset / width as i64) as usize;
                (x, y, cur_offset as usize)
            };

            // The image origin is top-left, so v flips.
            let u = (x as f32 + utils::random()) / width as f32;
            let v = 1.0 - (y as f32 + utils::random()) / height as f32;
            let ray = scene.camera().get_ray(u, v);
            let color = trace(&scene, &state, &ray, 0);

            state.buffer.accumulate(out_idx, color);
            let sample_count = offset / num_pixels + 1;
            state.buffer.write_preview(out_idx, sample_count);
        }
    }

    // Last worker out marks the end time, fires the callback, and wakes the
    // host.
    let done_count = state.threads_done.fetch_add(1, Ordering::AcqRel) + 1;
    if done_count >= state.settings.num_threads {
        *state.end_time.lock().unwrap() = Some(Instant::now());

        let actually_finished =
            state.sample_offset.load(Ordering::SeqCst) >= total_pixel_samples;
        if let Some(on_complete) = state.on_complete.lock().unwrap().take() {
            on_complete(actually_finished);
        }

        let mut done = state.done.lock().unwrap();
        *done = true;
        state.done_cv.notify_all();
    }
}

/// The recursive path-tracing estimator.
fn trace(scene: &Scene, state: &TraceState, ray: &Ray, depth: u32) -> Color {
    // Cancellation is observed per recursion step; worst-case latency is one
    // full path.
    if state.exit_requested.load(Ordering::Relaxed) {
        return scene.camera().background();
    }

    state.rays_fired.fetch_add(1, Ordering::Relaxed);

    let Some(hit) = scene.world().hit(ray, 0.001, f32::MAX) else {
        return scene.camera().background();
    };

    let emitted = hit.mat.emitted(ray, &hit, hit.u, hit.v, hit.p);
    if depth >= state.settings.max_depth {
        return emitted;
    }
    let Some(scatter) = hit.mat.scatter(ray, &hit) else {
        return emitted;
    };

    match scatter {
        ScatterRecord::Specular { ray: specular, attenuation } => {
            attenuation * trace(scene, state, &specular, depth + 1)
        }
        ScatterRecord::Diffuse {
            attenuation,
            pdf,
            classic,
        } => {
            let (scattered, mut pdf_value, scatter_pdf);
            if state.settings.pdf_enabled {
                // Couple the material's density with explicit light
                // sampling when the scene names light shapes.
                if let Some(lights) = scene.light_shapes() {
                    let light_pdf = ShapePdf::new(lights.clone(), hit.p);
                    let mix = MixturePdf::new(&light_pdf, pdf.as_ref());
                    scattered = Ray::with_time(hit.p, mix.generate(), ray.time());
                    pdf_value = mix.value(scattered.direction());
                } else {
                    scattered = Ray::with_time(hit.p, pdf.generate(), ray.time());
                    pdf_value = pdf.value(scattered.direction());
                }
                scatter_pdf = hit.mat.scattering_pdf(ray, &hit, &scattered);
            } else {
                scattered = classic;
                pdf_value = 1.0;
                scatter_pdf = 1.0;
            }

            if utils::near_zero(scattered.direction()) {
                return emitted;
            }
            if !pdf_value.is_finite() {
                pdf_value = 1.0;
                state.pdf_retries.fetch_add(1, Ordering::Relaxed);
            }

            let indirect = trace(scene, state, &scattered, depth + 1);
            emitted + attenuation * scatter_pdf * indirect / pdf_value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::hittable_list::HittableList;
    use crate::material::{DiffuseLight, Lambertian};
    use crate::primitives::Sphere;
    use crate::texture::ConstantTexture;
    use std::sync::atomic::AtomicBool;
    use utils::{Point3, Vec3A};

    fn tiny_scene() -> Arc<Scene> {
        let mut world = HittableList::new();
        let ground = Arc::new(Lambertian::new(Arc::new(ConstantTexture::new(Color::new(
            0.5, 0.5, 0.5,
        )))));
        world.add(Arc::new(Sphere::new(
            Point3::new(0.0, -100.5, 0.0),
            100.0,
            ground,
        )));
        let glow = Arc::new(DiffuseLight::new(Arc::new(ConstantTexture::new(
            Color::new(4.0, 4.0, 4.0),
        ))));
        let bulb: Arc<Sphere> = Arc::new(Sphere::new_light_shape(
            Point3::new(0.0, 1.0, 0.0),
            0.3,
            glow,
        ));
        world.add(bulb.clone());
        let mut lights = HittableList::new();
        lights.add(bulb);

        let camera = Camera::new(
            Point3::new(0.0, 0.5, -3.0),
            Point3::new(0.0, 0.5, 0.0),
            Vec3A::Y,
            40.0,
            1.0,
            0.0,
            3.0,
            0.0,
            1.0,
            Color::new(0.1, 0.1, 0.1),
        );
        Arc::new(Scene::new(Arc::new(world), Some(lights), camera))
    }

    fn settings(threads: usize, samples: u32) -> RenderSettings {
        RenderSettings::new(8, 8, samples, 8, threads, true, 99)
    }

    #[test]
    fn a_full_trace_fills_every_pixel() {
        let mut renderer = Renderer::new(settings(2, 4));
        renderer.begin_trace(tiny_scene(), None);
        assert!(renderer.wait_for_trace_to_finish(Some(Duration::from_secs(60))));

        let stats = renderer.stats();
        assert_eq!(stats.num_pixel_samples, stats.total_num_pixel_samples);
        assert_eq!(stats.completed_sample_count, 4);
        assert!(stats.total_rays_fired >= stats.total_num_pixel_samples);

        for pixel in renderer.buffer().hdr_snapshot() {
            assert_eq!(pixel[3], 4.0);
        }
    }

    #[test]
    fn completion_callback_reports_natural_finish() {
        let finished = Arc::new(AtomicBool::new(false));
        let seen = finished.clone();
        let mut renderer = Renderer::new(settings(2, 2));
        renderer.begin_trace(
            tiny_scene(),
            Some(Box::new(move |natural| {
                seen.store(natural, Ordering::SeqCst);
            })),
        );
        assert!(renderer.wait_for_trace_to_finish(None));
        assert!(finished.load(Ordering::SeqCst));
    }

    #[test]
    fn single_threaded_runs_are_bit_exact() {
        let run = || {
            let mut renderer = Renderer::new(settings(1, 4));
            renderer.begin_trace(tiny_scene(), None);
            assert!(renderer.wait_for_trace_to_finish(None));
            renderer.buffer().hdr_snapshot()
        };
        let a = run();
        let b = run();
        assert_eq!(a, b);
    }

    #[test]
    fn cancellation_returns_promptly() {
        let mut renderer = Renderer::new(RenderSettings::new(64, 64, 5000, 16, 2, true, 7));
        renderer.begin_trace(tiny_scene(), None);
        std::thread::sleep(Duration::from_millis(20));
        renderer.request_exit();
        assert!(renderer.wait_for_trace_to_finish(Some(Duration::from_secs(30))));
    }

    #[test]
    fn restart_zeroes_the_accumulator() {
        let mut renderer = Renderer::new(RenderSettings::new(16, 16, 2000, 8, 2, true, 7));
        renderer.begin_trace(tiny_scene(), None);
        std::thread::sleep(Duration::from_millis(20));
        renderer.restart_current();
        let stats = renderer.stats();
        assert!(stats.num_pixel_samples <= stats.total_num_pixel_samples);
        renderer.request_exit();
        assert!(renderer.wait_for_trace_to_finish(Some(Duration::from_secs(30))));
    }

    #[test]
    fn waiting_with_a_short_timeout_times_out() {
        let mut renderer = Renderer::new(RenderSettings::new(64, 64, 10_000, 16, 1, true, 7));
        renderer.begin_trace(tiny_scene(), None);
        assert!(!renderer.wait_for_trace_to_finish(Some(Duration::from_millis(1))));
        renderer.request_exit();
        assert!(renderer.wait_for_trace_to_finish(Some(Duration::from_secs(30))));
    }
}
