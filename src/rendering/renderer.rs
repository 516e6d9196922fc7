use crate::color::Rgb;
use crate::rendering::ray_tracer::{RayFate, RayOutcome, RayTracer};
use crate::rendering::{RenderError, RenderResult};
use log::{debug, info};
use parking_lot::Mutex;
use serde::Serialize;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Row-major RGB pixel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Image {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    /// Wrap an existing buffer; `None` unless it holds exactly width × height pixels.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgb>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        self.pixels[y * self.width + x] = color;
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        self.pixels.chunks(self.width.max(1))
    }
}

/// Ray fate tallies for one render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    pub captured: usize,
    pub disk: usize,
    pub escaped: usize,
    pub exhausted: usize,
    pub total_steps: u64,
}

impl RenderStats {
    pub fn record(&mut self, outcome: &RayOutcome) {
        match outcome.fate {
            RayFate::CapturedByHorizon { .. } => self.captured += 1,
            RayFate::HitDisk { .. } => self.disk += 1,
            RayFate::EscapedToInfinity { .. } => self.escaped += 1,
            RayFate::IntegrationExhausted { .. } => self.exhausted += 1,
        }
        self.total_steps += outcome.steps as u64;
    }

    pub fn merge(&mut self, other: &RenderStats) {
        self.captured += other.captured;
        self.disk += other.disk;
        self.escaped += other.escaped;
        self.exhausted += other.exhausted;
        self.total_steps += other.total_steps;
    }

    pub fn rays(&self) -> usize {
        self.captured + self.disk + self.escaped + self.exhausted
    }

    pub fn mean_steps(&self) -> f64 {
        match self.rays() {
            0 => 0.0,
            n => self.total_steps as f64 / n as f64,
        }
    }
}

/// Cloneable handle for polling render progress from another thread.
#[derive(Debug, Clone)]
pub struct RenderProgress {
    completed: Arc<AtomicUsize>,
    total_rows: usize,
}

impl RenderProgress {
    fn new(total_rows: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total_rows,
        }
    }

    pub fn completed_rows(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Fraction of rows finished, in [0, 1].
    pub fn fraction(&self) -> f64 {
        if self.total_rows == 0 {
            return 1.0;
        }
        self.completed_rows() as f64 / self.total_rows as f64
    }

    fn reset(&self) {
        self.completed.store(0, Ordering::Relaxed);
    }

    fn row_done(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Split `height` rows into `blocks` contiguous ranges of `height / blocks`
/// rows, the last range taking the remainder. Empty ranges are dropped.
pub fn row_blocks(height: usize, blocks: usize) -> Vec<Range<usize>> {
    let blocks = blocks.max(1);
    let per_block = height / blocks;
    (0..blocks)
        .map(|t| {
            let start = t * per_block;
            let end = if t == blocks - 1 { height } else { start + per_block };
            start..end
        })
        .filter(|r| !r.is_empty())
        .collect()
}

/// Parallel CPU renderer: one worker per row block on a pool built for the
/// render and dropped when it returns.
pub struct Renderer {
    tracer: RayTracer,
    threads: usize,
    progress: RenderProgress,
    stats: Mutex<RenderStats>,
}

impl Renderer {
    pub fn new(tracer: RayTracer, threads: usize) -> Self {
        let rows = tracer.camera().height as usize;
        Self {
            tracer,
            threads: threads.max(1),
            progress: RenderProgress::new(rows),
            stats: Mutex::new(RenderStats::default()),
        }
    }

    pub fn tracer(&self) -> &RayTracer {
        &self.tracer
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn progress(&self) -> RenderProgress {
        self.progress.clone()
    }

    /// Tallies of the most recent render.
    pub fn stats(&self) -> RenderStats {
        *self.stats.lock()
    }

    /// Trace every pixel. Blocks until all workers have finished.
    ///
    /// Pixels are clamped to [0, 1] as they are written. Takes `&mut self`
    /// since each call resets the shared progress and stats.
    pub fn render(&mut self) -> RenderResult<Image> {
        let camera = self.tracer.camera();
        let (width, height) = (camera.width as usize, camera.height as usize);
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage {
                width: camera.width,
                height: camera.height,
            });
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("render-{i}"))
            .build()?;

        self.progress.reset();
        *self.stats.get_mut() = RenderStats::default();

        let blocks = row_blocks(height, self.threads);
        info!(
            "Rendering {}x{} on {} threads ({} row blocks)",
            width,
            height,
            self.threads,
            blocks.len()
        );

        let mut pixels = vec![Rgb::BLACK; width * height];
        pool.scope(|scope| {
            let mut rest: &mut [Rgb] = &mut pixels;
            for rows in blocks {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(rows.len() * width);
                rest = tail;
                let tracer = &self.tracer;
                let progress = &self.progress;
                let stats = &self.stats;
                scope.spawn(move |_| {
                    let mut local = RenderStats::default();
                    for (row, j) in chunk.chunks_mut(width).zip(rows.clone()) {
                        for (i, px) in row.iter_mut().enumerate() {
                            let outcome = tracer.trace_pixel(i as u32, j as u32);
                            local.record(&outcome);
                            *px = outcome.color.clamped();
                        }
                        progress.row_done();
                    }
                    debug!("rows {}..{} done", rows.start, rows.end);
                    #[cfg(feature = "debug-physics")]
                    debug!(
                        "rows {}..{}: captured {} disk {} escaped {} exhausted {} (mean {:.1} steps)",
                        rows.start,
                        rows.end,
                        local.captured,
                        local.disk,
                        local.escaped,
                        local.exhausted,
                        local.mean_steps()
                    );
                    stats.lock().merge(&local);
                });
            }
        });

        let stats = self.stats();
        info!(
            "Render finished: {} captured, {} on disk, {} escaped, {} exhausted",
            stats.captured, stats.disk, stats.escaped, stats.exhausted
        );

        Ok(Image {
            width,
            height,
            pixels,
        })
    }
}
