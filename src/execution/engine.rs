//! The end-to-end `apply` entry point.
//!
//! raw image -> preset pipeline -> glow text compositor -> encode.
//! Encoding is the last step; if anything before it fails nothing is written.

use crate::core::config::GlowSpec;
use crate::core::error::FilmResult;
use crate::core::random::{self, RandomSource};
use crate::execution::codec::{FileCodec, ImageCodec};
use crate::execution::progress::{ProgressCallback, ProgressTracker};
use crate::filters::builtin::presets::{Pipeline, StepPhase};
use crate::filters::registry::FilterRegistry;
use crate::text::font::{FontService, SystemFonts};
use crate::text::glow::GlowTextCompositor;
use image::RgbImage;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options for a single `apply` run.
#[derive(Clone, Default)]
pub struct ApplyOptions {
    /// Overlay configuration.
    pub glow: GlowSpec,
    /// Seed for reproducible grain; `None` draws from the OS.
    pub seed: Option<u64>,
    /// Progress callback.
    pub progress_callback: Option<Arc<ProgressCallback>>,
}

impl std::fmt::Debug for ApplyOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplyOptions")
            .field("glow", &self.glow)
            .field("seed", &self.seed)
            .field("progress_callback", &self.progress_callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl ApplyOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overlay configuration.
    pub fn with_glow(mut self, glow: GlowSpec) -> Self {
        self.glow = glow;
        self
    }

    /// Fix the grain seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set progress callback.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(crate::execution::progress::ProgressUpdate) + Send + Sync + 'static,
    {
        let callback: ProgressCallback = Box::new(callback);
        self.progress_callback = Some(Arc::new(callback));
        self
    }
}

/// Grades photos and stamps them.
pub struct FilmEngine<C = FileCodec, F = SystemFonts> {
    registry: FilterRegistry,
    codec: C,
    fonts: F,
}

impl FilmEngine {
    /// Engine with the built-in presets, the file codec and system fonts.
    pub fn new() -> Self {
        Self::with_parts(FilterRegistry::with_builtins(), FileCodec, SystemFonts::new())
    }
}

impl Default for FilmEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ImageCodec, F: FontService> FilmEngine<C, F> {
    /// Engine over custom collaborators.
    pub fn with_parts(registry: FilterRegistry, codec: C, fonts: F) -> Self {
        Self { registry, codec, fonts }
    }

    /// Registered presets.
    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Font service used for the overlay.
    pub fn fonts(&self) -> &F {
        &self.fonts
    }

    /// Apply `filter_name` to the photo at `input`, stamp it and write the
    /// result to `output`.
    pub fn apply(
        &self,
        filter_name: &str,
        input: &Path,
        output: &Path,
        timestamp: &str,
        message: &str,
        options: &ApplyOptions,
    ) -> FilmResult<PathBuf> {
        let pipeline = self.registry.resolve(filter_name)?;
        let callback = options.progress_callback.as_deref();
        let mut tracker = ProgressTracker::start(filter_name, pipeline.steps().len() + 3, callback);
        let mut stage = 0;

        tracker.stage_started(stage, "decode");
        let image = self.codec.decode(input)?;
        tracker.stage_completed(stage, "decode");
        debug!("decoded {} ({}x{})", input.display(), image.width(), image.height());

        let mut rng = match options.seed {
            Some(seed) => random::seeded(seed),
            None => random::from_entropy(),
        };

        let image = pipeline.run_with(image, &mut rng, |phase, index, step| match phase {
            StepPhase::Started => tracker.stage_started(index + 1, &step.label()),
            StepPhase::Finished { .. } => {
                tracker.stage_completed(index + 1, &step.label());
            }
        });

        stage += pipeline.steps().len() + 1;
        tracker.stage_started(stage, "stamp");
        let compositor = GlowTextCompositor::new(&self.fonts, options.glow.clone());
        let image = compositor.composite(image, timestamp, message);
        tracker.stage_completed(stage, "stamp");

        stage += 1;
        tracker.stage_started(stage, "encode");
        self.codec.encode(&image, output)?;
        tracker.stage_completed(stage, "encode");

        let total = tracker.completed(output.to_path_buf());
        info!(
            "Successfully applied filter '{}'. Output saved to: {} ({}ms)",
            filter_name,
            output.display(),
            total
        );
        Ok(output.to_path_buf())
    }

    /// Grade and stamp an in-memory image.
    pub fn process(
        &self,
        pipeline: &Pipeline,
        image: RgbImage,
        timestamp: &str,
        message: &str,
        glow: &GlowSpec,
        rng: &mut dyn RandomSource,
    ) -> RgbImage {
        let graded = pipeline.run(image, rng);
        GlowTextCompositor::new(&self.fonts, glow.clone()).composite(graded, timestamp, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FilmError;
    use crate::execution::progress::ProgressUpdate;
    use crate::filters::builtin::presets::Preset;
    use crate::text::font::BuiltinFonts;
    use image::Rgb;
    use std::sync::Mutex;

    fn engine() -> FilmEngine<FileCodec, BuiltinFonts> {
        FilmEngine::with_parts(FilterRegistry::with_builtins(), FileCodec, BuiltinFonts)
    }

    fn photo(dir: &Path) -> PathBuf {
        let path = dir.join("input.png");
        RgbImage::from_fn(120, 90, |x, y| Rgb([(x * 2) as u8, (y * 2) as u8, 180]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_unknown_filter_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = photo(dir.path());
        let output = dir.path().join("out.png");

        let err = engine()
            .apply("nonexistent", &input, &output, "01-02-'24", "", &ApplyOptions::new())
            .unwrap_err();
        assert!(matches!(err, FilmError::Lookup { ref valid, .. } if valid.len() == 5));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.png");
        let err = engine()
            .apply(
                "modern_fuji_sim",
                &dir.path().join("your_input_photo.jpg"),
                &output,
                "01-02-'24",
                "",
                &ApplyOptions::new(),
            )
            .unwrap_err();
        assert!(matches!(err, FilmError::NotFound { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_modern_fuji_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = photo(dir.path());
        let output = dir.path().join("retro_output_modern_fuji_sim.png");

        let written = engine()
            .apply("modern_fuji_sim", &input, &output, "01-02-'24", "DAY 1", &ApplyOptions::new())
            .unwrap();
        assert_eq!(written, output);

        let decoded = FileCodec.decode(&output).unwrap();
        assert_eq!(decoded.dimensions(), (120, 90));
    }

    #[test]
    fn test_seeded_apply_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let input = photo(dir.path());
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        let options = ApplyOptions::new().with_seed(99);

        let engine = engine();
        engine.apply("portra_800_sim", &input, &a, "01-02-'24", "", &options).unwrap();
        engine.apply("portra_800_sim", &input, &b, "01-02-'24", "", &options).unwrap();
        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn test_progress_reports_every_stage() {
        let dir = tempfile::tempdir().unwrap();
        let input = photo(dir.path());
        let output = dir.path().join("out.png");

        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);
        let options = ApplyOptions::new().with_seed(1).with_progress(move |update| {
            if let ProgressUpdate::StageCompleted { stage, .. } = update {
                sink.lock().unwrap().push(stage);
            }
        });

        engine()
            .apply("reala_ace_sim", &input, &output, "01-02-'24", "", &options)
            .unwrap();

        assert_eq!(
            *stages.lock().unwrap(),
            vec![
                "decode",
                "brightness",
                "contrast",
                "saturation",
                "soften",
                "color_pass",
                "stamp",
                "encode"
            ]
        );
    }

    #[test]
    fn test_process_in_memory() {
        let engine = engine();
        let pipeline = Preset::TerracottaSun.pipeline();
        let img = RgbImage::from_pixel(64, 48, Rgb([50, 50, 200]));
        let out = engine.process(
            &pipeline,
            img,
            "01-02-'24",
            "",
            &GlowSpec::default(),
            &mut random::seeded(4),
        );
        assert_eq!(out.dimensions(), (64, 48));
    }
}
