//! Film simulation presets.
//!
//! Each preset is plain data: an ordered list of [`Step`]s. Global tone
//! adjustments come first, then softening, then a single colour pass that
//! shifts, adds grain and clamps every pixel.

use crate::core::random::RandomSource;
use crate::filters::builtin::blur::soften;
use crate::filters::builtin::color::{color_pass, ColorShift, LumaKnee};
use crate::filters::builtin::grain::Grain;
use crate::filters::builtin::tone::{enhance, ToneKind};
use image::RgbImage;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// The five built-in film simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// `modern_fuji_sim`
    ModernFuji,
    /// `terracotta_sun_sim`
    TerracottaSun,
    /// `portra_800_sim`
    Portra800,
    /// `reala_ace_sim`
    RealaAce,
    /// `dreamy_negative_sim`
    DreamyNegative,
}

impl Preset {
    /// Every preset, in registry order.
    pub const ALL: [Preset; 5] = [
        Preset::ModernFuji,
        Preset::TerracottaSun,
        Preset::Portra800,
        Preset::RealaAce,
        Preset::DreamyNegative,
    ];

    /// Registry identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Preset::ModernFuji => "modern_fuji_sim",
            Preset::TerracottaSun => "terracotta_sun_sim",
            Preset::Portra800 => "portra_800_sim",
            Preset::RealaAce => "reala_ace_sim",
            Preset::DreamyNegative => "dreamy_negative_sim",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Preset::ModernFuji => "Modern Fuji",
            Preset::TerracottaSun => "Terracotta Sun",
            Preset::Portra800 => "Portra 800",
            Preset::RealaAce => "Reala Ace",
            Preset::DreamyNegative => "Dreamy Negative",
        }
    }

    /// One-line summary of the look.
    pub fn description(&self) -> &'static str {
        match self {
            Preset::ModernFuji => "Cool tones, low saturation",
            Preset::TerracottaSun => {
                "Soft halation, brick-red warmth with muted, dusty skies"
            }
            Preset::Portra800 => "High saturation, warm reds and pinks, visible grain",
            Preset::RealaAce => "Balanced colours, slightly cool, medium contrast",
            Preset::DreamyNegative => {
                "Warm, strong colour, low contrast, matte blacks and subtle grain"
            }
        }
    }

    /// Search keywords.
    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            Preset::ModernFuji => &["fuji", "cool"],
            Preset::TerracottaSun => &["warm", "soft", "grain"],
            Preset::Portra800 => &["kodak", "warm", "grain"],
            Preset::RealaAce => &["fuji", "cool", "grain"],
            Preset::DreamyNegative => &["fuji", "warm", "matte", "grain"],
        }
    }

    /// Ordered steps of this preset.
    pub fn steps(&self) -> Vec<Step> {
        use Step::{ColorPass, Enhance, Soften};
        use ToneKind::{Brightness, Contrast, Saturation};

        match self {
            Preset::ModernFuji => vec![
                Enhance { kind: Contrast, factor: 0.95 },
                Enhance { kind: Brightness, factor: 1.05 },
                Soften { strength: 0.0 },
                ColorPass {
                    shift: ColorShift::LumaBlend { rgb: [15, 5, -10], blend: 0.05 },
                    grain: Grain::none(),
                },
            ],
            Preset::TerracottaSun => vec![
                Enhance { kind: Contrast, factor: 0.85 },
                Enhance { kind: Saturation, factor: 1.35 },
                Soften { strength: 4.0 },
                ColorPass {
                    shift: ColorShift::SelectiveBlue {
                        threshold: 30.0,
                        blue: [15, -10, -70],
                        other: [40, -5, -35],
                    },
                    grain: Grain::per_channel(5),
                },
            ],
            Preset::Portra800 => vec![
                Enhance { kind: Brightness, factor: 1.08 },
                Enhance { kind: Contrast, factor: 0.85 },
                Enhance { kind: Saturation, factor: 1.3 },
                Soften { strength: 1.5 },
                ColorPass {
                    shift: ColorShift::Offset { rgb: [19, 10, -33] },
                    grain: Grain::per_channel(15),
                },
            ],
            Preset::RealaAce => vec![
                Enhance { kind: Brightness, factor: 1.0 },
                Enhance { kind: Contrast, factor: 0.80 },
                Enhance { kind: Saturation, factor: 1.2 },
                Soften { strength: 2.0 },
                ColorPass {
                    shift: ColorShift::Offset { rgb: [-11, 10, 11] },
                    grain: Grain::per_channel(5),
                },
            ],
            Preset::DreamyNegative => vec![
                Enhance { kind: Contrast, factor: 0.90 },
                Enhance { kind: Saturation, factor: 1.50 },
                Soften { strength: 0.0 },
                ColorPass {
                    shift: ColorShift::ToneShape {
                        rgb: [20, 0, -20],
                        shadow: LumaKnee { threshold: 60.0, strength: 0.2 },
                        highlight: LumaKnee { threshold: 200.0, strength: 0.15 },
                    },
                    grain: Grain::shared(8),
                },
            ],
        }
    }

    /// Build the runnable pipeline for this preset.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline { preset: *self, steps: self.steps() }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One stage of a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Global tone adjustment.
    Enhance {
        /// Which adjustment.
        kind: ToneKind,
        /// `1.0` leaves the image unchanged.
        factor: f64,
    },
    /// Gaussian softening; radius is `strength / 2.5`.
    Soften {
        /// Zero or less disables the step.
        strength: f32,
    },
    /// The single per-pixel shift and grain traversal.
    ColorPass {
        /// Per-pixel colour shift.
        shift: ColorShift,
        /// Grain added after the shift.
        grain: Grain,
    },
}

/// Where a step is when [`Pipeline::run_with`] reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    /// About to run.
    Started,
    /// Finished after the given number of milliseconds.
    Finished {
        /// Wall time of the step.
        duration_ms: u64,
    },
}

impl Step {
    /// Run this step, consuming the image and returning the next one.
    pub fn apply(&self, image: RgbImage, rng: &mut dyn RandomSource) -> RgbImage {
        match self {
            Step::Enhance { kind, factor } => enhance(image, *kind, *factor),
            Step::Soften { strength } => soften(image, *strength),
            Step::ColorPass { shift, grain } => color_pass(&image, shift, *grain, rng),
        }
    }

    /// Short stage name for progress reporting.
    pub fn label(&self) -> String {
        match self {
            Step::Enhance { kind, .. } => kind.to_string(),
            Step::Soften { .. } => "soften".to_string(),
            Step::ColorPass { .. } => "color_pass".to_string(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Enhance { kind, factor } => write!(f, "{} x{}", kind, factor),
            Step::Soften { strength } if *strength > 0.0 => {
                write!(f, "soften {} (gaussian radius {})", strength, strength / 2.5)
            }
            Step::Soften { .. } => write!(f, "soften off"),
            Step::ColorPass { shift, grain } => {
                write!(f, "{}", shift.describe())?;
                if grain.amount > 0 {
                    write!(f, ", grain ±{} ({:?})", grain.amount, grain.mode)?;
                }
                Ok(())
            }
        }
    }
}

/// An inspectable, runnable preset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pipeline {
    preset: Preset,
    steps: Vec<Step>,
}

impl Pipeline {
    /// The preset this pipeline was built from.
    pub fn preset(&self) -> Preset {
        self.preset
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Grade an image by running every step in order.
    pub fn run(&self, image: RgbImage, rng: &mut dyn RandomSource) -> RgbImage {
        self.run_with(image, rng, |_, _, _| {})
    }

    /// Like [`run`](Self::run), calling `observer` before and after each step
    /// with the step's index.
    pub fn run_with<F>(&self, image: RgbImage, rng: &mut dyn RandomSource, mut observer: F) -> RgbImage
    where
        F: FnMut(StepPhase, usize, &Step),
    {
        self.steps.iter().enumerate().fold(image, |image, (index, step)| {
            observer(StepPhase::Started, index, step);
            let start = Instant::now();
            let next = step.apply(image, rng);
            let duration_ms = start.elapsed().as_millis() as u64;
            debug!("{}: {} in {}ms", self.preset, step.label(), duration_ms);
            observer(StepPhase::Finished { duration_ms }, index, step);
            next
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::seeded;
    use image::Rgb;
    use proptest::prelude::*;

    fn gradient() -> RgbImage {
        RgbImage::from_fn(24, 16, |x, y| {
            Rgb([(x * 10) as u8, (y * 15) as u8, ((x + y) * 6) as u8])
        })
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<_> = Preset::ALL.iter().map(|p| p.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_every_preset_ends_with_one_color_pass() {
        for preset in Preset::ALL {
            let steps = preset.steps();
            assert!(matches!(steps.last(), Some(Step::ColorPass { .. })), "{}", preset);
            let passes = steps.iter().filter(|s| matches!(s, Step::ColorPass { .. })).count();
            assert_eq!(passes, 1);

            let soften_at = steps.iter().position(|s| matches!(s, Step::Soften { .. })).unwrap();
            assert!(steps[..soften_at].iter().all(|s| matches!(s, Step::Enhance { .. })));
        }
    }

    #[test]
    fn test_only_dreamy_shares_grain() {
        for preset in Preset::ALL {
            if let Some(Step::ColorPass { grain, .. }) = preset.steps().last() {
                let shared = grain.mode == crate::filters::builtin::grain::GrainMode::Shared;
                assert_eq!(shared, preset == Preset::DreamyNegative);
            }
        }
    }

    #[test]
    fn test_run_with_reports_each_step() {
        let pipeline = Preset::Portra800.pipeline();
        let mut events = Vec::new();
        let observed = pipeline.run_with(gradient(), &mut seeded(3), |phase, index, step| {
            events.push((matches!(phase, StepPhase::Started), index, step.label()));
        });

        assert_eq!(events.len(), pipeline.steps().len() * 2);
        assert_eq!(events[0], (true, 0, "brightness".to_string()));
        assert_eq!(events[1], (false, 0, "brightness".to_string()));
        assert_eq!(events.last().unwrap(), &(false, 4, "color_pass".to_string()));
        assert_eq!(observed, pipeline.run(gradient(), &mut seeded(3)));
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        for preset in Preset::ALL {
            let pipeline = preset.pipeline();
            let a = pipeline.run(gradient(), &mut seeded(77));
            let b = pipeline.run(gradient(), &mut seeded(77));
            assert_eq!(a, b, "{}", preset);
            assert_eq!(a.dimensions(), (24, 16));
        }
    }

    #[test]
    fn test_modern_fuji_is_deterministic_without_seed() {
        let pipeline = Preset::ModernFuji.pipeline();
        let a = pipeline.run(gradient(), &mut seeded(1));
        let b = pipeline.run(gradient(), &mut seeded(2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_dreamy_grain_preserves_channel_differences() {
        // Mid-gray stays clear of both knees and of clamping after the tone ops.
        let img = RgbImage::from_pixel(8, 8, Rgb([128, 128, 128]));
        let out = Preset::DreamyNegative.pipeline().run(img, &mut seeded(3));
        for px in out.pixels() {
            let [r, g, b] = px.0.map(i32::from);
            assert_eq!(r - g, 20);
            assert_eq!(g - b, 20);
        }
    }

    #[test]
    fn test_steps_serialize() {
        let json = serde_json::to_string(&Preset::Portra800.pipeline()).unwrap();
        assert!(json.contains("\"portra800\""));
        assert!(json.contains("\"color_pass\""));
    }

    proptest! {
        #[test]
        fn prop_outputs_match_input_size(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), seed in any::<u64>()) {
            for preset in Preset::ALL {
                let img = RgbImage::from_pixel(5, 4, Rgb([r, g, b]));
                let out = preset.pipeline().run(img, &mut seeded(seed));
                prop_assert_eq!(out.dimensions(), (5, 4));
            }
        }
    }
}
