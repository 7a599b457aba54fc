//! Built-in grading primitives and film presets.

pub mod tone;
pub mod blur;
pub mod grain;
pub mod color;
pub mod presets;

// Re-export for direct access
pub use tone::{enhance, ToneKind};
pub use blur::{soften, blur_layer};
pub use grain::{add_grain, Grain, GrainMode};
pub use color::{color_pass, ColorShift, LumaKnee};
pub use presets::{Pipeline, Preset, Step, StepPhase};
