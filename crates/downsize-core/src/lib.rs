//! Downsize Core - progressive downscale-and-sharpen pipeline
//!
//! This crate takes an image file, optionally shrinks it to fit maximum
//! dimensions using repeated half-size passes, sharpens the result to undo
//! scaling blur, and re-encodes it as JPEG.
//!
//! All pixel work runs on owned RGBA buffers; nothing here needs a real
//! rendering backend. Host integration (capabilities, diagnostics) goes
//! through the [`pipeline::Platform`] and [`diagnostics::DiagnosticsSink`]
//! traits.

pub mod config;
pub mod decode;
pub mod diagnostics;
pub mod encode;
pub mod pipeline;
pub mod transform;

pub use config::{ConfigError, ResizeOptions};
pub use diagnostics::{DiagnosticsSink, NoopSink};
pub use pipeline::{
    resize_image, Artifact, Blob, NamedFile, NativePlatform, Pipeline, PipelineState, Platform,
    ResizeError, SourceFile,
};
pub use transform::{downsample, plan_dimensions, sharpen, step_count, DimensionPlan};
