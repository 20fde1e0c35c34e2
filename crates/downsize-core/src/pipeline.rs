//! The resize pipeline.
//!
//! # State Machine
//!
//! ```text
//! Idle → CapabilityCheck → Merging → Loading → Deciding → Transforming → Encoding → Done
//!              │                                  │
//!              └──── original file ──────────────┴──────────────────────────────▶ Done
//! ```
//!
//! A run either produces exactly one [`Artifact`] or fails with a
//! [`ResizeError`]. The callback flavour, [`Pipeline::run_with`], calls its
//! `FnOnce` only on success, so a caller is notified at most once.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::config::ResizeOptions;
use crate::decode::{decode_data_url, DataUrlError, DecodeError, ImageDecoder, StandardDecoder};
use crate::diagnostics::{Diagnostics, DiagnosticsSink, NoopSink};
use crate::encode::{derive_file_name, encode, EncodeError, TextForm};
use crate::transform::{downsample, plan_dimensions, sharpen, TransformError};

/// Errors that end a run without an artifact.
#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("Failed to load image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to transform image: {0}")]
    Transform(#[from] TransformError),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] EncodeError),

    #[error("Failed to read encoded image: {0}")]
    DataUrl(#[from] DataUrlError),
}

/// What the host runtime can do.
pub trait Platform {
    /// Binary blobs can be built from bytes.
    fn supports_binary_buffer_construction(&self) -> bool;
    /// A 2D drawing surface is available.
    fn supports_2d_drawing_surface(&self) -> bool;
    /// Named file objects (not just blobs) can be built.
    fn supports_named_file_objects(&self) -> bool;
    /// Milliseconds since the Unix epoch, stamped on named files.
    fn now_millis(&self) -> u64;
}

/// Platform for native targets: every capability present, system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativePlatform;

impl Platform for NativePlatform {
    fn supports_binary_buffer_construction(&self) -> bool {
        true
    }

    fn supports_2d_drawing_surface(&self) -> bool {
        true
    }

    fn supports_named_file_objects(&self) -> bool {
        true
    }

    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// The caller's file, as selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub last_modified: u64,
}

/// A named, timestamped output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub last_modified: u64,
}

/// Raw output bytes with a MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Nothing needed doing, or the platform could not do it.
    Original(SourceFile),
    File(NamedFile),
    Blob(Blob),
}

impl Artifact {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Artifact::Original(file) => &file.bytes,
            Artifact::File(file) => &file.bytes,
            Artifact::Blob(blob) => &blob.bytes,
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            Artifact::Original(file) => &file.mime_type,
            Artifact::File(file) => &file.mime_type,
            Artifact::Blob(blob) => &blob.mime_type,
        }
    }

    /// File name, if the artifact carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Artifact::Original(file) => Some(&file.name),
            Artifact::File(file) => Some(&file.name),
            Artifact::Blob(_) => None,
        }
    }

    pub fn is_original(&self) -> bool {
        matches!(self, Artifact::Original(_))
    }
}

/// Pipeline states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    CapabilityCheck,
    Merging,
    Loading,
    Deciding,
    Transforming,
    Encoding,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Runs the pipeline against a set of collaborators.
pub struct Pipeline<'a> {
    platform: &'a dyn Platform,
    decoder: &'a dyn ImageDecoder,
    sink: &'a dyn DiagnosticsSink,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        platform: &'a dyn Platform,
        decoder: &'a dyn ImageDecoder,
        sink: &'a dyn DiagnosticsSink,
    ) -> Self {
        Self {
            platform,
            decoder,
            sink,
        }
    }

    /// Run and hand the artifact to `callback`.
    ///
    /// The callback is not called when the run fails.
    pub fn run_with<F>(
        &self,
        file: SourceFile,
        options: &ResizeOptions,
        callback: F,
    ) -> Result<(), ResizeError>
    where
        F: FnOnce(Artifact),
    {
        let artifact = self.run(file, options)?;
        callback(artifact);
        Ok(())
    }

    /// Run the pipeline on one file.
    pub fn run(&self, file: SourceFile, options: &ResizeOptions) -> Result<Artifact, ResizeError> {
        let mut run = Run::new(Diagnostics::new(self.sink, options.debug));

        run.enter(PipelineState::CapabilityCheck);
        if !self.platform.supports_binary_buffer_construction() {
            run.diagnostics.info(
                "Binary buffer construction not supported. Can't resize or compress image.",
            );
            return Ok(run.finish(Artifact::Original(file)));
        }
        if !self.platform.supports_2d_drawing_surface() {
            run.diagnostics
                .info("2D drawing not supported. Can't resize or compress image.");
            return Ok(run.finish(Artifact::Original(file)));
        }
        run.diagnostics
            .info(&format!("Processing image: '{}'", file.name));

        run.enter(PipelineState::Merging);
        for problem in options.validate() {
            run.diagnostics.error(&problem.to_string());
        }

        run.enter(PipelineState::Loading);
        let source = self.decoder.decode(&file.bytes)?;
        let (source_width, source_height) = (source.width(), source.height());

        run.enter(PipelineState::Deciding);
        let plan = plan_dimensions(
            source_width,
            source_height,
            options.max_width,
            options.max_height,
            options.resize,
            options.upscale,
        );
        if !plan.resized && !options.compresses() {
            run.diagnostics
                .info("Image smaller than max-dimensions and quality unchanged");
            return Ok(run.finish(Artifact::Original(file)));
        }

        run.enter(PipelineState::Transforming);
        let buffer = if plan.resized {
            let scaled = downsample(source.pixels(), plan.width, plan.height)?;
            drop(source);
            scaled
        } else {
            source.into_pixels()
        };
        let buffer = sharpen(buffer, options.sharpen)?;
        run.diagnostics.info(&if plan.resized {
            format!(
                "Resizing from {}x{}px to {}x{}px",
                source_width, source_height, plan.width, plan.height
            )
        } else {
            "Resizing not required. Image smaller than max dimensions or resizing disabled."
                .to_string()
        });

        run.enter(PipelineState::Encoding);
        run.diagnostics
            .info(&format!("Setting jpeg-quality to: {}", options.jpg_quality));
        let text = encode(&buffer, options.jpg_quality, options.background())?
            .to_text(TextForm::Base64);
        drop(buffer);
        let blob = decode_data_url(&text)?;

        let artifact = if options.return_file_object && self.platform.supports_named_file_objects()
        {
            let name = derive_file_name(
                &file.name,
                plan.resized,
                options.jpg_quality,
                options.rename_file,
            );
            run.diagnostics
                .info(&format!("Renamed file from '{}' to '{}'", file.name, name));
            let named = NamedFile {
                name,
                mime_type: blob.mime_type,
                bytes: blob.bytes,
                last_modified: self.platform.now_millis(),
            };
            run.diagnostics.info(&format!(
                "Returning file: name={} size={} type={} lastModified={}",
                named.name,
                named.bytes.len(),
                named.mime_type,
                named.last_modified
            ));
            Artifact::File(named)
        } else {
            if !self.platform.supports_named_file_objects() {
                run.diagnostics
                    .info("Named file objects not supported, returning a blob");
            }
            run.diagnostics.info(&format!(
                "Returning blob: size={} type={}",
                blob.bytes.len(),
                blob.mime_type
            ));
            Artifact::Blob(Blob {
                mime_type: blob.mime_type,
                bytes: blob.bytes,
            })
        };

        Ok(run.finish(artifact))
    }
}

/// State of one run.
struct Run<'a> {
    state: PipelineState,
    diagnostics: Diagnostics<'a>,
}

impl<'a> Run<'a> {
    fn new(diagnostics: Diagnostics<'a>) -> Self {
        Self {
            state: PipelineState::Idle,
            diagnostics,
        }
    }

    fn enter(&mut self, next: PipelineState) {
        log::trace!("pipeline: {} -> {}", self.state, next);
        self.state = next;
    }

    fn finish(mut self, artifact: Artifact) -> Artifact {
        self.enter(PipelineState::Done);
        artifact
    }
}

/// Resize with the native platform, the standard decoder and no diagnostics sink.
pub fn resize_image(file: SourceFile, options: &ResizeOptions) -> Result<Artifact, ResizeError> {
    Pipeline::new(&NativePlatform, &StandardDecoder, &NoopSink).run(file, options)
}
