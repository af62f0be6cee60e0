//! The frame processor.
//!
//! One [`Processor`] owns a validated parameter bundle, a compiled tone
//! curve, the highlight-detail state, and the statistics record. Frames
//! are borrowed in and new frames are produced; the processor never
//! retains caller memory.
//!
//! # Fallback tiers
//!
//! - **Tier 1** (parameter correction): invalid bundle fields recover to
//!   their range midpoints during `init`; processing continues.
//! - **Tier 2** (standard): the frame is re-rendered through the neutral
//!   default curve with detail and saturation disabled.
//! - **Tier 3** (hard): the frame keeps identity luminance; saturation
//!   and gamut stages are bypassed and only the working-domain round trip
//!   runs.
//!
//! Error events for a frame always precede that frame's statistics
//! publication, and statistics are published only after the output buffer
//! is fully written.

use cinehdr_color::{apply_gamut_processing, apply_saturation, from_working, to_working};
use cinehdr_core::handler as core_handler;
use cinehdr_core::{
    ColorSpaceTag, CoreError, ErrorCode, ErrorHandler, ErrorReport, Frame, MaxRgbStats, Params,
    Result, Statistics,
};
use cinehdr_math::{is_finite_rgb, safe_div, saturate};
use cinehdr_ops::{detail::HighlightDetail, flicker};
use cinehdr_tone::{validate, ToneCurve};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The CineHDR frame processor.
pub struct Processor {
    params: Params,
    curve: ToneCurve,
    detail: HighlightDetail,
    stats: Statistics,
    handler: Option<Arc<ErrorHandler>>,
    initialized: bool,
    self_check_done: bool,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor {
    /// Creates a processor bound to the process-wide error handler.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Creates a processor with its own error handler.
    ///
    /// Tests and embedders use this to keep error state local.
    pub fn with_handler(handler: Arc<ErrorHandler>) -> Self {
        Self::build(Some(handler))
    }

    fn build(handler: Option<Arc<ErrorHandler>>) -> Self {
        let params = Params::default();
        Self {
            curve: ToneCurve::new(&params),
            detail: HighlightDetail::new(params.highlight_detail, params.deterministic),
            params,
            stats: Statistics::default(),
            handler,
            initialized: false,
            self_check_done: false,
        }
    }

    /// The error handler this processor reports through.
    pub fn handler(&self) -> &ErrorHandler {
        match &self.handler {
            Some(h) => h,
            None => core_handler::global(),
        }
    }

    /// Initializes (or re-initializes) the processor.
    ///
    /// The bundle is validated and corrected in place (tier 1); the
    /// corrected bundle is compiled and becomes immutable until the next
    /// `init`. The curve self-check re-arms and runs on the next frame.
    pub fn init(&mut self, params: Params) -> Result<()> {
        let mut params = params;
        let corrected = params.validate_and_correct(self.handler());
        if corrected {
            info!("parameter bundle corrected during initialization");
        }
        if !params.is_valid() {
            // Correction is total over the range table, so a still-invalid
            // bundle indicates a caller-side type error.
            return Err(CoreError::InvalidParams(
                "bundle invalid after correction".into(),
            ));
        }

        self.curve = ToneCurve::new(&params);
        self.detail = HighlightDetail::new(params.highlight_detail, params.deterministic);
        self.params = params;
        self.stats.reset();
        self.initialized = true;
        self.self_check_done = false;
        Ok(())
    }

    /// Initializes from a JSON parameter record.
    ///
    /// Unknown fields are rejected and reported as `SCHEMA_MISSING`.
    pub fn init_from_json(&mut self, json: &str) -> Result<()> {
        let params = match Params::from_json(json) {
            Ok(p) => p,
            Err(err) => {
                self.handler()
                    .report(ErrorCode::SchemaMissing, &err.to_string(), None);
                return Err(err);
            }
        };
        self.init(params)
    }

    /// The active (validated) parameter bundle.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Toggles the deterministic and DCI-compliance modes.
    ///
    /// Mode flags are the only bundle fields mutable between
    /// initializations.
    pub fn set_mode(&mut self, deterministic: bool, dci_compliance: bool) {
        self.params.deterministic = deterministic;
        self.params.dci_compliance = dci_compliance;
        self.detail.set_deterministic(deterministic);
    }

    /// Snapshot of the current statistics.
    pub fn statistics(&self) -> Statistics {
        self.stats.clone()
    }

    /// Resets statistics without touching parameters or error state.
    pub fn reset_statistics(&mut self) {
        self.stats.reset();
    }

    /// Most recent error report, if any.
    pub fn last_error(&self) -> Option<ErrorReport> {
        self.handler().last_error()
    }

    /// Clears error state (last error, history, throttle windows).
    pub fn reset_errors(&self) {
        self.handler().reset();
    }

    /// Processes one frame.
    ///
    /// The output frame is always fully written: pixel-level violations
    /// degrade through the fallback tiers instead of failing the call.
    /// Structural problems (uninitialized engine, malformed frame) return
    /// an error without producing a frame.
    pub fn process_frame(&mut self, input: &Frame) -> Result<Frame> {
        if !self.initialized {
            self.handler().report(
                ErrorCode::SchemaMissing,
                "process_frame called before init",
                None,
            );
            return Err(CoreError::NotInitialized);
        }
        if !input.is_valid() {
            return Err(CoreError::InvalidFrame(format!(
                "{}x{} with {} samples",
                input.width(),
                input.height(),
                input.data().len()
            )));
        }

        let target = input.color_space;

        // Step 1: the bundle is immutable post-init, but mode toggles
        // re-enter here, so re-validate cheaply each frame.
        let mut params = self.params.clone();
        if params.validate_and_correct(self.handler()) {
            self.params = params;
            self.curve = ToneCurve::new(&self.params);
        }

        // Step 2: into the working domain; non-finite input becomes black.
        let mut working = to_working(input);

        // Step 3: tone-map the MaxRGB luminance proxy, scale channels.
        if !self.apply_tone_mapping(&mut working) {
            // Tier 3: identity luminance, saturation and gamut bypassed.
            let output = from_working(&to_working(input), target);
            self.run_self_check_once();
            self.publish_statistics(&output);
            return Ok(output);
        }

        // Step 4: highlight detail above the pivot.
        if self.params.highlight_detail > 0.0 {
            match self.detail.process(&working, self.params.pivot_pq) {
                Ok(enhanced) => working = enhanced,
                Err(err) => {
                    // Standard fallback for this feature: disable detail.
                    self.handler()
                        .report(ErrorCode::HlFlicker, &err.to_string(), None);
                }
            }
        }

        // Steps 5-6: perceptual saturation, then two-stage gamut.
        let out_of_gamut = self.apply_saturation_and_gamut(&mut working, target);
        if out_of_gamut > 0 {
            debug!(out_of_gamut, "pixels required gamut processing");
        }

        // Step 7: leave the working domain.
        let output = from_working(&working, target);

        // DCI compliance postcondition: the emitted frame must sit inside
        // the display box.
        if self.params.dci_compliance && !frame_in_unit_box(&output) {
            self.handler().report(
                ErrorCode::DciBound,
                "output escaped the display box in DCI mode",
                None,
            );
            let fallback = self.standard_fallback_frame(input);
            self.run_self_check_once();
            self.publish_statistics(&fallback);
            return Ok(fallback);
        }

        // Steps 8-9: first-frame self-check, then statistics. Error
        // events precede the statistics publication.
        self.run_self_check_once();
        self.publish_statistics(&output);

        Ok(output)
    }

    /// Verifies the temporal-frequency constraint over a recent frame
    /// sequence (working-domain frames, host-supplied fps).
    ///
    /// A violation is reported as `HL_FLICKER`; the host should expect
    /// detail to be suppressed on subsequent frames.
    pub fn check_flicker(&self, frames: &[Frame], fps: f32) -> bool {
        let ok = flicker::check_sequence(frames, fps);
        if !ok {
            self.handler().report(
                ErrorCode::HlFlicker,
                "1-6 Hz band energy exceeded 20% of spectrum",
                None,
            );
        }
        ok
    }

    /// Tone-maps the frame in place. Returns `false` when a non-finite
    /// intermediate forced the hard fallback.
    fn apply_tone_mapping(&self, working: &mut Frame) -> bool {
        let mut poisoned = false;

        for px in working.pixels_mut() {
            let rgb = [px[0], px[1], px[2]];
            if !is_finite_rgb(&rgb) {
                px.fill(0.0);
                poisoned = true;
                continue;
            }

            let max_rgb = rgb[0].max(rgb[1]).max(rgb[2]);
            if max_rgb <= 0.0 {
                continue;
            }

            let mapped = self.curve.apply(max_rgb);
            let scale = safe_div(mapped, max_rgb, 1.0);
            let scaled = [rgb[0] * scale, rgb[1] * scale, rgb[2] * scale];
            if !is_finite_rgb(&scaled) {
                px.fill(0.0);
                poisoned = true;
                continue;
            }

            px[0] = saturate(scaled[0]);
            px[1] = saturate(scaled[1]);
            px[2] = saturate(scaled[2]);
        }

        if poisoned {
            self.handler().report(
                ErrorCode::NanInf,
                "non-finite intermediate in tone mapping",
                None,
            );
            warn!("hard fallback: identity luminance for this frame");
            return false;
        }
        true
    }

    /// Saturation + gamut over the working frame. Returns the number of
    /// pixels that entered gamut processing out of gamut.
    fn apply_saturation_and_gamut(&self, working: &mut Frame, target: ColorSpaceTag) -> u64 {
        let handler = self.handler();
        let mut out_of_gamut = 0u64;

        for px in working.pixels_mut() {
            let rgb = [px[0], px[1], px[2]];
            if !is_finite_rgb(&rgb) {
                px.fill(0.0);
                continue;
            }

            let lum = rgb[0].max(rgb[1]).max(rgb[2]);
            let mut shaped = apply_saturation(
                rgb,
                self.params.sat_base,
                self.params.sat_hi,
                self.params.pivot_pq,
                lum,
                self.params.dci_compliance,
            );

            if apply_gamut_processing(
                &mut shaped,
                target,
                self.params.dci_compliance,
                handler,
            ) {
                out_of_gamut += 1;
            }

            px[0] = saturate(shaped[0]);
            px[1] = saturate(shaped[1]);
            px[2] = saturate(shaped[2]);
        }

        out_of_gamut
    }

    /// Tier-2 rendering: the neutral default curve, no detail, no
    /// saturation shaping.
    fn standard_fallback_frame(&self, input: &Frame) -> Frame {
        let target = input.color_space;
        let neutral = ToneCurve::new(&Params::default());
        let mut working = to_working(input);

        for px in working.pixels_mut() {
            let rgb = [px[0], px[1], px[2]];
            if !is_finite_rgb(&rgb) {
                px.fill(0.0);
                continue;
            }
            let max_rgb = rgb[0].max(rgb[1]).max(rgb[2]);
            if max_rgb <= 0.0 {
                continue;
            }
            let scale = safe_div(neutral.apply(max_rgb), max_rgb, 1.0);
            px[0] = saturate(rgb[0] * scale);
            px[1] = saturate(rgb[1] * scale);
            px[2] = saturate(rgb[2] * scale);
        }

        from_working(&working, target)
    }

    /// Runs the curve validators once per initialization.
    fn run_self_check_once(&mut self) {
        if self.self_check_done {
            return;
        }
        self.self_check_done = true;

        let check = validate::check_curve(&self.curve);
        self.stats.monotonic = check.monotonic;
        self.stats.c1_continuous = check.c1_continuous;
        self.stats.max_derivative_gap = check.max_derivative_gap;

        if !check.passed() {
            self.handler().report(
                ErrorCode::RangeKnee,
                "tone curve failed its self-check",
                Some(("max_derivative_gap", check.max_derivative_gap)),
            );
        }
    }

    /// Publishes trimmed MaxRGB statistics for a fully written frame.
    fn publish_statistics(&mut self, output: &Frame) {
        let samples: Vec<f32> = output
            .pixels()
            .map(|px| px[0].max(px[1]).max(px[2]))
            .collect();
        self.stats.record_frame(MaxRgbStats::from_samples(&samples));
    }
}

/// True when every sample of the frame lies inside [0, 1].
fn frame_in_unit_box(frame: &Frame) -> bool {
    frame
        .data()
        .iter()
        .all(|&v| v.is_finite() && (0.0..=1.0).contains(&v))
}
