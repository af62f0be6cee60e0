//! End-to-end pipeline scenarios.
//!
//! These tests drive the full processor the way a host application does:
//! real parameter bundles, real frames, assertions on emitted output and
//! published diagnostics.

use cinehdr_color::apply_gamut_processing;
use cinehdr_core::{ColorSpaceTag, ErrorCode, ErrorHandler, Frame, Params};
use cinehdr_engine::Processor;
use cinehdr_tone::ToneCurve;
use std::sync::Arc;

fn local_processor() -> Processor {
    Processor::with_handler(Arc::new(ErrorHandler::new()))
}

/// Cinema-Flat on mid-gray: the tone stage maps MaxRGB through the PPR
/// curve, and the full pipeline stays finite and inside the unit cube.
#[test]
fn cinema_flat_mid_gray() {
    let params = Params::cinema_flat();

    // Tone stage in isolation: the curve value at 0.5 under Cinema-Flat.
    let curve = ToneCurve::new(&params);
    let toned = curve.apply(0.5);
    assert!((toned - 0.396).abs() < 0.01, "curve(0.5) = {toned}");

    // Full pipeline.
    let mut processor = local_processor();
    processor.init(params).unwrap();
    let input = Frame::filled(8, 8, [0.5, 0.5, 0.5], ColorSpaceTag::Bt2020Pq);
    let output = processor.process_frame(&input).unwrap();

    for &v in output.data() {
        assert!(v.is_finite());
        assert!((0.0..=1.0).contains(&v));
    }

    // Gray input stays achromatic through the whole pipeline.
    let px = output.pixel_rgb(4, 4);
    assert!((px[0] - px[1]).abs() < 1e-2);
    assert!((px[1] - px[2]).abs() < 1e-2);
}

/// Out-of-range pivot recovers to the range midpoint with RANGE_PIVOT,
/// and the corrected bundle validates.
#[test]
fn pivot_correction_to_midpoint() {
    let handler = Arc::new(ErrorHandler::new());
    let mut params = Params {
        pivot_pq: -0.1,
        ..Params::default()
    };
    let corrected = params.validate_and_correct(&handler);

    assert!(corrected);
    assert!((params.pivot_pq - 0.175).abs() < 1e-6);
    assert!(params.is_valid());
    assert_eq!(handler.last_error().unwrap().code, ErrorCode::RangePivot);
}

/// A NaN input pixel becomes black at the working-domain boundary, and
/// nothing downstream raises NAN_INF again.
#[test]
fn nan_input_pixel_sanitized_once() {
    let mut processor = local_processor();
    processor.init(Params::default()).unwrap();

    let mut input = Frame::filled(4, 4, [0.4, 0.4, 0.4], ColorSpaceTag::Bt2020Pq);
    input
        .pixel_mut(1, 1)
        .copy_from_slice(&[f32::NAN, 0.5, 0.5]);

    let output = processor.process_frame(&input).unwrap();

    for &v in output.data() {
        assert!(v.is_finite());
    }
    // The offending pixel collapsed to black before the tone stage, so
    // the frame completed without a hard fallback.
    if let Some(report) = processor.last_error() {
        assert_ne!(report.code, ErrorCode::NanInf);
    }
}

/// RLOG at the splice threshold: value continuity within 1e-3, numerical
/// derivative agreement within 1e-2.
#[test]
fn rlog_splice_continuity() {
    let params = Params {
        curve: cinehdr_core::CurveKind::Rlog,
        ..Params::default()
    };
    let curve = ToneCurve::new(&params);
    let t = params.rlog_t;

    let below = curve.apply(t - 1e-4);
    let above = curve.apply(t + 1e-4);
    assert!((below - above).abs() < 1e-3);

    let eps = 1e-3;
    let left = (curve.apply(t) - curve.apply(t - eps)) / eps;
    let right = (curve.apply(t + eps) - curve.apply(t)) / eps;
    assert!((left - right).abs() < 1e-2, "left={left}, right={right}");
}

/// Split frame through the full engine: the sub-pivot half is identical
/// with and without highlight detail, and everything stays in range.
#[test]
fn highlight_detail_only_touches_highlights() {
    let mut input = Frame::new(32, 32, ColorSpaceTag::Bt2020Pq);
    for y in 0..32 {
        for x in 0..32 {
            let v = if x < 16 { 0.1 } else { 0.25 };
            input.pixel_mut(x, y).fill(v);
        }
    }

    let mut with_detail = local_processor();
    with_detail
        .init(Params {
            highlight_detail: 0.4,
            ..Params::default()
        })
        .unwrap();
    let enhanced = with_detail.process_frame(&input).unwrap();

    let mut without_detail = local_processor();
    without_detail
        .init(Params {
            highlight_detail: 0.0,
            ..Params::default()
        })
        .unwrap();
    let plain = without_detail.process_frame(&input).unwrap();

    for y in 0..32 {
        for x in 0..16 {
            let a = enhanced.pixel_rgb(x, y);
            let b = plain.pixel_rgb(x, y);
            for c in 0..3 {
                assert!(
                    (a[c] - b[c]).abs() < 1e-4,
                    "detail leaked below the pivot at ({x},{y})"
                );
            }
        }
    }
    for &v in enhanced.data() {
        assert!((0.0..=1.0).contains(&v));
    }
}

/// Synthetic out-of-gamut pixel targeting P3-D65 under DCI mode: stage 1
/// rescales by MaxRGB, stage 2 lands inside the unit cube, and the
/// out-of-gamut flag reports the entry state.
#[test]
fn synthetic_gamut_pixel() {
    let handler = ErrorHandler::new();
    let mut px = [1.5, 0.9, -0.1];
    let was_oog = apply_gamut_processing(&mut px, ColorSpaceTag::P3D65, true, &handler);

    assert!(was_oog);
    for c in px {
        assert!(c.is_finite());
        assert!((0.0..=1.0).contains(&c));
    }
}

/// Deterministic mode: identical input sequences produce byte-identical
/// output across independent processor instances.
#[test]
fn deterministic_runs_agree() {
    let params = Params {
        deterministic: true,
        highlight_detail: 0.4,
        ..Params::cinema_punch()
    };

    let mut input_a = Frame::new(24, 16, ColorSpaceTag::Bt2020Pq);
    for y in 0..16 {
        for x in 0..24 {
            let v = ((x * 31 + y * 17) % 97) as f32 / 96.0;
            input_a.pixel_mut(x, y).copy_from_slice(&[
                v,
                (v * 0.7 + 0.1).min(1.0),
                (v * 0.4 + 0.2).min(1.0),
            ]);
        }
    }
    let input_b = input_a.clone();

    let run = |input: &Frame| {
        let mut processor = local_processor();
        processor.init(params.clone()).unwrap();
        let first = processor.process_frame(input).unwrap();
        let second = processor.process_frame(input).unwrap();
        (first, second)
    };

    let (a1, a2) = run(&input_a);
    let (b1, b2) = run(&input_b);

    assert_eq!(a1.data(), b1.data());
    assert_eq!(a2.data(), b2.data());
}

/// Every supported color-space tag survives the round trip with finite,
/// in-gamut output.
#[test]
fn all_color_spaces_round_trip() {
    for tag in [
        ColorSpaceTag::Bt2020Pq,
        ColorSpaceTag::P3D65,
        ColorSpaceTag::AcesCg,
        ColorSpaceTag::Rec709,
    ] {
        let mut processor = local_processor();
        processor.init(Params::default()).unwrap();
        let input = Frame::filled(8, 8, [0.3, 0.2, 0.1], tag);
        let output = processor.process_frame(&input).unwrap();

        assert_eq!(output.color_space, tag);
        let (lo, hi) = tag.gamut_bounds();
        for &v in output.data() {
            assert!(v.is_finite());
            assert!(v >= lo && v <= hi, "{tag}: {v} outside [{lo}, {hi}]");
        }
    }
}

/// Statistics stay internally consistent across a batch of frames.
#[test]
fn statistics_remain_consistent() {
    let mut processor = local_processor();
    processor.init(Params::cinema_highlight()).unwrap();

    for i in 0..5 {
        let v = 0.1 + 0.15 * i as f32;
        let input = Frame::filled(16, 16, [v, v * 0.8, v * 0.6], ColorSpaceTag::Bt2020Pq);
        processor.process_frame(&input).unwrap();
    }

    let stats = processor.statistics();
    assert_eq!(stats.frame_count, 5);
    assert!(stats.is_consistent());
    assert!(stats.last_update.is_some());
}

/// A hard temporal blink trips the flicker check and surfaces HL_FLICKER.
#[test]
fn flicker_constraint_reports() {
    let processor = local_processor();

    let frames: Vec<Frame> = (0..24)
        .map(|i| {
            let v = if (i / 4) % 2 == 0 { 0.05 } else { 0.95 };
            Frame::filled(16, 16, [v, v, v], ColorSpaceTag::Bt2020Pq)
        })
        .collect();

    assert!(!processor.check_flicker(&frames, 24.0));
    assert_eq!(
        processor.last_error().unwrap().code,
        ErrorCode::HlFlicker
    );

    processor.reset_errors();
    let steady: Vec<Frame> = (0..24)
        .map(|_| Frame::filled(16, 16, [0.5, 0.5, 0.5], ColorSpaceTag::Bt2020Pq))
        .collect();
    assert!(processor.check_flicker(&steady, 24.0));
    assert!(processor.last_error().is_none());
}

/// Re-initialization re-arms the first-frame self-check and clears
/// statistics.
#[test]
fn reinit_rearms_self_check() {
    let mut processor = local_processor();
    processor.init(Params::default()).unwrap();

    let input = Frame::filled(4, 4, [0.5; 3], ColorSpaceTag::Bt2020Pq);
    processor.process_frame(&input).unwrap();
    assert_eq!(processor.statistics().frame_count, 1);

    processor.init(Params::cinema_punch()).unwrap();
    assert_eq!(processor.statistics().frame_count, 0);

    processor.process_frame(&input).unwrap();
    let stats = processor.statistics();
    assert_eq!(stats.frame_count, 1);
    assert!(stats.monotonic);
    assert!(stats.c1_continuous);
}

/// JSON bundles drive the engine end to end; unknown fields are refused.
#[test]
fn json_parameter_interface() {
    let mut processor = local_processor();
    processor
        .init_from_json(r#"{"curve": "RLOG", "rlog_t": 0.6, "sat_base": 1.1}"#)
        .unwrap();

    let input = Frame::filled(8, 8, [0.4, 0.3, 0.2], ColorSpaceTag::Bt2020Pq);
    let output = processor.process_frame(&input).unwrap();
    assert!(output.is_valid());

    assert!(processor
        .init_from_json(r#"{"curve": "RLOG", "unknown": 1}"#)
        .is_err());
}
