//! End-to-end tests for the drawing pipeline.
//!
//! These drive whole runs through the public API: configuration, the
//! animation loop with a scheduler, and both drawing surfaces.

use std::collections::HashMap;

use pendulograph::prelude::*;
use pendulograph::{CanvasGeometry, DrawCommand, BLIT_SOURCE};

/// Grants every frame and counts how many were requested.
#[derive(Default)]
struct CountingScheduler {
    scheduled: u64,
}

impl FrameScheduler for CountingScheduler {
    fn next_frame(&mut self) -> bool {
        self.scheduled += 1;
        true
    }
}

fn single_track_config() -> SimulationConfig {
    SimulationConfig {
        gravity: 9.8,
        radius: 100.0,
        omega: 0.0,
        velocity: 0.0,
        resolution: 0.99,
        time: 1.0,
        num_colors: 1,
        ..Default::default()
    }
}

// ============================================================================
// Full runs
// ============================================================================

#[test]
fn test_short_run_finishes_near_start() {
    let config = single_track_config();
    let mut animation = Animation::new(&config).unwrap();
    let initial_angle = animation.frame().pendulum.angle;
    let mut surface = RecordingSurface::new();
    let mut scheduler = CountingScheduler::default();

    let summary = animation.run(&mut surface, &mut scheduler).unwrap();

    assert_eq!(animation.state(), AnimationState::Finished);
    assert!(!summary.cancelled);
    // Three steps of dt = 0.01 per frame over one simulated second.
    assert!(scheduler.scheduled >= 33, "only {} frames", scheduler.scheduled);
    assert_eq!(summary.frames, scheduler.scheduled);
    assert!(summary.elapsed >= 1.0);

    // The period on a 20000 unit string is close to five minutes, so one
    // second barely moves the pendulum.
    assert!((summary.pendulum.angle - initial_angle).abs() < 1e-4);
    assert!(summary.energy_drift.abs() < 1e-6);
}

#[test]
fn test_radius_beyond_string_is_rejected_before_drawing() {
    let config = SimulationConfig {
        radius: 25000.0,
        ..single_track_config()
    };
    let mut surface = RecordingSurface::new();
    let mut scheduler = CountingScheduler::default();

    let result = Animation::new(&config)
        .map(|mut animation| animation.run(&mut surface, &mut scheduler));

    assert!(matches!(
        result,
        Err(SimulationError::ConfigurationOutOfRange { field: "r", .. })
    ));
    assert_eq!(scheduler.scheduled, 0);
    assert!(surface.commands().is_empty());
}

#[test]
fn test_run_emits_clear_then_stroke_triplets() {
    let config = SimulationConfig {
        time: 0.02,
        ..single_track_config()
    };
    let mut animation = Animation::new(&config).unwrap();
    let mut surface = RecordingSurface::new();
    animation
        .run(&mut surface, &mut ImmediateScheduler::new())
        .unwrap();

    let commands = surface.commands();
    assert!(matches!(commands[0], DrawCommand::Clear { .. }));
    assert_eq!(commands[1], DrawCommand::LineWidth(2.0));
    assert_eq!(commands[2], DrawCommand::LineJoin(LineJoin::Round));

    // Everything after setup is whole six-call strokes in the default color.
    let strokes = &commands[3..];
    assert_eq!(strokes.len() % 6, 0);
    for stroke in strokes.chunks(6) {
        assert_eq!(stroke[0], DrawCommand::StrokeColor(Color::from("#e6194b")));
        assert_eq!(stroke[1], DrawCommand::BeginPath);
        assert!(matches!(stroke[2], DrawCommand::MoveTo(..)));
        assert!(matches!(stroke[3], DrawCommand::LineTo(..)));
        assert!(matches!(stroke[4], DrawCommand::LineTo(..)));
        assert_eq!(stroke[5], DrawCommand::Stroke);
    }
    // One frame, one track: 12 interpolated points, 10 triplets.
    assert_eq!(surface.strokes(), 10);
}

#[test]
fn test_field_overrides_drive_a_run() {
    let fields: HashMap<String, String> = [
        ("r", "300"),
        ("v", "50"),
        ("time", "0.3"),
        ("num-colors", "2"),
        ("color2", "#00ff00"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let mut config = SimulationConfig::default();
    config.apply_fields(&fields).unwrap();
    assert_eq!(config.radius, 300.0);
    assert_eq!(config.palette[1], Color::from("#00ff00"));

    let mut animation = Animation::new(&config).unwrap();
    let mut surface = RecordingSurface::new();
    let summary = animation
        .run(&mut surface, &mut ImmediateScheduler::new())
        .unwrap();

    assert_eq!(animation.environment().track_count(), 2);
    assert_eq!(surface.strokes() as u64, summary.frames * 10 * 2);
}

#[test]
fn test_invalid_override_leaves_config_untouched() {
    let fields: HashMap<String, String> = [("g", "9.8"), ("r", "far")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let mut config = SimulationConfig::default();
    let err = config.apply_fields(&fields).unwrap_err();

    assert!(matches!(err, SimulationError::InvalidOperand { ref field, .. } if field == "r"));
    assert_eq!(config, SimulationConfig::default());
}

#[test]
fn test_json_config_round_trips_through_a_run() {
    let json = r#"{ "radius": 250.0, "time": 0.1, "num_colors": 1 }"#;
    let config = SimulationConfig::from_json(json).unwrap();
    assert_eq!(config.gravity, 9.8);

    let mut animation = Animation::new(&config).unwrap();
    let summary = animation
        .run(&mut RecordingSurface::new(), &mut ImmediateScheduler::new())
        .unwrap();
    assert_eq!(summary.frames, 4);
}

// ============================================================================
// Raster canvas
// ============================================================================

#[test]
fn test_raster_run_leaves_ink_on_canvas() {
    let config = SimulationConfig {
        radius: 50.0,
        velocity: 20.0,
        time: 0.5,
        color_radius: 20.0,
        num_colors: 2,
        canvas: CanvasGeometry {
            width: 200.0,
            height: 200.0,
            string_length: 2000.0,
        },
        ..Default::default()
    };
    let mut animation = Animation::new(&config).unwrap();
    let mut canvas = Canvas::new(200, 200);
    animation
        .run(&mut canvas, &mut ImmediateScheduler::new())
        .unwrap();

    assert_eq!(canvas.dimensions(), (200, 200));
    assert_eq!(canvas.line_join(), LineJoin::Round);

    let inked = canvas
        .image()
        .pixels()
        .filter(|p| p.0 != [255, 255, 255, 255])
        .count();
    assert!(inked > 0);

    // Corners are far from the tip orbit and stay blank.
    assert_eq!(canvas.image().get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(canvas.image().get_pixel(199, 199).0, [255, 255, 255, 255]);
}

#[test]
fn test_cancelled_raster_run_still_saves() {
    let config = SimulationConfig {
        canvas: CanvasGeometry {
            width: 64.0,
            height: 64.0,
            string_length: 20000.0,
        },
        radius: 10.0,
        color_radius: 5.0,
        ..Default::default()
    };
    let mut animation = Animation::new(&config).unwrap();
    let mut canvas = Canvas::new(64, 64);
    let summary = animation
        .run(&mut canvas, &mut ImmediateScheduler::with_limit(3))
        .unwrap();
    assert!(summary.cancelled);
    assert_eq!(summary.frames, 3);

    let path = std::env::temp_dir().join("pendulograph_cancelled_run.png");
    canvas.save_png(&path).unwrap();
    let reloaded = image::open(&path).unwrap();
    assert_eq!(reloaded.width(), 64);
    std::fs::remove_file(&path).ok();
}

// ============================================================================
// Blit shader
// ============================================================================

#[test]
fn test_blit_shader_validates() {
    let module = naga::front::wgsl::parse_str(BLIT_SOURCE)
        .map_err(|e| format!("WGSL parse error: {:?}", e))
        .unwrap();

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))
        .unwrap();

    let entry_points: Vec<&str> = module
        .entry_points
        .iter()
        .map(|ep| ep.name.as_str())
        .collect();
    assert!(entry_points.contains(&"vs_main"));
    assert!(entry_points.contains(&"fs_main"));
}
