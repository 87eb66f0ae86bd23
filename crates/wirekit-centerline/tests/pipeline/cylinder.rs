use crate::fixtures::{cylinder_mesh, triangulated_tube};
use approx::assert_relative_eq;
use wirekit_centerline::{CenterlinePipeline, PipelineConfig};
use wirekit_core::{Axis, PlaneAxes};

fn run(scale: f64) -> wirekit_centerline::PipelineOutput {
    let pipeline = CenterlinePipeline::new(PipelineConfig {
        scale,
        sample_size: 200,
        seed: 1,
        ..Default::default()
    })
    .unwrap();
    pipeline.run(&cylinder_mesh()).unwrap()
}

#[test]
fn test_cylinder_wire_diameter() {
    let output = run(1.0);
    assert_eq!(output.stats.sampled_facets, 200);
    assert!(
        (1.8..=2.2).contains(&output.wire_diameter()),
        "wire diameter {}",
        output.wire_diameter()
    );
}

#[test]
fn test_cylinder_centerline_follows_axis() {
    let output = run(1.0);
    let centerline = &output.centerline;

    assert_eq!(centerline.len(), 50);
    assert_relative_eq!(centerline.axis.x, 1.0, epsilon = 1e-9);

    let xs: Vec<f64> = centerline.points.iter().map(|p| p.x).collect();
    assert!(xs.windows(2).all(|w| w[0] < w[1]));
    for p in &centerline.points {
        assert!(p.y.abs() < 1e-4 && p.z.abs() < 1e-4);
    }
}

#[test]
fn test_cylinder_emitted_width_tracks_length() {
    for scale in [1.0, 2.5] {
        let output = run(scale);
        assert_eq!(output.path.plane, PlaneAxes::XY);

        let expected = 100.0 * scale;
        assert!(
            (output.path.width - expected).abs() <= 0.05 * expected,
            "width {} at scale {}",
            output.path.width,
            scale
        );
        assert_relative_eq!(
            output.path.stroke_width,
            output.wire_diameter() * scale,
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_cylinder_curve_counts() {
    let output = run(1.0);
    assert_eq!(output.curve.len(), 100);
    assert_eq!(output.number_of_curves(), 33);
    assert_eq!(output.path.curve_count(), 33);
    assert!(output.curve.residual <= output.curve.tolerance);
}

fn run_tube(scale: f64) -> wirekit_centerline::PipelineOutput {
    let pipeline = CenterlinePipeline::new(PipelineConfig {
        scale,
        sample_size: 200,
        seed: 1,
        ..Default::default()
    })
    .unwrap();
    pipeline.run(&triangulated_tube(1.0, 100.0, 50, 12)).unwrap()
}

#[test]
fn test_tessellated_tube_is_sampled_down() {
    let output = run_tube(1.0);
    assert_eq!(output.stats.input_facets, 1200);
    assert_eq!(output.stats.sampled_facets, 200);
    assert!(output.stats.degenerate_pairs > 0);
}

#[test]
fn test_tessellated_tube_centerline_runs_along_x() {
    let output = run_tube(1.0);
    let points = &output.centerline.points;

    assert!(points.len() > 50);
    assert!(output.centerline.axis.x > 0.99);
    assert!(points.windows(2).all(|w| w[0].x <= w[1].x));
    for p in points {
        assert!(p.y.abs() < 1.0 && p.z.abs() < 1.0, "{:?} is off axis", p);
    }
}

#[test]
fn test_tessellated_tube_is_drawn_lengthwise() {
    for scale in [1.0, 2.5] {
        let output = run_tube(scale);
        assert_eq!(output.path.plane.horizontal, Axis::X);

        let expected = 100.0 * scale;
        assert!(
            (output.path.width - expected).abs() <= 0.05 * expected,
            "width {} at scale {}",
            output.path.width,
            scale
        );
        assert!(output.path.height < 0.05 * expected);
    }
}
