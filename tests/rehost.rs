#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use opening_host::document::{
    Document, ElementId, FootprintSketch, MemoryDocument, OpeningDimensions, OpeningPlacement, OpeningType,
};
use opening_host::geometry::curve::TrimmedCurve;
use opening_host::hosting::{rehost_openings, RunError};
use opening_host::math::{from_mm, to_mm, Point3, Vector3};
use opening_host::HostingConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

const FAMILY: &str = "GEN-CSC-Opening-Rectangular";

fn init_tracing() {
    let env_filter = EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

fn p_mm(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(from_mm(x), from_mm(y), from_mm(z))
}

struct Scene {
    doc: MemoryDocument,
    slab: ElementId,
}

/// A 200 mm slab with its top at z = 0 and both reference grids 1 m off the origin.
fn scene(grids: &[&str]) -> Scene {
    init_tracing();
    let mut doc = MemoryDocument::new();
    let slab = doc
        .add_slab(
            vec![
                p_mm(-3000.0, -3000.0, 0.0),
                p_mm(3000.0, -3000.0, 0.0),
                p_mm(3000.0, 3000.0, 0.0),
                p_mm(-3000.0, 3000.0, 0.0),
            ],
            from_mm(200.0),
        )
        .unwrap();
    if grids.contains(&"13") {
        let x_line = TrimmedCurve::segment(p_mm(-1000.0, -5000.0, 0.0), p_mm(-1000.0, 5000.0, 0.0)).unwrap();
        doc.add_grid("13", x_line);
    }
    if grids.contains(&"AA") {
        let y_line = TrimmedCurve::segment(p_mm(-5000.0, -1000.0, 0.0), p_mm(5000.0, -1000.0, 0.0)).unwrap();
        doc.add_grid("AA", y_line);
    }
    Scene { doc, slab }
}

fn add_candidate(doc: &mut MemoryDocument, sketch: FootprintSketch, at: Point3) -> ElementId {
    let ty = OpeningType::new(FAMILY, "600x400", sketch);
    let dims = OpeningDimensions {
        width: from_mm(600.0),
        height: from_mm(400.0),
        depth: from_mm(150.0),
    };
    doc.add_opening(&ty, OpeningPlacement::level(at, Vector3::x()), dims)
        .unwrap()
}

fn param_mm(doc: &MemoryDocument, id: ElementId, name: &str) -> f64 {
    to_mm(doc.parameter(id, name).unwrap())
}

#[test]
fn consistent_orientation_keeps_dimensions() {
    let Scene { mut doc, slab } = scene(&["13", "AA"]);
    let candidate = add_candidate(&mut doc, FootprintSketch::WidthFirst, Point3::origin());

    let report = rehost_openings(&mut doc, &HostingConfig::default()).unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed, 0);
    let placed = report.placements[0];
    assert!(!placed.swapped);
    assert_eq!(placed.slab, slab);

    let instance = report.created[0];
    assert_relative_eq!(param_mm(&doc, instance, "CSC-MEP-Width"), 600.0, epsilon = 1e-9);
    assert_relative_eq!(param_mm(&doc, instance, "CSC-MEP-Height"), 400.0, epsilon = 1e-9);
    assert_relative_eq!(param_mm(&doc, instance, "CSC-MEP-Depth"), 220.0, epsilon = 1e-9);
    assert!(!doc.contains(candidate));
    assert!(report.log.contains("boundary distances consistent, no swap"));
    assert!(report.log.contains("PRE boundary distance X(13)=700.00mm"));
    assert!(report.log.contains("POST boundary distance Y(AA)=800.00mm"));
}

#[test]
fn crossed_orientation_swaps_width_and_height() {
    let Scene { mut doc, .. } = scene(&["13", "AA"]);
    add_candidate(&mut doc, FootprintSketch::HeightFirst, Point3::origin());

    let report = rehost_openings(&mut doc, &HostingConfig::default()).unwrap();

    assert_eq!(report.succeeded(), 1);
    let placed = report.placements[0];
    assert!(placed.swapped);
    let instance = placed.instance;
    assert_relative_eq!(param_mm(&doc, instance, "CSC-MEP-Width"), 400.0, epsilon = 1e-9);
    assert_relative_eq!(param_mm(&doc, instance, "CSC-MEP-Height"), 600.0, epsilon = 1e-9);

    // Same physical extents as the original: 600 mm along X, 400 mm along Y.
    let aabb = doc.bounding_box(instance).unwrap().unwrap();
    assert_relative_eq!(to_mm(aabb.size().x), 600.0, epsilon = 1e-9);
    assert_relative_eq!(to_mm(aabb.size().y), 400.0, epsilon = 1e-9);

    assert!(report.log.contains("POST boundary distance X(13)=800.00mm"));
    assert!(report.log.contains("X axis mismatch: PRE=700.00mm, POST=800.00mm, diff=100.00mm"));
    assert!(report.log.contains("swapping width and height"));
    assert!(report.log.contains("POST2 boundary distance X(13)=700.00mm"));
    assert!(report.log.contains("POST2 boundary distance Y(AA)=800.00mm"));
}

#[test]
fn candidate_without_host_face_fails_and_batch_continues() {
    let Scene { mut doc, .. } = scene(&["13", "AA"]);
    let hosted = add_candidate(&mut doc, FootprintSketch::WidthFirst, Point3::origin());
    let stray = add_candidate(&mut doc, FootprintSketch::WidthFirst, p_mm(20_000.0, 0.0, 0.0));

    let report = rehost_openings(&mut doc, &HostingConfig::default()).unwrap();

    assert_eq!(report.total, 2);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed, 1);
    assert!(!doc.contains(hosted));
    assert!(doc.contains(stray));
    assert!(report.log.contains(&format!("element {stray} no horizontal host face found")));
    // Slab, two grids, the stray candidate and the one replacement.
    assert_eq!(doc.element_count(), 5);
}

#[test]
fn already_hosted_candidate_is_left_alone_and_not_counted() {
    let Scene { mut doc, slab } = scene(&["13", "AA"]);
    let source = add_candidate(&mut doc, FootprintSketch::WidthFirst, p_mm(1500.0, 1500.0, 0.0));
    let top = doc.solid_faces(slab, true).unwrap()[0].reference.unwrap();
    let hosted = doc
        .create_on_face(source, top, p_mm(1500.0, 1500.0, 0.0), Vector3::x())
        .unwrap();
    doc.delete(source).unwrap();
    add_candidate(&mut doc, FootprintSketch::WidthFirst, Point3::origin());

    let report = rehost_openings(&mut doc, &HostingConfig::default()).unwrap();

    assert_eq!(report.already_hosted, 1);
    assert_eq!(report.total, 1);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed, 0);
    assert!(doc.contains(hosted));
    assert_eq!(doc.host_face(hosted), Some(top));
    assert!(report.log.contains(&format!("already hosted by slab {slab}")));
}

#[test]
fn unreadable_thickness_keeps_original_depth() {
    let Scene { mut doc, slab } = scene(&["13", "AA"]);
    add_candidate(&mut doc, FootprintSketch::WidthFirst, Point3::origin());
    doc.clear_slab_thickness(slab).unwrap();

    let report = rehost_openings(&mut doc, &HostingConfig::default()).unwrap();

    let instance = report.created[0];
    assert_relative_eq!(param_mm(&doc, instance, "CSC-MEP-Depth"), 150.0, epsilon = 1e-9);
    assert!(report.log.contains("thickness unreadable"));
}

#[test]
fn placed_instance_sits_on_the_selected_face() {
    let Scene { mut doc, slab } = scene(&["13", "AA"]);
    add_candidate(&mut doc, FootprintSketch::WidthFirst, p_mm(500.0, -250.0, 50.0));

    let report = rehost_openings(&mut doc, &HostingConfig::default()).unwrap();

    let instance = report.created[0];
    let location = doc.location_point(instance).unwrap().unwrap();
    assert_relative_eq!(to_mm(location.x), 500.0, epsilon = 1e-9);
    assert_relative_eq!(to_mm(location.y), -250.0, epsilon = 1e-9);
    assert_relative_eq!(location.z, 0.0, epsilon = 1e-12);
    let host = doc.host_face(instance).unwrap();
    assert_eq!(host.element, slab);
    assert_eq!(doc.solid_faces(slab, true).unwrap()[0].face, host.face);
}

#[test]
fn candidate_over_slab_edge_keeps_its_original_point() {
    let Scene { mut doc, slab } = scene(&["13", "AA"]);
    // Footprint spans x = 2900..3500 mm, the slab ends at 3000 mm.
    add_candidate(&mut doc, FootprintSketch::WidthFirst, p_mm(3200.0, 0.0, 0.0));

    let report = rehost_openings(&mut doc, &HostingConfig::default()).unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed, 0);
    assert!(report.log.contains("projection onto host face failed, placing at original point"));
    let instance = report.created[0];
    assert_eq!(doc.host_face(instance).unwrap().element, slab);
    let location = doc.location_point(instance).unwrap().unwrap();
    assert_relative_eq!(to_mm(location.x), 3200.0, epsilon = 1e-9);
    assert_relative_eq!(to_mm(location.y), 0.0, epsilon = 1e-9);
    assert_relative_eq!(location.z, 0.0, epsilon = 1e-12);
}

#[test]
fn single_missing_grid_only_warns() {
    let Scene { mut doc, .. } = scene(&["13"]);
    add_candidate(&mut doc, FootprintSketch::WidthFirst, Point3::origin());

    let report = rehost_openings(&mut doc, &HostingConfig::default()).unwrap();

    assert_eq!(report.succeeded(), 1);
    assert!(report.log.contains("grid AA not found, Y distance check skipped"));
    assert!(!report.log.contains("Y(AA)"));
}

#[test]
fn missing_grids_abort_before_any_mutation() {
    let Scene { mut doc, .. } = scene(&[]);
    let candidate = add_candidate(&mut doc, FootprintSketch::WidthFirst, Point3::origin());
    let before = doc.element_count();

    let aborted = rehost_openings(&mut doc, &HostingConfig::default()).unwrap_err();

    assert!(matches!(aborted.error, RunError::NoReferenceLines { .. }));
    assert_eq!(aborted.log.entries().len(), 3);
    assert!(doc.contains(candidate));
    assert_eq!(doc.element_count(), before);
    assert!(doc.committed_transactions().is_empty());
}

#[test]
fn no_candidates_abort() {
    let Scene { mut doc, .. } = scene(&["13", "AA"]);
    let aborted = rehost_openings(&mut doc, &HostingConfig::default()).unwrap_err();
    assert!(matches!(aborted.error, RunError::NoCandidates(_)));
    assert!(aborted.to_string().contains(FAMILY));
}

#[test]
fn run_commits_one_transaction_and_leaves_no_probes() {
    let Scene { mut doc, .. } = scene(&["13", "AA"]);
    add_candidate(&mut doc, FootprintSketch::HeightFirst, Point3::origin());
    add_candidate(&mut doc, FootprintSketch::WidthFirst, p_mm(20_000.0, 0.0, 0.0));
    add_candidate(&mut doc, FootprintSketch::WidthFirst, p_mm(1500.0, 1500.0, 0.0));

    let report = rehost_openings(&mut doc, &HostingConfig::default()).unwrap();

    assert_eq!(doc.committed_transactions().len(), 1);
    assert!(!doc.in_transaction());
    // Slab, two grids, one failed candidate left in place, two replacements.
    assert_eq!(doc.element_count(), 6);
    assert_eq!(doc.geometry().solid_count(), 4);
    assert_eq!(report.succeeded(), 2);
}

#[test]
fn face_selection_is_deterministic() {
    let run = || {
        let Scene { mut doc, .. } = scene(&["13", "AA"]);
        add_candidate(&mut doc, FootprintSketch::HeightFirst, Point3::origin());
        let report = rehost_openings(&mut doc, &HostingConfig::default()).unwrap();
        let instance = report.created[0];
        (report.placements[0], doc.host_face(instance))
    };
    assert_eq!(run(), run());
}

#[test]
fn log_file_ends_with_summary() {
    let Scene { mut doc, .. } = scene(&["13", "AA"]);
    add_candidate(&mut doc, FootprintSketch::WidthFirst, Point3::origin());
    let dir = std::env::temp_dir().join(format!("opening-host-run-{}", std::process::id()));
    let path = dir.join("logs").join("rehost.log");
    let config = HostingConfig {
        log_path: Some(path.clone()),
        ..HostingConfig::default()
    };

    let report = rehost_openings(&mut doc, &config).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let last = text.lines().last().unwrap();
    assert!(last.ends_with(" - summary: total openings: 1, succeeded: 1, failed: 0"));
    assert_eq!(text.lines().count() + 1, report.log.entries().len());
    assert!(report.log.lines().last().unwrap().contains("log written to"));
    std::fs::remove_dir_all(&dir).unwrap();
}
