//! End-to-end corridor analysis over a synthetic two-tract region.
//!
//! Two adjacent 100x100 tracts with populations [100, 200] (subgroup A
//! [30, 50], subgroup B [70, 150]) and one road bisecting both. Buffering
//! wide enough to swallow the whole region must recover the full
//! population in the corridor estimate, and subgroup-A composition must
//! come out at 80/300.

use geo::{line_string, polygon, Area, BooleanOps};
use geotract_algorithms::prelude::*;

fn synthetic_tracts() -> GeoTable {
    let mut table = GeoTable::new(Crs::from_epsg(32611));
    let specs = [
        (0.0, 100.0, 30.0, 70.0),
        (100.0, 200.0, 50.0, 150.0),
    ];
    for (x0, pop, a, b) in specs {
        let mut f = Feature::new(geo::Geometry::Polygon(polygon![
            (x: x0, y: 0.0),
            (x: x0 + 100.0, y: 0.0),
            (x: x0 + 100.0, y: 100.0),
            (x: x0, y: 100.0),
            (x: x0, y: 0.0),
        ]));
        f.set_property("n_total_pop", AttributeValue::Float(pop));
        f.set_property("n_group_a", AttributeValue::Float(a));
        f.set_property("n_group_b", AttributeValue::Float(b));
        table.push(f);
    }
    table
}

fn synthetic_roads() -> GeoTable {
    let mut roads = GeoTable::new(Crs::from_epsg(32611));
    // Bisects both tracts horizontally, overshooting the region on
    // both ends so the clip step has something to cut.
    roads.push(Feature::new(geo::Geometry::LineString(line_string![
        (x: -50.0, y: 50.0),
        (x: 250.0, y: 50.0),
    ])));
    roads
}

fn variables() -> Vec<String> {
    vec![
        "n_total_pop".to_string(),
        "n_group_a".to_string(),
        "n_group_b".to_string(),
    ]
}

#[test]
fn full_buffer_recovers_total_population() {
    let tracts = synthetic_tracts();
    let roads = synthetic_roads();

    let region = region_boundary(&tracts).unwrap();
    let clipped = clip_roads(&roads, &region).unwrap();
    assert_eq!(clipped.len(), 1);

    // Buffer wide enough to cover the whole 200x100 region
    let params = BufferParams {
        distance: 500.0,
        segments: 32,
    };
    let buffered = corridor(&clipped, &params).unwrap();

    // The interpolation target is the corridor restricted to the region
    let target = buffered.intersection(&region);
    assert!(target.unsigned_area() > 0.0);

    let estimates = area_interpolate(&tracts, &[region.clone(), target], &variables()).unwrap();

    let totals = estimates.numeric_column("n_total_pop").unwrap();
    let region_total = totals[0].unwrap();
    let corridor_total = totals[1].unwrap();
    assert!(
        (region_total - 300.0).abs() < 1e-6,
        "region total {region_total} should be 300"
    );
    assert!(
        (corridor_total - 300.0).abs() < 1e-6,
        "corridor total {corridor_total} should be 300"
    );

    let rows = composition(
        &estimates,
        "n_total_pop",
        &["n_group_a".to_string(), "n_group_b".to_string()],
    )
    .unwrap();
    let share_a = rows[1].shares["n_group_a"];
    assert!(
        (share_a - 80.0 / 300.0).abs() < 1e-6,
        "corridor subgroup-A share {share_a} should be ~0.267"
    );
}

#[test]
fn narrow_buffer_stays_below_total() {
    let tracts = synthetic_tracts();
    let roads = synthetic_roads();

    let region = region_boundary(&tracts).unwrap();
    let clipped = clip_roads(&roads, &region).unwrap();

    let params = BufferParams {
        distance: 10.0,
        segments: 32,
    };
    let buffered = corridor(&clipped, &params).unwrap();
    let target = buffered.intersection(&region);

    let estimates = area_interpolate(&tracts, &[target], &variables()).unwrap();
    let corridor_total = estimates.numeric_column("n_total_pop").unwrap()[0].unwrap();

    // A 10-unit half-width band across a 100-unit-tall region holds ~20%
    // of each tract's area, so roughly 60 people; never the full 300.
    assert!(corridor_total > 0.0);
    assert!(
        corridor_total < 300.0,
        "narrow corridor captured everything ({corridor_total})"
    );
    assert!(
        (corridor_total - 60.0).abs() < 5.0,
        "expected ~60, got {corridor_total}"
    );
}

#[test]
fn roads_missing_the_region_fail_at_corridor_step() {
    let tracts = synthetic_tracts();
    let mut roads = GeoTable::new(Crs::from_epsg(32611));
    roads.push(Feature::new(geo::Geometry::LineString(line_string![
        (x: 1000.0, y: 1000.0),
        (x: 2000.0, y: 1000.0),
    ])));

    let region = region_boundary(&tracts).unwrap();
    let clipped = clip_roads(&roads, &region).unwrap();
    assert!(clipped.is_empty());

    let err = corridor(&clipped, &BufferParams::default());
    assert!(matches!(err, Err(Error::EmptyCorridor)));
}
