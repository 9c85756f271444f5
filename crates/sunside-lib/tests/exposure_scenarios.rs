mod common;

use common::{city_loop, eastbound, utc};
use sunside_lib::{
    analyze_exposure, Coordinate, Error, Exposure, ExposureSummary, SegmenterConfig, SunSide,
};

fn config() -> SegmenterConfig {
    SegmenterConfig::default()
}

#[test]
fn midnight_segment_has_no_sun() {
    let points = [Coordinate::new(51.5, -0.09), Coordinate::new(51.51, -0.08)];
    let report = analyze_exposure(&points, utc(2024, 1, 15, 0, 0), &config()).expect("report");

    assert_eq!(report.segments.len(), 1);
    assert_eq!(report.segments[0].side, SunSide::NoSun);
    assert_eq!(report.tally.left_ms, 0.0);
    assert_eq!(report.tally.right_ms, 0.0);
    assert!(report.tally.no_sun_ms > 0.0);
}

#[test]
fn eastbound_at_solar_noon_has_sun_on_the_right() {
    let points = [Coordinate::new(51.5, -0.09), Coordinate::new(51.5, -0.05)];
    let report = analyze_exposure(&points, utc(2024, 6, 21, 12, 0), &config()).expect("report");

    let segment = &report.segments[0];
    assert!((segment.sun.azimuth - 180.0).abs() < 3.0);
    assert!((segment.heading_deg - 90.0).abs() < 0.1);
    assert!((segment.relative_angle_deg - 90.0).abs() < 3.0);
    assert_eq!(segment.side, SunSide::Right);
    assert_eq!(report.tally.right_ms, segment.duration_ms);
}

#[test]
fn eastbound_on_a_summer_evening_has_sun_on_the_left() {
    let points = [Coordinate::new(51.5, -0.09), Coordinate::new(51.5, -0.05)];
    let report = analyze_exposure(&points, utc(2024, 6, 21, 18, 30), &config()).expect("report");

    let segment = &report.segments[0];
    assert!(segment.sun.azimuth > 270.0, "azimuth {}", segment.sun.azimuth);
    assert!(segment.sun.altitude > 0.0);
    assert!(segment.relative_angle_deg < 0.0);
    assert_eq!(segment.side, SunSide::Left);
    assert_eq!(report.left_percent(), 100);
    assert_eq!(report.right_percent(), 0);
}

#[test]
fn night_route_reports_darkness_not_nan() {
    let report =
        analyze_exposure(&eastbound(), utc(2024, 1, 15, 0, 0), &config()).expect("report");

    assert!(report.is_dark());
    assert_eq!((report.left_percent(), report.right_percent()), (0, 0));
    assert!(report
        .segments
        .iter()
        .all(|segment| segment.side == SunSide::NoSun));

    let summary = ExposureSummary::from_report(&report).expect("summary");
    assert_eq!(summary.exposure, Exposure::Darkness);
    assert_eq!(summary.dominant_side, None);
}

#[test]
fn loop_route_splits_sun_between_sides() {
    let report =
        analyze_exposure(&city_loop(), utc(2024, 6, 21, 16, 0), &config()).expect("report");

    let sides: Vec<SunSide> = report.segments.iter().map(|s| s.side).collect();
    assert_eq!(
        sides,
        vec![SunSide::Right, SunSide::Left, SunSide::Left, SunSide::Right]
    );
    assert_eq!(report.left_percent() + report.right_percent(), 100);
    assert!(report.tally.left_ms > 0.0 && report.tally.right_ms > 0.0);
}

#[test]
fn tallies_account_for_all_elapsed_time() {
    for start in [
        utc(2024, 6, 21, 12, 0),
        utc(2024, 6, 21, 16, 0),
        utc(2024, 1, 15, 0, 0),
        utc(2024, 3, 20, 6, 30),
    ] {
        for points in [eastbound(), city_loop()] {
            let report = analyze_exposure(&points, start, &config()).expect("report");
            let tally = report.tally;
            let accounted = tally.left_ms + tally.right_ms + tally.no_sun_ms;
            assert!((accounted - report.total_duration_ms).abs() < 1e-6);
            assert!(tally.left_ms + tally.right_ms <= report.total_duration_ms + 1e-6);

            let segment_sum: f64 = report.segments.iter().map(|s| s.duration_ms).sum();
            assert!((segment_sum - report.total_duration_ms).abs() < 1e-6);

            let (left, right) = tally.percentages();
            if report.is_dark() {
                assert_eq!((left, right), (0, 0));
            } else {
                assert_eq!(u16::from(left) + u16::from(right), 100);
            }
        }
    }
}

#[test]
fn clock_is_monotonic_across_segments() {
    let report =
        analyze_exposure(&eastbound(), utc(2024, 6, 21, 12, 0), &config()).expect("report");
    for pair in report.segments.windows(2) {
        assert!(pair[1].start_time >= pair[0].start_time);
        assert!(
            (pair[1].start_offset_ms - (pair[0].start_offset_ms + pair[0].duration_ms)).abs()
                < 1e-6
        );
    }
}

#[test]
fn analysis_is_idempotent() {
    let start = utc(2024, 6, 21, 16, 0);
    let first = analyze_exposure(&city_loop(), start, &config()).expect("report");
    let second = analyze_exposure(&city_loop(), start, &config()).expect("report");
    assert_eq!(first, second);
}

#[test]
fn two_points_make_one_segment() {
    let points = [Coordinate::new(10.0, 10.0), Coordinate::new(10.1, 10.1)];
    let report = analyze_exposure(&points, utc(2024, 6, 21, 12, 0), &config()).expect("report");
    assert_eq!(report.segments.len(), 1);
    assert_eq!(report.segments[0].index, 0);
}

#[test]
fn fewer_than_two_points_is_invalid_route() {
    let start = utc(2024, 6, 21, 12, 0);
    assert!(matches!(
        analyze_exposure(&[], start, &config()),
        Err(Error::InvalidRoute { .. })
    ));
    assert!(matches!(
        analyze_exposure(&[Coordinate::new(51.5, -0.09)], start, &config()),
        Err(Error::InvalidRoute { .. })
    ));
}

#[test]
fn slower_speed_stretches_the_trip() {
    let start = utc(2024, 6, 21, 12, 0);
    let fast = analyze_exposure(&eastbound(), start, &SegmenterConfig::with_speed(50.0))
        .expect("report");
    let slow = analyze_exposure(&eastbound(), start, &SegmenterConfig::with_speed(15.0))
        .expect("report");
    let ratio = slow.total_duration_ms / fast.total_duration_ms;
    assert!((ratio - 50.0 / 15.0).abs() < 1e-9);
    assert_eq!(fast.total_distance_km, slow.total_distance_km);
}

#[test]
fn invalid_speed_is_rejected_before_traversal() {
    let err = analyze_exposure(
        &eastbound(),
        utc(2024, 6, 21, 12, 0),
        &SegmenterConfig::with_speed(0.0),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[test]
fn clock_overflow_is_invalid_time() {
    let err = analyze_exposure(
        &eastbound(),
        chrono::DateTime::<chrono::Utc>::MAX_UTC,
        &config(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidTime { .. }));
}

#[test]
fn vanishing_speed_is_rejected_instead_of_inflating_the_tally() {
    let points = [Coordinate::new(51.5, -0.09), Coordinate::new(51.5, -0.05)];
    let err = analyze_exposure(
        &points,
        utc(2024, 6, 21, 12, 0),
        &SegmenterConfig::with_speed(1e-305),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }), "{err}");
}
