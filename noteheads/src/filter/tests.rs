use super::*;
use crate::spot::Interpretation;
use crate::test_utils::{add_rect_spot, params_10, FlatStaff, NoStaff, SingleStaff};

fn staves(dmz_end: i32) -> SingleStaff {
    let mut staff = FlatStaff::new(100.0, 10.0);
    staff.dmz_end = dmz_end;
    SingleStaff(staff)
}

#[test]
fn predicates_in_order() {
    let params = params_10();
    let staves = staves(50);
    let filter = CandidateFilter::new(SystemId::new(0), &params, &staves);
    let mut registry = SpotRegistry::new();

    let good = add_rect_spot(&mut registry, 100, 100, 12, 20, Shape::BeamSpot);
    let stem = add_rect_spot(&mut registry, 200, 100, 12, 20, Shape::Stem);
    let light = add_rect_spot(&mut registry, 300, 100, 8, 8, Shape::BeamSpot);
    let wide = add_rect_spot(&mut registry, 400, 100, 45, 5, Shape::Beam);
    let header = add_rect_spot(&mut registry, 40, 100, 12, 20, Shape::BeamSpot);
    let thin = add_rect_spot(&mut registry, 500, 100, 9, 20, Shape::BeamSpot);

    let check = |id| filter.rejection(registry.get(id)).unwrap();
    assert_eq!(check(good), None);
    assert_eq!(check(stem), Some(FilterRejection::NotBeamLike(Shape::Stem)));
    assert_eq!(check(light), Some(FilterRejection::TooLight { weight: 64 }));
    assert_eq!(check(wide), Some(FilterRejection::TooWide { width: 45 }));
    assert_eq!(
        check(header),
        Some(FilterRejection::InStaffHeader {
            x_min: 40,
            dmz_end: 50
        })
    );
    assert_eq!(check(thin), Some(FilterRejection::TooThin { mean_width: 9.0 }));

    assert_eq!(filter.select(&registry).unwrap(), vec![good]);
}

#[test]
fn good_beams_are_never_selected() {
    let params = params_10();
    let staves = staves(0);
    let filter = CandidateFilter::new(SystemId::new(0), &params, &staves);
    let mut registry = SpotRegistry::new();

    let good_beam = add_rect_spot(&mut registry, 100, 100, 12, 20, Shape::Beam);
    let weak_beam = add_rect_spot(&mut registry, 200, 100, 12, 20, Shape::BeamSpot);
    registry
        .get_mut(good_beam)
        .add_interpretation(Interpretation::FullBeam { grade: 0.5 });
    registry
        .get_mut(weak_beam)
        .add_interpretation(Interpretation::FullBeam { grade: 0.49 });

    assert_eq!(
        filter.rejection(registry.get(good_beam)).unwrap(),
        Some(FilterRejection::GoodBeam { grade: 0.5 })
    );
    assert_eq!(filter.select(&registry).unwrap(), vec![weak_beam]);
}

#[test]
fn weight_and_width_limits_are_inclusive() {
    let params = params_10();
    let staves = staves(0);
    let filter = CandidateFilter::new(SystemId::new(0), &params, &staves);
    let mut registry = SpotRegistry::new();

    // 75 px exactly, mean width 15.
    let at_min = add_rect_spot(&mut registry, 100, 100, 15, 5, Shape::BeamSpot);
    // 40 px wide exactly.
    let at_max = add_rect_spot(&mut registry, 200, 100, 40, 10, Shape::BeamSpot);

    assert_eq!(filter.rejection(registry.get(at_min)).unwrap(), None);
    assert_eq!(filter.rejection(registry.get(at_max)).unwrap(), None);
}

#[test]
fn missing_staff_is_an_error() {
    let params = params_10();
    let filter = CandidateFilter::new(SystemId::new(4), &params, &NoStaff);
    let mut registry = SpotRegistry::new();
    let id = add_rect_spot(&mut registry, 100, 100, 12, 20, Shape::BeamSpot);

    let err = filter.select(&registry).unwrap_err();
    assert!(matches!(err, Error::Geometry { spot, .. } if spot == id));
    assert_eq!(err.system(), SystemId::new(4));
}

#[test]
fn non_candidates_never_reach_geometry() {
    let params = params_10();
    let filter = CandidateFilter::new(SystemId::new(0), &params, &NoStaff);
    let mut registry = SpotRegistry::new();
    add_rect_spot(&mut registry, 100, 100, 12, 20, Shape::Ledger);
    add_rect_spot(&mut registry, 200, 100, 5, 5, Shape::BeamSpot);

    assert_eq!(filter.select(&registry).unwrap(), Vec::<SpotId>::new());
}
