use super::*;
use crate::test_utils::raster_from_ascii;
use glam::IVec2;

fn pool() -> (SpotRegistry, Vec<Registration>) {
    let art = "\
        ##..###\n\
        ##..###\n\
        .......\n\
        ..#....";
    let raster = raster_from_ascii(IVec2::new(10, 20), art);
    let mut registry = SpotRegistry::new();
    let registrations =
        registry.register_raster(&raster, DomainKind::Spot, Shape::BeamSpot, Connectivity::Four);
    (registry, registrations)
}

#[test]
fn registers_every_region() {
    let (registry, registrations) = pool();

    assert_eq!(registry.len(), 3);
    assert!(registrations.iter().all(|r| !r.reused));
    let ids: Vec<usize> = registrations.iter().map(|r| r.id.index()).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert!(registry.iter().all(|s| s.shape() == Shape::BeamSpot));
    assert_eq!(registry.get(registrations[1].id).region().weight(), 6);
}

#[test]
fn same_footprint_is_reused_and_sections_dropped() {
    let (mut registry, registrations) = pool();
    let first = registrations[0].id;

    // The 2x2 block again, extracted into the head domain.
    let block = raster_from_ascii(IVec2::new(10, 20), "##\n##");
    let again =
        registry.register_raster(&block, DomainKind::Head, Shape::HeadSpot, Connectivity::Four);

    assert_eq!(again, vec![Registration { id: first, reused: true }]);
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.get(first).shape(), Shape::BeamSpot);

    let head = registry.domain(DomainKind::Head);
    assert_eq!(head.len(), 1);
    assert_eq!(head.alive_count(), 0);
}

#[test]
fn shifted_footprint_is_a_new_spot() {
    let (mut registry, _) = pool();
    let block = raster_from_ascii(IVec2::new(11, 20), "##\n##");
    let regs =
        registry.register_raster(&block, DomainKind::Head, Shape::HeadSpot, Connectivity::Four);

    assert_eq!(regs.len(), 1);
    assert!(!regs[0].reused);
    assert_eq!(registry.len(), 4);
    assert_eq!(registry.get(regs[0].id).shape(), Shape::HeadSpot);
    assert_eq!(registry.domain(DomainKind::Head).alive_count(), 1);
}

#[test]
fn find_footprint_checks_pixels() {
    let (registry, registrations) = pool();
    let dot = registry.get(registrations[2].id).region().clone();
    assert_eq!(registry.find_footprint(&dot), Some(registrations[2].id));

    let mut domain = SectionDomain::scratch();
    let other = extract_regions(
        &raster_from_ascii(IVec2::new(12, 23), "##"),
        &mut domain,
        Connectivity::Four,
    );
    assert_eq!(registry.find_footprint(&other[0]), None);
}

#[test]
fn spots_keep_their_domain_sections() {
    let (registry, registrations) = pool();
    let spot = registry.get(registrations[1].id);
    let domain = registry.domain(DomainKind::Spot);

    assert_eq!(spot.region().domain(), DomainKind::Spot);
    let weight: usize = spot
        .region()
        .sections()
        .iter()
        .map(|&id| domain.section(id).weight())
        .sum();
    assert_eq!(weight, spot.region().weight());
}

#[test]
#[should_panic(expected = "scratch sections are never registered")]
fn scratch_regions_cannot_be_registered() {
    let (mut registry, _) = pool();
    let mut domain = SectionDomain::scratch();
    let regions = extract_regions(
        &raster_from_ascii(IVec2::new(40, 40), "###"),
        &mut domain,
        Connectivity::Four,
    );
    registry.register(regions[0].clone(), Shape::HeadSpot);
}

#[test]
fn registry_holds_one_domain_per_stage() {
    let (registry, _) = pool();
    for kind in [DomainKind::Spot, DomainKind::Head, DomainKind::Split] {
        assert_eq!(registry.domain(kind).kind(), kind);
    }
}
