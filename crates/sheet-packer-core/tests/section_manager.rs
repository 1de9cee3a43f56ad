use sheet_packer_core::model::Segment;
use sheet_packer_core::packer::section::SectionManager;
use sheet_packer_core::packer::skyline::Skyline;

#[test]
fn record_tracks_tallest_extent() {
    let mut s = SectionManager::new(96.0);
    assert!(s.is_empty());
    s.record(0.0, 20.0);
    s.record(0.0, 10.0);
    s.record(20.0, 15.0);
    assert_eq!(s.height(), 35.0);
    assert!(!s.is_empty());
    assert_eq!(s.index(), 0);
}

#[test]
fn open_next_closes_section_and_resets_skyline() {
    let mut sky = Skyline::new(60.0, 0.0);
    sky.place(0, 30.0, 40.0);
    let mut s = SectionManager::new(96.0);
    s.record(0.0, 40.0);

    let start = s.open_next(&mut sky);
    assert_eq!(start, 40.0);
    assert_eq!(s.start(), 40.0);
    assert_eq!(s.index(), 1);
    assert!(s.is_empty());
    assert_eq!(s.boundaries(), &[40.0]);
    assert_eq!(sky.segments(), &[Segment::new(0.0, 40.0, 60.0)]);

    // Heights are relative to the new start.
    s.record(40.0, 12.0);
    assert_eq!(s.height(), 12.0);
}

#[test]
fn finish_pushes_final_boundary_only_when_used() {
    let mut s = SectionManager::new(96.0);
    s.record(0.0, 30.0);
    assert_eq!(s.clone().finish(), (vec![30.0], 30.0));

    let empty = SectionManager::new(96.0);
    assert_eq!(empty.finish(), (Vec::new(), 0.0));
}
