//! Buckling length propagation over element chains and joints

use std::sync::Arc;

use approx::assert_relative_eq;
use frame_solver::prelude::*;
use nalgebra::Point3;

fn element(from: [f64; 3], to: [f64; 3]) -> Element {
    let section = Arc::new(Section::chs("CHS114", Arc::new(Material::s235()), 114.3, 5.0));
    Element::new(Line::from_coords(from, to), "m", section, None).unwrap()
}

#[test]
fn chain_with_free_end_is_doubled() {
    let model = Model::new(
        vec![
            element([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            element([0.0, 0.0, 1.0], [0.0, 0.0, 3.0]),
            element([0.0, 0.0, 3.0], [0.0, 0.0, 6.0]),
        ],
        vec![Support::fixed(Point3::origin())],
        vec![],
    );
    for length in buckling_lengths(&model) {
        assert_relative_eq!(length, 12.0, max_relative = 1e-12);
    }
}

#[test]
fn chain_supported_at_both_ends() {
    let model = Model::new(
        vec![
            element([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            element([0.0, 0.0, 1.0], [0.0, 0.0, 3.0]),
            element([0.0, 0.0, 3.0], [0.0, 0.0, 6.0]),
        ],
        vec![
            Support::pinned(Point3::origin()),
            Support::pinned(Point3::new(0.0, 0.0, 6.0)),
        ],
        vec![],
    );
    for length in buckling_lengths(&model) {
        assert_relative_eq!(length, 6.0, max_relative = 1e-12);
    }
}

#[test]
fn four_way_joint_stops_propagation() {
    let c = [0.0, 0.0, 0.0];
    let model = Model::new(
        vec![
            element([-2.0, 0.0, 0.0], c),
            element(c, [3.0, 0.0, 0.0]),
            element([0.0, -4.0, 0.0], c),
            element(c, [0.0, 5.0, 0.0]),
        ],
        vec![
            Support::pinned(Point3::new(-2.0, 0.0, 0.0)),
            Support::pinned(Point3::new(3.0, 0.0, 0.0)),
            Support::pinned(Point3::new(0.0, -4.0, 0.0)),
            Support::pinned(Point3::new(0.0, 5.0, 0.0)),
        ],
        vec![],
    );
    let lengths = buckling_lengths(&model);
    assert_relative_eq!(lengths[0], 2.0);
    assert_relative_eq!(lengths[1], 3.0);
    assert_relative_eq!(lengths[2], 4.0);
    assert_relative_eq!(lengths[3], 5.0);
}

#[test]
fn portal_columns_stop_at_knee_joint() {
    // the beam is split at midspan; knees have two elements, the midspan node too
    let model = Model::new(
        vec![
            element([0.0, 0.0, 0.0], [0.0, 0.0, 4.0]),
            element([0.0, 0.0, 4.0], [3.0, 0.0, 4.0]),
            element([3.0, 0.0, 4.0], [6.0, 0.0, 4.0]),
            element([6.0, 0.0, 4.0], [6.0, 0.0, 0.0]),
            element([3.0, 0.0, 4.0], [3.0, 0.0, 0.0]),
        ],
        vec![
            Support::fixed(Point3::origin()),
            Support::fixed(Point3::new(6.0, 0.0, 0.0)),
            Support::fixed(Point3::new(3.0, 0.0, 0.0)),
        ],
        vec![],
    );
    let lengths = buckling_lengths(&model);
    // left column runs through the left knee into the first beam half,
    // which ends at the three-element midspan joint
    assert_relative_eq!(lengths[0], 7.0);
    assert_relative_eq!(lengths[1], 7.0);
    assert_relative_eq!(lengths[2], 7.0);
    assert_relative_eq!(lengths[3], 7.0);
    assert_relative_eq!(lengths[4], 4.0);
}

#[test]
fn lengths_survive_section_changes() {
    let mut model = Model::new(
        vec![element([0.0, 0.0, 0.0], [0.0, 0.0, 3.0])],
        vec![Support::fixed(Point3::origin())],
        vec![],
    );
    apply_buckling_lengths(&mut model);
    let bigger = Arc::new(Section::chs("CHS168", Arc::new(Material::s235()), 168.3, 6.3));
    let resized = model.elements[0].clone().with_section(bigger).unwrap();
    assert_relative_eq!(resized.buckling_length, 6.0);
}
