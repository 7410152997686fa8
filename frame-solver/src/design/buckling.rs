//! Effective buckling lengths from the element connectivity graph

use std::collections::HashSet;

use log::debug;

use crate::model::Model;

/// Result of walking away from one element end
struct Walk {
    /// Length of the pass-through elements collected
    length: f64,
    /// The chain ended on an unsupported node with no other element
    free_end: bool,
}

/// Walk from `node` away from `start`, following nodes with exactly two
/// incident elements. `visited` is shared by both walks of one element so a
/// ring is collected once.
fn walk(
    model: &Model,
    incidence: &[Vec<usize>],
    visited: &mut HashSet<usize>,
    start: usize,
    node: usize,
) -> Walk {
    let mut current = start;
    let mut node = node;
    let mut length = 0.0;

    loop {
        match incidence[node].as_slice() {
            [_] => {
                return Walk {
                    length,
                    free_end: !model.nodes[node].is_supported(),
                };
            }
            [a, b] => {
                let next = if *a == current { *b } else { *a };
                if !visited.insert(next) {
                    // closed ring
                    return Walk { length, free_end: false };
                }
                let Some([s, e]) = model.elements[next].nodes() else {
                    return Walk { length, free_end: false };
                };
                length += model.elements[next].length();
                node = if s == node { e } else { s };
                current = next;
            }
            _ => return Walk { length, free_end: false },
        }
    }
}

/// Effective buckling length of every element, in element order.
///
/// Own length plus the lengths collected through pass-through nodes at both
/// ends; doubled once when either chain end is free.
pub fn buckling_lengths(model: &Model) -> Vec<f64> {
    let incidence = model.element_incidence();

    model
        .elements
        .iter()
        .enumerate()
        .map(|(i, elem)| {
            let Some([a, b]) = elem.nodes() else {
                return elem.length();
            };
            if a == b {
                return elem.length();
            }
            let mut visited = HashSet::from([i]);
            let start = walk(model, &incidence, &mut visited, i, a);
            let end = walk(model, &incidence, &mut visited, i, b);
            let total = elem.length() + start.length + end.length;
            if start.free_end || end.free_end {
                2.0 * total
            } else {
                total
            }
        })
        .collect()
}

/// Store the computed buckling length on every element of `model`
pub fn apply_buckling_lengths(model: &mut Model) {
    let lengths = buckling_lengths(model);
    for (elem, length) in model.elements.iter_mut().zip(lengths) {
        debug!("Buckling length of '{}': {:.3} m", elem.tag, length);
        elem.buckling_length = length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, Material, Section, Support};
    use crate::geometry::Line;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::sync::Arc;

    fn elem(from: [f64; 3], to: [f64; 3]) -> Element {
        let section = Arc::new(Section::chs("C", Arc::new(Material::s235()), 100.0, 5.0));
        Element::new(Line::from_coords(from, to), "E", section, None).unwrap()
    }

    #[test]
    fn test_single_element_between_supports() {
        let m = Model::new(
            vec![elem([0.0, 0.0, 0.0], [0.0, 0.0, 3.0])],
            vec![
                Support::pinned(Point3::new(0.0, 0.0, 0.0)),
                Support::pinned(Point3::new(0.0, 0.0, 3.0)),
            ],
            vec![],
        );
        assert_relative_eq!(buckling_lengths(&m)[0], 3.0);
    }

    #[test]
    fn test_column_split_in_two() {
        let m = Model::new(
            vec![
                elem([0.0, 0.0, 0.0], [0.0, 0.0, 1.5]),
                elem([0.0, 0.0, 1.5], [0.0, 0.0, 4.0]),
            ],
            vec![
                Support::pinned(Point3::new(0.0, 0.0, 0.0)),
                Support::pinned(Point3::new(0.0, 0.0, 4.0)),
            ],
            vec![],
        );
        let l = buckling_lengths(&m);
        assert_relative_eq!(l[0], 4.0);
        assert_relative_eq!(l[1], 4.0);
    }

    #[test]
    fn test_ring_terminates() {
        let m = Model::new(
            vec![
                elem([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
                elem([1.0, 0.0, 0.0], [1.0, 1.0, 0.0]),
                elem([1.0, 1.0, 0.0], [0.0, 0.0, 0.0]),
            ],
            vec![],
            vec![],
        );
        let l = buckling_lengths(&m);
        let perimeter = 2.0 + 2.0_f64.sqrt();
        for v in l {
            assert!(v.is_finite());
            assert!(v <= perimeter + 1e-9);
        }
    }

    #[test]
    fn test_apply_stores_lengths() {
        let mut m = Model::new(
            vec![elem([0.0, 0.0, 0.0], [0.0, 0.0, 2.5])],
            vec![Support::fixed(Point3::new(0.0, 0.0, 0.0))],
            vec![],
        );
        apply_buckling_lengths(&mut m);
        assert_relative_eq!(m.elements[0].buckling_length, 5.0);
    }
}
