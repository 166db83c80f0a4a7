use std::collections::BTreeSet;

use ndarray::{Axis, Slice};

use llc_mosaic::assemble::{Centering, FaceSelection, LlcTransformation, VariableSelection};
use llc_mosaic::config::RearrangeConfig;
use llc_mosaic::data::{Dataset, Variable};
use llc_mosaic::error::MosaicError;
use llc_mosaic::layout::{half_layout, Placement};
use llc_mosaic::mates::VectorPairing;
use llc_mosaic::remap::{face_slice, turn_block, QuarterTurn};
use llc_mosaic::synthetic::{cell_label, llc_dataset};
use llc_mosaic::remap::roll_half;
use llc_mosaic::topology::{FaceGroup, CAP_FACE};

const N: usize = 4;

fn transformation() -> LlcTransformation {
    LlcTransformation::new(RearrangeConfig::default()).unwrap()
}

fn atlantic_crown(ds: &Dataset) -> Dataset {
    transformation()
        .arctic_crown(ds, &VariableSelection::All, Centering::Atlantic, &FaceSelection::All, false)
        .unwrap()
}

/// Face placements of a crown: west half first, the other half shifted
/// east by its width.
fn crown_placements(faces: &[usize], centering: Centering) -> Vec<Placement> {
    let (rotated, non_rotated): (Vec<usize>, Vec<usize>) = faces
        .iter()
        .copied()
        .filter(|&f| f != CAP_FACE)
        .partition(|&f| FaceGroup::of(f).unwrap().is_rotated());
    let rotated = half_layout(&rotated, &[], N, N, 0, true).unwrap();
    let non_rotated = half_layout(&non_rotated, &[], N, N, 0, false).unwrap();
    let (west, east) = match centering {
        Centering::Pacific => (non_rotated, rotated),
        _ => (rotated, non_rotated),
    };
    let offset = west.extent.width;
    let mut out = west.faces.clone();
    out.extend(east.faces.into_iter().map(|p| Placement {
        face: p.face,
        rows: p.rows,
        cols: p.cols.start + offset..p.cols.end + offset,
    }));
    out
}

fn atlantic_placements() -> Vec<Placement> {
    crown_placements(&(0..13).collect::<Vec<_>>(), Centering::Atlantic)
}

/// Offset of a reversed native axis landing on a corner axis.
fn shifts(turn: QuarterTurn, target: &[String]) -> (usize, usize) {
    let corner_y = target.iter().any(|d| d == "Yp1");
    match turn {
        QuarterTurn::Cw => (usize::from(corner_y), 0),
        _ => (0, 0),
    }
}

fn values(var: &Variable) -> Vec<f64> {
    var.data.iter().copied().collect()
}

fn check_round_trip(faces: &[usize], centering: Centering) {
    let config = RearrangeConfig::default();
    let pairing = VectorPairing::new(&config);
    let ds = pairing.pair_attributes(&llc_dataset(N));
    let selection = if faces.len() == 13 {
        FaceSelection::All
    } else {
        FaceSelection::Only(faces.to_vec())
    };
    let mosaic = transformation()
        .arctic_crown(&ds, &VariableSelection::All, centering, &selection, false)
        .unwrap();

    for name in ["XC", "XG", "U", "V", "dxC", "dyC"] {
        let out = mosaic.variable(name).unwrap();
        for p in crown_placements(faces, centering) {
            let turn = FaceGroup::of(p.face).unwrap().crown_turn();
            let source_name = pairing.source_for(&ds, name, turn).unwrap();
            let source = ds.variable(&source_name).unwrap();
            let (original, source_dims) = face_slice(source, p.face, "face").unwrap();

            let (row_shift, col_shift) = shifts(turn, &out.dims);
            let mut region = out.data.view();
            let r0 = p.rows.start + row_shift;
            let c0 = p.cols.start + col_shift;
            region.slice_axis_inplace(Axis(0), Slice::from(r0..r0 + N));
            region.slice_axis_inplace(Axis(1), Slice::from(c0..c0 + N));

            let mut back = turn_block(region, &out.dims, &source_dims, turn.inverse(), &config).unwrap();
            back.scale(pairing.sign_of(name, &out.dims, turn, &config).unwrap());
            assert_eq!(
                back.data,
                original.to_owned(),
                "{} on face {} does not round trip ({} centering)",
                name,
                p.face,
                centering
            );
        }
    }
}

#[test]
fn round_trip_reproduces_every_face() {
    let all: Vec<usize> = (0..13).collect();
    check_round_trip(&all, Centering::Atlantic);
    check_round_trip(&all, Centering::Pacific);
}

#[test]
fn round_trip_of_a_subset_with_the_cap() {
    check_round_trip(&[1, 2, 4, 5, 6], Centering::Atlantic);
    check_round_trip(&[8, 9, 11, 12, 6], Centering::Pacific);
}

#[test]
fn vector_components_follow_rotation() {
    let ds = llc_dataset(N);
    let mosaic = atlantic_crown(&ds);
    let u = mosaic.variable("U").unwrap();
    let v = mosaic.variable("V").unwrap();

    for p in atlantic_placements() {
        let k = p.face as f64;
        let rotated = FaceGroup::of(p.face).unwrap().is_rotated();
        let v_shift = usize::from(rotated);
        for row in p.rows.clone() {
            for col in p.cols.clone() {
                let expected_u = if rotated { -k } else { k };
                assert_eq!(u.get_value(&[row, col]), Some(expected_u), "U face {}", p.face);
                assert_eq!(v.get_value(&[row + v_shift, col]), Some(-k), "V face {}", p.face);
            }
        }
    }
}

#[test]
fn cap_wedges_fill_every_cap_cell_once() {
    let ds = llc_dataset(N);
    let mosaic = atlantic_crown(&ds);
    let xc = mosaic.variable("XC").unwrap();

    let mut seen = Vec::new();
    for row in 3 * N..3 * N + N / 2 {
        for col in 0..4 * N {
            let value = xc.get_value(&[row, col]).unwrap();
            if !value.is_nan() {
                seen.push(value as i64);
            }
        }
    }
    let unique: BTreeSet<i64> = seen.iter().copied().collect();
    let expected: BTreeSet<i64> = (0..N)
        .flat_map(|y| (0..N).map(move |x| cell_label(6, y, x, N) as i64))
        .collect();
    assert_eq!(seen.len(), N * N);
    assert_eq!(unique, expected);
}

#[test]
fn cap_wedges_carry_neighbor_signs() {
    let ds = llc_dataset(N);
    let mosaic = atlantic_crown(&ds);
    let count = |var: &Variable, target: f64| values(var).iter().filter(|&&v| v == target).count();

    let u = mosaic.variable("U").unwrap();
    assert_eq!(count(u, 6.0), N * N / 2);
    assert_eq!(count(u, -6.0), N * N / 2);

    let v = mosaic.variable("V").unwrap();
    assert_eq!(count(v, 6.0), N * N / 2);
    assert_eq!(count(v, -6.0), N * N / 2);

    // Unsigned metrics never change sign.
    let dxc = mosaic.variable("dxC").unwrap();
    assert_eq!(count(dxc, 16.0) + count(dxc, 26.0), N * N);
    assert!(values(dxc).iter().all(|v| v.is_nan() || *v > 0.0));
}

#[test]
fn levels_are_stitched_independently() {
    let ds = llc_dataset(N);
    let mosaic = atlantic_crown(&ds);
    let theta = mosaic.variable("Theta").unwrap();
    assert_eq!(theta.dims, vec!["Z", "Y", "X"]);
    // Face 0 at the lower-left corner of the eastern half.
    assert_eq!(theta.get_value(&[2, 0, 2 * N]), Some(200.0));
    assert_eq!(theta.get_value(&[1, 0, 0]), Some(109.0));
}

#[test]
fn requests_that_leave_gaps_are_rejected() {
    let ds = llc_dataset(N);
    let t = transformation();
    let vars = VariableSelection::Only(vec!["XC".to_string()]);
    let disconnected = t.arctic_crown(
        &ds,
        &vars,
        Centering::Atlantic,
        &FaceSelection::Only(vec![0, 2]),
        false,
    );
    assert!(matches!(disconnected, Err(MosaicError::DisconnectedFaces { .. })));

    let ragged = t.arctic_crown(
        &ds,
        &vars,
        Centering::Pacific,
        &FaceSelection::Only(vec![7, 8, 10]),
        false,
    );
    assert!(matches!(ragged, Err(MosaicError::RaggedFacets { .. })));
}

#[test]
fn centered_mosaics_hold_the_five_arctic_faces() {
    let ds = llc_dataset(N);
    let t = transformation();
    let expected: BTreeSet<i64> = [2usize, 5, 6, 7, 10]
        .iter()
        .flat_map(|&k| (0..N * N).map(move |i| cell_label(k, i / N, i % N, N) as i64))
        .collect();

    for centering in [Centering::Atlantic, Centering::Pacific, Centering::Arctic] {
        let out = t
            .arctic_centered(
                &ds,
                &VariableSelection::Only(vec!["XC".to_string()]),
                centering,
                &FaceSelection::Only(vec![0, 6]),
                true,
            )
            .unwrap();
        let xc = out.variable("XC").unwrap();
        assert_eq!(xc.shape(), &[3 * N, 3 * N]);
        let found: BTreeSet<i64> = values(xc)
            .into_iter()
            .filter(|v| !v.is_nan())
            .map(|v| v as i64)
            .collect();
        assert_eq!(found, expected, "{} centering", centering);
    }
}

#[test]
fn centered_mosaics_turn_vector_components() {
    let ds = llc_dataset(N);
    let t = transformation();
    // (face, U, V) for each centering.
    let cases = [
        (Centering::Atlantic, [(2, 2, -2), (5, 5, 5), (6, 6, 6), (7, 7, 7), (10, -10, 10)]),
        (Centering::Pacific, [(2, -2, 2), (5, -5, -5), (6, -6, -6), (7, -7, -7), (10, 10, -10)]),
        (Centering::Arctic, [(2, -2, -2), (5, 5, -5), (6, 6, -6), (7, 7, -7), (10, 10, 10)]),
    ];
    let labels = |var: &Variable| -> BTreeSet<i64> {
        values(var)
            .into_iter()
            .filter(|v| !v.is_nan())
            .map(|v| v as i64)
            .collect()
    };

    for (centering, faces) in cases {
        let out = t
            .arctic_centered(
                &ds,
                &VariableSelection::Only(vec!["U".to_string(), "V".to_string()]),
                centering,
                &FaceSelection::All,
                false,
            )
            .unwrap();
        let expected_u: BTreeSet<i64> = faces.iter().map(|&(_, u, _)| u).collect();
        let expected_v: BTreeSet<i64> = faces.iter().map(|&(_, _, v)| v).collect();
        assert_eq!(labels(out.variable("U").unwrap()), expected_u, "U, {} centering", centering);
        assert_eq!(labels(out.variable("V").unwrap()), expected_v, "V, {} centering", centering);
    }
}

#[test]
fn recentered_crown_keeps_corners_with_cells() {
    let ds = llc_dataset(N);
    let mosaic = atlantic_crown(&ds);
    let rolled = roll_half(&mosaic, "X", "Xp1");
    let width = 4 * N;
    let half = width / 2;
    let same = |a: Option<f64>, b: Option<f64>| match (a, b) {
        (Some(a), Some(b)) => a == b || (a.is_nan() && b.is_nan()),
        _ => false,
    };

    for name in ["XC", "U", "XG"] {
        let before = mosaic.variable(name).unwrap();
        let after = rolled.variable(name).unwrap();
        for row in 0..after.shape()[0] {
            for col in 0..width {
                assert!(
                    same(
                        after.get_value(&[row, col]),
                        before.get_value(&[row, (col + half) % width])
                    ),
                    "{} at [{}, {}]",
                    name,
                    row,
                    col
                );
            }
        }
    }

    // The east edge corner closes the period.
    let u = rolled.variable("U").unwrap();
    assert_eq!(u.shape()[1], width + 1);
    for row in 0..u.shape()[0] {
        assert!(same(u.get_value(&[row, width]), u.get_value(&[row, 0])));
    }
    // A western cell moves with its west corner.
    assert_eq!(
        rolled.variable("XC").unwrap().get_value(&[1, half]),
        mosaic.variable("XC").unwrap().get_value(&[1, 0])
    );
    assert_eq!(u.get_value(&[1, half]), mosaic.variable("U").unwrap().get_value(&[1, 0]));
}
