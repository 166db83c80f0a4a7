use llc_mosaic::error::MosaicError;
use llc_mosaic::layout::half_layout;
use llc_mosaic::topology::combined_extent;

/// Every subset of a rotation group, as face lists.
fn subsets(group: &[usize]) -> Vec<Vec<usize>> {
    (1u32..(1 << group.len()))
        .map(|mask| {
            group
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, &f)| f)
                .collect()
        })
        .collect()
}

fn check_tiling(faces: &[usize], rotated: bool) {
    let (w, h) = (3, 5);
    let layout = match half_layout(faces, &[], w, h, 0, rotated) {
        Ok(layout) => layout,
        Err(MosaicError::DisconnectedFaces { .. }) | Err(MosaicError::RaggedFacets { .. }) => {
            return
        }
        Err(e) => panic!("unexpected error for {:?}: {}", faces, e),
    };
    let extent = layout.extent;
    let mut hits = vec![vec![0u8; extent.width]; extent.height];
    for p in &layout.faces {
        assert_eq!(p.rows.len(), h);
        assert_eq!(p.cols.len(), w);
        for row in p.rows.clone() {
            for col in p.cols.clone() {
                hits[row][col] += 1;
            }
        }
    }
    assert!(
        hits.iter().flatten().all(|&c| c == 1),
        "faces {:?} do not tile {:?}",
        faces,
        extent
    );
}

#[test]
fn connected_subsets_tile_their_extent() {
    for faces in subsets(&[0, 1, 2, 3, 4, 5]) {
        check_tiling(&faces, false);
    }
    for faces in subsets(&[7, 8, 9, 10, 11, 12]) {
        check_tiling(&faces, true);
    }
}

#[test]
fn accepted_subset_count() {
    // Per facet: 7 subsets, of which {first, last} is rejected. Across both
    // facets only matching offsets are accepted.
    let accepted = subsets(&[0, 1, 2, 3, 4, 5])
        .into_iter()
        .filter(|faces| combined_extent(faces, 1, 1, false).is_ok())
        .count();
    assert_eq!(accepted, 6 + 6 + 6);
}

#[test]
fn disconnected_and_ragged_requests() {
    assert!(matches!(
        combined_extent(&[0, 2], 4, 4, false),
        Err(MosaicError::DisconnectedFaces { .. })
    ));
    assert!(matches!(
        combined_extent(&[7, 8, 10], 4, 4, true),
        Err(MosaicError::RaggedFacets { .. })
    ));
}

#[test]
fn wedges_stack_on_the_top_row() {
    let layout = half_layout(&[0, 1, 2, 3, 4, 5], &[2, 5], 4, 4, 2, false).unwrap();
    for wedge in &layout.wedges {
        let face = layout.face(wedge.face).unwrap();
        assert_eq!(wedge.rows, 12..14);
        assert_eq!(wedge.cols, face.cols);
        assert_eq!(face.rows.end, wedge.rows.start);
    }
}
