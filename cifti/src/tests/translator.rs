use super::fixtures::*;
use crate::prelude::*;

#[test]
fn dense_lookups() {
  let header = dense_series();
  let tr = IndexTranslator::new(&header);
  assert_eq!(tr.row_index_for_node(0, Structure::CortexLeft), Some(0));
  assert_eq!(tr.row_index_for_node(2, Structure::CortexLeft), Some(1));
  assert_eq!(tr.row_index_for_node(5, Structure::CortexLeft), Some(2));
  assert_eq!(tr.row_index_for_voxel([1, 1, 1]), Some(3));
  // not in the node list, wrong surface, wrong direction
  assert_eq!(tr.row_index_for_node(3, Structure::CortexLeft), None);
  assert_eq!(tr.row_index_for_node(2, Structure::CortexRight), None);
  assert_eq!(tr.column_index_for_node(2, Structure::CortexLeft), None);
  assert_eq!(tr.column_index_for_voxel([1, 1, 1]), None);
  assert_eq!(header.number_of_rows(), 4);
}

#[test]
fn surface_mapping_agrees_with_lookups() {
  let header = dense_series();
  let tr = IndexTranslator::new(&header);
  let mapping = tr.surface_mapping(Structure::CortexLeft, Direction::AlongColumn);
  assert_eq!(mapping, vec![
    SurfaceMapEntry { index: 0, node: 0 },
    SurfaceMapEntry { index: 1, node: 2 },
    SurfaceMapEntry { index: 2, node: 5 },
  ]);
  for entry in mapping.iter() {
    assert_eq!(
      tr.row_index_for_node(entry.node, Structure::CortexLeft),
      Some(entry.index)
    );
  }
  assert!(tr.surface_mapping(Structure::CortexRight, Direction::AlongColumn).is_empty());
  assert!(tr.surface_mapping(Structure::CortexLeft, Direction::AlongRow).is_empty());
}

#[test]
fn volume_mapping_lists_voxels() {
  let header = dense_series();
  let tr = IndexTranslator::new(&header);
  assert_eq!(tr.volume_mapping(Direction::AlongColumn), vec![VolumeMapEntry {
    index: 3,
    ijk: [1, 1, 1],
    structure: Structure::ThalamusLeft
  }]);
  assert!(tr.volume_mapping(Direction::AlongRow).is_empty());
}

#[test]
fn voxel_lookups() {
  let header = dense_series();
  let tr = IndexTranslator::new(&header);
  // inside the volume but without data
  assert_eq!(tr.row_index_for_voxel([0, 0, 0]), None);
  // outside the volume
  assert_eq!(tr.row_index_for_voxel([9, 9, 9]), None);
  assert_eq!(tr.row_index_for_voxel([-1, 1, 1]), None);
  // the voxel center and the halfway points round onto (1, 1, 1)
  assert_eq!(tr.row_index_for_voxel_coordinate([-2.0, -2.0, -2.0]), Some(3));
  assert_eq!(tr.row_index_for_voxel_coordinate([-3.0, -1.1, -2.9]), Some(3));
  assert_eq!(tr.row_index_for_voxel_coordinate([-1.0, -2.0, -2.0]), None);
  assert_eq!(tr.row_index_for_voxel_coordinate([-3.1, -2.0, -2.0]), None);
  assert_eq!(tr.row_index_for_voxel_coordinate([100.0, 0.0, 0.0]), None);
  assert_eq!(tr.column_index_for_voxel_coordinate([-2.0, -2.0, -2.0]), None);
}

#[test]
fn non_finite_coordinates_match_nothing() {
  // voxel (0, 0, 0) has data
  let header = parcellated();
  let tr = IndexTranslator::new(&header);
  assert_eq!(tr.row_index_for_voxel_coordinate([-4.0, -4.0, -4.0]), Some(1));
  assert_eq!(tr.row_index_for_voxel_coordinate([f64::NAN; 3]), None);
  assert_eq!(tr.row_index_for_voxel_coordinate([f64::NAN, -4.0, -4.0]), None);
  assert_eq!(tr.row_index_for_voxel_coordinate([f64::INFINITY, 0.0, 0.0]), None);
  assert_eq!(tr.row_index_for_voxel_coordinate([-4.0, f64::NEG_INFINITY, -4.0]), None);
  assert_eq!(tr.row_index_for_voxel_coordinate([1e300, -4.0, -4.0]), None);
  assert_eq!(small_volume().nearest_voxel([f64::NAN, 0.0, 0.0]), None);
  assert_eq!(small_volume().nearest_voxel([-2.0, 0.0, 2.0]), Some([1, 2, 3]));
}

#[test]
fn timepoint_lookups() {
  let header = dense_series();
  let tr = IndexTranslator::new(&header);
  assert_eq!(tr.column_index_for_timepoint(0.0), Some(0));
  assert_eq!(tr.column_index_for_timepoint(5.0), Some(3));
  assert_eq!(tr.column_index_for_timepoint(3.0), Some(2));
  assert_eq!(tr.column_index_for_timepoint(4.9), Some(2));
  assert_eq!(tr.column_index_for_timepoint(18.0), Some(9));
  assert_eq!(tr.column_index_for_timepoint(19.0), None);
  assert_eq!(tr.column_index_for_timepoint(-1.0), None);
  assert_eq!(tr.column_index_for_timepoint(f64::NAN), None);
  // rows are brain models, not a series
  assert_eq!(tr.row_index_for_timepoint(0.0), None);
}

#[test]
fn timepoints_respect_start_and_unit() {
  let mut header = dense_series();
  header.reset_axis_to_series(
    Direction::AlongRow,
    5,
    SeriesInfo { start: 1000.0, step: 500.0, unit: SeriesUnit::Milliseconds }
  ).unwrap();
  let tr = IndexTranslator::new(&header);
  assert_eq!(tr.column_index_for_timepoint(1.0), Some(0));
  assert_eq!(tr.column_index_for_timepoint(2.0), Some(2));
  assert_eq!(tr.column_index_for_timepoint(3.0), Some(4));
  assert_eq!(tr.column_index_for_timepoint(0.5), None);
}

#[test]
fn zero_step_matches_nothing() {
  let mut header = dense_series();
  header.set_timestep(Direction::AlongRow, 0.0).unwrap();
  let tr = IndexTranslator::new(&header);
  assert_eq!(tr.column_index_for_timepoint(0.0), None);
}

#[test]
fn presence_queries() {
  let header = dense_series();
  let tr = IndexTranslator::new(&header);
  assert!(tr.has_surface_data(Structure::CortexLeft, Direction::AlongColumn));
  assert!(!tr.has_surface_data(Structure::CortexRight, Direction::AlongColumn));
  assert!(!tr.has_surface_data(Structure::CortexLeft, Direction::AlongRow));
  assert!(tr.has_volume_data(Direction::AlongColumn));
  assert!(!tr.has_volume_data(Direction::AlongRow));
  assert_eq!(
    tr.surface_number_of_nodes(Structure::CortexLeft, Direction::AlongColumn),
    Some(10)
  );
  assert_eq!(
    tr.surface_number_of_nodes(Structure::CortexRight, Direction::AlongColumn),
    None
  );
  let labels = dense_labels();
  let tr = IndexTranslator::new(&labels);
  assert!(!tr.has_volume_data(Direction::AlongColumn));
  assert_eq!(
    tr.surface_number_of_nodes(Structure::CortexLeft, Direction::AlongColumn),
    Some(4)
  );
}

#[test]
fn parcel_lookups() {
  let header = parcellated();
  let tr = IndexTranslator::new(&header);
  for node in [1, 3, 4] {
    assert_eq!(tr.row_index_for_node(node, Structure::CortexLeft), Some(0));
  }
  assert_eq!(tr.row_index_for_node(7, Structure::CortexLeft), Some(1));
  assert_eq!(tr.row_index_for_node(0, Structure::CortexLeft), None);
  assert_eq!(tr.row_index_for_voxel([3, 2, 1]), Some(1));
  assert_eq!(tr.row_index_for_voxel([1, 1, 1]), None);
  // voxel (0, 0, 0) is centered on (-4, -4, -4)
  assert_eq!(tr.row_index_for_voxel_coordinate([-4.5, -3.5, -4.0]), Some(1));
  assert!(tr.has_surface_data(Structure::CortexLeft, Direction::AlongColumn));
  assert!(tr.has_volume_data(Direction::AlongColumn));
  assert_eq!(
    tr.surface_number_of_nodes(Structure::CortexLeft, Direction::AlongColumn),
    Some(10)
  );
  // parcels have no per-index correspondence
  assert!(tr.surface_mapping(Structure::CortexLeft, Direction::AlongColumn).is_empty());
  assert!(tr.volume_mapping(Direction::AlongColumn).is_empty());
}

#[test]
fn shared_between_threads() {
  let header = dense_series();
  let tr = &IndexTranslator::new(&header);
  let results: Vec<Vec<Option<usize>>> = std::thread::scope(|s| {
    let handles: Vec<_> = (0..4)
      .map(|_| s.spawn(move || {
        return (0..10)
          .map(|node| tr.row_index_for_node(node, Structure::CortexLeft))
          .collect::<Vec<_>>();
      }))
      .collect();
    return handles.into_iter().map(|h| h.join().unwrap()).collect();
  });
  let expected = vec![
    Some(0), None, Some(1), None, None, Some(2), None, None, None, None
  ];
  for r in results {
    assert_eq!(r, expected);
  }
}

#[test]
fn warming_changes_nothing() {
  let header = parcellated();
  let cold = IndexTranslator::new(&header);
  let warm = IndexTranslator::new(&header);
  warm.warm();
  for node in 0..10 {
    assert_eq!(
      cold.row_index_for_node(node, Structure::CortexLeft),
      warm.row_index_for_node(node, Structure::CortexLeft)
    );
  }
  assert_eq!(cold.row_index_for_voxel([0, 0, 0]), warm.row_index_for_voxel([0, 0, 0]));
  assert!(std::ptr::eq(warm.header(), &header));
}
