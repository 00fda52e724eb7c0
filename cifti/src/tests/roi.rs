use super::fixtures::*;
use crate::prelude::*;

/// Label values for `dense_labels`, one row per vertex and one column per
/// map. Non-integers get rounded.
fn label_data() -> InMemoryMatrix {
  return InMemoryMatrix::from_rows(&[
    vec![1.0, 3.0, 1.0],
    vec![2.0, 0.0, 0.0],
    vec![0.6, 3.4, f32::NAN],
    vec![0.0, 0.0, 1.5],
  ]).unwrap();
}

/// The rows of a matrix, for comparing.
fn rows_of(m: &InMemoryMatrix) -> Vec<Vec<f32>> {
  return m.rows().collect();
}

#[test]
fn matrix_access_is_checked() {
  let mut m = InMemoryMatrix::zeros(2, 3);
  let mut buf = vec![0.0_f32; 3];
  assert!(matches!(
    m.get_row(&mut buf, 2),
    Err(CiftiError::IndexOutOfRange { index: 2, length: 2, .. })
  ));
  assert!(matches!(
    m.set_row(&[1.0, 2.0], 0),
    Err(CiftiError::BufferSize { expected: 3, found: 2 })
  ));
  m.set_row(&[1.0, 2.0, 3.0], 1).unwrap();
  m.get_row(&mut buf, 1).unwrap();
  assert_eq!(buf, vec![1.0, 2.0, 3.0]);
  assert_eq!(m.get(1, 2), Some(3.0));
  assert_eq!(m.get(2, 0), None);
  assert!(matches!(
    InMemoryMatrix::from_rows(&[vec![1.0], vec![1.0, 2.0]]),
    Err(CiftiError::BufferSize { expected: 1, found: 2 })
  ));
}

#[test]
fn roi_by_name_over_all_maps() {
  let header = dense_labels();
  let selector = LabelSelector::Name("V2".to_string());
  let (out_header, out) = roi_from_label(&header, &label_data(), &selector, None)
    .unwrap();
  assert_eq!(out_header.mapping_type(Direction::AlongRow), MappingType::Scalars);
  assert_eq!(out_header.number_of_columns(), 3);
  assert_eq!(out_header.map_name(Direction::AlongRow, 1), Some("second"));
  assert_eq!(
    out_header.axis(Direction::AlongColumn),
    header.axis(Direction::AlongColumn)
  );
  // "V2" is key 2 in the first map, key 3 in the second, absent in the third
  assert_eq!(rows_of(&out), vec![
    vec![0.0, 1.0, 0.0],
    vec![1.0, 0.0, 0.0],
    vec![0.0, 1.0, 0.0],
    vec![0.0, 0.0, 0.0],
  ]);
}

#[test]
fn roi_by_key() {
  let header = dense_labels();
  let (_, out) = roi_from_label(&header, &label_data(), &1_i32.into(), None)
    .unwrap();
  assert_eq!(rows_of(&out), vec![
    vec![1.0, 0.0, 1.0],
    vec![0.0, 0.0, 0.0],
    vec![1.0, 0.0, 0.0],
    vec![0.0, 0.0, 0.0],
  ]);
}

#[test]
fn roi_of_a_single_map() {
  let header = dense_labels();
  let selector = LabelSelector::Name("MT".to_string());
  let (out_header, out) = roi_from_label(&header, &label_data(), &selector, Some(2))
    .unwrap();
  assert_eq!(out_header.number_of_columns(), 1);
  assert_eq!(out_header.map_name(Direction::AlongRow, 0), Some("third"));
  // 1.5 rounds to 2, so only the first row matches
  assert_eq!(rows_of(&out), vec![vec![1.0], vec![0.0], vec![0.0], vec![0.0]]);
  assert!(matches!(
    roi_from_label(&header, &label_data(), &selector, Some(0)),
    Err(RoiError::LabelNotFound(_))
  ));
}

#[test]
fn roi_errors() {
  let header = dense_labels();
  let data = label_data();
  assert!(matches!(
    roi_from_label(&header, &data, &LabelSelector::Name("LGN".to_string()), None),
    Err(RoiError::LabelNotFound(LabelSelector::Name(_)))
  ));
  assert!(matches!(
    roi_from_label(&header, &data, &LabelSelector::Key(7), None),
    Err(RoiError::NoDataMatched(LabelSelector::Key(7)))
  ));
  assert!(matches!(
    roi_from_label(&header, &data, &LabelSelector::Key(1), Some(3)),
    Err(RoiError::InvalidMap { index: 3, count: 3 })
  ));
  let narrow = InMemoryMatrix::zeros(4, 2);
  assert!(matches!(
    roi_from_label(&header, &narrow, &LabelSelector::Key(1), None),
    Err(RoiError::Cifti(CiftiError::MalformedHeader(_)))
  ));
  let series = dense_series();
  let zeros = InMemoryMatrix::for_header(&series);
  assert!(matches!(
    roi_from_label(&series, &zeros, &LabelSelector::Key(1), None),
    Err(RoiError::NotLabels(MappingType::Series))
  ));
}

#[test]
fn maps_resolve_by_number_or_name() {
  let header = dense_labels();
  assert_eq!(resolve_map(&header, "2").unwrap(), 1);
  assert_eq!(resolve_map(&header, "third").unwrap(), 2);
  assert!(matches!(
    resolve_map(&header, "fourth"),
    Err(RoiError::UnknownMap(name)) if name == "fourth"
  ));
}
