use ordered_float::OrderedFloat;

use crate::core::{DataPoint, ViewTransform};

/// Index of the sample closest to `query`, measured in device pixels.
///
/// Linear scan; the first of several equidistant samples wins. Returns `None`
/// for an empty buffer.
#[must_use]
pub fn nearest_point_index(
    points: &[DataPoint],
    query: DataPoint,
    transform: &ViewTransform,
) -> Option<usize> {
    let target = transform.data_to_device(query);
    points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let device = transform.data_to_device(*point);
            (index, OrderedFloat(device.distance_sq(target)))
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(index, _)| index)
}
