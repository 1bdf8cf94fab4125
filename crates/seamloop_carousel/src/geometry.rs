//! Geometry pass
//!
//! Measures each item once per refresh: its width, its translation expressed
//! as a percentage of that width, and the gap in front of it. The gap in
//! front of the first item is measured against the container's leading
//! edge.

use crate::config::Snap;
use seamloop_core::Element;

/// Measurements backing one timeline build
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoopGeometry {
    pub widths: Vec<f32>,
    pub x_percents: Vec<f32>,
    pub space_before: Vec<f32>,
    /// Sum of extents and gaps for one cycle, plus trailing padding
    pub total_width: f32,
    /// Visible extent of the container
    pub container_width: f32,
}

impl LoopGeometry {
    /// Measure `items` and rewrite their translation as a snapped percentage
    ///
    /// `start_x` is the first item's untransformed offset captured when the
    /// carousel was built.
    pub fn measure<E: Element>(
        items: &mut [E],
        container: &E,
        snap: Snap,
        padding_right: f32,
        start_x: f32,
    ) -> Self {
        let mut geometry = LoopGeometry {
            widths: Vec::with_capacity(items.len()),
            x_percents: Vec::with_capacity(items.len()),
            space_before: Vec::with_capacity(items.len()),
            total_width: 0.0,
            container_width: container.width(),
        };

        let mut previous = container.bounding_rect();
        for (i, item) in items.iter().enumerate() {
            let width = item.width();
            let x_percent = snap.apply(item.translate_x() / width * 100.0 + item.x_percent());
            let rect = item.bounding_rect();
            let reference = if i == 0 { previous.left() } else { previous.right() };

            geometry.widths.push(width);
            geometry.x_percents.push(x_percent);
            geometry.space_before.push(rect.left() - reference);
            previous = rect;
        }

        for (item, x_percent) in items.iter_mut().zip(&geometry.x_percents) {
            item.set_x_percent(*x_percent);
        }

        if let Some(last) = items.last() {
            let n = items.len() - 1;
            let last_x = geometry.x_percents[n] / 100.0 * geometry.widths[n];
            geometry.total_width = last.offset_left() + last_x
                - start_x
                + geometry.space_before[0]
                + last.width() * last.scale_x()
                + padding_right;
        }

        tracing::debug!(
            "Measured {} items: total_width={:.1} container_width={:.1}",
            items.len(),
            geometry.total_width,
            geometry.container_width
        );
        geometry
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seamloop_core::BoxElement;

    #[test]
    fn test_contiguous_row() {
        let mut items = BoxElement::row(5, 100.0, 0.0);
        let container = BoxElement::new(0.0, 300.0);
        let geometry = LoopGeometry::measure(&mut items, &container, Snap::default(), 0.0, 0.0);

        assert_eq!(geometry.widths, vec![100.0; 5]);
        assert_eq!(geometry.x_percents, vec![0.0; 5]);
        assert_eq!(geometry.space_before, vec![0.0; 5]);
        assert_eq!(geometry.total_width, 500.0);
        assert_eq!(geometry.container_width, 300.0);
    }

    #[test]
    fn test_gaps_and_padding() {
        let mut items = BoxElement::row(3, 100.0, 20.0);
        for item in items.iter_mut() {
            item.offset_left += 10.0;
        }
        let container = BoxElement::new(0.0, 300.0);
        let geometry = LoopGeometry::measure(&mut items, &container, Snap::default(), 15.0, 10.0);

        assert_eq!(geometry.space_before, vec![10.0, 20.0, 20.0]);
        // 250 (last offset) - 10 (start) + 10 (first gap) + 100 (width) + 15 (padding)
        assert_eq!(geometry.total_width, 365.0);
    }

    #[test]
    fn test_translation_becomes_snapped_percentage() {
        let mut items = BoxElement::row(2, 200.0, 0.0);
        items[0].translate_x = 21.0;
        let container = BoxElement::new(0.0, 400.0);

        let geometry = LoopGeometry::measure(&mut items, &container, Snap::Step(5.0), 0.0, 0.0);
        assert_eq!(geometry.x_percents[0], 10.0);
        assert_eq!(items[0].x_percent, 10.0);

        let geometry = LoopGeometry::measure(&mut items, &container, Snap::Off, 0.0, 0.0);
        assert!((geometry.x_percents[0] - 20.5).abs() < 1e-4);
    }

    #[test]
    fn test_scaled_last_item() {
        let mut items = vec![
            BoxElement::new(0.0, 100.0),
            BoxElement::new(100.0, 100.0).with_scale_x(0.5),
        ];
        let container = BoxElement::new(0.0, 200.0);
        let geometry = LoopGeometry::measure(&mut items, &container, Snap::default(), 0.0, 0.0);
        assert_eq!(geometry.total_width, 150.0);
    }
}
