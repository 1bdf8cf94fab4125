//! Measurable elements
//!
//! The carousel never touches a concrete widget tree. It reads geometry and
//! writes a single translation through the [`Element`] trait, so any host
//! (a DOM binding, a retained-mode UI, a test fixture) can supply items.

use crate::geometry::Rect;

/// An item the carousel can measure and translate along the horizontal axis
pub trait Element {
    /// Untransformed offset of the leading edge from the offset parent
    fn offset_left(&self) -> f32;

    /// Untransformed extent along the axis
    fn width(&self) -> f32;

    /// Horizontal scale factor applied to the rendered box
    fn scale_x(&self) -> f32 {
        1.0
    }

    /// Static translation in pixels
    fn translate_x(&self) -> f32;

    /// Translation as a percentage of the element's own width
    fn x_percent(&self) -> f32;

    /// Rendered box with all transforms applied, in page coordinates
    fn bounding_rect(&self) -> Rect;

    fn set_translate_x(&mut self, px: f32);

    fn set_x_percent(&mut self, percent: f32);
}

/// Plain in-memory element
///
/// Renders at `parent_left + offset_left + translate_x + x_percent% * width`,
/// scaled from its leading edge. Used by the scenario runner and tests, and
/// as a reference for host bindings.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxElement {
    pub offset_left: f32,
    pub width: f32,
    pub height: f32,
    pub scale_x: f32,
    pub translate_x: f32,
    pub x_percent: f32,
    /// Page position of the offset parent's leading edge
    pub parent_left: f32,
}

impl BoxElement {
    pub fn new(offset_left: f32, width: f32) -> Self {
        Self {
            offset_left,
            width,
            height: 0.0,
            scale_x: 1.0,
            translate_x: 0.0,
            x_percent: 0.0,
            parent_left: 0.0,
        }
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn with_scale_x(mut self, scale_x: f32) -> Self {
        self.scale_x = scale_x;
        self
    }

    pub fn with_parent_left(mut self, parent_left: f32) -> Self {
        self.parent_left = parent_left;
        self
    }

    /// Lay out `count` equally sized elements left to right with `gap` between them
    pub fn row(count: usize, width: f32, gap: f32) -> Vec<BoxElement> {
        (0..count)
            .map(|i| BoxElement::new(i as f32 * (width + gap), width))
            .collect()
    }

    /// Re-run the row layout in place, keeping each element's transforms
    pub fn reflow_row(items: &mut [BoxElement], width: f32, gap: f32) {
        for (i, item) in items.iter_mut().enumerate() {
            item.offset_left = i as f32 * (width + gap);
            item.width = width;
        }
    }
}

impl Element for BoxElement {
    fn offset_left(&self) -> f32 {
        self.offset_left
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn scale_x(&self) -> f32 {
        self.scale_x
    }

    fn translate_x(&self) -> f32 {
        self.translate_x
    }

    fn x_percent(&self) -> f32 {
        self.x_percent
    }

    fn bounding_rect(&self) -> Rect {
        let left = self.parent_left
            + self.offset_left
            + self.translate_x
            + self.x_percent / 100.0 * self.width;
        Rect::new(left, 0.0, self.width * self.scale_x, self.height)
    }

    fn set_translate_x(&mut self, px: f32) {
        self.translate_x = px;
    }

    fn set_x_percent(&mut self, percent: f32) {
        self.x_percent = percent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_layout() {
        let items = BoxElement::row(3, 100.0, 20.0);
        let lefts: Vec<f32> = items.iter().map(|e| e.offset_left()).collect();
        assert_eq!(lefts, vec![0.0, 120.0, 240.0]);
    }

    #[test]
    fn test_bounding_rect_applies_transforms() {
        let mut item = BoxElement::new(50.0, 200.0).with_parent_left(10.0);
        item.set_translate_x(5.0);
        item.set_x_percent(-50.0);

        let rect = item.bounding_rect();
        assert_eq!(rect.left(), 10.0 + 50.0 + 5.0 - 100.0);
        assert_eq!(rect.width(), 200.0);
    }

    #[test]
    fn test_scale_shrinks_rendered_width() {
        let item = BoxElement::new(0.0, 200.0).with_scale_x(0.5);
        assert_eq!(item.bounding_rect().width(), 100.0);
        assert_eq!(item.width(), 200.0);
    }

    #[test]
    fn test_reflow_keeps_transforms() {
        let mut items = BoxElement::row(2, 100.0, 0.0);
        items[1].set_x_percent(25.0);
        BoxElement::reflow_row(&mut items, 150.0, 10.0);

        assert_eq!(items[1].offset_left, 160.0);
        assert_eq!(items[1].width, 150.0);
        assert_eq!(items[1].x_percent, 25.0);
    }
}
