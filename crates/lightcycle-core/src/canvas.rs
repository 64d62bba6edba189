use crate::color::Color;

/// Drawing surface a game renders into once per frame.
///
/// Coordinates are pixel coordinates with the origin in the top-left corner.
/// Implementations clip anything outside their surface.
pub trait Canvas {
    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: Color);

    /// Draw a one-pixel line between two points, both ends inclusive.
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color);

    /// Fill the rectangle spanned by two opposite corners, given in any order.
    fn fill_rect(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color);

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: Color);
}
