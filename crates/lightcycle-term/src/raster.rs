use lightcycle_core::canvas::Canvas;
use lightcycle_core::color::Color;

/// Text queued for drawing on top of the pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub color: Color,
}

/// Software framebuffer the game draws into before it is shown in the terminal.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    overlays: Vec<TextOverlay>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
            overlays: Vec::new(),
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn overlays(&self) -> &[TextOverlay] {
        &self.overlays
    }

    fn set(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Number of `scale`-wide blocks across and down.
    pub fn blocks(&self, scale: usize) -> (usize, usize) {
        let scale = scale.max(1);
        (self.width.div_ceil(scale), self.height.div_ceil(scale))
    }

    /// Color of the `scale`x`scale` block at block coordinates `(bx, by)`.
    /// The first lit pixel in row order wins; an all-black block is black.
    pub fn block(&self, bx: usize, by: usize, scale: usize) -> Color {
        let scale = scale.max(1);
        let x0 = bx * scale;
        let y0 = by * scale;
        for y in y0..(y0 + scale).min(self.height) {
            for x in x0..(x0 + scale).min(self.width) {
                let c = self.pixels[y * self.width + x];
                if !c.is_black() {
                    return c;
                }
            }
        }
        Color::BLACK
    }
}

fn to_pixel(v: f32) -> i32 {
    v.floor() as i32
}

impl Canvas for PixelBuffer {
    fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
        self.overlays.clear();
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        // Bresenham, both ends inclusive
        let (mut x, mut y) = (to_pixel(x1), to_pixel(y1));
        let (x_end, y_end) = (to_pixel(x2), to_pixel(y2));
        let dx = (x_end - x).abs();
        let dy = -(y_end - y).abs();
        let sx = if x < x_end { 1 } else { -1 };
        let sy = if y < y_end { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set(x, y, color);
            if x == x_end && y == y_end {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn fill_rect(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (ax, bx) = (to_pixel(x1.min(x2)), to_pixel(x1.max(x2)));
        let (ay, by) = (to_pixel(y1.min(y2)), to_pixel(y1.max(y2)));
        let x_lo = ax.max(0);
        let y_lo = ay.max(0);
        let x_hi = bx.min(self.width as i32 - 1);
        let y_hi = by.min(self.height as i32 - 1);
        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                self.set(x, y, color);
            }
        }
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        self.overlays.push(TextOverlay {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn lit(buf: &PixelBuffer) -> usize {
        buf.pixels.iter().filter(|c| !c.is_black()).count()
    }

    #[test]
    fn vertical_line_is_inclusive() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.draw_line(4.0, 2.0, 4.0, 6.0, RED);
        assert_eq!(lit(&buf), 5);
        assert_eq!(buf.get(4, 2), Some(RED));
        assert_eq!(buf.get(4, 6), Some(RED));
    }

    #[test]
    fn reversed_horizontal_line() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.draw_line(8.0, 3.0, 1.5, 3.0, RED);
        assert_eq!(lit(&buf), 8);
        assert_eq!(buf.get(1, 3), Some(RED));
    }

    #[test]
    fn diagonal_line() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.draw_line(0.0, 0.0, 5.0, 5.0, RED);
        for i in 0..=5 {
            assert_eq!(buf.get(i, i), Some(RED));
        }
        assert_eq!(lit(&buf), 6);
    }

    #[test]
    fn single_point_line() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.draw_line(2.0, 2.0, 2.0, 2.0, RED);
        assert_eq!(lit(&buf), 1);
    }

    #[test]
    fn offscreen_parts_are_clipped() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.draw_line(-5.0, 5.0, 15.0, 5.0, RED);
        assert_eq!(lit(&buf), 10);
    }

    #[test]
    fn rect_corners_in_any_order() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.fill_rect(5.0, 5.0, 3.0, 2.0, BLUE);
        assert_eq!(lit(&buf), 3 * 4);
        assert_eq!(buf.get(3, 2), Some(BLUE));
        assert_eq!(buf.get(5, 5), Some(BLUE));
    }

    #[test]
    fn rect_is_clipped() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.fill_rect(-3.0, 8.0, 2.0, 20.0, BLUE);
        assert_eq!(lit(&buf), 3 * 2);

        buf.fill_rect(20.0, 20.0, 30.0, 30.0, RED);
        assert_eq!(lit(&buf), 6);
    }

    #[test]
    fn clear_drops_text() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.draw_text(1.0, 2.0, "Draw", RED);
        assert_eq!(buf.overlays().len(), 1);
        assert_eq!(buf.overlays()[0].text, "Draw");
        buf.clear(Color::BLACK);
        assert!(buf.overlays().is_empty());
    }

    #[test]
    fn block_takes_first_lit_pixel() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.draw_line(3.0, 1.0, 3.0, 1.0, BLUE);
        buf.draw_line(2.0, 0.0, 2.0, 0.0, RED);
        assert_eq!(buf.block(1, 0, 2), RED);
        assert_eq!(buf.block(0, 0, 2), Color::BLACK);
        assert_eq!(buf.block(1, 1, 2), Color::BLACK);
    }

    #[test]
    fn block_count_rounds_up() {
        let buf = PixelBuffer::new(150, 150);
        assert_eq!(buf.blocks(1), (150, 150));
        assert_eq!(buf.blocks(2), (75, 75));
        assert_eq!(buf.blocks(4), (38, 38));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn lines_never_escape_the_buffer(
                x1 in -50.0f32..200.0, y1 in -50.0f32..200.0,
                x2 in -50.0f32..200.0, y2 in -50.0f32..200.0,
            ) {
                let mut buf = PixelBuffer::new(150, 150);
                buf.draw_line(x1, y1, x2, y2, RED);
                prop_assert_eq!(buf.pixels.len(), 150 * 150);
                let (px, py) = (x1.floor(), y1.floor());
                if (0.0..150.0).contains(&px) && (0.0..150.0).contains(&py) {
                    prop_assert_eq!(buf.get(px as usize, py as usize), Some(RED));
                }
            }
        }
    }
}
