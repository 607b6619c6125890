//! Terminal presentation - half-block pixel surface
//!
//! Each terminal cell shows two vertically stacked pixels through the
//! upper-half-block glyph: the cell foreground is the top pixel, the cell
//! background the bottom one. 160x120 pixels therefore need a 160x60
//! terminal; anything smaller shows a clipped window onto the image.

use phosphor_fx::{VIDEO_H, VIDEO_W};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Expand a packed RGB555 word to a 24-bit terminal color. The low bits are
/// refilled from the channel's top bits so full intensity reaches 255.
#[inline]
fn unpack(color: u16) -> Color {
    let r5 = (color & 0x1F) as u8;
    let g5 = ((color >> 5) & 0x1F) as u8;
    let b5 = ((color >> 10) & 0x1F) as u8;
    Color::Rgb(
        (r5 << 3) | (r5 >> 2),
        (g5 << 3) | (g5 >> 2),
        (b5 << 3) | (b5 >> 2),
    )
}

pub struct ScreenWidget<'a> {
    pixels: &'a [u16],
}

impl<'a> ScreenWidget<'a> {
    /// `pixels` is the full packed frame, row-major.
    pub fn new(pixels: &'a [u16]) -> Self {
        Self { pixels }
    }
}

impl Widget for ScreenWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cell_rows = VIDEO_H / 2;
        let off_x = (area.width as usize).saturating_sub(VIDEO_W) / 2;
        let off_y = (area.height as usize).saturating_sub(cell_rows) / 2;

        for cy in 0..cell_rows.min(area.height as usize) {
            for cx in 0..VIDEO_W.min(area.width as usize) {
                let top = self.pixels[cy * 2 * VIDEO_W + cx];
                let bottom = self.pixels[(cy * 2 + 1) * VIDEO_W + cx];

                let px = area.x + (off_x + cx) as u16;
                let py = area.y + (off_y + cy) as u16;
                if px < area.x + area.width && py < area.y + area.height {
                    buf[(px, py)]
                        .set_char('▀')
                        .set_style(Style::default().fg(unpack(top)).bg(unpack(bottom)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phosphor_fx::pack_rgb;

    #[test]
    fn test_unpack_extremes() {
        assert_eq!(unpack(0), Color::Rgb(0, 0, 0));
        assert_eq!(unpack(pack_rgb(255, 255, 255)), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_unpack_channels() {
        assert_eq!(unpack(pack_rgb(255, 0, 0)), Color::Rgb(255, 0, 0));
        assert_eq!(unpack(pack_rgb(0, 255, 0)), Color::Rgb(0, 255, 0));
        assert_eq!(unpack(pack_rgb(0, 0, 255)), Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_widget_paints_half_blocks() {
        let mut pixels = vec![0u16; VIDEO_W * VIDEO_H];
        pixels[0] = pack_rgb(255, 0, 0); // top pixel of cell (0, 0)
        pixels[VIDEO_W] = pack_rgb(0, 255, 0); // bottom pixel of cell (0, 0)

        let area = Rect::new(0, 0, VIDEO_W as u16, (VIDEO_H / 2) as u16);
        let mut buf = Buffer::empty(area);
        ScreenWidget::new(&pixels).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.style().fg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(cell.style().bg, Some(Color::Rgb(0, 255, 0)));
    }
}
