//! Checkerboard - XOR pattern scrolling diagonally with the frame counter

/// Intensity for one pixel. Pure arithmetic, no state.
#[inline]
pub fn shade(frame: u32, y: usize, x: usize) -> u8 {
    let delta = frame / 2;
    ((x as u32 + delta) ^ (y as u32 + delta)).wrapping_sub(1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_wraps_to_full() {
        // x == y makes the XOR zero; the decrement wraps it to peak
        // intensity, which draws the bright diagonals.
        assert_eq!(shade(0, 7, 7), 255);
        assert_eq!(shade(4, 9, 9), 255);
    }

    #[test]
    fn test_scrolls_with_frame() {
        // Advancing two frames shifts the whole pattern one step along both
        // axes.
        assert_eq!(shade(0, 3, 12), shade(2, 2, 11));
    }
}
