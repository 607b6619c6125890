//! Fire/fluid automaton - Moore-neighborhood energy diffusion
//!
//! One cell per call, in-place over the background layer. The update is
//! deliberately non-atomic: a transfer written by one cell is seen by the
//! cells visited after it in the same row-major pass, which is what gives
//! the flames their directional lick. The traversal order is part of the
//! effect, not an accident.

use crate::layer::Layer;
use crate::{VIDEO_H, VIDEO_W};

/// Variant of the automaton. Selects the forcing term and the convection
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fluid {
    /// Ambient energy trickle, up-left convection.
    Water,
    /// Ambient energy trickle, straight-left convection.
    Acid,
    /// Bottom-row seeding at full intensity, up-left convection.
    Flame,
}

impl Fluid {
    /// Convection push direction as (dy, dx).
    #[inline]
    fn updraft(self) -> (i32, i32) {
        match self {
            Fluid::Acid => (0, -1),
            Fluid::Water | Fluid::Flame => (-1, -1),
        }
    }
}

/// The 8-connected neighborhood as (dy, dx), clockwise from up-left.
const MOORE: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

/// Move up to half the source cell's energy into the destination, capped by
/// the destination's headroom. Neither cell leaves [0, 255].
#[inline]
pub fn energy_transfer(cells: &mut Layer, src: usize, dst: usize) {
    if src == dst {
        return;
    }
    let amount = (cells.at(src) / 2).min(255 - cells.at(dst));
    *cells.at_mut(src) -= amount;
    *cells.at_mut(dst) += amount;
}

/// Advance one cell of the automaton.
pub fn step_cell(fluid: Fluid, frame: u32, y: usize, x: usize, bg: &mut Layer) {
    let (y_i, x_i) = (y as i32, x as i32);
    let self_idx = Layer::index(y_i, x_i);

    // Forcing.
    match fluid {
        Fluid::Flame => {
            if y == 0 && x == 0 {
                for col in 0..VIDEO_W {
                    bg.set((VIDEO_H - 1) as i32, col as i32, 255);
                }
            }
        }
        Fluid::Water | Fluid::Acid => {
            if frame % 2 == 0 {
                let warmed = ((bg.at(self_idx) as u16 + 2) % 255) as u8;
                *bg.at_mut(self_idx) = warmed;
            }
        }
    }

    // The pre-diffusion reading drives every decision below, even after the
    // transfer has changed the cell.
    let val = bg.at(self_idx);

    let mut min_idx = self_idx;
    let mut min_val = val;
    let mut total = 0u32;
    for (dy, dx) in MOORE {
        let idx = Layer::index(y_i + dy, x_i + dx);
        let neighbor = bg.at(idx);
        total += neighbor as u32;
        if neighbor < min_val {
            min_val = neighbor;
            min_idx = idx;
        }
    }

    // Diffuse toward the coolest neighbor.
    if min_val < val {
        energy_transfer(bg, self_idx, min_idx);
    }

    // Cool cells sitting above their neighborhood average.
    if total / 8 < val as u32 && bg.at(self_idx) > 0 {
        *bg.at_mut(self_idx) -= 1;
    }

    // Convection: one push once the cell is warm, a second doubly-shifted
    // push fed from the row below once it is hot.
    let (dy, dx) = fluid.updraft();
    if val > 32 {
        let dst = Layer::index(y_i + dy, x_i + dx);
        energy_transfer(bg, self_idx, dst);
    }
    if val > 128 && y + 1 < VIDEO_H {
        let dst = Layer::index(y_i + dy - 1, x_i + dx);
        let south = Layer::index(y_i + 1, x_i);
        energy_transfer(bg, south, dst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_respects_headroom() {
        let mut layer = Layer::new();
        layer.set(0, 0, 200);
        layer.set(0, 1, 220);
        energy_transfer(&mut layer, Layer::index(0, 0), Layer::index(0, 1));
        // Half of 200 is 100 but only 35 fit.
        assert_eq!(layer.get(0, 0), 165);
        assert_eq!(layer.get(0, 1), 255);
    }

    #[test]
    fn test_transfer_moves_half_when_room() {
        let mut layer = Layer::new();
        layer.set(0, 0, 100);
        energy_transfer(&mut layer, Layer::index(0, 0), Layer::index(0, 1));
        assert_eq!(layer.get(0, 0), 50);
        assert_eq!(layer.get(0, 1), 50);
    }

    #[test]
    fn test_transfer_conserves_energy() {
        let mut layer = Layer::new();
        for (a, b) in [(255u8, 0u8), (1, 254), (128, 128), (255, 255), (0, 0)] {
            layer.set(0, 0, a);
            layer.set(0, 1, b);
            let before = a as u32 + b as u32;
            energy_transfer(&mut layer, Layer::index(0, 0), Layer::index(0, 1));
            let after = layer.get(0, 0) as u32 + layer.get(0, 1) as u32;
            assert_eq!(before, after);
        }
    }

    #[test]
    fn test_diffusion_prefers_first_minimum_in_scan_order() {
        // A hot cell ringed by equally cold neighbors sheds to the up-left
        // one: the Moore scan starts there and later ties do not replace it.
        let mut layer = Layer::new();
        layer.set(5, 5, 100);
        step_cell(Fluid::Flame, 1, 5, 5, &mut layer);
        assert!(layer.get(4, 4) > 0);
        assert_eq!(layer.get(4, 6), 0);
        assert_eq!(layer.get(6, 6), 0);
    }

    #[test]
    fn test_flame_seeds_bottom_row() {
        let mut layer = Layer::new();
        step_cell(Fluid::Flame, 0, 0, 0, &mut layer);
        for x in 0..VIDEO_W {
            assert_eq!(layer.get((VIDEO_H - 1) as i32, x as i32), 255);
        }
    }

    #[test]
    fn test_ambient_forcing_every_other_frame() {
        let mut layer = Layer::new();
        step_cell(Fluid::Water, 1, 10, 10, &mut layer);
        assert_eq!(layer.get(10, 10), 0);
        step_cell(Fluid::Water, 2, 10, 10, &mut layer);
        // +2 injected, half shed to the coolest neighbor, cooling claws
        // back one.
        assert_eq!(layer.get(10, 10), 0);
        assert_eq!(layer.get(9, 9), 1);
    }

    #[test]
    fn test_full_pass_stays_bounded() {
        // Sweep the whole grid for a few frames in render order; every cell
        // must stay a valid intensity and the borders must not fault.
        let mut layer = Layer::new();
        for frame in 0..6u32 {
            for y in 0..VIDEO_H {
                for x in 0..VIDEO_W {
                    step_cell(Fluid::Flame, frame, y, x, &mut layer);
                }
            }
        }
        // Seeded bottom row keeps burning.
        assert!(layer.get((VIDEO_H - 1) as i32, 40) > 0);
    }
}
