//! Wrapping grid topology
//!
//! Leaving one edge re-enters at the opposite edge. Positions are always
//! renormalized with modulo arithmetic, never clamped.

use glam::IVec2;
use rand::Rng;

use crate::error::{GameError, GameResult};
use crate::wrap;

/// Cell coordinates, `0 <= x < width`, `0 <= y < height` once wrapped
pub type GridPosition = IVec2;

/// One of the four grid-aligned directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Left,
    Right,
    Up,
    Down,
}

impl Heading {
    /// Enumeration order, also the tie-break order for heading selection
    pub const ALL: [Heading; 4] = [Heading::Left, Heading::Right, Heading::Up, Heading::Down];

    /// Unit step on the grid (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Heading::Left => IVec2::new(-1, 0),
            Heading::Right => IVec2::new(1, 0),
            Heading::Up => IVec2::new(0, -1),
            Heading::Down => IVec2::new(0, 1),
        }
    }

    /// The 180° opposite
    pub fn reverse(self) -> Self {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
        }
    }
}

/// Grid dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> GameResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(GameError::Display(format!(
                "grid must have at least one cell, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Grid covering a pixel surface, rounding partial cells down
    pub fn from_surface(width_px: u32, height_px: u32, cell_size: u32) -> GameResult<Self> {
        if cell_size == 0 {
            return Err(GameError::Display("cell size must be positive".into()));
        }
        Self::new((width_px / cell_size) as i32, (height_px / cell_size) as i32)
    }

    /// Renormalize any position into the grid
    pub fn wrap(&self, pos: GridPosition) -> GridPosition {
        IVec2::new(wrap(pos.x, self.width), wrap(pos.y, self.height))
    }

    /// One step from `pos` along `heading`, wrapped
    pub fn step(&self, pos: GridPosition, heading: Heading) -> GridPosition {
        self.wrap(pos + heading.delta())
    }

    pub fn contains(&self, pos: GridPosition) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// Uniformly random cell
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> GridPosition {
        IVec2::new(rng.random_range(0..self.width), rng.random_range(0..self.height))
    }

    /// Try up to `attempts` random cells, returning the first one accepted by `is_free`
    pub fn find_free_cell<R, F>(&self, rng: &mut R, attempts: u32, is_free: F) -> Option<GridPosition>
    where
        R: Rng,
        F: Fn(GridPosition) -> bool,
    {
        (0..attempts)
            .map(|_| self.random_cell(rng))
            .find(|&cell| is_free(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn reverse_pairs() {
        for heading in Heading::ALL {
            assert_eq!(heading.reverse().reverse(), heading);
            assert_eq!(heading.delta() + heading.reverse().delta(), IVec2::ZERO);
        }
    }

    #[test]
    fn steps_wrap_at_every_edge() {
        let grid = Grid::new(40, 30).unwrap();
        assert_eq!(grid.step(IVec2::new(0, 5), Heading::Left), IVec2::new(39, 5));
        assert_eq!(grid.step(IVec2::new(39, 5), Heading::Right), IVec2::new(0, 5));
        assert_eq!(grid.step(IVec2::new(5, 0), Heading::Up), IVec2::new(5, 29));
        assert_eq!(grid.step(IVec2::new(5, 29), Heading::Down), IVec2::new(5, 0));
    }

    #[test]
    fn surface_rounds_down() {
        let grid = Grid::from_surface(810, 599, 20).unwrap();
        assert_eq!(grid, Grid { width: 40, height: 29 });
        assert!(Grid::from_surface(19, 400, 20).is_err());
        assert!(Grid::from_surface(400, 400, 0).is_err());
    }

    #[test]
    fn free_cell_search_is_bounded() {
        let grid = Grid::new(4, 4).unwrap();
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(grid.find_free_cell(&mut rng, 100, |_| false), None);
        let found = grid.find_free_cell(&mut rng, 100, |c| c.x == 2).unwrap();
        assert_eq!(found.x, 2);
    }

    proptest! {
        #[test]
        fn wrap_lands_inside(x in -10_000i32..10_000, y in -10_000i32..10_000, w in 1i32..200, h in 1i32..200) {
            let grid = Grid::new(w, h).unwrap();
            let wrapped = grid.wrap(IVec2::new(x, y));
            prop_assert!(grid.contains(wrapped));
            prop_assert_eq!((wrapped.x - x).rem_euclid(w), 0);
            prop_assert_eq!((wrapped.y - y).rem_euclid(h), 0);
        }

        #[test]
        fn step_from_inside_moves_one_cell_mod_size(x in 0i32..50, y in 0i32..50, i in 0usize..4) {
            let grid = Grid::new(50, 50).unwrap();
            let heading = Heading::ALL[i];
            let next = grid.step(IVec2::new(x, y), heading);
            let d = heading.delta();
            prop_assert_eq!(next.x, (x + d.x).rem_euclid(50));
            prop_assert_eq!(next.y, (y + d.y).rem_euclid(50));
        }
    }
}
