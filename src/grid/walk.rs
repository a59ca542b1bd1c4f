//! N-dimensional coordinate walking.
//!
//! One odometer serves every nested loop in the crate: tile origins, in-tile
//! offsets, the axis flip and the text writer. The walk order is configurable
//! because the grid stores axis 0 fastest while UCSF tiles store the last axis
//! fastest.

/// Which end of the coordinate varies fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOrder {
    /// Axis 0 advances first (grid storage order).
    FirstFastest,
    /// The last axis advances first (UCSF storage order).
    LastFastest,
}

/// Iterator over every coordinate inside a box of `extents`.
#[derive(Debug, Clone)]
pub struct CoordWalker {
    extents: Vec<usize>,
    current: Vec<usize>,
    order: WalkOrder,
    done: bool,
}

impl CoordWalker {
    /// Walk with axis 0 fastest.
    pub fn new(extents: &[usize]) -> Self {
        Self::with_order(extents, WalkOrder::FirstFastest)
    }

    pub fn with_order(extents: &[usize], order: WalkOrder) -> Self {
        Self {
            extents: extents.to_vec(),
            current: vec![0; extents.len()],
            order,
            // An empty box, or any zero-length axis, has no coordinates
            done: extents.is_empty() || extents.contains(&0),
        }
    }

    /// Number of coordinates the walk produces in total.
    pub fn total(&self) -> usize {
        if self.extents.is_empty() {
            0
        } else {
            self.extents.iter().product()
        }
    }

    fn advance(&mut self) {
        let rank = self.extents.len();
        for step in 0..rank {
            let axis = match self.order {
                WalkOrder::FirstFastest => step,
                WalkOrder::LastFastest => rank - 1 - step,
            };
            self.current[axis] += 1;
            if self.current[axis] < self.extents[axis] {
                return;
            }
            self.current[axis] = 0;
        }
        self.done = true;
    }
}

impl Iterator for CoordWalker {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let coord = self.current.clone();
        self.advance();
        Some(coord)
    }
}
