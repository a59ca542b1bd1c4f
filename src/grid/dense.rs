use crate::error::GridError;

use super::element::Element;
use super::walk::CoordWalker;

/// Dense N-dimensional grid of elements.
///
/// Storage is a single contiguous buffer with axis 0 varying fastest, so the
/// linear index of `(c0, c1, c2)` is `c0 + e0 * (c1 + e1 * c2)`.
/// `extents().iter().product() == as_slice().len()` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseGrid<E> {
    extents: Vec<usize>,
    data: Vec<E>,
}

impl<E: Element> DenseGrid<E> {
    /// Allocate a grid filled with the default (zero) element.
    pub fn allocate(extents: &[usize]) -> Result<Self, GridError> {
        let len = checked_len(extents)?;
        Ok(Self {
            extents: extents.to_vec(),
            data: vec![E::default(); len],
        })
    }

    /// Wrap an existing buffer. Its length must equal the product of `extents`.
    pub fn from_vec(extents: &[usize], data: Vec<E>) -> Result<Self, GridError> {
        let len = checked_len(extents)?;
        if data.len() != len {
            return Err(GridError::LengthMismatch {
                expected: len,
                actual: data.len(),
            });
        }
        Ok(Self {
            extents: extents.to_vec(),
            data,
        })
    }

    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [E] {
        &mut self.data
    }

    /// Linear index of a coordinate.
    pub fn index_of(&self, coord: &[usize]) -> Result<usize, GridError> {
        if coord.len() != self.extents.len() {
            return Err(GridError::RankMismatch {
                expected: self.extents.len(),
                actual: coord.len(),
            });
        }

        let mut index = 0;
        let mut stride = 1;
        for (axis, (&c, &extent)) in coord.iter().zip(&self.extents).enumerate() {
            if c >= extent {
                return Err(GridError::CoordinateOutOfBounds {
                    axis,
                    coordinate: c,
                    extent,
                });
            }
            index += c * stride;
            stride *= extent;
        }
        Ok(index)
    }

    pub fn get(&self, coord: &[usize]) -> Result<E, GridError> {
        let index = self.index_of(coord)?;
        Ok(self.data[index])
    }

    pub fn set(&mut self, coord: &[usize], value: E) -> Result<(), GridError> {
        let index = self.index_of(coord)?;
        self.data[index] = value;
        Ok(())
    }

    /// Iterate over every valid coordinate in storage order.
    pub fn coordinates(&self) -> CoordWalker {
        CoordWalker::new(&self.extents)
    }

    /// Mirror the grid along `axis` in place.
    ///
    /// Values at `y` and `extent - 1 - y` are swapped for every `y` in the
    /// lower half, holding all other coordinates fixed. The stored buffer is
    /// rewritten, so later consumers see the mirrored order. Applying the
    /// flip twice restores the original grid.
    pub fn flip_axis(&mut self, axis: usize) -> Result<(), GridError> {
        if axis >= self.extents.len() {
            return Err(GridError::RankMismatch {
                expected: self.extents.len(),
                actual: axis + 1,
            });
        }

        let extent = self.extents[axis];
        let mut half = self.extents.clone();
        half[axis] = extent / 2;

        let mut mirror = vec![0; self.extents.len()];
        for coord in CoordWalker::new(&half) {
            mirror.copy_from_slice(&coord);
            mirror[axis] = extent - 1 - coord[axis];
            let a = self.index_of(&coord)?;
            let b = self.index_of(&mirror)?;
            self.data.swap(a, b);
        }
        Ok(())
    }
}

fn checked_len(extents: &[usize]) -> Result<usize, GridError> {
    if extents.is_empty() {
        return Err(GridError::EmptyExtents);
    }
    let mut len: usize = 1;
    for (axis, &extent) in extents.iter().enumerate() {
        if extent == 0 {
            return Err(GridError::ZeroExtent { axis });
        }
        len = len.checked_mul(extent).ok_or(GridError::Overflow)?;
    }
    Ok(len)
}
