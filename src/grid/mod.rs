//! Dense grid container and sample element types.
//!
//! Decoders never manage raw memory themselves: they allocate a
//! [`DenseGrid`] of the element kind the file calls for and address into it
//! by coordinate.

mod dense;
mod element;
mod walk;

pub use dense::DenseGrid;
pub use element::{
    Complex, Element, ElementKind, Hypercomplex, Octonion, Quaternion, Real, Scalar,
};
pub use walk::{CoordWalker, WalkOrder};
