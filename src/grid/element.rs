//! Sample element types.
//!
//! Every decoded sample is a fixed-width tuple of real components: one for
//! real data, two for complex, four for quaternion and eight for octonion.
//! The decoders only ever need three operations from an element: construct
//! the zero value, set component `i`, and read all components back.

use std::fmt;

use serde::Serialize;

// =============================================================================
// Scalar
// =============================================================================

/// Floating-point component type.
pub trait Scalar: Copy + Default + PartialEq + fmt::Debug + fmt::Display + 'static {
    fn from_f32(value: f32) -> Self;
    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl Scalar for f32 {
    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Scalar for f64 {
    #[inline]
    fn from_f32(value: f32) -> Self {
        value as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

// =============================================================================
// ElementKind
// =============================================================================

/// Algebraic kind of a sample element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Real,
    Complex,
    Quaternion,
    Octonion,
}

impl ElementKind {
    /// Number of scalar components in one element.
    pub const fn component_count(self) -> usize {
        match self {
            ElementKind::Real => 1,
            ElementKind::Complex => 2,
            ElementKind::Quaternion => 4,
            ElementKind::Octonion => 8,
        }
    }

    /// Smallest kind able to hold `count` components.
    ///
    /// 1 is real, 2 complex, 3-4 quaternion, 5-8 octonion. Anything else
    /// returns `None`.
    pub const fn for_component_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ElementKind::Real),
            2 => Some(ElementKind::Complex),
            3 | 4 => Some(ElementKind::Quaternion),
            5..=8 => Some(ElementKind::Octonion),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::Real => "real",
            ElementKind::Complex => "complex",
            ElementKind::Quaternion => "quaternion",
            ElementKind::Octonion => "octonion",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Element
// =============================================================================

/// A grid element built from a fixed number of scalar components.
pub trait Element: Copy + Default + PartialEq + fmt::Debug {
    type Scalar: Scalar;

    const KIND: ElementKind;

    /// Set component `index`. Indices past the element width are ignored.
    fn set_component(&mut self, index: usize, value: Self::Scalar);

    /// All components in order (r, i, j, k, ...).
    fn components(&self) -> &[Self::Scalar];

    /// Build an element from a component slice, zero-padding missing
    /// components and dropping surplus ones.
    fn from_components(values: &[Self::Scalar]) -> Self {
        let mut element = Self::default();
        for (index, value) in values.iter().enumerate() {
            element.set_component(index, *value);
        }
        element
    }
}

/// Fixed-width hypercomplex value with `N` components.
#[derive(Clone, Copy, PartialEq)]
pub struct Hypercomplex<T, const N: usize>([T; N]);

/// One-component element.
pub type Real<T> = Hypercomplex<T, 1>;
/// Two-component element (r, i).
pub type Complex<T> = Hypercomplex<T, 2>;
/// Four-component element (r, i, j, k).
pub type Quaternion<T> = Hypercomplex<T, 4>;
/// Eight-component element (r, i, j, k, l, i0, j0, k0).
pub type Octonion<T> = Hypercomplex<T, 8>;

impl<T: Scalar, const N: usize> Hypercomplex<T, N> {
    pub const fn new(components: [T; N]) -> Self {
        Self(components)
    }

    /// The real (first) component.
    pub fn re(&self) -> T {
        self.0[0]
    }
}

impl<T: Scalar, const N: usize> Default for Hypercomplex<T, N> {
    fn default() -> Self {
        Self([T::default(); N])
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Hypercomplex<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

macro_rules! impl_element {
    ($width:literal, $kind:expr) => {
        impl<T: Scalar> Element for Hypercomplex<T, $width> {
            type Scalar = T;

            const KIND: ElementKind = $kind;

            #[inline]
            fn set_component(&mut self, index: usize, value: T) {
                if let Some(slot) = self.0.get_mut(index) {
                    *slot = value;
                }
            }

            #[inline]
            fn components(&self) -> &[T] {
                &self.0
            }
        }
    };
}

impl_element!(1, ElementKind::Real);
impl_element!(2, ElementKind::Complex);
impl_element!(4, ElementKind::Quaternion);
impl_element!(8, ElementKind::Octonion);
