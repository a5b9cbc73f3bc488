//! Ordered search keys.
//!
//! An [`OrderedKey`] is a single `i64` projected from an arbitrary source
//! value. The projection is not injective: two different source values may
//! land on the same key and then compare `Equal`. The index accepts that.

use std::cmp::Ordering;
use std::fmt;

/// Projects a source value onto the scalar that orders it in the index.
///
/// Integers project to themselves and floats through an order-preserving
/// bit transform. Text and bytes project through CRC-32, which spreads them
/// across the key space but does not preserve their lexical order.
///
/// # Example
/// ```
/// use ixtree::index::btree::{KeyProjection, OrderedKey};
///
/// struct Account { id: u32, name: String }
///
/// impl KeyProjection for Account {
///     fn project(&self) -> i64 {
///         self.id.project()
///     }
/// }
///
/// let key = OrderedKey::from_source(&Account { id: 9, name: "ops".into() });
/// assert_eq!(key.value(), 9);
/// ```
pub trait KeyProjection {
    fn project(&self) -> i64;
}

macro_rules! impl_lossless_projection {
    ($($ty:ty),*) => {
        $(
            impl KeyProjection for $ty {
                #[inline]
                fn project(&self) -> i64 {
                    i64::from(*self)
                }
            }
        )*
    };
}

impl_lossless_projection!(i8, i16, i32, i64, u8, u16, u32, bool);

impl KeyProjection for u64 {
    /// Values above `i64::MAX` wrap into the negative range.
    #[inline]
    fn project(&self) -> i64 {
        *self as i64
    }
}

impl KeyProjection for usize {
    #[inline]
    fn project(&self) -> i64 {
        *self as i64
    }
}

impl KeyProjection for char {
    #[inline]
    fn project(&self) -> i64 {
        i64::from(u32::from(*self))
    }
}

impl KeyProjection for f64 {
    /// Order-preserving: keys compare like [`f64::total_cmp`], so `-0.0`
    /// sorts below `0.0` and NaNs sit at the ends.
    #[inline]
    fn project(&self) -> i64 {
        let bits = self.to_bits() as i64;
        if bits < 0 {
            bits ^ i64::MAX
        } else {
            bits
        }
    }
}

impl KeyProjection for f32 {
    #[inline]
    fn project(&self) -> i64 {
        f64::from(*self).project()
    }
}

impl KeyProjection for [u8] {
    #[inline]
    fn project(&self) -> i64 {
        i64::from(crc32fast::hash(self))
    }
}

impl KeyProjection for Vec<u8> {
    #[inline]
    fn project(&self) -> i64 {
        self.as_slice().project()
    }
}

impl KeyProjection for str {
    #[inline]
    fn project(&self) -> i64 {
        self.as_bytes().project()
    }
}

impl KeyProjection for String {
    #[inline]
    fn project(&self) -> i64 {
        self.as_str().project()
    }
}

impl<T: KeyProjection + ?Sized> KeyProjection for &T {
    #[inline]
    fn project(&self) -> i64 {
        (**self).project()
    }
}

/// An immutable, totally ordered search key.
///
/// # Example
/// ```
/// use ixtree::index::btree::OrderedKey;
/// use std::cmp::Ordering;
///
/// let a = OrderedKey::from_source(&1);
/// let b = OrderedKey::new(2);
/// assert_eq!(a.compare(&b), Ordering::Less);
/// assert_eq!(b.compare(&a), Ordering::Greater);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderedKey(i64);

impl OrderedKey {
    /// Wrap an already projected scalar.
    #[inline]
    pub const fn new(value: i64) -> Self {
        OrderedKey(value)
    }

    /// Derive a key from a source value.
    #[inline]
    pub fn from_source<T: KeyProjection + ?Sized>(source: &T) -> Self {
        OrderedKey(source.project())
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Three-way comparison, consistent with the scalar projection.
    #[inline]
    pub fn compare(&self, other: &OrderedKey) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for OrderedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_projection_is_identity() {
        assert_eq!(OrderedKey::from_source(&42i32).value(), 42);
        assert_eq!(OrderedKey::from_source(&-7i64).value(), -7);
        assert_eq!(OrderedKey::from_source(&200u8).value(), 200);
        assert_eq!(OrderedKey::from_source(&true).value(), 1);
    }

    #[test]
    fn test_compare() {
        let one = OrderedKey::new(1);
        let two = OrderedKey::new(2);
        assert_eq!(one.compare(&two), Ordering::Less);
        assert_eq!(two.compare(&one), Ordering::Greater);
        assert_eq!(one.compare(&OrderedKey::new(1)), Ordering::Equal);
    }

    #[test]
    fn test_text_projection_is_stable() {
        let a = OrderedKey::from_source("alpha");
        let b = OrderedKey::from_source(&String::from("alpha"));
        assert_eq!(a, b);
        assert_eq!(a.value(), i64::from(crc32fast::hash(b"alpha")));
        assert_ne!(a, OrderedKey::from_source("beta"));
    }

    #[test]
    fn test_bytes_and_text_agree() {
        assert_eq!(
            OrderedKey::from_source(b"abc".as_slice()),
            OrderedKey::from_source("abc")
        );
    }

    #[test]
    fn test_float_projection_preserves_order() {
        let values = [f64::NEG_INFINITY, -2.5, -1.0, -0.0, 0.0, 1e-300, 1.0, 2.5, f64::INFINITY];
        for pair in values.windows(2) {
            let lo = OrderedKey::from_source(&pair[0]);
            let hi = OrderedKey::from_source(&pair[1]);
            assert_eq!(lo.compare(&hi), Ordering::Less, "{} vs {}", pair[0], pair[1]);
        }
        assert_eq!(
            OrderedKey::from_source(&1.5f64),
            OrderedKey::from_source(&1.5f64)
        );
    }

    #[test]
    fn test_f32_agrees_with_f64() {
        assert_eq!(
            OrderedKey::from_source(&-3.25f32),
            OrderedKey::from_source(&-3.25f64)
        );
        assert!(OrderedKey::from_source(&-1.0f32) < OrderedKey::from_source(&0.5f32));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", OrderedKey::new(-3)), "Key(-3)");
    }
}
