//! Scalar sample types.

/// A scalar element of a luma plane.
///
/// Conversions go through `f64`. Writing back is saturating: negative
/// values become zero and values above the type's maximum become the
/// maximum, so overflow never wraps.
pub trait Sample: Copy + Default + Send + Sync + 'static {
    /// Largest representable value, as `f64`.
    const MAX_VALUE: f64;

    fn to_f64(self) -> f64;

    /// Round-half-up (`floor(x + 0.5)`) and clamp into `0..=MAX_VALUE`.
    fn from_f64_saturating(value: f64) -> Self;
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const MAX_VALUE: f64 = <$t>::MAX as f64;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64_saturating(value: f64) -> Self {
                    let rounded = (value + 0.5).floor();
                    if rounded.is_nan() || rounded <= 0.0 {
                        0
                    } else if rounded >= Self::MAX_VALUE {
                        <$t>::MAX
                    } else {
                        rounded as $t
                    }
                }
            }
        )*
    };
}

impl_sample!(u8, u16, u32, i16, i32);
