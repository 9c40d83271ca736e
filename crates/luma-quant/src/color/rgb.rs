//! 8-bit RGB pixel.

/// An RGB triplet with 8-bit unsigned channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// A gray pixel with all three channels set to `value`.
    ///
    /// # Example
    /// ```
    /// use luma_quant::Rgb;
    /// let mid = Rgb::gray(128);
    /// assert!(mid.is_gray());
    /// ```
    #[inline]
    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Returns `true` when R == G == B.
    #[inline]
    pub fn is_gray(self) -> bool {
        self.red == self.green && self.green == self.blue
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array `[R, G, B]`.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}
