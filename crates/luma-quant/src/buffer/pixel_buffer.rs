//! Row-major image buffer with shared-storage views.
//!
//! A [`PixelBuffer`] is a handle onto a reference-counted backing store plus
//! the geometry of the region it exposes: origin, extent and stride (the
//! row width of the store). An owning buffer exposes the whole store; a view
//! exposes a sub-rectangle of it. All element access goes through index
//! translation, so a view never sees samples outside its rectangle.
//!
//! The store lives as long as any handle refers to it. Views are read/write
//! windows: writes through a view are visible through the parent and every
//! other overlapping view. Callers that write from several threads must
//! partition the image into non-overlapping views.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rayon::prelude::*;

use crate::color::Rgb;
use crate::error::QuantError;

/// A 2D buffer of `T`, either owning its store or viewing part of another's.
///
/// The default element type is [`Rgb`]; scalar planes use a
/// [`Sample`](crate::buffer::Sample) type such as `u8` or `i32`.
///
/// # Example
///
/// ```
/// use luma_quant::PixelBuffer;
///
/// let mut image = PixelBuffer::<u8>::new(4, 4).unwrap();
/// let mut corner = image.view(2, 2, 2, 2).unwrap();
/// corner.set(0, 0, 9).unwrap();
///
/// assert_eq!(image.get(2, 2).unwrap(), 9);
/// assert!(corner.is_view());
/// ```
pub struct PixelBuffer<T = Rgb> {
    width: usize,
    height: usize,
    /// Diagnostic identifier; views inherit it from the buffer they were cut from.
    id: u32,
    origin_x: usize,
    origin_y: usize,
    /// Row width of the backing store.
    stride: usize,
    is_view: bool,
    store: Arc<RwLock<Vec<T>>>,
}

fn check_dimensions(width: usize, height: usize) -> Result<usize, QuantError> {
    if width == 0 || height == 0 {
        return Err(QuantError::InvalidDimension { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(QuantError::InvalidDimension { width, height })
}

impl<T: Copy + Default> PixelBuffer<T> {
    /// Create a buffer with every element set to `T::default()`.
    ///
    /// Fails with [`QuantError::InvalidDimension`] if either side is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, QuantError> {
        Self::filled(width, height, T::default())
    }
}

impl<T: Copy> PixelBuffer<T> {
    /// Create a buffer with every element set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, QuantError> {
        let size = check_dimensions(width, height)?;
        Ok(Self::owning(width, height, vec![value; size]))
    }

    /// Wrap row-major data of exactly `width * height` elements.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, QuantError> {
        let size = check_dimensions(width, height)?;
        if data.len() != size {
            return Err(QuantError::LengthMismatch {
                expected: size,
                actual: data.len(),
            });
        }
        Ok(Self::owning(width, height, data))
    }

    fn owning(width: usize, height: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            id: rand::random(),
            origin_x: 0,
            origin_y: 0,
            stride: width,
            is_view: false,
            store: Arc::new(RwLock::new(data)),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of visible elements, `width * height`.
    #[inline]
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Offset of this region inside the backing store, as `(x, y)`.
    #[inline]
    pub fn origin(&self) -> (usize, usize) {
        (self.origin_x, self.origin_y)
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn is_view(&self) -> bool {
        self.is_view
    }

    /// Create a view of the rectangle at `(origin_x, origin_y)` with the
    /// given extent, in this buffer's coordinates.
    ///
    /// The view shares the backing store; no samples are copied. Views of
    /// views compose.
    pub fn view(
        &self,
        origin_x: usize,
        origin_y: usize,
        width: usize,
        height: usize,
    ) -> Result<Self, QuantError> {
        check_dimensions(width, height)?;
        let fits_x = origin_x.checked_add(width).is_some_and(|end| end <= self.width);
        let fits_y = origin_y.checked_add(height).is_some_and(|end| end <= self.height);
        if !fits_x || !fits_y {
            return Err(QuantError::OutOfBounds {
                origin_x,
                origin_y,
                width,
                height,
                owner_width: self.width,
                owner_height: self.height,
            });
        }
        Ok(Self {
            width,
            height,
            id: self.id,
            origin_x: self.origin_x + origin_x,
            origin_y: self.origin_y + origin_y,
            stride: self.stride,
            is_view: true,
            store: Arc::clone(&self.store),
        })
    }

    #[inline]
    fn store_index(&self, row: usize, col: usize) -> usize {
        (self.origin_y + row) * self.stride + self.origin_x + col
    }

    /// Translate a flat row-major index of this region into a store index.
    #[inline]
    fn translate(&self, index: usize) -> usize {
        self.store_index(index / self.width, index % self.width)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bounds-checked element read.
    pub fn get(&self, row: usize, col: usize) -> Result<T, QuantError> {
        if row >= self.height || col >= self.width {
            return Err(QuantError::element(row, col, self.width, self.height));
        }
        Ok(self.read()[self.store_index(row, col)])
    }

    /// Element read without a `Result`.
    ///
    /// # Panics
    /// Panics if `(row, col)` is outside the region.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        assert!(
            row < self.height && col < self.width,
            "({row}, {col}) outside {}x{} buffer",
            self.width,
            self.height
        );
        self.read()[self.store_index(row, col)]
    }

    /// Bounds-checked read by flat row-major index.
    pub fn get_index(&self, index: usize) -> Result<T, QuantError> {
        if index >= self.size() {
            return Err(QuantError::element(
                index / self.width,
                index % self.width,
                self.width,
                self.height,
            ));
        }
        Ok(self.read()[self.translate(index)])
    }

    /// Read by flat row-major index.
    ///
    /// # Panics
    /// Panics if `index >= size()`.
    #[inline]
    pub fn at_index(&self, index: usize) -> T {
        assert!(index < self.size(), "index {index} outside buffer of {}", self.size());
        self.read()[self.translate(index)]
    }

    /// Bounds-checked element write.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), QuantError> {
        if row >= self.height || col >= self.width {
            return Err(QuantError::element(row, col, self.width, self.height));
        }
        let index = self.store_index(row, col);
        self.write()[index] = value;
        Ok(())
    }

    /// Element write without a `Result`.
    ///
    /// # Panics
    /// Panics if `(row, col)` is outside the region.
    #[inline]
    pub fn put(&mut self, row: usize, col: usize, value: T) {
        assert!(
            row < self.height && col < self.width,
            "({row}, {col}) outside {}x{} buffer",
            self.width,
            self.height
        );
        let index = self.store_index(row, col);
        self.write()[index] = value;
    }

    /// Row-major copy of the visible region.
    pub fn to_vec(&self) -> Vec<T> {
        let store = self.read();
        let mut out = Vec::with_capacity(self.size());
        for row in 0..self.height {
            let start = self.store_index(row, 0);
            out.extend_from_slice(&store[start..start + self.width]);
        }
        out
    }

    /// Overwrite the visible region from row-major data of `size()` elements.
    pub fn write_from(&mut self, data: &[T]) -> Result<(), QuantError> {
        if data.len() != self.size() {
            return Err(QuantError::LengthMismatch {
                expected: self.size(),
                actual: data.len(),
            });
        }
        let mut store = self.write();
        for (row, src) in data.chunks_exact(self.width).enumerate() {
            let start = self.store_index(row, 0);
            store[start..start + self.width].copy_from_slice(src);
        }
        Ok(())
    }

    /// Deep copy of exactly `size()` elements into a new owning buffer.
    ///
    /// The copy gets a fresh identifier. Copying a view yields an owning
    /// buffer of the view's extent.
    pub fn copy(&self) -> Self {
        Self::owning(self.width, self.height, self.to_vec())
    }

    /// Apply `f` to every element in row-major order, producing a new
    /// owning buffer of the same extent.
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> PixelBuffer<U> {
        let data = self.to_vec().into_iter().map(f).collect();
        PixelBuffer::owning(self.width, self.height, data)
    }

    /// Like [`map`](Self::map), with elements processed on the rayon pool.
    ///
    /// Output order is still row-major.
    pub fn par_map<U>(&self, f: impl Fn(T) -> U + Sync + Send) -> PixelBuffer<U>
    where
        T: Send + Sync,
        U: Copy + Send,
    {
        let data = self.to_vec().into_par_iter().map(f).collect();
        PixelBuffer::owning(self.width, self.height, data)
    }
}

impl<T: Copy> Clone for PixelBuffer<T> {
    /// Cloning is a deep copy; use [`PixelBuffer::view`] to share storage.
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<T: Copy + PartialEq> PartialEq for PixelBuffer<T> {
    /// Equal extent and equal visible contents. Identifiers are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.to_vec() == other.to_vec()
    }
}

impl<T> fmt::Debug for PixelBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("id", &self.id)
            .field("origin", &(self.origin_x, self.origin_y))
            .field("stride", &self.stride)
            .field("is_view", &self.is_view)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: 4x3 buffer whose element at (row, col) is `row * 10 + col`.
    fn numbered() -> PixelBuffer<u32> {
        let data = (0..3u32)
            .flat_map(|row| (0..4u32).map(move |col| row * 10 + col))
            .collect();
        PixelBuffer::from_vec(4, 3, data).unwrap()
    }

    #[test]
    fn test_new_is_zeroed() {
        let image = PixelBuffer::<Rgb>::new(3, 2).unwrap();
        assert_eq!(image.size(), 6);
        assert!(image.to_vec().iter().all(|&p| p == Rgb::default()));
        assert!(!image.is_view());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            PixelBuffer::<u8>::new(0, 5).unwrap_err(),
            QuantError::InvalidDimension {
                width: 0,
                height: 5
            }
        );
        assert!(PixelBuffer::<u8>::new(5, 0).is_err());
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let err = PixelBuffer::from_vec(2, 2, vec![0u8; 3]).unwrap_err();
        assert_eq!(
            err,
            QuantError::LengthMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_row_major_access() {
        let image = numbered();
        assert_eq!(image.get(0, 0).unwrap(), 0);
        assert_eq!(image.get(2, 3).unwrap(), 23);
        assert_eq!(image.at(1, 2), 12);
        assert_eq!(image.get_index(5).unwrap(), 11);
        assert_eq!(image.at_index(11), 23);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let image = numbered();
        assert!(matches!(
            image.get(3, 0),
            Err(QuantError::OutOfBounds { .. })
        ));
        assert!(image.get(0, 4).is_err());
        assert!(image.get_index(12).is_err());
    }

    #[test]
    #[should_panic]
    fn test_at_panics_out_of_bounds() {
        let image = numbered();
        let _ = image.at(0, 4);
    }

    #[test]
    fn test_view_translates_indices() {
        let image = numbered();
        let view = image.view(1, 1, 2, 2).unwrap();

        assert!(view.is_view());
        assert_eq!(view.origin(), (1, 1));
        assert_eq!(view.stride(), 4);
        assert_eq!(view.size(), 4);
        assert_eq!(view.to_vec(), vec![11, 12, 21, 22]);
        // flat index 3 -> (origin_y + 1) * stride + origin_x + 1
        assert_eq!(view.at_index(3), 22);
        assert_eq!(view.id(), image.id());
    }

    #[test]
    fn test_view_writes_are_shared() {
        let image = numbered();
        let mut view = image.view(2, 0, 2, 3).unwrap();
        view.set(1, 1, 99).unwrap();
        view.put(2, 0, 77);

        assert_eq!(image.get(1, 3).unwrap(), 99);
        assert_eq!(image.get(2, 2).unwrap(), 77);
    }

    #[test]
    fn test_view_out_of_bounds() {
        let image = numbered();
        assert_eq!(
            image.view(3, 0, 2, 1).unwrap_err(),
            QuantError::OutOfBounds {
                origin_x: 3,
                origin_y: 0,
                width: 2,
                height: 1,
                owner_width: 4,
                owner_height: 3,
            }
        );
        assert!(image.view(0, 2, 1, 2).is_err());
        assert!(image.view(usize::MAX, 0, 1, 1).is_err());
        assert!(matches!(
            image.view(0, 0, 0, 1),
            Err(QuantError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_nested_views_compose() {
        let image = numbered();
        let outer = image.view(1, 0, 3, 3).unwrap();
        let inner = outer.view(1, 1, 2, 2).unwrap();

        assert_eq!(inner.origin(), (2, 1));
        assert_eq!(inner.to_vec(), vec![12, 13, 22, 23]);
        assert!(outer.view(2, 0, 2, 1).is_err());
    }

    #[test]
    fn test_view_outlives_parent() {
        let view = {
            let image = numbered();
            image.view(0, 2, 4, 1).unwrap()
        };
        assert_eq!(view.to_vec(), vec![20, 21, 22, 23]);
    }

    #[test]
    fn test_write_from_fills_region_only() {
        let image = PixelBuffer::<u8>::new(3, 3).unwrap();
        let mut view = image.view(1, 1, 2, 2).unwrap();
        view.write_from(&[1, 2, 3, 4]).unwrap();

        assert_eq!(image.to_vec(), vec![0, 0, 0, 0, 1, 2, 0, 3, 4]);
        assert!(view.write_from(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_copy_is_deep() {
        let image = numbered();
        let mut copy = image.copy();
        copy.set(0, 0, 1000).unwrap();

        assert_eq!(image.get(0, 0).unwrap(), 0);
        assert_ne!(copy.id(), image.id());
        assert_eq!(copy.size(), image.size());
    }

    #[test]
    fn test_copy_of_view_is_owning() {
        let image = numbered();
        let copy = image.view(1, 1, 3, 2).unwrap().copy();

        assert!(!copy.is_view());
        assert_eq!(copy.stride(), 3);
        assert_eq!(copy.origin(), (0, 0));
        assert_eq!(copy.to_vec(), vec![11, 12, 13, 21, 22, 23]);
    }

    #[test]
    fn test_clone_does_not_share() {
        let image = numbered();
        let mut cloned = image.clone();
        cloned.put(1, 1, 0);
        assert_eq!(image.at(1, 1), 11);
        assert_eq!(image, numbered());
    }

    #[test]
    fn test_map_and_par_map_agree() {
        let image = numbered();
        let doubled = image.map(|v| v * 2);
        let par_doubled = image.par_map(|v| v * 2);

        assert_eq!(doubled, par_doubled);
        assert_eq!(doubled.at(2, 3), 46);
    }
}
