use nalgebra::Vector3;
use rayon::prelude::*;
use std::cell::UnsafeCell;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

/// A 2D buffer holding color and depth per pixel, row-major.
///
/// Color channels are stored as f32 in the 0..255 range (raw interpolation
/// results; clamping happens when the buffer is packed for presentation).
/// Depth holds the minimum accepted view-space depth per pixel.
///
/// Thread-safe for parallel rasterization: the depth test is an atomic
/// compare-and-swap over the f32 bit pattern, color writes go through a
/// striped lock pool.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,

    /// Color buffer wrapped in UnsafeCell to allow interior mutability.
    /// Safety is guaranteed by `locks` and depth testing.
    color_buffer: UnsafeCell<Vec<Vector3<f32>>>,

    /// Depth buffer stored as atomic bits of f32.
    pub depth_buffer: Vec<AtomicU32>,

    /// Striped locks protecting color writes; pixel indices map onto the
    /// pool to bound memory while keeping contention low.
    locks: Vec<Mutex<()>>,
}

// Thread safety is managed manually via the atomics and the lock pool.
unsafe impl Sync for FrameBuffer {}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;

        let inf_bits = f32::INFINITY.to_bits();
        let mut depth_buffer = Vec::with_capacity(size);
        for _ in 0..size {
            depth_buffer.push(AtomicU32::new(inf_bits));
        }

        let lock_count = 1024;
        let mut locks = Vec::with_capacity(lock_count);
        for _ in 0..lock_count {
            locks.push(Mutex::new(()));
        }

        Self {
            width,
            height,
            color_buffer: UnsafeCell::new(vec![Vector3::zeros(); size]),
            depth_buffer,
            locks,
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Resets every depth entry to `depth` (normally +infinity).
    pub fn clear_depth(&mut self, depth: f32) {
        let bits = depth.to_bits();
        for entry in &self.depth_buffer {
            entry.store(bits, Ordering::Relaxed);
        }
    }

    /// Fills the whole color buffer with a single color.
    pub fn fill_color(&mut self, color: Vector3<f32>) {
        for pixel in self.color_buffer.get_mut().iter_mut() {
            *pixel = color;
        }
    }

    /// Paints a vertical gradient from `top` (row 0) to `bottom` (last row).
    pub fn fill_gradient(&mut self, top: Vector3<f32>, bottom: Vector3<f32>) {
        let width = self.width;
        let height = self.height as f32;

        self.color_buffer
            .get_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                let t = y as f32 / height;
                let color = top + (bottom - top) * t;
                for pixel in row {
                    *pixel = color;
                }
            });
    }

    /// Thread-safe strict nearest-wins depth test.
    /// Returns true and records the new depth iff it is strictly nearer than
    /// the current entry.
    #[inline]
    pub fn depth_test_and_update(&self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        let new_bits = new_depth.to_bits();
        let depth_atomic = &self.depth_buffer[idx];

        // CAS loop: lose as soon as someone else holds a nearer depth.
        let mut current_bits = depth_atomic.load(Ordering::Relaxed);
        loop {
            let current_depth = f32::from_bits(current_bits);
            if new_depth >= current_depth {
                return false;
            }

            match depth_atomic.compare_exchange_weak(
                current_bits,
                new_bits,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(updated_bits) => current_bits = updated_bits,
            }
        }
    }

    /// Thread-safe pixel write.
    /// Should only be called AFTER depth_test_and_update returns true.
    #[inline]
    pub fn set_pixel_safe(&self, x: usize, y: usize, color: Vector3<f32>) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);

            let lock_idx = idx % self.locks.len();
            let _guard = self.locks[lock_idx].lock().unwrap();

            // Holding the stripe lock makes this the only writer for the
            // pixels mapped onto it.
            unsafe {
                let buffer = &mut *self.color_buffer.get();
                buffer[idx] = color;
            }
        }
    }

    /// Reads a pixel's color. Safe once rasterization has finished.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let buffer = unsafe { &*self.color_buffer.get() };
        Some(buffer[self.index(x, y)])
    }

    /// Reads a pixel's current depth entry.
    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let bits = self.depth_buffer[self.index(x, y)].load(Ordering::Relaxed);
        Some(f32::from_bits(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_test_is_strictly_nearest_wins() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.clear_depth(f32::INFINITY);

        assert!(fb.depth_test_and_update(1, 1, 5.0));
        assert!(fb.depth_test_and_update(1, 1, 3.0));
        // Equal depth loses: the test is strict.
        assert!(!fb.depth_test_and_update(1, 1, 3.0));
        assert!(!fb.depth_test_and_update(1, 1, 7.0));
        assert_eq!(fb.get_depth(1, 1), Some(3.0));
    }

    #[test]
    fn out_of_bounds_never_passes() {
        let fb = FrameBuffer::new(2, 2);
        assert!(!fb.depth_test_and_update(2, 0, 1.0));
        assert!(!fb.depth_test_and_update(0, 2, 1.0));
        assert_eq!(fb.get_pixel(2, 2), None);
    }

    #[test]
    fn gradient_interpolates_top_to_bottom() {
        let mut fb = FrameBuffer::new(2, 4);
        fb.fill_gradient(Vector3::new(80.0, 80.0, 80.0), Vector3::zeros());

        let top = fb.get_pixel(0, 0).unwrap();
        let lower = fb.get_pixel(0, 3).unwrap();
        assert!((top.x - 80.0).abs() < 1e-5);
        assert!(lower.x < top.x);
    }
}
