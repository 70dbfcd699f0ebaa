//! Threshold-based parallel dispatch for per-pixel passes over RGB buffers.

use rayon::prelude::*;

/// Pixel count above which passes run on the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 64 * 1024;

/// Fold/reduce over the RGB pixels of a raw buffer.
///
/// Partial accumulators from different threads are merged with `reduce`, so
/// the result does not depend on how the buffer was split.
pub fn fold_pixels<A, I, F, R>(raw: &[u8], init: I, fold_fn: F, reduce_fn: R) -> A
where
    A: Send,
    I: Fn() -> A + Sync + Send,
    F: Fn(A, &[u8]) -> A + Sync + Send,
    R: Fn(A, A) -> A + Sync + Send,
{
    if raw.len() / 3 >= PARALLEL_THRESHOLD {
        raw.par_chunks_exact(3)
            .fold(&init, &fold_fn)
            .reduce(&init, &reduce_fn)
    } else {
        raw.chunks_exact(3).fold(init(), fold_fn)
    }
}

/// Apply `f` to every RGB pixel of a raw buffer in place.
pub fn for_each_pixel_mut<F>(raw: &mut [u8], f: F)
where
    F: Fn(&mut [u8]) + Sync + Send,
{
    if raw.len() / 3 >= PARALLEL_THRESHOLD {
        raw.par_chunks_exact_mut(3).for_each(f);
    } else {
        raw.chunks_exact_mut(3).for_each(f);
    }
}
