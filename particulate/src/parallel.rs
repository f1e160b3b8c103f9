use crate::ExecutionSpace;
use rayon::iter::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefMutIterator, ParallelIterator,
};

/// Execution space distributing indices over multiple CPU threads with
/// [rayon](https://github.com/rayon-rs/rayon).
///
/// Work runs on rayon's global thread pool; install a custom pool around the call to control the
/// number of threads.
#[derive(Clone, Copy, Default, Debug)]
pub struct Threads;

impl ExecutionSpace for Threads {
    #[inline]
    fn map_indices<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        (0..len).into_par_iter().map(f).collect()
    }

    #[inline]
    fn for_each_mut<T, F>(&self, items: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync + Send,
    {
        items
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, item)| f(i, item))
    }
}
