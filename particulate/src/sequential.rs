use crate::ExecutionSpace;

/// Execution space running every index on the calling thread.
#[derive(Clone, Copy, Default, Debug)]
pub struct Serial;

impl ExecutionSpace for Serial {
    #[inline]
    fn map_indices<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        (0..len).map(f).collect()
    }

    #[inline]
    fn for_each_mut<T, F>(&self, items: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync + Send,
    {
        items.iter_mut().enumerate().for_each(|(i, item)| f(i, item))
    }
}
