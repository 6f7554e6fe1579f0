//! Monotonic time source

/// Monotonic tick counter
///
/// One tick is one millisecond since boot. Reading the counter must be
/// cheap and safe from interrupt context.
pub trait TickSource {
    /// Current tick count
    fn now_ticks(&self) -> u64;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now_ticks(&self) -> u64 {
        (**self).now_ticks()
    }
}
