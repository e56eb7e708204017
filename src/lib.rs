pub mod game;

// ============================================================================
// Profiling Macros
// ============================================================================

/// Tick-sampled status logging, enabled by the `perf_stats` feature.
///
/// Logs once every 100 simulation ticks. `$tick` is anything with a `.0`
/// tick count, typically `Res<SimTick>`.
///
/// # Example
/// ```ignore
/// profile_log!(tick, "Drifting {} actors", query.iter().len());
/// ```
///
/// Without `perf_stats` the macro expands to an empty block and its
/// arguments are never evaluated.
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {
        if $tick.0 % 100 == 0 {
            bevy::prelude::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {};
}
