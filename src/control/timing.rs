//! Adaptive switch-time recomputation.

/// Recompute the switch time for the next period from the arrivals each
/// approach accumulated over the period just ended.
///
/// A zero count is treated as 1, so neither approach is ever starved and the
/// division is always defined. The green share for north-south is
/// `ns / (ns + we) * period` evaluated in integer arithmetic, truncating
/// toward zero, then clamped into `[1, period - 1]`.
///
/// Pure function of its inputs: identical counts always produce an identical
/// switch time.
pub fn recompute_switch_time(ns_count: u32, we_count: u32, period: u32) -> u32 {
    let ns = ns_count.max(1) as u64;
    let we = we_count.max(1) as u64;
    let mut switch_time = (ns * period as u64 / (ns + we)) as u32;
    if switch_time == 0 {
        switch_time = 1;
    }
    if switch_time >= period {
        switch_time = period - 1;
    }
    switch_time
}
