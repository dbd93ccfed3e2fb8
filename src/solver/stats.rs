// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Solve statistics and scheduler counters.
//!
//! [`SolverStats`] is the per-solve summary every entry point returns.
//! [`Counters`] is a small atomic counter array the schedulers increment
//! from concurrent tasks; tests use it to observe scheduling behavior
//! (how many units were generated, how many tasks actually ran) without
//! reaching into scheduler internals.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use strum::EnumCount;
use strum_macros::EnumCount as EnumCountMacro;

/// Scheduler-side event counters.
#[derive(EnumCountMacro, Copy, Clone, Debug)]
#[repr(u8)]
pub enum Counter {
    /// Work units materialized by the enumerator.
    UnitsGenerated,
    /// Units handed to a worker by the cluster master.
    UnitsAssigned,
    /// Unit solve attempts started (pool tasks, or a cluster worker's
    /// sequential runs).
    TasksSpawned,
    /// Solve attempts that ran to completion (including early-exit
    /// returns).
    TasksCompleted,
    /// Successful solves reported by tasks or workers.
    SolutionsFound,
}

/// A fixed array of atomic counters, one per [`Counter`].
///
/// Shared by reference across every task of a solve; increments use
/// relaxed ordering since the values are purely informational.
#[derive(Debug, Default)]
pub struct Counters {
    counts: [AtomicU64; Counter::COUNT],
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, counter: Counter, n: u64) {
        self.counts[counter as usize].fetch_add(n, Ordering::Relaxed);
    }

    pub fn increment(&self, counter: Counter) {
        self.add(counter, 1);
    }

    pub fn get(&self, counter: Counter) -> u64 {
        self.counts[counter as usize].load(Ordering::Relaxed)
    }
}

/// Summary of one solve, phase timings included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverStats {
    /// Seconds spent in the pre-coloring pass.
    pub pre_color_seconds: f64,
    /// Seconds spent in the search phase (whichever scheduler ran).
    pub coloring_seconds: f64,
    /// Total seconds for the solve.
    pub total_seconds: f64,
    /// Candidates removed by pre-coloring.
    pub colors_removed: u32,
    /// Candidates surviving pre-coloring.
    pub remaining_colors: u32,
    /// Total colors processed, `size³` for an N×N puzzle.
    pub total_processed: u64,
    /// Whether a solution was found.
    pub found_solution: bool,
}

impl fmt::Display for SolverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution found: {}", if self.found_solution { "Yes" } else { "No" })?;
        if !self.found_solution {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "Color statistics:")?;
        writeln!(f, "  Colors removed by pre-coloring: {}", self.colors_removed)?;
        writeln!(f, "  Colors remaining: {}", self.remaining_colors)?;
        if self.colors_removed > 0 {
            let reduction = self.colors_removed as f64
                / (self.colors_removed as f64 + self.remaining_colors as f64)
                * 100.0;
            writeln!(f, "  Search space reduction: {reduction:.1}%")?;
        }

        writeln!(f)?;
        writeln!(f, "Timing breakdown:")?;
        writeln!(f, "  Pre-coloring phase: {:.6} seconds", self.pre_color_seconds)?;
        writeln!(f, "  Solving phase:      {:.6} seconds", self.coloring_seconds)?;
        writeln!(f, "  Total time:         {:.6} seconds", self.total_seconds)?;

        if self.total_seconds > 0.0 {
            writeln!(f)?;
            writeln!(f, "Time distribution:")?;
            writeln!(
                f,
                "  Pre-coloring: {:.1}%",
                self.pre_color_seconds / self.total_seconds * 100.0
            )?;
            writeln!(
                f,
                "  Solving:      {:.1}%",
                self.coloring_seconds / self.total_seconds * 100.0
            )?;
        }
        Ok(())
    }
}

/// Render a with/without pre-coloring comparison.
pub fn render_comparison(with_precolor: &SolverStats, without_precolor: &SolverStats) -> String {
    let mut out = String::new();
    out.push_str("Comparison: pre-coloring impact\n");
    out.push_str("===============================\n");

    if !with_precolor.found_solution || !without_precolor.found_solution {
        out.push_str("WARNING: solution status differs between runs\n");
        return out;
    }

    out.push_str(&format!(
        "  Pre-coloring phase: {:10.6}s (without: none)\n",
        with_precolor.pre_color_seconds
    ));
    out.push_str(&format!(
        "  Solving phase:      {:10.6}s (without: {:.6}s)\n",
        with_precolor.coloring_seconds, without_precolor.coloring_seconds
    ));
    out.push_str(&format!(
        "  Total:              {:10.6}s (without: {:.6}s)\n",
        with_precolor.total_seconds, without_precolor.total_seconds
    ));

    if with_precolor.total_seconds > 0.0 {
        let speedup = without_precolor.total_seconds / with_precolor.total_seconds;
        out.push_str(&format!("  Overall speedup: {speedup:.2}x\n"));
    }
    out.push_str(&format!(
        "  Search space: {} colors before, {} after ({} removed)\n",
        without_precolor.remaining_colors,
        with_precolor.remaining_colors,
        with_precolor.colors_removed,
    ));
    out
}

/// Speedup/efficiency/cost lines for a sequential-vs-parallel pair.
pub fn render_parallel_metrics(
    sequential_seconds: f64,
    parallel_seconds: f64,
    processors: usize,
) -> String {
    let speedup = sequential_seconds / parallel_seconds;
    let efficiency = speedup / processors as f64;
    format!(
        "Parallel metrics over {} processors:\n  Speedup: {:.2}x\n  Efficiency: {:.1}%\n  Cost: {:.6} processor-seconds\n",
        processors,
        speedup,
        efficiency * 100.0,
        parallel_seconds * processors as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let counters = Counters::new();
        counters.increment(Counter::TasksSpawned);
        counters.add(Counter::TasksSpawned, 2);
        counters.increment(Counter::SolutionsFound);
        assert_eq!(counters.get(Counter::TasksSpawned), 3);
        assert_eq!(counters.get(Counter::SolutionsFound), 1);
        assert_eq!(counters.get(Counter::UnitsGenerated), 0);
    }

    #[test]
    fn test_display_without_solution_is_terse() {
        let stats = SolverStats::default();
        let text = stats.to_string();
        assert!(text.contains("Solution found: No"));
        assert!(!text.contains("Timing"));
    }

    #[test]
    fn test_display_with_solution_has_breakdown() {
        let stats = SolverStats {
            pre_color_seconds: 0.25,
            coloring_seconds: 0.75,
            total_seconds: 1.0,
            colors_removed: 10,
            remaining_colors: 30,
            total_processed: 64,
            found_solution: true,
        };
        let text = stats.to_string();
        assert!(text.contains("Solution found: Yes"));
        assert!(text.contains("Search space reduction: 25.0%"));
        assert!(text.contains("Pre-coloring: 25.0%"));
    }

    #[test]
    fn test_parallel_metrics_arithmetic() {
        let text = render_parallel_metrics(8.0, 2.0, 4);
        assert!(text.contains("Speedup: 4.00x"));
        assert!(text.contains("Efficiency: 100.0%"));
        assert!(text.contains("Cost: 8.000000"));
    }

    #[test]
    fn test_comparison_warns_on_mismatch() {
        let found = SolverStats {
            found_solution: true,
            ..Default::default()
        };
        let missed = SolverStats::default();
        assert!(render_comparison(&found, &missed).contains("WARNING"));
    }
}
