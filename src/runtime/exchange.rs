// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The inter-node scheduler: master/worker unit exchange.
//!
//! Rank 0 is the master and never solves (outside the degenerate
//! fallbacks); it owns the unit list and is the single point of
//! arbitration for who works on what. Ranks `1..` are workers that pull
//! units on demand. Workers never talk to each other.
//!
//! Shutdown discipline: every worker receives exactly one `Terminate`,
//! and the master does not exit until it has sent all of them. A worker
//! that reports a solution after shutdown has begun still gets its
//! `SolutionData` drained (so nothing is left in any queue) before being
//! terminated.
//!
//! The hybrid composition is the same protocol with a different engine
//! plugged into the worker: instead of running the backtracker directly
//! on the received unit, the worker fixes the unit's assignments into a
//! sub-puzzle and hands it to the intra-node pool. Only the rank's main
//! thread touches the message plane; pool tasks never do.

use log::{debug, info};

use crate::distribution::{calibrate_depth, generate_work_units, target_tasks, WorkUnit};
use crate::model::constants::WORK_UNIT_CAP;
use crate::model::{Grid, Puzzle};
use crate::runtime::cluster::{run_cluster, Cluster, Message};
use crate::runtime::pool::{solve_pool, PoolOptions};
use crate::runtime::SolverError;
use crate::solver::sequential::{color_g_seq, solve_sequential};
use crate::solver::stats::{Counter, Counters};

/// How a worker turns a received unit into a solve attempt.
#[derive(Debug, Clone)]
pub enum WorkerEngine {
    /// Run the backtracker from the unit's continuation point.
    Sequential,
    /// Fix the unit into a sub-puzzle and solve it on the intra-node
    /// pool (the hybrid composition).
    Pool(PoolOptions),
}

/// Tuning for the inter-node exchange.
#[derive(Debug, Clone)]
pub struct ClusterOptions {
    /// Worker count; the cluster runs `workers + 1` ranks.
    pub workers: usize,
    /// Over-subscription factor for the master's unit target.
    pub factor: f64,
    /// Cap forwarded to the work-unit enumerator.
    pub unit_cap: usize,
    pub engine: WorkerEngine,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            factor: 1.0,
            unit_cap: WORK_UNIT_CAP,
            engine: WorkerEngine::Sequential,
        }
    }
}

/// Solve with the master/worker exchange.
///
/// A deployment of one rank skips messaging entirely: the sequential
/// engine degenerates to the plain backtracker and the pool engine to a
/// pure intra-node solve.
pub fn solve_cluster(
    puzzle: &Puzzle,
    options: &ClusterOptions,
    counters: &Counters,
) -> Result<Option<Grid>, SolverError> {
    if options.workers == 0 {
        info!("single-rank deployment; skipping the message plane");
        return match &options.engine {
            WorkerEngine::Sequential => Ok(solve_sequential(puzzle)),
            WorkerEngine::Pool(pool_options) => solve_pool(puzzle, pool_options, counters),
        };
    }

    let target = target_tasks(options.workers, options.factor, "cluster master");
    let depth = calibrate_depth(puzzle, target);
    let units = if depth == 0 {
        Vec::new()
    } else {
        generate_work_units(puzzle, depth, options.unit_cap)
    };
    counters.add(Counter::UnitsGenerated, units.len() as u64);

    let ranks = options.workers + 1;
    let results = run_cluster(ranks, puzzle.size(), |mut endpoint| {
        if endpoint.rank() == 0 {
            master(puzzle, &mut endpoint, &units, counters)
        } else {
            worker(puzzle, &mut endpoint, &options.engine, counters)
        }
    })?;

    let mut solution = None;
    let mut fault = None;
    for (rank, result) in results.into_iter().enumerate() {
        match result {
            Ok(grid) if rank == 0 => solution = grid,
            Ok(_) => {}
            Err(e) => fault = fault.or(Some(e)),
        }
    }
    match fault {
        Some(e) => Err(e),
        None => Ok(solution),
    }
}

/// The master state machine.
fn master(
    puzzle: &Puzzle,
    endpoint: &mut impl Cluster,
    units: &[WorkUnit],
    counters: &Counters,
) -> Result<Option<Grid>, SolverError> {
    let workers = endpoint.size() - 1;
    debug!("master distributing {} units to {} workers", units.len(), workers);

    if units.is_empty() {
        info!("no work units; terminating workers and solving on the master");
        for w in 1..=workers {
            endpoint.send(w, &Message::Terminate)?;
        }
        // Each worker sends exactly one request before it can see the
        // terminate; drain them so nothing is left in flight.
        for _ in 0..workers {
            let (source, message) = endpoint.recv_any()?;
            if message != Message::WorkRequest {
                return Err(SolverError::Protocol { rank: source });
            }
        }
        return Ok(solve_sequential(puzzle));
    }

    let mut next_unit = 0;
    let mut solution: Option<Grid> = None;
    let mut active = workers;

    while active > 0 {
        let (source, message) = endpoint.recv_any()?;
        match message {
            Message::WorkRequest => {
                if solution.is_some() || next_unit >= units.len() {
                    endpoint.send(source, &Message::Terminate)?;
                    active -= 1;
                    debug!(
                        "terminating worker {source} ({}); {active} left",
                        if solution.is_some() {
                            "solution found elsewhere"
                        } else {
                            "no more work"
                        }
                    );
                } else {
                    endpoint.send(source, &Message::WorkAssignment(units[next_unit].clone()))?;
                    counters.increment(Counter::UnitsAssigned);
                    debug!(
                        "assigned unit {}/{} to worker {source}: {}",
                        next_unit + 1,
                        units.len(),
                        units[next_unit]
                    );
                    next_unit += 1;
                }
            }
            Message::SolutionFound => {
                // The data always follows; drain it even when another
                // worker won, to keep the channel clean.
                let data = endpoint.recv_from(source)?;
                let Message::SolutionData(grid) = data else {
                    return Err(SolverError::Protocol { rank: source });
                };
                if solution.is_none() {
                    info!("master received solution from worker {source}; shutting down");
                    solution = Some(grid);
                } else {
                    debug!("discarding late solution from worker {source}");
                }
                endpoint.send(source, &Message::Terminate)?;
                active -= 1;
            }
            _ => return Err(SolverError::Protocol { rank: source }),
        }
    }

    Ok(solution)
}

/// The worker state machine.
fn worker(
    puzzle: &Puzzle,
    endpoint: &mut impl Cluster,
    engine: &WorkerEngine,
    counters: &Counters,
) -> Result<Option<Grid>, SolverError> {
    let rank = endpoint.rank();
    // A nested-pool fault must not abandon the protocol: the master is
    // still counting on this rank's requests. Keep exchanging until
    // terminated, then surface the first fault.
    let mut deferred_fault: Option<SolverError> = None;

    loop {
        endpoint.send(0, &Message::WorkRequest)?;
        match endpoint.recv_from(0)? {
            Message::Terminate => {
                debug!("worker {rank} received terminate");
                break;
            }
            Message::WorkAssignment(unit) => {
                debug!("worker {rank} solving unit: {unit}");
                let solved = match engine {
                    WorkerEngine::Sequential => {
                        let mut grid = unit.apply(puzzle);
                        let (row, col) = unit.continuation();
                        counters.increment(Counter::TasksSpawned);
                        let ok = color_g_seq(puzzle, &mut grid, row, col);
                        counters.increment(Counter::TasksCompleted);
                        ok.then_some(grid)
                    }
                    WorkerEngine::Pool(pool_options) => {
                        let sub_puzzle = puzzle.with_assignments(&unit.triples());
                        match solve_pool(&sub_puzzle, pool_options, counters) {
                            Ok(solution) => solution,
                            Err(fault) => {
                                log::error!("worker {rank} pool fault: {fault}");
                                deferred_fault = deferred_fault.or(Some(fault));
                                None
                            }
                        }
                    }
                };

                if let Some(grid) = solved {
                    counters.increment(Counter::SolutionsFound);
                    endpoint.send(0, &Message::SolutionFound)?;
                    endpoint.send(0, &Message::SolutionData(grid))?;
                    // Wait for the master's shutdown ack.
                    match endpoint.recv_from(0)? {
                        Message::Terminate => {}
                        _ => return Err(SolverError::Protocol { rank }),
                    }
                    debug!("worker {rank} reported a solution and terminated");
                    break;
                }
            }
            _ => return Err(SolverError::Protocol { rank }),
        }
    }

    match deferred_fault {
        Some(fault) => Err(fault),
        None => Ok(None),
    }
}
