// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The inter-node message plane.
//!
//! The master/worker protocol is written against the [`Cluster`] trait:
//! a rank, a peer count, tagged point-to-point sends, and two receive
//! flavors (from anyone, for the master's arbitration loop; from one
//! specific peer, for protocol follow-ups). Two implementations exist:
//!
//! - [`SingletonCluster`]: rank 0 of 1, no peers; the degenerate
//!   deployment where messaging never happens.
//! - [`ChannelEndpoint`]: an in-process cluster that runs each rank on
//!   its own OS thread. Ranks share nothing mutable; every exchange goes
//!   through a channel as a fixed-size `i32` frame, the same record
//!   layout a networked transport would ship, so the protocol code above
//!   this trait cannot tell the difference.
//!
//! Receive-from-specific over a single inbox needs message matching: a
//! frame from the wrong peer is parked in a pending queue and handed out
//! by a later receive instead of being dropped.

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::distribution::WorkUnit;
use crate::model::constants::UNIT_WIRE_WORDS;
use crate::model::{Color, Grid};
use crate::runtime::SolverError;

const TAG_WORK_REQUEST: i32 = 1;
const TAG_WORK_ASSIGNMENT: i32 = 2;
const TAG_SOLUTION_FOUND: i32 = 3;
const TAG_SOLUTION_DATA: i32 = 4;
const TAG_TERMINATE: i32 = 5;

/// The master/worker message vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Worker wakeup: "give me something to do".
    WorkRequest,
    /// Master's reply: one unit to solve.
    WorkAssignment(WorkUnit),
    /// Worker preamble: "I have a solution" (data follows).
    SolutionFound,
    /// The solution grid itself.
    SolutionData(Grid),
    /// Master's shutdown order (also the ack after `SolutionData`).
    Terminate,
}

impl Message {
    /// Encode as a tagged word frame: `[tag, payload...]`.
    ///
    /// Work units always occupy [`UNIT_WIRE_WORDS`] payload words and a
    /// grid occupies `size²`, so each tag has a fixed frame length for a
    /// given board size.
    pub fn encode(&self) -> Vec<i32> {
        match self {
            Message::WorkRequest => vec![TAG_WORK_REQUEST],
            Message::WorkAssignment(unit) => {
                let mut words = vec![TAG_WORK_ASSIGNMENT];
                words.extend(unit.encode());
                words
            }
            Message::SolutionFound => vec![TAG_SOLUTION_FOUND],
            Message::SolutionData(grid) => {
                let mut words = vec![TAG_SOLUTION_DATA];
                words.extend(grid.cells().iter().map(|&c| c as i32));
                words
            }
            Message::Terminate => vec![TAG_TERMINATE],
        }
    }

    /// Decode a frame received for a `board_size` puzzle.
    pub fn decode(words: &[i32], board_size: usize) -> Option<Self> {
        let (&tag, payload) = words.split_first()?;
        match tag {
            TAG_WORK_REQUEST if payload.is_empty() => Some(Message::WorkRequest),
            TAG_WORK_ASSIGNMENT if payload.len() == UNIT_WIRE_WORDS => {
                WorkUnit::decode(payload).map(Message::WorkAssignment)
            }
            TAG_SOLUTION_FOUND if payload.is_empty() => Some(Message::SolutionFound),
            TAG_SOLUTION_DATA if payload.len() == board_size * board_size => {
                let cells: Option<Vec<Color>> =
                    payload.iter().map(|&w| Color::try_from(w).ok()).collect();
                Grid::from_cells(board_size, &cells?).map(Message::SolutionData)
            }
            TAG_TERMINATE if payload.is_empty() => Some(Message::Terminate),
            _ => None,
        }
    }
}

/// Rank identity plus tagged point-to-point messaging.
pub trait Cluster {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    fn send(&mut self, dest: usize, message: &Message) -> Result<(), SolverError>;

    /// Blocking receive from any peer; returns the sender's rank.
    fn recv_any(&mut self) -> Result<(usize, Message), SolverError>;

    /// Blocking receive from one specific peer. Frames from other peers
    /// arriving in the meantime are retained for later receives.
    fn recv_from(&mut self, source: usize) -> Result<Message, SolverError>;
}

/// The trivial cluster: one process, no peers, no messages.
#[derive(Debug, Default)]
pub struct SingletonCluster;

impl Cluster for SingletonCluster {
    fn rank(&self) -> usize {
        0
    }
    fn size(&self) -> usize {
        1
    }
    fn send(&mut self, dest: usize, _message: &Message) -> Result<(), SolverError> {
        Err(SolverError::Disconnected { rank: dest })
    }
    fn recv_any(&mut self) -> Result<(usize, Message), SolverError> {
        Err(SolverError::Disconnected { rank: 0 })
    }
    fn recv_from(&mut self, source: usize) -> Result<Message, SolverError> {
        Err(SolverError::Disconnected { rank: source })
    }
}

/// A raw frame in flight: sender rank plus encoded words.
#[derive(Debug)]
struct Frame {
    source: usize,
    words: Vec<i32>,
}

/// One rank's endpoint of the in-process cluster.
pub struct ChannelEndpoint {
    rank: usize,
    board_size: usize,
    peers: Vec<Sender<Frame>>,
    inbox: Receiver<Frame>,
    pending: VecDeque<Frame>,
}

impl ChannelEndpoint {
    fn decode_frame(&self, frame: Frame) -> Result<(usize, Message), SolverError> {
        let source = frame.source;
        match Message::decode(&frame.words, self.board_size) {
            Some(message) => Ok((source, message)),
            None => Err(SolverError::MalformedFrame { rank: source }),
        }
    }

    /// Number of received-but-unconsumed frames, counting both the
    /// matching queue and anything buffered in the channel. The master
    /// asserts this is zero on shutdown.
    pub fn outstanding(&mut self) -> usize {
        while let Ok(frame) = self.inbox.try_recv() {
            self.pending.push_back(frame);
        }
        self.pending.len()
    }
}

impl Cluster for ChannelEndpoint {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len()
    }

    fn send(&mut self, dest: usize, message: &Message) -> Result<(), SolverError> {
        let frame = Frame {
            source: self.rank,
            words: message.encode(),
        };
        self.peers[dest]
            .send(frame)
            .map_err(|_| SolverError::Disconnected { rank: dest })
    }

    fn recv_any(&mut self) -> Result<(usize, Message), SolverError> {
        let frame = match self.pending.pop_front() {
            Some(frame) => frame,
            None => self
                .inbox
                .recv()
                .map_err(|_| SolverError::Disconnected { rank: self.rank })?,
        };
        self.decode_frame(frame)
    }

    fn recv_from(&mut self, source: usize) -> Result<Message, SolverError> {
        let parked = self
            .pending
            .iter()
            .position(|f| f.source == source)
            .and_then(|pos| self.pending.remove(pos));
        if let Some(frame) = parked {
            return self.decode_frame(frame).map(|(_, m)| m);
        }
        loop {
            let frame = self
                .inbox
                .recv()
                .map_err(|_| SolverError::Disconnected { rank: self.rank })?;
            if frame.source == source {
                return self.decode_frame(frame).map(|(_, m)| m);
            }
            self.pending.push_back(frame);
        }
    }
}

/// Run `ranks` cluster peers, one OS thread each, and collect their
/// results in rank order.
///
/// Every thread gets its own [`ChannelEndpoint`]; the body closure is
/// the whole life of a rank. A panicking rank surfaces as
/// [`SolverError::RankPanicked`] after the others finish.
pub fn run_cluster<R, F>(ranks: usize, board_size: usize, body: F) -> Result<Vec<R>, SolverError>
where
    R: Send,
    F: Fn(ChannelEndpoint) -> R + Sync,
{
    assert!(ranks >= 1);

    let mut senders = Vec::with_capacity(ranks);
    let mut inboxes = Vec::with_capacity(ranks);
    for _ in 0..ranks {
        let (tx, rx) = channel();
        senders.push(tx);
        inboxes.push(rx);
    }

    let endpoints: Vec<ChannelEndpoint> = inboxes
        .into_iter()
        .enumerate()
        .map(|(rank, inbox)| ChannelEndpoint {
            rank,
            board_size,
            peers: senders.clone(),
            inbox,
            pending: VecDeque::new(),
        })
        .collect();
    drop(senders);

    std::thread::scope(|scope| {
        let body = &body;
        let handles: Vec<_> = endpoints
            .into_iter()
            .map(|endpoint| scope.spawn(move || body(endpoint)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().map_err(|_| SolverError::RankPanicked))
            .collect()
    })
}
