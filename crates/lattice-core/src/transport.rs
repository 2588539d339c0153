// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Transport Backends
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Inter-process transport abstraction.
//!
//! The solver only ever talks to neighbors through the combined
//! send/receive primitive below, plus a handful of collectives. Backends:
//! `LoopbackTransport` (one rank), `ChannelTransport` (in-process mesh,
//! one rank per thread), and `MpiTransport` behind the `mpi` feature.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Barrier, Mutex};

use lattice_types::error::{LatticeError, LatticeResult};

/// Tag used by the equal-block gather of the snapshot path.
const GATHER_TAG: u16 = 777;

/// Inter-process primitives the solver core depends on.
///
/// `send_receive` has the semantics of a combined send/receive: both
/// halves are posted together and the call cannot deadlock in a
/// synchronous ring. A `None` destination or source skips that half
/// (the "no neighbor" sentinel at domain boundaries).
pub trait Transport {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    fn is_root(&self) -> bool {
        self.rank() == 0
    }

    fn send_receive(
        &self,
        dest: Option<usize>,
        source: Option<usize>,
        tag: u16,
        send: &[f64],
        recv: &mut [f64],
    ) -> LatticeResult<()>;

    /// Sum a local scalar across all ranks.
    fn all_reduce_sum(&self, local: f64) -> f64;

    /// Logical OR of a local flag across all ranks.
    fn all_reduce_any(&self, local: bool) -> bool {
        self.all_reduce_sum(if local { 1.0 } else { 0.0 }) > 0.0
    }

    /// Equal-block gather to root. Every rank contributes `block`; the
    /// root receives `Some(blocks)` ordered by rank, all others `None`.
    fn gather_blocks(&self, block: &[f64]) -> LatticeResult<Option<Vec<Vec<f64>>>>;

    fn barrier(&self);
}

// ── Loopback ─────────────────────────────────────────────────────────

/// Single-rank transport: a self-exchange is a buffer copy (the periodic
/// `(1,1,1)` decomposition), collectives are the identity.
#[derive(Debug, Default)]
pub struct LoopbackTransport;

impl LoopbackTransport {
    pub fn new() -> Self {
        LoopbackTransport
    }
}

impl Transport for LoopbackTransport {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn send_receive(
        &self,
        dest: Option<usize>,
        source: Option<usize>,
        _tag: u16,
        send: &[f64],
        recv: &mut [f64],
    ) -> LatticeResult<()> {
        match (dest, source) {
            (Some(0), Some(0)) => {
                if send.len() != recv.len() {
                    return Err(LatticeError::Transport(format!(
                        "loopback length mismatch: send {} recv {}",
                        send.len(),
                        recv.len()
                    )));
                }
                recv.copy_from_slice(send);
                Ok(())
            }
            (None, None) => Ok(()),
            (d, s) => Err(LatticeError::Transport(format!(
                "loopback transport has a single rank, got dest {d:?} source {s:?}"
            ))),
        }
    }

    fn all_reduce_sum(&self, local: f64) -> f64 {
        local
    }

    fn gather_blocks(&self, block: &[f64]) -> LatticeResult<Option<Vec<Vec<f64>>>> {
        Ok(Some(vec![block.to_vec()]))
    }

    fn barrier(&self) {}
}

// ── In-process channel mesh ──────────────────────────────────────────

struct Message {
    source: usize,
    tag: u16,
    payload: Vec<f64>,
}

/// Shared reduction board: one slot per rank, two-barrier protocol.
struct ReduceBoard {
    barrier: Barrier,
    slots: Mutex<Vec<f64>>,
}

/// One endpoint of an in-process rank mesh over `std::sync::mpsc`.
///
/// Each rank runs on its own thread (`run_ranks`) and owns one endpoint.
/// Sends are buffered and never block, which gives the combined
/// send/receive its no-deadlock guarantee; receives are selective on
/// `(source, tag)` with a pending stash for out-of-order arrivals.
pub struct ChannelTransport {
    rank: usize,
    size: usize,
    senders: Vec<Sender<Message>>,
    inbox: Receiver<Message>,
    pending: RefCell<VecDeque<Message>>,
    board: Arc<ReduceBoard>,
}

impl ChannelTransport {
    /// Create a fully connected mesh of `size` endpoints.
    pub fn mesh(size: usize) -> Vec<ChannelTransport> {
        let mut senders = Vec::with_capacity(size);
        let mut inboxes = Vec::with_capacity(size);
        for _ in 0..size {
            let (tx, rx) = channel();
            senders.push(tx);
            inboxes.push(rx);
        }
        let board = Arc::new(ReduceBoard {
            barrier: Barrier::new(size),
            slots: Mutex::new(vec![0.0; size]),
        });
        inboxes
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| ChannelTransport {
                rank,
                size,
                senders: senders.clone(),
                inbox,
                pending: RefCell::new(VecDeque::new()),
                board: Arc::clone(&board),
            })
            .collect()
    }

    fn post(&self, dest: usize, tag: u16, payload: Vec<f64>) -> LatticeResult<()> {
        self.senders[dest]
            .send(Message {
                source: self.rank,
                tag,
                payload,
            })
            .map_err(|_| {
                LatticeError::Transport(format!(
                    "rank {}: send to rank {dest} failed, peer endpoint dropped",
                    self.rank
                ))
            })
    }

    fn receive_matching(&self, source: usize, tag: u16) -> LatticeResult<Vec<f64>> {
        let mut pending = self.pending.borrow_mut();
        if let Some(pos) = pending
            .iter()
            .position(|m| m.source == source && m.tag == tag)
        {
            let msg = pending.remove(pos).ok_or_else(|| {
                LatticeError::Transport("pending message vanished".to_string())
            })?;
            return Ok(msg.payload);
        }
        loop {
            let msg = self.inbox.recv().map_err(|_| {
                LatticeError::Transport(format!(
                    "rank {}: receive from rank {source} failed, all peers dropped",
                    self.rank
                ))
            })?;
            if msg.source == source && msg.tag == tag {
                return Ok(msg.payload);
            }
            pending.push_back(msg);
        }
    }
}

impl Transport for ChannelTransport {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send_receive(
        &self,
        dest: Option<usize>,
        source: Option<usize>,
        tag: u16,
        send: &[f64],
        recv: &mut [f64],
    ) -> LatticeResult<()> {
        if let Some(d) = dest {
            self.post(d, tag, send.to_vec())?;
        }
        if let Some(s) = source {
            let payload = self.receive_matching(s, tag)?;
            if payload.len() != recv.len() {
                return Err(LatticeError::Transport(format!(
                    "rank {}: slab from rank {s} has {} elements, expected {}",
                    self.rank,
                    payload.len(),
                    recv.len()
                )));
            }
            recv.copy_from_slice(&payload);
        }
        Ok(())
    }

    fn all_reduce_sum(&self, local: f64) -> f64 {
        {
            let mut slots = self.board.slots.lock().expect("reduce board poisoned");
            slots[self.rank] = local;
        }
        self.board.barrier.wait();
        let total: f64 = {
            let slots = self.board.slots.lock().expect("reduce board poisoned");
            slots.iter().sum()
        };
        // Second barrier keeps the next round from overwriting the slots
        // before every rank has read them.
        self.board.barrier.wait();
        total
    }

    fn gather_blocks(&self, block: &[f64]) -> LatticeResult<Option<Vec<Vec<f64>>>> {
        if self.rank != 0 {
            self.post(0, GATHER_TAG, block.to_vec())?;
            return Ok(None);
        }
        let mut blocks = Vec::with_capacity(self.size);
        blocks.push(block.to_vec());
        for source in 1..self.size {
            blocks.push(self.receive_matching(source, GATHER_TAG)?);
        }
        Ok(Some(blocks))
    }

    fn barrier(&self) {
        self.board.barrier.wait();
        self.board.barrier.wait();
    }
}

/// Run one closure per rank of an in-process mesh, each on its own
/// thread, and return the per-rank results ordered by rank.
pub fn run_ranks<R, F>(size: usize, body: F) -> LatticeResult<Vec<R>>
where
    R: Send + 'static,
    F: Fn(ChannelTransport) -> LatticeResult<R> + Send + Sync + 'static,
{
    let body = Arc::new(body);
    let mut handles = Vec::with_capacity(size);
    for transport in ChannelTransport::mesh(size) {
        let body = Arc::clone(&body);
        handles.push(std::thread::spawn(move || body(transport)));
    }
    let mut results = Vec::with_capacity(size);
    for (rank, handle) in handles.into_iter().enumerate() {
        let joined = handle
            .join()
            .map_err(|_| LatticeError::Transport(format!("rank {rank} thread panicked")))?;
        results.push(joined?);
    }
    Ok(results)
}
