// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — MPI Transport
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! MPI-backed transport, enabled by the `mpi` cargo feature.
//!
//! Requires `mpi::initialize()` before construction and an MPI
//! installation at build time. Neighbor ranks come from `Topology`, so
//! only the world communicator is needed; the combined send/receive is
//! realized with rank-ordered blocking halves, which cannot deadlock
//! because every phase pairs one send with one receive on both sides.

use lattice_types::error::{LatticeError, LatticeResult};
use mpi::collective::SystemOperation;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

use crate::transport::Transport;

pub struct MpiTransport {
    world: SimpleCommunicator,
}

impl MpiTransport {
    /// Wrap the world communicator. The caller owns the MPI universe.
    pub fn new() -> Self {
        MpiTransport {
            world: SimpleCommunicator::world(),
        }
    }
}

impl Default for MpiTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MpiTransport {
    fn rank(&self) -> usize {
        self.world.rank() as usize
    }

    fn size(&self) -> usize {
        self.world.size() as usize
    }

    fn send_receive(
        &self,
        dest: Option<usize>,
        source: Option<usize>,
        tag: u16,
        send: &[f64],
        recv: &mut [f64],
    ) -> LatticeResult<()> {
        let tag = i32::from(tag);
        match (dest, source) {
            // A periodic axis with a single rank exchanges with itself;
            // blocking halves would deadlock, so copy locally.
            (Some(d), Some(s)) if d == self.rank() && s == self.rank() => {
                if send.len() != recv.len() {
                    return Err(LatticeError::Transport(format!(
                        "self-exchange length mismatch: send {} recv {}",
                        send.len(),
                        recv.len()
                    )));
                }
                recv.copy_from_slice(send);
            }
            (Some(d), Some(s)) => {
                let dest_proc = self.world.process_at_rank(d as i32);
                let source_proc = self.world.process_at_rank(s as i32);
                // Lower rank sends first; the peer posts the matching
                // receive first (ohmnivore-style pairwise ordering).
                if self.world.rank() < d as i32 {
                    dest_proc.send_with_tag(send, tag);
                    let status = source_proc.receive_into_with_tag(recv, tag);
                    check_count(&status, recv.len())?;
                } else {
                    let status = source_proc.receive_into_with_tag(recv, tag);
                    check_count(&status, recv.len())?;
                    dest_proc.send_with_tag(send, tag);
                }
            }
            (Some(d), None) => {
                self.world.process_at_rank(d as i32).send_with_tag(send, tag);
            }
            (None, Some(s)) => {
                let status = self
                    .world
                    .process_at_rank(s as i32)
                    .receive_into_with_tag(recv, tag);
                check_count(&status, recv.len())?;
            }
            (None, None) => {}
        }
        Ok(())
    }

    fn all_reduce_sum(&self, local: f64) -> f64 {
        let mut global = 0.0f64;
        self.world
            .all_reduce_into(&local, &mut global, SystemOperation::sum());
        global
    }

    fn gather_blocks(&self, block: &[f64]) -> LatticeResult<Option<Vec<Vec<f64>>>> {
        let root = self.world.process_at_rank(0);
        if self.world.rank() == 0 {
            let mut flat = vec![0.0f64; block.len() * self.size()];
            root.gather_into_root(block, &mut flat[..]);
            let blocks = flat.chunks(block.len()).map(<[f64]>::to_vec).collect();
            Ok(Some(blocks))
        } else {
            root.gather_into(block);
            Ok(None)
        }
    }

    fn barrier(&self) {
        self.world.barrier();
    }
}

fn check_count(status: &mpi::point_to_point::Status, expected: usize) -> LatticeResult<()> {
    let got = status.count(f64::equivalent_datatype()) as usize;
    if got != expected {
        return Err(LatticeError::Transport(format!(
            "received slab of {got} elements, expected {expected}"
        )));
    }
    Ok(())
}
