// ─────────────────────────────────────────────────────────────────────
// Laplace DD — Rank Communicator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Point-to-point and collective plumbing between ranks.
//!
//! Each rank owns one buffered channel endpoint per peer, so a send
//! always completes without a matching receive posted. The exchange
//! protocol is therefore deadlock-free regardless of direction
//! ordering. Receives are addressed by source rank; halo messages
//! additionally carry a direction tag that is checked on receipt.
//!
//! A rank that dies drops its endpoints, which surfaces at every peer
//! as a `Comm` error on the next receive instead of blocking forever.

use std::sync::{Arc, Barrier};

use crossbeam_channel::{unbounded, Receiver, Sender};

use laplace_types::error::{LaplaceError, LaplaceResult};

/// Direction a boundary slice travels. The numeric values are the
/// fixed wire tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaloTag {
    /// Sender's first interior row, moving to the neighbor above.
    RowUp = 1,
    /// Sender's last interior row, moving to the neighbor below.
    RowDown = 2,
    /// Sender's last interior column, moving right.
    ColRight = 3,
    /// Sender's first interior column, moving left.
    ColLeft = 4,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// One boundary slice, packed contiguous.
    Halo { tag: HaloTag, data: Vec<f32> },
    /// A local error contribution, or the broadcast global total.
    Sum(f64),
    /// A rank's trimmed interior cells, row-major, bound for rank 0.
    Interior { rank: usize, data: Vec<f32> },
}

pub struct Communicator {
    rank: usize,
    size: usize,
    /// peers[r] sends to rank r; self-sends are allowed.
    peers: Vec<Sender<Message>>,
    /// inbox[r] receives what rank r sent here.
    inbox: Vec<Receiver<Message>>,
    barrier: Arc<Barrier>,
}

impl Communicator {
    /// Build the fully-connected mesh for `size` ranks. Returns one
    /// communicator per rank, in rank order.
    pub fn mesh(size: usize) -> Vec<Communicator> {
        let mut senders: Vec<Vec<Sender<Message>>> =
            (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut inboxes: Vec<Vec<Receiver<Message>>> =
            (0..size).map(|_| Vec::with_capacity(size)).collect();
        for from in 0..size {
            for to in 0..size {
                let (tx, rx) = unbounded();
                senders[from].push(tx);
                // Outer loop runs `from` in ascending order, so
                // inboxes[to][from] indexes by source rank.
                inboxes[to].push(rx);
            }
        }
        let barrier = Arc::new(Barrier::new(size));
        senders
            .into_iter()
            .zip(inboxes)
            .enumerate()
            .map(|(rank, (peers, inbox))| Communicator {
                rank,
                size,
                peers,
                inbox,
                barrier: Arc::clone(&barrier),
            })
            .collect()
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Block until every rank arrives.
    pub fn barrier(&self) {
        self.barrier.wait();
    }

    pub fn send(&self, to: usize, msg: Message) -> LaplaceResult<()> {
        self.peers[to].send(msg).map_err(|_| {
            LaplaceError::Comm(format!("rank {}: rank {to} is gone, send failed", self.rank))
        })
    }

    fn recv_from(&self, from: usize) -> LaplaceResult<Message> {
        self.inbox[from].recv().map_err(|_| {
            LaplaceError::Comm(format!(
                "rank {}: rank {from} died before sending, receive failed",
                self.rank
            ))
        })
    }

    /// Receive one halo slice from `from`, checking direction tag and
    /// slice length.
    pub fn recv_halo(
        &self,
        from: usize,
        expected: HaloTag,
        expected_len: usize,
    ) -> LaplaceResult<Vec<f32>> {
        match self.recv_from(from)? {
            Message::Halo { tag, data } if tag == expected && data.len() == expected_len => {
                Ok(data)
            }
            Message::Halo { tag, data } => Err(LaplaceError::Comm(format!(
                "rank {}: halo from rank {from} mismatched (tag {tag:?}, len {}; wanted {expected:?}, len {expected_len})",
                self.rank,
                data.len()
            ))),
            other => Err(LaplaceError::Comm(format!(
                "rank {}: expected halo from rank {from}, got {other:?}",
                self.rank
            ))),
        }
    }

    /// Receive one interior chunk from `from` (assembly path, rank 0
    /// only).
    pub fn recv_interior(&self, from: usize) -> LaplaceResult<Vec<f32>> {
        match self.recv_from(from)? {
            Message::Interior { rank, data } if rank == from => Ok(data),
            other => Err(LaplaceError::Comm(format!(
                "rank {}: expected interior chunk from rank {from}, got {other:?}",
                self.rank
            ))),
        }
    }

    /// Global all-reduce SUM: every rank contributes `local` and every
    /// rank returns the identical total. Blocks until all ranks have
    /// contributed, which is the once-per-iteration synchronization
    /// point of the solver loop.
    pub fn all_reduce_sum(&self, local: f64) -> LaplaceResult<f64> {
        if self.size == 1 {
            return Ok(local);
        }
        if self.rank == 0 {
            let mut total = local;
            for from in 1..self.size {
                match self.recv_from(from)? {
                    Message::Sum(v) => total += v,
                    other => {
                        return Err(LaplaceError::Comm(format!(
                            "rank 0: expected sum contribution from rank {from}, got {other:?}"
                        )))
                    }
                }
            }
            for to in 1..self.size {
                self.send(to, Message::Sum(total))?;
            }
            Ok(total)
        } else {
            self.send(0, Message::Sum(local))?;
            match self.recv_from(0)? {
                Message::Sum(total) => Ok(total),
                other => Err(LaplaceError::Comm(format!(
                    "rank {}: expected reduced sum from rank 0, got {other:?}",
                    self.rank
                ))),
            }
        }
    }

    /// Gather one f64 per rank to rank 0 (timing statistics path).
    /// Returns `Some(values)` in rank order on rank 0, `None`
    /// elsewhere.
    pub fn gather_f64(&self, value: f64) -> LaplaceResult<Option<Vec<f64>>> {
        if self.rank != 0 {
            self.send(0, Message::Sum(value))?;
            return Ok(None);
        }
        let mut values = Vec::with_capacity(self.size);
        values.push(value);
        for from in 1..self.size {
            match self.recv_from(from)? {
                Message::Sum(v) => values.push(v),
                other => {
                    return Err(LaplaceError::Comm(format!(
                        "rank 0: expected gathered value from rank {from}, got {other:?}"
                    )))
                }
            }
        }
        Ok(Some(values))
    }
}
