//! In-process `Communicator` backed by threads instead of MPI processes.
//!
//! Always buildable, always testable — this is the backend the test suite
//! and the demo driver use. Ranks rendezvous through a shared
//! [`std::sync::Barrier`] and a slot per rank; callers typically drive the
//! team with `crossbeam::thread::scope` so each rank closure can borrow its
//! own slice of a caller-owned state buffer instead of requiring `'static`
//! ownership.

use std::sync::{Arc, Barrier, Mutex};

use super::Communicator;

struct Team {
    barrier: Barrier,
    f64_slots: Vec<Mutex<f64>>,
    bool_slots: Vec<Mutex<bool>>,
    i32_slots: Vec<Mutex<i32>>,
}

/// One rank's handle into an in-process simulated cluster.
#[derive(Clone)]
pub struct ThreadCommunicator {
    rank: usize,
    size: usize,
    team: Arc<Team>,
}

impl ThreadCommunicator {
    /// Build `size` communicator handles, one per simulated rank, sharing
    /// one rendezvous team. Hand handle `i` to the closure that will run as
    /// rank `i`.
    pub fn build_team(size: usize) -> Vec<ThreadCommunicator> {
        assert!(size > 0, "a communicator team needs at least one rank");
        let team = Arc::new(Team {
            barrier: Barrier::new(size),
            f64_slots: (0..size).map(|_| Mutex::new(0.0)).collect(),
            bool_slots: (0..size).map(|_| Mutex::new(false)).collect(),
            i32_slots: (0..size).map(|_| Mutex::new(0)).collect(),
        });
        (0..size)
            .map(|rank| ThreadCommunicator {
                rank,
                size,
                team: team.clone(),
            })
            .collect()
    }

    /// Convenience: a single-rank "cluster", for tests/demos that don't
    /// need to exercise the distributed path.
    pub fn solo() -> ThreadCommunicator {
        Self::build_team(1).remove(0)
    }
}

impl Communicator for ThreadCommunicator {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast_f64(&self, value: f64, root: usize) -> f64 {
        if self.rank == root {
            *self.team.f64_slots[root].lock().unwrap() = value;
        }
        self.team.barrier.wait();
        let out = *self.team.f64_slots[root].lock().unwrap();
        self.team.barrier.wait();
        out
    }

    fn broadcast_bool(&self, value: bool, root: usize) -> bool {
        if self.rank == root {
            *self.team.bool_slots[root].lock().unwrap() = value;
        }
        self.team.barrier.wait();
        let out = *self.team.bool_slots[root].lock().unwrap();
        self.team.barrier.wait();
        out
    }

    fn all_reduce_min_i32(&self, value: i32) -> i32 {
        *self.team.i32_slots[self.rank].lock().unwrap() = value;
        self.team.barrier.wait();
        let out = self
            .team
            .i32_slots
            .iter()
            .map(|s| *s.lock().unwrap())
            .min()
            .expect("team has at least one rank");
        self.team.barrier.wait();
        out
    }

    fn all_reduce_max_f64(&self, value: f64) -> f64 {
        *self.team.f64_slots[self.rank].lock().unwrap() = value;
        self.team.barrier.wait();
        let out = self
            .team
            .f64_slots
            .iter()
            .map(|s| *s.lock().unwrap())
            .fold(f64::NEG_INFINITY, f64::max);
        self.team.barrier.wait();
        out
    }

    fn all_reduce_or_bool(&self, value: bool) -> bool {
        *self.team.bool_slots[self.rank].lock().unwrap() = value;
        self.team.barrier.wait();
        let out = self.team.bool_slots.iter().any(|s| *s.lock().unwrap());
        self.team.barrier.wait();
        out
    }
}
