//! Process communicator handle.

/// Identifies this process within a (possibly distributed) run.
///
/// Only serial execution is supported; the handle exists so that the
/// entry point and diagnostics carry rank information from the start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Communicator {
    rank: u32,
    size: u32,
}

impl Communicator {
    /// A single-process communicator.
    pub fn serial() -> Self {
        Self { rank: 0, size: 1 }
    }

    /// Rank of this process.
    pub fn rank(&self) -> u32 {
        self.rank
    }

    /// Number of processes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether this process should emit run-level log lines.
    pub fn is_root(&self) -> bool {
        self.rank == 0
    }
}

impl Default for Communicator {
    fn default() -> Self {
        Self::serial()
    }
}
