//! Distributed launch parameters
//!
//! Rank and world size are parsed once at startup and passed around as
//! typed values; nothing else in the pipeline reads the environment.

use anyhow::Result;

/// Typed rank/world-size of this process within a distributed launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Rank of this process on its node
    pub local_rank: usize,
    /// Total number of processes in the launch
    pub world_size: usize,
}

impl LaunchConfig {
    /// Create a launch configuration, validating the rank/world-size pair
    pub fn new(local_rank: usize, world_size: usize) -> Result<Self> {
        if world_size == 0 {
            anyhow::bail!("world_size must be at least 1");
        }
        if local_rank >= world_size {
            anyhow::bail!("local_rank {local_rank} is out of range for world_size {world_size}");
        }
        Ok(Self {
            local_rank,
            world_size,
        })
    }

    /// Single-process launch
    pub fn single_process() -> Self {
        Self {
            local_rank: 0,
            world_size: 1,
        }
    }

    /// Whether this process is responsible for writing shared outputs
    pub fn is_main_process(&self) -> bool {
        self.local_rank == 0
    }
}
