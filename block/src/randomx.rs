//! A [`PowHasher`] backed by RandomX.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use randomx_rs::{RandomXCache, RandomXError, RandomXFlag, RandomXVM as VmInner};
use thread_local::ThreadLocal;

use p2pool_constants::block::HASH_SIZE;

use crate::PowHasher;

/// How many seeds keep their RandomX VMs around.
///
/// Blocks near a seed switch are hashed with both the old and the new seed.
pub const RX_SEEDS_CACHED: usize = 2;

/// An error from [`RandomXHasher`].
#[derive(Debug, thiserror::Error)]
pub enum RandomXHasherError {
    #[error("RandomX error: {0}")]
    RandomX(#[from] RandomXError),
    #[error("RandomX returned a hash with the wrong length.")]
    HashLength,
}

/// The RandomX VMs for one seed, one per thread.
#[derive(Debug)]
struct RandomXVm {
    vms: ThreadLocal<VmInner>,
    cache: RandomXCache,
    flags: RandomXFlag,
}

impl RandomXVm {
    fn new(seed_hash: &[u8; HASH_SIZE]) -> Result<Self, RandomXError> {
        let flags = RandomXFlag::get_recommended_flags();

        let cache = RandomXCache::new(flags, seed_hash.as_slice())?;

        Ok(Self {
            vms: ThreadLocal::new(),
            cache,
            flags,
        })
    }

    fn calculate_hash(&self, blob: &[u8]) -> Result<[u8; HASH_SIZE], RandomXHasherError> {
        self.vms
            .get_or_try(|| VmInner::new(self.flags, Some(self.cache.clone()), None))?
            .calculate_hash(blob)?
            .try_into()
            .map_err(|_| RandomXHasherError::HashLength)
    }
}

/// Calculates RandomX hashes in light mode, keeping the VMs of the
/// last [`RX_SEEDS_CACHED`] seeds.
#[derive(Debug, Default)]
pub struct RandomXHasher {
    vms: Mutex<VecDeque<([u8; HASH_SIZE], Arc<RandomXVm>)>>,
}

impl RandomXHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The seeds with initialized VMs, newest first.
    pub fn cached_seeds(&self) -> Vec<[u8; HASH_SIZE]> {
        self.lock().iter().map(|(seed, _)| *seed).collect()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<([u8; HASH_SIZE], Arc<RandomXVm>)>> {
        self.vms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the VM for `seed_hash`, initializing its cache if needed.
    fn vm(&self, seed_hash: &[u8; HASH_SIZE]) -> Result<Arc<RandomXVm>, RandomXError> {
        let cached = self
            .lock()
            .iter()
            .find(|(seed, _)| seed == seed_hash)
            .map(|(_, vm)| Arc::clone(vm));

        if let Some(vm) = cached {
            return Ok(vm);
        }

        // Initializing a cache takes a while, the lock is not held for it.
        tracing::info!("initializing RandomX cache for a new seed");
        let vm = Arc::new(RandomXVm::new(seed_hash)?);

        let mut vms = self.lock();
        if !vms.iter().any(|(seed, _)| seed == seed_hash) {
            vms.push_front((*seed_hash, Arc::clone(&vm)));
            vms.truncate(RX_SEEDS_CACHED);
        }
        drop(vms);

        Ok(vm)
    }
}

impl PowHasher for RandomXHasher {
    type Error = RandomXHasherError;

    fn calculate(
        &self,
        blob: &[u8],
        height: u64,
        seed_hash: &[u8; HASH_SIZE],
    ) -> Result<[u8; HASH_SIZE], Self::Error> {
        tracing::trace!(height, size = blob.len(), "calculating RandomX hash");

        self.vm(seed_hash)?.calculate_hash(blob)
    }
}
