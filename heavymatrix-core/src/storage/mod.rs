//! Matrix cache keyed by seed
//!
//! Generation costs 256 draws plus a 64×64 elimination per candidate, and the
//! same seed is asked for repeatedly (every block sharing a parent). Accepted
//! matrices are kept here, optionally persisted as JSON.

use crate::config::{CacheConfig, GeneratorConfig};
use crate::error::Result;
use crate::matrix::{generate_matrix, generate_matrix_with, HeavyMatrix};
use crate::prng::MatrixSeed;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct MatrixCache {
    entries: HashMap<MatrixSeed, HeavyMatrix>,
    /// Insertion order, oldest first
    order: VecDeque<MatrixSeed>,
    pub metadata: CacheMetadata,
    #[serde(skip)]
    capacity: usize,
    #[serde(skip)]
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub created_at: DateTime<Utc>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl MatrixCache {
    /// Empty cache; nothing is read from disk
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            metadata: CacheMetadata {
                created_at: Utc::now(),
                hits: 0,
                misses: 0,
                evictions: 0,
            },
            capacity: config.capacity,
            path: config.path.clone(),
        }
    }

    /// Load the cache file named in the config; a missing or unreadable
    /// file yields an empty cache
    ///
    /// Every loaded entry is regenerated from its seed and dropped unless the
    /// fingerprints match.
    pub fn open(config: &CacheConfig) -> Self {
        if let Some(path) = &config.path {
            if path.exists() {
                match Self::load(path) {
                    Ok(mut cache) => {
                        cache.capacity = config.capacity;
                        cache.path = Some(path.clone());
                        cache.retain_verified();
                        cache.rebuild_order();
                        cache.evict_to(config.capacity);
                        info!("Loaded {} cached matrices from {}", cache.len(), path.display());
                        return cache;
                    }
                    Err(e) => warn!("Ignoring unreadable cache {}: {}", path.display(), e),
                }
            }
        }
        Self::new(config)
    }

    fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn retain_verified(&mut self) {
        self.entries.retain(|seed, matrix| match generate_matrix(seed.as_bytes()) {
            Ok(expected) if expected.fingerprint() == matrix.fingerprint() => true,
            Ok(_) => {
                warn!("Dropping cached matrix for {}: does not match its seed", seed);
                false
            }
            Err(e) => {
                warn!("Dropping cached matrix for {}: {}", seed, e);
                false
            }
        });
    }

    /// Make `order` list each cached seed exactly once. Seeds missing from
    /// the stored order are appended in byte order.
    fn rebuild_order(&mut self) {
        let mut seen = HashSet::with_capacity(self.entries.len());
        let entries = &self.entries;
        self.order
            .retain(|seed| entries.contains_key(seed) && seen.insert(*seed));

        let mut missing: Vec<MatrixSeed> = self
            .entries
            .keys()
            .filter(|seed| !seen.contains(*seed))
            .copied()
            .collect();
        if !missing.is_empty() {
            warn!("Cache order was missing {} seed(s), appending", missing.len());
            missing.sort_by_key(|seed| *seed.as_bytes());
            self.order.extend(missing);
        }
    }

    /// Write to the configured path; a no-op for in-memory caches
    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(self)?;
            std::fs::write(path, json)?;
            info!("Saved {} cached matrices to {}", self.len(), path.display());
        }
        Ok(())
    }

    pub fn get(&self, seed: &MatrixSeed) -> Option<&HeavyMatrix> {
        self.entries.get(seed)
    }

    pub fn contains(&self, seed: &MatrixSeed) -> bool {
        self.entries.contains_key(seed)
    }

    pub fn insert(&mut self, seed: MatrixSeed, matrix: HeavyMatrix) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(seed, matrix).is_none() {
            self.order.push_back(seed);
            self.evict_to(self.capacity);
        }
    }

    /// Cached matrix for `seed`, generating and storing it on a miss
    pub fn get_or_generate(
        &mut self,
        seed: &MatrixSeed,
        config: &GeneratorConfig,
    ) -> Result<HeavyMatrix> {
        if let Some(matrix) = self.entries.get(seed) {
            self.metadata.hits += 1;
            debug!(
                "cache hit {} (hits={}, misses={})",
                seed, self.metadata.hits, self.metadata.misses
            );
            return Ok(matrix.clone());
        }

        let matrix = generate_matrix_with(seed, config)?;
        self.metadata.misses += 1;
        debug!(
            "cache miss {} (hits={}, misses={})",
            seed, self.metadata.hits, self.metadata.misses
        );
        self.insert(*seed, matrix.clone());
        Ok(matrix)
    }

    pub fn remove(&mut self, seed: &MatrixSeed) -> Option<HeavyMatrix> {
        let removed = self.entries.remove(seed)?;
        self.order.retain(|s| s != seed);
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Seeds currently cached, oldest first
    pub fn seeds(&self) -> impl Iterator<Item = &MatrixSeed> {
        self.order.iter()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            capacity: self.capacity,
            hits: self.metadata.hits,
            misses: self.metadata.misses,
            evictions: self.metadata.evictions,
        }
    }

    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "MatrixCache | {}/{} entries | hits {} | misses {} | evictions {} | since {}",
            stats.entries,
            stats.capacity,
            stats.hits,
            stats.misses,
            stats.evictions,
            self.metadata.created_at.to_rfc3339()
        )
    }

    fn evict_to(&mut self, capacity: usize) {
        while self.entries.len() > capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if self.entries.remove(&oldest).is_some() {
                self.metadata.evictions += 1;
                debug!("evicted cached matrix {}", oldest);
            }
        }
    }
}
