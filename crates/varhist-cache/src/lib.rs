//! Read-only cache of previously parsed variant sets.
//!
//! The compute pipeline reuses evidence from entries parsed in earlier runs.
//! That evidence lives in batched JSON documents, each holding many entries;
//! each entry holds, per wordclass block, a set of variant records. This
//! crate owns the record format, a batch writer, and a loader that reads a
//! whole directory once at process start. The loaded [`VariantCache`] is
//! immutable and safe to share across parallel workers.
//!
//! Callers choose between memory-mapped files and owned buffers at runtime
//! via [`LoadMode`], mirroring how the rest of the stack loads large
//! read-only inputs.
//!
//! # Example
//! ```no_run
//! use varhist_cache::{LoadMode, VariantCache};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cache = VariantCache::load("/var/lib/varhist/cache", LoadMode::Mmap)?;
//! if let Some(entry) = cache.by_id("entry_004711") {
//!     println!("{}: {} blocks", entry.lemma, entry.blocks.len());
//! }
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use varhist_types::daterange::DateRange;
use varhist_types::variant::VariantForm;

/// Strategy for loading cache batch files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each batch file (fast, zero-copy until parse).
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// One serialized variant. Every field is required; a record missing one is
/// a load error, not a default.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct VariantRecord {
    pub form: String,
    pub start: u32,
    pub end: u32,
    pub regional: bool,
    pub irregular: bool,
    pub undated: bool,
    pub en_ending: bool,
}

impl VariantRecord {
    /// Capture the serializable fields of a form.
    pub fn from_form(form: &VariantForm) -> Self {
        VariantRecord {
            form: form.form.clone(),
            start: form.date.start(),
            end: form.date.end(),
            regional: form.regional,
            irregular: form.irregular,
            undated: form.undated,
            en_ending: form.has_en_ending,
        }
    }

    /// Rebuild a form from a record; lossless for the seven stored fields.
    pub fn into_form(self) -> VariantForm {
        let mut form = VariantForm::new(&self.form, DateRange::of(self.start, self.end));
        form.regional = self.regional;
        form.irregular = self.irregular;
        form.undated = self.undated;
        form.has_en_ending = self.en_ending;
        form
    }
}

/// Variant records for one wordclass of one entry.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct WordclassBlock {
    /// Wordclass tag (`NN`, `VB`, ...).
    pub wordclass: String,
    pub variants: Vec<VariantRecord>,
}

/// One cached entry: a lemma with its attestation weight and per-wordclass
/// variant blocks.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CachedEntry {
    pub id: String,
    pub lemma: String,
    /// Quotation-derived attestation weight; higher is better evidence.
    pub weight: u32,
    pub blocks: Vec<WordclassBlock>,
}

/// One batch document on disk.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CacheDocument {
    pub entries: Vec<CachedEntry>,
}

/// In-memory view of a cache directory, loaded once and never mutated.
#[derive(Debug)]
pub struct VariantCache {
    entries: Vec<CachedEntry>,
    by_id: HashMap<String, usize>,
    by_lemma: HashMap<String, Vec<usize>>,
}

impl VariantCache {
    /// A cache with no evidence in it.
    pub fn empty() -> Self {
        VariantCache {
            entries: Vec::new(),
            by_id: HashMap::new(),
            by_lemma: HashMap::new(),
        }
    }

    /// Load every `*.json` batch file under `dir`.
    ///
    /// Files are read in name order so entry indexes are stable across runs.
    pub fn load(dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("read cache directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut cache = VariantCache::empty();
        for path in paths {
            let buffer = load_file(&path, mode)?;
            let doc: CacheDocument = serde_json::from_slice(buffer.as_slice())
                .with_context(|| format!("parse cache batch {}", path.display()))?;
            for entry in doc.entries {
                cache.push(entry);
            }
        }
        Ok(cache)
    }

    fn push(&mut self, entry: CachedEntry) {
        let index = self.entries.len();
        self.by_id.insert(entry.id.clone(), index);
        self.by_lemma
            .entry(entry.lemma.to_lowercase())
            .or_default()
            .push(index);
        self.entries.push(entry);
    }

    pub fn by_id(&self, id: &str) -> Option<&CachedEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    pub fn by_lemma(&self, lemma: &str) -> Vec<&CachedEntry> {
        self.by_lemma
            .get(&lemma.to_lowercase())
            .map(|indexes| indexes.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

/// Write entries into numbered batch documents under `dir`, `batch_size`
/// entries per file. Returns the number of files written.
pub fn write_batches(
    dir: impl AsRef<Path>,
    entries: &[CachedEntry],
    batch_size: usize,
) -> Result<usize> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create cache directory {}", dir.display()))?;
    let batch_size = batch_size.max(1);
    let mut written = 0usize;
    for (batch_no, chunk) in entries.chunks(batch_size).enumerate() {
        let path = dir.join(format!("batch_{batch_no:05}.json"));
        let doc = CacheDocument {
            entries: chunk.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&doc).context("serialize cache batch")?;
        let mut file =
            File::create(&path).with_context(|| format!("create {}", path.display()))?;
        file.write_all(&json)
            .with_context(|| format!("write {}", path.display()))?;
        written += 1;
    }
    Ok(written)
}
