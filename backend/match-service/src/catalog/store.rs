// ============================================
// Catalog Store
// ============================================
//
// Read-only access to the on-disk catalog. Every scan and point read
// opens its own file handle, so concurrent callers never share a cursor.
// The handle lives exactly as long as the scan value; dropping the scan
// early (or hitting an error) closes it.

use super::codec::{RecordCodec, RECORD_STRIDE};
use crate::error::{MatchError, Result};
use crate::models::CatalogRecord;
use crate::utils::random::RandomSource;
use crate::vocabulary::TagVocabulary;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
    codec: RecordCodec,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>, codec: RecordCodec) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    /// Like `new`, but fails up front when the file cannot be opened.
    pub fn open(path: impl Into<PathBuf>, codec: RecordCodec) -> Result<Self> {
        let store = Self::new(path, codec);
        store.open_file()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn codec(&self) -> &RecordCodec {
        &self.codec
    }

    pub fn vocabulary(&self) -> &Arc<TagVocabulary> {
        self.codec.vocabulary()
    }

    /// Number of complete record slots in the file. A partial tail slot is
    /// not counted.
    pub fn record_count(&self) -> Result<u64> {
        let len = self
            .open_file()?
            .metadata()
            .map_err(|e| MatchError::catalog_unavailable(&self.path, e))?
            .len();
        Ok(len / RECORD_STRIDE as u64)
    }

    /// Lazy sequential scan over every decodable record.
    pub fn scan(&self) -> Result<CatalogScan> {
        let file = self.open_file()?;
        Ok(CatalogScan {
            reader: BufReader::with_capacity(RECORD_STRIDE * 64, file),
            codec: self.codec.clone(),
            path: self.path.clone(),
            buf: [0u8; RECORD_STRIDE],
            next_id: 1,
            stats: ScanStats::default(),
            finished: false,
        })
    }

    /// Decode the single record at `offset`. Returns `None` when the offset
    /// is not stride-aligned, lies past the last complete record, or the
    /// record there does not decode.
    pub fn sample_at(&self, offset: u64) -> Result<Option<CatalogRecord>> {
        if offset % RECORD_STRIDE as u64 != 0 {
            debug!(offset, "Rejecting unaligned catalog offset");
            return Ok(None);
        }
        let Ok(id) = u32::try_from(offset / RECORD_STRIDE as u64 + 1) else {
            return Ok(None);
        };

        let mut file = self.open_file()?;
        self.read_at(&mut file, id)
    }

    /// Point read by 1-based record id.
    pub fn read_record(&self, id: u32) -> Result<Option<CatalogRecord>> {
        if id == 0 {
            return Ok(None);
        }
        let mut file = self.open_file()?;
        self.read_at(&mut file, id)
    }

    /// Point reads for several ids over one file handle. Ids that no longer
    /// decode are left out.
    pub fn read_records(&self, ids: &[u32]) -> Result<Vec<CatalogRecord>> {
        let mut file = self.open_file()?;
        let mut records = Vec::with_capacity(ids.len());
        for &id in ids {
            if id == 0 {
                continue;
            }
            if let Some(record) = self.read_at(&mut file, id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Pick one stride-aligned slot uniformly at random and decode it.
    pub fn random_record(&self, rng: &mut dyn RandomSource) -> Result<Option<CatalogRecord>> {
        let count = self.record_count()?;
        if count == 0 {
            return Ok(None);
        }
        let Some(&index) = rng.sample_indices(count as usize, 1).first() else {
            return Ok(None);
        };
        self.sample_at(index as u64 * RECORD_STRIDE as u64)
    }

    fn open_file(&self) -> Result<File> {
        File::open(&self.path).map_err(|e| MatchError::catalog_unavailable(&self.path, e))
    }

    fn read_at(&self, file: &mut File, id: u32) -> Result<Option<CatalogRecord>> {
        let offset = (id as u64 - 1) * RECORD_STRIDE as u64;
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| MatchError::catalog_unavailable(&self.path, e))?;

        let mut buf = [0u8; RECORD_STRIDE];
        let n = read_slot(file, &mut buf).map_err(|e| MatchError::catalog_unavailable(&self.path, e))?;
        if n < RECORD_STRIDE {
            return Ok(None);
        }

        match self.codec.decode(id, &buf) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                debug!(record_id = id, error = %e, "Point read hit an undecodable record");
                Ok(None)
            }
        }
    }
}

/// Counters for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub decoded: u64,
    pub skipped: u64,
    pub truncated_tail: bool,
}

/// Iterator over decoded records. Yields `Err` only for I/O failures on
/// the catalog file; undecodable records are logged and skipped, and a
/// truncated tail ends the scan.
pub struct CatalogScan {
    reader: BufReader<File>,
    codec: RecordCodec,
    path: PathBuf,
    buf: [u8; RECORD_STRIDE],
    next_id: u32,
    stats: ScanStats,
    finished: bool,
}

impl CatalogScan {
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    fn finish(&mut self) {
        self.finished = true;
        debug!(
            path = %self.path.display(),
            decoded = self.stats.decoded,
            skipped = self.stats.skipped,
            truncated_tail = self.stats.truncated_tail,
            "Catalog scan finished"
        );
    }
}

impl Iterator for CatalogScan {
    type Item = Result<CatalogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let n = match read_slot(&mut self.reader, &mut self.buf) {
                Ok(n) => n,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(MatchError::catalog_unavailable(&self.path, e)));
                }
            };
            if n == 0 {
                self.finish();
                return None;
            }

            let id = self.next_id;
            self.next_id = self.next_id.saturating_add(1);

            match self.codec.decode(id, &self.buf[..n]) {
                Ok(record) => {
                    self.stats.decoded += 1;
                    return Some(Ok(record));
                }
                Err(e) if e.ends_scan() => {
                    warn!(record_id = id, error = %e, "Catalog ends in a partial record");
                    self.stats.truncated_tail = true;
                    self.finish();
                }
                Err(e) => {
                    warn!(record_id = id, error = %e, "Skipping undecodable catalog record");
                    self.stats.skipped += 1;
                }
            }
        }
        None
    }
}

/// Fill `buf` from `reader`, stopping early only at end of file.
fn read_slot<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
