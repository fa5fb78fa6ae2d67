//! On-disk catalog: the fixed-stride record codec and the read-only store
//! that scans it.

pub mod codec;
pub mod store;

pub use codec::{DecodeError, EncodeError, RecordCodec, RECORD_STRIDE};
pub use store::{CatalogScan, CatalogStore, ScanStats};

use crate::models::CatalogRecord;
use std::io::{self, Write};

/// Write `records` back to back in catalog layout. Used by catalog build
/// tooling and tests; the engine itself never writes the catalog.
pub fn write_catalog<W: Write>(
    codec: &RecordCodec,
    records: &[CatalogRecord],
    out: &mut W,
) -> io::Result<()> {
    for record in records {
        let slot = codec
            .encode(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        out.write_all(&slot)?;
    }
    out.flush()
}
