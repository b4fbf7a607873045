//! Windowed random access into a single contig of an indexed sequence store.
//!
//! A [`SequenceHandle`] answers byte lookups at arbitrary 0-based offsets
//! while holding at most one buffered window of the contig. Lookups that fall
//! inside the window never touch the store; any other lookup refills the
//! window with one `fetch_range` call centered on the requested offset.
//!
//! # Example
//!
//! ```no_run
//! use vcfregistry::formats::IndexedFastaStore;
//! use vcfregistry::sequence::SequenceHandle;
//!
//! # fn main() -> vcfregistry::Result<()> {
//! let store = IndexedFastaStore::from_path("ref.fa")?;
//! let mut chr1 = SequenceHandle::new(store, "chr1")?;
//! let base = chr1.char_at(1_000_000)?;
//! # Ok(())
//! # }
//! ```

use crate::{Error, Result};
use bytes::Bytes;
use std::ops::Range;

/// Default half-width of the buffered window.
pub const DEFAULT_HALF_WIDTH: u64 = 1_000_000;

/// Indexed store holding one addressable sequence per contig name.
pub trait SequenceStore {
    /// Declared length of the named contig.
    fn sequence_length(&self, name: &str) -> Result<u64>;

    /// Fetch bases `[start, end)` (0-based, half-open) of the named contig.
    fn fetch_range(&mut self, name: &str, start: u64, end: u64) -> Result<Bytes>;
}

impl<S: SequenceStore + ?Sized> SequenceStore for &mut S {
    fn sequence_length(&self, name: &str) -> Result<u64> {
        (**self).sequence_length(name)
    }

    fn fetch_range(&mut self, name: &str, start: u64, end: u64) -> Result<Bytes> {
        (**self).fetch_range(name, start, end)
    }
}

#[derive(Debug)]
struct Window {
    origin: u64,
    bytes: Bytes,
}

impl Window {
    fn get(&self, offset: u64) -> Option<u8> {
        let rel = offset.checked_sub(self.origin)?;
        self.bytes.get(usize::try_from(rel).ok()?).copied()
    }
}

/// Random-access view of one contig, buffered through a sliding window.
pub struct SequenceHandle<S> {
    store: S,
    contig: String,
    length: u64,
    half_width: u64,
    window: Option<Window>,
}

impl<S: SequenceStore> SequenceHandle<S> {
    /// Bind a handle to `contig`. Fails if the store does not know the contig.
    pub fn new(store: S, contig: &str) -> Result<Self> {
        let length = store.sequence_length(contig)?;
        Ok(Self {
            store,
            contig: contig.to_string(),
            length,
            half_width: DEFAULT_HALF_WIDTH,
            window: None,
        })
    }

    /// Override the window half-width (at least 1).
    pub fn with_half_width(mut self, half_width: u64) -> Self {
        self.half_width = half_width.max(1);
        self.window = None;
        self
    }

    pub fn contig(&self) -> &str {
        &self.contig
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Currently buffered range, if any.
    pub fn window(&self) -> Option<Range<u64>> {
        self.window
            .as_ref()
            .map(|w| w.origin..w.origin + w.bytes.len() as u64)
    }

    /// Byte at 0-based `offset`, refilling the window when it does not cover it.
    pub fn char_at(&mut self, offset: u64) -> Result<u8> {
        if offset >= self.length {
            return Err(Error::OutOfRange {
                offset,
                length: self.length,
            });
        }

        if let Some(base) = self.window.as_ref().and_then(|w| w.get(offset)) {
            return Ok(base);
        }

        self.refill(offset)?;
        self.window
            .as_ref()
            .and_then(|w| w.get(offset))
            .ok_or_else(|| Error::Internal(format!("window does not cover offset {}", offset)))
    }

    /// Bytes `[start, end)` read through the window.
    pub fn get_range(&mut self, range: Range<u64>) -> Result<Vec<u8>> {
        if range.start > range.end {
            return Err(Error::InvalidRange(format!(
                "start {} is after end {}",
                range.start, range.end
            )));
        }
        if range.end > self.length {
            return Err(Error::OutOfRange {
                offset: range.end - 1,
                length: self.length,
            });
        }

        let mut out = Vec::with_capacity((range.end - range.start) as usize);
        for offset in range {
            out.push(self.char_at(offset)?);
        }
        Ok(out)
    }

    fn refill(&mut self, offset: u64) -> Result<()> {
        let start = offset.saturating_sub(self.half_width);
        let end = start
            .saturating_add(self.half_width.saturating_mul(2))
            .min(self.length);

        tracing::debug!(
            contig = %self.contig,
            offset,
            start,
            end,
            "refilling sequence window"
        );

        let bytes = self.store.fetch_range(&self.contig, start, end)?;
        if bytes.len() as u64 != end - start {
            return Err(Error::Internal(format!(
                "store returned {} bases for {}:{}-{}, expected {}",
                bytes.len(),
                self.contig,
                start,
                end,
                end - start
            )));
        }

        self.window = Some(Window {
            origin: start,
            bytes,
        });
        Ok(())
    }
}

/// Byte at `offset` of the handle's contig.
pub fn lookup_character<S: SequenceStore>(
    handle: &mut SequenceHandle<S>,
    offset: u64,
) -> Result<u8> {
    handle.char_at(offset)
}
