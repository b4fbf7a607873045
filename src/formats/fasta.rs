use crate::sequence::SequenceStore;
use crate::{Error, Result};
use bytes::Bytes;
use noodles::core::region::Interval;
use noodles::core::{Position, Region};
use noodles::fasta;
use noodles::fasta::fai;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// FASTA reference with a `.fai` companion, read through noodles.
pub struct IndexedFastaStore {
    reader: fasta::io::IndexedReader<BufReader<File>>,
    lengths: Vec<(Vec<u8>, u64)>,
}

impl IndexedFastaStore {
    /// Open `fasta_path`, reading its index from `<fasta_path>.fai`.
    pub fn from_path(fasta_path: impl AsRef<Path>) -> Result<Self> {
        let fasta_path = fasta_path.as_ref();
        let index_path = PathBuf::from(format!("{}.fai", fasta_path.display()));
        Self::from_paths(fasta_path, &index_path)
    }

    pub fn from_paths(fasta_path: &Path, index_path: &Path) -> Result<Self> {
        let index = fai::read(index_path)
            .map_err(|e| Error::Internal(format!("failed to read FAI index: {}", e)))?;

        // FAI Index wraps Vec<Record>, access via as_ref()
        let lengths = index
            .as_ref()
            .iter()
            .map(|record| (record.name().to_vec(), record.length() as u64))
            .collect();

        let file = File::open(fasta_path)
            .map_err(|e| Error::Internal(format!("failed to open FASTA file: {}", e)))?;
        let reader = fasta::io::IndexedReader::new(BufReader::new(file), index);

        tracing::debug!("Opened reference {:?}", fasta_path);

        Ok(Self { reader, lengths })
    }

    /// Contig names in index order.
    pub fn sequence_names(&self) -> impl Iterator<Item = String> + '_ {
        self.lengths
            .iter()
            .map(|(name, _)| String::from_utf8_lossy(name).into_owned())
    }
}

impl SequenceStore for IndexedFastaStore {
    fn sequence_length(&self, name: &str) -> Result<u64> {
        self.lengths
            .iter()
            .find(|(n, _)| n.as_slice() == name.as_bytes())
            .map(|(_, length)| *length)
            .ok_or_else(|| Error::NotFound(format!("sequence not found: {}", name)))
    }

    fn fetch_range(&mut self, name: &str, start: u64, end: u64) -> Result<Bytes> {
        if start >= end {
            return Ok(Bytes::new());
        }

        // 0-based half-open to noodles 1-based closed
        let start = Position::try_from(start as usize + 1)
            .map_err(|e| Error::InvalidRange(format!("invalid start position: {}", e)))?;
        let end = Position::try_from(end as usize)
            .map_err(|e| Error::InvalidRange(format!("invalid end position: {}", e)))?;
        let region = Region::new(name, Interval::from(start..=end));

        let record = self
            .reader
            .query(&region)
            .map_err(|e| Error::Internal(format!("failed to fetch {}: {}", region, e)))?;

        Ok(Bytes::copy_from_slice(record.sequence().as_ref()))
    }
}
