//! Variant file abstraction used by the region aggregator.
//!
//! A [`VariantStore`] knows how to locate a source file's companion index and
//! how to open the file's decoding stream. Opening reads the header, so the
//! resulting [`VariantSource`] already knows the file's declared samples and
//! can answer positional queries through the index.
//!
//! # Implementations
//!
//! - [`TabixVariantStore`](crate::formats::TabixVariantStore) - BGZF VCF with a tabix index

use crate::types::{SourceFile, VariantRecord};
use crate::Result;

/// Lazy, non-restartable sequence of decoded records.
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<DecodedRecord>> + 'a>;

/// Opens source files for aggregation.
pub trait VariantStore {
    /// Whether the file's companion positional index exists.
    fn has_index(&self, file: &SourceFile) -> bool;

    /// Open the decoding stream and read the header.
    fn open(&self, file: &SourceFile) -> Result<Box<dyn VariantSource>>;
}

/// An opened variant file with its header already resolved.
pub trait VariantSource {
    /// Sample identities in header order.
    fn samples(&self) -> &[String];

    /// Records overlapping `[start, end)` (1-based, half-open) on `contig`.
    ///
    /// Returns `Ok(None)` when the index has no entry for `contig`.
    fn query(&mut self, contig: &str, start: u64, end: u64) -> Result<Option<RecordIter<'_>>>;
}

/// A record together with the raw per-sample genotype fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub record: VariantRecord,
    /// Aligned with [`VariantSource::samples`]; `None` when the sample has no column.
    pub genotypes: Vec<Option<SampleGenotype>>,
}

/// Genotype fields of one sample at one record, before classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleGenotype {
    /// Allele bases, `None` for a missing allele. Empty when no GT was given.
    pub alleles: Vec<Option<String>>,
    /// Allele indices into REF + ALT, `None` for a missing allele.
    pub allele_indices: Vec<Option<usize>>,
    pub phased: bool,
    pub depth: Option<i32>,
    pub genotype_quality: Option<i32>,
}

impl SampleGenotype {
    /// Whether a GT value was present at all.
    pub fn is_available(&self) -> bool {
        !self.allele_indices.is_empty()
    }

    /// Whether every allele is missing (`./.`).
    pub fn is_no_call(&self) -> bool {
        self.allele_indices.iter().all(Option::is_none)
    }

    /// Build from GT allele indices, resolving bases against REF and ALT.
    pub fn from_indices(
        indices: Vec<Option<usize>>,
        phased: bool,
        reference_bases: &str,
        alternate_bases: &[String],
    ) -> Self {
        let alleles = indices
            .iter()
            .map(|index| {
                index.map(|i| match i {
                    0 => reference_bases.to_string(),
                    i => alternate_bases
                        .get(i - 1)
                        .cloned()
                        .unwrap_or_else(|| ".".to_string()),
                })
            })
            .collect();

        Self {
            alleles,
            allele_indices: indices,
            phased,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_indices_resolves_bases() {
        let alts = vec!["G".to_string(), "T".to_string()];
        let gt = SampleGenotype::from_indices(vec![Some(0), Some(2)], true, "A", &alts);
        assert_eq!(gt.alleles, vec![Some("A".to_string()), Some("T".to_string())]);
        assert!(gt.phased);
        assert!(gt.is_available());
        assert!(!gt.is_no_call());
    }

    #[test]
    fn test_missing_alleles() {
        let gt = SampleGenotype::from_indices(vec![None, None], false, "A", &[]);
        assert_eq!(gt.alleles, vec![None, None]);
        assert!(gt.is_no_call());

        let gt = SampleGenotype::default();
        assert!(!gt.is_available());
    }
}
