//! noodles-backed readers for the collaborator traits.
//!
//! # Supported Formats
//!
//! - [`IndexedFastaStore`] - FASTA references with a `.fai` index
//! - [`TabixVariantStore`] - BGZF VCF files with a `.tbi` index

mod fasta;
mod vcf;

pub use fasta::IndexedFastaStore;
pub use vcf::TabixVariantStore;
