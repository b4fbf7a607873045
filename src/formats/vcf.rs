use crate::types::{SourceFile, VariantRecord};
use crate::variants::{DecodedRecord, RecordIter, SampleGenotype, VariantSource, VariantStore};
use crate::{Error, Result};
use noodles::bgzf;
use noodles::core::region::Interval;
use noodles::core::{Position, Region};
use noodles::csi::binning_index::BinningIndex;
use noodles::tabix;
use noodles::vcf;
use noodles::vcf::variant::record::samples::keys::key;
use noodles::vcf::variant::record::samples::series::value::genotype::Phasing;
use noodles::vcf::variant::record_buf::samples::sample::Value;
use std::fs::File;
use std::path::{Path, PathBuf};

/// BGZF-compressed VCF files indexed by a `<path>.tbi` companion.
#[derive(Debug, Default, Clone, Copy)]
pub struct TabixVariantStore;

impl TabixVariantStore {
    pub fn index_path(vcf_path: &Path) -> PathBuf {
        PathBuf::from(format!("{}.tbi", vcf_path.display()))
    }

    /// Read the VCF header through a BGZF stream.
    pub fn read_header(vcf_path: &Path) -> Result<vcf::Header> {
        let file = File::open(vcf_path)
            .map_err(|e| Error::Internal(format!("failed to open VCF file: {}", e)))?;

        let mut reader = vcf::io::Reader::new(bgzf::Reader::new(file));

        reader
            .read_header()
            .map_err(|e| Error::Internal(format!("failed to read VCF header: {}", e)))
    }
}

impl VariantStore for TabixVariantStore {
    fn has_index(&self, file: &SourceFile) -> bool {
        Self::index_path(&file.path).is_file()
    }

    fn open(&self, file: &SourceFile) -> Result<Box<dyn VariantSource>> {
        let header = Self::read_header(&file.path)?;
        let samples = header.sample_names().iter().cloned().collect();

        Ok(Box::new(TabixVariantSource {
            path: file.path.clone(),
            index_path: Self::index_path(&file.path),
            header,
            samples,
            reader: None,
        }))
    }
}

struct TabixVariantSource {
    path: PathBuf,
    index_path: PathBuf,
    header: vcf::Header,
    samples: Vec<String>,
    reader: Option<vcf::io::IndexedReader<bgzf::Reader<File>>>,
}

impl VariantSource for TabixVariantSource {
    fn samples(&self) -> &[String] {
        &self.samples
    }

    fn query(&mut self, contig: &str, start: u64, end: u64) -> Result<Option<RecordIter<'_>>> {
        let index = tabix::read(&self.index_path)
            .map_err(|e| Error::Internal(format!("failed to read tabix index: {}", e)))?;

        // The index's own naming decides whether the contig resolves
        let known = index.header().is_some_and(|header| {
            header
                .reference_sequence_names()
                .iter()
                .any(|name| same_name(name, contig))
        });
        if !known || start >= end {
            return Ok(None);
        }

        // Half-open [start, end) to noodles 1-based closed
        let start = Position::try_from(start as usize)
            .map_err(|e| Error::InvalidRange(format!("invalid start position: {}", e)))?;
        let end = Position::try_from((end - 1) as usize)
            .map_err(|e| Error::InvalidRange(format!("invalid end position: {}", e)))?;
        let region = Region::new(contig, Interval::from(start..=end));

        let reader = vcf::io::indexed_reader::Builder::default()
            .set_index(index)
            .build_from_path(&self.path)
            .map_err(|e| Error::Internal(format!("failed to open indexed VCF: {}", e)))?;
        let reader = self.reader.insert(reader);
        let header = &self.header;

        let query = reader
            .query(header, &region)
            .map_err(|e| Error::Internal(format!("index query failed: {}", e)))?;

        let records = query.map(move |result| {
            let record =
                result.map_err(|e| Error::Internal(format!("failed to read record: {}", e)))?;
            decode_record(header, &record)
        });

        Ok(Some(Box::new(records)))
    }
}

fn same_name<N: AsRef<[u8]>>(name: &N, contig: &str) -> bool {
    name.as_ref() == contig.as_bytes()
}

fn decode_record(header: &vcf::Header, record: &vcf::Record) -> Result<DecodedRecord> {
    let record = vcf::variant::RecordBuf::try_from_variant_record(header, record)
        .map_err(|e| Error::InvalidInput(format!("failed to decode record: {}", e)))?;

    let ids: Vec<&str> = record.ids().as_ref().iter().map(String::as_str).collect();
    let reference_bases = record.reference_bases();
    let alternate_bases = record.alternate_bases().as_ref();

    let position = record.variant_start().ok_or_else(|| {
        Error::InvalidInput(format!(
            "record on {} has no position",
            record.reference_sequence_name()
        ))
    })?;

    let site = VariantRecord {
        contig: record.reference_sequence_name().to_string(),
        position: position.get() as u64,
        id: (!ids.is_empty()).then(|| ids.join(";")),
        reference_bases: (!reference_bases.is_empty()).then(|| reference_bases.to_string()),
        quality: record.quality_score(),
    };

    let samples = record.samples();
    let genotypes = (0..header.sample_names().len())
        .map(|i| {
            samples
                .get_index(i)
                .map(|sample| decode_sample(&sample, reference_bases, alternate_bases))
        })
        .collect();

    Ok(DecodedRecord {
        record: site,
        genotypes,
    })
}

fn decode_sample(
    sample: &vcf::variant::record_buf::samples::Sample<'_>,
    reference_bases: &str,
    alternate_bases: &[String],
) -> SampleGenotype {
    let mut genotype = match sample.get(key::GENOTYPE) {
        Some(Some(Value::Genotype(gt))) => {
            let alleles = gt.as_ref();
            let indices = alleles.iter().map(|allele| allele.position()).collect();
            let phased = alleles
                .iter()
                .skip(1)
                .any(|allele| allele.phasing() == Phasing::Phased);
            SampleGenotype::from_indices(indices, phased, reference_bases, alternate_bases)
        }
        _ => SampleGenotype::default(),
    };

    genotype.depth = integer_value(sample, key::READ_DEPTH);
    genotype.genotype_quality = integer_value(sample, key::CONDITIONAL_GENOTYPE_QUALITY);
    genotype
}

fn integer_value(
    sample: &vcf::variant::record_buf::samples::Sample<'_>,
    field: &str,
) -> Option<i32> {
    match sample.get(field) {
        Some(Some(Value::Integer(n))) => Some(*n),
        _ => None,
    }
}
