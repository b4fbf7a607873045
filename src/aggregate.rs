//! Multi-file aggregation of genotype calls at a single position.

use crate::registry::Group;
use crate::types::{GenotypeCall, Position, ResultRow, SourceFile, Zygosity};
use crate::variants::{SampleGenotype, VariantStore};
use crate::{Error, Result};
use std::collections::HashSet;
use std::fmt;

/// Step at which a source file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Header,
    Index,
    Record,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Header => f.write_str("header"),
            FailureStage::Index => f.write_str("index"),
            FailureStage::Record => f.write_str("record"),
        }
    }
}

/// A fault isolated to one source file.
#[derive(Debug)]
pub struct SourceFailure {
    pub source: SourceFile,
    pub stage: FailureStage,
    pub error: Error,
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} failed: {}",
            self.source.path.display(),
            self.stage,
            self.error
        )
    }
}

#[derive(Debug, Default)]
pub struct AggregationResult {
    /// File order, then index order, then header sample order.
    pub rows: Vec<ResultRow>,
    /// Declared samples that produced no row.
    pub samples_without_call: HashSet<String>,
    /// Every per-file fault, oldest first.
    pub failures: Vec<SourceFailure>,
}

impl AggregationResult {
    /// Most recent per-file fault.
    pub fn last_error(&self) -> Option<&SourceFailure> {
        self.failures.last()
    }

    pub fn sorted_samples_without_call(&self) -> Vec<&str> {
        let mut samples: Vec<&str> = self.samples_without_call.iter().map(String::as_str).collect();
        samples.sort_unstable();
        samples
    }
}

/// Collect every sample call at `position` across `files`.
///
/// Header and index faults are confined to the file that raised them and
/// recorded in [`AggregationResult::failures`]. Files without a companion
/// index are skipped silently.
pub fn aggregate_region<V>(
    store: &V,
    position: &Position,
    files: &[SourceFile],
) -> AggregationResult
where
    V: VariantStore + ?Sized,
{
    let mut result = AggregationResult::default();
    let mut declared: HashSet<String> = HashSet::new();
    let mut called: HashSet<String> = HashSet::new();

    let start = position.coordinate;
    let end = position.coordinate + 1;

    for file in files {
        if !store.has_index(file) {
            tracing::debug!("Skipping {:?}: no index", file.path);
            continue;
        }

        let mut source = match store.open(file) {
            Ok(source) => source,
            Err(e) => {
                record_failure(&mut result, file, FailureStage::Header, e);
                continue;
            }
        };

        let samples = source.samples().to_vec();
        declared.extend(samples.iter().cloned());

        let records = match source.query(&position.contig, start, end) {
            Ok(Some(records)) => records,
            Ok(None) => {
                tracing::debug!("{:?} has no index entry for {}", file.path, position.contig);
                continue;
            }
            Err(e) => {
                record_failure(&mut result, file, FailureStage::Index, e);
                continue;
            }
        };

        let mut emitted = 0usize;
        for decoded in records {
            let decoded = match decoded {
                Ok(decoded) => decoded,
                Err(e) => {
                    record_failure(&mut result, file, FailureStage::Record, e);
                    break;
                }
            };

            for (sample, genotype) in samples.iter().zip(decoded.genotypes.iter()) {
                let Some(genotype) = genotype else {
                    continue;
                };
                let Some(call) = classify_call(sample, genotype) else {
                    continue;
                };

                called.insert(sample.clone());
                result.rows.push(ResultRow {
                    record: decoded.record.clone(),
                    call,
                    source: file.clone(),
                });
                emitted += 1;
            }
        }

        tracing::debug!("{:?}: {} calls at {}", file.path, emitted, position);
    }

    result.samples_without_call = declared.difference(&called).cloned().collect();

    tracing::info!(
        "Aggregated {} calls at {} from {} files ({} failures)",
        result.rows.len(),
        position,
        files.len(),
        result.failures.len()
    );

    result
}

/// List the group's files, then aggregate across them.
///
/// Failing to list the group's files is the only fatal error.
pub fn aggregate_group<V>(
    store: &V,
    group: &Group,
    position: &Position,
) -> Result<AggregationResult>
where
    V: VariantStore + ?Sized,
{
    let files = group.files()?;
    Ok(aggregate_region(store, position, &files))
}

/// Turn raw genotype fields into a call, or `None` for absent / no-call data.
fn classify_call(sample: &str, genotype: &SampleGenotype) -> Option<GenotypeCall> {
    if !genotype.is_available() || genotype.is_no_call() {
        return None;
    }

    Some(GenotypeCall {
        sample: sample.to_string(),
        alleles: genotype
            .alleles
            .iter()
            .map(|allele| allele.clone().unwrap_or_else(|| ".".to_string()))
            .collect(),
        phased: genotype.phased,
        depth: genotype.depth,
        genotype_quality: genotype.genotype_quality,
        zygosity: Zygosity::classify(&genotype.allele_indices),
    })
}

fn record_failure(
    result: &mut AggregationResult,
    file: &SourceFile,
    stage: FailureStage,
    error: Error,
) {
    tracing::warn!(
        error_type = error.error_type(),
        "{:?}: {} failed: {}",
        file.path,
        stage,
        error
    );
    result.failures.push(SourceFailure {
        source: file.clone(),
        stage,
        error,
    });
}
