//! Integration tests for vcfregistry
//!
//! Test data is generated into temporary directories.

use noodles::{bgzf, tabix, vcf};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use vcfregistry::{
    Error, Position, SequenceHandle, SequenceStore, SourceFile,
    aggregate::{FailureStage, aggregate_group, aggregate_region},
    formats::{IndexedFastaStore, TabixVariantStore},
    lookup_character,
    registry::Registry,
    types::Zygosity,
};

/// Write a single-contig FASTA with 60-base lines and its `.fai`.
fn write_reference(dir: &Path, name: &str, length: usize) -> (PathBuf, Vec<u8>) {
    let bases: Vec<u8> = (0..length).map(|i| b"ACGTTGCA"[(i * 7 + i / 3) % 8]).collect();

    let header = format!(">{}\n", name);
    let mut text = header.clone().into_bytes();
    for line in bases.chunks(60) {
        text.extend_from_slice(line);
        text.push(b'\n');
    }

    let fasta_path = dir.join("reference.fa");
    fs::write(&fasta_path, &text).unwrap();
    fs::write(
        dir.join("reference.fa.fai"),
        format!("{}\t{}\t{}\t60\t61\n", name, length, header.len()),
    )
    .unwrap();

    (fasta_path, bases)
}

const VCF_META: &str = "##fileformat=VCFv4.3\n\
##contig=<ID=chr1>\n\
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n\
##FORMAT=<ID=DP,Number=1,Type=Integer,Description=\"Read depth\">\n\
##FORMAT=<ID=GQ,Number=1,Type=Integer,Description=\"Genotype quality\">\n";

/// Write a BGZF VCF with the given samples and tab-separated record lines.
fn write_bgzf_vcf(path: &Path, samples: &[&str], records: &[&str]) {
    let mut writer = bgzf::Writer::new(fs::File::create(path).unwrap());
    writeln!(
        writer,
        "{}#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t{}",
        VCF_META,
        samples.join("\t")
    )
    .unwrap();
    for record in records {
        writeln!(writer, "{}", record).unwrap();
    }
    writer.finish().unwrap();
}

/// Build and write the `.tbi` companion for a BGZF VCF.
fn write_tabix_index(path: &Path) {
    let index = vcf::index(path).unwrap();
    tabix::write(TabixVariantStore::index_path(path), &index).unwrap();
}

#[test]
fn test_fasta_window_matches_direct_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let (fasta_path, bases) = write_reference(dir.path(), "chr7", 1000);

    let mut direct = IndexedFastaStore::from_path(&fasta_path).unwrap();
    assert_eq!(direct.sequence_length("chr7").unwrap(), 1000);

    let store = IndexedFastaStore::from_path(&fasta_path).unwrap();
    let mut handle = SequenceHandle::new(store, "chr7").unwrap().with_half_width(50);

    for offset in [0u64, 59, 60, 61, 500, 999, 998, 120, 3] {
        let expected = direct.fetch_range("chr7", offset, offset + 1).unwrap();
        assert_eq!(lookup_character(&mut handle, offset).unwrap(), expected[0]);
        assert_eq!(handle.char_at(offset).unwrap(), bases[offset as usize]);
    }

    assert_eq!(handle.window(), Some(0..100));
    assert_eq!(handle.get_range(58..63).unwrap(), bases[58..63].to_vec());
    assert!(matches!(
        handle.char_at(1000),
        Err(Error::OutOfRange {
            offset: 1000,
            length: 1000
        })
    ));
}

#[test]
fn test_fasta_unknown_contig() {
    let dir = tempfile::tempdir().unwrap();
    let (fasta_path, _) = write_reference(dir.path(), "chr1", 10);
    let store = IndexedFastaStore::from_path(&fasta_path).unwrap();
    assert!(matches!(
        SequenceHandle::new(store, "chrUn"),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_tabix_query_collects_calls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trio.vcf.gz");
    write_bgzf_vcf(
        &path,
        &["S1", "S2", "S3"],
        &[
            "chr1\t50\trs50\tT\tC\t30\tPASS\t.\tGT:DP:GQ\t0/1:5:20\t0/0:6:30\t1/1:7:40",
            "chr1\t100\trs100\tACG\tA\t60\tPASS\t.\tGT:DP:GQ\t0|1:12:99\t./.:.:.\t1/1:8:40",
            "chr1\t200\trs200\tG\tT\t10\tPASS\t.\tGT:DP:GQ\t0/0:3:10\t0/1:4:15\t0/0:2:5",
        ],
    );
    write_tabix_index(&path);

    let store = TabixVariantStore;
    let files = vec![SourceFile::new(&path)];
    let result = aggregate_region(&store, &Position::parse("chr1:100").unwrap(), &files);

    assert!(result.failures.is_empty());
    let calls: Vec<(&str, String, Zygosity, Option<i32>, Option<i32>)> = result
        .rows
        .iter()
        .map(|row| {
            (
                row.call.sample.as_str(),
                row.call.allele_string(),
                row.call.zygosity,
                row.call.depth,
                row.call.genotype_quality,
            )
        })
        .collect();
    assert_eq!(
        calls,
        vec![
            ("S1", "ACG|A".to_string(), Zygosity::Het, Some(12), Some(99)),
            ("S3", "A/A".to_string(), Zygosity::HomVar, Some(8), Some(40)),
        ]
    );
    for row in &result.rows {
        assert_eq!(row.record.position, 100);
        assert_eq!(row.record.id.as_deref(), Some("rs100"));
        assert_eq!(row.record.dbsnp_id(), Some("100"));
        assert_eq!(row.source.path, path);
    }
    assert_eq!(result.sorted_samples_without_call(), vec!["S2"]);

    // Contig absent from the index: nothing to report, not a fault
    let result = aggregate_region(&store, &Position::parse("chr2:100").unwrap(), &files);
    assert!(result.rows.is_empty());
    assert!(result.failures.is_empty());
    assert_eq!(
        result.samples_without_call,
        HashSet::from(["S1".to_string(), "S2".to_string(), "S3".to_string()])
    );
}

#[test]
fn test_corrupt_file_isolated_and_unindexed_skipped() {
    let dir = tempfile::tempdir().unwrap();

    // Indexed companion present, but the data is not BGZF
    let corrupt = dir.path().join("corrupt.vcf.gz");
    fs::write(&corrupt, b"definitely not a vcf").unwrap();
    fs::write(dir.path().join("corrupt.vcf.gz.tbi"), b"").unwrap();

    // Valid header, no index: silently excluded
    let unindexed = dir.path().join("unindexed.vcf.gz");
    write_bgzf_vcf(&unindexed, &["S1", "S2"], &[]);

    let files = vec![SourceFile::new(&corrupt), SourceFile::new(&unindexed)];
    let result = aggregate_region(
        &TabixVariantStore,
        &Position::parse("chr1:100").unwrap(),
        &files,
    );

    assert!(result.rows.is_empty());
    assert!(result.samples_without_call.is_empty());
    assert_eq!(result.failures.len(), 1);
    let failure = result.last_error().unwrap();
    assert_eq!(failure.stage, FailureStage::Header);
    assert_eq!(failure.source.path, corrupt);
}

#[test]
fn test_registry_query_with_broken_index() {
    let dir = tempfile::tempdir().unwrap();

    // Header reads fine, index is garbage: samples are declared, no calls
    let vcf = dir.path().join("cohort.vcf.gz");
    write_bgzf_vcf(&vcf, &["NA12878", "NA12891"], &[]);
    fs::write(dir.path().join("cohort.vcf.gz.tbi"), b"not an index").unwrap();

    let group_file = dir.path().join("cohort.list");
    fs::write(&group_file, format!("{}\tCohort VCF\n", vcf.display())).unwrap();

    let catalog = dir.path().join("catalog.tsv");
    fs::write(&catalog, format!("{}\tCohort\n", group_file.display())).unwrap();

    let registry = Registry::new(&catalog);
    let group = registry.group(0).unwrap();
    assert_eq!(group.description(), "Cohort");

    let files = group.files().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].description(), "Cohort VCF");

    let result = aggregate_group(
        &TabixVariantStore,
        &group,
        &Position::parse("chr1:100").unwrap(),
    )
    .unwrap();

    assert!(result.rows.is_empty());
    assert_eq!(
        result.sorted_samples_without_call(),
        vec!["NA12878", "NA12891"]
    );
    assert_eq!(result.last_error().unwrap().stage, FailureStage::Index);
}

#[test]
fn test_registry_listing_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let group_file = dir.path().join("group.list");
    let missing = dir.path().join("missing.vcf.gz");
    fs::write(&group_file, format!("{}\n", missing.display())).unwrap();
    let catalog = dir.path().join("catalog.tsv");
    fs::write(&catalog, format!("{}\tBroken\n", group_file.display())).unwrap();

    let group = Registry::new(&catalog).group(0).unwrap();
    let result = aggregate_group(
        &TabixVariantStore,
        &group,
        &Position::parse("chr1:1").unwrap(),
    );
    assert!(result.is_err());
}
