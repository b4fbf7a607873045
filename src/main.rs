use anyhow::Context;
use clap::Parser;
use std::io::{self, BufWriter, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vcfregistry::{
    Config, Position, SequenceHandle,
    aggregate::{AggregationResult, aggregate_group},
    config::Command,
    formats::{IndexedFastaStore, TabixVariantStore},
    registry::Registry,
};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match &config.command {
        Command::Groups => {
            for group in registry(&config)?.groups()? {
                writeln!(
                    out,
                    "{}\t{}\t{}",
                    group.index,
                    group.description(),
                    group.path.display()
                )?;
            }
        }
        Command::Files { group } => {
            let group = registry(&config)?.group(*group)?;
            for file in group.files()? {
                writeln!(out, "{}\t{}", file.path.display(), file.description())?;
            }
        }
        Command::Query { group, position } => {
            let group = registry(&config)?.group(*group)?;
            let Some(position) = Position::parse(position) else {
                tracing::warn!("Nothing to query for {:?}", position);
                return Ok(());
            };
            let result = aggregate_group(&TabixVariantStore, &group, &position)?;
            write_result(&mut out, &result)?;
        }
        Command::Bases { contig, start, end } => {
            let reference = config
                .reference
                .as_ref()
                .context("--reference is required for base lookups")?;
            let store = IndexedFastaStore::from_path(reference)?;
            let mut handle = SequenceHandle::new(store, contig)?.with_half_width(config.half_width);
            let bases = handle.get_range(*start..*end)?;
            out.write_all(&bases)?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn registry(config: &Config) -> anyhow::Result<Registry> {
    let path = config
        .registry_path()
        .context("--registry (or VCF_REGISTRY_GROUP_FILE) is required")?;
    Ok(Registry::new(path))
}

fn write_result(out: &mut impl Write, result: &AggregationResult) -> io::Result<()> {
    writeln!(
        out,
        "CHROM\tPOS\tID\tREF\tQUAL\tSample\tAlleles\tZygosity\tDP\tGQ\tFile"
    )?;
    for row in &result.rows {
        let record = &row.record;
        let call = &row.call;
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record.contig,
            record.position,
            record.id.as_deref().unwrap_or(""),
            record.reference_bases.as_deref().unwrap_or(""),
            record.quality.map(|q| (q as i64).to_string()).unwrap_or_default(),
            call.sample,
            call.allele_string(),
            call.zygosity,
            call.depth.map(|d| d.to_string()).unwrap_or_default(),
            call.genotype_quality.map(|g| g.to_string()).unwrap_or_default(),
            row.source.file_name(),
        )?;
    }

    let missing = result.sorted_samples_without_call();
    if !missing.is_empty() {
        writeln!(out, "# samples not found: {}", missing.join(","))?;
    }
    if let Some(failure) = result.last_error() {
        writeln!(out, "# last error: {}", failure)?;
    }
    Ok(())
}
