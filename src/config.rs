use crate::sequence::DEFAULT_HALF_WIDTH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "vcfregistry")]
#[command(about = "Look up genotype calls across registered VCF files")]
pub struct Config {
    /// Catalog of groups (path<TAB>description per line)
    #[arg(long, env = "VCF_REGISTRY_GROUP_FILE")]
    pub registry: Option<PathBuf>,

    /// Indexed FASTA reference for base lookups
    #[arg(long, env = "VCF_REGISTRY_REFERENCE")]
    pub reference: Option<PathBuf>,

    /// Half-width of the buffered reference window
    #[arg(long, env = "VCF_REGISTRY_HALF_WIDTH", default_value_t = DEFAULT_HALF_WIDTH)]
    pub half_width: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the groups in the catalog
    Groups,

    /// List the indexed VCF files of a group
    Files {
        /// Group number, as printed by `groups`
        group: usize,
    },

    /// Show every genotype call at a position across a group's files
    Query {
        /// Group number, as printed by `groups`
        group: usize,

        /// Position as chrom:pos
        position: String,
    },

    /// Print reference bases [start, end) of a contig (0-based)
    Bases {
        contig: String,
        start: u64,
        end: u64,
    },
}

impl Config {
    pub fn registry_path(&self) -> Option<&PathBuf> {
        self.registry.as_ref()
    }
}
