use std::fmt;
use std::path::{Path, PathBuf};

/// A single genomic coordinate, 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub contig: String,
    pub coordinate: u64,
}

impl Position {
    pub fn new(contig: impl Into<String>, coordinate: u64) -> Option<Self> {
        let contig = contig.into();
        if contig.trim().is_empty() || coordinate < 1 {
            return None;
        }
        Some(Self { contig, coordinate })
    }

    /// Parse `contig:coordinate`. Malformed input means there is nothing to
    /// query, so it yields `None` rather than an error.
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if colon < 1 {
            return None;
        }
        let coordinate: i64 = s[colon + 1..].trim().parse().ok()?;
        if coordinate < 1 {
            return None;
        }
        let contig = s[..colon].trim();
        if contig.is_empty() {
            return None;
        }
        Some(Self {
            contig: contig.to_string(),
            coordinate: coordinate as u64,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.contig, self.coordinate)
    }
}

/// A variant data file plus its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    description: Option<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            description: None,
        }
    }

    pub fn with_description(path: impl Into<PathBuf>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: Some(description.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Description, falling back to the file's base name.
    pub fn description(&self) -> String {
        match &self.description {
            Some(desc) if !desc.trim().is_empty() => desc.clone(),
            _ => self.file_name(),
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Site-level fields of a decoded variant record.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub contig: String,
    pub position: u64,
    pub id: Option<String>,
    pub reference_bases: Option<String>,
    pub quality: Option<f32>,
}

impl VariantRecord {
    /// Numeric part of a dbSNP `rs` identifier, if the record carries one.
    pub fn dbsnp_id(&self) -> Option<&str> {
        let digits = self.id.as_deref()?.strip_prefix("rs")?;
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(digits)
        } else {
            None
        }
    }
}

/// Zygosity of a genotype call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zygosity {
    HomRef,
    Het,
    HomVar,
    Unclassified,
}

impl Zygosity {
    /// Classify a call from its allele indices (0 = reference, `None` = missing).
    ///
    /// A call with any missing allele cannot be characterized and is
    /// `Unclassified`, as is an empty call.
    pub fn classify(alleles: &[Option<usize>]) -> Self {
        let Some((first, rest)) = alleles.split_first() else {
            return Zygosity::Unclassified;
        };
        let Some(first) = *first else {
            return Zygosity::Unclassified;
        };

        let mut all_same = true;
        for allele in rest {
            match allele {
                None => return Zygosity::Unclassified,
                Some(i) if *i != first => all_same = false,
                Some(_) => {}
            }
        }

        match (all_same, first) {
            (false, _) => Zygosity::Het,
            (true, 0) => Zygosity::HomRef,
            (true, _) => Zygosity::HomVar,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Zygosity::HomRef => "HOM_REF",
            Zygosity::Het => "HET",
            Zygosity::HomVar => "HOM_VAR",
            Zygosity::Unclassified => "UNCLASSIFIED",
        }
    }
}

impl fmt::Display for Zygosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sample's call at one record.
#[derive(Debug, Clone, PartialEq)]
pub struct GenotypeCall {
    pub sample: String,
    pub alleles: Vec<String>,
    pub phased: bool,
    pub depth: Option<i32>,
    pub genotype_quality: Option<i32>,
    pub zygosity: Zygosity,
}

impl GenotypeCall {
    /// Alleles joined by `|` for phased calls, `/` otherwise.
    pub fn allele_string(&self) -> String {
        let sep = if self.phased { "|" } else { "/" };
        self.alleles.join(sep)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub record: VariantRecord,
    pub call: GenotypeCall,
    pub source: SourceFile,
}
