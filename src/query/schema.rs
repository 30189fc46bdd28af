//! Supporting code for small variant query definition.
//!
//! Queries are stored and exchanged as JSON, so all types here round-trip
//! through `serde`.  The `Default` implementation of [`CaseQuery`] is the
//! query that lets all variants pass.

use strum::IntoEnumIterator;

/// Variant effects.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    strum::EnumIter,
    strum_macros::Display,
)]
pub enum VariantEffect {
    /// 3' UTR exon variant.
    #[serde(rename = "3_prime_UTR_exon_variant")]
    #[strum(serialize = "3_prime_UTR_exon_variant")]
    ThreePrimeUtrExonVariant,
    /// 3' UTR intron variant.
    #[serde(rename = "3_prime_UTR_intron_variant")]
    #[strum(serialize = "3_prime_UTR_intron_variant")]
    ThreePrimeUtrIntronVariant,
    /// 5' UTR exon variant.
    #[serde(rename = "5_prime_UTR_exon_variant")]
    #[strum(serialize = "5_prime_UTR_exon_variant")]
    FivePrimeUtrExonVariant,
    /// 5' UTR intron variant.
    #[serde(rename = "5_prime_UTR_intron_variant")]
    #[strum(serialize = "5_prime_UTR_intron_variant")]
    FivePrimeUtrIntronVariant,
    /// Coding transcript intron variant.
    #[serde(rename = "coding_transcript_intron_variant")]
    #[strum(serialize = "coding_transcript_intron_variant")]
    CodingTranscriptIntronVariant,
    /// Complex substitution.
    #[serde(rename = "complex_substitution")]
    #[strum(serialize = "complex_substitution")]
    ComplexSubstitution,
    /// Direct tandem duplication.
    #[serde(rename = "direct_tandem_duplication")]
    #[strum(serialize = "direct_tandem_duplication")]
    DirectTandemDuplication,
    /// Disruptive in-frame deletion.
    #[serde(rename = "disruptive_inframe_deletion")]
    #[strum(serialize = "disruptive_inframe_deletion")]
    DisruptiveInframeDeletion,
    /// Disruptive in-frame insertion.
    #[serde(rename = "disruptive_inframe_insertion")]
    #[strum(serialize = "disruptive_inframe_insertion")]
    DisruptiveInframeInsertion,
    /// Downstream gene variant.
    #[serde(rename = "downstream_gene_variant")]
    #[strum(serialize = "downstream_gene_variant")]
    DownstreamGeneVariant,
    /// Exon loss variant.
    #[serde(rename = "exon_loss_variant")]
    #[strum(serialize = "exon_loss_variant")]
    ExonLossVariant,
    /// Feature truncation.
    #[serde(rename = "feature_truncation")]
    #[strum(serialize = "feature_truncation")]
    FeatureTruncation,
    /// Frameshift elongation.
    #[serde(rename = "frameshift_elongation")]
    #[strum(serialize = "frameshift_elongation")]
    FrameshiftElongation,
    /// Frameshift truncation.
    #[serde(rename = "frameshift_truncation")]
    #[strum(serialize = "frameshift_truncation")]
    FrameshiftTruncation,
    /// Frameshift variant.
    #[serde(rename = "frameshift_variant")]
    #[strum(serialize = "frameshift_variant")]
    FrameshiftVariant,
    /// In-frame deletion.
    #[serde(rename = "inframe_deletion")]
    #[strum(serialize = "inframe_deletion")]
    InframeDeletion,
    /// In-frame insertion.
    #[serde(rename = "inframe_insertion")]
    #[strum(serialize = "inframe_insertion")]
    InframeInsertion,
    /// Intergenic variant.
    #[serde(rename = "intergenic_variant")]
    #[strum(serialize = "intergenic_variant")]
    IntergenicVariant,
    /// Internal feature elongation.
    #[serde(rename = "internal_feature_elongation")]
    #[strum(serialize = "internal_feature_elongation")]
    InternalFeatureElongation,
    /// Missense variant.
    #[serde(rename = "missense_variant")]
    #[strum(serialize = "missense_variant")]
    MissenseVariant,
    /// MNV.
    #[serde(rename = "mnv")]
    #[strum(serialize = "mnv")]
    Mnv,
    /// Non-coding transcript exon variant.
    #[serde(rename = "non_coding_transcript_exon_variant")]
    #[strum(serialize = "non_coding_transcript_exon_variant")]
    NonCodingTranscriptExonVariant,
    /// Non-coding transcript intron variant.
    #[serde(rename = "non_coding_transcript_intron_variant")]
    #[strum(serialize = "non_coding_transcript_intron_variant")]
    NonCodingTranscriptIntronVariant,
    /// Splice acceptor variant.
    #[serde(rename = "splice_acceptor_variant")]
    #[strum(serialize = "splice_acceptor_variant")]
    SpliceAcceptorVariant,
    /// Splice donor variant.
    #[serde(rename = "splice_donor_variant")]
    #[strum(serialize = "splice_donor_variant")]
    SpliceDonorVariant,
    /// Splice region variant.
    #[serde(rename = "splice_region_variant")]
    #[strum(serialize = "splice_region_variant")]
    SpliceRegionVariant,
    /// Start lost.
    #[serde(rename = "start_lost")]
    #[strum(serialize = "start_lost")]
    StartLost,
    /// Stop gained.
    #[serde(rename = "stop_gained")]
    #[strum(serialize = "stop_gained")]
    StopGained,
    /// Stop lost.
    #[serde(rename = "stop_lost")]
    #[strum(serialize = "stop_lost")]
    StopLost,
    /// Stop retained variant.
    #[serde(rename = "stop_retained_variant")]
    #[strum(serialize = "stop_retained_variant")]
    StopRetainedVariant,
    /// Structural variant.
    #[serde(rename = "structural_variant")]
    #[strum(serialize = "structural_variant")]
    StructuralVariant,
    /// Synonymous variant.
    #[serde(rename = "synonymous_variant")]
    #[strum(serialize = "synonymous_variant")]
    SynonymousVariant,
    /// Transcript ablation.
    #[serde(rename = "transcript_ablation")]
    #[strum(serialize = "transcript_ablation")]
    TranscriptAblation,
    /// Upstream gene variant.
    #[serde(rename = "upstream_gene_variant")]
    #[strum(serialize = "upstream_gene_variant")]
    UpstreamGeneVariant,
}

impl VariantEffect {
    /// Return vector of all values of `VariantEffect`.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

/// Transcript database selection.
///
/// Unknown values deserialize into `Unknown` rather than failing; queries
/// with an unknown database return no rows.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    Default,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum DatabaseSelect {
    /// RefSeq transcripts.
    #[default]
    #[serde(rename = "refseq")]
    Refseq,
    /// ENSEMBL transcripts.
    #[serde(rename = "ensembl")]
    Ensembl,
    /// Any other value.
    #[serde(other, rename = "unknown")]
    Unknown,
}

/// Enumeration for recessive mode queries.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    Default,
)]
pub enum RecessiveMode {
    /// Recessive mode disabled.
    #[default]
    #[serde(rename = "disabled")]
    Disabled,
    /// Compound heterozygous recessive mode.
    #[serde(rename = "compound-heterozygous")]
    CompoundHeterozygous,
    /// Homozygous recessive mode.
    #[serde(rename = "homozygous")]
    Homozygous,
    /// Generic recessive mode.
    #[serde(rename = "any")]
    Any,
}

/// Choices for failing quality thresholds on genotypes.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    Default,
)]
pub enum FailChoice {
    /// Ignore failure.
    #[default]
    #[serde(rename = "ignore")]
    Ignore,
    /// Drop whole variant.
    #[serde(rename = "drop-variant")]
    Drop,
    /// Interpret as "no-call".
    #[serde(rename = "no-call")]
    NoCall,
}

/// Choice for genotype.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    Default,
)]
pub enum GenotypeChoice {
    /// Any genotype.
    #[default]
    #[serde(rename = "any")]
    Any,
    /// Ref. genotype.
    #[serde(rename = "ref")]
    Ref,
    /// Het. genotype.
    #[serde(rename = "het")]
    Het,
    /// Hom. genotype.
    #[serde(rename = "hom")]
    Hom,
    /// Non-hom. genotype.
    #[serde(rename = "non-hom")]
    NonHom,
    /// Variant genotype.
    #[serde(rename = "variant")]
    Variant,
    /// Non-variant genotype.
    #[serde(rename = "non-variant")]
    NonVariant,
    /// Index in recessive inheritance.
    #[serde(rename = "recessive-index")]
    RecessiveIndex,
}

/// The genotype strings selected by a [`GenotypeChoice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GtStrings {
    /// No restriction on the genotype string.
    Any,
    /// The genotype string must be in the list.
    In(&'static [&'static str]),
    /// The genotype string must not be in the list.
    NotIn(&'static [&'static str]),
}

/// Supporting code for `GenotypeChoice`.
pub mod genotype_choice {
    /// Error type for `GenotypeChoice::gt_strings()`.
    #[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
    pub enum GtStringsError {
        /// Recessive markers do not enumerate genotype strings.
        #[error("cannot enumerate genotype strings for recessive marker: {0:?}")]
        RecessiveMarker(super::GenotypeChoice),
    }
}

impl GenotypeChoice {
    /// Return the genotype strings selected by this choice.
    ///
    /// # Errors
    ///
    /// * `GtStringsError::RecessiveMarker` when called on the recessive index
    ///   marker which only has meaning to the recessive query assembly.
    pub fn gt_strings(&self) -> Result<GtStrings, genotype_choice::GtStringsError> {
        Ok(match self {
            GenotypeChoice::Any => GtStrings::Any,
            GenotypeChoice::Ref => GtStrings::In(crate::common::GT_REF),
            GenotypeChoice::Het => GtStrings::In(crate::common::GT_HET),
            GenotypeChoice::Hom => GtStrings::In(crate::common::GT_HOM),
            GenotypeChoice::NonHom => GtStrings::In(crate::common::GT_NON_HOM),
            GenotypeChoice::Variant => GtStrings::In(crate::common::GT_VARIANT),
            GenotypeChoice::NonVariant => GtStrings::NotIn(crate::common::GT_VARIANT),
            GenotypeChoice::RecessiveIndex => {
                return Err(genotype_choice::GtStringsError::RecessiveMarker(*self))
            }
        })
    }
}

/// Quality settings for one sample.
#[serde_with::skip_serializing_none]
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug, Clone, Default)]
pub struct QualitySettings {
    /// Minimal coverage.
    pub dp: Option<i32>,
    /// Minimal genotype quality.
    pub gq: Option<i32>,
    /// Minimal allele balance for het. calls.
    pub ab: Option<f32>,
    /// Minimal number of alternate reads.
    pub ad: Option<i32>,
    /// Maximal number of alternate reads.
    pub ad_max: Option<i32>,
    /// Behaviour on failing quality thresholds.
    pub fail: FailChoice,
}

/// Data structure to hold a range.
#[derive(
    serde::Serialize, serde::Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone,
)]
pub struct Range {
    /// Start of range.
    pub start: i32,
    /// End of range.
    pub end: i32,
}

/// Data structure to hold a genomic region.
#[derive(
    serde::Serialize, serde::Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone,
)]
pub struct GenomicRegion {
    /// Chromosome.
    pub chrom: String,
    /// Range of region.
    pub range: Option<Range>,
}

/// Supporting code for `CaseQuery`.
pub mod case_query {
    /// Error type for `CaseQuery::recessive_index()`.
    #[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
    pub enum RecessiveIndexError {
        /// No sample carries the recessive index marker.
        #[error("no recessive index sample found")]
        NoRecessiveIndexSample,
        /// More than one sample carries the recessive index marker.
        #[error("multiple recessive index samples found: {0:?}")]
        MultipleRecessiveIndexSamples(Vec<String>),
    }
}

/// Data structure with a single query.
#[serde_with::skip_serializing_none]
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct CaseQuery {
    /// The database used for the transcript annotation.
    pub database_select: DatabaseSelect,
    /// Effects to consider.
    pub effects: Vec<VariantEffect>,

    /// Whether to include SNVs.
    pub var_type_snv: bool,
    /// Whether to include indels.
    pub var_type_indel: bool,
    /// Whether to include MNVs.
    pub var_type_mnv: bool,

    /// Whether to include coding transcripts.
    pub transcripts_coding: bool,
    /// Whether to include non-coding transcripts.
    pub transcripts_noncoding: bool,

    /// Recessive mode.
    pub recessive_mode: RecessiveMode,
    /// Genotype choice for each individual.
    pub genotype: indexmap::IndexMap<String, Option<GenotypeChoice>>,
    /// Quality settings for each individual.
    pub quality: indexmap::IndexMap<String, QualitySettings>,

    /// Whether to enable filtration by 1000 Genomes.
    pub thousand_genomes_enabled: bool,
    /// Maximal frequency in 1000 Genomes.
    pub thousand_genomes_frequency: Option<f32>,
    /// Maximal number of heterozygous carriers in 1000 Genomes.
    pub thousand_genomes_heterozygous: Option<i32>,
    /// Maximal number of homozygous carriers in 1000 Genomes.
    pub thousand_genomes_homozygous: Option<i32>,
    /// Maximal number of hemizygous carriers in 1000 Genomes.
    pub thousand_genomes_hemizygous: Option<i32>,

    /// Whether to enable filtration by ExAC.
    pub exac_enabled: bool,
    /// Maximal frequency in ExAC.
    pub exac_frequency: Option<f32>,
    /// Maximal number of heterozygous carriers in ExAC.
    pub exac_heterozygous: Option<i32>,
    /// Maximal number of homozygous carriers in ExAC.
    pub exac_homozygous: Option<i32>,
    /// Maximal number of hemizygous carriers in ExAC.
    pub exac_hemizygous: Option<i32>,

    /// Whether to enable filtration by gnomAD exomes.
    pub gnomad_exomes_enabled: bool,
    /// Maximal frequency in gnomAD exomes.
    pub gnomad_exomes_frequency: Option<f32>,
    /// Maximal number of heterozygous carriers in gnomAD exomes.
    pub gnomad_exomes_heterozygous: Option<i32>,
    /// Maximal number of homozygous carriers in gnomAD exomes.
    pub gnomad_exomes_homozygous: Option<i32>,
    /// Maximal number of hemizygous carriers in gnomAD exomes.
    pub gnomad_exomes_hemizygous: Option<i32>,

    /// Whether to enable filtration by gnomAD genomes.
    pub gnomad_genomes_enabled: bool,
    /// Maximal frequency in gnomAD genomes.
    pub gnomad_genomes_frequency: Option<f32>,
    /// Maximal number of heterozygous carriers in gnomAD genomes.
    pub gnomad_genomes_heterozygous: Option<i32>,
    /// Maximal number of homozygous carriers in gnomAD genomes.
    pub gnomad_genomes_homozygous: Option<i32>,
    /// Maximal number of hemizygous carriers in gnomAD genomes.
    pub gnomad_genomes_hemizygous: Option<i32>,

    /// Whether to enable filtration by in-house counts.
    pub inhouse_enabled: bool,
    /// Maximal number of in-house carriers.
    pub inhouse_carriers: Option<i32>,
    /// Maximal number of in-house heterozygous carriers.
    pub inhouse_heterozygous: Option<i32>,
    /// Maximal number of in-house homozygous carriers.
    pub inhouse_homozygous: Option<i32>,
    /// Maximal number of in-house hemizygous carriers.
    pub inhouse_hemizygous: Option<i32>,

    /// Whether to enable filtration by mtDB.
    pub mtdb_enabled: bool,
    /// Maximal frequency in mtDB.
    pub mtdb_frequency: Option<f32>,
    /// Maximal number of heteroplasmic carriers in mtDB.
    pub mtdb_heteroplasmic: Option<i32>,
    /// Maximal number of homoplasmic carriers in mtDB.
    pub mtdb_homoplasmic: Option<i32>,

    /// List of HGNC symbols to restrict the resulting variants to.
    pub gene_allowlist: Option<Vec<String>>,
    /// List of HGNC symbols to remove from the resulting variants.
    pub gene_blocklist: Option<Vec<String>>,
    /// List of genomic regions to restrict the resulting variants to.
    pub genomic_regions: Option<Vec<GenomicRegion>>,

    /// Whether to require ClinVar membership.
    pub require_in_clinvar: bool,
    /// Whether to collect conservation track alignments for the results.
    pub with_conservation: bool,
}

impl Default for CaseQuery {
    /// Returns default values for a `CaseQuery` which makes all variants pass.
    fn default() -> Self {
        Self {
            database_select: Default::default(),
            effects: VariantEffect::all(),
            var_type_snv: true,
            var_type_indel: true,
            var_type_mnv: true,
            transcripts_coding: true,
            transcripts_noncoding: true,
            recessive_mode: Default::default(),
            genotype: Default::default(),
            quality: Default::default(),
            thousand_genomes_enabled: Default::default(),
            thousand_genomes_frequency: Default::default(),
            thousand_genomes_heterozygous: Default::default(),
            thousand_genomes_homozygous: Default::default(),
            thousand_genomes_hemizygous: Default::default(),
            exac_enabled: Default::default(),
            exac_frequency: Default::default(),
            exac_heterozygous: Default::default(),
            exac_homozygous: Default::default(),
            exac_hemizygous: Default::default(),
            gnomad_exomes_enabled: Default::default(),
            gnomad_exomes_frequency: Default::default(),
            gnomad_exomes_heterozygous: Default::default(),
            gnomad_exomes_homozygous: Default::default(),
            gnomad_exomes_hemizygous: Default::default(),
            gnomad_genomes_enabled: Default::default(),
            gnomad_genomes_frequency: Default::default(),
            gnomad_genomes_heterozygous: Default::default(),
            gnomad_genomes_homozygous: Default::default(),
            gnomad_genomes_hemizygous: Default::default(),
            inhouse_enabled: Default::default(),
            inhouse_carriers: Default::default(),
            inhouse_heterozygous: Default::default(),
            inhouse_homozygous: Default::default(),
            inhouse_hemizygous: Default::default(),
            mtdb_enabled: Default::default(),
            mtdb_frequency: Default::default(),
            mtdb_heteroplasmic: Default::default(),
            mtdb_homoplasmic: Default::default(),
            gene_allowlist: Default::default(),
            gene_blocklist: Default::default(),
            genomic_regions: Default::default(),
            require_in_clinvar: Default::default(),
            with_conservation: Default::default(),
        }
    }
}

impl CaseQuery {
    /// Return the sample selected as the recessive index.
    ///
    /// # Errors
    ///
    /// * `RecessiveIndexError::NoRecessiveIndexSample` if no sample carries
    ///   the recessive index marker.
    /// * `RecessiveIndexError::MultipleRecessiveIndexSamples` if more than
    ///   one sample carries it.
    pub fn recessive_index(&self) -> Result<String, case_query::RecessiveIndexError> {
        let samples = self
            .genotype
            .iter()
            .filter(|(_, choice)| matches!(choice, Some(GenotypeChoice::RecessiveIndex)))
            .map(|(sample, _)| sample.clone())
            .collect::<Vec<_>>();
        if samples.is_empty() {
            Err(case_query::RecessiveIndexError::NoRecessiveIndexSample)
        } else if samples.len() > 1 {
            Err(case_query::RecessiveIndexError::MultipleRecessiveIndexSamples(samples))
        } else {
            Ok(samples[0].clone())
        }
    }
}
