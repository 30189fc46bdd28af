//! Decoding of assembled query rows into result records.

use indexmap::IndexMap;
use uuid::Uuid;

use crate::query::schema::VariantEffect;

/// Error type for row decoding.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Problem reading a column from the row.
    #[error("problem reading column: {0}")]
    Db(#[from] rusqlite::Error),
    /// Problem deserializing a JSON column.
    #[error("problem decoding JSON column: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-sample call information as stored in the genotype JSON column.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug, Clone, Default)]
pub struct CallInfo {
    /// Genotype string.
    #[serde(default)]
    pub gt: Option<String>,
    /// Total read depth.
    #[serde(default)]
    pub dp: Option<i32>,
    /// Alternate allele read depth.
    #[serde(default)]
    pub ad: Option<i32>,
    /// Genotype quality.
    #[serde(default)]
    pub gq: Option<i32>,
}

/// Stored population frequencies and counts of one variant.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug, Clone, Default)]
pub struct PopulationCounts {
    /// 1000 Genomes allele frequency.
    pub thousand_genomes_frequency: f64,
    /// 1000 Genomes heterozygous carrier count.
    pub thousand_genomes_heterozygous: i32,
    /// 1000 Genomes homozygous carrier count.
    pub thousand_genomes_homozygous: i32,
    /// 1000 Genomes hemizygous carrier count.
    pub thousand_genomes_hemizygous: i32,
    /// ExAC allele frequency.
    pub exac_frequency: f64,
    /// ExAC heterozygous carrier count.
    pub exac_heterozygous: i32,
    /// ExAC homozygous carrier count.
    pub exac_homozygous: i32,
    /// ExAC hemizygous carrier count.
    pub exac_hemizygous: i32,
    /// gnomAD exomes allele frequency.
    pub gnomad_exomes_frequency: f64,
    /// gnomAD exomes heterozygous carrier count.
    pub gnomad_exomes_heterozygous: i32,
    /// gnomAD exomes homozygous carrier count.
    pub gnomad_exomes_homozygous: i32,
    /// gnomAD exomes hemizygous carrier count.
    pub gnomad_exomes_hemizygous: i32,
    /// gnomAD genomes allele frequency.
    pub gnomad_genomes_frequency: f64,
    /// gnomAD genomes heterozygous carrier count.
    pub gnomad_genomes_heterozygous: i32,
    /// gnomAD genomes homozygous carrier count.
    pub gnomad_genomes_homozygous: i32,
    /// gnomAD genomes hemizygous carrier count.
    pub gnomad_genomes_hemizygous: i32,
    /// In-house carrier count.
    pub inhouse_carriers: i32,
    /// In-house heterozygous count.
    pub inhouse_heterozygous: i32,
    /// In-house homozygous count.
    pub inhouse_homozygous: i32,
    /// In-house hemizygous count.
    pub inhouse_hemizygous: i32,
    /// mtDB frequency.
    pub mtdb_frequency: f64,
    /// mtDB heteroplasmic count.
    pub mtdb_heteroplasmic: i32,
    /// mtDB homoplasmic count.
    pub mtdb_homoplasmic: i32,
}

/// One decoded result row.
///
/// The annotation fields carry the values of the database selected in the
/// query; the genotype JSON is flattened into one map per call field, keyed
/// by sample name in storage order.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug, Clone)]
pub struct ResultRecord {
    /// Identifier of this result row, derived from the case UUID and the
    /// variant coordinate.
    pub sodar_uuid: Uuid,
    /// Genome release of the coordinate.
    pub release: String,
    /// Chromosome name.
    pub chromosome: String,
    /// Chromosome number for sorting, `0` for unplaced names.
    pub chromosome_no: i32,
    /// 1-based start position.
    pub position: i32,
    /// Reference allele.
    pub reference: String,
    /// Alternative allele.
    pub alternative: String,
    /// Variant type.
    pub var_type: String,
    /// rsID from dbSNP, if any.
    pub rsid: Option<String>,
    /// Gene symbol, if any.
    pub symbol: Option<String>,
    /// Gene identifier of the selected annotation source.
    pub gene_id: Option<String>,
    /// Transcript identifier of the selected annotation source.
    pub transcript_id: Option<String>,
    /// Whether the annotated transcript is coding.
    pub transcript_coding: Option<bool>,
    /// HGVS coding sequence description.
    pub hgvs_c: Option<String>,
    /// HGVS protein description.
    pub hgvs_p: Option<String>,
    /// Variant effects of the selected annotation source.
    pub effect: Vec<VariantEffect>,
    /// Whether the variant is in ClinVar.
    pub in_clinvar: bool,
    /// Aggregated conservation track alignments, if requested.
    pub conservation: Option<String>,
    /// Stored population frequencies and counts.
    pub population: PopulationCounts,
    /// Genotype string per sample.
    pub gt: IndexMap<String, Option<String>>,
    /// Total read depth per sample.
    pub dp: IndexMap<String, Option<i32>>,
    /// Alternate allele read depth per sample.
    pub ad: IndexMap<String, Option<i32>>,
    /// Genotype quality per sample.
    pub gq: IndexMap<String, Option<i32>>,
}

impl ResultRecord {
    /// Decode one row of an assembled query.
    ///
    /// All columns are addressed through the aliases of the shared
    /// projection, so decoding is independent of the database selection.
    /// The row identifier is a name-based UUID over the case UUID and the
    /// variant coordinate, so repeated runs return identical records.
    pub fn from_row(
        case_uuid: Uuid,
        row: &rusqlite::Row<'_>,
        chrom_map: &IndexMap<String, usize>,
    ) -> Result<Self, Error> {
        let chromosome: String = row.get("chromosome")?;
        let chromosome_no = chrom_map
            .get(&chromosome)
            .map(|&idx| idx as i32 + 1)
            .unwrap_or(0);
        let position: i32 = row.get("position")?;
        let reference: String = row.get("reference")?;
        let alternative: String = row.get("alternative")?;
        let sodar_uuid = Uuid::new_v5(
            &case_uuid,
            format!("{chromosome}-{position}-{reference}-{alternative}").as_bytes(),
        );

        let effect = row
            .get::<_, Option<String>>("effect")?
            .map(|json| serde_json::from_str(&json))
            .transpose()?
            .unwrap_or_default();

        let genotype_json: String = row.get("genotype")?;
        let calls: IndexMap<String, CallInfo> = serde_json::from_str(&genotype_json)?;
        let mut gt = IndexMap::new();
        let mut dp = IndexMap::new();
        let mut ad = IndexMap::new();
        let mut gq = IndexMap::new();
        for (sample, call) in calls {
            gt.insert(sample.clone(), call.gt);
            dp.insert(sample.clone(), call.dp);
            ad.insert(sample.clone(), call.ad);
            gq.insert(sample, call.gq);
        }

        Ok(Self {
            sodar_uuid,
            release: row.get("release")?,
            chromosome,
            chromosome_no,
            position,
            reference,
            alternative,
            var_type: row.get("var_type")?,
            rsid: row.get("rsid")?,
            symbol: row.get("symbol")?,
            gene_id: row.get("gene_id")?,
            transcript_id: row.get("transcript_id")?,
            transcript_coding: row.get("transcript_coding")?,
            hgvs_c: row.get("hgvs_c")?,
            hgvs_p: row.get("hgvs_p")?,
            effect,
            in_clinvar: row.get("in_clinvar")?,
            conservation: row.get("conservation")?,
            population: PopulationCounts {
                thousand_genomes_frequency: row.get("thousand_genomes_frequency")?,
                thousand_genomes_heterozygous: row.get("thousand_genomes_heterozygous")?,
                thousand_genomes_homozygous: row.get("thousand_genomes_homozygous")?,
                thousand_genomes_hemizygous: row.get("thousand_genomes_hemizygous")?,
                exac_frequency: row.get("exac_frequency")?,
                exac_heterozygous: row.get("exac_heterozygous")?,
                exac_homozygous: row.get("exac_homozygous")?,
                exac_hemizygous: row.get("exac_hemizygous")?,
                gnomad_exomes_frequency: row.get("gnomad_exomes_frequency")?,
                gnomad_exomes_heterozygous: row.get("gnomad_exomes_heterozygous")?,
                gnomad_exomes_homozygous: row.get("gnomad_exomes_homozygous")?,
                gnomad_exomes_hemizygous: row.get("gnomad_exomes_hemizygous")?,
                gnomad_genomes_frequency: row.get("gnomad_genomes_frequency")?,
                gnomad_genomes_heterozygous: row.get("gnomad_genomes_heterozygous")?,
                gnomad_genomes_homozygous: row.get("gnomad_genomes_homozygous")?,
                gnomad_genomes_hemizygous: row.get("gnomad_genomes_hemizygous")?,
                inhouse_carriers: row.get("inhouse_carriers")?,
                inhouse_heterozygous: row.get("inhouse_heterozygous")?,
                inhouse_homozygous: row.get("inhouse_homozygous")?,
                inhouse_hemizygous: row.get("inhouse_hemizygous")?,
                mtdb_frequency: row.get("mtdb_frequency")?,
                mtdb_heteroplasmic: row.get("mtdb_heteroplasmic")?,
                mtdb_homoplasmic: row.get("mtdb_homoplasmic")?,
            },
            gt,
            dp,
            ad,
            gq,
        })
    }
}
