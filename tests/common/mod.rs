//! Shared fixtures for the query integration tests.

use rusqlite::Connection;
use uuid::Uuid;

/// DDL of the tables read by the engine.
///
/// The engine itself never creates tables, so the schema lives with the
/// tests.  Frequency columns default to zero like freshly imported variants.
const SCHEMA: &str = "
    CREATE TABLE case_info (
        id INTEGER PRIMARY KEY,
        sodar_uuid TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        index_name TEXT NOT NULL,
        pedigree TEXT NOT NULL
    );
    CREATE TABLE smallvariant (
        id INTEGER PRIMARY KEY,
        case_id INTEGER NOT NULL,
        release TEXT NOT NULL,
        chromosome TEXT NOT NULL,
        position INTEGER NOT NULL,
        reference TEXT NOT NULL,
        alternative TEXT NOT NULL,
        var_type TEXT NOT NULL,
        genotype TEXT NOT NULL,
        in_clinvar INTEGER NOT NULL DEFAULT 0,
        thousand_genomes_frequency REAL NOT NULL DEFAULT 0,
        thousand_genomes_heterozygous INTEGER NOT NULL DEFAULT 0,
        thousand_genomes_homozygous INTEGER NOT NULL DEFAULT 0,
        thousand_genomes_hemizygous INTEGER NOT NULL DEFAULT 0,
        exac_frequency REAL NOT NULL DEFAULT 0,
        exac_heterozygous INTEGER NOT NULL DEFAULT 0,
        exac_homozygous INTEGER NOT NULL DEFAULT 0,
        exac_hemizygous INTEGER NOT NULL DEFAULT 0,
        gnomad_exomes_frequency REAL NOT NULL DEFAULT 0,
        gnomad_exomes_heterozygous INTEGER NOT NULL DEFAULT 0,
        gnomad_exomes_homozygous INTEGER NOT NULL DEFAULT 0,
        gnomad_exomes_hemizygous INTEGER NOT NULL DEFAULT 0,
        gnomad_genomes_frequency REAL NOT NULL DEFAULT 0,
        gnomad_genomes_heterozygous INTEGER NOT NULL DEFAULT 0,
        gnomad_genomes_homozygous INTEGER NOT NULL DEFAULT 0,
        gnomad_genomes_hemizygous INTEGER NOT NULL DEFAULT 0,
        inhouse_carriers INTEGER NOT NULL DEFAULT 0,
        inhouse_heterozygous INTEGER NOT NULL DEFAULT 0,
        inhouse_homozygous INTEGER NOT NULL DEFAULT 0,
        inhouse_hemizygous INTEGER NOT NULL DEFAULT 0,
        mtdb_frequency REAL NOT NULL DEFAULT 0,
        mtdb_heteroplasmic INTEGER NOT NULL DEFAULT 0,
        mtdb_homoplasmic INTEGER NOT NULL DEFAULT 0,
        refseq_gene_id TEXT,
        refseq_transcript_id TEXT,
        refseq_transcript_coding INTEGER,
        refseq_hgvs_c TEXT,
        refseq_hgvs_p TEXT,
        refseq_effect TEXT,
        ensembl_gene_id TEXT,
        ensembl_transcript_id TEXT,
        ensembl_transcript_coding INTEGER,
        ensembl_hgvs_c TEXT,
        ensembl_hgvs_p TEXT,
        ensembl_effect TEXT
    );
    CREATE TABLE dbsnp (
        release TEXT NOT NULL,
        chromosome TEXT NOT NULL,
        position INTEGER NOT NULL,
        reference TEXT NOT NULL,
        alternative TEXT NOT NULL,
        rsid TEXT NOT NULL
    );
    CREATE TABLE hgnc (
        symbol TEXT NOT NULL,
        entrez_id TEXT,
        ensembl_gene_id TEXT
    );
    CREATE TABLE knowngeneaa (
        chromosome TEXT NOT NULL,
        start INTEGER NOT NULL,
        end INTEGER NOT NULL,
        transcript_id TEXT NOT NULL,
        alignment TEXT NOT NULL
    );
";

/// Pedigree JSON of the standard trio.
pub const TRIO_PEDIGREE: &str = r#"[
    {"name": "index", "father": "father", "mother": "mother",
     "sex": "male", "disease": "affected"},
    {"name": "father", "father": "0", "mother": "0",
     "sex": "male", "disease": "unaffected"},
    {"name": "mother", "father": "0", "mother": "0",
     "sex": "female", "disease": "unaffected"}
]"#;

/// Pedigree JSON of a singleton.
pub const SINGLETON_PEDIGREE: &str =
    r#"[{"name": "index", "sex": "female", "disease": "affected"}]"#;

/// Open an in-memory database with the fixture schema.
pub fn connection() -> Result<Connection, anyhow::Error> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}

/// Insert a case and return its row id.
pub fn insert_case(
    conn: &Connection,
    sodar_uuid: Uuid,
    name: &str,
    index_name: &str,
    pedigree: &str,
) -> Result<i64, anyhow::Error> {
    conn.execute(
        "INSERT INTO case_info (sodar_uuid, name, index_name, pedigree) \
         VALUES (:sodar_uuid, :name, :index_name, :pedigree)",
        rusqlite::named_params! {
            ":sodar_uuid": sodar_uuid.to_string(),
            ":name": name,
            ":index_name": index_name,
            ":pedigree": pedigree,
        },
    )?;
    Ok(conn.last_insert_rowid())
}

/// Open a database with a singleton case and return connection, case UUID,
/// and case row id.
pub fn singleton_case() -> Result<(Connection, Uuid, i64), anyhow::Error> {
    let conn = connection()?;
    let case_uuid = Uuid::new_v4();
    let case_id = insert_case(&conn, case_uuid, "case-single", "index", SINGLETON_PEDIGREE)?;
    Ok((conn, case_uuid, case_id))
}

/// Open a database with a trio case and return connection, case UUID, and
/// case row id.
pub fn trio_case() -> Result<(Connection, Uuid, i64), anyhow::Error> {
    let conn = connection()?;
    let case_uuid = Uuid::new_v4();
    let case_id = insert_case(&conn, case_uuid, "case-trio", "index", TRIO_PEDIGREE)?;
    Ok((conn, case_uuid, case_id))
}

/// Genotype JSON for a single sample with full call information.
pub fn gt_json(sample: &str, gt: &str, dp: i32, ad: i32, gq: i32) -> String {
    format!(r#"{{"{sample}": {{"gt": "{gt}", "dp": {dp}, "ad": {ad}, "gq": {gq}}}}}"#)
}

/// Genotype JSON for the standard trio with uniform good call quality.
pub fn trio_gt_json(index_gt: &str, father_gt: &str, mother_gt: &str) -> String {
    format!(
        concat!(
            r#"{{"index": {{"gt": "{}", "dp": 30, "ad": 15, "gq": 99}}, "#,
            r#""father": {{"gt": "{}", "dp": 30, "ad": 15, "gq": 99}}, "#,
            r#""mother": {{"gt": "{}", "dp": 30, "ad": 15, "gq": 99}}}}"#
        ),
        index_gt, father_gt, mother_gt
    )
}

/// One variant row for insertion.
///
/// The default is a heterozygous synonymous SNV of the singleton index at
/// 1:100 with zero population counts and RefSeq annotation on gene `1234`.
#[derive(Debug, Clone)]
pub struct Variant {
    pub release: &'static str,
    pub chromosome: &'static str,
    pub position: i32,
    pub reference: &'static str,
    pub alternative: &'static str,
    pub var_type: &'static str,
    pub genotype: String,
    pub in_clinvar: bool,
    pub gnomad_exomes_frequency: f64,
    pub gnomad_exomes_heterozygous: i32,
    pub gnomad_exomes_homozygous: i32,
    pub refseq_gene_id: Option<&'static str>,
    pub refseq_transcript_id: Option<&'static str>,
    pub refseq_transcript_coding: Option<bool>,
    pub refseq_hgvs_c: Option<&'static str>,
    pub refseq_hgvs_p: Option<&'static str>,
    pub refseq_effect: Option<&'static str>,
    pub ensembl_gene_id: Option<&'static str>,
    pub ensembl_transcript_id: Option<&'static str>,
    pub ensembl_transcript_coding: Option<bool>,
    pub ensembl_effect: Option<&'static str>,
}

impl Default for Variant {
    fn default() -> Self {
        Self {
            release: "GRCh37",
            chromosome: "1",
            position: 100,
            reference: "A",
            alternative: "G",
            var_type: "snv",
            genotype: gt_json("index", "0/1", 30, 15, 99),
            in_clinvar: false,
            gnomad_exomes_frequency: 0.0,
            gnomad_exomes_heterozygous: 0,
            gnomad_exomes_homozygous: 0,
            refseq_gene_id: Some("1234"),
            refseq_transcript_id: Some("NM_000001.1"),
            refseq_transcript_coding: Some(true),
            refseq_hgvs_c: Some("c.100A>G"),
            refseq_hgvs_p: Some("p.(=)"),
            refseq_effect: Some(r#"["synonymous_variant"]"#),
            ensembl_gene_id: None,
            ensembl_transcript_id: None,
            ensembl_transcript_coding: None,
            ensembl_effect: None,
        }
    }
}

/// Insert a variant for the given case and return its row id.
pub fn insert_variant(
    conn: &Connection,
    case_id: i64,
    variant: &Variant,
) -> Result<i64, anyhow::Error> {
    conn.execute(
        "INSERT INTO smallvariant (\
         case_id, release, chromosome, position, reference, alternative, \
         var_type, genotype, in_clinvar, \
         gnomad_exomes_frequency, gnomad_exomes_heterozygous, \
         gnomad_exomes_homozygous, \
         refseq_gene_id, refseq_transcript_id, refseq_transcript_coding, \
         refseq_hgvs_c, refseq_hgvs_p, refseq_effect, \
         ensembl_gene_id, ensembl_transcript_id, ensembl_transcript_coding, \
         ensembl_effect\
         ) VALUES (\
         :case_id, :release, :chromosome, :position, :reference, :alternative, \
         :var_type, :genotype, :in_clinvar, \
         :gnomad_exomes_frequency, :gnomad_exomes_heterozygous, \
         :gnomad_exomes_homozygous, \
         :refseq_gene_id, :refseq_transcript_id, :refseq_transcript_coding, \
         :refseq_hgvs_c, :refseq_hgvs_p, :refseq_effect, \
         :ensembl_gene_id, :ensembl_transcript_id, :ensembl_transcript_coding, \
         :ensembl_effect\
         )",
        rusqlite::named_params! {
            ":case_id": case_id,
            ":release": variant.release,
            ":chromosome": variant.chromosome,
            ":position": variant.position,
            ":reference": variant.reference,
            ":alternative": variant.alternative,
            ":var_type": variant.var_type,
            ":genotype": variant.genotype,
            ":in_clinvar": variant.in_clinvar,
            ":gnomad_exomes_frequency": variant.gnomad_exomes_frequency,
            ":gnomad_exomes_heterozygous": variant.gnomad_exomes_heterozygous,
            ":gnomad_exomes_homozygous": variant.gnomad_exomes_homozygous,
            ":refseq_gene_id": variant.refseq_gene_id,
            ":refseq_transcript_id": variant.refseq_transcript_id,
            ":refseq_transcript_coding": variant.refseq_transcript_coding,
            ":refseq_hgvs_c": variant.refseq_hgvs_c,
            ":refseq_hgvs_p": variant.refseq_hgvs_p,
            ":refseq_effect": variant.refseq_effect,
            ":ensembl_gene_id": variant.ensembl_gene_id,
            ":ensembl_transcript_id": variant.ensembl_transcript_id,
            ":ensembl_transcript_coding": variant.ensembl_transcript_coding,
            ":ensembl_effect": variant.ensembl_effect,
        },
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert a dbSNP annotation row.
pub fn insert_dbsnp(
    conn: &Connection,
    variant: &Variant,
    rsid: &str,
) -> Result<(), anyhow::Error> {
    conn.execute(
        "INSERT INTO dbsnp (release, chromosome, position, reference, alternative, rsid) \
         VALUES (:release, :chromosome, :position, :reference, :alternative, :rsid)",
        rusqlite::named_params! {
            ":release": variant.release,
            ":chromosome": variant.chromosome,
            ":position": variant.position,
            ":reference": variant.reference,
            ":alternative": variant.alternative,
            ":rsid": rsid,
        },
    )?;
    Ok(())
}

/// Insert a gene symbol row.
pub fn insert_hgnc(
    conn: &Connection,
    symbol: &str,
    entrez_id: Option<&str>,
    ensembl_gene_id: Option<&str>,
) -> Result<(), anyhow::Error> {
    conn.execute(
        "INSERT INTO hgnc (symbol, entrez_id, ensembl_gene_id) \
         VALUES (:symbol, :entrez_id, :ensembl_gene_id)",
        rusqlite::named_params! {
            ":symbol": symbol,
            ":entrez_id": entrez_id,
            ":ensembl_gene_id": ensembl_gene_id,
        },
    )?;
    Ok(())
}

/// Insert a conservation track row with a half-open interval.
pub fn insert_knowngeneaa(
    conn: &Connection,
    chromosome: &str,
    start: i32,
    end: i32,
    transcript_id: &str,
    alignment: &str,
) -> Result<(), anyhow::Error> {
    conn.execute(
        "INSERT INTO knowngeneaa (chromosome, start, end, transcript_id, alignment) \
         VALUES (:chromosome, :start, :end, :transcript_id, :alignment)",
        rusqlite::named_params! {
            ":chromosome": chromosome,
            ":start": start,
            ":end": end,
            ":transcript_id": transcript_id,
            ":alignment": alignment,
        },
    )?;
    Ok(())
}
