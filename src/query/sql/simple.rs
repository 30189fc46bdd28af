//! Assembly of the plain (non-recessive) filter query.

use itertools::Itertools;
use rusqlite::types::Value;
use uuid::Uuid;

use crate::query::schema::CaseQuery;

use super::effects::{self, AnnoColumns};
use super::{frequency, genotype, BuildError, CmpOp, ParamSink, Pred};

/// Columns selected identically for every database selection.
const FIXED_COLUMNS: &[&str] = &[
    "sv.id",
    "sv.release",
    "sv.chromosome",
    "sv.position",
    "sv.reference",
    "sv.alternative",
    "sv.var_type",
    "sv.genotype",
    "sv.in_clinvar",
    "sv.thousand_genomes_frequency",
    "sv.thousand_genomes_heterozygous",
    "sv.thousand_genomes_homozygous",
    "sv.thousand_genomes_hemizygous",
    "sv.exac_frequency",
    "sv.exac_heterozygous",
    "sv.exac_homozygous",
    "sv.exac_hemizygous",
    "sv.gnomad_exomes_frequency",
    "sv.gnomad_exomes_heterozygous",
    "sv.gnomad_exomes_homozygous",
    "sv.gnomad_exomes_hemizygous",
    "sv.gnomad_genomes_frequency",
    "sv.gnomad_genomes_heterozygous",
    "sv.gnomad_genomes_homozygous",
    "sv.gnomad_genomes_hemizygous",
    "sv.inhouse_carriers",
    "sv.inhouse_heterozygous",
    "sv.inhouse_homozygous",
    "sv.inhouse_hemizygous",
    "sv.mtdb_frequency",
    "sv.mtdb_heteroplasmic",
    "sv.mtdb_homoplasmic",
];

/// Render the shared projection.
///
/// The annotation columns of the selected database are aliased to
/// source-independent names so row decoding does not depend on the database
/// selection.  `conservation_expr` fills the trailing `conservation` column.
pub(crate) fn projection(columns: &AnnoColumns, conservation_expr: &str) -> String {
    FIXED_COLUMNS
        .iter()
        .map(|column| (*column).to_string())
        .chain([
            format!("sv.{} AS gene_id", columns.gene_id),
            format!("sv.{} AS transcript_id", columns.transcript_id),
            format!("sv.{} AS transcript_coding", columns.transcript_coding),
            format!("sv.{} AS hgvs_c", columns.hgvs_c),
            format!("sv.{} AS hgvs_p", columns.hgvs_p),
            format!("sv.{} AS effect", columns.effect),
            String::from("d.rsid AS rsid"),
            String::from("h.symbol AS symbol"),
            format!("{} AS conservation", conservation_expr),
        ])
        .join(", ")
}

/// Render the shared join clauses.
///
/// The conservation track join uses the half-open interval convention of the
/// track and strips transcript versions through the `LIKE` alternative.
pub(crate) fn joins(columns: &AnnoColumns, with_conservation: bool) -> String {
    let mut result = format!(
        "FROM smallvariant sv \
         JOIN case_info c ON sv.case_id = c.id \
         LEFT JOIN dbsnp d ON d.release = sv.release \
         AND d.chromosome = sv.chromosome \
         AND d.position = sv.position \
         AND d.reference = sv.reference \
         AND d.alternative = sv.alternative \
         LEFT JOIN hgnc h ON h.{} = sv.{}",
        columns.hgnc_join, columns.gene_id
    );
    if with_conservation {
        result.push_str(&format!(
            " LEFT JOIN knowngeneaa kg ON kg.chromosome = sv.chromosome \
             AND kg.start < sv.position \
             AND sv.position <= kg.end \
             AND (sv.{tx} = kg.transcript_id \
             OR sv.{tx} LIKE kg.transcript_id || '.%')",
            tx = columns.transcript_id
        ));
    }
    result
}

/// Predicate restricting rows to the case with the given UUID.
pub(crate) fn case_term(case_uuid: Uuid) -> Pred {
    Pred::Cmp {
        lhs: String::from("c.sodar_uuid"),
        op: CmpOp::Eq,
        value: Value::Text(case_uuid.to_string()),
    }
}

/// Assemble the plain filter query for one case.
///
/// Returns the SQL text and the parameters bound while rendering.  The
/// statement selects one row per variant, ordered by chromosome and position.
pub fn build(query: &CaseQuery, case_uuid: Uuid) -> Result<(String, ParamSink), BuildError> {
    let columns = AnnoColumns::for_database(query.database_select)
        .unwrap_or_else(AnnoColumns::fallback);

    let pred = Pred::AllOf(vec![
        case_term(case_uuid),
        genotype::build(query)?,
        frequency::build(query),
        effects::build(query),
    ])
    .simplify();

    let mut sink = ParamSink::default();
    let where_sql = pred.render(&mut sink)?;

    let conservation_expr = if query.with_conservation {
        "group_concat(kg.alignment)"
    } else {
        "NULL"
    };
    let mut sql = format!(
        "SELECT {} {} WHERE {}",
        projection(&columns, conservation_expr),
        joins(&columns, query.with_conservation),
        where_sql
    );
    if query.with_conservation {
        sql.push_str(" GROUP BY sv.id, d.rsid, h.symbol");
    }
    sql.push_str(" ORDER BY sv.chromosome, sv.position");

    tracing::debug!(
        sql_len = sql.len(),
        n_params = sink.len(),
        "assembled simple query"
    );

    Ok((sql, sink))
}
