//! Predicates on transcript effects and variant annotations.
//!
//! This covers everything keyed on the transcript database selection (effect
//! arrays, coding flags) together with the annotation terms that need no
//! per-sample information (variant types, ClinVar membership, gene lists,
//! genomic regions).

use rusqlite::types::Value;

use crate::common::{build_chrom_map, CHROMS};
use crate::query::schema::{CaseQuery, DatabaseSelect, GenomicRegion};

use super::{CmpOp, Pred};

/// Column names that depend on the transcript database selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnoColumns {
    /// Gene identifier column in `smallvariant`.
    pub gene_id: &'static str,
    /// Transcript identifier column in `smallvariant`.
    pub transcript_id: &'static str,
    /// Coding transcript flag column in `smallvariant`.
    pub transcript_coding: &'static str,
    /// HGVS coding sequence description column.
    pub hgvs_c: &'static str,
    /// HGVS protein description column.
    pub hgvs_p: &'static str,
    /// Effect array column in `smallvariant`.
    pub effect: &'static str,
    /// Column in `hgnc` that matches the gene identifier.
    pub hgnc_join: &'static str,
}

const REFSEQ: AnnoColumns = AnnoColumns {
    gene_id: "refseq_gene_id",
    transcript_id: "refseq_transcript_id",
    transcript_coding: "refseq_transcript_coding",
    hgvs_c: "refseq_hgvs_c",
    hgvs_p: "refseq_hgvs_p",
    effect: "refseq_effect",
    hgnc_join: "entrez_id",
};

const ENSEMBL: AnnoColumns = AnnoColumns {
    gene_id: "ensembl_gene_id",
    transcript_id: "ensembl_transcript_id",
    transcript_coding: "ensembl_transcript_coding",
    hgvs_c: "ensembl_hgvs_c",
    hgvs_p: "ensembl_hgvs_p",
    effect: "ensembl_effect",
    hgnc_join: "ensembl_gene_id",
};

impl AnnoColumns {
    /// Column set for the given transcript database; `None` for unknown
    /// database selections.
    pub fn for_database(database: DatabaseSelect) -> Option<Self> {
        match database {
            DatabaseSelect::Refseq => Some(REFSEQ),
            DatabaseSelect::Ensembl => Some(ENSEMBL),
            DatabaseSelect::Unknown => None,
        }
    }

    /// Column set used for rendering a projection when the database selection
    /// is unknown and the result is empty anyway.
    pub fn fallback() -> Self {
        REFSEQ
    }
}

/// Build the annotation term conjunction.
///
/// An unknown database selection yields a constant false predicate so the
/// query runs but returns no rows.
pub fn build(query: &CaseQuery) -> Pred {
    let Some(columns) = AnnoColumns::for_database(query.database_select) else {
        return Pred::False;
    };

    let mut terms = vec![
        effect_term(query, &columns),
        var_type_term(query),
        coding_term(query, &columns),
    ];
    if query.require_in_clinvar {
        terms.push(Pred::Cmp {
            lhs: String::from("sv.in_clinvar"),
            op: CmpOp::Eq,
            value: Value::Integer(1),
        });
    }
    if let Some(allowlist) = query.gene_allowlist.as_deref().filter(|l| !l.is_empty()) {
        terms.push(Pred::InList {
            lhs: String::from("h.symbol"),
            values: allowlist
                .iter()
                .map(|symbol| Value::Text(symbol.clone()))
                .collect(),
            negated: false,
        });
    }
    if let Some(blocklist) = query.gene_blocklist.as_deref().filter(|l| !l.is_empty()) {
        // Variants without a gene symbol must survive the blocklist, and a
        // plain `NOT IN` would drop them through NULL comparison.
        terms.push(Pred::AnyOf(vec![
            Pred::IsNull {
                expr: String::from("h.symbol"),
                negated: false,
            },
            Pred::InList {
                lhs: String::from("h.symbol"),
                values: blocklist
                    .iter()
                    .map(|symbol| Value::Text(symbol.clone()))
                    .collect(),
                negated: true,
            },
        ]));
    }
    if let Some(regions) = query.genomic_regions.as_deref().filter(|r| !r.is_empty()) {
        terms.push(region_term(regions));
    }

    Pred::AllOf(terms)
}

/// Overlap between the variant's effect array and the selected effects.
///
/// An empty effect selection admits nothing.
fn effect_term(query: &CaseQuery, columns: &AnnoColumns) -> Pred {
    if query.effects.is_empty() {
        return Pred::False;
    }
    Pred::ArrayOverlap {
        expr: format!("sv.{}", columns.effect),
        values: query
            .effects
            .iter()
            .map(|effect| Value::Text(effect.to_string()))
            .collect(),
    }
}

/// Membership of the variant type in the selected types.
fn var_type_term(query: &CaseQuery) -> Pred {
    let selected: Vec<_> = [
        ("snv", query.var_type_snv),
        ("indel", query.var_type_indel),
        ("mnv", query.var_type_mnv),
    ]
    .into_iter()
    .filter(|(_, enabled)| *enabled)
    .map(|(name, _)| Value::Text(String::from(name)))
    .collect();

    match selected.len() {
        0 => Pred::False,
        3 => Pred::True,
        _ => Pred::InList {
            lhs: String::from("sv.var_type"),
            values: selected,
            negated: false,
        },
    }
}

/// Restriction to coding or non-coding transcripts.
fn coding_term(query: &CaseQuery, columns: &AnnoColumns) -> Pred {
    match (query.transcripts_coding, query.transcripts_noncoding) {
        (true, true) => Pred::True,
        (false, false) => Pred::False,
        (coding, _) => Pred::Cmp {
            lhs: format!("sv.{}", columns.transcript_coding),
            op: CmpOp::Eq,
            value: Value::Integer(if coding { 1 } else { 0 }),
        },
    }
}

/// Disjunction over the configured genomic regions.
fn region_term(regions: &[GenomicRegion]) -> Pred {
    let chrom_map = build_chrom_map();
    Pred::AnyOf(
        regions
            .iter()
            .map(|region| {
                let chrom = chrom_map
                    .get(&region.chrom)
                    .map(|&idx| CHROMS[idx].to_string())
                    .unwrap_or_else(|| region.chrom.clone());
                let mut members = vec![Pred::Cmp {
                    lhs: String::from("sv.chromosome"),
                    op: CmpOp::Eq,
                    value: Value::Text(chrom),
                }];
                if let Some(range) = &region.range {
                    members.push(Pred::Cmp {
                        lhs: String::from("sv.position"),
                        op: CmpOp::Ge,
                        value: Value::Integer(range.start as i64),
                    });
                    members.push(Pred::Cmp {
                        lhs: String::from("sv.position"),
                        op: CmpOp::Le,
                        value: Value::Integer(range.end as i64),
                    });
                }
                Pred::AllOf(members)
            })
            .collect(),
    )
}
