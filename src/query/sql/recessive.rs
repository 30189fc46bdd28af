//! Assembly of the recessive filter queries.
//!
//! Each parental-origin hypothesis becomes one sub-select with literal
//! genotype lists on the trio roles.  The union of the hypotheses is scored
//! per gene through window functions and the mode decides which gene
//! partitions survive.

use uuid::Uuid;

use crate::common::{GT_HET, GT_HOM, GT_REF};
use crate::ped::Pedigree;
use crate::query::schema::{CaseQuery, RecessiveMode};

use super::effects::{self, AnnoColumns};
use super::{frequency, genotype, simple, BuildError, ParamSink, Pred};

/// The index sample and its parent links, resolved from the pedigree.
struct Trio {
    index: String,
    father: Option<String>,
    mother: Option<String>,
}

impl Trio {
    fn contains(&self, sample: &str) -> bool {
        sample == self.index
            || self.father.as_deref() == Some(sample)
            || self.mother.as_deref() == Some(sample)
    }
}

/// One parental-origin hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    /// Index het., variant inherited from the father.
    Paternal,
    /// Index het., variant inherited from the mother.
    Maternal,
    /// Index hom., both parents carriers.
    Homozygous,
}

impl Branch {
    /// Indicator values of the `is_paternal`, `is_maternal`, `is_homozygous`
    /// flag columns.
    fn flags(self) -> (u8, u8, u8) {
        match self {
            Branch::Paternal => (1, 0, 0),
            Branch::Maternal => (0, 1, 0),
            Branch::Homozygous => (0, 0, 1),
        }
    }

    /// Literal genotype lists for the trio roles; absent parents contribute
    /// no term.
    fn roles<'a>(self, trio: &'a Trio) -> Vec<(&'a str, &'static [&'static str])> {
        let (index_gts, father_gts, mother_gts) = match self {
            Branch::Paternal => (GT_HET, GT_HET, GT_REF),
            Branch::Maternal => (GT_HET, GT_REF, GT_HET),
            Branch::Homozygous => (GT_HOM, GT_HET, GT_HET),
        };
        let mut result = vec![(trio.index.as_str(), index_gts)];
        if let Some(father) = &trio.father {
            result.push((father.as_str(), father_gts));
        }
        if let Some(mother) = &trio.mother {
            result.push((mother.as_str(), mother_gts));
        }
        result
    }
}

/// Assemble the recessive filter query for one case.
///
/// # Errors
///
/// * the recessive mode is `disabled`,
/// * no or more than one sample carries the recessive index marker,
/// * the index sample is missing from the pedigree,
/// * a mode with parental-origin hypotheses runs for an index without
///   parents in the pedigree.
pub fn build(
    query: &CaseQuery,
    pedigree: &Pedigree,
    case_uuid: Uuid,
) -> Result<(String, ParamSink), BuildError> {
    let (branches, mode_filter): (&[Branch], &str) = match query.recessive_mode {
        RecessiveMode::Disabled => return Err(BuildError::RecessiveModeDisabled),
        RecessiveMode::CompoundHeterozygous => (
            &[Branch::Paternal, Branch::Maternal],
            "paternal_count > 0 AND maternal_count > 0",
        ),
        RecessiveMode::Homozygous => (&[Branch::Homozygous], "is_homozygous = 1"),
        RecessiveMode::Any => (
            &[Branch::Paternal, Branch::Maternal, Branch::Homozygous],
            "is_homozygous = 1 OR (paternal_count > 0 AND maternal_count > 0)",
        ),
    };

    let index = query.recessive_index()?;
    let individual = pedigree
        .individual(&index)
        .ok_or_else(|| BuildError::IndexNotInPedigree(index.clone()))?;
    let trio = Trio {
        index: index.clone(),
        father: individual.father().map(str::to_string),
        mother: individual.mother().map(str::to_string),
    };
    // Without any parent the paternal and maternal sub-selects would be
    // identical and a lone het. call would satisfy both window counts.
    if branches.contains(&Branch::Paternal) && trio.father.is_none() && trio.mother.is_none() {
        return Err(BuildError::RecessiveParentsMissing(index));
    }

    let columns = AnnoColumns::for_database(query.database_select)
        .unwrap_or_else(AnnoColumns::fallback);

    let mut sink = ParamSink::default();
    let union = branches
        .iter()
        .map(|&branch| branch_sql(query, &trio, branch, &columns, case_uuid, &mut sink))
        .collect::<Result<Vec<_>, _>>()?
        .join(" UNION ALL ");

    let sql = format!(
        "SELECT * FROM (\
         SELECT sub.*, \
         COUNT(*) FILTER (WHERE sub.is_paternal = 1) \
         OVER (PARTITION BY sub.gene_id) AS paternal_count, \
         COUNT(*) FILTER (WHERE sub.is_maternal = 1) \
         OVER (PARTITION BY sub.gene_id) AS maternal_count \
         FROM ({union}) AS sub\
         ) AS windowed WHERE {mode_filter} \
         ORDER BY gene_id, chromosome, position"
    );

    tracing::debug!(
        sql_len = sql.len(),
        n_params = sink.len(),
        n_branches = branches.len(),
        "assembled recessive query"
    );

    Ok((sql, sink))
}

/// Render one hypothesis sub-select into the shared parameter sink.
fn branch_sql(
    query: &CaseQuery,
    trio: &Trio,
    branch: Branch,
    columns: &AnnoColumns,
    case_uuid: Uuid,
    sink: &mut ParamSink,
) -> Result<String, BuildError> {
    let mut members = vec![simple::case_term(case_uuid)];
    for (sample, gts) in branch.roles(trio) {
        members.push(genotype::build_sample_with_gts(query, sample, gts));
    }
    for (sample, choice) in &query.genotype {
        if trio.contains(sample) {
            continue;
        }
        members.push(genotype::build_sample(
            query,
            sample,
            choice.unwrap_or_default(),
        )?);
    }
    members.push(frequency::build(query));
    members.push(effects::build(query));
    // Pairing partitions by gene, so rows without a gene cannot take part.
    members.push(Pred::IsNull {
        expr: format!("sv.{}", columns.gene_id),
        negated: true,
    });

    let where_sql = Pred::AllOf(members).simplify().render(sink)?;
    let (is_paternal, is_maternal, is_homozygous) = branch.flags();

    Ok(format!(
        "SELECT {}, {} AS is_paternal, {} AS is_maternal, {} AS is_homozygous {} WHERE {}",
        simple::projection(columns, "NULL"),
        is_paternal,
        is_maternal,
        is_homozygous,
        simple::joins(columns, false),
        where_sql
    ))
}
