//! Genotype and quality predicates.
//!
//! Each sample contributes one term: its genotype choice combined with its
//! quality thresholds under the sample's fail policy.  The terms of all
//! samples are conjoined, so a variant must satisfy every configured sample.

use rusqlite::types::Value;

use crate::common::{GT_HET, GT_REF};
use crate::query::schema::{
    genotype_choice, CaseQuery, FailChoice, GenotypeChoice, GtStrings, QualitySettings,
};

use super::{CmpOp, Pred};

/// Error type for genotype predicate construction.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A recessive marker occurred outside recessive query assembly.
    #[error("recessive marker used outside recessive mode: {0:?}")]
    RecessiveMarker(GenotypeChoice),
}

impl From<genotype_choice::GtStringsError> for Error {
    fn from(value: genotype_choice::GtStringsError) -> Self {
        match value {
            genotype_choice::GtStringsError::RecessiveMarker(choice) => {
                Error::RecessiveMarker(choice)
            }
        }
    }
}

/// JSON path addressing `field` of `sample` inside the genotype column.
///
/// The sample name is quoted so that dots in names do not split the path.
pub(crate) fn genotype_path(sample: &str, field: &str) -> String {
    format!("$.\"{}\".{}", sample.replace('"', "\\\""), field)
}

/// Build the conjunction over all samples' genotype and quality terms.
///
/// # Errors
///
/// * `Error::RecessiveMarker` if a sample carries the recessive index marker;
///   markers are resolved by the recessive assembly, never here.
pub fn build(query: &CaseQuery) -> Result<Pred, Error> {
    let mut members = Vec::new();
    for (sample, choice) in &query.genotype {
        let choice = choice.unwrap_or_default();
        members.push(build_sample(query, sample, choice)?);
    }
    Ok(Pred::AllOf(members))
}

/// Term for one sample with its configured genotype choice.
pub(crate) fn build_sample(
    query: &CaseQuery,
    sample: &str,
    choice: GenotypeChoice,
) -> Result<Pred, Error> {
    let gt_pred = match choice.gt_strings()? {
        GtStrings::Any => Pred::True,
        GtStrings::In(gts) => gt_in(sample, gts, false),
        GtStrings::NotIn(gts) => gt_in(sample, gts, true),
    };
    Ok(apply_fail_policy(query, sample, gt_pred))
}

/// Term for one sample with an explicit genotype string list, as used by the
/// recessive assembly for trio roles.
pub(crate) fn build_sample_with_gts(query: &CaseQuery, sample: &str, gts: &[&str]) -> Pred {
    apply_fail_policy(query, sample, gt_in(sample, gts, false))
}

fn gt_in(sample: &str, gts: &[&str], negated: bool) -> Pred {
    Pred::GtIn {
        path: genotype_path(sample, "gt"),
        gts: gts.iter().map(|gt| gt.to_string()).collect(),
        negated,
    }
}

/// Combine the genotype term with the sample's quality term under the
/// configured fail policy.
///
/// * `ignore` keeps the genotype term alone.
/// * `drop-variant` requires quality and genotype to hold.
/// * `no-call` admits the variant when quality fails, as if the genotype
///   were unknown.
fn apply_fail_policy(query: &CaseQuery, sample: &str, gt_pred: Pred) -> Pred {
    let Some(settings) = query.quality.get(sample) else {
        return gt_pred;
    };
    let quality = quality_pred(sample, settings);
    match settings.fail {
        FailChoice::Ignore => gt_pred,
        FailChoice::Drop => Pred::AllOf(vec![quality, gt_pred]),
        FailChoice::NoCall => Pred::AnyOf(vec![Pred::Not(Box::new(quality)), gt_pred]),
    }
}

/// Quality threshold conjunction for one sample.
///
/// Unset thresholds and absent call fields contribute vacuously true terms.
/// The AD thresholds are bypassed for reference calls and the allele balance
/// window only applies to het. calls; a het. call at zero depth fails it.
fn quality_pred(sample: &str, settings: &QualitySettings) -> Pred {
    let mut terms = Vec::new();
    if let Some(dp) = settings.dp {
        terms.push(Pred::GtCmp {
            path: genotype_path(sample, "dp"),
            op: CmpOp::Ge,
            value: Value::Integer(dp as i64),
        });
    }
    if let Some(gq) = settings.gq {
        terms.push(Pred::GtCmp {
            path: genotype_path(sample, "gq"),
            op: CmpOp::Ge,
            value: Value::Integer(gq as i64),
        });
    }
    if let Some(ad) = settings.ad {
        terms.push(Pred::AnyOf(vec![
            gt_in(sample, GT_REF, false),
            Pred::GtCmp {
                path: genotype_path(sample, "ad"),
                op: CmpOp::Ge,
                value: Value::Integer(ad as i64),
            },
        ]));
    }
    if let Some(ad_max) = settings.ad_max {
        terms.push(Pred::AnyOf(vec![
            gt_in(sample, GT_REF, false),
            Pred::GtCmp {
                path: genotype_path(sample, "ad"),
                op: CmpOp::Le,
                value: Value::Integer(ad_max as i64),
            },
        ]));
    }
    if let Some(ab) = settings.ab {
        terms.push(Pred::AnyOf(vec![
            gt_in(sample, GT_HET, true),
            Pred::AlleleBalance {
                dp_path: genotype_path(sample, "dp"),
                ad_path: genotype_path(sample, "ad"),
                min_ab: ab as f64,
            },
        ]));
    }
    Pred::AllOf(terms)
}
