//! Population frequency and carrier count predicates.

use rusqlite::types::Value;

use crate::query::schema::CaseQuery;

use super::{CmpOp, Pred};

/// Build the conjunction of all enabled population thresholds.
///
/// Disabled databases contribute vacuously true terms.  Unset thresholds of
/// an enabled database are skipped, so enabling a database without setting
/// any threshold filters nothing.
pub fn build(query: &CaseQuery) -> Pred {
    Pred::AllOf(vec![
        nuclear(
            "thousand_genomes",
            query.thousand_genomes_enabled,
            query.thousand_genomes_frequency,
            query.thousand_genomes_heterozygous,
            query.thousand_genomes_homozygous,
            query.thousand_genomes_hemizygous,
        ),
        nuclear(
            "exac",
            query.exac_enabled,
            query.exac_frequency,
            query.exac_heterozygous,
            query.exac_homozygous,
            query.exac_hemizygous,
        ),
        nuclear(
            "gnomad_exomes",
            query.gnomad_exomes_enabled,
            query.gnomad_exomes_frequency,
            query.gnomad_exomes_heterozygous,
            query.gnomad_exomes_homozygous,
            query.gnomad_exomes_hemizygous,
        ),
        nuclear(
            "gnomad_genomes",
            query.gnomad_genomes_enabled,
            query.gnomad_genomes_frequency,
            query.gnomad_genomes_heterozygous,
            query.gnomad_genomes_homozygous,
            query.gnomad_genomes_hemizygous,
        ),
        inhouse(query),
        mtdb(query),
    ])
}

/// Thresholds for one nuclear population database with the standard four
/// columns `<prefix>_{frequency,heterozygous,homozygous,hemizygous}`.
fn nuclear(
    prefix: &str,
    enabled: bool,
    frequency: Option<f32>,
    heterozygous: Option<i32>,
    homozygous: Option<i32>,
    hemizygous: Option<i32>,
) -> Pred {
    if !enabled {
        return Pred::True;
    }
    let mut terms = Vec::new();
    if let Some(frequency) = frequency {
        terms.push(le_real(format!("sv.{}_frequency", prefix), frequency));
    }
    if let Some(heterozygous) = heterozygous {
        terms.push(le_int(format!("sv.{}_heterozygous", prefix), heterozygous));
    }
    if let Some(homozygous) = homozygous {
        terms.push(le_int(format!("sv.{}_homozygous", prefix), homozygous));
    }
    if let Some(hemizygous) = hemizygous {
        terms.push(le_int(format!("sv.{}_hemizygous", prefix), hemizygous));
    }
    Pred::AllOf(terms)
}

/// Thresholds on the in-house cohort counts; there is no frequency column,
/// carriers take its place.
fn inhouse(query: &CaseQuery) -> Pred {
    if !query.inhouse_enabled {
        return Pred::True;
    }
    let mut terms = Vec::new();
    if let Some(carriers) = query.inhouse_carriers {
        terms.push(le_int(String::from("sv.inhouse_carriers"), carriers));
    }
    if let Some(heterozygous) = query.inhouse_heterozygous {
        terms.push(le_int(String::from("sv.inhouse_heterozygous"), heterozygous));
    }
    if let Some(homozygous) = query.inhouse_homozygous {
        terms.push(le_int(String::from("sv.inhouse_homozygous"), homozygous));
    }
    if let Some(hemizygous) = query.inhouse_hemizygous {
        terms.push(le_int(String::from("sv.inhouse_hemizygous"), hemizygous));
    }
    Pred::AllOf(terms)
}

/// Thresholds on the mitochondrial database; heteroplasmic and homoplasmic
/// counts replace the nuclear zygosity columns.
fn mtdb(query: &CaseQuery) -> Pred {
    if !query.mtdb_enabled {
        return Pred::True;
    }
    let mut terms = Vec::new();
    if let Some(frequency) = query.mtdb_frequency {
        terms.push(le_real(String::from("sv.mtdb_frequency"), frequency));
    }
    if let Some(heteroplasmic) = query.mtdb_heteroplasmic {
        terms.push(le_int(String::from("sv.mtdb_heteroplasmic"), heteroplasmic));
    }
    if let Some(homoplasmic) = query.mtdb_homoplasmic {
        terms.push(le_int(String::from("sv.mtdb_homoplasmic"), homoplasmic));
    }
    Pred::AllOf(terms)
}

fn le_real(lhs: String, value: f32) -> Pred {
    Pred::Cmp {
        lhs,
        op: CmpOp::Le,
        value: Value::Real(value as f64),
    }
}

fn le_int(lhs: String, value: i32) -> Pred {
    Pred::Cmp {
        lhs,
        op: CmpOp::Le,
        value: Value::Integer(value as i64),
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::query::schema::CaseQuery;
    use crate::query::sql::{ParamSink, Pred};

    fn render(query: &CaseQuery) -> Result<(String, usize), anyhow::Error> {
        let pred = super::build(query).simplify();
        let mut sink = ParamSink::default();
        let sql = pred.render(&mut sink)?;
        Ok((sql, sink.len()))
    }

    #[test]
    fn all_disabled_is_vacuous() -> Result<(), anyhow::Error> {
        let query = CaseQuery::default();

        let (sql, n_params) = render(&query)?;

        assert_eq!(sql, "TRUE");
        assert_eq!(n_params, 0);

        Ok(())
    }

    #[test]
    fn enabled_without_thresholds_is_vacuous() -> Result<(), anyhow::Error> {
        let query = CaseQuery {
            gnomad_genomes_enabled: true,
            ..Default::default()
        };

        let (sql, _) = render(&query)?;

        assert_eq!(sql, "TRUE");

        Ok(())
    }

    #[test]
    fn thresholds_without_enabled_are_vacuous() -> Result<(), anyhow::Error> {
        let query = CaseQuery {
            gnomad_genomes_frequency: Some(0.01),
            gnomad_genomes_homozygous: Some(10),
            ..Default::default()
        };

        let (sql, _) = render(&query)?;

        assert_eq!(sql, "TRUE");

        Ok(())
    }

    #[test]
    fn nuclear_thresholds() -> Result<(), anyhow::Error> {
        let query = CaseQuery {
            gnomad_exomes_enabled: true,
            gnomad_exomes_frequency: Some(0.002),
            gnomad_exomes_heterozygous: Some(20),
            gnomad_exomes_homozygous: Some(0),
            gnomad_exomes_hemizygous: Some(2),
            ..Default::default()
        };

        let (sql, n_params) = render(&query)?;

        assert_eq!(
            sql,
            "(sv.gnomad_exomes_frequency <= :p0 \
              AND sv.gnomad_exomes_heterozygous <= :p1 \
              AND sv.gnomad_exomes_homozygous <= :p2 \
              AND sv.gnomad_exomes_hemizygous <= :p3)"
        );
        assert_eq!(n_params, 4);

        Ok(())
    }

    #[test]
    fn single_threshold_is_unparenthesized() -> Result<(), anyhow::Error> {
        let query = CaseQuery {
            thousand_genomes_enabled: true,
            thousand_genomes_frequency: Some(0.01),
            ..Default::default()
        };

        let (sql, _) = render(&query)?;

        assert_eq!(sql, "sv.thousand_genomes_frequency <= :p0");

        Ok(())
    }

    #[test]
    fn inhouse_uses_carrier_columns() -> Result<(), anyhow::Error> {
        let query = CaseQuery {
            inhouse_enabled: true,
            inhouse_carriers: Some(20),
            inhouse_homozygous: Some(0),
            ..Default::default()
        };

        let (sql, _) = render(&query)?;

        assert_eq!(
            sql,
            "(sv.inhouse_carriers <= :p0 AND sv.inhouse_homozygous <= :p1)"
        );

        Ok(())
    }

    #[test]
    fn mtdb_uses_plasmy_columns() -> Result<(), anyhow::Error> {
        let query = CaseQuery {
            mtdb_enabled: true,
            mtdb_frequency: Some(0.05),
            mtdb_heteroplasmic: Some(5),
            mtdb_homoplasmic: Some(0),
            ..Default::default()
        };

        let (sql, _) = render(&query)?;

        assert_eq!(
            sql,
            "(sv.mtdb_frequency <= :p0 \
              AND sv.mtdb_heteroplasmic <= :p1 \
              AND sv.mtdb_homoplasmic <= :p2)"
        );

        Ok(())
    }

    #[test]
    fn databases_combine_into_one_conjunction() -> Result<(), anyhow::Error> {
        let query = CaseQuery {
            thousand_genomes_enabled: true,
            thousand_genomes_frequency: Some(0.01),
            exac_enabled: true,
            exac_homozygous: Some(0),
            ..Default::default()
        };

        let pred = super::build(&query).simplify();

        assert!(matches!(pred, Pred::AllOf(ref members) if members.len() == 2));

        Ok(())
    }
}
