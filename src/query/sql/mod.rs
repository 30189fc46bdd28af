//! SQL construction for small variant queries.
//!
//! Queries are built as trees of [`Pred`] and rendered into SQL text with
//! named parameters (`:p0`, `:p1`, ...).  Construction and rendering are
//! separate steps: [`Pred::simplify`] removes degenerate sub-trees first, so
//! no parameter name is ever allocated for a branch that does not appear in
//! the final statement.  SQLite rejects statements that are handed parameters
//! they do not mention, which turns any mismatch into a hard error instead of
//! a silently wrong result.
//!
//! The leaf nodes are specific to the small variant store: `Gt*` nodes
//! address per-sample fields inside the `sv.genotype` JSON column, with the
//! JSON path bound as a parameter rather than spliced into the statement.

pub mod effects;
pub mod frequency;
pub mod genotype;
pub mod recessive;
pub mod simple;

use rusqlite::types::Value;

/// Comparison operators usable in [`Pred::Cmp`] and [`Pred::GtCmp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// Less than or equal.
    Le,
    /// Less than.
    Lt,
    /// Greater than or equal.
    Ge,
    /// Greater than.
    Gt,
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
}

impl CmpOp {
    /// The SQL spelling of the operator.
    fn sql(&self) -> &'static str {
        match self {
            CmpOp::Le => "<=",
            CmpOp::Lt => "<",
            CmpOp::Ge => ">=",
            CmpOp::Gt => ">",
            CmpOp::Eq => "=",
            CmpOp::Ne => "!=",
        }
    }
}

/// Error type for rendering predicate trees into SQL.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// An IN list reached the renderer without values.
    #[error("IN list without values for {0}")]
    EmptyInList(String),
}

/// Error type for query construction.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// Genotype predicate construction failed.
    #[error("genotype predicate: {0}")]
    Genotype(#[from] genotype::Error),
    /// Recessive index selection failed.
    #[error("recessive index: {0}")]
    RecessiveIndex(#[from] crate::query::schema::case_query::RecessiveIndexError),
    /// The recessive index sample does not occur in the pedigree.
    #[error("recessive index sample not in pedigree: {0}")]
    IndexNotInPedigree(String),
    /// A mode with parental-origin hypotheses was requested for an index
    /// without parents in the pedigree.
    #[error("recessive index sample has no parents in the pedigree: {0}")]
    RecessiveParentsMissing(String),
    /// Recessive assembly was invoked without an active recessive mode.
    #[error("recessive query assembly requires an active recessive mode")]
    RecessiveModeDisabled,
    /// Rendering the predicate tree failed.
    #[error("could not render SQL: {0}")]
    Render(#[from] RenderError),
}

/// Parameter sink allocating `:pN` names while rendering.
///
/// All parameters of a statement come from one sink, so names are unique by
/// construction and the binding order equals the allocation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSink {
    params: Vec<(String, Value)>,
}

impl ParamSink {
    /// Allocate the next parameter name for `value` and return it.
    fn bind(&mut self, value: Value) -> String {
        let name = format!(":p{}", self.params.len());
        self.params.push((name.clone(), value));
        name
    }

    /// Number of parameters bound so far.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameter has been bound yet.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Borrow the parameters in the form `rusqlite` expects for named binding.
    pub fn as_named(&self) -> Vec<(&str, &dyn rusqlite::ToSql)> {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn rusqlite::ToSql))
            .collect()
    }

    /// Access the name/value pairs.
    pub fn params(&self) -> &[(String, Value)] {
        &self.params
    }
}

/// One node of a predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Pred {
    /// Constant truth; drops out of conjunctions.
    True,
    /// Constant falsehood; collapses conjunctions.
    False,
    /// Negation.
    Not(Box<Pred>),
    /// Conjunction over the members.
    AllOf(Vec<Pred>),
    /// Disjunction over the members.
    AnyOf(Vec<Pred>),
    /// `<lhs> <op> <param>` with a bound value.
    Cmp {
        /// Column or expression on the left-hand side.
        lhs: String,
        /// Comparison operator.
        op: CmpOp,
        /// Value bound on the right-hand side.
        value: Value,
    },
    /// `<lhs> [NOT] IN (<params>)`.
    InList {
        /// Column or expression on the left-hand side.
        lhs: String,
        /// Values bound inside the list.
        values: Vec<Value>,
        /// Whether to negate the membership test.
        negated: bool,
    },
    /// `<expr> IS [NOT] NULL`.
    IsNull {
        /// Column or expression to test.
        expr: String,
        /// Whether to test for `IS NOT NULL` instead.
        negated: bool,
    },
    /// Overlap between a JSON array column and a value list, rendered as
    /// `EXISTS (SELECT 1 FROM json_each(<expr>) WHERE json_each.value IN (...))`.
    ArrayOverlap {
        /// The JSON array column or expression.
        expr: String,
        /// Values bound inside the list.
        values: Vec<Value>,
    },
    /// Threshold on a per-sample genotype field; vacuously true when the
    /// field is absent for the sample.
    GtCmp {
        /// JSON path of the field inside `sv.genotype`, bound as a parameter.
        path: String,
        /// Comparison operator.
        op: CmpOp,
        /// Value bound on the right-hand side.
        value: Value,
    },
    /// Membership test on a per-sample genotype string.
    GtIn {
        /// JSON path of the genotype string inside `sv.genotype`.
        path: String,
        /// Genotype strings to test against.
        gts: Vec<String>,
        /// Whether to negate the membership test.
        negated: bool,
    },
    /// Allele balance window `min_ab <= ad/dp <= 1 - min_ab` for one sample;
    /// vacuously true when `ad` or `dp` is absent, failed when `dp` is zero.
    AlleleBalance {
        /// JSON path of the total read depth field.
        dp_path: String,
        /// JSON path of the alternate read depth field.
        ad_path: String,
        /// Minimal allele balance.
        min_ab: f64,
    },
}

impl Pred {
    /// Remove constant sub-trees.
    ///
    /// `AllOf`/`AnyOf` absorb their identity elements, collapse on their zero
    /// elements, and are flattened into their parent of the same kind; double
    /// negation cancels.  Rendering a simplified tree never emits a parameter
    /// for a dropped branch.
    pub fn simplify(self) -> Pred {
        match self {
            Pred::Not(inner) => match inner.simplify() {
                Pred::True => Pred::False,
                Pred::False => Pred::True,
                Pred::Not(inner) => *inner,
                other => Pred::Not(Box::new(other)),
            },
            Pred::AllOf(members) => {
                let mut result = Vec::new();
                for member in members {
                    match member.simplify() {
                        Pred::True => (),
                        Pred::False => return Pred::False,
                        Pred::AllOf(inner) => result.extend(inner),
                        other => result.push(other),
                    }
                }
                if result.is_empty() {
                    Pred::True
                } else if result.len() == 1 {
                    result.remove(0)
                } else {
                    Pred::AllOf(result)
                }
            }
            Pred::AnyOf(members) => {
                let mut result = Vec::new();
                for member in members {
                    match member.simplify() {
                        Pred::False => (),
                        Pred::True => return Pred::True,
                        Pred::AnyOf(inner) => result.extend(inner),
                        other => result.push(other),
                    }
                }
                if result.is_empty() {
                    Pred::False
                } else if result.len() == 1 {
                    result.remove(0)
                } else {
                    Pred::AnyOf(result)
                }
            }
            other => other,
        }
    }

    /// Render into SQL text, binding all values into `sink`.
    ///
    /// # Errors
    ///
    /// * `RenderError::EmptyInList` when a list node has no values; builders
    ///   are expected to degrade empty selections to `Pred::False` before
    ///   rendering, so hitting this is a bug in query construction.
    pub fn render(&self, sink: &mut ParamSink) -> Result<String, RenderError> {
        match self {
            Pred::True => Ok(String::from("TRUE")),
            Pred::False => Ok(String::from("FALSE")),
            Pred::Not(inner) => Ok(format!("(NOT {})", inner.render(sink)?)),
            Pred::AllOf(members) => {
                if members.is_empty() {
                    return Ok(String::from("TRUE"));
                }
                let parts = members
                    .iter()
                    .map(|member| member.render(sink))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("({})", parts.join(" AND ")))
            }
            Pred::AnyOf(members) => {
                if members.is_empty() {
                    return Ok(String::from("FALSE"));
                }
                let parts = members
                    .iter()
                    .map(|member| member.render(sink))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("({})", parts.join(" OR ")))
            }
            Pred::Cmp { lhs, op, value } => {
                let param = sink.bind(value.clone());
                Ok(format!("{} {} {}", lhs, op.sql(), param))
            }
            Pred::InList {
                lhs,
                values,
                negated,
            } => {
                if values.is_empty() {
                    return Err(RenderError::EmptyInList(lhs.clone()));
                }
                let params = values
                    .iter()
                    .map(|value| sink.bind(value.clone()))
                    .collect::<Vec<_>>();
                let keyword = if *negated { "NOT IN" } else { "IN" };
                Ok(format!("{} {} ({})", lhs, keyword, params.join(", ")))
            }
            Pred::IsNull { expr, negated } => {
                let keyword = if *negated { "IS NOT NULL" } else { "IS NULL" };
                Ok(format!("{} {}", expr, keyword))
            }
            Pred::ArrayOverlap { expr, values } => {
                if values.is_empty() {
                    return Err(RenderError::EmptyInList(expr.clone()));
                }
                let params = values
                    .iter()
                    .map(|value| sink.bind(value.clone()))
                    .collect::<Vec<_>>();
                Ok(format!(
                    "EXISTS (SELECT 1 FROM json_each({}) WHERE json_each.value IN ({}))",
                    expr,
                    params.join(", ")
                ))
            }
            Pred::GtCmp { path, op, value } => {
                let path_param = sink.bind(Value::Text(path.clone()));
                let value_param = sink.bind(value.clone());
                Ok(format!(
                    "(json_extract(sv.genotype, {path_param}) IS NULL \
                     OR json_extract(sv.genotype, {path_param}) {} {value_param})",
                    op.sql()
                ))
            }
            Pred::GtIn {
                path,
                gts,
                negated,
            } => {
                if gts.is_empty() {
                    return Err(RenderError::EmptyInList(path.clone()));
                }
                let path_param = sink.bind(Value::Text(path.clone()));
                let params = gts
                    .iter()
                    .map(|gt| sink.bind(Value::Text(gt.clone())))
                    .collect::<Vec<_>>();
                let keyword = if *negated { "NOT IN" } else { "IN" };
                Ok(format!(
                    "json_extract(sv.genotype, {}) {} ({})",
                    path_param,
                    keyword,
                    params.join(", ")
                ))
            }
            Pred::AlleleBalance {
                dp_path,
                ad_path,
                min_ab,
            } => {
                let dp = sink.bind(Value::Text(dp_path.clone()));
                let ad = sink.bind(Value::Text(ad_path.clone()));
                let ab = sink.bind(Value::Real(*min_ab));
                // The depth guard is conjoined into the window so that a zero
                // depth comes out as FALSE rather than NULL; the no-call fail
                // policy negates this term and NOT NULL is NULL again.
                Ok(format!(
                    "(json_extract(sv.genotype, {dp}) IS NULL \
                     OR json_extract(sv.genotype, {ad}) IS NULL \
                     OR (CAST(json_extract(sv.genotype, {dp}) AS REAL) != 0.0 \
                     AND CAST(json_extract(sv.genotype, {ad}) AS REAL) \
                     / CAST(json_extract(sv.genotype, {dp}) AS REAL) >= {ab} \
                     AND CAST(json_extract(sv.genotype, {ad}) AS REAL) \
                     / CAST(json_extract(sv.genotype, {dp}) AS REAL) <= 1.0 - {ab}))"
                ))
            }
        }
    }
}
