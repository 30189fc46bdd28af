//! Code implementing the queries for small variants.

pub mod output;
pub mod schema;
pub mod sql;

use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::common::build_chrom_map;
use crate::ped::Pedigree;
use output::ResultRecord;
use schema::{CaseQuery, RecessiveMode};
use sql::ParamSink;

/// Error type for query execution.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No case with the given UUID.
    #[error("case not found: {0}")]
    CaseNotFound(Uuid),
    /// Problem with the stored pedigree.
    #[error("problem with stored pedigree: {0}")]
    Pedigree(#[from] crate::ped::Error),
    /// Problem assembling the query.
    #[error("problem assembling query: {0}")]
    Build(#[from] sql::BuildError),
    /// Problem executing SQL.
    #[error("problem executing query: {0}")]
    Db(#[from] rusqlite::Error),
    /// Problem decoding a result row.
    #[error("problem decoding result row: {0}")]
    Decode(#[from] output::Error),
}

/// Stored case with its parsed pedigree.
struct CaseRecord {
    /// Name of the case.
    name: String,
    /// The case's pedigree.
    pedigree: Pedigree,
}

/// Load the case record for the given UUID.
fn fetch_case(conn: &rusqlite::Connection, case_uuid: Uuid) -> Result<CaseRecord, Error> {
    let row = conn
        .query_row(
            "SELECT name, pedigree FROM case_info WHERE sodar_uuid = :sodar_uuid",
            rusqlite::named_params! { ":sodar_uuid": case_uuid.to_string() },
            |row| {
                Ok((
                    row.get::<_, String>("name")?,
                    row.get::<_, String>("pedigree")?,
                ))
            },
        )
        .optional()?;
    let (name, pedigree_json) = row.ok_or(Error::CaseNotFound(case_uuid))?;
    let pedigree = Pedigree::from_json_str(&pedigree_json)?;
    Ok(CaseRecord { name, pedigree })
}

/// Assemble the SQL statement for the query, dispatching on the recessive
/// mode.
fn assemble(
    query: &CaseQuery,
    pedigree: &Pedigree,
    case_uuid: Uuid,
) -> Result<(String, ParamSink), sql::BuildError> {
    match query.recessive_mode {
        RecessiveMode::Disabled => sql::simple::build(query, case_uuid),
        RecessiveMode::CompoundHeterozygous
        | RecessiveMode::Homozygous
        | RecessiveMode::Any => sql::recessive::build(query, pedigree, case_uuid),
    }
}

/// Run the query for the given case and return the decoded rows.
///
/// The connection only needs read access; the query issues a single SELECT
/// and holds no state between calls.
///
/// # Errors
///
/// * `Error::CaseNotFound` if there is no case with `case_uuid`.
/// * `Error::Pedigree` if the stored pedigree does not parse.
/// * `Error::Build` on construction errors such as recessive marker misuse.
/// * `Error::Db` / `Error::Decode` on execution and row decoding problems.
pub fn run_query(
    conn: &rusqlite::Connection,
    case_uuid: Uuid,
    query: &CaseQuery,
) -> Result<Vec<ResultRecord>, Error> {
    let case = fetch_case(conn, case_uuid)?;
    let (sql, params) = assemble(query, &case.pedigree, case_uuid)?;
    tracing::debug!(
        case = %case.name,
        sql_len = sql.len(),
        n_params = params.len(),
        "running query"
    );

    let chrom_map = build_chrom_map();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_and_then(params.as_named().as_slice(), |row| {
            ResultRecord::from_row(case_uuid, row, &chrom_map)
        })?
        .collect::<Result<Vec<_>, output::Error>>()?;
    tracing::debug!(n_rows = rows.len(), "query done");

    Ok(rows)
}

/// Run the query for the given case and return only the number of matching
/// rows.
///
/// # Errors
///
/// As for [`run_query`].
pub fn run_count(
    conn: &rusqlite::Connection,
    case_uuid: Uuid,
    query: &CaseQuery,
) -> Result<u64, Error> {
    let case = fetch_case(conn, case_uuid)?;
    let (sql, params) = assemble(query, &case.pedigree, case_uuid)?;
    let count_sql = format!("SELECT COUNT(*) FROM ({sql})");
    tracing::debug!(
        case = %case.name,
        sql_len = count_sql.len(),
        n_params = params.len(),
        "running count query"
    );

    let count = conn.query_row(&count_sql, params.as_named().as_slice(), |row| {
        row.get::<_, u64>(0)
    })?;

    Ok(count)
}
