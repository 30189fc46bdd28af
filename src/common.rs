//! Common functionality.

use indexmap::IndexMap;

/// Definition of canonical chromosome names.
pub const CHROMS: &[&str] = &[
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17",
    "18", "19", "20", "21", "22", "X", "Y", "MT",
];

/// Build mapping of chromosome names to chromosome counts.
pub fn build_chrom_map() -> IndexMap<String, usize> {
    let mut result = IndexMap::new();
    for (i, &chrom_name) in CHROMS.iter().enumerate() {
        result.insert(chrom_name.to_owned(), i);
        result.insert(format!("chr{chrom_name}"), i);
    }
    result.insert("x".to_owned(), 22);
    result.insert("y".to_owned(), 23);
    result.insert("chrx".to_owned(), 22);
    result.insert("chry".to_owned(), 23);
    result.insert("m".to_owned(), 24);
    result.insert("mt".to_owned(), 24);
    result.insert("chrm".to_owned(), 24);
    result.insert("chrmt".to_owned(), 24);
    result.insert("M".to_owned(), 24);
    result.insert("chrM".to_owned(), 24);
    result
}

/// Genotype strings considered reference calls.
///
/// Includes the phased spellings and the haploid form, assuming properly
/// ingested variants with a single alternate allele.
pub static GT_REF: &[&str] = &["0", "0/0", "0|0"];

/// Genotype strings considered heterozygous calls.
pub static GT_HET: &[&str] = &["0/1", "0|1", "1/0", "1|0"];

/// Genotype strings considered homozygous alternative calls.
pub static GT_HOM: &[&str] = &["1", "1/1", "1|1"];

/// Genotype strings considered variant calls (het. or hom. alternative).
pub static GT_VARIANT: &[&str] = &["0/1", "0|1", "1/0", "1|0", "1", "1/1", "1|1"];

/// Genotype strings considered non-homozygous calls (reference or het.).
pub static GT_NON_HOM: &[&str] = &["0", "0/0", "0|0", "0/1", "0|1", "1/0", "1|0"];
