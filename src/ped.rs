//! Pedigree representation as stored with each case.
//!
//! The `case_info.pedigree` column holds a JSON array of individuals.  The
//! code here parses that representation and provides lookup of parent links
//! for the recessive query assembly.

/// Sex of an individual from the PED file.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    Default,
)]
pub enum Sex {
    /// Unknown sex.
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
    /// Male.
    #[serde(rename = "male")]
    Male,
    /// Female.
    #[serde(rename = "female")]
    Female,
}

/// Disease status of an individual from the PED file.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    Default,
)]
pub enum Disease {
    /// Unknown disease status.
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
    /// Unaffected.
    #[serde(rename = "unaffected")]
    Unaffected,
    /// Affected.
    #[serde(rename = "affected")]
    Affected,
}

/// One individual of a pedigree.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct Individual {
    /// Name of the individual, referenced by the genotype settings.
    pub name: String,
    /// Name of the father, `"0"` or empty for founders.
    #[serde(default)]
    pub father: Option<String>,
    /// Name of the mother, `"0"` or empty for founders.
    #[serde(default)]
    pub mother: Option<String>,
    /// Sex of the individual.
    #[serde(default)]
    pub sex: Sex,
    /// Disease status of the individual.
    #[serde(default)]
    pub disease: Disease,
}

impl Individual {
    /// Name of the father with PED placeholder values mapped to `None`.
    pub fn father(&self) -> Option<&str> {
        self.father
            .as_deref()
            .filter(|name| !name.is_empty() && *name != "0")
    }

    /// Name of the mother with PED placeholder values mapped to `None`.
    pub fn mother(&self) -> Option<&str> {
        self.mother
            .as_deref()
            .filter(|name| !name.is_empty() && *name != "0")
    }
}

/// Error type for pedigree parsing.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Problem deserializing the JSON representation.
    #[error("could not parse pedigree JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The same individual name occurred twice.
    #[error("duplicate individual in pedigree: {0}")]
    DuplicateIndividual(String),
}

/// A pedigree with individuals indexed by name.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct Pedigree {
    /// Mapping from individual name to individual.
    pub individuals: indexmap::IndexMap<String, Individual>,
}

impl Pedigree {
    /// Parse a pedigree from the JSON stored in `case_info.pedigree`.
    ///
    /// # Errors
    ///
    /// * `Error::Json` if the JSON cannot be deserialized.
    /// * `Error::DuplicateIndividual` if an individual name occurs twice.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let individuals: Vec<Individual> = serde_json::from_str(json)?;
        let mut result = indexmap::IndexMap::new();
        for individual in individuals {
            if result.contains_key(&individual.name) {
                return Err(Error::DuplicateIndividual(individual.name));
            }
            result.insert(individual.name.clone(), individual);
        }
        Ok(Self {
            individuals: result,
        })
    }

    /// Look up an individual by name.
    pub fn individual(&self, name: &str) -> Option<&Individual> {
        self.individuals.get(name)
    }
}
