//! Lenient record types as delivered by sources and as read back for auditing

use crate::error::ValidationError;
use crate::person::{Person, PersonId};
use crate::traits::DomainClassifier;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A person record with every field optional
///
/// Sources (the knowledge-base adapter, hand-written supplementary lists,
/// bulk dump processors) all produce this shape. Unknown fields in the
/// incoming JSON are ignored. The same type is used to read the persisted
/// person set without enforcing invariants, so the integrity scan can see
/// records that a strict load would refuse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    /// External identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Birth year (astronomical)
    #[serde(default)]
    pub birth_year: Option<i64>,

    /// Death year; absent or null means living/unknown
    #[serde(default)]
    pub death_year: Option<i64>,

    /// Explicit domain tags
    #[serde(default)]
    pub domains: Option<Vec<String>>,

    /// Free-text occupation labels, classified into domain tags on merge
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub occupations: Vec<String>,

    /// Region code
    #[serde(default)]
    pub region: Option<String>,

    /// Fame score; signed so that negative input is detectable
    #[serde(default)]
    pub fame_score: Option<i64>,
}

impl PersonRecord {
    /// Create a minimal record with an identifier and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Builder-style birth year
    pub fn with_birth_year(mut self, year: i64) -> Self {
        self.birth_year = Some(year);
        self
    }

    /// Builder-style death year
    pub fn with_death_year(mut self, year: i64) -> Self {
        self.death_year = Some(year);
        self
    }

    /// Builder-style domain tag (appended)
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domains.get_or_insert_with(Vec::new).push(domain.into());
        self
    }

    /// Builder-style occupation label (appended)
    pub fn with_occupation(mut self, label: impl Into<String>) -> Self {
        self.occupations.push(label.into());
        self
    }

    /// Builder-style fame score
    pub fn with_fame(mut self, fame: i64) -> Self {
        self.fame_score = Some(fame);
        self
    }

    /// Builder-style region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Identifier and name, both trimmed and non-blank
    ///
    /// These two fields are the minimum needed to take part in identity
    /// resolution at all.
    pub fn identity(&self) -> Result<(&str, &str), ValidationError> {
        let id = required_text(&self.id, "id")?;
        let name = required_text(&self.name, "name")?;
        Ok((id, name))
    }

    /// Domain tags after merging explicit tags with classified occupations
    pub fn resolved_domains(&self, classifier: &dyn DomainClassifier) -> BTreeSet<String> {
        let explicit = self
            .domains
            .iter()
            .flatten()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty());

        let classified = self
            .occupations
            .iter()
            .flat_map(|label| classifier.classify(label));

        explicit.chain(classified).collect()
    }

    /// Convert into a validated [`Person`]
    ///
    /// Missing fame defaults to zero. Fails when the identifier, name or
    /// birth year is missing, when no domain tag can be derived, when the
    /// fame score is negative or when a year does not fit `i32`.
    pub fn into_person(self, classifier: &dyn DomainClassifier) -> Result<Person, ValidationError> {
        let (id, name) = self.identity()?;
        let birth_year = year(self.birth_year.ok_or(ValidationError::MissingField("birthYear"))?, "birthYear")?;
        let death_year = self.death_year.map(|y| year(y, "deathYear")).transpose()?;

        let domains = self.resolved_domains(classifier);
        if domains.is_empty() {
            return Err(ValidationError::EmptyDomains);
        }

        let fame = self.fame_score.unwrap_or(0);
        let fame_score = u64::try_from(fame).map_err(|_| ValidationError::NegativeFame(fame))?;

        let region = self
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Ok(Person {
            id: PersonId::new(id),
            name: name.to_string(),
            birth_year,
            death_year,
            domains,
            region,
            fame_score,
        })
    }
}

impl From<&Person> for PersonRecord {
    fn from(person: &Person) -> Self {
        Self {
            id: Some(person.id.to_string()),
            name: Some(person.name.clone()),
            birth_year: Some(i64::from(person.birth_year)),
            death_year: person.death_year.map(i64::from),
            domains: Some(person.domains.iter().cloned().collect()),
            occupations: Vec::new(),
            region: person.region.clone(),
            fame_score: i64::try_from(person.fame_score).ok(),
        }
    }
}

fn required_text<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, ValidationError> {
    let value = value.as_deref().ok_or(ValidationError::MissingField(field))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed)
}

fn year(value: i64, field: &'static str) -> Result<i32, ValidationError> {
    i32::try_from(value).map_err(|_| ValidationError::YearOutOfRange { field, value })
}

/// A stored edge with every field optional, for auditing persisted graphs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Target identifier (or legacy display name)
    #[serde(default)]
    pub target: Option<String>,

    /// Relationship tag
    #[serde(default)]
    pub nature: Option<String>,

    /// Confidence in (0, 1]
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Persisted relation graph read without enforcing invariants
pub type RawGraph = BTreeMap<String, Vec<EdgeRecord>>;

/// A relationship proposed by a curation source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEdge {
    /// Source person identifier
    pub source: String,

    /// Target identifier, or a display name from legacy producers
    pub target: String,

    /// Relationship tag (teacher, influenced, contemporary, ...)
    pub nature: String,

    /// Confidence in (0, 1]
    pub confidence: f64,
}

impl CandidateEdge {
    /// Create a candidate edge
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        nature: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            nature: nature.into(),
            confidence,
        }
    }
}

/// A set of persons sharing one discrete joint event
///
/// Used to generate complete pairwise co-occurrence edges, for example all
/// laureates of one prize in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HonorGroup {
    /// Honor or event name
    pub honor: String,

    /// Year of the shared event
    #[serde(default)]
    pub year: Option<i32>,

    /// Member references (identifiers or display names)
    pub members: Vec<String>,
}
