//! Identity resolution for incoming person records
//!
//! Decides, per candidate, whether it is a new person, a person already in
//! the set, or one side of a name collision. Collisions are only ever
//! resolved when an override table is in play; without one they are
//! reported and both records are kept.

use crate::error::CuratorError;
use lineage_domain::{normalize_name, DomainClassifier, Person, PersonId, PersonRecord, ValidationError};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Outcome for one candidate record
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Candidate is a new person; carries the converted record
    KeptNew(Person),

    /// Candidate's identifier is already present
    MergedIntoExisting {
        /// Identifier of the person to merge into
        id: PersonId,
    },

    /// Candidate lost a name collision
    RejectedDuplicate {
        /// Identifier that won
        winner: PersonId,
    },

    /// Candidate failed structural validation
    Invalid(ValidationError),
}

/// A normalized name shared by several distinct identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityConflict {
    /// Normalized name
    pub normalized_name: String,

    /// Identifiers involved, incumbents first
    pub ids: Vec<PersonId>,
}

/// Why a collision was decided the way it was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionReason {
    /// The override table named the winner
    Override,
    /// The winner had the strictly highest fame score
    HigherFame,
    /// Fame scores tied; the earliest present record was kept
    Tie,
}

/// Auditable record of one resolved collision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionDecision {
    /// Normalized name in collision
    pub normalized_name: String,

    /// Identifier of the candidate that triggered the collision
    pub candidate: PersonId,

    /// All identifiers considered, incumbents first
    pub contenders: Vec<PersonId>,

    /// Identifier kept
    pub winner: PersonId,

    /// Basis for the choice
    pub reason: DecisionReason,
}

/// One side of a name collision as seen by a [`WinnerPolicy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contender {
    /// Person identifier
    pub id: PersonId,

    /// Current fame score
    pub fame_score: u64,
}

impl Contender {
    /// Create a contender
    pub fn new(id: impl Into<PersonId>, fame_score: u64) -> Self {
        Self {
            id: id.into(),
            fame_score,
        }
    }
}

/// Picks the surviving identifier among persons sharing a normalized name
///
/// Contenders are given in order of presence: the earliest record first.
pub trait WinnerPolicy {
    /// Return the index of the winning contender and the reason
    fn choose(&self, normalized_name: &str, contenders: &[Contender]) -> (usize, DecisionReason);
}

/// Manually curated collision decisions: normalized name → identifier to keep
///
/// As a [`WinnerPolicy`], the table wins whenever it names one of the
/// contenders; otherwise the highest fame score wins and ties keep the
/// earliest record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: BTreeMap<String, PersonId>,
}

impl OverrideTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from raw entries, normalizing the names
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, CuratorError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table = Self::new();
        for (name, id) in entries {
            table.insert(name.as_ref(), id.as_ref())?;
        }
        Ok(table)
    }

    /// Add or replace an entry
    pub fn insert(&mut self, name: &str, id: &str) -> Result<(), CuratorError> {
        let key = normalize_name(name);
        let id = id.trim();
        if key.is_empty() || id.is_empty() {
            return Err(CuratorError::InvalidOverride(format!("'{}' → '{}'", name, id)));
        }
        self.entries.insert(key, PersonId::new(id));
        Ok(())
    }

    /// Identifier to keep for a normalized name
    pub fn winner_for(&self, normalized_name: &str) -> Option<&PersonId> {
        self.entries.get(normalized_name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WinnerPolicy for OverrideTable {
    fn choose(&self, normalized_name: &str, contenders: &[Contender]) -> (usize, DecisionReason) {
        if let Some(preferred) = self.winner_for(normalized_name) {
            if let Some(index) = contenders.iter().position(|c| &c.id == preferred) {
                return (index, DecisionReason::Override);
            }
            debug!(normalized_name, preferred = %preferred, "Override names no contender, falling back to fame");
        }

        let mut best = 0;
        for (index, contender) in contenders.iter().enumerate().skip(1) {
            if contender.fame_score > contenders[best].fame_score {
                best = index;
            }
        }

        let tied = contenders
            .iter()
            .enumerate()
            .any(|(index, c)| index != best && c.fame_score == contenders[best].fame_score);
        let reason = if tied { DecisionReason::Tie } else { DecisionReason::HigherFame };
        (best, reason)
    }
}

/// Everything the resolver decided for a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolverOutcome {
    /// One resolution per candidate, in input order
    pub resolutions: Vec<Resolution>,

    /// Name collisions observed, resolved or not
    pub conflicts: Vec<IdentityConflict>,

    /// Collisions that were decided
    pub decisions: Vec<ResolutionDecision>,

    /// Existing identifiers that lost a collision, in decision order
    pub pending_removals: Vec<PersonId>,
}

/// Resolves candidate records against the existing person set
pub struct IdentityResolver {
    policy: Option<Box<dyn WinnerPolicy>>,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("resolves_collisions", &self.resolves_collisions())
            .finish()
    }
}

impl IdentityResolver {
    /// Create a report-only resolver
    pub fn new() -> Self {
        Self { policy: None }
    }

    /// Resolve collisions using an override table with fame fallback
    pub fn with_overrides(self, table: OverrideTable) -> Self {
        self.with_policy(table)
    }

    /// Resolve collisions using a custom policy
    pub fn with_policy(mut self, policy: impl WinnerPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    /// Whether collisions are decided rather than only reported
    pub fn resolves_collisions(&self) -> bool {
        self.policy.is_some()
    }

    /// Resolve a batch of candidates against the existing set
    ///
    /// Candidates kept earlier in the batch take part in later lookups, so
    /// a batch containing the same identifier twice merges the second
    /// occurrence into the first.
    pub fn resolve_batch(
        &self,
        existing: &[Person],
        candidates: &[PersonRecord],
        classifier: &dyn DomainClassifier,
    ) -> ResolverOutcome {
        let mut roster = Roster::new(existing);
        let mut outcome = ResolverOutcome::default();

        for record in candidates {
            let resolution = self.resolve_one(&mut roster, record, classifier, &mut outcome);
            outcome.resolutions.push(resolution);
        }

        outcome
    }

    fn resolve_one(
        &self,
        roster: &mut Roster,
        record: &PersonRecord,
        classifier: &dyn DomainClassifier,
        outcome: &mut ResolverOutcome,
    ) -> Resolution {
        let id = match record.identity() {
            Ok((id, _)) => PersonId::new(id),
            Err(e) => return Resolution::Invalid(e),
        };

        if roster.fame.contains_key(&id) {
            roster.raise_fame(&id, record_fame(record));
            debug!(id = %id, "Candidate matches existing identifier");
            return Resolution::MergedIntoExisting { id };
        }

        let person = match record.clone().into_person(classifier) {
            Ok(person) => person,
            Err(e) => return Resolution::Invalid(e),
        };

        let key = person.normalized_name();
        let incumbents = roster.named(&key);
        if incumbents.is_empty() {
            roster.admit(&key, &person);
            return Resolution::KeptNew(person);
        }

        let mut contenders: Vec<Contender> = incumbents
            .iter()
            .map(|id| Contender::new(id.clone(), roster.fame[id]))
            .collect();
        contenders.push(Contender::new(person.id.clone(), person.fame_score));

        outcome.conflicts.push(IdentityConflict {
            normalized_name: key.clone(),
            ids: contenders.iter().map(|c| c.id.clone()).collect(),
        });

        let Some(policy) = &self.policy else {
            info!(
                normalized_name = %key,
                candidate = %person.id,
                existing = ?incumbents,
                "Name collision reported, keeping both records"
            );
            roster.admit(&key, &person);
            return Resolution::KeptNew(person);
        };

        let (winner_index, reason) = policy.choose(&key, &contenders);
        let winner = contenders[winner_index].id.clone();
        info!(
            normalized_name = %key,
            candidate = %person.id,
            existing = ?incumbents,
            winner = %winner,
            reason = ?reason,
            "Name collision resolved"
        );

        outcome.decisions.push(ResolutionDecision {
            normalized_name: key.clone(),
            candidate: person.id.clone(),
            contenders: contenders.iter().map(|c| c.id.clone()).collect(),
            winner: winner.clone(),
            reason,
        });

        let losers: Vec<PersonId> = incumbents.into_iter().filter(|id| *id != winner).collect();
        for loser in &losers {
            roster.retire(&key, loser);
        }
        outcome.pending_removals.extend(losers);

        if winner == person.id {
            roster.admit(&key, &person);
            Resolution::KeptNew(person)
        } else {
            Resolution::RejectedDuplicate { winner }
        }
    }
}

fn record_fame(record: &PersonRecord) -> u64 {
    record.fame_score.and_then(|f| u64::try_from(f).ok()).unwrap_or(0)
}

/// Evolving view of who is present during a batch
struct Roster {
    fame: HashMap<PersonId, u64>,
    by_name: HashMap<String, Vec<PersonId>>,
}

impl Roster {
    fn new(existing: &[Person]) -> Self {
        let mut roster = Self {
            fame: HashMap::with_capacity(existing.len()),
            by_name: HashMap::new(),
        };
        for person in existing {
            if roster.fame.contains_key(&person.id) {
                continue;
            }
            roster.admit(&person.normalized_name(), person);
        }
        roster
    }

    fn named(&self, key: &str) -> Vec<PersonId> {
        self.by_name.get(key).cloned().unwrap_or_default()
    }

    fn admit(&mut self, key: &str, person: &Person) {
        self.fame.insert(person.id.clone(), person.fame_score);
        self.by_name.entry(key.to_string()).or_default().push(person.id.clone());
    }

    fn raise_fame(&mut self, id: &PersonId, fame: u64) {
        if let Some(current) = self.fame.get_mut(id) {
            *current = (*current).max(fame);
        }
    }

    /// Losers stay addressable by identifier until the dedup pass removes them
    fn retire(&mut self, key: &str, id: &PersonId) {
        if let Some(ids) = self.by_name.get_mut(key) {
            ids.retain(|present| present != id);
        }
    }
}
