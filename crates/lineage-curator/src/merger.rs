//! Person store merger
//!
//! Folds a batch of candidate records into the canonical person set. The
//! first writer wins for every field except domains (union) and fame score
//! (maximum).

use crate::identity::{IdentityConflict, IdentityResolver, Resolution, ResolutionDecision};
use lineage_domain::{DomainClassifier, Person, PersonId, PersonRecord};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Counters for one merge run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// New persons appended
    pub added: usize,

    /// Existing persons whose domains or fame changed
    pub updated_existing: usize,

    /// Candidates matching an existing person without changing it
    pub unchanged: usize,

    /// Candidates that lost a name collision
    pub rejected_duplicate_name: usize,

    /// Candidates failing structural validation
    pub rejected_invalid: usize,
}

impl MergeStats {
    /// Total candidates processed
    pub fn total(&self) -> usize {
        self.added
            + self.updated_existing
            + self.unchanged
            + self.rejected_duplicate_name
            + self.rejected_invalid
    }

    /// Whether the run changed the person set
    pub fn changed(&self) -> bool {
        self.added > 0 || self.updated_existing > 0
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Merge Statistics:\n\
             - Candidates: {}\n\
             - Added: {}\n\
             - Updated existing: {}\n\
             - Unchanged: {}\n\
             - Rejected (duplicate name): {}\n\
             - Rejected (invalid): {}",
            self.total(),
            self.added,
            self.updated_existing,
            self.unchanged,
            self.rejected_duplicate_name,
            self.rejected_invalid,
        )
    }
}

/// A candidate that did not make it into the set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Position of the candidate in the batch
    pub index: usize,

    /// Candidate identifier, when it had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Why it was rejected
    pub reason: String,
}

/// Result of a merge run
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// The new person set, existing persons first in their prior order
    pub persons: Vec<Person>,

    /// Counters
    pub stats: MergeStats,

    /// Rejected candidates with reasons
    pub rejections: Vec<Rejection>,

    /// Name collisions observed
    pub conflicts: Vec<IdentityConflict>,

    /// Collisions that were decided
    pub decisions: Vec<ResolutionDecision>,

    /// Existing identifiers that lost a collision; applied by the dedup pass
    pub pending_removals: Vec<PersonId>,
}

/// Merge a batch of candidates into the existing person set
///
/// Re-merging the same batch is a no-op: `added` and `updated_existing`
/// are both zero the second time.
pub fn merge(
    existing: Vec<Person>,
    candidates: &[PersonRecord],
    resolver: &IdentityResolver,
    classifier: &dyn DomainClassifier,
) -> MergeOutcome {
    let resolved = resolver.resolve_batch(&existing, candidates, classifier);

    let mut persons = existing;
    let mut positions: HashMap<PersonId, usize> = HashMap::with_capacity(persons.len());
    for (position, person) in persons.iter().enumerate() {
        positions.entry(person.id.clone()).or_insert(position);
    }

    let mut stats = MergeStats::default();
    let mut rejections = Vec::new();

    for (index, (record, resolution)) in candidates.iter().zip(resolved.resolutions).enumerate() {
        match resolution {
            Resolution::KeptNew(person) => {
                if !person.has_plausible_lifespan() {
                    warn!(
                        id = %person.id,
                        birth = person.birth_year,
                        death = ?person.death_year,
                        "Accepting record with implausible dates"
                    );
                }
                debug!(id = %person.id, name = %person.name, "Adding person");
                positions.insert(person.id.clone(), persons.len());
                persons.push(person);
                stats.added += 1;
            }
            Resolution::MergedIntoExisting { id } => {
                let Some(&position) = positions.get(&id) else {
                    // The resolver only reports identifiers it has seen
                    continue;
                };
                if absorb(&mut persons[position], record, classifier) {
                    debug!(id = %id, "Updated existing person");
                    stats.updated_existing += 1;
                } else {
                    stats.unchanged += 1;
                }
            }
            Resolution::RejectedDuplicate { winner } => {
                stats.rejected_duplicate_name += 1;
                rejections.push(Rejection {
                    index,
                    id: record.id.clone(),
                    reason: format!("name collision lost to {}", winner),
                });
            }
            Resolution::Invalid(error) => {
                warn!(index, id = ?record.id, error = %error, "Rejecting invalid record");
                stats.rejected_invalid += 1;
                rejections.push(Rejection {
                    index,
                    id: record.id.clone(),
                    reason: error.to_string(),
                });
            }
        }
    }

    info!(
        added = stats.added,
        updated = stats.updated_existing,
        unchanged = stats.unchanged,
        rejected_duplicate = stats.rejected_duplicate_name,
        rejected_invalid = stats.rejected_invalid,
        conflicts = resolved.conflicts.len(),
        "Merge complete"
    );

    MergeOutcome {
        persons,
        stats,
        rejections,
        conflicts: resolved.conflicts,
        decisions: resolved.decisions,
        pending_removals: resolved.pending_removals,
    }
}

/// Fold a candidate into an existing person, returning whether it changed
fn absorb(person: &mut Person, record: &PersonRecord, classifier: &dyn DomainClassifier) -> bool {
    let before = person.domains.len();
    person.domains.extend(record.resolved_domains(classifier));
    let mut changed = person.domains.len() != before;

    if let Some(fame) = record.fame_score.and_then(|f| u64::try_from(f).ok()) {
        if fame > person.fame_score {
            person.fame_score = fame;
            changed = true;
        }
    }

    changed
}
