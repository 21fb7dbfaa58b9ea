use crate::models::{OwnerPreferences, Pet, PetPurpose};

/// Check whether `candidate` is an eligible match for `source`, ignoring distance
///
/// Rules run in order and the first failure rejects:
/// 1. both pets have an in-range location
/// 2. candidate is not the source itself
/// 3. species are equal (case-sensitive)
/// 4. purposes line up: the candidate declares `purpose_filter`, or, without a
///    filter, the pets share at least one purpose. Breeding pairs must differ
///    in gender.
///
/// Owner preferences are accepted for parity with the finder; no rule reads
/// them today since the radius is applied downstream.
#[inline]
pub fn is_compatible(
    source: &Pet,
    candidate: &Pet,
    purpose_filter: Option<PetPurpose>,
    _preferences: Option<&OwnerPreferences>,
) -> bool {
    if source.valid_location().is_none() || candidate.valid_location().is_none() {
        return false;
    }

    if candidate.id == source.id {
        return false;
    }

    if candidate.species != source.species {
        return false;
    }

    purposes_compatible(source, candidate, purpose_filter)
}

/// Purpose rule (rule 4) on its own
#[inline]
pub fn purposes_compatible(
    source: &Pet,
    candidate: &Pet,
    purpose_filter: Option<PetPurpose>,
) -> bool {
    let breeding_involved = match purpose_filter {
        Some(purpose) => {
            if !candidate.has_purpose(purpose) {
                return false;
            }
            purpose == PetPurpose::Breeding
        }
        None => {
            let shared = source.shared_purposes(candidate);
            if shared.is_empty() {
                return false;
            }
            shared.contains(&PetPurpose::Breeding)
        }
    };

    // Same-gender breeding pairs are never eligible
    !(breeding_involved && source.gender == candidate.gender)
}
