use std::collections::HashSet;

use crate::models::Match;

/// Collect the pet ids that must not appear in a fresh candidate pool for `pet_id`
///
/// Every Pending or Accepted match referencing `pet_id` contributes both of
/// its sides, so the source itself lands in the set whenever it has an
/// unresolved match. Records not referencing `pet_id` are ignored.
pub fn build_exclusion_set(pet_id: &str, matches: &[Match]) -> HashSet<String> {
    matches
        .iter()
        .filter(|m| m.status.is_active() && m.involves(pet_id))
        .flat_map(|m| [m.initiator_pet_id.clone(), m.target_pet_id.clone()])
        .collect()
}
