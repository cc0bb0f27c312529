//! Species distribution

use std::collections::HashMap;

use crate::models::{BatchRecord, SpeciesCount};

/// Chart palette; slice colours follow first-seen species order
pub const SPECIES_PALETTE: [&str; 8] = [
    "#10B981", "#F59E0B", "#3B82F6", "#8B5CF6", "#EF4444", "#06B6D4", "#A3E635", "#F472B6",
];

/// Colour for the n-th species slice, cycling through [`SPECIES_PALETTE`]
pub fn species_color(index: usize) -> &'static str {
    SPECIES_PALETTE[index % SPECIES_PALETTE.len()]
}

/// Count batches per species label.
///
/// Groups appear in the order their label is first seen in `records`.
/// Missing or empty labels fall into the `"Unknown"` group, which also
/// absorbs batches literally labelled `"Unknown"`.
pub fn group_by_species(records: &[BatchRecord]) -> Vec<SpeciesCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<SpeciesCount> = Vec::new();

    for record in records {
        let label = record.species_label();
        match positions.get(label) {
            Some(&idx) => groups[idx].count += 1,
            None => {
                positions.insert(label, groups.len());
                groups.push(SpeciesCount {
                    name: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    groups
}
