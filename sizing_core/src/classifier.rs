//! # Member Position Classifier
//!
//! Tags legs sitting at module extremities and finds the legs whose bolted
//! splices must be designed:
//!
//! - every module base carries a splice to the module below,
//! - the structure top carries the top attachment.
//!
//! For each such group the most tensioned and the most compressed legs are
//! connection-required; their geometric mirrors on the opposite face join
//! the set.

use std::collections::{BTreeMap, BTreeSet};

use crate::hypothesis::{force_envelope, ForceTable};
use crate::member::{Member, MemberId};

/// Extremity where a module's legs are spliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extremity {
    Base,
    Top,
}

impl std::fmt::Display for Extremity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Extremity::Base => write!(f, "base"),
            Extremity::Top => write!(f, "top"),
        }
    }
}

/// Legs grouped by module, in id order
fn legs_by_module(members: &BTreeMap<MemberId, Member>) -> BTreeMap<u32, Vec<MemberId>> {
    let mut groups: BTreeMap<u32, Vec<MemberId>> = BTreeMap::new();
    for member in members.values().filter(|m| m.is_leg()) {
        if let Some(module) = member.module() {
            groups.entry(module).or_default().push(member.id);
        }
    }
    groups
}

/// Set module-base, module-top and structure-top flags on every leg.
///
/// Modules are numbered from the top, so the structure top lies in the
/// lowest module index.
pub fn mark_extremities(members: &mut BTreeMap<MemberId, Member>, tolerance: f64) {
    let groups = legs_by_module(members);

    for ids in groups.values() {
        let bottom = ids
            .iter()
            .map(|id| members[id].y_min_cm)
            .fold(f64::INFINITY, f64::min);
        let top = ids
            .iter()
            .map(|id| members[id].y_max_cm)
            .fold(f64::NEG_INFINITY, f64::max);

        for id in ids {
            if let Some(member) = members.get_mut(id) {
                member.position.module_base = (member.y_min_cm - bottom).abs() < tolerance;
                member.position.module_top = (member.y_max_cm - top).abs() < tolerance;
                member.position.structure_top = false;
            }
        }
    }

    if let Some((_, ids)) = groups.iter().next() {
        let summit = ids
            .iter()
            .map(|id| members[id].y_max_cm)
            .fold(f64::NEG_INFINITY, f64::max);
        for id in ids {
            if let Some(member) = members.get_mut(id) {
                member.position.structure_top = (member.y_max_cm - summit).abs() < tolerance;
            }
        }
    }
}

/// Legs whose connection must be verified, before mirror expansion.
///
/// Groups are module bases and the structure top. In each group the leg
/// with the largest peak tension and the leg with the largest peak
/// compression are selected (first in id order on ties). Legs with no force
/// in any hypothesis are ignored.
pub fn connection_required(members: &BTreeMap<MemberId, Member>, forces: &ForceTable) -> BTreeSet<MemberId> {
    let mut groups: BTreeMap<(u32, Extremity), Vec<MemberId>> = BTreeMap::new();
    for member in members.values().filter(|m| m.is_leg()) {
        let Some(module) = member.module() else {
            continue;
        };
        if member.position.module_base {
            groups.entry((module, Extremity::Base)).or_default().push(member.id);
        }
        if member.position.structure_top {
            groups.entry((module, Extremity::Top)).or_default().push(member.id);
        }
    }

    let mut required = BTreeSet::new();
    for ids in groups.values() {
        let mut most_tensioned: Option<(MemberId, f64)> = None;
        let mut most_compressed: Option<(MemberId, f64)> = None;

        for id in ids {
            let Some((max, min)) = force_envelope(forces, id) else {
                continue;
            };
            if most_tensioned.map_or(true, |(_, best)| max > best) {
                most_tensioned = Some((*id, max));
            }
            if most_compressed.map_or(true, |(_, best)| min < best) {
                most_compressed = Some((*id, min));
            }
        }

        required.extend(most_tensioned.map(|(id, _)| id));
        required.extend(most_compressed.map(|(id, _)| id));
    }
    required
}

/// Mirror partners of one leg.
///
/// Same module, mirror class (opposite side, or any leg when the side is
/// unknown) and a shared base or top level within `tolerance`.
pub fn mirrors_of(members: &BTreeMap<MemberId, Member>, id: &MemberId, tolerance: f64) -> Vec<MemberId> {
    let Some(reference) = members.get(id) else {
        return Vec::new();
    };
    if !reference.is_leg() {
        return Vec::new();
    }
    let module = reference.module();

    members
        .values()
        .filter(|c| c.id != reference.id)
        .filter(|c| reference.class.mirrors(c.class))
        .filter(|c| c.module() == module)
        .filter(|c| {
            (c.y_max_cm - reference.y_max_cm).abs() < tolerance
                || (c.y_min_cm - reference.y_min_cm).abs() < tolerance
        })
        .map(|c| c.id)
        .collect()
}

/// Expand a set of leg ids with their mirror partners.
pub fn expand_symmetric(
    members: &BTreeMap<MemberId, Member>,
    ids: &BTreeSet<MemberId>,
    tolerance: f64,
) -> BTreeSet<MemberId> {
    let mut expanded = ids.clone();
    for id in ids {
        expanded.extend(mirrors_of(members, id, tolerance));
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::{BarClass, PositionFlags};
    use crate::test_support::{two_module_forces, two_module_tower};

    fn id(n: u32) -> MemberId {
        MemberId::new(n)
    }

    #[test]
    fn test_mark_extremities() {
        let mut members = two_module_tower();
        mark_extremities(&mut members, 1e-3);

        // module 2 (bottom): legs 1, 2 span 0..300
        let leg = &members[&id(1)].position;
        assert!(leg.module_base && leg.module_top && !leg.structure_top);

        // module 1 (top): legs 3, 4 span 300..600
        let leg = &members[&id(4)].position;
        assert!(leg.module_base && leg.module_top && leg.structure_top);

        // bracing untouched
        assert_eq!(members[&id(5)].position, PositionFlags::default());
    }

    #[test]
    fn test_split_legs_only_flag_their_end() {
        let mut members = two_module_tower();
        // split leg 1 into two segments within module 2
        let mut lower = members.remove(&id(1)).unwrap();
        let mut upper = lower.clone();
        lower.id = MemberId::with_suffix(1, 'a');
        lower.y_max_cm = 150.0;
        upper.id = MemberId::with_suffix(1, 'b');
        upper.y_min_cm = 150.0;
        members.insert(lower.id, lower);
        members.insert(upper.id, upper);

        mark_extremities(&mut members, 1e-3);
        let a = members[&MemberId::with_suffix(1, 'a')].position;
        let b = members[&MemberId::with_suffix(1, 'b')].position;
        assert!(a.module_base && !a.module_top);
        assert!(!b.module_base && b.module_top);
    }

    #[test]
    fn test_connection_required_picks_extremes() {
        let mut members = two_module_tower();
        mark_extremities(&mut members, 1e-3);
        let forces = two_module_forces();

        let required = connection_required(&members, &forces);
        // leg 2 carries ±9000 against ±8000 on leg 1; leg 4 ±3500 against ±3000
        assert_eq!(required, [id(2), id(4)].into_iter().collect());

        let expanded = expand_symmetric(&members, &required, 1e-3);
        let all_legs: BTreeSet<MemberId> = [1, 2, 3, 4].into_iter().map(id).collect();
        assert_eq!(expanded, all_legs);
    }

    #[test]
    fn test_tie_keeps_first_id() {
        let mut members = two_module_tower();
        mark_extremities(&mut members, 1e-3);
        let mut forces = ForceTable::new();
        forces.insert(
            "h".to_string(),
            [(id(1), 100.0), (id(2), 100.0)].into_iter().collect(),
        );
        let required = connection_required(&members, &forces);
        // 1 wins tension; 1 also wins "compression" (min of +100 ties)
        assert_eq!(required, [id(1)].into_iter().collect());
    }

    #[test]
    fn test_mirrors() {
        let mut members = two_module_tower();
        assert_eq!(mirrors_of(&members, &id(1), 1e-3), vec![id(2)]);
        assert_eq!(mirrors_of(&members, &id(3), 1e-3), vec![id(4)]);
        assert!(mirrors_of(&members, &id(5), 1e-3).is_empty());
        assert!(mirrors_of(&members, &id(99), 1e-3).is_empty());

        // unsided legs accept any leg of the module
        members.get_mut(&id(1)).unwrap().class = BarClass::Leg;
        assert_eq!(mirrors_of(&members, &id(1), 1e-3), vec![id(2)]);

        // different module never mirrors
        members.get_mut(&id(2)).unwrap().modules = vec![3];
        assert!(mirrors_of(&members, &id(1), 1e-3).is_empty());
    }
}
