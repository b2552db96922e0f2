//! Module extremity connections.
//!
//! All legs meeting at a module's base (or top) share one bolted splice.
//! The splice is designed for the most tensioned and most compressed legs
//! of the group, the stronger of the two designs governs, and bolts are
//! added until it carries both.

use std::collections::BTreeMap;

use crate::calculations::connection::{design_connection, design_connection_from};
use crate::calculations::ConnectionDesign;
use crate::classifier::{mirrors_of, Extremity};
use crate::errors::{SizingError, SizingResult};
use crate::hypothesis::{force_envelope, peak_force};
use crate::materials::Profile;
use crate::member::{BarKind, MemberId};

use super::SizingRun;

/// Bolts added per escalation step for legs (counts stay even)
const LEG_BOLT_STEP: u32 = 2;

/// Result of designing every extremity group.
#[derive(Debug, Clone, Default)]
pub(crate) struct EndConnections {
    pub designs: BTreeMap<MemberId, ConnectionDesign>,
    /// Groups without any feasible design: (module, extremity, members)
    pub infeasible: Vec<(u32, Extremity, Vec<MemberId>)>,
}

impl<'a> SizingRun<'a> {
    /// Legs grouped by module extremity
    fn extremity_groups(&self) -> BTreeMap<(u32, Extremity), Vec<MemberId>> {
        let mut groups: BTreeMap<(u32, Extremity), Vec<MemberId>> = BTreeMap::new();
        for member in self.members.values().filter(|m| m.is_leg()) {
            let Some(module) = member.module() else {
                continue;
            };
            if member.position.module_base {
                groups.entry((module, Extremity::Base)).or_default().push(member.id);
            }
            if member.position.module_top || member.position.structure_top {
                groups.entry((module, Extremity::Top)).or_default().push(member.id);
            }
        }
        groups
    }

    /// Profile currently chosen for a member, if any
    pub(crate) fn current_profile(&self, id: &MemberId) -> SizingResult<Option<&'a Profile>> {
        match self.results.get(id) {
            Some(result) if result.has_profile() => Ok(Some(self.profiles.lookup(&result.profile)?)),
            _ => Ok(None),
        }
    }

    /// Design the governing connection of every extremity group.
    pub(crate) fn design_end_connections(&self) -> SizingResult<EndConnections> {
        let mut out = EndConnections::default();
        let bolt_limit = self.config.bolt_limits.get(BarKind::Leg);

        for ((module, extremity), ids) in self.extremity_groups() {
            let mut most_tensioned: Option<(MemberId, f64)> = None;
            let mut most_compressed: Option<(MemberId, f64)> = None;
            for id in &ids {
                let Some((max, min)) = force_envelope(&self.forces, id) else {
                    continue;
                };
                if most_tensioned.map_or(true, |(_, best)| max > best) {
                    most_tensioned = Some((*id, max));
                }
                if most_compressed.map_or(true, |(_, best)| min < best) {
                    most_compressed = Some((*id, min));
                }
            }

            let mut critical: Vec<MemberId> = Vec::new();
            for (id, _) in most_tensioned.into_iter().chain(most_compressed) {
                if !critical.contains(&id) {
                    critical.push(id);
                }
            }

            // Candidate designs, each on the critical leg's own profile
            let mut governing: Option<ConnectionDesign> = None;
            for id in &critical {
                let Some(profile) = self.current_profile(id)? else {
                    continue;
                };
                let force = peak_force(&self.forces, id).unwrap_or(0.0);
                let design = design_connection(self.config, self.materials, profile, BarKind::Leg, force)?;
                let stronger = governing.as_ref().map_or(true, |g| {
                    (design.shear_capacity_kgf, design.bearing_capacity_kgf)
                        > (g.shear_capacity_kgf, g.bearing_capacity_kgf)
                });
                if stronger {
                    governing = Some(design);
                }
            }

            let Some(mut design) = governing else {
                continue;
            };

            // Escalate until the design carries every critical leg
            for id in &critical {
                let Some(profile) = self.current_profile(id)? else {
                    continue;
                };
                let force = peak_force(&self.forces, id).unwrap_or(0.0);
                while !design.carries(force) {
                    let Some(bolts) = design.bolt_count else {
                        break;
                    };
                    let next = bolts + LEG_BOLT_STEP;
                    if next > bolt_limit {
                        break;
                    }
                    design = design_connection_from(self.config, self.materials, profile, BarKind::Leg, force, next)?;
                }
            }

            if design.bolt_count.is_none() {
                tracing::warn!(module, %extremity, members = ?ids, "no viable end connection");
                out.infeasible.push((module, extremity, ids));
                continue;
            }

            tracing::debug!(
                module,
                %extremity,
                bolts = ?design.bolt_count,
                utilization = design.utilization,
                "end connection designed"
            );

            for id in &ids {
                out.designs.insert(*id, design.clone());
            }
            for id in &ids {
                for mirror in mirrors_of(&self.members, id, self.config.level_tolerance_cm) {
                    out.designs.entry(mirror).or_insert_with(|| design.clone());
                }
            }
        }

        Ok(out)
    }

    /// Design end connections and write them into the member results.
    ///
    /// Each connected member's critical cases receive the group design with
    /// bearing recomputed for the member's own flange.
    pub(crate) fn apply_end_connections(&mut self) -> SizingResult<()> {
        let end = self.design_end_connections()?;
        if let Some((module, extremity, members)) = end.infeasible.into_iter().next() {
            return Err(SizingError::GroupConnectionInfeasible {
                module,
                position: extremity.to_string(),
                members,
            });
        }

        for (id, design) in &end.designs {
            let Some(profile) = self.current_profile(id)? else {
                continue;
            };
            let fu = self.materials.for_profile(profile)?.fu_kgf_cm2;
            if let Some(result) = self.results.get_mut(id) {
                for case in result.cases.values_mut() {
                    case.connection = Some(design.rebased_to(profile.thickness_cm, fu, case.force_kgf));
                }
                result.refresh_worst_connection();
            }
        }

        self.connections = end.designs;
        Ok(())
    }
}
