//! Leg reinforcement.
//!
//! A connection-required leg whose splice cannot carry its governing force
//! steps up the leg catalog (by area) until both the bolted connection and
//! the combined axial/bending check pass. Modules are re-equalized after
//! every cycle, which can move other legs, so the loop repeats until no
//! leg fails or the cycle cap is reached.

use std::collections::BTreeSet;

use crate::calculations::bending::{axial_bending_utilization, MemberGeometry};
use crate::calculations::connection::design_connection;
use crate::calculations::ConnectionDesign;
use crate::errors::{SizingError, SizingResult};
use crate::materials::steel::sort_by_area;
use crate::materials::Profile;
use crate::member::{BarKind, Member, MemberId};

use super::SizingRun;

impl<'a> SizingRun<'a> {
    /// Reinforce connection-required legs.
    ///
    /// Returns the legs whose profile the loop changed. A leg that keeps its
    /// profile was already verified on both critical cases when it was sized,
    /// and every module is re-equalized after each cycle, so only the returned
    /// legs need re-verification.
    pub(crate) fn reinforce_legs(&mut self) -> SizingResult<BTreeSet<MemberId>> {
        let mut catalog = self
            .profiles
            .candidates(BarKind::Leg, self.config.hole_diameter(BarKind::Leg));
        sort_by_area(&mut catalog);

        let max_cycles = self.config.max_reinforcement_cycles;
        let required: Vec<MemberId> = self.required.iter().copied().collect();
        let mut touched = BTreeSet::new();
        let mut failures: Vec<MemberId> = Vec::new();

        for cycle in 1..=max_cycles {
            failures.clear();

            for id in &required {
                let Some(result) = self.results.get(id) else {
                    continue;
                };
                if !result.has_profile() {
                    continue;
                }
                let Some(force) = result.governing_case().map(|c| c.force_kgf) else {
                    continue;
                };
                let current = result.profile.clone();
                let member = self.members[id].clone();

                match self.reinforced_profile(&member, &catalog, &current, force)? {
                    Some((profile, connection)) => {
                        if profile.name != current {
                            tracing::info!(
                                cycle,
                                member = %id,
                                from = %current,
                                to = %profile.name,
                                "leg reinforced"
                            );
                            touched.insert(*id);
                        }
                        self.set_profile(id, &profile.name);
                        if let Some(result) = self.results.get_mut(id) {
                            if let Some(case) = result.governing_case_mut() {
                                case.profile = profile.name.clone();
                                case.connection = Some(connection);
                            }
                            result.refresh_worst_connection();
                        }
                    }
                    None => {
                        tracing::debug!(cycle, member = %id, force_kgf = force, "no leg profile carries the connection");
                        failures.push(*id);
                    }
                }
            }

            self.equalize_modules()?;

            if failures.is_empty() {
                tracing::info!(cycles = cycle, reinforced = touched.len(), "leg reinforcement converged");
                return Ok(touched);
            }
        }

        tracing::warn!(cycles = max_cycles, members = ?failures, "leg reinforcement did not converge");
        Err(SizingError::ReinforcementNotConverged {
            cycles: max_cycles,
            members: failures,
        })
    }

    /// First profile at or above `current` (by area) whose connection and
    /// combined axial/bending checks pass for `force_kgf`.
    fn reinforced_profile(
        &self,
        member: &Member,
        catalog: &[&'a Profile],
        current: &str,
        force_kgf: f64,
    ) -> SizingResult<Option<(&'a Profile, ConnectionDesign)>> {
        let start = catalog.iter().position(|p| p.name == current).unwrap_or(0);
        let geometry = MemberGeometry {
            kind: member.kind(),
            effective_length_cm: member.effective_length_cm(),
            length_cm: member.length_cm,
            angle_deg: member.angle_deg,
        };

        for &profile in &catalog[start..] {
            let connection = design_connection(self.config, self.materials, profile, BarKind::Leg, force_kgf)?;
            if connection.utilization > 1.0 {
                continue;
            }
            let combined = axial_bending_utilization(self.config, self.materials, profile, force_kgf, &geometry)?;
            if combined > 1.0 {
                continue;
            }
            return Ok(Some((profile, connection)));
        }
        Ok(None)
    }

    /// Re-run axial and bending checks on every case of the reinforced legs.
    pub(crate) fn reverify_reinforced(&mut self, reinforced: &BTreeSet<MemberId>) -> SizingResult<()> {
        for id in reinforced {
            let Some(profile) = self.current_profile(id)? else {
                continue;
            };
            let member = self.members[id].clone();
            let tension_only = self.critical.get(id).is_some_and(|c| c.tension_only);
            let bending_ok = self.bending_passes(profile, &member)?;

            let mut refreshed = Vec::new();
            if let Some(result) = self.results.get(id) {
                for (hypothesis, case) in &result.cases {
                    let limit = tension_only && case.force_kgf > 0.0;
                    let axial = self.axial(profile, &member, case.force_kgf, limit, !limit)?;
                    if !axial.feasible || !bending_ok {
                        return Err(SizingError::ReinforcementRegression {
                            member: *id,
                            hypothesis: hypothesis.clone(),
                        });
                    }
                    refreshed.push((hypothesis.clone(), axial));
                }
            }

            if let Some(result) = self.results.get_mut(id) {
                for (hypothesis, axial) in refreshed {
                    if let Some(case) = result.cases.get_mut(&hypothesis) {
                        case.profile = profile.name.clone();
                        case.axial = axial;
                    }
                }
            }
        }
        Ok(())
    }
}
