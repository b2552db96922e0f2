//! Per-member profile selection.
//!
//! Each critical case sweeps the catalog for the lightest profile passing
//! every check. The two choices are reconciled into one profile, which is
//! then re-verified on both cases.

use std::collections::BTreeMap;

use crate::calculations::bending::check_bending;
use crate::calculations::connection::design_connection;
use crate::calculations::{AxialCheck, ConnectionDesign, WIDTH_THICKNESS_LIMIT};
use crate::errors::SizingResult;
use crate::hypothesis::{is_synthetic, CriticalCase, CriticalCases};
use crate::materials::Profile;
use crate::member::Member;

use super::results::{CaseVerification, MemberResult, NO_PROFILE};
use super::SizingRun;

/// Lightest profile found for one critical case.
#[derive(Debug, Clone)]
struct SweepChoice<'p> {
    profile: &'p Profile,
    axial: AxialCheck,
}

impl<'a> SizingRun<'a> {
    /// Size one member. A member with no viable profile comes back with
    /// [`NO_PROFILE`].
    pub(crate) fn size_member(&self, member: &Member, cases: &CriticalCases) -> SizingResult<MemberResult> {
        let kind = member.kind();
        let catalog = self.profiles.candidates(kind, self.config.hole_diameter(kind));

        let limit_tension = cases.tension_only;
        let tension = self.sweep(member, &catalog, &cases.tension, limit_tension)?;
        let compression = self.sweep(member, &catalog, &cases.compression, limit_tension)?;

        let mut result = MemberResult {
            id: member.id,
            class: member.class,
            module: member.module(),
            profile: NO_PROFILE.to_string(),
            tension_hypothesis: cases.tension.hypothesis.clone(),
            compression_hypothesis: cases.compression.hypothesis.clone(),
            governing_hypothesis: cases.tension.hypothesis.clone(),
            worst_connection_hypothesis: cases.tension.hypothesis.clone(),
            synthetic: cases.synthetic,
            cases: BTreeMap::new(),
            final_axial_utilization: None,
            final_connection_utilization: None,
        };

        // Reconcile the two choices: governing first, the other as fallback
        let ordered: Vec<(&CriticalCase, &Profile)> = match (&tension, &compression) {
            (None, None) => {
                tracing::warn!(member = %member.id, "no viable profile for either critical case");
                return Ok(result);
            }
            (Some(t), None) => vec![(&cases.tension, t.profile)],
            (None, Some(c)) => vec![(&cases.compression, c.profile)],
            (Some(t), Some(c)) if t.profile.name == c.profile.name => {
                let t_util = t.axial.utilization_or_infeasible();
                let c_util = c.axial.utilization_or_infeasible();
                if c_util > t_util {
                    vec![(&cases.compression, c.profile)]
                } else {
                    vec![(&cases.tension, t.profile)]
                }
            }
            (Some(t), Some(c)) => {
                if c.profile.area_cm2 > t.profile.area_cm2 {
                    vec![(&cases.compression, c.profile), (&cases.tension, t.profile)]
                } else {
                    vec![(&cases.tension, t.profile), (&cases.compression, c.profile)]
                }
            }
        };

        for (governing, profile) in ordered {
            if let Some(records) = self.verify_profile(member, profile, cases)? {
                result.profile = profile.name.clone();
                result.governing_hypothesis = governing.hypothesis.clone();
                result.cases = records;
                result.refresh_worst_connection();
                tracing::debug!(
                    member = %member.id,
                    profile = %profile.name,
                    governing = %governing.hypothesis,
                    "profile selected"
                );
                return Ok(result);
            }
            tracing::debug!(
                member = %member.id,
                profile = %profile.name,
                "profile fails re-verification on the other critical case"
            );
        }

        tracing::warn!(member = %member.id, "no profile passes both critical cases");
        Ok(result)
    }

    /// Lightest profile passing every check for one case.
    fn sweep<'p>(
        &self,
        member: &Member,
        catalog: &[&'p Profile],
        case: &CriticalCase,
        limit_tension: bool,
    ) -> SizingResult<Option<SweepChoice<'p>>> {
        let kind = member.kind();
        let mut best: Option<SweepChoice<'p>> = None;

        for &profile in catalog {
            if profile.width_thickness_ratio() > WIDTH_THICKNESS_LIMIT {
                continue;
            }

            let axial = self.axial(profile, member, case.force_kgf, limit_tension, !limit_tension)?;
            if !axial.feasible {
                continue;
            }

            if !self.bending_passes(profile, member)? {
                continue;
            }

            if !kind.is_leg() {
                let connection = design_connection(self.config, self.materials, profile, kind, case.force_kgf)?;
                if connection.shear_capacity_kgf == 0.0 || connection.bearing_capacity_kgf == 0.0 {
                    continue;
                }
                if connection.utilization_for(case.force_kgf) > 1.0 {
                    continue;
                }
                if axial.utilization_or_infeasible() > self.config.bracing_utilization_limit {
                    tracing::debug!(
                        member = %member.id,
                        profile = %profile.name,
                        utilization = axial.utilization_or_infeasible(),
                        "bracing profile above utilization cap"
                    );
                    continue;
                }
            }

            if best.as_ref().map_or(true, |b| profile.mass_kg_m < b.profile.mass_kg_m) {
                best = Some(SweepChoice { profile, axial });
            }
        }

        Ok(best)
    }

    pub(crate) fn bending_passes(&self, profile: &Profile, member: &Member) -> SizingResult<bool> {
        let fy = self.materials.for_profile(profile)?.fy_kgf_cm2;
        Ok(check_bending(
            profile,
            fy,
            member.kind(),
            member.angle_deg,
            member.length_cm,
            self.config.minoration,
        )
        .passes)
    }

    /// Records for both critical cases if `profile` passes them all.
    ///
    /// Each case is checked with the slenderness rule of its own sign.
    /// Bracing must also carry the force through its connection.
    fn verify_profile(
        &self,
        member: &Member,
        profile: &Profile,
        cases: &CriticalCases,
    ) -> SizingResult<Option<BTreeMap<String, CaseVerification>>> {
        let kind = member.kind();
        let mut records = BTreeMap::new();

        for case in cases.both() {
            let is_tension = case.force_kgf > 0.0;
            let axial = self.axial(profile, member, case.force_kgf, is_tension, !is_tension)?;
            let connection: ConnectionDesign =
                design_connection(self.config, self.materials, profile, kind, case.force_kgf)?;

            let passes = axial.feasible
                && self.bending_passes(profile, member)?
                && (kind.is_leg() || connection.utilization_for(case.force_kgf) <= 1.0);
            if !passes {
                return Ok(None);
            }

            records.insert(
                case.hypothesis.clone(),
                CaseVerification {
                    hypothesis: case.hypothesis.clone(),
                    force_kgf: case.force_kgf,
                    synthetic: is_synthetic(&case.hypothesis),
                    profile: profile.name.clone(),
                    axial,
                    connection: Some(connection),
                },
            );
        }

        Ok(Some(records))
    }
}
