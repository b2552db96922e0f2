//! Per-module leg equalization.
//!
//! Every leg of a module takes the profile with the largest gross area
//! chosen for any leg of that module. Running it twice changes nothing.

use std::collections::BTreeMap;

use crate::errors::SizingResult;
use crate::materials::Profile;
use crate::member::MemberId;

use super::SizingRun;

/// Governing profile of a module and its legs
type ModuleLegs<'p> = (&'p Profile, Vec<MemberId>);

impl<'a> SizingRun<'a> {
    /// Largest-area leg profile of each module (first in id order on ties)
    fn module_governing_profiles(&self) -> SizingResult<BTreeMap<u32, ModuleLegs<'a>>> {
        let mut modules: BTreeMap<u32, ModuleLegs<'a>> = BTreeMap::new();

        for member in self.members.values().filter(|m| m.is_leg()) {
            let Some(module) = member.module() else {
                continue;
            };
            let Some(profile) = self.current_profile(&member.id)? else {
                continue;
            };
            match modules.get_mut(&module) {
                Some((best, ids)) => {
                    if profile.area_cm2 > best.area_cm2 {
                        *best = profile;
                    }
                    ids.push(member.id);
                }
                None => {
                    modules.insert(module, (profile, vec![member.id]));
                }
            }
        }
        Ok(modules)
    }

    /// Give every leg of a module the module's largest profile and refresh
    /// the axial records of the legs that changed.
    pub(crate) fn equalize_modules(&mut self) -> SizingResult<()> {
        for (module, (profile, ids)) in self.module_governing_profiles()? {
            for id in ids {
                let unchanged = self
                    .results
                    .get(&id)
                    .map_or(true, |r| r.profile == profile.name);
                if unchanged {
                    continue;
                }

                let member = self.members[&id].clone();
                let mut refreshed = Vec::new();
                if let Some(result) = self.results.get(&id) {
                    for (hypothesis, case) in &result.cases {
                        let is_tension = case.force_kgf > 0.0;
                        let axial = self.axial(profile, &member, case.force_kgf, is_tension, !is_tension)?;
                        refreshed.push((hypothesis.clone(), axial));
                    }
                }

                tracing::debug!(module, member = %id, profile = %profile.name, "leg equalized");
                self.set_profile(&id, &profile.name);
                if let Some(result) = self.results.get_mut(&id) {
                    for (hypothesis, axial) in refreshed {
                        if let Some(case) = result.cases.get_mut(&hypothesis) {
                            case.profile = profile.name.clone();
                            case.axial = axial;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
