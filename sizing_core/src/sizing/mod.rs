//! # Member and Connection Sizing
//!
//! Selects a profile for every member of the tower and designs the bolted
//! splices at module extremities.
//!
//! ## Stages
//!
//! 1. Classify leg positions and collect the connection-required legs
//! 2. Size every member for its critical tension and compression cases
//! 3. Design module extremity connections from the chosen profiles
//! 4. Equalize leg profiles per module
//! 5. Reinforce connection-required legs until connection and code checks
//!    pass, equalizing after each cycle (bounded)
//! 6. Re-verify reinforced members, equalize, redesign end connections and
//!    reject overstressed connections
//!
//! ## Failure Modes
//!
//! Every stage returns [`SizingResult`]. With `hard_stop` (the default) an
//! infeasible tower is an error naming the offending members. Without it,
//! [`size_members`] returns [`SizingOutcome::Infeasible`] and no partial
//! results. Bad data (unknown profiles, grades or members, invalid
//! configuration) is always an error.
//!
//! ## Example
//!
//! ```rust
//! use sizing_core::sizing::{size_members, SizingInput};
//!
//! let input = SizingInput::default();
//! let outcome = size_members(&input).unwrap();
//! let (results, connections, required) = outcome.into_parts();
//! assert!(results.unwrap().is_empty());
//! assert!(connections.unwrap().is_empty());
//! assert!(required.unwrap().is_empty());
//! ```

mod end_connections;
mod equalize;
mod member_sizing;
mod reinforce;
pub mod results;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::calculations::axial::{check_axial, AxialCheck, AxialInput};
use crate::calculations::ConnectionDesign;
use crate::classifier::{connection_required, expand_symmetric, mark_extremities};
use crate::config::SizingConfig;
use crate::errors::{SizingError, SizingResult};
use crate::hypothesis::{critical_cases, is_synthetic, CriticalCases, ForceTable};
use crate::materials::{builtin_grades, MaterialTable, Profile, ProfileCatalog};
use crate::member::{Member, MemberId};

pub use results::{CaseVerification, MemberResult, SizingOutcome, SizingOutput, SizingParts, NO_PROFILE};

/// Everything a sizing run consumes.
///
/// ## JSON Example
///
/// ```json
/// {
///   "config": { "minoration": 0.9, "hard_stop": false },
///   "materials": { "bolt_grade": "A394", "grades": [] },
///   "profiles": [],
///   "members": [],
///   "hypotheses": { "wind_0": { "1": 8000.0 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingInput {
    #[serde(default)]
    pub config: SizingConfig,

    #[serde(default = "builtin_grades")]
    pub materials: MaterialTable,

    pub profiles: ProfileCatalog,

    pub members: Vec<Member>,

    /// Hypothesis name → member id → signed axial force (kgf)
    pub hypotheses: ForceTable,
}

impl Default for SizingInput {
    fn default() -> Self {
        SizingInput {
            config: SizingConfig::default(),
            materials: builtin_grades(),
            profiles: ProfileCatalog::new(),
            members: Vec::new(),
            hypotheses: ForceTable::new(),
        }
    }
}

/// Size every member and design the end connections.
///
/// Infeasibility is an error when `config.hard_stop` is set and an
/// [`SizingOutcome::Infeasible`] outcome otherwise.
pub fn size_members(input: &SizingInput) -> SizingResult<SizingOutcome> {
    let span = tracing::info_span!("size_members", members = input.members.len());
    let _guard = span.enter();

    match SizingRun::new(input).and_then(SizingRun::execute) {
        Ok(output) => Ok(SizingOutcome::Sized(output)),
        Err(err) if err.is_infeasibility() && !input.config.hard_stop => {
            tracing::warn!(error = %err, "sizing infeasible, returning empty outcome");
            Ok(SizingOutcome::Infeasible { reason: err })
        }
        Err(err) => Err(err),
    }
}

/// State of one sizing run.
///
/// Catalogs are borrowed read-only; members, forces and results are owned
/// and mutated only by the run's stages.
pub(crate) struct SizingRun<'a> {
    pub(crate) config: &'a SizingConfig,
    pub(crate) materials: &'a MaterialTable,
    pub(crate) profiles: &'a ProfileCatalog,
    pub(crate) members: BTreeMap<MemberId, Member>,
    /// Input forces plus synthetic cases
    pub(crate) forces: ForceTable,
    pub(crate) critical: BTreeMap<MemberId, CriticalCases>,
    pub(crate) results: BTreeMap<MemberId, MemberResult>,
    pub(crate) connections: BTreeMap<MemberId, ConnectionDesign>,
    pub(crate) required: BTreeSet<MemberId>,
}

impl<'a> SizingRun<'a> {
    fn new(input: &'a SizingInput) -> SizingResult<Self> {
        input.config.validate()?;

        let mut members = BTreeMap::new();
        for member in &input.members {
            if members.insert(member.id, member.clone()).is_some() {
                return Err(SizingError::invalid_input(
                    "members",
                    member.id.to_string(),
                    "Duplicate member id",
                ));
            }
        }
        for forces in input.hypotheses.values() {
            if let Some(id) = forces.keys().find(|id| !members.contains_key(id)) {
                return Err(SizingError::MemberNotFound { member: *id });
            }
        }

        Ok(SizingRun {
            config: &input.config,
            materials: &input.materials,
            profiles: &input.profiles,
            members,
            forces: input.hypotheses.clone(),
            critical: BTreeMap::new(),
            results: BTreeMap::new(),
            connections: BTreeMap::new(),
            required: BTreeSet::new(),
        })
    }

    fn execute(mut self) -> SizingResult<SizingOutput> {
        let tolerance = self.config.level_tolerance_cm;

        mark_extremities(&mut self.members, tolerance);
        let required = connection_required(&self.members, &self.forces);
        self.required = expand_symmetric(&self.members, &required, tolerance);
        tracing::info!(required = ?self.required, "connection-required legs");

        self.select_critical_cases();
        self.size_all_members()?;

        self.apply_end_connections()?;
        self.equalize_modules()?;

        let reinforced = self.reinforce_legs()?;
        self.reverify_reinforced(&reinforced)?;
        self.equalize_modules()?;

        self.apply_end_connections()?;
        self.check_required_connections()?;
        self.compute_final_utilizations()?;

        tracing::info!(members = self.results.len(), connections = self.connections.len(), "sizing complete");
        Ok(SizingOutput {
            results: self.results,
            connections: self.connections,
            connection_required: self.required,
            members: self.members,
        })
    }

    /// Pick critical cases and register synthetic forces in the force table.
    fn select_critical_cases(&mut self) {
        for id in self.members.keys() {
            let cases = critical_cases(&self.forces, id);
            self.critical.insert(*id, cases);
        }
        for (id, cases) in &self.critical {
            for case in cases.both() {
                if is_synthetic(&case.hypothesis) {
                    self.forces
                        .entry(case.hypothesis.clone())
                        .or_default()
                        .insert(*id, case.force_kgf);
                }
            }
        }
    }

    fn size_all_members(&mut self) -> SizingResult<()> {
        let mut infeasible = Vec::new();

        for (id, member) in &self.members {
            let cases = &self.critical[id];
            let result = self.size_member(member, cases)?;
            if !result.has_profile() {
                infeasible.push(*id);
            }
            self.results.insert(*id, result);
        }

        if !infeasible.is_empty() {
            return Err(SizingError::InfeasibleMembers { members: infeasible });
        }

        for (id, result) in &self.results {
            if let Some(member) = self.members.get_mut(id) {
                member.chosen_profile = Some(result.profile.clone());
            }
        }
        tracing::info!(members = self.results.len(), "members sized");
        Ok(())
    }

    /// Reject connection-required legs still overstressed after reinforcement.
    fn check_required_connections(&self) -> SizingResult<()> {
        for id in &self.required {
            let Some(result) = self.results.get(id) else {
                continue;
            };
            if let Some(connection) = result.worst_connection() {
                if connection.utilization > 1.0 {
                    return Err(SizingError::ConnectionOverstressed {
                        member: *id,
                        utilization: connection.utilization,
                    });
                }
            }
        }
        Ok(())
    }

    /// Final axial and connection utilizations over the extreme forces.
    fn compute_final_utilizations(&mut self) -> SizingResult<()> {
        let ids: Vec<MemberId> = self.results.keys().copied().collect();
        for id in ids {
            let member = &self.members[&id];
            let result = &self.results[&id];
            let profile = self.profiles.lookup(&result.profile)?;

            let tension = result
                .critical_cases()
                .map(|c| c.force_kgf)
                .filter(|f| *f > 0.0)
                .fold(0.0, f64::max);
            let compression = result
                .critical_cases()
                .map(|c| c.force_kgf)
                .filter(|f| *f < 0.0)
                .fold(0.0, f64::min);

            let axial_t = self.axial_utilization(profile, member, tension, true)?;
            let axial_c = self.axial_utilization(profile, member, compression, false)?;
            let connection = result
                .worst_connection()
                .map(|c| c.utilization_for(tension).max(c.utilization_for(compression)));

            if let Some(result) = self.results.get_mut(&id) {
                result.final_axial_utilization = Some(axial_t.max(axial_c));
                result.final_connection_utilization = connection;
            }
        }
        Ok(())
    }

    fn axial_utilization(&self, profile: &Profile, member: &Member, force: f64, tension: bool) -> SizingResult<f64> {
        if force == 0.0 {
            return Ok(0.0);
        }
        let check = self.axial(profile, member, force, tension, !tension)?;
        Ok(check.utilization_or_infeasible())
    }

    /// Axial check of `profile` on `member` with the run's configuration.
    pub(crate) fn axial(
        &self,
        profile: &Profile,
        member: &Member,
        force_kgf: f64,
        limit_tension_slenderness: bool,
        force_compression_check: bool,
    ) -> SizingResult<AxialCheck> {
        let kind = member.kind();
        check_axial(
            self.materials,
            &AxialInput {
                profile,
                force_kgf,
                kind,
                effective_length_cm: member.effective_length_cm(),
                minoration: self.config.minoration,
                hole_diameter_cm: self.config.hole_diameter(kind),
                limit_tension_slenderness,
                force_compression_check,
                net_area_holes: self.config.net_area_holes.get(kind),
            },
        )
    }

    /// Update the chosen profile on both the result and the member metadata
    pub(crate) fn set_profile(&mut self, id: &MemberId, profile: &str) {
        if let Some(result) = self.results.get_mut(id) {
            result.profile = profile.to_string();
        }
        if let Some(member) = self.members.get_mut(id) {
            member.chosen_profile = Some(profile.to_string());
        }
    }
}
