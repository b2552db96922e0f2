//! Angle Profile Catalog
//!
//! Section properties for the hot-rolled angles a lattice tower is built
//! from, with the usage restrictions the sizing engine honours.
//!
//! ## Data Source
//!
//! Catalogs are normally exported from the profile spreadsheet to a flat CSV
//! (see [`ProfileCatalog::load_from_csv`]) or embedded in a job file as a
//! JSON array. [`builtin_angle_profiles`] provides a small equal-leg angle
//! table for demos and tests.
//!
//! ## Example
//!
//! ```rust
//! use sizing_core::materials::steel::builtin_angle_profiles;
//! use sizing_core::member::BarKind;
//!
//! let catalog = builtin_angle_profiles();
//! let angle = catalog.lookup("L 50x50x5").unwrap();
//! assert_eq!(angle.area_cm2, 4.80);
//!
//! // Thin angles are reserved for bracing
//! let legs = catalog.usable_for(BarKind::Leg);
//! assert!(legs.iter().all(|p| p.name != "L 60x60x3"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{SizingError, SizingResult};
use crate::member::BarKind;

/// Grade assumed for profiles that do not name one
pub const DEFAULT_GRADE: &str = "A572-50";

/// Usage restriction carried in the catalog notes column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileUsage {
    /// Any member
    #[default]
    Unrestricted,
    /// Diagonals and horizontals only
    NotForLegs,
    /// Listed for reference, never selected
    Withdrawn,
}

impl ProfileUsage {
    /// Interpret a free-text catalog note.
    ///
    /// Blank and `OK` notes are unrestricted, notes mentioning legs
    /// (`leg`, or `montante` in the Portuguese sheets) restrict the profile
    /// to bracing, anything else withdraws it.
    pub fn from_note(note: &str) -> Self {
        let lower = note.trim().trim_end_matches('!').to_lowercase();
        if lower.is_empty() || lower == "ok" {
            ProfileUsage::Unrestricted
        } else if lower.contains("leg") || lower.contains("montante") {
            ProfileUsage::NotForLegs
        } else {
            ProfileUsage::Withdrawn
        }
    }

    pub fn allows(&self, kind: BarKind) -> bool {
        match self {
            ProfileUsage::Unrestricted => true,
            ProfileUsage::NotForLegs => !kind.is_leg(),
            ProfileUsage::Withdrawn => false,
        }
    }
}

fn default_grade() -> String {
    DEFAULT_GRADE.to_string()
}

fn default_net_area_holes() -> u32 {
    1
}

/// Equal-leg angle with the section properties used by the checks.
///
/// All dimensions in cm, areas in cm², moduli in cm³.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Catalog designation (e.g., "L 50x50x5")
    pub name: String,

    /// Steel grade key into the material table
    #[serde(default = "default_grade")]
    pub grade: String,

    /// Gross area (cm²)
    pub area_cm2: f64,

    /// Radius of gyration about the leg-parallel axis (cm)
    pub rx_cm: f64,

    /// Minimum radius of gyration (cm)
    pub rz_cm: f64,

    /// Flange width b (cm)
    pub flange_width_cm: f64,

    /// Flange thickness t (cm)
    pub thickness_cm: f64,

    /// Root fillet radius R (cm)
    pub fillet_radius_cm: f64,

    /// Elastic section modulus (cm³)
    pub wx_cm3: f64,

    /// Mass per length (kg/m)
    pub mass_kg_m: f64,

    /// Largest bolt hole the flange accepts (cm); None = unrestricted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bolt_diameter_cm: Option<f64>,

    #[serde(default)]
    pub usage: ProfileUsage,

    /// Holes deducted from the net area
    #[serde(default = "default_net_area_holes")]
    pub net_area_holes: u32,

    /// Minimum bolt count when used as a leg; None = 4
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_leg_bolts: Option<u32>,
}

impl Profile {
    /// Radius of gyration governing buckling for this member kind
    pub fn radius_for(&self, kind: BarKind) -> f64 {
        if kind.is_leg() {
            self.rx_cm
        } else {
            self.rz_cm
        }
    }

    /// Flange utility-width to thickness ratio (b - t - R) / t
    pub fn width_thickness_ratio(&self) -> f64 {
        (self.flange_width_cm - self.thickness_cm - self.fillet_radius_cm) / self.thickness_cm
    }

    /// Whether a hole of the given diameter fits the flange
    pub fn accepts_hole(&self, hole_diameter_cm: f64) -> bool {
        self.max_bolt_diameter_cm
            .map_or(true, |max| max >= hole_diameter_cm)
    }

    pub fn is_usable_for(&self, kind: BarKind) -> bool {
        self.usage.allows(kind)
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (A={:.2} cm², rz={:.2} cm, {:.2} kg/m)",
            self.name, self.area_cm2, self.rz_cm, self.mass_kg_m
        )
    }
}

/// Ordered profile catalog.
///
/// Insertion order is preserved: it is the tie-break order of the profile
/// sweep. Lookups are case-insensitive on the designation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Profile>", into = "Vec<Profile>")]
pub struct ProfileCatalog {
    profiles: Vec<Profile>,

    /// Uppercased designation -> position in `profiles`
    index: HashMap<String, usize>,
}

impl ProfileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load profiles from a CSV export.
    ///
    /// Expected header (order free, names case-insensitive):
    ///
    /// ```text
    /// name,grade,area_cm2,rx_cm,rz_cm,b_cm,t_cm,r_cm,wx_cm3,mass_kg_m,max_bolt_cm,notes,net_holes,min_leg_bolts
    /// ```
    ///
    /// `grade`, `max_bolt_cm`, `notes`, `net_holes` and `min_leg_bolts` are
    /// optional. Blank lines and lines starting with `#` are skipped.
    pub fn load_from_csv(path: &Path) -> SizingResult<Self> {
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SizingError::file_error("open", &display, format!("Failed to read CSV: {}", e)))?;
        Self::parse_csv(&contents).map_err(|reason| SizingError::file_error("parse", &display, reason))
    }

    fn parse_csv(contents: &str) -> Result<Self, String> {
        let mut lines = contents
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty() && !l.trim_start().starts_with('#'));

        let (_, header_line) = lines.next().ok_or("CSV file is empty")?;
        let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();
        let col_index = |name: &str| -> Option<usize> {
            headers.iter().position(|h| h.eq_ignore_ascii_case(name))
        };
        let required = |name: &str| -> Result<usize, String> {
            col_index(name).ok_or_else(|| format!("Missing '{}' column", name))
        };

        let name_idx = required("name")?;
        let area_idx = required("area_cm2")?;
        let rx_idx = required("rx_cm")?;
        let rz_idx = required("rz_cm")?;
        let b_idx = required("b_cm")?;
        let t_idx = required("t_cm")?;
        let r_idx = required("r_cm")?;
        let wx_idx = required("wx_cm3")?;
        let mass_idx = required("mass_kg_m")?;

        let grade_idx = col_index("grade");
        let max_bolt_idx = col_index("max_bolt_cm");
        let notes_idx = col_index("notes");
        let holes_idx = col_index("net_holes");
        let min_bolts_idx = col_index("min_leg_bolts");

        let mut catalog = ProfileCatalog::new();

        for (line_no, line) in lines {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let cell = |idx: Option<usize>| idx.and_then(|i| fields.get(i)).copied().unwrap_or("");
            let number = |idx: usize, column: &str| -> Result<f64, String> {
                parse_optional_f64(cell(Some(idx))).ok_or_else(|| {
                    format!("Line {}: invalid or missing '{}'", line_no + 1, column)
                })
            };

            let name = cell(Some(name_idx));
            if name.is_empty() {
                continue;
            }

            let grade = match cell(grade_idx) {
                "" => DEFAULT_GRADE.to_string(),
                g => g.to_string(),
            };

            catalog.insert(Profile {
                name: name.to_string(),
                grade,
                area_cm2: number(area_idx, "area_cm2")?,
                rx_cm: number(rx_idx, "rx_cm")?,
                rz_cm: number(rz_idx, "rz_cm")?,
                flange_width_cm: number(b_idx, "b_cm")?,
                thickness_cm: number(t_idx, "t_cm")?,
                fillet_radius_cm: number(r_idx, "r_cm")?,
                wx_cm3: number(wx_idx, "wx_cm3")?,
                mass_kg_m: number(mass_idx, "mass_kg_m")?,
                max_bolt_diameter_cm: parse_optional_f64(cell(max_bolt_idx)),
                usage: ProfileUsage::from_note(cell(notes_idx)),
                net_area_holes: parse_optional_f64(cell(holes_idx))
                    .map(|v| v as u32)
                    .unwrap_or(1),
                min_leg_bolts: parse_optional_f64(cell(min_bolts_idx)).map(|v| v as u32),
            });
        }

        Ok(catalog)
    }

    /// Insert a profile, replacing any profile with the same designation
    pub fn insert(&mut self, profile: Profile) {
        let key = profile.name.trim().to_uppercase();
        match self.index.get(&key) {
            Some(&pos) => self.profiles[pos] = profile,
            None => {
                self.index.insert(key, self.profiles.len());
                self.profiles.push(profile);
            }
        }
    }

    /// Look up a profile by designation (case-insensitive)
    pub fn lookup(&self, name: &str) -> SizingResult<&Profile> {
        self.get(name)
            .ok_or_else(|| SizingError::profile_not_found(name))
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.index
            .get(&name.trim().to_uppercase())
            .map(|&pos| &self.profiles[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profiles allowed for a member kind, in catalog order.
    pub fn usable_for(&self, kind: BarKind) -> Vec<&Profile> {
        self.profiles
            .iter()
            .filter(|p| p.is_usable_for(kind))
            .collect()
    }

    /// Profiles allowed for a member kind that also accept the hole diameter.
    pub fn candidates(&self, kind: BarKind, hole_diameter_cm: f64) -> Vec<&Profile> {
        let (kept, dropped): (Vec<&Profile>, Vec<&Profile>) = self
            .usable_for(kind)
            .into_iter()
            .partition(|p| p.accepts_hole(hole_diameter_cm));

        if !dropped.is_empty() {
            let names: Vec<&str> = dropped.iter().map(|p| p.name.as_str()).collect();
            tracing::warn!(
                %kind,
                hole_diameter_cm,
                dropped = ?names,
                "profiles dropped: maximum bolt diameter below hole diameter"
            );
        }
        kept
    }
}

impl From<Vec<Profile>> for ProfileCatalog {
    fn from(profiles: Vec<Profile>) -> Self {
        let mut catalog = ProfileCatalog::new();
        for profile in profiles {
            catalog.insert(profile);
        }
        catalog
    }
}

impl From<ProfileCatalog> for Vec<Profile> {
    fn from(catalog: ProfileCatalog) -> Self {
        catalog.profiles
    }
}

/// Sort profiles by gross area, keeping catalog order among equals
pub fn sort_by_area(profiles: &mut [&Profile]) {
    profiles.sort_by(|a, b| a.area_cm2.total_cmp(&b.area_cm2));
}

/// Parse an optional f64 from a CSV field
///
/// Returns None for empty strings, dashes, or invalid numbers.
fn parse_optional_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "—" {
        return None;
    }
    f64::from_str(trimmed).ok()
}

// ============================================================================
// Built-in Angles (for use without a catalog file)
// ============================================================================

/// Catalog with common equal-leg angles in ASTM A572 Gr. 50.
pub fn builtin_angle_profiles() -> ProfileCatalog {
    let mut catalog = ProfileCatalog::new();

    // (name, A, rx, rz, b, t, R, Wx, mass, max bolt, net holes, min leg bolts)
    let angles = [
        ("L 40x40x3", 2.35, 1.23, 0.79, 4.0, 0.3, 0.6, 0.86, 1.84, 1.27, 1, None),
        ("L 45x45x4", 3.49, 1.36, 0.88, 4.5, 0.4, 0.7, 1.42, 2.74, 1.59, 1, None),
        ("L 50x50x4", 3.89, 1.52, 0.98, 5.0, 0.4, 0.7, 1.77, 3.06, 1.59, 1, None),
        ("L 50x50x5", 4.80, 1.51, 0.98, 5.0, 0.5, 0.7, 2.15, 3.77, 1.59, 1, None),
        ("L 60x60x5", 5.82, 1.82, 1.17, 6.0, 0.5, 0.8, 3.18, 4.57, 1.91, 1, None),
        ("L 65x65x6", 7.53, 1.97, 1.27, 6.5, 0.6, 0.9, 4.44, 5.91, 2.22, 1, None),
        ("L 75x75x6", 8.73, 2.30, 1.48, 7.5, 0.6, 1.0, 6.00, 6.85, 2.22, 1, None),
        ("L 75x75x8", 11.50, 2.28, 1.47, 7.5, 0.8, 1.0, 7.85, 9.03, 2.22, 1, Some(4)),
        ("L 100x100x8", 15.50, 3.06, 1.97, 10.0, 0.8, 1.2, 14.20, 12.20, 2.54, 1, Some(6)),
        ("L 100x100x10", 19.20, 3.04, 1.95, 10.0, 1.0, 1.2, 17.60, 15.00, 2.54, 1, Some(6)),
    ];

    for (name, a, rx, rz, b, t, r, wx, mass, max_bolt, holes, min_bolts) in angles {
        catalog.insert(Profile {
            name: name.to_string(),
            grade: DEFAULT_GRADE.to_string(),
            area_cm2: a,
            rx_cm: rx,
            rz_cm: rz,
            flange_width_cm: b,
            thickness_cm: t,
            fillet_radius_cm: r,
            wx_cm3: wx,
            mass_kg_m: mass,
            max_bolt_diameter_cm: Some(max_bolt),
            usage: ProfileUsage::Unrestricted,
            net_area_holes: holes,
            min_leg_bolts: min_bolts,
        });
    }

    // Thin flange: bracing only
    catalog.insert(Profile {
        name: "L 60x60x3".to_string(),
        grade: DEFAULT_GRADE.to_string(),
        area_cm2: 3.52,
        rx_cm: 1.86,
        rz_cm: 1.19,
        flange_width_cm: 6.0,
        thickness_cm: 0.3,
        fillet_radius_cm: 0.8,
        wx_cm3: 2.05,
        mass_kg_m: 2.76,
        max_bolt_diameter_cm: Some(1.59),
        usage: ProfileUsage::NotForLegs,
        net_area_holes: 1,
        min_leg_bolts: None,
    });

    catalog
}
