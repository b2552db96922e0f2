//! Shared fixtures for unit tests.

use std::collections::BTreeMap;

use crate::hypothesis::ForceTable;
use crate::materials::{MaterialTable, Profile, ProfileCatalog, ProfileUsage, SteelGrade};
use crate::member::{BarClass, Member, MemberId, PositionFlags};

/// A36 (fy 2500, fu 4000) and bolt grade A394 (fv 3000), round numbers
pub(crate) fn fixture_grades() -> MaterialTable {
    MaterialTable::new(vec![
        SteelGrade {
            name: "A36".to_string(),
            fy_kgf_cm2: 2500.0,
            fu_kgf_cm2: 4000.0,
            bolt_shear_kgf_cm2: None,
        },
        SteelGrade {
            name: "A394".to_string(),
            fy_kgf_cm2: 6000.0,
            fu_kgf_cm2: 8000.0,
            bolt_shear_kgf_cm2: Some(3000.0),
        },
    ])
}

/// Unrestricted A36 angle with one net-area hole
#[allow(clippy::too_many_arguments)]
pub(crate) fn test_profile(
    name: &str,
    area: f64,
    rx: f64,
    rz: f64,
    b: f64,
    t: f64,
    fillet: f64,
    wx: f64,
    mass: f64,
) -> Profile {
    Profile {
        name: name.to_string(),
        grade: "A36".to_string(),
        area_cm2: area,
        rx_cm: rx,
        rz_cm: rz,
        flange_width_cm: b,
        thickness_cm: t,
        fillet_radius_cm: fillet,
        wx_cm3: wx,
        mass_kg_m: mass,
        max_bolt_diameter_cm: None,
        usage: ProfileUsage::Unrestricted,
        net_area_holes: 1,
        min_leg_bolts: None,
    }
}

/// Five angles L1..L5 (increasing) plus a thin bracing-only angle T
pub(crate) fn fixture_catalog() -> ProfileCatalog {
    let with_bolt = |mut p: Profile, d: f64| {
        p.max_bolt_diameter_cm = Some(d);
        p
    };
    let mut thin = test_profile("T", 3.2, 1.9, 1.2, 6.0, 0.3, 0.6, 1.5, 2.5);
    thin.usage = ProfileUsage::NotForLegs;

    ProfileCatalog::from(vec![
        with_bolt(test_profile("L1", 3.0, 1.2, 0.8, 4.0, 0.4, 0.5, 1.2, 2.4), 1.59),
        with_bolt(test_profile("L2", 5.0, 1.5, 1.0, 5.0, 0.5, 0.6, 2.0, 3.9), 1.59),
        with_bolt(test_profile("L3", 8.0, 2.0, 1.3, 6.5, 0.6, 0.8, 4.0, 6.3), 1.91),
        with_bolt(test_profile("L4", 12.0, 2.5, 1.6, 7.5, 0.8, 1.0, 7.0, 9.4), 2.22),
        with_bolt(test_profile("L5", 18.0, 3.0, 1.9, 10.0, 1.0, 1.2, 14.0, 14.1), 2.54),
        thin,
    ])
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn member(
    id: u32,
    class: BarClass,
    length: f64,
    unbraced: Option<f64>,
    angle: f64,
    module: u32,
    y_min: f64,
    y_max: f64,
) -> Member {
    Member {
        id: MemberId::new(id),
        class,
        length_cm: length,
        unbraced_length_cm: unbraced,
        angle_deg: angle,
        modules: vec![module],
        y_min_cm: y_min,
        y_max_cm: y_max,
        position: PositionFlags::default(),
        chosen_profile: None,
    }
}

/// Two stacked modules, numbered from the top.
///
/// Module 2 spans y = 0..300 (legs 1, 2), module 1 spans 300..600
/// (legs 3, 4). Each module has one diagonal and one horizontal.
pub(crate) fn two_module_tower() -> BTreeMap<MemberId, Member> {
    [
        member(1, BarClass::LegLeft, 300.0, Some(150.0), 90.0, 2, 0.0, 300.0),
        member(2, BarClass::LegRight, 300.0, Some(150.0), 90.0, 2, 0.0, 300.0),
        member(3, BarClass::LegLeft, 300.0, Some(150.0), 90.0, 1, 300.0, 600.0),
        member(4, BarClass::LegRight, 300.0, Some(150.0), 90.0, 1, 300.0, 600.0),
        member(5, BarClass::Diagonal, 180.3, None, 56.3, 2, 0.0, 150.0),
        member(6, BarClass::Horizontal, 100.0, None, 0.0, 2, 150.0, 150.0),
        member(7, BarClass::Diagonal, 180.3, None, 56.3, 1, 300.0, 450.0),
        member(8, BarClass::Horizontal, 100.0, None, 180.0, 1, 450.0, 450.0),
    ]
    .into_iter()
    .map(|m| (m.id, m))
    .collect()
}

/// Wind from both directions on [`two_module_tower`]
pub(crate) fn two_module_forces() -> ForceTable {
    let positive = [
        (1, 8000.0),
        (2, -9000.0),
        (3, 3000.0),
        (4, -3500.0),
        (5, -1500.0),
        (6, 400.0),
        (7, -800.0),
        (8, 200.0),
    ];
    let mut table = ForceTable::new();
    table.insert(
        "Fh(+)".to_string(),
        positive.iter().map(|&(id, f)| (MemberId::new(id), f)).collect(),
    );
    table.insert(
        "Fh(-)".to_string(),
        positive.iter().map(|&(id, f)| (MemberId::new(id), -f)).collect(),
    );
    table
}
