//! Field catalog served at `/list`.

use std::collections::BTreeMap;

use dataset::{DatasetInfo, DEPOSIT_KINDS};
use map_common::{DisplayUnit, FieldRef};
use serde::Serialize;

/// Fields grouped by particle or fluid type, each with its active mark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldListing {
    pub data: BTreeMap<String, Vec<(FieldRef, bool)>>,
    /// Domain width along x in the display unit
    pub width: f64,
    pub active: FieldRef,
}

/// List every selectable field of the dataset.
///
/// Each particle type gets its deposit fields; each fluid type gets the
/// derived fields of that type. A fluid type sharing a name with a particle
/// type replaces its group.
pub fn list_fields(info: &DatasetInfo, active: &FieldRef, unit: DisplayUnit) -> FieldListing {
    let mut data = BTreeMap::new();

    for ptype in &info.particle_types {
        let entries = DEPOSIT_KINDS
            .iter()
            .map(|kind| {
                let field = DatasetInfo::deposit_field(ptype, kind);
                let is_active = active.selects(&field);
                (field, is_active)
            })
            .collect();
        data.insert(ptype.clone(), entries);
    }

    for ftype in &info.fluid_types {
        let entries = info
            .derived_fields
            .iter()
            .filter(|(category, _)| category == ftype)
            .map(|(category, name)| {
                let field = FieldRef::compound(category.clone(), name.clone());
                let is_active = active.selects(&field);
                (field, is_active)
            })
            .collect();
        data.insert(ftype.clone(), entries);
    }

    FieldListing {
        data,
        width: info.domain.width_in(unit),
        active: active.clone(),
    }
}
