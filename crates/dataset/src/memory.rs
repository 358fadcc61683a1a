//! In-memory dataset of rectangular cells and point particles.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use map_common::{BoundingBox, Domain, FieldRef};
use serde::{Deserialize, Serialize};

use crate::deposit::{deposit, DepositKind};
use crate::error::{DatasetError, Result};
use crate::index::BinIndex;
use crate::pixelize::pixelize;
use crate::types::{Cells, DatasetInfo, Particles, SampleSet, DEPOSIT_CATEGORY};
use crate::Dataset;

/// On-disk JSON layout of an in-memory dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    pub domain: Domain,
    pub cells: Cells,
    /// Fluid types to advertise; defaults to the keys of `fields`.
    #[serde(default)]
    pub fluid_types: Vec<String>,
    /// `fluid type -> field name -> one value per cell`
    #[serde(default)]
    pub fields: BTreeMap<String, BTreeMap<String, Vec<f64>>>,
    #[serde(default)]
    pub particles: BTreeMap<String, Particles>,
}

/// Where the values of a field come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum FieldSource {
    Fluid(String, String),
    Deposit(String, DepositKind),
}

/// Cells with per-cell fluid fields, plus particles that can be deposited.
///
/// The spatial bin index and particle deposits are computed on first use
/// and cached, which is why field access takes `&mut self`.
#[derive(Debug)]
pub struct InMemoryDataset {
    info: DatasetInfo,
    cells: Cells,
    fields: BTreeMap<(String, String), Vec<f64>>,
    particles: BTreeMap<String, Particles>,
    index: Option<BinIndex>,
    deposits: HashMap<(String, DepositKind), Vec<f64>>,
}

impl InMemoryDataset {
    pub fn new(file: DatasetFile) -> Result<Self> {
        file.domain
            .validate()
            .map_err(|e| DatasetError::Invalid(e.to_string()))?;

        let n = file.cells.len();
        for (name, len) in [
            ("cells.py", file.cells.py.len()),
            ("cells.pdx", file.cells.pdx.len()),
            ("cells.pdy", file.cells.pdy.len()),
        ] {
            check_len(name, n, len)?;
        }

        let mut fields = BTreeMap::new();
        for (ftype, by_name) in file.fields {
            for (name, values) in by_name {
                check_len(&format!("fields.{}.{}", ftype, name), n, values.len())?;
                fields.insert((ftype.clone(), name), values);
            }
        }

        for (ptype, p) in &file.particles {
            check_len(&format!("particles.{}.y", ptype), p.len(), p.y.len())?;
            check_len(&format!("particles.{}.mass", ptype), p.len(), p.mass.len())?;
        }

        let fluid_types = if file.fluid_types.is_empty() {
            fields
                .keys()
                .map(|(ftype, _)| ftype.clone())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        } else {
            file.fluid_types
        };

        let info = DatasetInfo {
            domain: file.domain,
            particle_types: file.particles.keys().cloned().collect(),
            fluid_types,
            derived_fields: fields.keys().cloned().collect(),
        };

        tracing::info!(
            cells = n,
            fields = info.derived_fields.len(),
            particle_types = info.particle_types.len(),
            "Loaded in-memory dataset"
        );

        Ok(Self {
            info,
            cells: file.cells,
            fields,
            particles: file.particles,
            index: None,
            deposits: HashMap::new(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// A simple name is looked up in the fluid types first, in order, then
    /// as a `<ptype>_<kind>` deposit.
    fn resolve(&self, field: &FieldRef) -> Result<FieldSource> {
        let unknown = || DatasetError::UnknownField(field.to_string());
        match field {
            FieldRef::Simple(name) => self
                .info
                .fluid_types
                .iter()
                .find(|ftype| self.fields.contains_key(&((*ftype).clone(), name.clone())))
                .map(|ftype| FieldSource::Fluid(ftype.clone(), name.clone()))
                .or_else(|| self.resolve_deposit(name))
                .ok_or_else(unknown),
            FieldRef::Compound(category, name) if category == DEPOSIT_CATEGORY => {
                self.resolve_deposit(name).ok_or_else(unknown)
            }
            FieldRef::Compound(ftype, name) => {
                let key = (ftype.clone(), name.clone());
                if self.fields.contains_key(&key) {
                    Ok(FieldSource::Fluid(key.0, key.1))
                } else {
                    Err(unknown())
                }
            }
        }
    }

    fn resolve_deposit(&self, name: &str) -> Option<FieldSource> {
        let (ptype, kind) = name.rsplit_once('_')?;
        let kind = DepositKind::parse(kind)?;
        self.particles
            .contains_key(ptype)
            .then(|| FieldSource::Deposit(ptype.to_string(), kind))
    }

    /// Build the bin index and any deposit `source` needs.
    fn prepare(&mut self, source: &FieldSource) -> Result<()> {
        let bounds = self.info.domain.bbox();
        let cells = &self.cells;
        let index = self
            .index
            .get_or_insert_with(|| BinIndex::build(cells, bounds));

        if let FieldSource::Deposit(ptype, kind) = source {
            let key = (ptype.clone(), *kind);
            if !self.deposits.contains_key(&key) {
                let particles = self
                    .particles
                    .get(ptype)
                    .ok_or_else(|| DatasetError::UnknownField(ptype.clone()))?;
                let values = deposit(cells, index, particles, *kind)?;
                self.deposits.insert(key, values);
            }
        }
        Ok(())
    }

    fn values(&self, source: &FieldSource) -> Result<&[f64]> {
        let values = match source {
            FieldSource::Fluid(ftype, name) => self.fields.get(&(ftype.clone(), name.clone())),
            FieldSource::Deposit(ptype, kind) => self.deposits.get(&(ptype.clone(), *kind)),
        };
        values
            .map(|v| v.as_slice())
            .ok_or_else(|| DatasetError::Invalid(format!("values for {:?} not prepared", source)))
    }
}

fn check_len(name: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(DatasetError::ShapeMismatch {
            name: name.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

impl Dataset for InMemoryDataset {
    fn info(&self) -> &DatasetInfo {
        &self.info
    }

    fn has_field(&self, field: &FieldRef) -> bool {
        self.resolve(field).is_ok()
    }

    fn samples(&mut self, field: &FieldRef) -> Result<SampleSet<'_>> {
        let source = self.resolve(field)?;
        self.prepare(&source)?;
        let values = self.values(&source)?;
        Ok(self.cells.view(values))
    }

    fn pixelize(
        &mut self,
        field: &FieldRef,
        bbox: &BoundingBox,
        width: usize,
        height: usize,
    ) -> Result<Vec<f64>> {
        let source = self.resolve(field)?;
        self.prepare(&source)?;
        let candidates = match &self.index {
            Some(index) => index.query(bbox),
            None => (0..self.cells.len()).collect(),
        };
        let values = self.values(&source)?;
        pixelize(&self.cells.view(values), candidates, bbox, width, height)
    }
}
