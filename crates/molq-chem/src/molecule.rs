//! Molecular geometry.
//!
//! Geometries use the PySCF-style atom string: atoms separated by `;` or
//! newlines, each written as `Symbol x y z` with whitespace and/or commas
//! between fields. Coordinates are stored internally in Bohr.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::element::Element;
use crate::error::{ChemError, ChemResult};

/// Bohr radius in Angstrom (CODATA 2010, as used by PySCF).
pub const BOHR_ANGSTROM: f64 = 0.52917721092;

/// Closest allowed approach of two nuclei, in Bohr.
const MIN_SEPARATION: f64 = 1e-6;

/// Length unit of input coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Angstrom,
    Bohr,
}

impl DistanceUnit {
    /// Factor converting a length in this unit to Bohr.
    pub fn to_bohr(self) -> f64 {
        match self {
            DistanceUnit::Angstrom => 1.0 / BOHR_ANGSTROM,
            DistanceUnit::Bohr => 1.0,
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = ChemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "angstrom" | "a" | "ang" => Ok(DistanceUnit::Angstrom),
            "bohr" | "b" | "au" => Ok(DistanceUnit::Bohr),
            _ => Err(ChemError::UnknownUnit(s.to_string())),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::Angstrom => write!(f, "angstrom"),
            DistanceUnit::Bohr => write!(f, "bohr"),
        }
    }
}

/// An atom with its position in Bohr.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub position: Vector3<f64>,
}

impl Atom {
    pub fn new(element: Element, position: Vector3<f64>) -> Self {
        Self { element, position }
    }
}

/// An immutable collection of atoms with charge and spin.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    charge: i32,
    /// Number of unpaired electrons, 2S.
    spin: u32,
}

impl Molecule {
    /// Build a neutral singlet from atoms already expressed in Bohr.
    pub fn new(atoms: Vec<Atom>) -> ChemResult<Self> {
        if atoms.is_empty() {
            return Err(ChemError::EmptyGeometry);
        }
        for (i, a) in atoms.iter().enumerate() {
            for b in &atoms[..i] {
                if (a.position - b.position).norm() < MIN_SEPARATION {
                    return Err(ChemError::MalformedGeometry {
                        spec: format!("{} {}", a.element, fmt_position(&a.position)),
                        reason: format!("coincides with another {} nucleus", b.element),
                    });
                }
            }
        }
        Ok(Self {
            atoms,
            charge: 0,
            spin: 0,
        })
    }

    /// Parse a PySCF-style atom string.
    pub fn from_geometry(geometry: &str, unit: DistanceUnit) -> ChemResult<Self> {
        let scale = unit.to_bohr();
        let mut atoms = Vec::new();
        for spec in geometry.split([';', '\n']) {
            let spec = spec.trim();
            if spec.is_empty() {
                continue;
            }
            atoms.push(parse_atom(spec, scale)?);
        }
        Self::new(atoms)
    }

    /// H₂ along the z axis with the given bond length in Angstrom.
    pub fn h2(bond_length: f64) -> ChemResult<Self> {
        Self::from_geometry(
            &format!("H 0 0 0; H 0 0 {}", bond_length),
            DistanceUnit::Angstrom,
        )
    }

    pub fn with_charge(mut self, charge: i32) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_spin(mut self, spin: u32) -> Self {
        self.spin = spin;
        self
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    pub fn spin(&self) -> u32 {
        self.spin
    }

    /// Sum of nuclear charges minus the molecular charge.
    pub fn num_electrons(&self) -> ChemResult<usize> {
        let nuclear: i64 = self
            .atoms
            .iter()
            .map(|a| a.element.atomic_number() as i64)
            .sum();
        let electrons = nuclear - self.charge as i64;
        if electrons <= 0 {
            return Err(ChemError::InvalidElectronCount {
                charge: self.charge,
                electrons,
            });
        }
        Ok(electrons as usize)
    }

    /// Alpha and beta electron counts for the configured spin.
    pub fn num_alpha_beta(&self) -> ChemResult<(usize, usize)> {
        let n = self.num_electrons()?;
        let spin = self.spin as usize;
        if spin > n || (n - spin) % 2 != 0 {
            return Err(ChemError::OpenShell {
                electrons: n,
                spin: self.spin,
            });
        }
        let beta = (n - spin) / 2;
        Ok((beta + spin, beta))
    }

    /// Computes nuclear repulsion energy in Hartree.
    pub fn nuclear_repulsion(&self) -> f64 {
        let mut energy = 0.0;
        for (i, a) in self.atoms.iter().enumerate() {
            for b in &self.atoms[..i] {
                let distance = (a.position - b.position).norm();
                energy += a.element.nuclear_charge() * b.element.nuclear_charge() / distance;
            }
        }
        energy
    }
}

fn parse_atom(spec: &str, scale: f64) -> ChemResult<Atom> {
    let fields: Vec<&str> = spec
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|f| !f.is_empty())
        .collect();
    if fields.len() != 4 {
        return Err(ChemError::MalformedGeometry {
            spec: spec.to_string(),
            reason: format!("expected `symbol x y z`, found {} fields", fields.len()),
        });
    }
    let element: Element = fields[0].parse()?;
    let mut coords = [0.0; 3];
    for (slot, field) in coords.iter_mut().zip(&fields[1..]) {
        let value: f64 = field.parse().map_err(|_| ChemError::MalformedGeometry {
            spec: spec.to_string(),
            reason: format!("coordinate {:?} is not a number", field),
        })?;
        if !value.is_finite() {
            return Err(ChemError::MalformedGeometry {
                spec: spec.to_string(),
                reason: format!("coordinate {:?} is not finite", field),
            });
        }
        *slot = value * scale;
    }
    Ok(Atom::new(element, Vector3::new(coords[0], coords[1], coords[2])))
}

fn fmt_position(p: &Vector3<f64>) -> String {
    format!("{:.6} {:.6} {:.6}", p[0], p[1], p[2])
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            let p = atom.position * BOHR_ANGSTROM;
            write!(f, "{} {}", atom.element, fmt_position(&p))?;
        }
        Ok(())
    }
}
