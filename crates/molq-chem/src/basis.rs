//! Gaussian basis sets.
//!
//! STO-3G is generated from the universal Stewart contraction of a Slater
//! function with unit exponent, scaled by each element's Slater exponent ζ
//! (primitive exponent = base exponent × ζ²). This reproduces the tabulated
//! STO-3G exponents for H through Ne.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::element::Element;
use crate::error::{ChemError, ChemResult};
use crate::integrals::overlap_primitive;
use crate::molecule::Molecule;

const STO3G_1S_EXPONENTS: [f64; 3] = [2.227660584, 0.4057711562, 0.1098175104];
const STO3G_1S_COEFFS: [f64; 3] = [0.1543289673, 0.5353281423, 0.4446345422];
const STO3G_2SP_EXPONENTS: [f64; 3] = [0.9942027296, 0.2310313333, 0.07513856000];
const STO3G_2S_COEFFS: [f64; 3] = [-0.09996722919, 0.3995128261, 0.7001154689];
const STO3G_2P_COEFFS: [f64; 3] = [0.1559162750, 0.6076837186, 0.3919573931];

/// Slater exponents (1s, 2sp) of the STO-3G fit.
fn sto3g_zeta(element: Element) -> (f64, Option<f64>) {
    match element {
        Element::H => (1.24, None),
        Element::He => (1.69, None),
        Element::Li => (2.69, Some(0.80)),
        Element::Be => (3.68, Some(1.15)),
        Element::B => (4.68, Some(1.50)),
        Element::C => (5.67, Some(1.72)),
        Element::N => (6.67, Some(1.95)),
        Element::O => (7.66, Some(2.25)),
        Element::F => (8.65, Some(2.55)),
        Element::Ne => (9.64, Some(2.88)),
    }
}

/// Named basis set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasisSet {
    #[default]
    #[serde(rename = "sto3g", alias = "sto-3g", alias = "STO-3G", alias = "STO3G")]
    Sto3g,
}

impl BasisSet {
    pub fn name(&self) -> &'static str {
        match self {
            BasisSet::Sto3g => "sto3g",
        }
    }

    /// Contracted Cartesian functions centred on every atom, in atom order.
    /// Within an atom: 1s, 2s, 2px, 2py, 2pz.
    pub fn build(&self, molecule: &Molecule) -> ChemResult<Vec<BasisFunction>> {
        let mut functions = Vec::new();
        for atom in molecule.atoms() {
            match self {
                BasisSet::Sto3g => {
                    sto3g_functions(atom.element, atom.position, &mut functions)
                }
            }
        }
        if functions.is_empty() {
            return Err(ChemError::MissingBasisFunctions {
                basis: self.name().to_string(),
                element: molecule
                    .atoms()
                    .first()
                    .map(|a| a.element.to_string())
                    .unwrap_or_default(),
            });
        }
        Ok(functions)
    }
}

impl FromStr for BasisSet {
    type Err = ChemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "sto3g" => Ok(BasisSet::Sto3g),
            _ => Err(ChemError::UnknownBasis(s.to_string())),
        }
    }
}

impl fmt::Display for BasisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn sto3g_functions(element: Element, center: Vector3<f64>, out: &mut Vec<BasisFunction>) {
    let (zeta_1s, zeta_2sp) = sto3g_zeta(element);
    let scaled = |base: &[f64; 3], zeta: f64| -> Vec<f64> {
        base.iter().map(|a| a * zeta * zeta).collect()
    };

    out.push(BasisFunction::new(
        center,
        [0, 0, 0],
        scaled(&STO3G_1S_EXPONENTS, zeta_1s),
        STO3G_1S_COEFFS.to_vec(),
    ));

    if let Some(zeta) = zeta_2sp {
        let exponents = scaled(&STO3G_2SP_EXPONENTS, zeta);
        out.push(BasisFunction::new(
            center,
            [0, 0, 0],
            exponents.clone(),
            STO3G_2S_COEFFS.to_vec(),
        ));
        for shell in [[1, 0, 0], [0, 1, 0], [0, 0, 1]] {
            out.push(BasisFunction::new(
                center,
                shell,
                exponents.clone(),
                STO3G_2P_COEFFS.to_vec(),
            ));
        }
    }
}

/// A normalized contracted Cartesian Gaussian
/// `sum_k c_k x^l y^m z^n exp(-a_k r^2)` centred at `center`.
///
/// `coefficients` already include the primitive normalization constants
/// and the overall contraction normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisFunction {
    pub center: Vector3<f64>,
    pub shell: [i32; 3],
    pub exponents: Vec<f64>,
    pub coefficients: Vec<f64>,
}

impl BasisFunction {
    /// Normalize raw contraction coefficients for the given shell.
    pub fn new(center: Vector3<f64>, shell: [i32; 3], exponents: Vec<f64>, raw: Vec<f64>) -> Self {
        let coefficients: Vec<f64> = exponents
            .iter()
            .zip(&raw)
            .map(|(&a, &c)| c * primitive_norm(a, shell))
            .collect();
        let mut f = Self {
            center,
            shell,
            exponents,
            coefficients,
        };
        let norm = f.self_overlap().sqrt();
        for c in &mut f.coefficients {
            *c /= norm;
        }
        f
    }

    /// Total angular momentum l + m + n.
    pub fn angular_momentum(&self) -> i32 {
        self.shell.iter().sum()
    }

    /// `(exponent, coefficient)` pairs.
    pub fn primitives(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.exponents.iter().copied().zip(self.coefficients.iter().copied())
    }

    fn self_overlap(&self) -> f64 {
        let mut s = 0.0;
        for (a, ca) in self.primitives() {
            for (b, cb) in self.primitives() {
                s += ca
                    * cb
                    * overlap_primitive(a, self.shell, &self.center, b, self.shell, &self.center);
            }
        }
        s
    }
}

/// Normalization of a single Cartesian primitive.
fn primitive_norm(alpha: f64, shell: [i32; 3]) -> f64 {
    let l: i32 = shell.iter().sum();
    let denom: f64 = shell.iter().map(|&k| double_factorial(2 * k - 1)).product();
    (2.0 * alpha / std::f64::consts::PI).powf(0.75) * (4.0 * alpha).powf(l as f64 / 2.0)
        / denom.sqrt()
}

/// `n!!` with the convention `(-1)!! = 0!! = 1`.
pub(crate) fn double_factorial(n: i32) -> f64 {
    let mut result = 1.0;
    let mut k = n;
    while k > 1 {
        result *= k as f64;
        k -= 2;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::DistanceUnit;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_basis_names() {
        assert_eq!("sto3g".parse::<BasisSet>().unwrap(), BasisSet::Sto3g);
        assert_eq!("STO-3G".parse::<BasisSet>().unwrap(), BasisSet::Sto3g);
        assert!(matches!(
            "cc-pvdz".parse::<BasisSet>(),
            Err(ChemError::UnknownBasis(_))
        ));
    }

    #[test]
    fn test_hydrogen_exponents_match_tables() {
        let mol = Molecule::h2(0.735).unwrap();
        let functions = BasisSet::Sto3g.build(&mol).unwrap();
        assert_eq!(functions.len(), 2);
        let exps = &functions[0].exponents;
        assert_abs_diff_eq!(exps[0], 3.42525091, epsilon = 1e-6);
        assert_abs_diff_eq!(exps[1], 0.62391373, epsilon = 1e-6);
        assert_abs_diff_eq!(exps[2], 0.16885540, epsilon = 1e-6);
    }

    #[test]
    fn test_carbon_shells() {
        let mol = Molecule::from_geometry("C 0 0 0", DistanceUnit::Angstrom).unwrap();
        let functions = BasisSet::Sto3g.build(&mol).unwrap();
        assert_eq!(functions.len(), 5);
        assert_eq!(functions[4].shell, [0, 0, 1]);
        assert_abs_diff_eq!(functions[1].exponents[0], 2.9412494, epsilon = 1e-5);
        assert_abs_diff_eq!(functions[0].exponents[0], 71.6168370, epsilon = 1e-4);
    }

    #[test]
    fn test_functions_are_normalized() {
        let mol = Molecule::from_geometry("O 0 0 0", DistanceUnit::Angstrom).unwrap();
        for f in BasisSet::Sto3g.build(&mol).unwrap() {
            assert_abs_diff_eq!(f.self_overlap(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_double_factorial() {
        assert_eq!(double_factorial(-1), 1.0);
        assert_eq!(double_factorial(0), 1.0);
        assert_eq!(double_factorial(5), 15.0);
        assert_eq!(double_factorial(6), 48.0);
    }
}
