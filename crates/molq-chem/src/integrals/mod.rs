//! One- and two-electron integrals over contracted Cartesian Gaussians.

mod boys;
mod md;

pub use boys::boys;
pub(crate) use md::overlap_primitive;

use nalgebra::DMatrix;
use ndarray::Array4;
use std::f64::consts::PI;

use crate::basis::BasisFunction;
use crate::molecule::Molecule;
use md::{PrimitivePair, contract_hermite, hermite_coulomb, kinetic_primitive, primitive_pairs};

/// Atomic-orbital integrals of one basis on one molecule.
#[derive(Debug, Clone)]
pub struct AoIntegrals {
    pub overlap: DMatrix<f64>,
    pub kinetic: DMatrix<f64>,
    pub nuclear: DMatrix<f64>,
    /// `(μν|λσ)` in chemists' notation.
    pub eri: Array4<f64>,
}

impl AoIntegrals {
    pub fn compute(basis: &[BasisFunction], molecule: &Molecule) -> Self {
        Self {
            overlap: overlap_matrix(basis),
            kinetic: kinetic_matrix(basis),
            nuclear: nuclear_matrix(basis, molecule),
            eri: eri_tensor(basis),
        }
    }

    /// Core Hamiltonian `T + V`.
    pub fn core_hamiltonian(&self) -> DMatrix<f64> {
        &self.kinetic + &self.nuclear
    }

    pub fn num_functions(&self) -> usize {
        self.overlap.nrows()
    }
}

fn symmetric_matrix(n: usize, mut element: impl FnMut(usize, usize) -> f64) -> DMatrix<f64> {
    let mut m = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in 0..=i {
            let value = element(i, j);
            m[(i, j)] = value;
            m[(j, i)] = value;
        }
    }
    m
}

pub fn overlap_matrix(basis: &[BasisFunction]) -> DMatrix<f64> {
    symmetric_matrix(basis.len(), |i, j| {
        let (f1, f2) = (&basis[i], &basis[j]);
        let mut s = 0.0;
        for (a, ca) in f1.primitives() {
            for (b, cb) in f2.primitives() {
                s += ca * cb * overlap_primitive(a, f1.shell, &f1.center, b, f2.shell, &f2.center);
            }
        }
        s
    })
}

pub fn kinetic_matrix(basis: &[BasisFunction]) -> DMatrix<f64> {
    symmetric_matrix(basis.len(), |i, j| {
        let (f1, f2) = (&basis[i], &basis[j]);
        let mut t = 0.0;
        for (a, ca) in f1.primitives() {
            for (b, cb) in f2.primitives() {
                t += ca * cb * kinetic_primitive(a, f1.shell, &f1.center, b, f2.shell, &f2.center);
            }
        }
        t
    })
}

/// Electron-nucleus attraction summed over all nuclei.
pub fn nuclear_matrix(basis: &[BasisFunction], molecule: &Molecule) -> DMatrix<f64> {
    symmetric_matrix(basis.len(), |i, j| {
        let pairs = primitive_pairs(&basis[i], &basis[j]);
        let l = (basis[i].angular_momentum() + basis[j].angular_momentum()) as usize;
        let mut v = 0.0;
        for pair in &pairs {
            for atom in molecule.atoms() {
                let pc = pair.center - atom.position;
                let r = hermite_coulomb(l, pair.exponent, &pc);
                v -= atom.element.nuclear_charge()
                    * pair.coefficient
                    * 2.0
                    * PI
                    / pair.exponent
                    * contract_hermite(pair, &r, [0, 0, 0], false);
            }
        }
        v
    })
}

/// Electron-repulsion tensor, evaluated once per symmetry-unique quartet and
/// scattered to all eight equivalent positions.
pub fn eri_tensor(basis: &[BasisFunction]) -> Array4<f64> {
    let n = basis.len();
    let mut pair_index = Vec::with_capacity(n * (n + 1) / 2);
    let mut pairs: Vec<Vec<PrimitivePair>> = Vec::with_capacity(n * (n + 1) / 2);
    for i in 0..n {
        for j in 0..=i {
            pair_index.push((i, j));
            pairs.push(primitive_pairs(&basis[i], &basis[j]));
        }
    }

    let mut eri = Array4::zeros((n, n, n, n));
    for (ij, &(i, j)) in pair_index.iter().enumerate() {
        for (kl, &(k, l)) in pair_index.iter().enumerate().take(ij + 1) {
            let lmax = (basis[i].angular_momentum()
                + basis[j].angular_momentum()
                + basis[k].angular_momentum()
                + basis[l].angular_momentum()) as usize;
            let value = contracted_eri(&pairs[ij], &pairs[kl], lmax);
            for (a, b, c, d) in [
                (i, j, k, l),
                (j, i, k, l),
                (i, j, l, k),
                (j, i, l, k),
                (k, l, i, j),
                (l, k, i, j),
                (k, l, j, i),
                (l, k, j, i),
            ] {
                eri[[a, b, c, d]] = value;
            }
        }
    }
    eri
}

fn contracted_eri(bra: &[PrimitivePair], ket: &[PrimitivePair], lmax: usize) -> f64 {
    let mut value = 0.0;
    for p1 in bra {
        for p2 in ket {
            let p = p1.exponent;
            let q = p2.exponent;
            let alpha = p * q / (p + q);
            let pq = p1.center - p2.center;
            let r = hermite_coulomb(lmax, alpha, &pq);
            let [lt, lu, lv] = p1.max_order();
            let mut sum = 0.0;
            for t in 0..=lt {
                for u in 0..=lu {
                    for v in 0..=lv {
                        let e_bra = p1.e[0][t] * p1.e[1][u] * p1.e[2][v];
                        if e_bra == 0.0 {
                            continue;
                        }
                        sum += e_bra * contract_hermite(p2, &r, [t, u, v], true);
                    }
                }
            }
            value += p1.coefficient * p2.coefficient * 2.0 * PI.powf(2.5)
                / (p * q * (p + q).sqrt())
                * sum;
        }
    }
    value
}
