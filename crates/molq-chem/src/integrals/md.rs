//! McMurchie-Davidson Hermite expansions.
//!
//! A product of two Cartesian Gaussians is expanded in Hermite Gaussians
//! centred at the Gaussian product centre P. `hermite_e` gives the expansion
//! coefficients along one axis and `hermite_coulomb` the Hermite Coulomb
//! integrals `R_{tuv}` needed for nuclear attraction and electron repulsion.

use nalgebra::Vector3;
use ndarray::Array4;
use std::f64::consts::PI;

use super::boys::boys;
use crate::basis::BasisFunction;

/// Hermite expansion coefficient `E_t^{ij}` for one Cartesian axis.
///
/// `qx` is the separation `A_x - B_x` of the two centres, `a` and `b` the
/// primitive exponents.
pub fn hermite_e(i: i32, j: i32, t: i32, qx: f64, a: f64, b: f64) -> f64 {
    let p = a + b;
    let q = a * b / p;
    if t < 0 || t > i + j || i < 0 || j < 0 {
        0.0
    } else if i == 0 && j == 0 && t == 0 {
        (-q * qx * qx).exp()
    } else if j == 0 {
        (1.0 / (2.0 * p)) * hermite_e(i - 1, j, t - 1, qx, a, b)
            - (q * qx / a) * hermite_e(i - 1, j, t, qx, a, b)
            + (t + 1) as f64 * hermite_e(i - 1, j, t + 1, qx, a, b)
    } else {
        (1.0 / (2.0 * p)) * hermite_e(i, j - 1, t - 1, qx, a, b)
            + (q * qx / b) * hermite_e(i, j - 1, t, qx, a, b)
            + (t + 1) as f64 * hermite_e(i, j - 1, t + 1, qx, a, b)
    }
}

/// Table of Hermite Coulomb integrals `R^n_{tuv}` for all `t + u + v <= l`.
///
/// Only the `n = 0` slice is consumed by callers; the higher orders are the
/// intermediates of the recursion. `pc` is the vector from the charge (or
/// second product centre) to the first product centre.
pub fn hermite_coulomb(l: usize, p: f64, pc: &Vector3<f64>) -> Array4<f64> {
    let t_arg = p * pc.norm_squared();
    let mut r = Array4::<f64>::zeros((l + 1, l + 1, l + 1, l + 1));
    for n in (0..=l).rev() {
        r[[n, 0, 0, 0]] = (-2.0 * p).powi(n as i32) * boys(n, t_arg);
        let order = l - n;
        for t in 0..=order {
            for u in 0..=(order - t) {
                for v in 0..=(order - t - u) {
                    if t + u + v == 0 {
                        continue;
                    }
                    let value = if t > 0 {
                        let mut value = pc[0] * r[[n + 1, t - 1, u, v]];
                        if t > 1 {
                            value += (t - 1) as f64 * r[[n + 1, t - 2, u, v]];
                        }
                        value
                    } else if u > 0 {
                        let mut value = pc[1] * r[[n + 1, t, u - 1, v]];
                        if u > 1 {
                            value += (u - 1) as f64 * r[[n + 1, t, u - 2, v]];
                        }
                        value
                    } else {
                        let mut value = pc[2] * r[[n + 1, t, u, v - 1]];
                        if v > 1 {
                            value += (v - 1) as f64 * r[[n + 1, t, u, v - 2]];
                        }
                        value
                    };
                    r[[n, t, u, v]] = value;
                }
            }
        }
    }
    r
}

/// Overlap of two primitive Cartesian Gaussians (unnormalized).
pub fn overlap_primitive(
    a: f64,
    lmn1: [i32; 3],
    center_a: &Vector3<f64>,
    b: f64,
    lmn2: [i32; 3],
    center_b: &Vector3<f64>,
) -> f64 {
    let mut s = (PI / (a + b)).powf(1.5);
    for axis in 0..3 {
        s *= hermite_e(
            lmn1[axis],
            lmn2[axis],
            0,
            center_a[axis] - center_b[axis],
            a,
            b,
        );
    }
    s
}

/// Kinetic energy of two primitive Cartesian Gaussians, written in terms of
/// overlaps with the angular momentum of the ket raised and lowered by two.
pub fn kinetic_primitive(
    a: f64,
    lmn1: [i32; 3],
    center_a: &Vector3<f64>,
    b: f64,
    lmn2: [i32; 3],
    center_b: &Vector3<f64>,
) -> f64 {
    let shifted = |axis: usize, delta: i32| {
        let mut lmn = lmn2;
        lmn[axis] += delta;
        overlap_primitive(a, lmn1, center_a, b, lmn, center_b)
    };
    let total: i32 = lmn2.iter().sum();
    let mut value = b * (2 * total + 3) as f64 * overlap_primitive(a, lmn1, center_a, b, lmn2, center_b);
    for axis in 0..3 {
        value -= 2.0 * b * b * shifted(axis, 2);
        let l = lmn2[axis];
        if l >= 2 {
            value -= 0.5 * (l * (l - 1)) as f64 * shifted(axis, -2);
        }
    }
    value
}

/// One primitive pair of a product of two contracted functions, with its
/// Hermite coefficients along each axis precomputed.
#[derive(Debug, Clone)]
pub struct PrimitivePair {
    pub exponent: f64,
    pub center: Vector3<f64>,
    pub coefficient: f64,
    pub e: [Vec<f64>; 3],
}

impl PrimitivePair {
    /// Highest Hermite index along each axis.
    pub fn max_order(&self) -> [usize; 3] {
        [self.e[0].len() - 1, self.e[1].len() - 1, self.e[2].len() - 1]
    }
}

/// Expand the product of two contracted functions into primitive pairs.
pub fn primitive_pairs(f1: &BasisFunction, f2: &BasisFunction) -> Vec<PrimitivePair> {
    let separation = f1.center - f2.center;
    let mut pairs = Vec::with_capacity(f1.exponents.len() * f2.exponents.len());
    for (a, ca) in f1.primitives() {
        for (b, cb) in f2.primitives() {
            let p = a + b;
            let e = std::array::from_fn(|axis| {
                let (i, j) = (f1.shell[axis], f2.shell[axis]);
                (0..=(i + j))
                    .map(|t| hermite_e(i, j, t, separation[axis], a, b))
                    .collect()
            });
            pairs.push(PrimitivePair {
                exponent: p,
                center: (f1.center * a + f2.center * b) / p,
                coefficient: ca * cb,
                e,
            });
        }
    }
    pairs
}

/// `Σ_{tuv} E_t E_u E_v R_{t+t0, u+u0, v+v0}` with an optional sign per
/// Hermite order, the inner contraction shared by the Coulomb integrals.
pub(crate) fn contract_hermite(
    pair: &PrimitivePair,
    r: &Array4<f64>,
    offset: [usize; 3],
    alternate_sign: bool,
) -> f64 {
    let [lt, lu, lv] = pair.max_order();
    let mut sum = 0.0;
    for t in 0..=lt {
        let et = pair.e[0][t];
        if et == 0.0 {
            continue;
        }
        for u in 0..=lu {
            let eu = pair.e[1][u];
            if eu == 0.0 {
                continue;
            }
            for v in 0..=lv {
                let mut term = et * eu * pair.e[2][v] * r[[0, t + offset[0], u + offset[1], v + offset[2]]];
                if alternate_sign && (t + u + v) % 2 == 1 {
                    term = -term;
                }
                sum += term;
            }
        }
    }
    sum
}
