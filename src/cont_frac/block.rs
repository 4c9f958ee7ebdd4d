use super::coefficient::{bounded, floor_div, mul_add, mul_sub, Coefficient};
use core::mem::swap;
use num_bigint::{BigInt, ToBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

#[inline]
fn same_sign<T: Signed>(a: &T, b: &T) -> bool {
    (a.is_positive() && b.is_positive()) || (a.is_negative() && b.is_negative())
}

/// `(p1 * x + p0, q1 * x + q0)` at both ends of `x` in `[t, t + 1]`
fn ends(p1: &BigInt, p0: &BigInt, q1: &BigInt, q0: &BigInt, t: &BigInt) -> [(BigInt, BigInt); 2] {
    let t1 = t + BigInt::one();
    [(p1 * t + p0, q1 * t + q0), (p1 * &t1 + p0, q1 * &t1 + q0)]
}

/// The integer part shared by every corner value `n / d`. Denominators must
/// be nonzero and of one sign, so the value between the corners stays
/// within their hull.
fn common_floor(corners: &[(BigInt, BigInt)]) -> Option<BigInt> {
    let (n0, d0) = corners.first()?;
    if !corners.iter().all(|(_, d)| same_sign(d, d0)) {
        return None;
    }

    let i = n0.div_floor(d0);
    if corners.iter().all(|(n, d)| n.div_floor(d) == i) { Some(i) } else { None }
}

/// A block on the magic table for homographic operation computation of continued fractions
/// The method is described in <https://crypto.stanford.edu/pbc/notes/contfrac/compute.html>
///
/// The block represents `(pm1 * x + pm2) / (qm1 * x + qm2)` where `x` is the
/// not yet consumed tail of the input. All moves are checked: a failed move
/// leaves the block untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<T> {
    pm1: T, // p_(k-1)
    pm2: T, // p_(k-2)
    qm1: T, // q_(k-1)
    qm2: T, // q_(k-2)
}

impl<T> Block<T> {
    /// create a block that represents (ax + b) / (cx + d)
    pub fn new(a: T, b: T, c: T, d: T) -> Self {
        Block { pm1: a, pm2: b, qm1: c, qm2: d }
    }

    /// push the latest convergent to the block
    pub fn update(&mut self, p: T, q: T) {
        swap(&mut self.pm2, &mut self.pm1); // self.pm2 = self.pm1
        swap(&mut self.qm2, &mut self.qm1); // self.qm2 = self.qm1
        self.pm1 = p;
        self.qm1 = q;
    }

    #[inline]
    pub fn coeffs(&self) -> [&T; 4] {
        [&self.pm1, &self.pm2, &self.qm1, &self.qm2]
    }
}

impl<T: Zero + One> Block<T> {
    /// create a block that represents a identity operation
    pub fn identity() -> Self {
        Block { pm1: T::one(), pm2: T::zero(), qm1: T::zero(), qm2: T::one() }
    }
}

impl<T: Coefficient> Block<T> {
    /// move with an coefficient from regular continued fraction
    pub fn checked_rmove(&self, a: &T, precision: Option<u32>) -> Option<(T, T)> {
        let p = mul_add(a, &self.pm1, &self.pm2, precision)?;
        let q = mul_add(a, &self.qm1, &self.qm2, precision)?;
        Some((p, q))
    }

    /// Consume one term of the input, returns false (and keeps the block) on overflow
    pub fn ingest(&mut self, a: &T, precision: Option<u32>) -> bool {
        match self.checked_rmove(a, precision) {
            Some((p, q)) => {
                self.update(p, q);
                true
            }
            None => false,
        }
    }

    /// move with two coefficients from generalized continued fraction,
    /// the block is reduced by the common divisor of its entries
    pub fn checked_gmove(&mut self, a: &T, b: &T, precision: Option<u32>) -> bool {
        let p = match self.pm1.checked_mul(b).and_then(|v| mul_add(a, &self.pm2, &v, precision)) {
            Some(p) => p,
            None => return false,
        };
        let q = match self.qm1.checked_mul(b).and_then(|v| mul_add(a, &self.qm2, &v, precision)) {
            Some(q) => q,
            None => return false,
        };

        let g = p.gcd(&q).gcd(&self.pm1).gcd(&self.qm1);
        if g > T::one() {
            self.pm1 = self.pm1.clone() / g.clone();
            self.qm1 = self.qm1.clone() / g.clone();
            self.update(p / g.clone(), q / g);
        } else {
            self.update(p, q);
        }
        true
    }

    /// The input ran out, so its tail is infinite and the value is `pm1 / qm1`
    pub fn ingest_infinite(&mut self) {
        self.pm2 = self.pm1.clone();
        self.qm2 = self.qm1.clone();
    }

    /// The denominator is the zero function, no more terms can be produced
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.qm1.is_zero() && self.qm2.is_zero()
    }

    #[inline]
    pub fn collapse(&mut self) {
        self.qm1 = T::zero();
        self.qm2 = T::zero();
    }

    #[inline]
    pub fn is_numerator_zero(&self) -> bool {
        self.pm1.is_zero() && self.pm2.is_zero()
    }

    /// Check whether the integer part is determined for every tail in `[0, inf]`
    /// If the two bounds have the same integer part i, then return it
    #[inline]
    pub fn check_integer(&self) -> Option<T> {
        if self.qm1.is_zero() || self.qm2.is_zero() || !same_sign(&self.qm1, &self.qm2) {
            return None;
        }

        let i1 = floor_div(&self.pm1, &self.qm1)?;
        let i2 = floor_div(&self.pm2, &self.qm2)?;
        if i1 == i2 { Some(i1) } else { None }
    }

    /// extract the integer part if the bounds agree, the block then
    /// represents the reciprocal of the fractional part
    pub fn reduce_integer(&mut self) -> Option<T> {
        let i = self.check_integer()?;
        let r1 = self.pm1.mod_floor(&self.qm1);
        let r2 = self.pm2.mod_floor(&self.qm2);
        swap(&mut self.pm1, &mut self.qm1); self.qm1 = r1;
        swap(&mut self.pm2, &mut self.qm2); self.qm2 = r2;
        Some(i)
    }

    /// extract the integer part if the bounds agree, the block then
    /// represents the fractional part itself
    pub fn reduce_remainder(&mut self) -> Option<T> {
        let i = self.check_integer()?;
        self.pm1 = self.pm1.mod_floor(&self.qm1);
        self.pm2 = self.pm2.mod_floor(&self.qm2);
        Some(i)
    }

    /// Replace the value `v` with `1 - v`
    pub fn complement(&mut self, precision: Option<u32>) -> bool {
        let p1 = self.qm1.checked_sub(&self.pm1).and_then(|v| bounded(v, precision));
        let p2 = self.qm2.checked_sub(&self.pm2).and_then(|v| bounded(v, precision));
        match (p1, p2) {
            (Some(p1), Some(p2)) => {
                self.pm1 = p1;
                self.pm2 = p2;
                true
            }
            _ => false,
        }
    }

    /// Multiply the value by `radix`
    pub fn checked_scale(&mut self, radix: &T, precision: Option<u32>) -> bool {
        let p1 = mul_add(radix, &self.pm1, &T::zero(), precision);
        let p2 = mul_add(radix, &self.pm2, &T::zero(), precision);
        match (p1, p2) {
            (Some(p1), Some(p2)) => {
                self.pm1 = p1;
                self.pm2 = p2;
                true
            }
            _ => false,
        }
    }

    /// Integer part of the value when the next input term is `t`, computed
    /// exactly for when moving with `t` overflows. The unconsumed tail then
    /// lies in `[t, t + 1]`, so the term is settled once both ends agree.
    pub fn settled_term(&self, t: &T) -> Option<BigInt> {
        let [a, b, c, d] = self.coeffs();
        common_floor(&ends(&a.to_bigint()?, &b.to_bigint()?, &c.to_bigint()?, &d.to_bigint()?, &t.to_bigint()?))
    }

    /// Emit `i` regardless of the bounds: the block becomes
    /// `1 / (v - i)`. Returns false (and keeps the block) on overflow
    pub fn checked_extract(&mut self, i: &T, precision: Option<u32>) -> bool {
        let r1 = mul_sub(&self.pm1, i, &self.qm1, precision);
        let r2 = mul_sub(&self.pm2, i, &self.qm2, precision);
        match (r1, r2) {
            (Some(r1), Some(r2)) => {
                swap(&mut self.pm1, &mut self.qm1); self.qm1 = r1;
                swap(&mut self.pm2, &mut self.qm2); self.qm2 = r2;
                true
            }
            _ => false,
        }
    }
}

/// A block on the magic table for bihomographic operation computation of continued fractions
/// The method is described in <https://crypto.stanford.edu/pbc/notes/contfrac/bihom.html>
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualBlock<T> {
    pm11: T, // p with a_(i-1), b_(j-1)  (a, the xy coefficient)
    pm12: T, // p with a_(i-1), b_(j-2)  (b, the x coefficient)
    pm21: T, // ..                       (c, the y coefficient)
    pm22: T, // ..                       (d, the constant)
    qm11: T, // q with a_(i-1), b_(j-1)  (e)
    qm12: T, // q with a_(i-1), b_(j-2)  (f)
    qm21: T, // ..                       (g)
    qm22: T, // ..                       (h)
}

/// Integer parts of the four corners of a [DualBlock], `None` where the
/// corner's denominator is zero
#[derive(Debug, Clone, PartialEq)]
pub struct Quotients<T> {
    pub ixy: Option<T>, // a / e
    pub ix: Option<T>,  // b / f
    pub iy: Option<T>,  // c / g
    pub i0: Option<T>,  // d / h
}

impl<T> DualBlock<T> {
    /// create a block that represents (axy + bx + cy + d)/(exy + fx + gy + h)
    #[allow(clippy::too_many_arguments)]
    pub fn new(a: T, b: T, c: T, d: T, e: T, f: T, g: T, h: T) -> Self {
        DualBlock {
            pm11: a, pm12: b, pm21: c, pm22: d,
            qm11: e, qm12: f, qm21: g, qm22: h
        }
    }

    /// push the latest convergent using x from right to the block
    pub fn update_right(&mut self, p1: T, q1: T, p2: T, q2: T) {
        swap(&mut self.pm21, &mut self.pm11); // self.pm21 = self.pm11
        swap(&mut self.qm21, &mut self.qm11); // self.qm21 = self.qm11
        self.pm11 = p1; self.qm11 = q1;

        swap(&mut self.pm22, &mut self.pm12); // self.pm22 = self.pm12
        swap(&mut self.qm22, &mut self.qm12); // self.qm22 = self.qm12
        self.pm12 = p2; self.qm12 = q2;
    }

    /// push the latest convergent using y from bottom to the block
    pub fn update_down(&mut self, p1: T, q1: T, p2: T, q2: T) {
        swap(&mut self.pm12, &mut self.pm11); // self.pm12 = self.pm11
        swap(&mut self.qm12, &mut self.qm11); // self.qm12 = self.qm11
        self.pm11 = p1; self.qm11 = q1;

        swap(&mut self.pm22, &mut self.pm21); // self.pm22 = self.pm21
        swap(&mut self.qm22, &mut self.qm21); // self.qm22 = self.qm21
        self.pm21 = p2; self.qm21 = q2;
    }

    /// coefficients in the order a, b, c, d, e, f, g, h
    #[inline]
    pub fn coeffs(&self) -> [&T; 8] {
        [
            &self.pm11, &self.pm12, &self.pm21, &self.pm22,
            &self.qm11, &self.qm12, &self.qm21, &self.qm22,
        ]
    }
}

impl<T: Coefficient> DualBlock<T> {
    /// move with an coefficient from the first regular continued fraction (x)
    pub fn checked_rmove_right(&self, a: &T, precision: Option<u32>) -> Option<(T, T, T, T)> {
        let p1 = mul_add(a, &self.pm11, &self.pm21, precision)?;
        let q1 = mul_add(a, &self.qm11, &self.qm21, precision)?;
        let p2 = mul_add(a, &self.pm12, &self.pm22, precision)?;
        let q2 = mul_add(a, &self.qm12, &self.qm22, precision)?;
        Some((p1, q1, p2, q2))
    }

    /// move with an coefficient from the second regular continued fraction (y)
    pub fn checked_rmove_down(&self, a: &T, precision: Option<u32>) -> Option<(T, T, T, T)> {
        let p1 = mul_add(a, &self.pm11, &self.pm12, precision)?;
        let q1 = mul_add(a, &self.qm11, &self.qm12, precision)?;
        let p2 = mul_add(a, &self.pm21, &self.pm22, precision)?;
        let q2 = mul_add(a, &self.qm21, &self.qm22, precision)?;
        Some((p1, q1, p2, q2))
    }

    /// Consume one term of x, returns false (and keeps the block) on overflow
    pub fn ingest_right(&mut self, a: &T, precision: Option<u32>) -> bool {
        match self.checked_rmove_right(a, precision) {
            Some((p1, q1, p2, q2)) => {
                self.update_right(p1, q1, p2, q2);
                true
            }
            None => false,
        }
    }

    /// Consume one term of y, returns false (and keeps the block) on overflow
    pub fn ingest_down(&mut self, a: &T, precision: Option<u32>) -> bool {
        match self.checked_rmove_down(a, precision) {
            Some((p1, q1, p2, q2)) => {
                self.update_down(p1, q1, p2, q2);
                true
            }
            None => false,
        }
    }

    /// x ran out: the block degenerates to `(ay + b) / (ey + f)`
    pub fn ingest_infinite_right(&mut self) {
        self.pm21 = self.pm11.clone();
        self.pm22 = self.pm12.clone();
        self.qm21 = self.qm11.clone();
        self.qm22 = self.qm12.clone();
    }

    /// y ran out: the block degenerates to `(ax + c) / (ex + g)`
    pub fn ingest_infinite_down(&mut self) {
        self.pm12 = self.pm11.clone();
        self.pm22 = self.pm21.clone();
        self.qm12 = self.qm11.clone();
        self.qm22 = self.qm21.clone();
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.qm11.is_zero() && self.qm12.is_zero() && self.qm21.is_zero() && self.qm22.is_zero()
    }

    #[inline]
    pub fn collapse(&mut self) {
        self.qm11 = T::zero();
        self.qm12 = T::zero();
        self.qm21 = T::zero();
        self.qm22 = T::zero();
    }

    /// Which of the denominators e, f, g, h are zero
    #[inline]
    pub fn zero_denominators(&self) -> [bool; 4] {
        [self.qm11.is_zero(), self.qm12.is_zero(), self.qm21.is_zero(), self.qm22.is_zero()]
    }

    pub fn quotients(&self) -> Quotients<T> {
        Quotients {
            ixy: floor_div(&self.pm11, &self.qm11),
            ix: floor_div(&self.pm12, &self.qm12),
            iy: floor_div(&self.pm21, &self.qm21),
            i0: floor_div(&self.pm22, &self.qm22),
        }
    }

    /// Check whether we should reduce integer from the corners
    /// Unlike the checking for single block, this is performed inplace (without new convergents)
    /// If all four corners have the same integer part i, then return it
    #[inline]
    pub fn check_integer(&self) -> Option<T> {
        let denoms = [&self.qm11, &self.qm12, &self.qm21, &self.qm22];
        if denoms.iter().any(|q| q.is_zero()) || !denoms.iter().all(|q| same_sign(*q, &self.qm11)) {
            return None;
        }

        let i = floor_div(&self.pm11, &self.qm11)?;
        if floor_div(&self.pm12, &self.qm12)? == i
            && floor_div(&self.pm21, &self.qm21)? == i
            && floor_div(&self.pm22, &self.qm22)? == i
        {
            Some(i)
        } else {
            None
        }
    }

    /// extract the integer part if all corners agree
    pub fn reduce_integer(&mut self) -> Option<T> {
        let i = self.check_integer()?;
        let r11 = self.pm11.mod_floor(&self.qm11);
        let r12 = self.pm12.mod_floor(&self.qm12);
        let r21 = self.pm21.mod_floor(&self.qm21);
        let r22 = self.pm22.mod_floor(&self.qm22);
        swap(&mut self.pm11, &mut self.qm11); self.qm11 = r11;
        swap(&mut self.pm12, &mut self.qm12); self.qm12 = r12;
        swap(&mut self.pm21, &mut self.qm21); self.qm21 = r21;
        swap(&mut self.pm22, &mut self.qm22); self.qm22 = r22;
        Some(i)
    }

    fn wide(&self) -> Option<[BigInt; 8]> {
        let [a, b, c, d, e, f, g, h] = self.coeffs();
        Some([
            a.to_bigint()?, b.to_bigint()?, c.to_bigint()?, d.to_bigint()?,
            e.to_bigint()?, f.to_bigint()?, g.to_bigint()?, h.to_bigint()?,
        ])
    }

    /// Integer part of the value when the next term of x is `t` and y is past
    /// its first term, computed exactly for when moving with `t` overflows.
    /// The tails then lie in `[t, t + 1] x [1, inf]`.
    pub fn settled_term_right(&self, t: &T) -> Option<BigInt> {
        let [a, b, c, d, e, f, g, h] = self.wide()?;
        let t = t.to_bigint()?;
        let [c1, c2] = ends(&a, &c, &e, &g, &t); // y = inf
        let [c3, c4] = ends(&(&a + &b), &(&c + &d), &(&e + &f), &(&g + &h), &t); // y = 1
        common_floor(&[c1, c2, c3, c4])
    }

    /// Same as [settled_term_right][DualBlock::settled_term_right], with the
    /// next term `t` taken from y and x past its first term
    pub fn settled_term_down(&self, t: &T) -> Option<BigInt> {
        let [a, b, c, d, e, f, g, h] = self.wide()?;
        let t = t.to_bigint()?;
        let [c1, c2] = ends(&a, &b, &e, &f, &t); // x = inf
        let [c3, c4] = ends(&(&a + &c), &(&b + &d), &(&e + &g), &(&f + &h), &t); // x = 1
        common_floor(&[c1, c2, c3, c4])
    }

    /// Emit `i` regardless of the corners. Returns false (and keeps the block) on overflow
    pub fn checked_extract(&mut self, i: &T, precision: Option<u32>) -> bool {
        let r11 = mul_sub(&self.pm11, i, &self.qm11, precision);
        let r12 = mul_sub(&self.pm12, i, &self.qm12, precision);
        let r21 = mul_sub(&self.pm21, i, &self.qm21, precision);
        let r22 = mul_sub(&self.pm22, i, &self.qm22, precision);
        match (r11, r12, r21, r22) {
            (Some(r11), Some(r12), Some(r21), Some(r22)) => {
                swap(&mut self.pm11, &mut self.qm11); self.qm11 = r11;
                swap(&mut self.pm12, &mut self.qm12); self.qm12 = r12;
                swap(&mut self.pm21, &mut self.qm21); self.qm21 = r21;
                swap(&mut self.pm22, &mut self.qm22); self.qm22 = r22;
                true
            }
            _ => false,
        }
    }
}
