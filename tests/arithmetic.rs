//! Arithmetic identities of the transforms checked against exact rational arithmetic.

use num_cfrac::{
    BigBihomographic, Bihomographic, ContinuedFraction, Convergent, ErrorBound, Rational,
    TermArray,
};
use num_integer::Integer;
use num_rational::Ratio;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CASES: usize = 500;

fn random_ratio(rng: &mut StdRng) -> Ratio<i64> {
    Ratio::new(rng.gen_range(-1000..=1000), rng.gen_range(1..=1000))
}

fn terms(r: Ratio<i64>) -> Vec<i64> {
    Rational::try_from(r).unwrap().collect()
}

fn source(r: Ratio<i64>) -> Rational {
    Rational::try_from(r).unwrap()
}

#[test]
fn bihomographic_identities() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..CASES {
        let (x, y) = (random_ratio(&mut rng), random_ratio(&mut rng));
        let (sx, sy) = (source(x), source(y));

        assert_eq!(Bihomographic::sum(sx, sy).collect::<Vec<_>>(), terms(x + y), "{} + {}", x, y);
        assert_eq!(Bihomographic::difference(sx, sy).collect::<Vec<_>>(), terms(x - y), "{} - {}", x, y);
        assert_eq!(Bihomographic::product(sx, sy).collect::<Vec<_>>(), terms(x * y), "{} * {}", x, y);
        if y != Ratio::from(0) {
            assert_eq!(
                Bihomographic::quotient(sx, sy).collect::<Vec<_>>(),
                terms(x / y),
                "{} / {}",
                x,
                y
            );
        }
    }
}

#[test]
fn homographic_identities() {
    let mut rng = StdRng::seed_from_u64(0xcafe);
    for _ in 0..CASES {
        let x = random_ratio(&mut rng);
        let [a, b, c, d] = [(); 4].map(|_| rng.gen_range(-20..=20));
        let denom = Ratio::from(c) * x + Ratio::from(d);
        let h = source(x).homo(a, b, c, d);
        if denom == Ratio::from(0) {
            assert_eq!(h.count(), 0, "({}x + {}) / ({}x + {}) at {}", a, b, c, d, x);
        } else {
            let value = (Ratio::from(a) * x + Ratio::from(b)) / denom;
            assert_eq!(h.collect::<Vec<_>>(), terms(value), "{} at {}", value, x);
        }
    }
}

#[test]
fn composed_transforms() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..CASES / 5 {
        let (x, y) = (random_ratio(&mut rng), random_ratio(&mut rng));

        // 2 (x + y) + 1, through a boxed intermediate stream
        let sum = Bihomographic::sum(source(x), source(y)).boxed();
        let composed = sum.homo(2, 1, 0, 1);
        let expected = (x + y) * Ratio::from(2) + Ratio::from(1);
        assert_eq!(composed.collect::<Vec<_>>(), terms(expected));

        // (x * y) - x
        let product = Bihomographic::product(source(x), source(y));
        let composed = Bihomographic::difference(product, source(x));
        assert_eq!(composed.collect::<Vec<_>>(), terms(x * y - x));
    }
}

#[test]
fn clones_are_independent() {
    let x = TermArray::periodic(vec![1], vec![2]).unwrap();
    let mut z = Bihomographic::sum(x.clone(), x.homo(1, 1, 0, 1));
    assert_eq!(z.next(), Some(3));

    let copy = z.clone();
    let rest = z.take(8).collect::<Vec<_>>();
    assert_eq!(copy.take(8).collect::<Vec<_>>(), rest);
}

/// Sign of `p/q - n/d`, all denominators positive
fn side(c: &Convergent, x: Ratio<i64>) -> i128 {
    let lhs = i128::from(*c.value.numer()) * i128::from(*x.denom());
    let rhs = i128::from(*x.numer()) * i128::from(*c.value.denom());
    (lhs - rhs).signum()
}

#[test]
fn convergent_error_bounds() {
    let mut rng = StdRng::seed_from_u64(0xb0b);
    for _ in 0..CASES {
        let x = random_ratio(&mut rng);
        let items = source(x).convergents().collect::<Vec<_>>();
        assert_eq!(items.last().map(|c| c.value), Some(x));
        assert_eq!(items.last().map(|c| c.error), Some(ErrorBound::Exact));

        let mut last_side = 0;
        for c in &items {
            let (p, q) = (i128::from(*c.value.numer()), i128::from(*c.value.denom()));
            let (n, d) = (i128::from(*x.numer()), i128::from(*x.denom()));
            // |n/d - p/q| = gap / (d q)
            let gap = (n * q - p * d).unsigned_abs();
            let scale = (d * q).unsigned_abs();
            match c.error {
                ErrorBound::Within { lower, upper } => {
                    assert!(gap * lower > scale, "{} for {}", c.value, x);
                    assert!(gap * upper <= scale, "{} for {}", c.value, x);

                    // convergents alternate around the value
                    let s = side(c, x);
                    assert_ne!(s, last_side);
                    last_side = s;
                }
                ErrorBound::Exact => assert_eq!(gap, 0),
                ErrorBound::Unknown => unreachable!(),
            }
        }
    }
}

#[test]
fn digits_match_convergents() {
    let mut rng = StdRng::seed_from_u64(0xd1);
    for _ in 0..CASES {
        let x = random_ratio(&mut rng);
        let value = source(x).convergents().last().unwrap().value;

        let mut digits = source(x).decimals();
        let items = digits.by_ref().take(13).collect::<Vec<_>>();
        assert_eq!(digits.is_negative(), value < Ratio::from(0), "{}", x);

        // the digits read as a truncated decimal expansion of |x|
        let k = items.len() as u32 - 1;
        let shown = items[1..]
            .iter()
            .fold(i128::from(items[0].abs()), |acc, &d| acc * 10 + i128::from(d));
        let n = i128::from(value.numer().abs()) * 10i128.pow(k);
        let d = i128::from(*value.denom());
        assert!(shown * d <= n && n < (shown + 1) * d, "{} reads as {:?}", x, items);
        if items.len() < 13 {
            assert_eq!(shown * d, n);
        }
    }
}

/// Terms of `n / d`, wide enough for values built from huge coefficients
fn wide_terms(mut n: i128, mut d: i128) -> Vec<i128> {
    if d < 0 {
        n = -n;
        d = -d;
    }
    let mut terms = Vec::new();
    while d != 0 {
        let (q, r) = n.div_mod_floor(&d);
        terms.push(q);
        n = d;
        d = r;
    }
    terms
}

/// Random transforms of two rationals with coefficients close to `2^62`,
/// together with the exact expansion of their value
fn huge_cases(seed: u64) -> Vec<(Rational, Rational, [i64; 8], Vec<i128>)> {
    let k = (1i64 << 62) - 999;
    let pool = [0, 1, -1, 3, k, -k];
    let mut rng = StdRng::seed_from_u64(seed);
    (0..CASES)
        .map(|_| {
            let (x, y) = (random_ratio(&mut rng), random_ratio(&mut rng));
            let coeffs = [(); 8].map(|_| pool[rng.gen_range(0..pool.len())]);

            let [n1, d1, n2, d2] = [*x.numer(), *x.denom(), *y.numer(), *y.denom()].map(i128::from);
            let [a, b, c, d, e, f, g, h] = coeffs.map(i128::from);
            let num = a * n1 * n2 + b * n1 * d2 + c * n2 * d1 + d * d1 * d2;
            let den = e * n1 * n2 + f * n1 * d2 + g * n2 * d1 + h * d1 * d2;
            (source(x), source(y), coeffs, wide_terms(num, den))
        })
        .collect()
}

fn is_prefix(items: &[i64], exact: &[i128]) -> bool {
    items.len() <= exact.len() && items.iter().zip(exact).all(|(&t, &v)| i128::from(t) == v)
}

#[test]
fn huge_coefficients_finish() {
    for (x, y, coeffs, exact) in huge_cases(62) {
        let mut z = Bihomographic::new(x, y, coeffs);
        let items = z.by_ref().take(1000).collect::<Vec<_>>();
        assert!(items.len() < 1000, "{:?}", coeffs);
        assert!(z.is_finished());
        assert!(is_prefix(&items, &exact), "{:?} gave {:?}, exact {:?}", coeffs, items, exact);
    }
}

#[test]
fn huge_coefficients_capped() {
    for (x, y, coeffs, exact) in huge_cases(70) {
        let mut z = BigBihomographic::with_precision(x, y, coeffs, 70).unwrap();
        let items = z.by_ref().take(1000).collect::<Vec<_>>();
        assert!(items.len() < 1000, "{:?}", coeffs);
        assert!(z.is_finished());
        assert!(is_prefix(&items, &exact), "{:?} gave {:?}, exact {:?}", coeffs, items, exact);
    }
}
