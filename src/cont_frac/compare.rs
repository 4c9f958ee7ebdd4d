use crate::traits::ContinuedFraction;
use core::cmp::Ordering;

/// Number of heading terms [compare] looks at by default
pub const DEFAULT_COMPARE_LIMIT: usize = 100;

/// Order of two terms at the same position, an ended stream acts as an infinite term
fn term_cmp(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare the values of two continued fractions by their first `limit` terms.
///
/// The streams are cloned, so neither argument is advanced. A larger term at
/// an even position means a larger value, at an odd position a smaller one.
/// Values agreeing on all the terms looked at compare as equal.
pub fn compare<X, Y>(x: &X, y: &Y, limit: usize) -> Ordering
where
    X: ContinuedFraction + ?Sized,
    Y: ContinuedFraction + ?Sized,
{
    let mut x = dyn_clone::clone_box(x);
    let mut y = dyn_clone::clone_box(y);
    for k in 0..limit {
        let (a, b) = (x.next(), y.next());
        let both_ended = a.is_none() && b.is_none();
        let ord = term_cmp(a, b);
        if ord != Ordering::Equal {
            return if k % 2 == 0 { ord } else { ord.reverse() };
        }
        if both_ended {
            break;
        }
    }
    Ordering::Equal
}
