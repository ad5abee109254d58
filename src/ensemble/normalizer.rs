//! Quota normalization: exact-size, unique, in-range output lists.

use super::aggregator::Aggregate;
use crate::data::DrawScheme;

/// The two output lists after quota normalization.
///
/// Both are exactly `picks` long, duplicate-free, disjoint, and within
/// `[1, N]` — by construction, not by assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLists {
    pub recommended: Vec<u8>,
    pub alternative: Vec<u8>,
}

/// Restores the output-size invariant over an aggregate's lists.
///
/// Drops duplicates and out-of-range values, then backfills each list
/// to exactly `picks` elements: first from the ranked-candidate tail
/// (highest unused score first), then from the full range in ascending
/// unused order.
pub fn normalize(aggregate: &Aggregate, scheme: &DrawScheme) -> NormalizedLists {
    let mut used = vec![false; scheme.max_number as usize + 1];

    let recommended = fill(
        &aggregate.recommended,
        &aggregate.ranked,
        scheme,
        &mut used,
    );
    let alternative = fill(
        &aggregate.alternative,
        &aggregate.ranked,
        scheme,
        &mut used,
    );

    NormalizedLists {
        recommended,
        alternative,
    }
}

/// Builds one exact-size list, marking every taken value in `used`.
fn fill(
    preferred: &[u8],
    ranked: &[(u8, f64)],
    scheme: &DrawScheme,
    used: &mut [bool],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(scheme.picks);

    let mut take = |n: u8, out: &mut Vec<u8>, used: &mut [bool]| {
        if out.len() < scheme.picks
            && (1..=scheme.max_number).contains(&n)
            && !used[n as usize]
        {
            used[n as usize] = true;
            out.push(n);
        }
    };

    for &n in preferred {
        take(n, &mut out, used);
    }
    for &(n, _) in ranked {
        if out.len() == scheme.picks {
            break;
        }
        take(n, &mut out, used);
    }
    for n in 1..=scheme.max_number {
        if out.len() == scheme.picks {
            break;
        }
        take(n, &mut out, used);
    }
    out
}
