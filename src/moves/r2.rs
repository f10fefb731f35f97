//! Reidemeister II: two strands overlapping at a pair of crossings.

use super::{fresh_id, Move};
use crate::types::{Code, Element, ElementModel, Role, Sign};

/// Pairs `(x, y)` where `x, x+1` and `y, y+1` visit the same two chords.
///
/// The first pair must have opposite signs and, when roles exist, equal
/// roles. `x + 1` is never wrapped; `y + 1` is, but may not land on `x`.
pub fn r2_do_sites(code: &Code, model: ElementModel) -> Vec<Move> {
    let n = code.len();
    let els = code.elements();
    let mut sites = Vec::new();

    for x in 0..n.saturating_sub(2) {
        let (a, b) = (els[x], els[x + 1]);
        if a.sign == b.sign {
            continue;
        }
        if model.has_roles() && a.role != b.role {
            continue;
        }

        for y in (x + 2)..n {
            let y_next = (y + 1) % n;
            if y_next == x {
                continue;
            }
            let (c, d) = (els[y].id, els[y_next].id);
            if (a.id == d && b.id == c) || (a.id == c && b.id == d) {
                sites.push(Move::R2Do { x, y });
            }
        }
    }
    sites
}

/// Remove the elements at `x, x+1, y, y+1`.
pub(crate) fn r2_do_apply(code: &Code, x: usize, y: usize) -> Code {
    let n = code.len();
    let gone = [x, (x + 1) % n, y, (y + 1) % n];
    code.elements()
        .iter()
        .enumerate()
        .filter(|(i, _)| !gone.contains(i))
        .map(|(_, e)| *e)
        .collect::<Vec<_>>()
        .into()
}

/// Every overlap insertion, `x` in `0..max(n,1)` and `y` in `x..max(n,1)`.
pub fn r2_undo_sites(code: &Code, model: ElementModel) -> Vec<Move> {
    let span = code.len().max(1);
    let roles: &[bool] = if model.has_roles() { &[false, true] } else { &[false] };

    let mut sites = Vec::new();
    for x in 0..span {
        for y in x..span {
            for flip in [false, true] {
                for &first_over in roles {
                    for first_positive in [false, true] {
                        sites.push(Move::R2Undo { x, y, first_positive, first_over, flip });
                    }
                }
            }
        }
    }
    sites
}

/// Insert two fresh chords: the second visits before `y`, then the first
/// visits before `x`.
pub(crate) fn r2_undo_apply(
    code: &Code,
    model: ElementModel,
    (x, y): (usize, usize),
    first_positive: bool,
    first_over: bool,
    flip: bool,
) -> Code {
    let a_id = fresh_id(code);
    let role = if first_over && model.has_roles() { Role::Over } else { Role::Under };
    let first = Element::new(a_id, role, Sign::from_positive(first_positive));
    let second = Element::new(a_id + 1, role, Sign::from_positive(!first_positive));

    let (third, fourth) = if flip {
        (model.partner(second), model.partner(first))
    } else {
        (model.partner(first), model.partner(second))
    };

    let mut elements = code.elements().to_vec();
    let at_y = y.min(elements.len());
    elements.splice(at_y..at_y, [third, fourth]);
    let at_x = x.min(at_y);
    elements.splice(at_x..at_x, [first, second]);
    elements.into()
}
