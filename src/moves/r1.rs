//! Reidemeister I: a kink with a single crossing.

use super::{fresh_id, Move};
use crate::types::{Code, Element, ElementModel, Role, Sign};

/// Positions `x` where `x` and `x + 1` visit the same chord.
///
/// In a two-element code positions 0 and 1 name the same kink, so only
/// position 0 is reported.
pub fn r1_do_sites(code: &Code) -> Vec<Move> {
    let n = code.len();
    if n < 2 {
        return Vec::new();
    }

    let last = if n == 2 { 1 } else { n };
    (0..last)
        .filter(|&x| code.at(x).id == code.at(x + 1).id)
        .map(|x| Move::R1Do { x })
        .collect()
}

/// Remove the elements at `x` and `x + 1`.
pub(crate) fn r1_do_apply(code: &Code, x: usize) -> Code {
    let n = code.len();
    code.elements()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != x && *i != (x + 1) % n)
        .map(|(_, e)| *e)
        .collect::<Vec<_>>()
        .into()
}

/// Every kink insertion, at positions `0..=n`.
pub fn r1_undo_sites(code: &Code, model: ElementModel) -> Vec<Move> {
    let roles: &[bool] = if model.has_roles() { &[false, true] } else { &[false] };

    let mut sites = Vec::with_capacity((code.len() + 1) * roles.len() * 2);
    for x in 0..=code.len() {
        for &first_over in roles {
            for positive in [false, true] {
                sites.push(Move::R1Undo { x, positive, first_over });
            }
        }
    }
    sites
}

/// Insert a fresh chord's two visits before position `x`.
pub(crate) fn r1_undo_apply(
    code: &Code,
    model: ElementModel,
    x: usize,
    positive: bool,
    first_over: bool,
) -> Code {
    let role = if first_over && model.has_roles() { Role::Over } else { Role::Under };
    let first = Element::new(fresh_id(code), role, Sign::from_positive(positive));
    let second = model.partner(first);

    let mut elements = code.elements().to_vec();
    let at = x.min(elements.len());
    elements.splice(at..at, [first, second]);
    elements.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn code(s: &str) -> Code {
        Code::parse(s).unwrap()
    }

    #[test]
    fn test_single_kink_has_one_do_site() {
        let kink = code("O+0U-0");
        let sites = r1_do_sites(&kink);
        assert_eq!(sites, vec![Move::R1Do { x: 0 }]);
        assert!(sites[0].apply_canonical(&kink, ElementModel::Oriented).is_empty());
    }

    #[test]
    fn test_no_do_sites_without_adjacent_pair() {
        assert!(r1_do_sites(&code("U-0U+1O-0O+1")).is_empty());
        assert!(r1_do_sites(&Code::empty()).is_empty());
    }

    #[test]
    fn test_undo_site_count() {
        let trefoil = code("O+0U+1O+2U+0O+1U+2");
        assert_eq!(r1_undo_sites(&trefoil, ElementModel::Oriented).len(), 4 * 7);
        assert_eq!(r1_undo_sites(&trefoil, ElementModel::Flat).len(), 2 * 7);
        assert_eq!(r1_undo_sites(&Code::empty(), ElementModel::Oriented).len(), 4);
    }

    #[test]
    fn test_undo_from_empty() {
        let found: BTreeSet<String> = r1_undo_sites(&Code::empty(), ElementModel::Oriented)
            .iter()
            .map(|m| m.apply_canonical(&Code::empty(), ElementModel::Oriented).to_string())
            .collect();
        assert_eq!(found, BTreeSet::from(["U+0O+0".to_string(), "U-0O-0".to_string()]));
    }

    #[test]
    fn test_flat_undo_pairs_opposite_signs() {
        let raw = r1_undo_apply(&Code::empty(), ElementModel::Flat, 0, true, false);
        assert_eq!(raw.to_string(), "U+0U-0");
    }

    #[test]
    fn test_fresh_id_follows_max() {
        let c = code("U-0U+1O-0O+1");
        let raw = r1_undo_apply(&c, ElementModel::Oriented, 2, true, true);
        assert_eq!(raw.elements()[2], Element::over(2, Sign::Positive));
        assert_eq!(raw.elements()[3], Element::under(2, Sign::Positive));
    }
}
