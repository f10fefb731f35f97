//! Reidemeister III: sliding a strand across a crossing.
//!
//! A site is three adjacent pairs `(x, x+1)`, `(y, y+1)`, `(z, z+1)` that
//! together visit three chords. Applying the move swaps each pair. Two chord
//! patterns are legal, each checked as read and with every pair reversed:
//!
//! ```text
//! triangular:    id(z+1) = id(x),  id(y) = id(x+1),  id(z) = id(y+1)
//! crossingular:  id(z) = id(x),    id(y) = id(x+1),  id(z+1) = id(y+1)
//! ```

use super::Move;
use crate::types::{Code, ElementModel};

/// Positions of one candidate site, in the orientation being tested.
#[derive(Debug, Clone, Copy)]
struct Site {
    x: usize,
    x_: usize,
    y: usize,
    y_: usize,
    z: usize,
    z_: usize,
}

impl Site {
    fn reversed(&self) -> Self {
        Self {
            x: self.x_,
            x_: self.x,
            y: self.y_,
            y_: self.y,
            z: self.z_,
            z_: self.z,
        }
    }
}

fn id(code: &Code, i: usize) -> u32 {
    code.elements()[i].id
}

fn sign(code: &Code, i: usize) -> i32 {
    code.elements()[i].sign_value()
}

fn over(code: &Code, i: usize) -> bool {
    code.elements()[i].is_over()
}

fn is_triangular(code: &Code, model: ElementModel, s: Site) -> bool {
    if id(code, s.z_) != id(code, s.x)
        || id(code, s.y) != id(code, s.x_)
        || id(code, s.z) != id(code, s.y_)
    {
        return false;
    }

    if !model.has_roles() {
        return sign(code, s.x) == sign(code, s.y)
            && sign(code, s.y) == sign(code, s.z)
            && sign(code, s.x_) == sign(code, s.y_)
            && sign(code, s.y_) == sign(code, s.z_)
            && sign(code, s.x) != sign(code, s.x_);
    }

    // two negatives and one positive
    if sign(code, s.x) + sign(code, s.x_) + sign(code, s.y_) != -1 {
        return false;
    }
    if !over(code, s.x) || !over(code, s.x_) {
        return false;
    }

    if over(code, s.y_) {
        sign(code, s.x) == 1
    } else {
        sign(code, s.x_) == 1
    }
}

fn is_crossingular(code: &Code, model: ElementModel, s: Site) -> bool {
    if id(code, s.z) != id(code, s.x)
        || id(code, s.y) != id(code, s.x_)
        || id(code, s.z_) != id(code, s.y_)
    {
        return false;
    }

    if !model.has_roles() {
        return sign(code, s.x) == sign(code, s.x_)
            && sign(code, s.y) == sign(code, s.y_)
            && sign(code, s.z) == sign(code, s.y)
            && sign(code, s.z_) == sign(code, s.x)
            && sign(code, s.x) != sign(code, s.y);
    }

    match sign(code, s.x) + sign(code, s.x_) + sign(code, s.y_) {
        -1 => {
            if sign(code, s.x_) != -1 || over(code, s.x) != over(code, s.y_) {
                return false;
            }
            let expected = match (over(code, s.x_), over(code, s.x)) {
                (true, true) => -1,
                (true, false) => 1,
                (false, true) => 1,
                (false, false) => -1,
            };
            sign(code, s.x) == expected
        }
        3 => {
            if over(code, s.x_) {
                over(code, s.x) && !over(code, s.y_)
            } else {
                !over(code, s.x) && over(code, s.y_)
            }
        }
        _ => false,
    }
}

/// Whether the move at `(x, y, z)` is legal.
pub fn can_r3(code: &Code, model: ElementModel, x: usize, y: usize, z: usize) -> bool {
    let n = code.len();
    let site = Site {
        x,
        x_: (x + 1) % n,
        y,
        y_: (y + 1) % n,
        z,
        z_: (z + 1) % n,
    };

    is_triangular(code, model, site)
        || is_crossingular(code, model, site)
        || is_triangular(code, model, site.reversed())
        || is_crossingular(code, model, site.reversed())
}

/// All legal R3 sites.
///
/// `y` runs cyclically from `x + 2` and `z` from `y + 2` so the three pairs
/// never overlap. Codes with fewer than three chords have no sites.
pub fn r3_sites(code: &Code, model: ElementModel) -> Vec<Move> {
    let n = code.len();
    let mut sites = Vec::new();
    if n < 6 {
        return sites;
    }

    for x in 0..n {
        let mut y = (x + 2) % n;
        while (y + 3) % n != x {
            let mut z = (y + 2) % n;
            while (z + 1) % n != x {
                if can_r3(code, model, x, y, z) {
                    sites.push(Move::R3 { x, y, z });
                }
                z = (z + 1) % n;
            }
            y = (y + 1) % n;
        }
    }
    sites
}

/// Swap each of `x`, `y`, `z` with its cyclic successor.
pub(crate) fn r3_apply(code: &Code, x: usize, y: usize, z: usize) -> Code {
    let n = code.len();
    let mut elements = code.elements().to_vec();
    for p in [x, y, z] {
        elements.swap(p, (p + 1) % n);
    }
    elements.into()
}
