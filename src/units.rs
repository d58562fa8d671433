use derive_more::{Add, AddAssign, Deref, DerefMut, Display, From, Into, Sub, SubAssign, Sum};
use std::ops::{Div, Mul, Neg};

/// A length in PDF points (1/72 of an inch). All page geometry is expressed in points,
/// with the origin at the bottom-left corner of the page.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    Deref,
    DerefMut,
    Display,
    From,
    Into,
)]
pub struct Pt(pub f32);

/// A length in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Display, From, Into)]
pub struct Mm(pub f32);

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt(mm.0 * 72.0 / 25.4)
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Self::Output {
        Pt(self.0 * rhs)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Self::Output {
        Pt(self.0 / rhs)
    }
}

impl Neg for Pt {
    type Output = Pt;

    fn neg(self) -> Self::Output {
        Pt(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millimetres_convert_to_points() {
        let a4_width: Pt = Mm(210.0).into();
        assert!((*a4_width - 595.2756).abs() < 0.001);
    }

    #[test]
    fn points_scale_and_offset() {
        let p = Pt(10.0) * 3.0 - Pt(5.0);
        assert_eq!(p, Pt(25.0));
        assert_eq!(p / 5.0, Pt(5.0));
        assert_eq!(-p, Pt(-25.0));
    }
}
