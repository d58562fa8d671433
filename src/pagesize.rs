//! Physical sheet sizes that labels are printed on.
//!
//! All sizes are portrait, (width, height) in points.

use crate::units::*;

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
/// "Super A3", the oversized sheet used by wide-format printers
pub const A3_PLUS: PageSize = (Pt(329.0 * 72.0 / 25.4), Pt(483.0 * 72.0 / 25.4));
pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
