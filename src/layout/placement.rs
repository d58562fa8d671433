//! Where each label lands on the physical sheets.

use crate::pagesize::{self, PageSize};
use crate::units::Pt;
use std::fmt;
use std::str::FromStr;

/// How labels are arranged on printed sheets. A5 and A6 subdivide an A4 sheet; the
/// other policies print one label per sheet.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum PageSizePolicy {
    A3,
    A3Plus,
    #[default]
    A4,
    A5,
    A6,
}

impl PageSizePolicy {
    pub const ALL: [PageSizePolicy; 5] = [
        PageSizePolicy::A3,
        PageSizePolicy::A3Plus,
        PageSizePolicy::A4,
        PageSizePolicy::A5,
        PageSizePolicy::A6,
    ];

    /// The sheet that actually goes through the printer
    pub fn physical_page(&self) -> PageSize {
        match self {
            PageSizePolicy::A3 => pagesize::A3,
            PageSizePolicy::A3Plus => pagesize::A3_PLUS,
            PageSizePolicy::A4 | PageSizePolicy::A5 | PageSizePolicy::A6 => pagesize::A4,
        }
    }

    pub fn labels_per_page(&self) -> usize {
        match self {
            PageSizePolicy::A5 => 2,
            PageSizePolicy::A6 => 4,
            _ => 1,
        }
    }

    pub fn label_size(&self) -> PageSize {
        let (w, h) = self.physical_page();
        match self {
            PageSizePolicy::A5 => (w / 2.0, h),
            PageSizePolicy::A6 => (w / 2.0, h / 2.0),
            _ => (w, h),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageSizePolicy::A3 => "A3",
            PageSizePolicy::A3Plus => "A3+",
            PageSizePolicy::A4 => "A4",
            PageSizePolicy::A5 => "A5",
            PageSizePolicy::A6 => "A6",
        }
    }
}

impl fmt::Display for PageSizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageSizePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        PageSizePolicy::ALL
            .into_iter()
            .find(|policy| policy.as_str() == wanted)
            .ok_or_else(|| format!("unknown page size {s:?}"))
    }
}

/// The label slot assigned to one record
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Placement {
    /// Zero-based physical page
    pub page_index: usize,
    pub origin_x: Pt,
    pub origin_y: Pt,
    pub width: Pt,
    pub height: Pt,
    /// Whether this label is the first on a fresh sheet (never true for the first label)
    pub new_page: bool,
}

/// Place the label at zero-based sequence position `index`
pub fn plan(policy: PageSizePolicy, index: usize) -> Placement {
    let per_page = policy.labels_per_page();
    let (width, height) = policy.label_size();
    let slot = index % per_page;

    let (origin_x, origin_y) = match policy {
        PageSizePolicy::A5 => (width * slot as f32, Pt(0.0)),
        PageSizePolicy::A6 => {
            let column = slot % 2;
            let row = slot / 2;
            (width * column as f32, height * (1 - row) as f32)
        }
        _ => (Pt(0.0), Pt(0.0)),
    };

    Placement {
        page_index: index / per_page,
        origin_x,
        origin_y,
        width,
        height,
        new_page: index > 0 && slot == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy_names() {
        assert_eq!("A3+".parse::<PageSizePolicy>(), Ok(PageSizePolicy::A3Plus));
        assert_eq!("a6".parse::<PageSizePolicy>(), Ok(PageSizePolicy::A6));
        assert!("Letter".parse::<PageSizePolicy>().is_err());
    }

    #[test]
    fn a6_fills_quadrants_top_row_first() {
        let (w, h) = PageSizePolicy::A6.label_size();
        let placements: Vec<Placement> = (0..8).map(|i| plan(PageSizePolicy::A6, i)).collect();

        let pages: Vec<usize> = placements.iter().map(|p| p.page_index).collect();
        assert_eq!(pages, vec![0, 0, 0, 0, 1, 1, 1, 1]);

        let origins: Vec<(Pt, Pt)> = placements
            .iter()
            .take(4)
            .map(|p| (p.origin_x, p.origin_y))
            .collect();
        assert_eq!(
            origins,
            vec![(Pt(0.0), h), (w, h), (Pt(0.0), Pt(0.0)), (w, Pt(0.0))]
        );

        let breaks: Vec<bool> = placements.iter().map(|p| p.new_page).collect();
        assert_eq!(
            breaks,
            vec![false, false, false, false, true, false, false, false]
        );
    }

    #[test]
    fn a5_is_two_columns() {
        let first = plan(PageSizePolicy::A5, 0);
        let second = plan(PageSizePolicy::A5, 1);
        let third = plan(PageSizePolicy::A5, 2);
        assert_eq!(second.origin_x, first.width);
        assert_eq!(first.height, pagesize::A4.1);
        assert_eq!(third.page_index, 1);
        assert!(third.new_page);
    }

    #[test]
    fn single_label_policies_break_every_time() {
        for policy in [PageSizePolicy::A3, PageSizePolicy::A3Plus, PageSizePolicy::A4] {
            assert!(!plan(policy, 0).new_page);
            for i in 1..5 {
                let placement = plan(policy, i);
                assert!(placement.new_page);
                assert_eq!(placement.page_index, i);
                assert_eq!((placement.width, placement.height), policy.physical_page());
            }
        }
    }
}
