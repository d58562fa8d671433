//! Layout utilities for label pages.
//!
//! [`placement`] decides which sheet and which slot on that sheet each label goes
//! to; [`text`] fits field text into a label's width budget.
//!
//! # Example
//!
//! ```
//! use placard::layout::{plan, wrap, PageSizePolicy};
//!
//! let slot = plan(PageSizePolicy::A6, 5);
//! assert_eq!(slot.page_index, 1);
//!
//! let lines = wrap("Queijo minas frescal light", 100.0, 12.0);
//! assert!(lines.len() > 1);
//! ```

pub mod placement;
pub mod text;

pub use placement::*;
pub use text::*;
