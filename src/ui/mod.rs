//! Study screen rendering.
//!
//! Nothing here touches the terminal. A frame is built as one ANSI string in
//! two passes:
//!
//! ```text
//! StudySession ──compute_viewmodel──► StudyViewModel ──components──► String
//! ```
//!
//! The view model holds plain data (clipped strings, page numbers, match
//! positions), so layout code never reads session state directly.
//!
//! - [`viewmodel`]: data the screen shows
//! - [`components`]: one renderer per screen region
//! - [`helpers`]: width, wrapping and highlight utilities
//! - [`theme`]: palettes and escapes
//! - [`renderer`]: entry points

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel};
pub use theme::Theme;
pub use viewmodel::{CardView, EmptyState, FooterInfo, HeaderInfo, StudyViewModel, TermListView, TermRow};
