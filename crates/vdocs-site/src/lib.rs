//! Page assembly and table of contents for versioned documentation.
//!
//! This crate provides:
//! - [`Site`]: version resolution, source fetching and page rendering
//! - [`TableOfContents`]: the per-version `toc.json` manifest
//! - [`navigation`] and [`render_toc`]: navigation built from the manifest
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use vdocs_site::{Site, SiteConfig};
//! use vdocs_source::SourceFetcher;
//!
//! let site = Site::new(Arc::new(SourceFetcher::new()), SiteConfig::default());
//!
//! let page = site.page("1.12.1", "/introduction")?;
//! println!("{}", page.title);
//! # Ok(())
//! # }
//! ```

mod error;
mod nav;
mod site;
mod toc;

pub use error::SiteError;
pub use nav::{NavItem, navigation, render_toc};
pub use site::{Page, RawFile, Site, SiteConfig};
pub use toc::{TOC_PATH, TableOfContents, TocChild, TocItem, TocSection};
