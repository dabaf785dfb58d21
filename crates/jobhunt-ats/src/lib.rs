//! Jobhunt ATS - Applicant Tracking System boards.
//!
//! Two concerns live here, both specific to the supported vendors
//! (Greenhouse and Lever):
//!
//! - **Board parsing** ([`greenhouse`], [`lever`], [`board`]): turn a fetched
//!   board page into [`Posting`](jobhunt_core::Posting)s. Greenhouse serves
//!   two page generations, so its parser tries the embedded loader state
//!   first and falls back to the classic DOM.
//! - **Identity resolution** ([`resolver`]): find the board token, canonical
//!   board URL and vendor for a posting URL or a company name, using three
//!   escalating strategies.
//!
//! Network failures never escape this crate as hard errors: a board that
//! cannot be fetched yields no postings and an identity that cannot be
//! established is simply `None`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod board;
#[allow(missing_docs)]
pub mod error;
pub mod greenhouse;
pub mod lever;
pub mod resolver;

// Re-export commonly used types
pub use board::BoardScraper;
pub use error::{BoardError, ParseError};
pub use resolver::{AtsIdentity, AtsResolver, ResolutionStrategy};
