//! Biography module - the per-user life-story document.
//!
//! # Components
//!
//! - `BiographyAggregate` - the document root and its mutations
//! - `BiographyNormalizer` - rebuilds a complete aggregate from any stored record
//! - `project` - the read-only view served to share-link visitors
//! - `catalog` - the section, voice and font choices with their display text
//! - Value objects: sections, timeline events, voice, customization

mod aggregate;
mod catalog;
mod customization;
mod normalizer;
mod projection;
mod section;
mod values;
mod voice;

pub use aggregate::{BiographyAggregate, DEFAULT_TITLE};
pub use catalog::{catalog, Catalog, FontEntry, SectionEntry, VoiceEntry};
pub use customization::{Customization, FontFamily};
pub use normalizer::BiographyNormalizer;
pub use projection::{project, NarrativeSource, PublicBiographyView};
pub use section::{LifeSection, LifeSectionKind};
pub use values::{PersonalInformation, TimelineEvent, Visibility};
pub use voice::Voice;
