//! Static site generator for brochure sites.
//!
//! Renders one page per configured language from a page skeleton, the
//! configured sections and the translation files.

pub mod assets;
pub mod builder;
pub mod sections;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, RenderedPage, Site, StaticBuilder};
pub use sections::SectionComposer;
pub use templates::{PageContext, RenderError, TemplateEngine};
