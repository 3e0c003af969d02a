//! Configuration section definitions.
//!
//! Each section is a `#[serde(default)]` struct with its own `validate`.

mod cases;
mod nav;
mod partials;
mod scroll;
mod site;

pub use cases::CasesConfig;
pub use nav::NavConfig;
pub use partials::PartialsConfig;
pub use scroll::ScrollConfig;
pub use site::SiteSectionConfig;
