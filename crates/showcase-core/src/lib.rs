// showcase-core: Carousel controller, course catalog and contact form logic.

pub mod carousel;
pub mod contact;
pub mod content;
pub mod error;

// ── Primary re-exports ──────────────────────────────────────────────
pub use carousel::{
    AutoplayPhase, AutoplayTick, Carousel, CarouselBuilder, CarouselSnapshot, ManualTicker, Origin,
    Step, TickScheduler, TokioTicker,
};
pub use contact::{ContactField, ContactForm, ContactMessage, FormStatus, MessageSender};
pub use content::{Catalog, Example, Glyph, Profile, Resource, Section, Skill, SkillCategory, Week};
pub use error::CoreError;
