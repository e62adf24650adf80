//! Data models for detection and anonymization

mod entity;
mod span;

pub use entity::EntityKind;
pub use span::{AnonymizedText, DetectionMethod, Span};
