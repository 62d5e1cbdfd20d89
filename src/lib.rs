//! Deterministic shader-variant composition.
//!
//! Given a declarative description of a desired rendering effect
//! ([`effects::EffectConfig`]) and a read-only inventory of what a draw
//! batch actually has available ([`resources::BatchResources`]), the
//! [`compose::compose`] engine either synthesises a complete, internally
//! consistent pair of GPU shader programs (vertex + fragment, plus an
//! instanced vertex variant where applicable) as GLSL source text with full
//! interface descriptors, or fails with a precise diagnostic and a
//! *repaired* configuration the caller can retry with.
//!
//! The engine is a pure decision tree: no I/O, no logging, no shared state,
//! bounded depth. Compilation and pipeline binding of the produced source is
//! a downstream concern; [`validation`] offers naga-based checking of the
//! emitted GLSL for callers and tests.

pub mod compose;
pub mod effects;
pub mod glsl;
pub mod resources;
pub mod symbols;
pub mod validation;

pub use compose::{ComposeError, ComposedShaders, FragmentStage, VertexStage, compose};
pub use effects::{
    DataSourceKind, EffectConfig, FogType, LightType, LightingDataKind, ShaderOutputType,
};
pub use glsl::{GlslDialect, StageKind};
pub use resources::{BatchResources, SkeletalBinding, SkinResources, TextureBinding};
