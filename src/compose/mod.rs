//! Composition decision engine.
//!
//! `compose` walks the effect configuration, cross-checks it against what
//! the target draw batch actually has available, and either emits a complete
//! (vertex, optional instanced vertex, fragment) GLSL program triple with
//! matching stage interfaces, or fails with a diagnostic plus a repaired
//! configuration the caller can retry with.
//!
//! The engine is a pure function: it reads only its inputs, holds no state,
//! never logs and never retries internally. The decision tree is ordered and
//! first-match-wins; every failure's repair is strictly closer to a
//! known-good leaf, so retrying with the repaired configuration always
//! converges.

mod ambient;
mod directional;
mod emit;
mod interface;
mod normal_map;
mod types;
mod unlit;

pub use types::{ComposeError, ComposedShaders, FragmentStage, VertexStage};

use std::collections::BTreeSet;

use crate::effects::{DataSourceKind, EffectConfig, FogType, LightType, LightingDataKind, ShaderOutputType};
use crate::glsl::GlslDialect;
use crate::resources::{BatchResources, SkinResources};
use crate::symbols::VertexInputLocation;

/// Location-derived unique identifier for one composed shader stage, used as
/// a cache key by callers. Each decision-tree leaf names its stages at its
/// own call sites so the identifiers stay distinct and stable.
macro_rules! leaf_uid {
    () => {
        concat!(file!(), "[", line!(), "]")
    };
}
pub(crate) use leaf_uid;

/// Build a `ComposeError` whose diagnostic carries the failing source
/// location: `<file>[<line>]: ERROR : <message>`.
macro_rules! compose_error {
    ($repaired:expr, $($msg:tt)*) => {
        $crate::compose::ComposeError {
            diagnostic: format!(
                "{}[{}]: ERROR : {}",
                file!(),
                line!(),
                format_args!($($msg)*)
            ),
            repaired: $repaired,
        }
    };
}
pub(crate) use compose_error;

/// Fail the current branch with a diagnostic and a repaired configuration.
macro_rules! fail {
    ($repaired:expr, $($msg:tt)*) => {
        return Err($crate::compose::compose_error!($repaired, $($msg)*))
    };
}
pub(crate) use fail;

/// Compose the vertex and fragment shader programs for one draw batch skin.
///
/// On success the returned configuration is the input configuration,
/// untouched. On failure no shader source is produced; the error carries a
/// human-readable diagnostic and a repaired configuration guaranteed to be
/// accepted by a more-constrained branch of the same tree on a later call.
pub fn compose(
    resources: &BatchResources,
    skin_name: &str,
    effects: &EffectConfig,
    dialect: GlslDialect,
) -> Result<ComposedShaders, ComposeError> {
    // An unknown skin behaves as an empty bundle: every availability check
    // fails and the repair chain still converges to the uniform-diffuse leaf.
    let fallback = SkinResources::new();
    let skin = resources.skin(skin_name).unwrap_or(&fallback);

    if effects.fog_type() == FogType::Interpolated {
        fail!(
            effects.clone().with_fog_type(FogType::None),
            "FOG_TYPE::INTERPOLATED is not supported."
        );
    }

    if effects.shader_output_types() != &BTreeSet::from([ShaderOutputType::Default]) {
        fail!(
            effects
                .clone()
                .with_shader_output_types([ShaderOutputType::Default]),
            "Only the DEFAULT shader output type is supported."
        );
    }

    let lights = effects.light_types();
    let composed = if lights.is_empty() {
        unlit::compose(skin, effects, dialect)?
    } else if lights == &BTreeSet::from([LightType::Ambient]) {
        ambient::compose(skin, effects, dialect)?
    } else if lights == &BTreeSet::from([LightType::Ambient, LightType::Directional]) {
        directional::compose(skin, effects, dialect)?
    } else {
        // DIRECTIONAL alone has no leaves; steer the caller toward one of
        // the supported light sets.
        let repaired = if lights.contains(&LightType::Directional) {
            effects
                .clone()
                .with_light_types([LightType::Ambient, LightType::Directional])
        } else {
            effects.clone().with_light_types([])
        };
        fail!(repaired, "Unsupported combination of light types.");
    };

    interface::verify_interface_closure(&composed);
    Ok(composed)
}

/// The unlit textured baseline every malformed-configuration repair resets
/// to: lights cleared, lighting data `{Diffuse: Texture}`.
pub(crate) fn repaired_to_baseline(effects: &EffectConfig) -> EffectConfig {
    effects
        .clone()
        .with_light_types([])
        .with_lighting_data([(LightingDataKind::Diffuse, DataSourceKind::Texture)])
}

/// Degrade the diffuse source to the strongest one the skin can satisfy
/// without instancing: the per-vertex buffer when present, else the uniform.
pub(crate) fn repaired_diffuse_fallback(
    skin: &SkinResources,
    effects: &EffectConfig,
) -> EffectConfig {
    let source = if skin.has_buffer(VertexInputLocation::Diffuse) {
        DataSourceKind::Buffer
    } else {
        DataSourceKind::Uniform
    };
    effects
        .clone()
        .with_lighting_data_source(LightingDataKind::Diffuse, source)
}
