//! Unlit branch: no light types configured.
//!
//! Requires exactly one DIFFUSE lighting-data entry; the four data-source
//! kinds map to four leaves, each independently validating what the skin's
//! resources can actually back.

use crate::effects::{DataSourceKind, EffectConfig, FogType, LightingDataKind};
use crate::glsl::GlslDialect;
use crate::resources::SkinResources;
use crate::symbols::{UniformName, VertexInputLocation};

use super::emit::{
    self, DiffuseCarry, FragmentOptions, FragmentShading, NormalCarry, PositionTransform,
};
use super::types::{ComposeError, ComposedShaders};
use super::{fail, leaf_uid, repaired_diffuse_fallback};

pub(crate) fn compose(
    skin: &SkinResources,
    effects: &EffectConfig,
    dialect: GlslDialect,
) -> Result<ComposedShaders, ComposeError> {
    let source = match effects.lighting_data_source(LightingDataKind::Diffuse) {
        Some(source) if effects.lighting_data().len() == 1 => source,
        _ => fail!(
            effects
                .clone()
                .with_lighting_data([(LightingDataKind::Diffuse, DataSourceKind::Texture)]),
            "Unlit rendering requires exactly one DIFFUSE lighting data entry."
        ),
    };

    match source {
        DataSourceKind::Uniform => Ok(flat_colour_leaf(skin, effects, dialect)),
        DataSourceKind::Buffer => {
            if !skin.has_buffer(VertexInputLocation::Diffuse) {
                fail!(
                    effects.clone().with_lighting_data_source(
                        LightingDataKind::Diffuse,
                        DataSourceKind::Uniform
                    ),
                    "Diffuse colour buffer is not available."
                );
            }
            Ok(buffer_colour_leaf(skin, effects, dialect))
        }
        DataSourceKind::Texture => {
            let Some(binding) = skin.texture(UniformName::TextureSamplerDiffuse) else {
                fail!(
                    effects.clone().with_lighting_data_source(
                        LightingDataKind::Diffuse,
                        DataSourceKind::Buffer
                    ),
                    "Diffuse texture sampler is not available."
                );
            };
            Ok(texture_leaf(binding.texcoord, skin, effects, dialect))
        }
        DataSourceKind::Instance => {
            if skin.skeletal().is_some() {
                fail!(
                    repaired_diffuse_fallback(skin, effects),
                    "Instancing is not supported for skeletal batches."
                );
            }
            if !skin.has_buffer(VertexInputLocation::InstancedDiffuse) {
                fail!(
                    repaired_diffuse_fallback(skin, effects),
                    "Per-instance diffuse colour stream is not available."
                );
            }
            Ok(instance_colour_leaf(effects, dialect))
        }
    }
}

/// Position-only transform, flat diffuse-uniform colour pass-through.
fn flat_colour_leaf(
    skin: &SkinResources,
    effects: &EffectConfig,
    dialect: GlslDialect,
) -> ComposedShaders {
    let skinned = skin.skeletal().is_some();
    let vertex = if skinned {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Skinned,
            DiffuseCarry::Uniform,
            NormalCarry::None,
            leaf_uid!(),
        )
    } else {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Rigid,
            DiffuseCarry::Uniform,
            NormalCarry::None,
            leaf_uid!(),
        )
    };
    let vertex_instanced = (!skinned).then(|| {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Instanced,
            DiffuseCarry::Uniform,
            NormalCarry::None,
            leaf_uid!(),
        )
    });
    let fragment = emit::build_fragment_stage(
        dialect,
        FragmentShading::PassThroughDiffuse,
        FragmentOptions::default(),
        leaf_uid!(),
    );
    ComposedShaders {
        effects: effects.clone(),
        vertex,
        vertex_instanced,
        fragment,
    }
}

/// Per-vertex diffuse buffer; DETAILED fog wins over alpha testing in the
/// fragment stage.
fn buffer_colour_leaf(
    skin: &SkinResources,
    effects: &EffectConfig,
    dialect: GlslDialect,
) -> ComposedShaders {
    let skinned = skin.skeletal().is_some();
    let vertex = if skinned {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Skinned,
            DiffuseCarry::Buffer,
            NormalCarry::None,
            leaf_uid!(),
        )
    } else {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Rigid,
            DiffuseCarry::Buffer,
            NormalCarry::None,
            leaf_uid!(),
        )
    };
    let vertex_instanced = (!skinned).then(|| {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Instanced,
            DiffuseCarry::Buffer,
            NormalCarry::None,
            leaf_uid!(),
        )
    });
    let fragment = emit::build_fragment_stage(
        dialect,
        FragmentShading::PassThroughDiffuse,
        fog_or_alpha_options(skin, effects),
        leaf_uid!(),
    );
    ComposedShaders {
        effects: effects.clone(),
        vertex,
        vertex_instanced,
        fragment,
    }
}

/// Textured diffuse; the texcoord input is whichever location the sampler is
/// bound to.
fn texture_leaf(
    texcoord: VertexInputLocation,
    skin: &SkinResources,
    effects: &EffectConfig,
    dialect: GlslDialect,
) -> ComposedShaders {
    let skinned = skin.skeletal().is_some();
    let vertex = if skinned {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Skinned,
            DiffuseCarry::Texcoord(texcoord),
            NormalCarry::None,
            leaf_uid!(),
        )
    } else {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Rigid,
            DiffuseCarry::Texcoord(texcoord),
            NormalCarry::None,
            leaf_uid!(),
        )
    };
    let vertex_instanced = (!skinned).then(|| {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Instanced,
            DiffuseCarry::Texcoord(texcoord),
            NormalCarry::None,
            leaf_uid!(),
        )
    });
    let fragment = emit::build_fragment_stage(
        dialect,
        FragmentShading::TextureDiffuse,
        FragmentOptions {
            detailed_fog: false,
            alpha_test: skin.use_alpha_testing(),
        },
        leaf_uid!(),
    );
    ComposedShaders {
        effects: effects.clone(),
        vertex,
        vertex_instanced,
        fragment,
    }
}

/// Per-instance diffuse colour. The primary vertex stage is inherently
/// instanced, so no separate instanced variant is emitted.
fn instance_colour_leaf(effects: &EffectConfig, dialect: GlslDialect) -> ComposedShaders {
    let vertex = emit::build_vertex_stage(
        dialect,
        PositionTransform::Instanced,
        DiffuseCarry::Instance,
        NormalCarry::None,
        leaf_uid!(),
    );
    let fragment = emit::build_fragment_stage(
        dialect,
        FragmentShading::PassThroughDiffuse,
        FragmentOptions::default(),
        leaf_uid!(),
    );
    ComposedShaders {
        effects: effects.clone(),
        vertex,
        vertex_instanced: None,
        fragment,
    }
}

pub(crate) fn fog_or_alpha_options(skin: &SkinResources, effects: &EffectConfig) -> FragmentOptions {
    if effects.fog_type() == FogType::Detailed {
        FragmentOptions {
            detailed_fog: true,
            alpha_test: false,
        }
    } else {
        FragmentOptions {
            detailed_fog: false,
            alpha_test: skin.use_alpha_testing(),
        }
    }
}
