//! Ambient + directional branch.
//!
//! Requires DIRECTION, NORMAL and DIFFUSE lighting-data entries, a uniform
//! light vector, and no SPECULAR entry. The NORMAL source then picks between
//! buffer normals (four Lambert-lit diffuse leaves mirroring the unlit
//! branch) and texture-space normals (normal mapping, `normal_map.rs`).

use crate::effects::{DataSourceKind, EffectConfig, LightingDataKind};
use crate::glsl::GlslDialect;
use crate::resources::SkinResources;
use crate::symbols::{UniformName, VertexInputLocation};

use super::emit::{
    self, DiffuseCarry, FragmentOptions, FragmentShading, NormalCarry, PositionTransform,
};
use super::types::{ComposeError, ComposedShaders};
use super::unlit::fog_or_alpha_options;
use super::{fail, leaf_uid, normal_map, repaired_diffuse_fallback, repaired_to_baseline};

pub(crate) fn compose(
    skin: &SkinResources,
    effects: &EffectConfig,
    dialect: GlslDialect,
) -> Result<ComposedShaders, ComposeError> {
    let (Some(direction_source), Some(normal_source), Some(diffuse_source)) = (
        effects.lighting_data_source(LightingDataKind::Direction),
        effects.lighting_data_source(LightingDataKind::Normal),
        effects.lighting_data_source(LightingDataKind::Diffuse),
    ) else {
        fail!(
            repaired_to_baseline(effects),
            "Lighting data must provide DIRECTION, NORMAL and DIFFUSE entries."
        );
    };

    // The directional light vector is always a uniform, never per-vertex.
    if direction_source != DataSourceKind::Uniform {
        fail!(
            effects.clone().with_lighting_data_source(
                LightingDataKind::Direction,
                DataSourceKind::Uniform
            ),
            "The directional light vector must come from a uniform."
        );
    }

    if effects
        .lighting_data()
        .contains_key(&LightingDataKind::Specular)
    {
        fail!(
            effects
                .clone()
                .without_lighting_data(LightingDataKind::Specular),
            "SPECULAR lighting data is not supported."
        );
    }

    match normal_source {
        DataSourceKind::Buffer => lit_buffer_normals(skin, effects, diffuse_source, dialect),
        DataSourceKind::Texture => normal_map::compose(skin, effects, diffuse_source, dialect),
        _ => fail!(
            repaired_to_baseline(effects),
            "NORMAL lighting data must come from a buffer or a texture."
        ),
    }
}

fn lit_buffer_normals(
    skin: &SkinResources,
    effects: &EffectConfig,
    diffuse_source: DataSourceKind,
    dialect: GlslDialect,
) -> Result<ComposedShaders, ComposeError> {
    if !skin.has_buffer(VertexInputLocation::Normal) {
        fail!(repaired_to_baseline(effects), "Normals buffer is not available.");
    }

    match diffuse_source {
        DataSourceKind::Uniform => Ok(lit_flat_colour_leaf(skin, effects, dialect)),
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
            Ok(lit_buffer_colour_leaf(skin, effects, dialect))
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
            Ok(lit_texture_leaf(binding.texcoord, skin, effects, dialect))
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
            Ok(lit_instance_colour_leaf(effects, dialect))
        }
    }
}

/// Lambert-lit flat uniform colour.
fn lit_flat_colour_leaf(
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
            NormalCarry::Buffer,
            leaf_uid!(),
        )
    } else {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Rigid,
            DiffuseCarry::Uniform,
            NormalCarry::Buffer,
            leaf_uid!(),
        )
    };
    let vertex_instanced = (!skinned).then(|| {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Instanced,
            DiffuseCarry::Uniform,
            NormalCarry::Buffer,
            leaf_uid!(),
        )
    });
    let fragment = emit::build_fragment_stage(
        dialect,
        FragmentShading::LambertVarying,
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

/// Lambert-lit per-vertex colour, with DETAILED fog or alpha testing.
fn lit_buffer_colour_leaf(
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
            NormalCarry::Buffer,
            leaf_uid!(),
        )
    } else {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Rigid,
            DiffuseCarry::Buffer,
            NormalCarry::Buffer,
            leaf_uid!(),
        )
    };
    let vertex_instanced = (!skinned).then(|| {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Instanced,
            DiffuseCarry::Buffer,
            NormalCarry::Buffer,
            leaf_uid!(),
        )
    });
    let fragment = emit::build_fragment_stage(
        dialect,
        FragmentShading::LambertVarying,
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

/// Lambert-lit texture sample, with alpha testing when the skin asks.
fn lit_texture_leaf(
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
            NormalCarry::Buffer,
            leaf_uid!(),
        )
    } else {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Rigid,
            DiffuseCarry::Texcoord(texcoord),
            NormalCarry::Buffer,
            leaf_uid!(),
        )
    };
    let vertex_instanced = (!skinned).then(|| {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Instanced,
            DiffuseCarry::Texcoord(texcoord),
            NormalCarry::Buffer,
            leaf_uid!(),
        )
    });
    let fragment = emit::build_fragment_stage(
        dialect,
        FragmentShading::LambertTexture,
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

/// Lambert-lit per-instance colour; inherently instanced.
fn lit_instance_colour_leaf(effects: &EffectConfig, dialect: GlslDialect) -> ComposedShaders {
    let vertex = emit::build_vertex_stage(
        dialect,
        PositionTransform::Instanced,
        DiffuseCarry::Instance,
        NormalCarry::Buffer,
        leaf_uid!(),
    );
    let fragment = emit::build_fragment_stage(
        dialect,
        FragmentShading::LambertVarying,
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
