//! Texture-space normals (normal mapping) under ambient + directional
//! lighting.
//!
//! The most demanding leaf of the tree: it needs the full tangent-space
//! basis as vertex buffers plus the normal-map sampler, and only textured
//! diffuse is implemented in combination with it. Each precondition fails
//! with a repair that targets the weakest missing requirement.

use crate::effects::{DataSourceKind, EffectConfig, LightingDataKind};
use crate::glsl::GlslDialect;
use crate::resources::SkinResources;
use crate::symbols::{UniformName, VertexInputLocation};

use super::emit::{
    self, DiffuseCarry, FragmentOptions, FragmentShading, NormalCarry, PositionTransform,
};
use super::types::{ComposeError, ComposedShaders};
use super::{fail, leaf_uid};

/// Repair that retreats from texture-space normals to buffer normals.
fn repaired_normal_to_buffer(effects: &EffectConfig) -> EffectConfig {
    effects
        .clone()
        .with_lighting_data_source(LightingDataKind::Normal, DataSourceKind::Buffer)
}

pub(crate) fn compose(
    skin: &SkinResources,
    effects: &EffectConfig,
    diffuse_source: DataSourceKind,
    dialect: GlslDialect,
) -> Result<ComposedShaders, ComposeError> {
    if !skin.has_buffer(VertexInputLocation::Normal) {
        fail!(repaired_normal_to_buffer(effects), "Normals buffer is not available.");
    }
    if !skin.has_buffer(VertexInputLocation::Tangent) {
        fail!(repaired_normal_to_buffer(effects), "Tangents buffer is not available.");
    }
    if !skin.has_buffer(VertexInputLocation::Bitangent) {
        fail!(repaired_normal_to_buffer(effects), "Bitangents buffer is not available.");
    }
    if skin.texture(UniformName::TextureSamplerNormal).is_none() {
        fail!(
            repaired_normal_to_buffer(effects),
            "Normal map texture sampler is not available."
        );
    }
    // Uniform/buffer/instance diffuse combined with texture-space normals is
    // not implemented.
    if diffuse_source != DataSourceKind::Texture {
        fail!(
            repaired_normal_to_buffer(effects),
            "Texture-space normals require textured diffuse data."
        );
    }
    let Some(diffuse_binding) = skin.texture(UniformName::TextureSamplerDiffuse) else {
        fail!(
            effects
                .clone()
                .with_lighting_data_source(LightingDataKind::Diffuse, DataSourceKind::Buffer),
            "Diffuse texture sampler is not available."
        );
    };
    let texcoord = diffuse_binding.texcoord;

    let skinned = skin.skeletal().is_some();
    let vertex = if skinned {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Skinned,
            DiffuseCarry::Texcoord(texcoord),
            NormalCarry::TangentSpaceBasis,
            leaf_uid!(),
        )
    } else {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Rigid,
            DiffuseCarry::Texcoord(texcoord),
            NormalCarry::TangentSpaceBasis,
            leaf_uid!(),
        )
    };
    let vertex_instanced = (!skinned).then(|| {
        emit::build_vertex_stage(
            dialect,
            PositionTransform::Instanced,
            DiffuseCarry::Texcoord(texcoord),
            NormalCarry::TangentSpaceBasis,
            leaf_uid!(),
        )
    });
    let fragment = emit::build_fragment_stage(
        dialect,
        FragmentShading::LambertNormalMapped,
        FragmentOptions::default(),
        leaf_uid!(),
    );
    Ok(ComposedShaders {
        effects: effects.clone(),
        vertex,
        vertex_instanced,
        fragment,
    })
}
