//! Ambient-only branch: `{AMBIENT}` with no directional light.
//!
//! A single leaf: ambient-tinted textured diffuse. Any other lighting-data
//! shape is repaired toward it, and a missing sampler clears the light set
//! so the unlit branch can continue the degradation.

use crate::effects::{DataSourceKind, EffectConfig, LightingDataKind};
use crate::glsl::GlslDialect;
use crate::resources::SkinResources;
use crate::symbols::UniformName;

use super::emit::{
    self, DiffuseCarry, FragmentOptions, FragmentShading, NormalCarry, PositionTransform,
};
use super::types::{ComposeError, ComposedShaders};
use super::{fail, leaf_uid};

pub(crate) fn compose(
    skin: &SkinResources,
    effects: &EffectConfig,
    dialect: GlslDialect,
) -> Result<ComposedShaders, ComposeError> {
    let textured_only = effects.lighting_data().len() == 1
        && effects.lighting_data_source(LightingDataKind::Diffuse)
            == Some(DataSourceKind::Texture);
    if !textured_only {
        fail!(
            effects
                .clone()
                .with_lighting_data([(LightingDataKind::Diffuse, DataSourceKind::Texture)]),
            "AMBIENT lighting supports only textured diffuse data."
        );
    }

    let Some(binding) = skin.texture(UniformName::TextureSamplerDiffuse) else {
        fail!(
            effects.clone().with_light_types([]),
            "Diffuse texture sampler is not available."
        );
    };
    let texcoord = binding.texcoord;

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
        FragmentShading::AmbientTexture,
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
