//! Concrete composition scenarios: one leaf or failure per test, with the
//! exact interface sets and diagnostics the engine must produce.

use std::collections::BTreeSet;

use effect_forge::symbols::{
    FragmentOutputLocation, UniformName, VaryingLocation, VertexInputLocation,
};
use effect_forge::{
    BatchResources, DataSourceKind, EffectConfig, FogType, GlslDialect, LightType,
    LightingDataKind, SkeletalBinding, SkinResources, TextureBinding, compose,
};

const SKIN: &str = "skin.default";

fn batch(skin: SkinResources) -> BatchResources {
    BatchResources::new().with_skin(SKIN, skin)
}

fn diffuse_texture_binding() -> TextureBinding {
    TextureBinding {
        texcoord: VertexInputLocation::Texcoord0,
        texture: "textures/diffuse".to_string(),
    }
}

fn normal_texture_binding() -> TextureBinding {
    TextureBinding {
        texcoord: VertexInputLocation::Texcoord0,
        texture: "textures/normals".to_string(),
    }
}

fn unlit(source: DataSourceKind) -> EffectConfig {
    EffectConfig::new()
        .with_light_types([])
        .with_lighting_data([(LightingDataKind::Diffuse, source)])
}

fn lit(normal: DataSourceKind, diffuse: DataSourceKind) -> EffectConfig {
    EffectConfig::new()
        .with_light_types([LightType::Ambient, LightType::Directional])
        .with_lighting_data([
            (LightingDataKind::Direction, DataSourceKind::Uniform),
            (LightingDataKind::Normal, normal),
            (LightingDataKind::Diffuse, diffuse),
        ])
}

#[test]
fn unlit_uniform_diffuse_composes_minimal_interfaces() {
    let resources = batch(SkinResources::new());
    let effects = unlit(DataSourceKind::Uniform);
    let composed = compose(&resources, SKIN, &effects, GlslDialect::Desktop)
        .expect("uniform diffuse needs no resources");

    assert_eq!(composed.effects, effects, "success leaves the config untouched");
    assert_eq!(
        composed.vertex.inputs,
        BTreeSet::from([VertexInputLocation::Position])
    );
    assert_eq!(
        composed.vertex.outputs,
        BTreeSet::from([VaryingLocation::Diffuse])
    );
    assert_eq!(
        composed.fragment.inputs,
        BTreeSet::from([VaryingLocation::Diffuse])
    );
    assert_eq!(
        composed.fragment.outputs,
        BTreeSet::from([FragmentOutputLocation::Colour])
    );
    for uniform in [
        UniformName::DiffuseColour,
        UniformName::MatrixFromModelToCamera,
        UniformName::MatrixFromCameraToClipspace,
    ] {
        assert!(
            composed.vertex.uniforms.contains(&uniform),
            "vertex stage must use {uniform:?}"
        );
    }
    assert!(composed.fragment.uniforms.is_empty());

    // Non-skeletal, so the leaf also offers an instanced vertex variant that
    // swaps the model-matrix uniform for a per-instance attribute.
    let instanced = composed.vertex_instanced.expect("instanced variant");
    assert!(
        instanced
            .inputs
            .contains(&VertexInputLocation::InstancedMatrixFromModelToCamera)
    );
    assert!(!instanced.uniforms.contains(&UniformName::MatrixFromModelToCamera));
    assert_eq!(instanced.outputs, composed.vertex.outputs);
}

#[test]
fn missing_diffuse_buffer_repairs_to_uniform() {
    let resources = batch(SkinResources::new());
    let err = compose(
        &resources,
        SKIN,
        &unlit(DataSourceKind::Buffer),
        GlslDialect::Desktop,
    )
    .expect_err("no diffuse buffer in the batch");
    assert!(err.diagnostic.contains("Diffuse colour buffer is not available"));
    assert_eq!(
        err.repaired.lighting_data_source(LightingDataKind::Diffuse),
        Some(DataSourceKind::Uniform)
    );
}

#[test]
fn interpolated_fog_fails_fast_with_no_source() {
    let resources = batch(SkinResources::new());
    let effects = unlit(DataSourceKind::Uniform).with_fog_type(FogType::Interpolated);
    let err = compose(&resources, SKIN, &effects, GlslDialect::Desktop)
        .expect_err("INTERPOLATED fog has no leaves");
    assert!(err.diagnostic.contains("FOG_TYPE::INTERPOLATED"));
    assert_eq!(err.repaired.fog_type(), FogType::None);
}

#[test]
fn normal_mapping_without_tangents_repairs_to_buffer_normals() {
    let skin = SkinResources::new()
        .with_buffer(VertexInputLocation::Normal)
        .with_texture(UniformName::TextureSamplerDiffuse, diffuse_texture_binding())
        .with_texture(UniformName::TextureSamplerNormal, normal_texture_binding());
    let err = compose(
        &batch(skin),
        SKIN,
        &lit(DataSourceKind::Texture, DataSourceKind::Texture),
        GlslDialect::Desktop,
    )
    .expect_err("tangents buffer missing");
    assert!(err.diagnostic.contains("Tangents buffer is not available"));
    assert_eq!(
        err.repaired.lighting_data_source(LightingDataKind::Normal),
        Some(DataSourceKind::Buffer)
    );
}

#[test]
fn skeletal_instancing_repairs_to_buffer_when_available() {
    let skin = SkinResources::new()
        .with_buffer(VertexInputLocation::Diffuse)
        .with_skeletal(SkeletalBinding { bone_count: 32 });
    let err = compose(
        &batch(skin),
        SKIN,
        &unlit(DataSourceKind::Instance),
        GlslDialect::Desktop,
    )
    .expect_err("instancing plus skinning is unsupported");
    assert!(err.diagnostic.contains("Instancing is not supported for skeletal"));
    assert_eq!(
        err.repaired.lighting_data_source(LightingDataKind::Diffuse),
        Some(DataSourceKind::Buffer)
    );
}

#[test]
fn skeletal_instancing_repairs_to_uniform_without_diffuse_buffer() {
    let skin = SkinResources::new().with_skeletal(SkeletalBinding { bone_count: 32 });
    let err = compose(
        &batch(skin),
        SKIN,
        &unlit(DataSourceKind::Instance),
        GlslDialect::Desktop,
    )
    .expect_err("instancing plus skinning is unsupported");
    assert_eq!(
        err.repaired.lighting_data_source(LightingDataKind::Diffuse),
        Some(DataSourceKind::Uniform)
    );
}

#[test]
fn stage_uids_are_nonempty_distinct_and_stable() {
    let resources = batch(SkinResources::new());
    let effects = unlit(DataSourceKind::Uniform);
    let first = compose(&resources, SKIN, &effects, GlslDialect::Desktop).expect("composes");
    let second = compose(&resources, SKIN, &effects, GlslDialect::Desktop).expect("composes");

    assert!(!first.vertex.uid.is_empty());
    assert!(!first.fragment.uid.is_empty());
    assert_ne!(first.vertex.uid, first.fragment.uid);
    assert_eq!(first.vertex.uid, second.vertex.uid);
    assert_eq!(first.fragment.uid, second.fragment.uid);

    let instanced = first.vertex_instanced.expect("instanced variant");
    assert_ne!(instanced.uid, first.vertex.uid);
}

#[test]
fn skeletal_batches_get_bone_blended_vertex_and_no_instanced_variant() {
    let skin = SkinResources::new().with_skeletal(SkeletalBinding { bone_count: 48 });
    let composed = compose(
        &batch(skin),
        SKIN,
        &unlit(DataSourceKind::Uniform),
        GlslDialect::Desktop,
    )
    .expect("skinned uniform leaf");
    assert!(composed.vertex_instanced.is_none());
    assert!(composed.vertex.inputs.contains(&VertexInputLocation::IndicesOfMatrices));
    assert!(composed.vertex.inputs.contains(&VertexInputLocation::WeightsOfMatrices));
    assert!(composed.vertex.uniforms.contains(&UniformName::MatricesFromModelToCamera));
    assert!(composed.vertex.uniforms.contains(&UniformName::NumMatricesPerVertex));
    let source = composed.vertex_source();
    assert!(source.contains("matrices_from_model_to_camera[64]"));
}

#[test]
fn detailed_fog_reaches_the_buffer_leaf_fragment() {
    let skin = SkinResources::new().with_buffer(VertexInputLocation::Diffuse);
    let effects = unlit(DataSourceKind::Buffer).with_fog_type(FogType::Detailed);
    let composed = compose(&batch(skin), SKIN, &effects, GlslDialect::Desktop)
        .expect("buffer diffuse with fog");
    for uniform in [UniformName::FogColour, UniformName::FogNear, UniformName::FogFar] {
        assert!(composed.fragment.uniforms.contains(&uniform));
    }
    assert!(composed.fragment_source().contains("fog_factor"));
    // Fog wins over alpha testing on this leaf.
    assert!(!composed.fragment.uniforms.contains(&UniformName::AlphaTestConstant));
}

#[test]
fn alpha_testing_skin_discards_in_texture_leaf() {
    let skin = SkinResources::new()
        .with_texture(UniformName::TextureSamplerDiffuse, diffuse_texture_binding())
        .with_alpha_testing(true);
    let composed = compose(
        &batch(skin),
        SKIN,
        &unlit(DataSourceKind::Texture),
        GlslDialect::Desktop,
    )
    .expect("textured diffuse");
    assert!(composed.fragment.uniforms.contains(&UniformName::AlphaTestConstant));
    assert!(composed.fragment_source().contains("discard"));
    assert_eq!(
        composed.vertex.outputs,
        BTreeSet::from([VaryingLocation::Texcoord0])
    );
}

#[test]
fn missing_diffuse_sampler_degrades_texture_to_buffer() {
    let resources = batch(SkinResources::new());
    let err = compose(
        &resources,
        SKIN,
        &unlit(DataSourceKind::Texture),
        GlslDialect::Desktop,
    )
    .expect_err("no diffuse sampler bound");
    assert!(err.diagnostic.contains("Diffuse texture sampler is not available"));
    assert_eq!(
        err.repaired.lighting_data_source(LightingDataKind::Diffuse),
        Some(DataSourceKind::Buffer)
    );
}

#[test]
fn ambient_only_tints_the_texture_sample() {
    let skin = SkinResources::new()
        .with_texture(UniformName::TextureSamplerDiffuse, diffuse_texture_binding());
    let effects = EffectConfig::new()
        .with_light_types([LightType::Ambient])
        .with_lighting_data([(LightingDataKind::Diffuse, DataSourceKind::Texture)]);
    let composed =
        compose(&batch(skin), SKIN, &effects, GlslDialect::Desktop).expect("ambient leaf");
    assert!(composed.fragment.uniforms.contains(&UniformName::AmbientColour));
    assert!(!composed
        .fragment
        .uniforms
        .contains(&UniformName::DirectionalLightDirection));
    assert!(composed.fragment_source().contains("ambient_colour"));
}

#[test]
fn ambient_with_wrong_lighting_data_forces_the_textured_mapping() {
    let skin = SkinResources::new()
        .with_texture(UniformName::TextureSamplerDiffuse, diffuse_texture_binding());
    let effects = EffectConfig::new()
        .with_light_types([LightType::Ambient])
        .with_lighting_data([(LightingDataKind::Diffuse, DataSourceKind::Buffer)]);
    let err = compose(&batch(skin), SKIN, &effects, GlslDialect::Desktop)
        .expect_err("ambient supports only textured diffuse");
    assert_eq!(
        err.repaired.lighting_data_source(LightingDataKind::Diffuse),
        Some(DataSourceKind::Texture)
    );
    assert_eq!(err.repaired.light_types(), effects.light_types());
}

#[test]
fn lit_buffer_normals_uniform_diffuse_carries_normal_varying() {
    let skin = SkinResources::new().with_buffer(VertexInputLocation::Normal);
    let composed = compose(
        &batch(skin),
        SKIN,
        &lit(DataSourceKind::Buffer, DataSourceKind::Uniform),
        GlslDialect::Desktop,
    )
    .expect("lit flat colour leaf");
    assert_eq!(
        composed.vertex.outputs,
        BTreeSet::from([VaryingLocation::Diffuse, VaryingLocation::Normal])
    );
    for uniform in [
        UniformName::AmbientColour,
        UniformName::DirectionalLightDirection,
        UniformName::DirectionalLightColour,
    ] {
        assert!(composed.fragment.uniforms.contains(&uniform));
    }
}

#[test]
fn specular_lighting_data_is_removed_on_repair() {
    let skin = SkinResources::new().with_buffer(VertexInputLocation::Normal);
    let effects = lit(DataSourceKind::Buffer, DataSourceKind::Uniform)
        .with_lighting_data_source(LightingDataKind::Specular, DataSourceKind::Uniform);
    let err = compose(&batch(skin), SKIN, &effects, GlslDialect::Desktop)
        .expect_err("SPECULAR is unsupported");
    assert!(err.diagnostic.contains("SPECULAR"));
    assert!(
        err.repaired
            .lighting_data_source(LightingDataKind::Specular)
            .is_none()
    );
}

#[test]
fn per_vertex_light_direction_is_forced_back_to_uniform() {
    let skin = SkinResources::new().with_buffer(VertexInputLocation::Normal);
    let effects = lit(DataSourceKind::Buffer, DataSourceKind::Uniform)
        .with_lighting_data_source(LightingDataKind::Direction, DataSourceKind::Buffer);
    let err = compose(&batch(skin), SKIN, &effects, GlslDialect::Desktop)
        .expect_err("light direction must be a uniform");
    assert_eq!(
        err.repaired.lighting_data_source(LightingDataKind::Direction),
        Some(DataSourceKind::Uniform)
    );
}

#[test]
fn incomplete_lit_lighting_data_resets_to_unlit_baseline() {
    let skin = SkinResources::new().with_buffer(VertexInputLocation::Normal);
    let effects = EffectConfig::new()
        .with_light_types([LightType::Ambient, LightType::Directional])
        .with_lighting_data([(LightingDataKind::Diffuse, DataSourceKind::Texture)]);
    let err = compose(&batch(skin), SKIN, &effects, GlslDialect::Desktop)
        .expect_err("DIRECTION and NORMAL entries are missing");
    assert!(err.repaired.light_types().is_empty());
    assert_eq!(
        err.repaired.lighting_data_source(LightingDataKind::Diffuse),
        Some(DataSourceKind::Texture)
    );
}

#[test]
fn normal_mapped_leaf_emits_full_tangent_basis() {
    let skin = SkinResources::new()
        .with_buffers([
            VertexInputLocation::Normal,
            VertexInputLocation::Tangent,
            VertexInputLocation::Bitangent,
        ])
        .with_texture(UniformName::TextureSamplerDiffuse, diffuse_texture_binding())
        .with_texture(UniformName::TextureSamplerNormal, normal_texture_binding());
    let composed = compose(
        &batch(skin),
        SKIN,
        &lit(DataSourceKind::Texture, DataSourceKind::Texture),
        GlslDialect::Desktop,
    )
    .expect("normal-mapped leaf");
    assert_eq!(
        composed.vertex.outputs,
        BTreeSet::from([
            VaryingLocation::Normal,
            VaryingLocation::Tangent,
            VaryingLocation::Bitangent,
            VaryingLocation::Texcoord0,
        ])
    );
    assert!(composed.fragment.uniforms.contains(&UniformName::TextureSamplerNormal));
    assert!(composed.fragment_source().contains("from_tangent_to_camera"));
}

#[test]
fn normal_mapping_with_buffer_diffuse_retreats_to_buffer_normals() {
    let skin = SkinResources::new()
        .with_buffers([
            VertexInputLocation::Normal,
            VertexInputLocation::Tangent,
            VertexInputLocation::Bitangent,
            VertexInputLocation::Diffuse,
        ])
        .with_texture(UniformName::TextureSamplerNormal, normal_texture_binding());
    let err = compose(
        &batch(skin),
        SKIN,
        &lit(DataSourceKind::Texture, DataSourceKind::Buffer),
        GlslDialect::Desktop,
    )
    .expect_err("texture-space normals need textured diffuse");
    assert_eq!(
        err.repaired.lighting_data_source(LightingDataKind::Normal),
        Some(DataSourceKind::Buffer)
    );
}

#[test]
fn every_source_line_is_terminated_and_headed_by_the_version_pragma() {
    let resources = batch(SkinResources::new());
    let composed = compose(
        &resources,
        SKIN,
        &unlit(DataSourceKind::Uniform),
        GlslDialect::Desktop,
    )
    .expect("composes");
    for stage_lines in [&composed.vertex.lines, &composed.fragment.lines] {
        assert_eq!(stage_lines[0], "#version 450\n");
        assert!(stage_lines.iter().all(|line| line.ends_with('\n')));
    }
}

#[test]
fn webgl_dialect_carries_a_precision_header() {
    let resources = batch(SkinResources::new());
    let composed = compose(
        &resources,
        SKIN,
        &unlit(DataSourceKind::Uniform),
        GlslDialect::WebGl,
    )
    .expect("composes");
    assert_eq!(composed.fragment.lines[0], "#version 300 es\n");
    assert_eq!(composed.fragment.lines[1], "precision highp float;\n");
}
