//! Shared stage emitters used by the decision-tree leaves.
//!
//! Every successful leaf describes its vertex stage as a (position
//! transform, diffuse carry, normal carry) triple and its fragment stage as
//! a shading kind plus options, then lets these builders emit the actual
//! GLSL. Leaves pass their own call-site uids so that each leaf keeps a
//! distinct, stable cache key even though the emission code is shared.

use std::collections::BTreeSet;

use crate::glsl::{self, GlslDialect, StageKind};
use crate::symbols::{FragmentOutputLocation, UniformName, VaryingLocation, VertexInputLocation};

use super::types::{FragmentStage, VertexStage};

/// How the vertex position (and any camera-space basis) is transformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PositionTransform {
    /// Single per-draw model matrix uniform.
    Rigid,
    /// Weighted blend over the bone-matrix uniform array.
    Skinned,
    /// Per-instance model matrix attribute.
    Instanced,
}

/// Which data the vertex stage forwards for the diffuse channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DiffuseCarry {
    /// Flat colour from the diffuse-colour uniform.
    Uniform,
    /// Per-vertex colour buffer.
    Buffer,
    /// Per-instance colour stream.
    Instance,
    /// Texture coordinates for a fragment-stage sample; the location is the
    /// texcoord input the diffuse sampler is bound to.
    Texcoord(VertexInputLocation),
}

/// Which lighting basis the vertex stage forwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NormalCarry {
    None,
    /// Camera-space normal from the normals buffer.
    Buffer,
    /// Full camera-space TBN basis for tangent-space normal mapping.
    TangentSpaceBasis,
}

/// Fragment-stage shading kinds, one per family of leaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FragmentShading {
    /// Forward the interpolated diffuse colour.
    PassThroughDiffuse,
    /// Sample the diffuse texture.
    TextureDiffuse,
    /// Ambient-tinted diffuse texture sample.
    AmbientTexture,
    /// Ambient + directional Lambert term over the interpolated diffuse.
    LambertVarying,
    /// Ambient + directional Lambert term over a diffuse texture sample.
    LambertTexture,
    /// Tangent-space normal decode, then the Lambert term over a diffuse
    /// texture sample.
    LambertNormalMapped,
}

/// Optional fragment-stage post-processing picked per leaf.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FragmentOptions {
    /// Blend towards the fog colour by clip-space-derived depth.
    pub detailed_fog: bool,
    /// Discard fragments whose diffuse alpha falls below the threshold.
    pub alpha_test: bool,
}

/// The camera-space model matrix expression for non-skinned transforms.
fn model_matrix_expr(position: PositionTransform) -> &'static str {
    match position {
        PositionTransform::Rigid => UniformName::MatrixFromModelToCamera.identifier(),
        PositionTransform::Instanced => {
            VertexInputLocation::InstancedMatrixFromModelToCamera.identifier()
        }
        PositionTransform::Skinned => unreachable!("skinned transforms blend per bone"),
    }
}

pub(crate) fn build_vertex_stage(
    dialect: GlslDialect,
    position: PositionTransform,
    diffuse: DiffuseCarry,
    normal: NormalCarry,
    uid: &'static str,
) -> VertexStage {
    let mut inputs = BTreeSet::new();
    let mut outputs = BTreeSet::new();
    let mut uniforms = BTreeSet::new();
    let mut lines = dialect.header_lines(StageKind::Vertex);

    // Inputs.
    lines.push(glsl::declare_vertex_input(
        VertexInputLocation::Position,
        &mut inputs,
    ));
    match position {
        PositionTransform::Skinned => {
            lines.push(glsl::declare_vertex_input(
                VertexInputLocation::IndicesOfMatrices,
                &mut inputs,
            ));
            lines.push(glsl::declare_vertex_input(
                VertexInputLocation::WeightsOfMatrices,
                &mut inputs,
            ));
        }
        PositionTransform::Instanced => {
            lines.push(glsl::declare_vertex_input(
                VertexInputLocation::InstancedMatrixFromModelToCamera,
                &mut inputs,
            ));
        }
        PositionTransform::Rigid => {}
    }
    match normal {
        NormalCarry::Buffer => {
            lines.push(glsl::declare_vertex_input(
                VertexInputLocation::Normal,
                &mut inputs,
            ));
        }
        NormalCarry::TangentSpaceBasis => {
            for loc in [
                VertexInputLocation::Normal,
                VertexInputLocation::Tangent,
                VertexInputLocation::Bitangent,
            ] {
                lines.push(glsl::declare_vertex_input(loc, &mut inputs));
            }
        }
        NormalCarry::None => {}
    }
    match diffuse {
        DiffuseCarry::Buffer => {
            lines.push(glsl::declare_vertex_input(
                VertexInputLocation::Diffuse,
                &mut inputs,
            ));
        }
        DiffuseCarry::Instance => {
            lines.push(glsl::declare_vertex_input(
                VertexInputLocation::InstancedDiffuse,
                &mut inputs,
            ));
        }
        DiffuseCarry::Texcoord(loc) => {
            lines.push(glsl::declare_vertex_input(loc, &mut inputs));
        }
        DiffuseCarry::Uniform => {}
    }

    // Uniforms.
    match position {
        PositionTransform::Rigid => {
            lines.push(glsl::declare_uniform(
                UniformName::MatrixFromModelToCamera,
                &mut uniforms,
            ));
        }
        PositionTransform::Skinned => {
            lines.push(glsl::declare_uniform(
                UniformName::MatricesFromModelToCamera,
                &mut uniforms,
            ));
            lines.push(glsl::declare_uniform(
                UniformName::NumMatricesPerVertex,
                &mut uniforms,
            ));
        }
        PositionTransform::Instanced => {}
    }
    lines.push(glsl::declare_uniform(
        UniformName::MatrixFromCameraToClipspace,
        &mut uniforms,
    ));
    if diffuse == DiffuseCarry::Uniform {
        lines.push(glsl::declare_uniform(
            UniformName::DiffuseColour,
            &mut uniforms,
        ));
    }

    // Outputs.
    match diffuse {
        DiffuseCarry::Texcoord(_) => {
            lines.push(glsl::declare_varying_output(
                VaryingLocation::Texcoord0,
                &mut outputs,
            ));
        }
        _ => {
            lines.push(glsl::declare_varying_output(
                VaryingLocation::Diffuse,
                &mut outputs,
            ));
        }
    }
    match normal {
        NormalCarry::Buffer => {
            lines.push(glsl::declare_varying_output(
                VaryingLocation::Normal,
                &mut outputs,
            ));
        }
        NormalCarry::TangentSpaceBasis => {
            for v in [
                VaryingLocation::Normal,
                VaryingLocation::Tangent,
                VaryingLocation::Bitangent,
            ] {
                lines.push(glsl::declare_varying_output(v, &mut outputs));
            }
        }
        NormalCarry::None => {}
    }

    // Body.
    lines.push("void main()".to_string());
    lines.push("{".to_string());
    match position {
        PositionTransform::Rigid | PositionTransform::Instanced => {
            let model = model_matrix_expr(position);
            lines.push(format!(
                "    gl_Position = matrix_from_camera_to_clipspace * ({model} * vec4(in_position, 1.0));"
            ));
            match normal {
                NormalCarry::Buffer => {
                    lines.push(format!("    vrt_normal = mat3({model}) * in_normal;"));
                }
                NormalCarry::TangentSpaceBasis => {
                    lines.push(format!("    vrt_normal = mat3({model}) * in_normal;"));
                    lines.push(format!("    vrt_tangent = mat3({model}) * in_tangent;"));
                    lines.push(format!("    vrt_bitangent = mat3({model}) * in_bitangent;"));
                }
                NormalCarry::None => {}
            }
        }
        PositionTransform::Skinned => {
            lines.push("    vec4 position_in_camera = vec4(0.0, 0.0, 0.0, 0.0);".to_string());
            match normal {
                NormalCarry::Buffer => {
                    lines.push("    vec3 normal_in_camera = vec3(0.0, 0.0, 0.0);".to_string());
                }
                NormalCarry::TangentSpaceBasis => {
                    lines.push("    vec3 normal_in_camera = vec3(0.0, 0.0, 0.0);".to_string());
                    lines.push("    vec3 tangent_in_camera = vec3(0.0, 0.0, 0.0);".to_string());
                    lines.push("    vec3 bitangent_in_camera = vec3(0.0, 0.0, 0.0);".to_string());
                }
                NormalCarry::None => {}
            }
            lines.push("    for (int i = 0; i < num_matrices_per_vertex; ++i)".to_string());
            lines.push("    {".to_string());
            lines.push(
                "        mat4 bone_matrix = matrices_from_model_to_camera[in_indices_of_matrices[i]];"
                    .to_string(),
            );
            lines.push(
                "        position_in_camera += in_weights_of_matrices[i] * (bone_matrix * vec4(in_position, 1.0));"
                    .to_string(),
            );
            match normal {
                NormalCarry::Buffer => {
                    lines.push(
                        "        normal_in_camera += in_weights_of_matrices[i] * (mat3(bone_matrix) * in_normal);"
                            .to_string(),
                    );
                }
                NormalCarry::TangentSpaceBasis => {
                    lines.push(
                        "        normal_in_camera += in_weights_of_matrices[i] * (mat3(bone_matrix) * in_normal);"
                            .to_string(),
                    );
                    lines.push(
                        "        tangent_in_camera += in_weights_of_matrices[i] * (mat3(bone_matrix) * in_tangent);"
                            .to_string(),
                    );
                    lines.push(
                        "        bitangent_in_camera += in_weights_of_matrices[i] * (mat3(bone_matrix) * in_bitangent);"
                            .to_string(),
                    );
                }
                NormalCarry::None => {}
            }
            lines.push("    }".to_string());
            lines.push(
                "    gl_Position = matrix_from_camera_to_clipspace * position_in_camera;"
                    .to_string(),
            );
            match normal {
                NormalCarry::Buffer => {
                    lines.push("    vrt_normal = normal_in_camera;".to_string());
                }
                NormalCarry::TangentSpaceBasis => {
                    lines.push("    vrt_normal = normal_in_camera;".to_string());
                    lines.push("    vrt_tangent = tangent_in_camera;".to_string());
                    lines.push("    vrt_bitangent = bitangent_in_camera;".to_string());
                }
                NormalCarry::None => {}
            }
        }
    }
    match diffuse {
        DiffuseCarry::Uniform => {
            lines.push("    vrt_diffuse = diffuse_colour;".to_string());
        }
        DiffuseCarry::Buffer => {
            lines.push("    vrt_diffuse = in_diffuse;".to_string());
        }
        DiffuseCarry::Instance => {
            lines.push("    vrt_diffuse = in_instanced_diffuse;".to_string());
        }
        DiffuseCarry::Texcoord(loc) => {
            lines.push(format!("    vrt_texcoord0 = {};", loc.identifier()));
        }
    }
    lines.push("}".to_string());

    glsl::terminate_lines(&mut lines);
    VertexStage {
        uid: uid.to_string(),
        lines,
        inputs,
        outputs,
        uniforms,
    }
}

pub(crate) fn build_fragment_stage(
    dialect: GlslDialect,
    shading: FragmentShading,
    options: FragmentOptions,
    uid: &'static str,
) -> FragmentStage {
    let mut inputs = BTreeSet::new();
    let mut outputs = BTreeSet::new();
    let mut uniforms = BTreeSet::new();
    let mut lines = dialect.header_lines(StageKind::Fragment);

    let samples_texture = matches!(
        shading,
        FragmentShading::TextureDiffuse
            | FragmentShading::AmbientTexture
            | FragmentShading::LambertTexture
            | FragmentShading::LambertNormalMapped
    );
    let lambert = matches!(
        shading,
        FragmentShading::LambertVarying
            | FragmentShading::LambertTexture
            | FragmentShading::LambertNormalMapped
    );

    // Inputs.
    if samples_texture {
        lines.push(glsl::declare_varying_input(
            VaryingLocation::Texcoord0,
            &mut inputs,
        ));
    } else {
        lines.push(glsl::declare_varying_input(
            VaryingLocation::Diffuse,
            &mut inputs,
        ));
    }
    match shading {
        FragmentShading::LambertVarying | FragmentShading::LambertTexture => {
            lines.push(glsl::declare_varying_input(
                VaryingLocation::Normal,
                &mut inputs,
            ));
        }
        FragmentShading::LambertNormalMapped => {
            for v in [
                VaryingLocation::Normal,
                VaryingLocation::Tangent,
                VaryingLocation::Bitangent,
            ] {
                lines.push(glsl::declare_varying_input(v, &mut inputs));
            }
        }
        _ => {}
    }

    // Uniforms.
    if samples_texture {
        lines.push(glsl::declare_uniform(
            UniformName::TextureSamplerDiffuse,
            &mut uniforms,
        ));
    }
    if shading == FragmentShading::LambertNormalMapped {
        lines.push(glsl::declare_uniform(
            UniformName::TextureSamplerNormal,
            &mut uniforms,
        ));
    }
    if shading == FragmentShading::AmbientTexture {
        lines.push(glsl::declare_uniform(
            UniformName::AmbientColour,
            &mut uniforms,
        ));
    }
    if lambert {
        for u in [
            UniformName::AmbientColour,
            UniformName::DirectionalLightDirection,
            UniformName::DirectionalLightColour,
        ] {
            lines.push(glsl::declare_uniform(u, &mut uniforms));
        }
    }
    if options.detailed_fog {
        for u in [UniformName::FogColour, UniformName::FogNear, UniformName::FogFar] {
            lines.push(glsl::declare_uniform(u, &mut uniforms));
        }
    }
    if options.alpha_test {
        lines.push(glsl::declare_uniform(
            UniformName::AlphaTestConstant,
            &mut uniforms,
        ));
    }

    // Output.
    lines.push(glsl::declare_fragment_output(
        FragmentOutputLocation::Colour,
        &mut outputs,
    ));

    // Body.
    lines.push("void main()".to_string());
    lines.push("{".to_string());
    if samples_texture {
        lines.push(
            "    vec4 diffuse = texture(texture_sampler_diffuse, vrt_texcoord0);".to_string(),
        );
    } else {
        lines.push("    vec4 diffuse = vrt_diffuse;".to_string());
    }
    if options.alpha_test {
        lines.push("    if (diffuse.a < alpha_test_constant)".to_string());
        lines.push("    {".to_string());
        lines.push("        discard;".to_string());
        lines.push("    }".to_string());
    }
    match shading {
        FragmentShading::PassThroughDiffuse | FragmentShading::TextureDiffuse => {
            lines.push("    vec4 shaded = diffuse;".to_string());
        }
        FragmentShading::AmbientTexture => {
            lines.push("    vec4 shaded = vec4(ambient_colour, 1.0) * diffuse;".to_string());
        }
        FragmentShading::LambertVarying | FragmentShading::LambertTexture => {
            lines.push(
                "    float directional_intensity = max(0.0, -dot(normalize(vrt_normal), directional_light_direction));"
                    .to_string(),
            );
            lines.push(
                "    vec3 lighting = ambient_colour + directional_intensity * directional_light_colour;"
                    .to_string(),
            );
            lines.push("    vec4 shaded = vec4(lighting, 1.0) * diffuse;".to_string());
        }
        FragmentShading::LambertNormalMapped => {
            lines.push(
                "    vec3 tangent_space_normal = 2.0 * texture(texture_sampler_normal, vrt_texcoord0).rgb - 1.0;"
                    .to_string(),
            );
            lines.push(
                "    mat3 from_tangent_to_camera = mat3(normalize(vrt_tangent), normalize(vrt_bitangent), normalize(vrt_normal));"
                    .to_string(),
            );
            lines.push(
                "    vec3 normal_in_camera = normalize(from_tangent_to_camera * tangent_space_normal);"
                    .to_string(),
            );
            lines.push(
                "    float directional_intensity = max(0.0, -dot(normal_in_camera, directional_light_direction));"
                    .to_string(),
            );
            lines.push(
                "    vec3 lighting = ambient_colour + directional_intensity * directional_light_colour;"
                    .to_string(),
            );
            lines.push("    vec4 shaded = vec4(lighting, 1.0) * diffuse;".to_string());
        }
    }
    if options.detailed_fog {
        lines.push("    float depth = gl_FragCoord.z / gl_FragCoord.w;".to_string());
        lines.push(
            "    float fog_factor = clamp((depth - fog_near) / (fog_far - fog_near), 0.0, 1.0);"
                .to_string(),
        );
        lines.push("    out_colour = mix(shaded, fog_colour, fog_factor);".to_string());
    } else {
        lines.push("    out_colour = shaded;".to_string());
    }
    lines.push("}".to_string());

    glsl::terminate_lines(&mut lines);
    FragmentStage {
        uid: uid.to_string(),
        lines,
        inputs,
        outputs,
        uniforms,
    }
}
