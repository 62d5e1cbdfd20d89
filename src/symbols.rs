//! Symbolic resource vocabulary for composed shader programs.
//!
//! Every vertex attribute, varying, fragment output and uniform a composed
//! shader may reference is named by one of the closed enumerations below.
//! The mapping from symbolic name to GLSL type, array arity and in-shader
//! identifier is total and fixed at compile time; the composition engine
//! never invents identifiers outside this vocabulary.

use serde::{Deserialize, Serialize};

/// Size of the bone-matrix uniform array declared by skeletal vertex stages.
pub const MAX_SKELETAL_MATRICES: usize = 64;

/// Upper bound on the number of bone matrices blended per vertex.
///
/// Matches the component count of the bone index/weight attributes (ivec4 /
/// vec4); the actual blend count is the `NumMatricesPerVertex` uniform.
pub const MAX_MATRICES_PER_VERTEX: usize = 4;

/// Vertex-input binding locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VertexInputLocation {
    Position,
    Normal,
    Tangent,
    Bitangent,
    Diffuse,
    Texcoord0,
    Texcoord1,
    IndicesOfMatrices,
    WeightsOfMatrices,
    InstancedMatrixFromModelToCamera,
    InstancedDiffuse,
}

impl VertexInputLocation {
    /// Returns the GLSL type name for this input.
    pub fn glsl_type(self) -> &'static str {
        match self {
            VertexInputLocation::Position
            | VertexInputLocation::Normal
            | VertexInputLocation::Tangent
            | VertexInputLocation::Bitangent => "vec3",
            VertexInputLocation::Diffuse | VertexInputLocation::InstancedDiffuse => "vec4",
            VertexInputLocation::Texcoord0 | VertexInputLocation::Texcoord1 => "vec2",
            VertexInputLocation::IndicesOfMatrices => "ivec4",
            VertexInputLocation::WeightsOfMatrices => "vec4",
            VertexInputLocation::InstancedMatrixFromModelToCamera => "mat4",
        }
    }

    /// Canonical in-shader identifier.
    pub fn identifier(self) -> &'static str {
        match self {
            VertexInputLocation::Position => "in_position",
            VertexInputLocation::Normal => "in_normal",
            VertexInputLocation::Tangent => "in_tangent",
            VertexInputLocation::Bitangent => "in_bitangent",
            VertexInputLocation::Diffuse => "in_diffuse",
            VertexInputLocation::Texcoord0 => "in_texcoord0",
            VertexInputLocation::Texcoord1 => "in_texcoord1",
            VertexInputLocation::IndicesOfMatrices => "in_indices_of_matrices",
            VertexInputLocation::WeightsOfMatrices => "in_weights_of_matrices",
            VertexInputLocation::InstancedMatrixFromModelToCamera => {
                "in_instanced_matrix_from_model_to_camera"
            }
            VertexInputLocation::InstancedDiffuse => "in_instanced_diffuse",
        }
    }
}

/// Per-vertex values passed from the vertex stage to the fragment stage.
///
/// The same location set describes vertex outputs and fragment inputs; the
/// interface checker asserts the two sides agree after composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VaryingLocation {
    Diffuse,
    Normal,
    Tangent,
    Bitangent,
    Texcoord0,
}

impl VaryingLocation {
    /// Returns the GLSL type name for this varying.
    pub fn glsl_type(self) -> &'static str {
        match self {
            VaryingLocation::Diffuse => "vec4",
            VaryingLocation::Normal
            | VaryingLocation::Tangent
            | VaryingLocation::Bitangent => "vec3",
            VaryingLocation::Texcoord0 => "vec2",
        }
    }

    /// Canonical in-shader identifier.
    pub fn identifier(self) -> &'static str {
        match self {
            VaryingLocation::Diffuse => "vrt_diffuse",
            VaryingLocation::Normal => "vrt_normal",
            VaryingLocation::Tangent => "vrt_tangent",
            VaryingLocation::Bitangent => "vrt_bitangent",
            VaryingLocation::Texcoord0 => "vrt_texcoord0",
        }
    }
}

/// Fragment-output binding locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FragmentOutputLocation {
    Colour,
}

impl FragmentOutputLocation {
    pub fn glsl_type(self) -> &'static str {
        match self {
            FragmentOutputLocation::Colour => "vec4",
        }
    }

    pub fn identifier(self) -> &'static str {
        match self {
            FragmentOutputLocation::Colour => "out_colour",
        }
    }
}

/// Uniform symbolic names, including texture samplers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UniformName {
    DiffuseColour,
    AmbientColour,
    DirectionalLightDirection,
    DirectionalLightColour,
    FogColour,
    FogNear,
    FogFar,
    AlphaTestConstant,
    MatrixFromModelToCamera,
    MatrixFromCameraToClipspace,
    MatricesFromModelToCamera,
    NumMatricesPerVertex,
    TextureSamplerDiffuse,
    TextureSamplerNormal,
}

impl UniformName {
    /// Returns the GLSL type name for this uniform.
    pub fn glsl_type(self) -> &'static str {
        match self {
            UniformName::DiffuseColour | UniformName::FogColour => "vec4",
            UniformName::AmbientColour
            | UniformName::DirectionalLightDirection
            | UniformName::DirectionalLightColour => "vec3",
            UniformName::FogNear | UniformName::FogFar | UniformName::AlphaTestConstant => "float",
            UniformName::MatrixFromModelToCamera
            | UniformName::MatrixFromCameraToClipspace
            | UniformName::MatricesFromModelToCamera => "mat4",
            UniformName::NumMatricesPerVertex => "int",
            UniformName::TextureSamplerDiffuse | UniformName::TextureSamplerNormal => "sampler2D",
        }
    }

    /// Array element count; 1 for everything except array uniforms.
    pub fn arity(self) -> usize {
        match self {
            UniformName::MatricesFromModelToCamera => MAX_SKELETAL_MATRICES,
            _ => 1,
        }
    }

    /// Canonical in-shader identifier.
    pub fn identifier(self) -> &'static str {
        match self {
            UniformName::DiffuseColour => "diffuse_colour",
            UniformName::AmbientColour => "ambient_colour",
            UniformName::DirectionalLightDirection => "directional_light_direction",
            UniformName::DirectionalLightColour => "directional_light_colour",
            UniformName::FogColour => "fog_colour",
            UniformName::FogNear => "fog_near",
            UniformName::FogFar => "fog_far",
            UniformName::AlphaTestConstant => "alpha_test_constant",
            UniformName::MatrixFromModelToCamera => "matrix_from_model_to_camera",
            UniformName::MatrixFromCameraToClipspace => "matrix_from_camera_to_clipspace",
            UniformName::MatricesFromModelToCamera => "matrices_from_model_to_camera",
            UniformName::NumMatricesPerVertex => "num_matrices_per_vertex",
            UniformName::TextureSamplerDiffuse => "texture_sampler_diffuse",
            UniformName::TextureSamplerNormal => "texture_sampler_normal",
        }
    }
}
