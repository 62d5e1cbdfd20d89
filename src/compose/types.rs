//! Result and error types for shader composition.

use std::collections::BTreeSet;
use std::fmt;

use crate::effects::EffectConfig;
use crate::symbols::{FragmentOutputLocation, UniformName, VaryingLocation, VertexInputLocation};

/// One composed vertex-stage program: terminated source lines, a
/// location-derived cache key, and the interface/uniform sets accumulated
/// while the lines were emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexStage {
    /// Location-derived unique identifier, used as a cache key by callers.
    pub uid: String,
    /// Newline-terminated GLSL source lines, version pragma first.
    pub lines: Vec<String>,
    pub inputs: BTreeSet<VertexInputLocation>,
    pub outputs: BTreeSet<VaryingLocation>,
    pub uniforms: BTreeSet<UniformName>,
}

/// One composed fragment-stage program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentStage {
    pub uid: String,
    pub lines: Vec<String>,
    pub inputs: BTreeSet<VaryingLocation>,
    pub outputs: BTreeSet<FragmentOutputLocation>,
    pub uniforms: BTreeSet<UniformName>,
}

/// A successful composition: a consistent (vertex, optional instanced
/// vertex, fragment) program triple plus the configuration that produced it,
/// echoed back unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedShaders {
    pub effects: EffectConfig,
    pub vertex: VertexStage,
    /// Vertex variant specialised for GPU instancing. `None` when instancing
    /// does not apply to the selected leaf (skeletal batches, or leaves whose
    /// primary stage is already instanced).
    pub vertex_instanced: Option<VertexStage>,
    pub fragment: FragmentStage,
}

impl ComposedShaders {
    /// Concatenated vertex source, convenience for callers that want a flat
    /// buffer rather than lines.
    pub fn vertex_source(&self) -> String {
        self.vertex.lines.concat()
    }

    pub fn fragment_source(&self) -> String {
        self.fragment.lines.concat()
    }
}

/// A recoverable composition failure: a human-readable diagnostic plus a
/// repaired configuration guaranteed to be accepted by a more-constrained
/// branch of the decision tree on a subsequent call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposeError {
    /// `<file>[<line>]: ERROR : <message>` — never empty.
    pub diagnostic: String,
    /// Suggested retry input. Never identical to the configuration that
    /// failed, and repeated retry always converges to a success.
    pub repaired: EffectConfig,
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostic)
    }
}

impl std::error::Error for ComposeError {}
