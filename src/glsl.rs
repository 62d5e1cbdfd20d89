//! GLSL text assembly helpers.
//!
//! Each `declare_*` helper emits a single GLSL declaration line for a
//! symbolic name and records that name into the caller-supplied tracking
//! set — this is how the engine accumulates the stage interface and uniform
//! sets without separate bookkeeping. Declaring the same name twice is
//! idempotent (set semantics).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::symbols::{FragmentOutputLocation, UniformName, VaryingLocation, VertexInputLocation};

/// Target GLSL dialect, selected explicitly by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlslDialect {
    #[default]
    Desktop,
    WebGl,
}

/// Shader pipeline stage a source text is emitted for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl GlslDialect {
    /// The version pragma, always the first emitted line.
    pub fn version_pragma(self) -> &'static str {
        match self {
            GlslDialect::Desktop => "#version 450",
            GlslDialect::WebGl => "#version 300 es",
        }
    }

    /// The backward-compatibility declarations line, always second.
    ///
    /// Empty on desktop (reserved); ES requires a default float precision,
    /// which is what the reserved line carries there.
    pub fn compatibility_declarations(self, stage: StageKind) -> &'static str {
        match (self, stage) {
            (GlslDialect::Desktop, _) => "",
            (GlslDialect::WebGl, StageKind::Vertex) => "precision highp float;",
            (GlslDialect::WebGl, StageKind::Fragment) => "precision highp float;",
        }
    }

    /// Both header lines in emission order.
    pub fn header_lines(self, stage: StageKind) -> Vec<String> {
        vec![
            self.version_pragma().to_string(),
            self.compatibility_declarations(stage).to_string(),
        ]
    }
}

/// Declare a vertex input and record it into `tracking`.
pub fn declare_vertex_input(
    location: VertexInputLocation,
    tracking: &mut BTreeSet<VertexInputLocation>,
) -> String {
    tracking.insert(location);
    format!("in {} {};", location.glsl_type(), location.identifier())
}

/// Declare a vertex-stage output varying and record it into `tracking`.
pub fn declare_varying_output(
    varying: VaryingLocation,
    tracking: &mut BTreeSet<VaryingLocation>,
) -> String {
    tracking.insert(varying);
    format!("out {} {};", varying.glsl_type(), varying.identifier())
}

/// Declare a fragment-stage input varying and record it into `tracking`.
pub fn declare_varying_input(
    varying: VaryingLocation,
    tracking: &mut BTreeSet<VaryingLocation>,
) -> String {
    tracking.insert(varying);
    format!("in {} {};", varying.glsl_type(), varying.identifier())
}

/// Declare a fragment output and record it into `tracking`.
pub fn declare_fragment_output(
    location: FragmentOutputLocation,
    tracking: &mut BTreeSet<FragmentOutputLocation>,
) -> String {
    tracking.insert(location);
    format!("out {} {};", location.glsl_type(), location.identifier())
}

/// Declare a uniform (with `[N]` suffix for array uniforms) and record it
/// into `tracking`.
pub fn declare_uniform(uniform: UniformName, tracking: &mut BTreeSet<UniformName>) -> String {
    tracking.insert(uniform);
    if uniform.arity() > 1 {
        format!(
            "uniform {} {}[{}];",
            uniform.glsl_type(),
            uniform.identifier(),
            uniform.arity()
        )
    } else {
        format!("uniform {} {};", uniform.glsl_type(), uniform.identifier())
    }
}

/// Append the line terminator to every emitted line. The downstream consumer
/// expects a flat buffer of terminated strings, not a structured list.
pub fn terminate_lines(lines: &mut [String]) {
    for line in lines.iter_mut() {
        line.push('\n');
    }
}
