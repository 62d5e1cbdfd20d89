//! GLSL validation using the naga library.
//!
//! The composition engine only produces shader source text; actual
//! compilation is an external step. This module lets callers (and the test
//! suite) prove a composed stage is well-formed GLSL without touching a GPU.

use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone, Copy)]
pub enum GlslShaderStage {
    Vertex,
    Fragment,
}

impl GlslShaderStage {
    fn to_naga(self) -> naga::ShaderStage {
        match self {
            GlslShaderStage::Vertex => naga::ShaderStage::Vertex,
            GlslShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

/// Parse and validate one GLSL stage using naga's GLSL frontend.
///
/// # Arguments
/// * `source` - The GLSL source code to validate
/// * `stage` - Which pipeline stage the source was composed for
///
/// # Returns
/// The parsed naga Module on success, or an error with the numbered source
/// attached on failure.
pub fn validate_glsl(source: &str, stage: GlslShaderStage) -> Result<naga::Module> {
    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options {
        stage: stage.to_naga(),
        defines: Default::default(),
    };

    let module = frontend
        .parse(&options, source)
        .map_err(|e| anyhow!("GLSL parse failed:\n{}", format_with_source(source, &format!("{e:?}"))))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| anyhow!("GLSL validation failed:\n{}", format_with_source(source, &format!("{e:?}"))))?;

    Ok(module)
}

/// Validate GLSL and provide context about which leaf/stage generated it.
pub fn validate_glsl_with_context(
    source: &str,
    stage: GlslShaderStage,
    context: &str,
) -> Result<naga::Module> {
    validate_glsl(source, stage).with_context(|| format!("{} generated invalid GLSL", context))
}

/// Cross-compile a composed GLSL stage to WGSL for downstream tooling.
pub fn glsl_to_wgsl(source: &str, stage: GlslShaderStage) -> Result<String> {
    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options {
        stage: stage.to_naga(),
        defines: Default::default(),
    };

    let module = frontend
        .parse(&options, source)
        .map_err(|e| anyhow!("GLSL parse failed: {e:?}"))?;

    let info = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| anyhow!("GLSL validation failed: {e:?}"))?;

    naga::back::wgsl::write_string(
        &module,
        &info,
        naga::back::wgsl::WriterFlags::EXPLICIT_TYPES,
    )
    .map_err(|e| anyhow!("WGSL writer failed: {e:?}"))
}

/// Format an error with line-numbered source context for easier debugging.
fn format_with_source(source: &str, error: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("  {}\n", error));
    output.push_str("\nComposed GLSL:\n");
    output.push_str("---\n");
    for (line_num, line) in source.lines().enumerate() {
        output.push_str(&format!("{:4} | {}\n", line_num + 1, line));
    }
    output.push_str("---\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_vertex_glsl_passes() {
        let source = r#"#version 450
in vec3 in_position;
uniform mat4 matrix_from_camera_to_clipspace;
void main()
{
    gl_Position = matrix_from_camera_to_clipspace * vec4(in_position, 1.0);
}
"#;
        assert!(validate_glsl(source, GlslShaderStage::Vertex).is_ok());
    }

    #[test]
    fn invalid_glsl_fails_with_source_context() {
        let source = "#version 450\nvoid main() { gl_Position = ; }\n";
        let err = validate_glsl(source, GlslShaderStage::Vertex).unwrap_err();
        assert!(format!("{err:#}").contains("Composed GLSL"));
    }

    #[test]
    fn validate_with_context_names_the_producer() {
        let source = "not glsl at all";
        let result = validate_glsl_with_context(source, GlslShaderStage::Fragment, "test leaf");
        let err_msg = format!("{:#}", result.unwrap_err());
        assert!(err_msg.contains("test leaf"));
    }
}
