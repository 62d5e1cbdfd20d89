//! Interface compatibility checker.
//!
//! Invoked by the public entry point only when composition succeeded. The
//! fragment-stage input set must be exactly the vertex-stage output set, and
//! any instanced vertex variant must produce the same output set since both
//! variants feed the same fragment stage. A mismatch is a defect in the
//! decision tree itself, surfaced as a hard assertion rather than a
//! recoverable error.

use super::types::ComposedShaders;

pub(crate) fn verify_interface_closure(composed: &ComposedShaders) {
    assert_eq!(
        composed.fragment.inputs, composed.vertex.outputs,
        "fragment inputs must equal vertex outputs"
    );
    if let Some(instanced) = &composed.vertex_instanced {
        assert_eq!(
            instanced.outputs, composed.vertex.outputs,
            "instanced vertex variant must produce the same outputs"
        );
    }
}
