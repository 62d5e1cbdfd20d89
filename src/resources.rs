//! Resource availability: a read-only inventory of what a draw batch
//! actually has to offer the composition engine.
//!
//! The descriptor is owned by the caller (typically a render-batch object);
//! the engine only reads it for the duration of one composition call and
//! never mutates or retains it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::symbols::{UniformName, VertexInputLocation};

/// A texture bound for sampling: the texcoord input location the sampler
/// reads through, plus an opaque handle name owned by the resource cache.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureBinding {
    pub texcoord: VertexInputLocation,
    pub texture: String,
}

/// Presence of an attached skeletal (bone) dataset. Absence means the batch
/// is rigid and skinning must not be emitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletalBinding {
    pub bone_count: usize,
}

/// Per-skin resource bundle: populated vertex buffers, sampler bindings,
/// skeletal data and the skin's alpha-testing request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinResources {
    buffers: BTreeSet<VertexInputLocation>,
    textures: BTreeMap<UniformName, TextureBinding>,
    skeletal: Option<SkeletalBinding>,
    alpha_testing: bool,
}

impl SkinResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// The set of vertex-input locations backed by a populated buffer.
    pub fn buffers(&self) -> &BTreeSet<VertexInputLocation> {
        &self.buffers
    }

    pub fn has_buffer(&self, location: VertexInputLocation) -> bool {
        self.buffers.contains(&location)
    }

    /// Sampler uniform name → texture binding.
    pub fn textures(&self) -> &BTreeMap<UniformName, TextureBinding> {
        &self.textures
    }

    pub fn texture(&self, sampler: UniformName) -> Option<&TextureBinding> {
        self.textures.get(&sampler)
    }

    /// Attached skeletal dataset, if any.
    pub fn skeletal(&self) -> Option<&SkeletalBinding> {
        self.skeletal.as_ref()
    }

    /// Whether the skin's material requests alpha testing.
    pub fn use_alpha_testing(&self) -> bool {
        self.alpha_testing
    }

    pub fn with_buffers(
        mut self,
        locations: impl IntoIterator<Item = VertexInputLocation>,
    ) -> Self {
        self.buffers = locations.into_iter().collect();
        self
    }

    pub fn with_buffer(mut self, location: VertexInputLocation) -> Self {
        self.buffers.insert(location);
        self
    }

    pub fn with_texture(mut self, sampler: UniformName, binding: TextureBinding) -> Self {
        self.textures.insert(sampler, binding);
        self
    }

    pub fn with_skeletal(mut self, skeletal: SkeletalBinding) -> Self {
        self.skeletal = Some(skeletal);
        self
    }

    pub fn with_alpha_testing(mut self, enabled: bool) -> Self {
        self.alpha_testing = enabled;
        self
    }
}

/// Skin name → resource bundle for one draw batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResources {
    skins: BTreeMap<String, SkinResources>,
}

impl BatchResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skin(&self, name: &str) -> Option<&SkinResources> {
        self.skins.get(name)
    }

    pub fn skins(&self) -> &BTreeMap<String, SkinResources> {
        &self.skins
    }

    pub fn with_skin(mut self, name: impl Into<String>, resources: SkinResources) -> Self {
        self.skins.insert(name.into(), resources);
        self
    }
}
