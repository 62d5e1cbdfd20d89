//! Effect configuration: the declarative description of a desired rendering
//! effect handed to the composition engine.
//!
//! `EffectConfig` is an immutable value object. Nothing on this type can
//! fail; whether a configuration is actually realisable against a given
//! resource set is entirely the engine's job. All "repair" adjustments the
//! engine suggests happen on a clone, never on the caller's original.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Shader output kinds. Only `Default` has composition leaves; the debug
/// output kinds are recognised but rejected with a repair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShaderOutputType {
    Default,
    Normal,
    Depth,
}

/// Light kinds the engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LightType {
    Ambient,
    Directional,
}

/// Lighting-channel kinds, the keys of the lighting-data mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LightingDataKind {
    Direction,
    Normal,
    Diffuse,
    Specular,
}

/// Where the data backing a lighting channel comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataSourceKind {
    Uniform,
    Buffer,
    Texture,
    Instance,
}

/// Fog modes. `Interpolated` is recognised but unsupported and always fails
/// fast in the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FogType {
    #[default]
    None,
    Detailed,
    Interpolated,
}

/// Desired rendering effect: lighting model, data source per lighting
/// channel, fog mode and output-channel set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectConfig {
    shader_output_types: BTreeSet<ShaderOutputType>,
    light_types: BTreeSet<LightType>,
    lighting_data: BTreeMap<LightingDataKind, DataSourceKind>,
    fog_type: FogType,
}

impl Default for EffectConfig {
    /// The unlit textured baseline: `{Default}` outputs, no lights,
    /// `{Diffuse: Texture}`, no fog.
    fn default() -> Self {
        Self {
            shader_output_types: BTreeSet::from([ShaderOutputType::Default]),
            light_types: BTreeSet::new(),
            lighting_data: BTreeMap::from([(LightingDataKind::Diffuse, DataSourceKind::Texture)]),
            fog_type: FogType::None,
        }
    }
}

impl EffectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shader_output_types(&self) -> &BTreeSet<ShaderOutputType> {
        &self.shader_output_types
    }

    pub fn light_types(&self) -> &BTreeSet<LightType> {
        &self.light_types
    }

    pub fn lighting_data(&self) -> &BTreeMap<LightingDataKind, DataSourceKind> {
        &self.lighting_data
    }

    /// The data source for one lighting channel, if configured.
    pub fn lighting_data_source(&self, kind: LightingDataKind) -> Option<DataSourceKind> {
        self.lighting_data.get(&kind).copied()
    }

    pub fn fog_type(&self) -> FogType {
        self.fog_type
    }

    pub fn with_shader_output_types(
        mut self,
        types: impl IntoIterator<Item = ShaderOutputType>,
    ) -> Self {
        self.shader_output_types = types.into_iter().collect();
        self
    }

    pub fn with_light_types(mut self, types: impl IntoIterator<Item = LightType>) -> Self {
        self.light_types = types.into_iter().collect();
        self
    }

    pub fn with_lighting_data(
        mut self,
        data: impl IntoIterator<Item = (LightingDataKind, DataSourceKind)>,
    ) -> Self {
        self.lighting_data = data.into_iter().collect();
        self
    }

    /// Set or replace the data source of a single lighting channel.
    pub fn with_lighting_data_source(
        mut self,
        kind: LightingDataKind,
        source: DataSourceKind,
    ) -> Self {
        self.lighting_data.insert(kind, source);
        self
    }

    /// Remove one lighting channel from the mapping.
    pub fn without_lighting_data(mut self, kind: LightingDataKind) -> Self {
        self.lighting_data.remove(&kind);
        self
    }

    pub fn with_fog_type(mut self, fog: FogType) -> Self {
        self.fog_type = fog;
        self
    }

    /// Parse a configuration from its JSON form (the editor-facing input).
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse effect configuration JSON")
    }

    /// Serialise the configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialise effect configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unlit_textured_baseline() {
        let cfg = EffectConfig::default();
        assert_eq!(
            cfg.shader_output_types(),
            &BTreeSet::from([ShaderOutputType::Default])
        );
        assert!(cfg.light_types().is_empty());
        assert_eq!(
            cfg.lighting_data_source(LightingDataKind::Diffuse),
            Some(DataSourceKind::Texture)
        );
        assert_eq!(cfg.fog_type(), FogType::None);
    }

    #[test]
    fn builders_replace_fields_without_touching_original() {
        let base = EffectConfig::default();
        let lit = base
            .clone()
            .with_light_types([LightType::Ambient, LightType::Directional])
            .with_lighting_data_source(LightingDataKind::Normal, DataSourceKind::Buffer)
            .with_fog_type(FogType::Detailed);
        assert!(base.light_types().is_empty());
        assert_eq!(lit.light_types().len(), 2);
        assert_eq!(lit.fog_type(), FogType::Detailed);
        assert_eq!(
            lit.lighting_data_source(LightingDataKind::Diffuse),
            Some(DataSourceKind::Texture)
        );
    }

    #[test]
    fn json_round_trip_preserves_configuration() {
        let cfg = EffectConfig::default()
            .with_light_types([LightType::Ambient])
            .with_lighting_data([
                (LightingDataKind::Direction, DataSourceKind::Uniform),
                (LightingDataKind::Normal, DataSourceKind::Texture),
                (LightingDataKind::Diffuse, DataSourceKind::Texture),
            ])
            .with_fog_type(FogType::Detailed);
        let json = cfg.to_json_string().expect("serialise");
        let back = EffectConfig::from_json_str(&json).expect("parse");
        assert_eq!(cfg, back);
    }
}
