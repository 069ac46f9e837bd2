use serde::Deserialize;
use serde::Serialize;

/// Which build of nanoutils the rewritten imports point at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
  /// `nanoutils/lib/<name>`
  #[default]
  Cjs,
  /// `nanoutils/es/<name>`
  Esm,
}

impl ModuleFormat {
  pub fn directory(self) -> &'static str {
    match self {
      ModuleFormat::Cjs => "lib",
      ModuleFormat::Esm => "es",
    }
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "RawTransformOptions", rename_all = "camelCase")]
pub struct TransformOptions {
  pub module_format: ModuleFormat,
}

impl TransformOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_module_format(mut self, module_format: ModuleFormat) -> Self {
    self.module_format = module_format;
    self
  }
}

// Babel plugin configs only had `{ "cjs": bool }`.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawTransformOptions {
  module_format: Option<ModuleFormat>,
  cjs: Option<bool>,
}

impl From<RawTransformOptions> for TransformOptions {
  fn from(raw: RawTransformOptions) -> Self {
    let legacy = raw.cjs.map(|cjs| match cjs {
      true => ModuleFormat::Cjs,
      false => ModuleFormat::Esm,
    });
    TransformOptions {
      module_format: raw.module_format.or(legacy).unwrap_or_default(),
    }
  }
}
