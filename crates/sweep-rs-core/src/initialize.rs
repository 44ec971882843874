//! Turning partial configs into validated instances.

use crate::check::{UnhashablePolicy, check_model};
use crate::combine::{field, product};
use crate::error::SweepError;
use crate::nested::{from_items, get_config, merge, prune, replace};
use crate::path::{IntoPath, Path};
use crate::schema::{Instance, SchemaRegistry};
use crate::value::{Config, Value};
use log::debug;

/// Options for [`initialize`].
#[derive(Debug, Clone)]
pub struct InitializeOptions {
    /// Values set in every config; collisions with config values are errors.
    pub constant: Option<Config>,
    /// Values used where a config leaves a field unset.
    pub default: Option<Config>,
    /// Place each instance at this path of a fresh config.
    pub to: Option<Path>,
    /// Construct the sub-config at this path and write the instance back.
    pub at: Option<Path>,
    /// Run [`check_model`] before constructing anything.
    pub check: bool,
}

impl Default for InitializeOptions {
    fn default() -> Self {
        Self {
            constant: None,
            default: None,
            to: None,
            at: None,
            check: true,
        }
    }
}

impl InitializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys of `constant` may be dotted paths.
    pub fn with_constant(mut self, constant: Config) -> Self {
        self.constant = Some(constant);
        self
    }

    /// Keys of `default` may be dotted paths.
    pub fn with_default(mut self, default: Config) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_to(mut self, path: impl IntoPath) -> Result<Self, SweepError> {
        self.to = Some(path.into_path(true)?);
        Ok(self)
    }

    pub fn with_at(mut self, path: impl IntoPath) -> Result<Self, SweepError> {
        self.at = Some(path.into_path(true)?);
        Ok(self)
    }

    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }
}

/// Result of [`initialize`]: instances, or configs holding them when `to`
/// or `at` was given.
#[derive(Debug, Clone, PartialEq)]
pub enum Initialized {
    Instances(Vec<Instance>),
    Configs(Vec<Config>),
}

impl Initialized {
    pub fn len(&self) -> usize {
        match self {
            Initialized::Instances(instances) => instances.len(),
            Initialized::Configs(configs) => configs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_instances(self) -> Result<Vec<Instance>, SweepError> {
        match self {
            Initialized::Instances(instances) => Ok(instances),
            Initialized::Configs(_) => Err(SweepError::InvalidArguments(
                "initialization produced configs, not instances".to_string(),
            )),
        }
    }

    pub fn into_configs(self) -> Result<Vec<Config>, SweepError> {
        match self {
            Initialized::Configs(configs) => Ok(configs),
            Initialized::Instances(_) => Err(SweepError::InvalidArguments(
                "initialization produced instances, not configs".to_string(),
            )),
        }
    }
}

/// Construct one `schema` instance per config.
///
/// Constants are combined into every config first and `DefaultValue`
/// placeholders are pruned so the schema defaults apply. Default overlays are
/// applied underneath the config values. With `at`, only the sub-config at
/// that path is constructed; with `to`, each instance is wrapped into a config
/// at that path.
pub fn initialize(
    registry: &SchemaRegistry,
    schema: &str,
    configs: Vec<Config>,
    options: &InitializeOptions,
) -> Result<Initialized, SweepError> {
    if options.to.is_some() && options.at.is_some() {
        return Err(SweepError::InvalidArguments(
            "only one of `to` and `at` can be provided".to_string(),
        ));
    }

    if options.check {
        check_model(registry, schema, UnhashablePolicy::Warn)?;
    }

    let mut configs = configs;
    if let Some(constant) = &options.constant {
        let constant = normalize_keys(constant)?;
        configs = product([configs, vec![constant]])?;
    }

    let mut configs: Vec<Config> = configs
        .iter()
        .map(|config| prune(config, &Value::Default))
        .collect();

    if let Some(default) = &options.default {
        let default = prune(&normalize_keys(default)?, &Value::Default);
        configs = configs
            .iter()
            .map(|config| merge([&default, config], true))
            .collect::<Result<_, _>>()?;
    }

    if let Some(at) = &options.at {
        let subconfigs = configs
            .iter()
            .map(|config| get_config(config, at).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        let nested = initialize(registry, schema, subconfigs, &InitializeOptions::default())
            .map_err(|err| err.under(at))?
            .into_instances()?;
        let configs = configs
            .iter()
            .zip(nested)
            .map(|(config, instance)| replace(config, at, instance))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Initialized::Configs(configs));
    }

    let instances = configs
        .into_iter()
        .map(|config| registry.construct(schema, config))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "initialized instances (schema={schema}, count={})",
        instances.len()
    );

    match &options.to {
        Some(to) => Ok(Initialized::Configs(field(to, instances, false)?)),
        None => Ok(Initialized::Instances(instances)),
    }
}

/// Expand dotted keys into nested mappings.
fn normalize_keys(config: &Config) -> Result<Config, SweepError> {
    let items = config
        .iter()
        .map(|(key, value)| Ok((key.into_path(false)?, value.clone())))
        .collect::<Result<Vec<_>, SweepError>>()?;
    from_items(items)
}
