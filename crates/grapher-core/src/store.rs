// File: crates/grapher-core/src/store.rs
// Summary: ConfigStore owning the canonical configuration tree, its typed view and derived state.

use serde_json::Value;
use tracing::debug;

use crate::config::ChartConfig;
use crate::datum::Row;
use crate::derive::{self, ChangeSet, Derived};
use crate::error::{ConfigError, DerivationError};
use crate::merge::{deep_merge, split_partial, MergeMode};
use crate::types::{ChartKind, Environment};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Ready,
}

/// Owns one chart's configuration.
///
/// Every merge runs validate → merge into a candidate → type-check → diff → apply →
/// re-derive. Any failure before "apply" leaves the store untouched.
#[derive(Debug)]
pub struct ConfigStore {
    state: StoreState,
    mode: MergeMode,
    /// Canonical tree, without `data`.
    options: Value,
    config: ChartConfig,
    env: Environment,
    derived: Option<Result<Derived, DerivationError>>,
}

impl ConfigStore {
    pub fn new(mode: MergeMode, env: Environment) -> Self {
        Self {
            state: StoreState::Uninitialized,
            mode,
            options: Value::Null,
            config: ChartConfig::defaults(ChartKind::Line),
            env,
            derived: None,
        }
    }

    pub fn state(&self) -> StoreState { self.state }

    pub fn mode(&self) -> MergeMode { self.mode }

    pub fn environment(&self) -> &Environment { &self.env }

    /// Build kind defaults and apply `user_config` on top.
    pub fn initialize(&mut self, kind: ChartKind, user_config: &Value) -> Result<(), ConfigError> {
        if self.state == StoreState::Ready {
            return Err(ConfigError::AlreadyInitialized);
        }
        let defaults = ChartConfig::defaults(kind);
        let base = defaults.to_value()?;
        // the kind argument wins over a `type` inside the user config
        let (mut patch, data) = split_partial(user_config)?;
        if let Some(map) = patch.as_object_mut() {
            map.remove("type");
        }
        let (options, config) = self.candidate(&base, &patch, data.unwrap_or_default())?;
        debug!(%kind, rows = config.data.len(), "configuration initialized");
        self.options = options;
        self.config = config;
        self.state = StoreState::Ready;
        self.derived = Some(derive::derive_all(&self.config, &self.env));
        Ok(())
    }

    /// Apply a partial configuration and re-derive what changed. Returns the change set.
    pub fn merge(&mut self, partial: &Value) -> Result<ChangeSet, ConfigError> {
        if self.state != StoreState::Ready {
            return Err(ConfigError::NotInitialized);
        }
        let (patch, data) = split_partial(partial)?;
        let data = data.unwrap_or_else(|| self.config.data.clone());
        let (options, config) = self.candidate(&self.options, &patch, data)?;
        let changes = ChangeSet::between(&self.config, &config);
        debug!(?changes, "configuration merged");
        self.options = options;
        self.config = config;
        self.rederive(changes);
        Ok(changes)
    }

    /// Update container metrics; margins are re-derived.
    pub fn set_environment(&mut self, env: Environment) {
        if env == self.env {
            return;
        }
        self.env = env;
        if self.state == StoreState::Ready {
            self.rederive(ChangeSet { environment: true, ..ChangeSet::default() });
        }
    }

    fn candidate(&self, base: &Value, patch: &Value, data: Vec<Row>) -> Result<(Value, ChartConfig), ConfigError> {
        let mut options = base.clone();
        deep_merge(&mut options, patch, self.mode, "")?;
        let config = ChartConfig::from_value(&options, data)?;
        Ok((options, config))
    }

    fn rederive(&mut self, changes: ChangeSet) {
        self.derived = Some(match &self.derived {
            Some(Ok(previous)) => derive::rederive(previous, &self.config, &self.env, &changes),
            // a previous failure leaves nothing reliable to start from
            _ => derive::derive_all(&self.config, &self.env),
        });
    }

    /// Typed read-only snapshot.
    pub fn config(&self) -> &ChartConfig { &self.config }

    /// Canonical JSON tree, with `data` re-attached.
    pub fn canonical(&self) -> Value {
        let mut tree = self.options.clone();
        if let Some(map) = tree.as_object_mut() {
            let rows = self
                .config
                .data
                .iter()
                .map(|row| serde_json::to_value(row).unwrap_or(Value::Null))
                .collect();
            map.insert("data".to_string(), Value::Array(rows));
        }
        tree
    }

    /// Current derived state, or the error the last derivation produced.
    pub fn derived(&self) -> Result<&Derived, DerivationError> {
        match &self.derived {
            Some(Ok(derived)) => Ok(derived),
            Some(Err(err)) => Err(err.clone()),
            None => Err(DerivationError::NotDerived),
        }
    }
}
