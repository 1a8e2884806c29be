//! Layered key/value settings and the typed snap configuration.
//!
//! # Layering
//!
//! Settings are a stack of named layers.  Lookups walk the stack from the
//! most recently pushed layer down, so later layers override earlier ones:
//!
//! ```text
//! defaults  <  study_area  <  user
//! ```
//!
//! # TOML format
//!
//! ```toml
//! [defaults]
//! snap_tolerance_m = 25.0
//!
//! [study_area]
//! snap_tolerance_m = 15.0
//!
//! [user]
//! artificial_id_base = -500000000
//! ```
//!
//! Every section is optional.  [`SnapSettings::resolve`] turns the untyped
//! stack into the values the assembler needs, once, at startup.

use std::path::Path;

use serde::Deserialize;
use toml::{Table, Value};

use crate::{CoreError, CoreResult};

/// Key holding the snap tolerance in metres.
pub const SNAP_TOLERANCE_KEY: &str = "snap_tolerance_m";

/// Key holding the first (highest) id handed to artificial nodes and edges.
pub const ARTIFICIAL_ID_BASE_KEY: &str = "artificial_id_base";

/// Default start of the artificial id range.
pub const DEFAULT_ARTIFICIAL_ID_BASE: i64 = -1_000_000_000;

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Layer {
    name:   String,
    values: Table,
}

/// A stack of named key/value layers.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    layers: Vec<Layer>,
}

#[derive(Deserialize)]
struct SettingsFile {
    defaults:   Option<Table>,
    study_area: Option<Table>,
    user:       Option<Table>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a layer on top of the stack.
    pub fn push_layer(&mut self, name: impl Into<String>, values: Table) {
        self.layers.push(Layer { name: name.into(), values });
    }

    /// Builder-style [`push_layer`](Self::push_layer).
    pub fn with_layer(mut self, name: impl Into<String>, values: Table) -> Self {
        self.push_layer(name, values);
        self
    }

    /// Convenience for tests and small programs: a single `defaults` layer
    /// holding one key.
    pub fn single(key: &str, value: impl Into<Value>) -> Self {
        let mut t = Table::new();
        t.insert(key.to_owned(), value.into());
        Self::new().with_layer("defaults", t)
    }

    /// Parse the `[defaults]` / `[study_area]` / `[user]` TOML layout.
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let file: SettingsFile = toml::from_str(s)?;
        let mut settings = Self::new();
        for (name, table) in [
            ("defaults", file.defaults),
            ("study_area", file.study_area),
            ("user", file.user),
        ] {
            if let Some(t) = table {
                settings.push_layer(name, t);
            }
        }
        Ok(settings)
    }

    pub fn from_toml_path(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Names of the layers from bottom to top.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.iter().map(|l| l.name.as_str())
    }

    /// Topmost value for `key`, if any layer sets it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.layers.iter().rev().find_map(|l| l.values.get(key))
    }

    /// Numeric lookup.  Integers are widened to `f64`; any other type is a
    /// configuration error.
    pub fn get_f64(&self, key: &str) -> CoreResult<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Float(f)) => Ok(Some(*f)),
            Some(Value::Integer(i)) => Ok(Some(*i as f64)),
            Some(other) => Err(CoreError::Config(format!(
                "{key} must be a number, found {}",
                other.type_str()
            ))),
        }
    }

    pub fn get_i64(&self, key: &str) -> CoreResult<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Integer(i)) => Ok(Some(*i)),
            Some(other) => Err(CoreError::Config(format!(
                "{key} must be an integer, found {}",
                other.type_str()
            ))),
        }
    }
}

// ── SnapSettings ──────────────────────────────────────────────────────────────

/// Typed configuration consumed by the assembler and the splicer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapSettings {
    /// Maximum distance (metres) at which the query point attaches to an edge.
    pub snap_tolerance_m: f64,
    /// First id of the artificial range; ids count down from here.
    pub artificial_id_base: i64,
}

impl SnapSettings {
    /// Resolve from a settings stack.
    ///
    /// A missing snap tolerance is [`CoreError::ConfigurationMissing`]; a
    /// non-positive one, or a non-negative id base, is [`CoreError::Config`].
    pub fn resolve(settings: &Settings) -> CoreResult<Self> {
        let snap_tolerance_m = settings
            .get_f64(SNAP_TOLERANCE_KEY)?
            .ok_or_else(|| CoreError::ConfigurationMissing(SNAP_TOLERANCE_KEY.to_owned()))?;
        if !(snap_tolerance_m.is_finite() && snap_tolerance_m > 0.0) {
            return Err(CoreError::Config(format!(
                "{SNAP_TOLERANCE_KEY} must be > 0, got {snap_tolerance_m}"
            )));
        }

        let artificial_id_base = settings
            .get_i64(ARTIFICIAL_ID_BASE_KEY)?
            .unwrap_or(DEFAULT_ARTIFICIAL_ID_BASE);
        if artificial_id_base >= 0 {
            return Err(CoreError::Config(format!(
                "{ARTIFICIAL_ID_BASE_KEY} must be negative, got {artificial_id_base}"
            )));
        }

        Ok(Self { snap_tolerance_m, artificial_id_base })
    }
}
