use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use anyhow::{Context as _, Result};
use serde::de::DeserializeOwned;
use smallvec::SmallVec;
use toml::map::Entry;
use toml::{Table, Value};

/// Provides a layered builder for deserializing configuration.
#[must_use]
pub struct Builder {
    table: Result<Table>,
}

impl Builder {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self {
            table: Ok(Table::new()),
        }
    }

    /// Adds a layer of configuration.
    ///
    /// Layers added later take precedence over earlier ones.
    pub fn add_layer<L: Layer>(mut self, source: L) -> Self {
        self.table = self.table.and_then(|mut t| {
            source.extend_table(&mut t)?;
            Ok(t)
        });
        self
    }

    /// Deserializes the configuration from the provided layers.
    pub fn build<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let table = self.table?;
        T::deserialize(table).context("cannot deserialize config")
    }
}

/// A configuration layer.
pub trait Layer {
    /// Extends a TOML table by this layer.
    fn extend_table(&self, table: &mut Table) -> Result<()>;
}

/// A TOML file configuration layer.
#[must_use]
pub struct File {
    path: PathBuf,
    required: bool,
}

impl File {
    /// Creates a new layer, loading TOML from the file at the given path.
    ///
    /// The file is required by default.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required: true,
        }
    }

    /// Sets whether the file is required.
    ///
    /// If it is not required and does not exist, this layer is empty.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// A TOML text configuration layer.
#[must_use]
pub struct TomlText<'a> {
    text: &'a str,
}

impl<'a> TomlText<'a> {
    /// Creates a new layer, parsing the text as TOML.
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

/// An environment variable configuration layer.
///
/// Only variables whose name starts with the prefix are loaded. The prefix is
/// stripped and the rest of the name is lowercased. Nested values are
/// separated by `__` (two underscores), so with the prefix `BECH32_TOOL__`,
/// `BECH32_TOOL__CODEC__VARIANT` refers to `codec.variant`.
///
/// Values that parse as integers or booleans are inserted as such, everything
/// else is a string.
#[must_use]
pub struct Env {
    prefix: &'static str,
}

impl Env {
    /// Creates a new layer loading variables starting with `prefix`.
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }
}

impl Layer for File {
    fn extend_table(&self, table: &mut Table) -> Result<()> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            // a missing optional file is treated as empty
            Err(why) if !self.required && why.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(why) => {
                return Err(why).with_context(|| format!("cannot read config {:?}", self.path));
            },
        };

        let file = parse_table(&content)
            .with_context(|| format!("failed to load config {:?}", self.path))?;

        merge_tables(table, file);
        Ok(())
    }
}

impl Layer for TomlText<'_> {
    fn extend_table(&self, table: &mut Table) -> Result<()> {
        let toml = parse_table(self.text).context("toml str literal invalid")?;
        merge_tables(table, toml);
        Ok(())
    }
}

impl Layer for Env {
    fn extend_table(&self, table: &mut Table) -> Result<()> {
        insert_vars(table, self.prefix, env::vars_os());
        Ok(())
    }
}

/// Inserts variables starting with `prefix` into the table.
pub(super) fn insert_vars<I>(table: &mut Table, prefix: &str, vars: I)
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    for (key, value) in vars {
        // non-utf8 keys cannot refer to any config key
        let Ok(key) = key.into_string() else {
            continue;
        };

        let Some(key) = key.strip_prefix(prefix) else {
            continue;
        };

        let key = key.to_ascii_lowercase();

        // lossy, so that a bad value at least shows up in the deserialize error
        let value = value
            .into_string()
            .unwrap_or_else(|o| o.to_string_lossy().into_owned());

        let segments = key.split("__").collect::<SmallVec<[&str; 4]>>();
        insert_at(table, &segments, scalar_value(value));
    }
}

fn scalar_value(value: String) -> Value {
    if let Ok(int) = value.parse::<i64>() {
        Value::Integer(int)
    } else if let Ok(bool) = value.parse::<bool>() {
        Value::Boolean(bool)
    } else {
        Value::String(value)
    }
}

fn parse_table(text: &str) -> Result<Table> {
    toml::from_str(text).context("config toml is invalid")
}

fn merge_tables(target: &mut Table, consume: Table) {
    for (key, value) in consume {
        match target.entry(key) {
            Entry::Vacant(entry) => _ = entry.insert(value),
            Entry::Occupied(mut entry) => match (entry.get_mut(), value) {
                (Value::Table(a), Value::Table(b)) => merge_tables(a, b),
                (a, b) => *a = b,
            },
        }
    }
}

fn insert_at(table: &mut Table, path: &[&str], value: Value) {
    let [first, path @ ..] = path else {
        // `split` always yields at least one segment
        return;
    };

    match table.entry(*first) {
        Entry::Vacant(entry) => _ = entry.insert(nested_value(path, value)),
        Entry::Occupied(mut entry) => match entry.get_mut() {
            Value::Table(table) if !path.is_empty() => insert_at(table, path, value),
            entry => *entry = nested_value(path, value),
        },
    }
}

fn nested_value(path: &[&str], value: Value) -> Value {
    let [path @ .., last] = path else {
        return value;
    };

    let mut table = Table::new();
    let mut cur = &mut table;
    for &segment in path {
        cur = cur
            .entry(segment)
            .or_insert(Value::Table(Table::new()))
            .as_table_mut()
            .expect("just inserted as a table");
    }

    cur.insert((*last).to_owned(), value);
    Value::Table(table)
}
