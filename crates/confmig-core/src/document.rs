//! Configuration document model
//!
//! Wraps a [`toml_edit::DocumentMut`] so that everything a migration does not
//! touch (comments, whitespace, ordering) survives a parse/serialize cycle.
//!
//! Plugin instances are the tables found under a category block:
//!
//! ```toml
//! [[outputs.kinesis]]        # repeated instances
//!   region = "eu-west-1"
//!
//! [inputs.cpu]               # single-table form
//!   percpu = true
//! ```

use toml_edit::{DocumentMut, Item, Table};

use crate::error::ParseError;
use crate::plugin::{PluginCategory, PluginId};

/// Parsed, mutable configuration document
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    inner: DocumentMut,
}

impl ConfigDocument {
    /// Parse raw bytes
    ///
    /// # Errors
    /// - `ParseError::Utf8` if the input is not UTF-8
    /// - `ParseError::Syntax` if the input is not well-formed TOML
    pub fn parse(raw: &[u8]) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(raw)?;
        let inner = text.parse::<DocumentMut>()?;
        Ok(Self { inner })
    }

    /// Serialize back to bytes
    #[inline]
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_string().into_bytes()
    }

    /// Mutable views of all plugin instances of a category, in document order
    ///
    /// Entries under the category block that are not tables (inline tables,
    /// plain values) are skipped.
    pub fn instances_mut(&mut self, category: PluginCategory) -> Vec<PluginInstance<'_>> {
        let Some(block) = self
            .inner
            .get_mut(category.as_str())
            .and_then(Item::as_table_mut)
        else {
            return Vec::new();
        };

        let mut instances = Vec::new();
        for (name, item) in block.iter_mut() {
            let id = PluginId::new(category, name.get());
            match item {
                Item::ArrayOfTables(array) => {
                    for (index, table) in array.iter_mut().enumerate() {
                        instances.push(PluginInstance {
                            id: id.clone(),
                            index,
                            table,
                        });
                    }
                }
                Item::Table(table) => instances.push(PluginInstance {
                    id,
                    index: 0,
                    table,
                }),
                other => {
                    tracing::debug!(plugin = %id, kind = other.type_name(), "skipping non-table plugin entry");
                }
            }
        }

        instances.sort_by_key(|instance| instance.table.position().unwrap_or(usize::MAX));
        instances
    }

    /// Identifiers of all plugin instances in document order
    ///
    /// Instances of different categories interleave the way they appear in the file.
    #[must_use]
    pub fn plugin_ids(&self) -> Vec<PluginId> {
        let mut found: Vec<(usize, PluginId)> = Vec::new();
        for category in PluginCategory::ALL {
            let Some(block) = self.inner.get(category.as_str()).and_then(Item::as_table) else {
                continue;
            };

            for (name, item) in block.iter() {
                match item {
                    Item::ArrayOfTables(array) => {
                        for table in array.iter() {
                            found.push((
                                table.position().unwrap_or(usize::MAX),
                                PluginId::new(category, name),
                            ));
                        }
                    }
                    Item::Table(table) => found.push((
                        table.position().unwrap_or(usize::MAX),
                        PluginId::new(category, name),
                    )),
                    _ => {}
                }
            }
        }
        found.sort_by_key(|(position, _)| *position);
        found.into_iter().map(|(_, id)| id).collect()
    }

    /// Underlying document
    #[inline]
    #[must_use]
    pub fn as_toml(&self) -> &DocumentMut {
        &self.inner
    }
}

/// Scoped mutable view of one plugin instance
#[derive(Debug)]
pub struct PluginInstance<'a> {
    id: PluginId,
    index: usize,
    table: &'a mut Table,
}

impl PluginInstance<'_> {
    /// Plugin identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &PluginId {
        &self.id
    }

    /// Position among instances of the same plugin
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Instance table
    #[inline]
    #[must_use]
    pub fn table(&self) -> &Table {
        self.table
    }

    /// Mutable instance table
    #[inline]
    pub fn table_mut(&mut self) -> &mut Table {
        self.table
    }
}
