mod block;
mod property_value;

pub use block::{Block, BlockKind};
pub use property_value::PropertyValue;

use crate::types::{BlockId, DatabaseId, PageId};
use std::collections::HashMap;

/// A row of the source database, as returned by a database query.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: PageId,
    pub url: String,
    pub properties: HashMap<String, PropertyValue>,
    pub parent: Option<Parent>,
    pub archived: bool,
}

impl Page {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// The page's title-typed property, whatever it is named.
    pub fn title_property(&self) -> Option<&PropertyValue> {
        self.properties
            .values()
            .find(|value| matches!(value, PropertyValue::Title(_)))
    }

    /// The database this page is a row of, if Notion reported one.
    pub fn parent_database(&self) -> Option<&DatabaseId> {
        match &self.parent {
            Some(Parent::Database { database_id }) => Some(database_id),
            _ => None,
        }
    }
}

/// Parent reference with typed IDs
#[derive(Debug, Clone, PartialEq)]
pub enum Parent {
    Page { page_id: PageId },
    Database { database_id: DatabaseId },
    Block { block_id: BlockId },
    Workspace,
}
