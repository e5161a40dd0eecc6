//! Registry of entity types.
//!
//! Lookups are pure reads. A schema is usually built once at startup, either
//! in code or from a JSON declaration file, and shared by reference.

use crate::entity::EntityType;
use crate::error::JoinError;
use crate::join::{JoinPlan, JoinTranslator, Relationships};
use crate::relation::JoinKind;
use std::collections::HashMap;

/// Entity types keyed by type name
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entities: HashMap<String, EntityType>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type, replacing any previous one with the same name
    pub fn register(&mut self, entity: EntityType) -> &mut Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Builder form of [`Schema::register`]
    pub fn with(mut self, entity: EntityType) -> Self {
        self.register(entity);
        self
    }

    pub fn entity(&self, name: &str) -> Option<&EntityType> {
        self.entities.get(name)
    }

    /// Like [`Schema::entity`] but reports a missing type as [`JoinError::UnknownEntity`]
    pub fn resolve(&self, name: &str) -> Result<&EntityType, JoinError> {
        self.entity(name)
            .ok_or_else(|| JoinError::UnknownEntity(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Translate associations of the named entity with `translator`
    pub fn translate<'a>(
        &self,
        translator: &JoinTranslator,
        entity: &str,
        relationships: impl Into<Relationships<'a>>,
        join_kind: JoinKind,
    ) -> Result<JoinPlan, JoinError> {
        translator.translate(self.resolve(entity)?, relationships, join_kind)
    }

    /// Load entity declarations from a JSON array
    ///
    /// ```
    /// use relation_joins::Schema;
    ///
    /// let schema = Schema::from_json(r#"[
    ///     {"name": "Post", "associations": [
    ///         {"name": "comments", "rel_type": "has_many", "to_tbl": "comments",
    ///          "from_col": "id", "to_col": "post_id"}
    ///     ]}
    /// ]"#).unwrap();
    /// assert_eq!(schema.entity("Post").unwrap().table, "posts");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entities: Vec<EntityType> = serde_json::from_str(json)?;
        log::debug!("Loaded {} entity type(s) from JSON", entities.len());
        Ok(entities.into_iter().fold(Schema::new(), Schema::with))
    }

    /// Serialize every entity as a JSON array, sorted by name
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut entities: Vec<&EntityType> = self.entities.values().collect();
        entities.sort_by(|a, b| a.name.cmp(&b.name));
        serde_json::to_string_pretty(&entities)
    }
}
