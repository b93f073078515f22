//! Value Normalizer - coerces SWAPI string values to their semantic types and
//! resolves `homeworld` / `species` references into embedded entities.

use crate::entity::{Entity, EntityKind, FieldType};
use crate::error::{EchoError, Result};
use crate::fetcher::ResourceFetcher;
use crate::transform::{
    convert_string_to_float, convert_string_to_int, convert_string_to_list, filter_data,
    is_unknown,
};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const LIST_DELIMITER: &str = ",";

pub struct Normalizer<'f, F: ?Sized> {
    fetcher: &'f F,
}

impl<'f, F> Normalizer<'f, F>
where
    F: ResourceFetcher + ?Sized,
{
    pub fn new(fetcher: &'f F) -> Self {
        Self { fetcher }
    }

    /// Clean an entity, returning a new mapping.
    ///
    /// With a `kind`, the entity is first filtered to that kind's allowed keys;
    /// without one every key is kept. Reference fields trigger a fetch and a
    /// recursive clean of the referenced record.
    pub fn clean<'a>(
        &'a self,
        entity: &'a Entity,
        kind: Option<EntityKind>,
    ) -> BoxFuture<'a, Result<Entity>> {
        Box::pin(async move {
            let filtered;
            let entity = match kind {
                Some(kind) => {
                    filtered = filter_data(entity, kind.allowed_keys());
                    &filtered
                }
                None => entity,
            };

            let mut clean = Entity::new();
            for (key, value) in entity {
                let cleaned = match value {
                    Value::String(s) => self.clean_string(key, s).await?,
                    Value::Array(items) if FieldType::of(key) == FieldType::Species => {
                        self.resolve_species(items).await?
                    }
                    other => other.clone(),
                };
                clean.insert(key.clone(), cleaned);
            }

            Ok(clean)
        })
    }

    async fn clean_string(&self, key: &str, value: &str) -> Result<Value> {
        if is_unknown(value) {
            return Ok(Value::Null);
        }

        let cleaned = match FieldType::of(key) {
            FieldType::Integer => convert_string_to_int(value),
            FieldType::Float if key == "gravity" => convert_string_to_float(value.trim_end()),
            FieldType::Float => convert_string_to_float(value),
            FieldType::List => convert_string_to_list(value, LIST_DELIMITER),
            FieldType::Homeworld => {
                Value::Object(self.resolve(value, EntityKind::Planet).await?)
            }
            FieldType::Species | FieldType::Text => Value::String(value.to_string()),
        };

        Ok(cleaned)
    }

    /// Only the first species reference is followed; the rest are dropped.
    async fn resolve_species(&self, items: &[Value]) -> Result<Value> {
        match items.first() {
            Some(Value::String(url)) => {
                let species = self.resolve(url, EntityKind::Species).await?;
                Ok(Value::Array(vec![Value::Object(species)]))
            }
            // already resolved, or empty
            _ => Ok(Value::Array(items.to_vec())),
        }
    }

    async fn resolve(&self, url: &str, kind: EntityKind) -> Result<Entity> {
        debug!("Resolving {} reference {}", kind, url);

        let fetched = self.fetcher.get(url, &[]).await?;
        let record = fetched.as_object().ok_or_else(|| EchoError::InvalidField {
            field: url.to_string(),
            reason: "expected an object".to_string(),
        })?;
        let record = filter_data(record, kind.allowed_keys());

        self.clean(&record, Some(kind)).await
    }
}
