pub mod gemini;
pub mod validation;

use schemars::{gen::SchemaSettings, schema::RootSchema, schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    any::{type_name, TypeId},
    sync::Arc,
};

/// Cached JSON schema handle associated with a response type.
///
/// Carries two renderings of the same type: the draft-07 document used for
/// validation and OpenAI-style `response_format`, and the inlined
/// OpenAPI-subset document Gemini accepts as `responseSchema`.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    type_name: &'static str,
    type_id: TypeId,
    schema_json: Arc<Value>,
    response_schema: Arc<Value>,
}

impl SchemaHandle {
    /// Derive both schema renderings for `T`.
    pub fn for_type<T: JsonSchema + 'static>(schema_name: &'static str) -> Self {
        let root = schema_for!(T);
        let inlined = SchemaSettings::openapi3()
            .with(|settings| settings.inline_subschemas = true)
            .into_generator()
            .into_root_schema_for::<T>();

        Self::from_root_schemas::<T>(schema_name, type_name::<T>(), root, inlined)
    }

    fn from_root_schemas<T: 'static>(
        schema_name: &'static str,
        type_name: &'static str,
        root: RootSchema,
        inlined: RootSchema,
    ) -> Self {
        let schema_json = serde_json::to_value(root)
            .unwrap_or_else(|err| panic!("failed to serialize schema for {}: {}", type_name, err));
        let inlined_json = serde_json::to_value(inlined)
            .unwrap_or_else(|err| panic!("failed to serialize schema for {}: {}", type_name, err));

        Self {
            schema_name,
            type_name,
            type_id: TypeId::of::<T>(),
            schema_json: Arc::new(schema_json),
            response_schema: Arc::new(gemini::to_response_schema(&inlined_json)),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Draft-07 JSON schema, `$ref`s resolved against its own `definitions`.
    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }

    /// Self-contained schema in the subset Gemini's `responseSchema` accepts.
    pub fn response_schema(&self) -> &Value {
        self.response_schema.as_ref()
    }

    /// Names listed under the root `required` array.
    pub fn required_fields(&self) -> Vec<&str> {
        self.schema_json
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

pub trait CompletionSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}
