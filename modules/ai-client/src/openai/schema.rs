use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;

/// Trait for types that can be used as OpenAI structured output.
///
/// Automatically implemented for any type that implements `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate a schema in the dialect OpenAI strict mode accepts:
    /// every object closed with `additionalProperties: false`, every
    /// property listed in `required`, and all `definitions` inlined
    /// (strict mode rejects `$ref`).
    fn openai_schema() -> serde_json::Value {
        let mut value = serde_json::to_value(schema_for!(Self)).unwrap_or_default();

        let definitions = value.get("definitions").cloned();
        strictify(&mut value, definitions.as_ref());

        if let serde_json::Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// One recursive pass: inline `$ref` and single-entry `allOf` indirection,
/// then close object schemas the way strict mode requires.
fn strictify(value: &mut serde_json::Value, definitions: Option<&serde_json::Value>) {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.and_then(|d| d.get(name)) {
                        *value = def.clone();
                        strictify(value, definitions);
                        return;
                    }
                }
            }

            if let Some(serde_json::Value::Array(all_of)) = map.get("allOf").cloned() {
                if all_of.len() == 1 {
                    *value = all_of.into_iter().next().expect("length checked");
                    strictify(value, definitions);
                    return;
                }
            }

            if map.get("type") == Some(&serde_json::Value::String("object".to_string())) {
                map.insert(
                    "additionalProperties".to_string(),
                    serde_json::Value::Bool(false),
                );

                if let Some(serde_json::Value::Object(props)) = map.get("properties") {
                    let all_keys: Vec<serde_json::Value> = props
                        .keys()
                        .map(|k| serde_json::Value::String(k.clone()))
                        .collect();
                    map.insert("required".to_string(), serde_json::Value::Array(all_keys));
                }
            }

            for (_, v) in map.iter_mut() {
                strictify(v, definitions);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                strictify(item, definitions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct TestPost {
        text: String,
        hashtags: Option<String>,
    }

    #[derive(Deserialize, JsonSchema)]
    struct TestPostSet {
        posts: Vec<TestPost>,
    }

    #[test]
    fn test_openai_schema_generation() {
        let schema = TestPostSet::openai_schema();
        assert!(schema.is_object());
        assert_eq!(TestPostSet::type_name(), "TestPostSet");
    }

    #[test]
    fn test_all_properties_required_even_nullable() {
        let schema = TestPost::openai_schema();
        let schema_obj = schema.as_object().unwrap();

        let required = schema_obj
            .get("required")
            .expect("should have required array")
            .as_array()
            .unwrap();
        let required_strs: Vec<&str> = required.iter().filter_map(|v| v.as_str()).collect();

        assert!(required_strs.contains(&"text"));
        assert!(required_strs.contains(&"hashtags"));
        assert_eq!(
            schema_obj.get("additionalProperties"),
            Some(&serde_json::Value::Bool(false))
        );
    }

    #[test]
    fn test_nested_item_schema_inlined() {
        let schema = TestPostSet::openai_schema();
        let schema_obj = schema.as_object().unwrap();

        assert!(!schema_obj.contains_key("definitions"));
        assert!(!schema_obj.contains_key("$schema"));

        let items = schema_obj
            .get("properties")
            .and_then(|p| p.get("posts"))
            .and_then(|p| p.get("items"))
            .and_then(|i| i.as_object())
            .expect("posts.items should be inlined");

        assert!(!items.contains_key("$ref"));
        assert_eq!(
            items.get("type"),
            Some(&serde_json::Value::String("object".to_string()))
        );
        assert_eq!(
            items.get("additionalProperties"),
            Some(&serde_json::Value::Bool(false))
        );
    }
}
