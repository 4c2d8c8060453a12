use schemars::gen::SchemaGenerator;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Model output type with a typed fallback when parsing fails
pub trait LlmResponse: DeserializeOwned + Default + JsonSchema {
    /// Mark this value as a fallback produced after a parse failure
    fn mark_as_fallback(&mut self, error_message: String);

    fn is_success(&self) -> bool;

    /// JSON schema embedded into prompts so the model knows the expected shape
    fn json_schema_string() -> String {
        let mut gen = SchemaGenerator::default();
        let schema = gen.root_schema_for::<Self>();
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
    }
}
