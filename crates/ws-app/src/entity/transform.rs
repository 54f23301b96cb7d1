use serde_json::{Map, Value};
use ws_core::entity::{EntityConfig, FormMode};

/// Hook applied to a serialized form body right before it is submitted.
pub trait SubmitTransform: Send + Sync {
    fn transform(
        &self,
        config: &EntityConfig,
        mode: &FormMode,
        body: Map<String, Value>,
    ) -> Map<String, Value>;
}

impl<F> SubmitTransform for F
where
    F: Fn(&EntityConfig, &FormMode, Map<String, Value>) -> Map<String, Value> + Send + Sync,
{
    fn transform(
        &self,
        config: &EntityConfig,
        mode: &FormMode,
        body: Map<String, Value>,
    ) -> Map<String, Value> {
        self(config, mode, body)
    }
}

/// Fills keys the form left out when creating a record.
#[derive(Debug, Clone, Default)]
pub struct CreateDefaults {
    defaults: Map<String, Value>,
}

impl CreateDefaults {
    pub fn new(defaults: Map<String, Value>) -> Self {
        Self { defaults }
    }
}

impl SubmitTransform for CreateDefaults {
    fn transform(
        &self,
        _config: &EntityConfig,
        mode: &FormMode,
        mut body: Map<String, Value>,
    ) -> Map<String, Value> {
        if *mode == FormMode::Create {
            for (key, value) in &self.defaults {
                body.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
        body
    }
}
