use crate::ServerType;
use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;
use std::collections::HashMap;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Deserialize)]
pub struct ServerFixture {
    #[serde(rename = "type")]
    pub server_type: ServerType,
    pub data: Map<String, Value>,
}

/// Loads a server response from `testdata/discovery.json`.
pub fn discovery_fixture(name: &str) -> ServerFixture {
    let mut fixtures: HashMap<String, ServerFixture> =
        serde_json::from_str(include_str!("../testdata/discovery.json"))
            .expect("Invalid discovery fixture");
    fixtures
        .remove(name)
        .unwrap_or_else(|| panic!("No discovery fixture named `{}`", name))
}
