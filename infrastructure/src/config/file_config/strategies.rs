//! Filter strategy bindings from TOML (`[strategies]` section)
//!
//! ```toml
//! [strategies]
//! top_n = 5
//! keyphrases = "llm"
//!
//! [strategies.bindings]
//! risks = "keyword"
//! errors = "keyword"
//!
//! [strategies.tools]
//! keyword = "search_by_keywords"
//!
//! [strategies.args]
//! keyword = "keyphrases"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tabula_domain::ArgumentSource;

/// Which keyphrase extractor feeds keyword-driven tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKeyphraseExtractor {
    #[default]
    Statistical,
    Llm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStrategiesConfig {
    /// Dataset type → strategy name
    pub bindings: HashMap<String, String>,
    /// Strategy name → tool name
    pub tools: HashMap<String, String>,
    /// Strategy name → argument source
    pub args: HashMap<String, ArgumentSource>,
    /// Rows kept by a tool when the request does not say
    pub top_n: usize,
    /// Keyphrases extracted per question
    pub keyphrase_count: usize,
    pub keyphrases: FileKeyphraseExtractor,
}

impl Default for FileStrategiesConfig {
    fn default() -> Self {
        Self {
            bindings: HashMap::from([("risks".to_string(), "keyword".to_string())]),
            tools: HashMap::from([("keyword".to_string(), "search_by_keywords".to_string())]),
            args: HashMap::new(),
            top_n: 5,
            keyphrase_count: 7,
            keyphrases: FileKeyphraseExtractor::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_bindings_keep_defaults() {
        let toml_str = r#"
[strategies]
keyphrases = "llm"

[strategies.bindings]
errors = "keyword"

[strategies.args]
keyword = "model"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let strategies = &config.strategies;
        assert_eq!(strategies.keyphrases, FileKeyphraseExtractor::Llm);
        assert_eq!(strategies.bindings.get("errors").map(String::as_str), Some("keyword"));
        assert_eq!(strategies.args.get("keyword"), Some(&ArgumentSource::Model));
        assert_eq!(strategies.top_n, 5);
    }
}
