//! Unit tests for config module

use std::fs;
use std::time::Duration;

use smartwrite::config::set_value;
use smartwrite::persona::Persona;
use smartwrite::{Config, Language, LanguageSetting};
use tempfile::TempDir;

fn custom_persona(id: &str) -> Persona {
    Persona {
        id: id.to_string(),
        name: "Haiku Coach".to_string(),
        description: "Pushes for brevity".to_string(),
        system_prompt: "Answer in haiku.".to_string(),
        icon: "🌸".to_string(),
    }
}

#[test]
fn default_config_has_expected_values() {
    let config = Config::default();
    assert_eq!(config.analysis.language, LanguageSetting::Auto);
    assert_eq!(config.analysis.reading_speed, 200);
    assert_eq!(config.analysis.long_sentence_words, 25);
    assert!(config.analysis.style_checks);
    assert!(!config.llm.enabled);
    assert_eq!(config.llm.endpoint, "http://localhost:11434");
    assert_eq!(config.llm.chunk_size, 12_000);
    assert_eq!(config.llm.translation_chunk_size, 4_000);
    assert_eq!(config.personas.selected, "critical-editor");
    assert_eq!(config.personas.enabled.len(), 20);
    assert!(config.validate().is_ok());
}

#[test]
fn missing_file_loads_defaults() {
    let temp = TempDir::new().unwrap();
    let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn save_then_load_preserves_values() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.analysis.language = LanguageSetting::Fixed(Language::Portuguese);
    config.llm.enabled = true;
    config.llm.model = "llama3".to_string();
    config.upsert_custom_persona(custom_persona("haiku-coach"));
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("language = \"pt\""));
}

#[test]
fn partial_file_fills_in_defaults() {
    let config: Config = toml::from_str(
        r#"
[llm]
enabled = true
model = "mistral"
"#,
    )
    .unwrap();
    assert!(config.llm.enabled);
    assert_eq!(config.llm.model, "mistral");
    assert_eq!(config.llm.timeout_secs, 120);
    assert_eq!(config.analysis.reading_speed, 200);
}

#[test]
fn invalid_values_fail_to_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[analysis]\nreading_speed = 0\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("reading_speed"));
}

#[test]
fn validation_bounds() {
    let mut config = Config::default();
    config.analysis.very_long_sentence_words = 10;
    assert!(config.validate().unwrap_err().contains("very_long_sentence_words"));

    let mut config = Config::default();
    config.llm.timeout_secs = 10_000;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.llm.chunk_size = 10;
    assert!(config.validate().unwrap_err().contains("chunk_size"));

    let mut config = Config::default();
    config.personas.custom.push(custom_persona("Bad Id"));
    assert!(config.validate().is_err());
}

#[test]
fn settings_are_derived_from_sections() {
    let mut config = Config::default();
    config.analysis.reading_speed = 250;
    config.analysis.complex_word_length = 12;
    config.llm.timeout_secs = 30;
    config.llm.chunk_size = 6_000;
    config.llm.output_language = LanguageSetting::Fixed(Language::Spanish);

    let analysis = config.analysis_settings();
    assert_eq!(analysis.reading_speed, 250);
    assert_eq!(analysis.suggestions.complex_word_length, 12);

    let ollama = config.ollama_settings();
    assert_eq!(ollama.timeout, Duration::from_secs(30));
    assert!(!ollama.enabled);

    let orchestrator = config.orchestrator_settings();
    assert_eq!(orchestrator.chunk_size, 6_000);
    assert_eq!(
        orchestrator.output_language,
        LanguageSetting::Fixed(Language::Spanish)
    );
}

#[test]
fn upsert_custom_persona_enables_and_replaces() {
    let mut config = Config::default();
    config.upsert_custom_persona(custom_persona("haiku-coach"));
    let mut changed = custom_persona("haiku-coach");
    changed.name = "Haiku Master".to_string();
    config.upsert_custom_persona(changed);

    assert_eq!(config.personas.custom.len(), 1);
    assert_eq!(config.personas.custom[0].name, "Haiku Master");
    assert_eq!(
        config
            .personas
            .enabled
            .iter()
            .filter(|id| *id == "haiku-coach")
            .count(),
        1
    );

    let catalog = config.persona_catalog();
    assert!(catalog.is_enabled("haiku-coach"));
    assert_eq!(catalog.list_all_personas().len(), 21);
}

#[test]
fn custom_persona_cannot_shadow_builtin() {
    let mut config = Config::default();
    config.personas.custom.push(custom_persona("critical-editor"));
    let catalog = config.persona_catalog();
    assert_eq!(catalog.list_all_personas().len(), 20);
    assert_ne!(
        catalog.get_persona("critical-editor").unwrap().name,
        "Haiku Coach"
    );
}

#[test]
fn set_value_keeps_comments() {
    let content = "# my settings\n[llm]\n# local model\nmodel = \"llama3\"\n";
    let edited = set_value(content, "llm.enabled", "true").unwrap();
    assert!(edited.contains("# my settings"));
    assert!(edited.contains("# local model"));
    let config: Config = toml::from_str(&edited).unwrap();
    assert!(config.llm.enabled);
    assert_eq!(config.llm.model, "llama3");
}
