extern crate translit_anonymizer;
use translit_anonymizer::{AnonymizerConfig, Anonymizer, EntityType};

fn main() {
    // Sample text with names in several scripts, contacts and an identifier
    let text = "Пацієнт: Мар'ян Згурський, тел. +380 44 123 4567.
Лікар Олена Шевченко, olena.shevchenko@clinic.ua.
Patient René Lefèvre, passport 12345678, wrote to rene@example.com.";

    let words = ["Мар'ян", "Згурський", "Олена Шевченко", "René", "Lefèvre"];

    println!("Original text:\n{}\n", text);

    run(text, &words, &AnonymizerConfig::default());
    run(
        text,
        &words,
        &AnonymizerConfig {
            patterns: vec![EntityType::Email],
            ..AnonymizerConfig::default()
        },
    );
}

fn run(text: &str, words: &[&str], config: &AnonymizerConfig) {
    let names: Vec<&str> = config.patterns.iter().map(|p| p.as_str()).collect();
    println!("\n============ Patterns: {} ============", names.join(", "));

    let anonymizer = Anonymizer::from_config(config);
    match anonymizer.anonymize(text, words) {
        Ok(result) => {
            println!("Anonymized text:\n{}\n", result.anonymized_text);
            println!("Artifacts:");
            for artifact in result.artifacts {
                println!(
                    "{}: '{}' -> '{}'",
                    artifact.entity_type, artifact.original, artifact.replacement
                );
            }
        }
        Err(e) => {
            println!("Error anonymizing text: {:?}", e);
        }
    }
}
