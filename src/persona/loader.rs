use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::error::{PersonaError, PersonaResult};
use super::format::DocumentFormat;
use super::model::{ExamplePair, IN_MEMORY_ORIGIN, PersonaConfig};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPersonaFile {
    name: String,
    system_prompt: String,
    #[serde(default)]
    supported_languages: Vec<String>,
    #[serde(default)]
    capabilities: Vec<String>,
    examples: Vec<RawExample>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawExample {
    user: String,
    ai: String,
}

/// Parses a persona document held in memory.
pub fn from_str(text: &str, format: DocumentFormat) -> PersonaResult<PersonaConfig> {
    parse_document(IN_MEMORY_ORIGIN, text, format)
}

/// Loads a persona document, inferring the format from the file extension.
pub fn load_from_path(path: &Path) -> PersonaResult<PersonaConfig> {
    let Some(format) = DocumentFormat::from_path(path) else {
        return Err(PersonaError::unknown_format(path));
    };
    let origin = path.display().to_string();

    let bytes = fs::read(path).map_err(|err| PersonaError::Read {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => return Err(PersonaError::parse(&origin, format!("invalid UTF-8: {err}"))),
    };

    let persona = parse_document(&origin, &text, format)?;
    info!(
        path = %path.display(),
        name = persona.name(),
        examples = persona.examples().len(),
        "loaded persona"
    );
    Ok(persona)
}

pub fn to_string(persona: &PersonaConfig, format: DocumentFormat) -> PersonaResult<String> {
    let serialize_error = |reason: String| PersonaError::Serialize { format, reason };

    match format {
        DocumentFormat::Yaml => {
            serde_yaml::to_string(persona).map_err(|err| serialize_error(err.to_string()))
        }
        DocumentFormat::Toml => {
            toml::to_string(persona).map_err(|err| serialize_error(err.to_string()))
        }
        DocumentFormat::Json => {
            let text = serde_json::to_string_pretty(persona)
                .map_err(|err| serialize_error(err.to_string()))?;
            Ok(text + "\n")
        }
    }
}

/// Writes the persona in the format implied by the file extension.
pub fn save_to_path(persona: &PersonaConfig, path: &Path) -> PersonaResult<()> {
    let Some(format) = DocumentFormat::from_path(path) else {
        return Err(PersonaError::unknown_format(path));
    };
    let text = to_string(persona, format)?;

    fs::write(path, text).map_err(|err| PersonaError::Write {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    debug!(path = %path.display(), %format, "saved persona");
    Ok(())
}

fn parse_document(
    origin: &str,
    text: &str,
    format: DocumentFormat,
) -> PersonaResult<PersonaConfig> {
    let raw = match format {
        DocumentFormat::Yaml => from_yaml(text),
        DocumentFormat::Toml => toml::from_str(text).map_err(|err| err.to_string()),
        DocumentFormat::Json => serde_json::from_str(text).map_err(|err| err.to_string()),
    };
    let raw = raw.map_err(|reason| PersonaError::parse(origin, reason))?;

    let examples = raw
        .examples
        .into_iter()
        .map(|example| ExamplePair::new(example.user, example.ai))
        .collect();

    PersonaConfig::from_parts(
        origin,
        raw.name,
        raw.system_prompt,
        raw.supported_languages,
        raw.capabilities,
        examples,
    )
}

/// Plain scalars such as `42` coerce into strings when deserialized directly;
/// going through a `Value` keeps their YAML type.
fn from_yaml(text: &str) -> Result<RawPersonaFile, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|err| err.to_string())?;
    serde_yaml::from_value(value).map_err(|err| err.to_string())
}
