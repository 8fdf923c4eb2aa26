use anyhow::{Result, anyhow, bail};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::args::{CliArgs, CliCommand, RequestArgs};
use crate::config::AppConfig;
use crate::persona::{self, DocumentFormat, ExamplePair, PersonaConfig, builtin};
use crate::prompt::{
    PromptRequest, build_enhanced_prompt, few_shot_messages, language_examples, relevant_examples,
};

pub fn run_command(args: &CliArgs, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    match &args.command {
        CliCommand::Validate { paths } => validate(paths, out),
        CliCommand::Show => {
            let persona = resolve_persona(args.persona.as_deref(), config)?;
            show(&persona, out)
        }
        CliCommand::Examples { language } => {
            let persona = resolve_persona(args.persona.as_deref(), config)?;
            let language = language.as_deref().or(config.default_language.as_deref());
            examples(&persona, language, out)
        }
        CliCommand::Prompt(request) => {
            let persona = resolve_persona(args.persona.as_deref(), config)?;
            prompt(&persona, request, config, out)
        }
        CliCommand::Messages(request) => {
            let persona = resolve_persona(args.persona.as_deref(), config)?;
            messages(&persona, request, config, out)
        }
        CliCommand::Export { format, output } => {
            let persona = resolve_persona(args.persona.as_deref(), config)?;
            export(&persona, *format, output.as_deref(), out)
        }
    }
}

/// `--persona` wins over the config, which wins over the built-in persona.
pub fn resolve_persona(flag: Option<&Path>, config: &AppConfig) -> Result<PersonaConfig> {
    if let Some(path) = flag.or(config.persona_path.as_deref()) {
        info!(path = %path.display(), "using persona file");
        return Ok(persona::load_from_path(path)?);
    }

    info!("using built-in persona");
    Ok(builtin::deepstack()?)
}

fn validate(paths: &[PathBuf], out: &mut impl Write) -> Result<()> {
    let mut failures = 0usize;
    for path in paths {
        match persona::load_from_path(path) {
            Ok(persona) => writeln!(
                out,
                "ok: {} ({} examples)",
                path.display(),
                persona.examples().len()
            )?,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "persona validation failed");
                failures += 1;
                writeln!(out, "error: {err}")?;
            }
        }
    }

    if failures > 0 {
        bail!(
            "{failures} of {} persona documents failed validation",
            paths.len()
        );
    }
    Ok(())
}

fn show(persona: &PersonaConfig, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Name: {}", persona.name())?;
    let languages = persona.supported_languages();
    if !languages.is_empty() {
        writeln!(out, "Languages: {}", languages.join(", "))?;
    }
    let capabilities = persona.capabilities();
    if !capabilities.is_empty() {
        writeln!(out, "Capabilities: {}", capabilities.join(", "))?;
    }
    writeln!(out, "Examples ({}):", persona.examples().len())?;
    for (index, example) in persona.examples().iter().enumerate() {
        writeln!(out, "  {}. {}", index + 1, example.title())?;
    }
    Ok(())
}

fn examples(persona: &PersonaConfig, language: Option<&str>, out: &mut impl Write) -> Result<()> {
    let selected: Vec<&ExamplePair> = match language {
        Some(language) => language_examples(persona, language),
        None => persona.examples().iter().collect(),
    };

    if selected.is_empty() {
        match language {
            Some(language) => writeln!(out, "No examples mention {language}.")?,
            None => writeln!(out, "No examples.")?,
        }
        return Ok(());
    }

    write_examples(&selected, out)
}

fn prompt(
    persona: &PersonaConfig,
    args: &RequestArgs,
    config: &AppConfig,
    out: &mut impl Write,
) -> Result<()> {
    let request = prompt_request(args, config);
    let max = max_examples(args, config);
    let selected = relevant_examples(persona, &request.user_prompt, max);

    writeln!(out, "{}", build_enhanced_prompt(persona, &request))?;
    writeln!(out)?;
    if selected.is_empty() {
        writeln!(out, "No relevant examples.")?;
        return Ok(());
    }

    writeln!(out, "Relevant examples ({}):", selected.len())?;
    writeln!(out)?;
    write_examples(&selected, out)
}

fn messages(
    persona: &PersonaConfig,
    args: &RequestArgs,
    config: &AppConfig,
    out: &mut impl Write,
) -> Result<()> {
    let request = prompt_request(args, config);
    let max = max_examples(args, config);
    let selected = relevant_examples(persona, &request.user_prompt, max);
    let messages = few_shot_messages(persona, &selected, &request);

    let json = serde_json::to_string_pretty(&messages)
        .map_err(|err| anyhow!("Failed to encode messages: {err}"))?;
    writeln!(out, "{json}")?;
    Ok(())
}

/// Without `--format`, a file output takes its format from the extension
/// and stdout gets YAML.
fn export(
    persona: &PersonaConfig,
    format: Option<DocumentFormat>,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let Some(path) = output else {
        let text = persona::to_string(persona, format.unwrap_or(DocumentFormat::Yaml))?;
        write!(out, "{text}")?;
        return Ok(());
    };

    match format {
        Some(format) => {
            let text = persona::to_string(persona, format)?;
            fs::write(path, text).map_err(|err| {
                anyhow!(
                    "Failed to export persona to {}: unable to write file: {err}",
                    path.display()
                )
            })?;
        }
        None => persona::save_to_path(persona, path)?,
    }

    info!(path = %path.display(), "exported persona");
    writeln!(out, "Exported {} to {}", persona.name(), path.display())?;
    Ok(())
}

fn prompt_request(args: &RequestArgs, config: &AppConfig) -> PromptRequest {
    let language = args.language.clone().or(config.default_language.clone());
    PromptRequest::new(args.request.clone())
        .with_language(language)
        .with_context(args.context.clone())
}

fn max_examples(args: &RequestArgs, config: &AppConfig) -> usize {
    match args.max_examples {
        Some(value) => value as usize,
        None => config.max_examples,
    }
}

fn write_examples(examples: &[&ExamplePair], out: &mut impl Write) -> Result<()> {
    for (index, example) in examples.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "### Example {}", index + 1)?;
        writeln!(out, "User:")?;
        writeln!(out, "{}", example.user())?;
        writeln!(out)?;
        writeln!(out, "Assistant:")?;
        writeln!(out, "{}", example.ai())?;
    }
    Ok(())
}
