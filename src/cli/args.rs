use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::persona::DocumentFormat;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "personakit")]
#[command(
    about = "Load, validate and assemble prompts from assistant persona documents",
    long_about = "Load, validate and assemble prompts from assistant persona documents\n\nPersona selection:\n  1. --persona <path>\n  2. persona_path from the config file (or PERSONAKIT_PERSONA)\n  3. the built-in DeepStack persona\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default search path when --config is not provided:\n    1. $XDG_CONFIG_HOME/personakit/config.toml\n    2. ~/.config/personakit/config.toml"
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Persona document (.yaml, .yml, .toml or .json) to use.
    #[arg(long, value_name = "PATH", global = true)]
    pub persona: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Summarize the persona: name, languages, capabilities and example questions.
    Show,
    /// Check that persona documents load.
    Validate {
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print the persona's example exchanges.
    Examples {
        /// Only examples mentioning this language.
        #[arg(long)]
        language: Option<String>,
    },
    /// Print the enhanced prompt and the most relevant examples for a request.
    Prompt(RequestArgs),
    /// Print the few-shot chat message list for a request as JSON.
    Messages(RequestArgs),
    /// Serialize the persona document.
    Export {
        /// yaml, toml or json. Defaults to the --output extension, else yaml.
        #[arg(long, value_parser = parse_format)]
        format: Option<DocumentFormat>,
        /// Write to this file instead of stdout.
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Args, Clone, PartialEq, Eq)]
pub struct RequestArgs {
    /// The user request.
    #[arg(value_name = "REQUEST")]
    pub request: String,

    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub context: Option<String>,

    /// Upper bound on selected examples (defaults to the config value).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_examples: Option<u32>,
}

fn parse_format(value: &str) -> Result<DocumentFormat, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::{CliArgs, CliCommand, RequestArgs};
    use crate::persona::DocumentFormat;
    use clap::Parser;
    use std::path::{Path, PathBuf};

    #[test]
    fn parse_show_with_global_flags() {
        let args = CliArgs::try_parse_from([
            "personakit",
            "show",
            "--persona",
            "/tmp/p.yaml",
            "--config",
            "/tmp/custom.toml",
        ])
        .expect("parse");
        assert_eq!(args.command, CliCommand::Show);
        assert_eq!(args.persona.as_deref(), Some(Path::new("/tmp/p.yaml")));
        assert_eq!(args.config.as_deref(), Some(Path::new("/tmp/custom.toml")));
    }

    #[test]
    fn parse_prompt_request() {
        let args = CliArgs::try_parse_from([
            "personakit",
            "prompt",
            "sort a list",
            "--language",
            "Go",
            "--max-examples",
            "2",
        ])
        .expect("parse");
        assert_eq!(
            args.command,
            CliCommand::Prompt(RequestArgs {
                request: "sort a list".to_string(),
                language: Some("Go".to_string()),
                context: None,
                max_examples: Some(2),
            })
        );
    }

    #[test]
    fn parse_rejects_zero_max_examples() {
        let result =
            CliArgs::try_parse_from(["personakit", "messages", "hi", "--max-examples", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_export_leaves_format_unset_by_default() {
        let args = CliArgs::try_parse_from(["personakit", "export"]).expect("parse");
        assert_eq!(
            args.command,
            CliCommand::Export {
                format: None,
                output: None,
            }
        );

        let args =
            CliArgs::try_parse_from(["personakit", "export", "--format", "toml"]).expect("parse");
        assert!(matches!(
            args.command,
            CliCommand::Export {
                format: Some(DocumentFormat::Toml),
                ..
            }
        ));
    }

    #[test]
    fn parse_validate_requires_a_path() {
        assert!(CliArgs::try_parse_from(["personakit", "validate"]).is_err());
        let args =
            CliArgs::try_parse_from(["personakit", "validate", "a.yaml", "b.json"]).expect("parse");
        assert_eq!(
            args.command,
            CliCommand::Validate {
                paths: vec![PathBuf::from("a.yaml"), PathBuf::from("b.json")],
            }
        );
    }
}
