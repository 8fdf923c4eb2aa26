use super::error::PersonaResult;
use super::format::DocumentFormat;
use super::loader;
use super::model::PersonaConfig;

pub const DEEPSTACK_SOURCE: &str = include_str!("../../personas/deepstack.yaml");

/// The multi-language code assistant persona shipped with the crate.
pub fn deepstack() -> PersonaResult<PersonaConfig> {
    loader::from_str(DEEPSTACK_SOURCE, DocumentFormat::Yaml)
}

#[cfg(test)]
mod tests {
    use super::deepstack;
    use crate::persona::{DocumentFormat, from_str, to_string};

    #[test]
    fn deepstack_loads_with_seven_examples() {
        let persona = deepstack().expect("builtin persona loads");
        assert_eq!(persona.name(), "DeepStack");
        assert_eq!(persona.examples().len(), 7);
        let intro = "You are a professional multi-language code assistant.";
        assert!(persona.system_prompt().starts_with(intro));
        let languages = persona.supported_languages();
        assert_eq!(languages.len(), 16);
        assert!(languages.iter().any(|lang| lang == "Rust"));
        assert_eq!(persona.capabilities().len(), 14);
    }

    #[test]
    fn deepstack_examples_keep_multiline_code() {
        let persona = deepstack().expect("builtin persona loads");
        let debugging = &persona.examples()[1];
        assert_eq!(debugging.title(), "What is wrong with this Java code?");
        let loop_header = "for(int i=0; i<=arr.length; i++) {\n";
        assert!(debugging.user().contains(loop_header));

        let debounce = &persona.examples()[2];
        let snippet = "```javascript\nfunction debounce(fn, delay) {\n  let timer = null;";
        assert!(debounce.ai().contains(snippet));
    }

    #[test]
    fn deepstack_round_trips_through_every_format() {
        let persona = deepstack().expect("builtin persona loads");
        for format in DocumentFormat::ALL {
            let text = to_string(&persona, format).expect("serialize");
            let reloaded = from_str(&text, format).expect("reload");
            assert_eq!(reloaded, persona, "{format}");
        }
    }
}
