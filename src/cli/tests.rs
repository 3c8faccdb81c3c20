#[cfg(test)]
mod tests {
    use crate::cli::{Args, Command};
    use crate::config::LLMProvider;
    use crate::generator::workflow::{FormInput, Surface};
    use clap::Parser;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_args_default_values() {
        let args = Args::try_parse_from(["deepresearch-rs"]).unwrap();

        assert!(args.command.is_none());
        assert!(args.config.is_none());
        assert!(args.output_path.is_none());
        assert!(!args.verbose);
        assert!(!args.email);
        assert_eq!(args.surface(), Surface::Chat);
    }

    #[test]
    fn test_form_subcommand() {
        let args = Args::try_parse_from([
            "deepresearch-rs",
            "form",
            "--topic",
            "future of renewable energy in Europe",
            "--clarification",
            "2030, policy focus",
            "-v",
        ])
        .unwrap();

        assert_eq!(
            args.command,
            Some(Command::Form {
                topic: Some("future of renewable energy in Europe".to_string()),
                clarification: Some("2030, policy focus".to_string()),
            })
        );
        assert!(args.verbose);
        assert_eq!(
            args.surface(),
            Surface::Form(FormInput {
                topic: Some("future of renewable energy in Europe".to_string()),
                clarification: Some("2030, policy focus".to_string()),
            })
        );
    }

    #[test]
    fn test_chat_subcommand() {
        let args = Args::try_parse_from(["deepresearch-rs", "chat"]).unwrap();
        assert_eq!(args.command, Some(Command::Chat));
        assert_eq!(args.surface(), Surface::Chat);
    }

    #[test]
    fn test_overrides_apply_on_top_of_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[research]
search_count = 5

[llm]
model = "from-file"
"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = Args::try_parse_from([
            "deepresearch-rs",
            "chat",
            "--config",
            path.as_str(),
            "--llm-provider",
            "deepseek",
            "--model",
            "deepseek-chat",
            "--max-followup-questions",
            "3",
            "--max-parallels",
            "1",
            "--stage-timeout",
            "120",
            "-o",
            "/tmp/research",
        ])
        .unwrap();
        let config = args.into_config().unwrap();

        assert_eq!(config.llm.provider, LLMProvider::DeepSeek);
        assert_eq!(config.llm.model, "deepseek-chat");
        assert_eq!(config.research.search_count, 5);
        assert_eq!(config.research.max_followup_questions, 3);
        assert_eq!(config.research.stage_timeout_seconds, Some(120));
        assert_eq!(config.llm.max_parallels, 1);
        assert_eq!(config.output_path, PathBuf::from("/tmp/research"));
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let args =
            Args::try_parse_from(["deepresearch-rs", "--llm-provider", "mistral"]).unwrap();
        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let args = Args::try_parse_from(["deepresearch-rs", "--search-count", "0"]).unwrap();
        assert!(args.into_config().is_err());
    }
}
