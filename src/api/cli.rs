use clap::Parser;

pub struct Cli;

impl Cli {
    pub fn run(&self) -> CliProgram {
        CliProgram::parse()
    }
}

/// Without flags the program starts the interactive menu.
#[derive(Parser)]
#[command(author, version, about)]
pub struct CliProgram {
    #[arg(
        long,
        short,
        value_name = "FILE_PATH",
        help = "Custom path to config file"
    )]
    pub config: Option<String>,

    #[arg(
        short,
        long,
        help = "Log debug details to stderr (RUST_LOG overrides)",
        default_value_t = false
    )]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::CliProgram;

    #[test]
    fn it_has_valid_definition() {
        CliProgram::command().debug_assert();
    }

    #[test]
    fn it_runs_without_flags() {
        let program = CliProgram::try_parse_from(["tt-grab"]).unwrap();

        assert_eq!(program.config, None);
        assert!(!program.verbose);
    }

    #[test]
    fn it_accepts_custom_config() {
        let program =
            CliProgram::try_parse_from(["tt-grab", "-c", "/tmp/tt.toml", "--verbose"]).unwrap();

        assert_eq!(program.config.as_deref(), Some("/tmp/tt.toml"));
        assert!(program.verbose);
    }
}
