use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitegraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitegraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("analyze")
                .about(
                    "Build the link graph of a crawled batch and report its structure, \
                topology and architectural defects.",
                )
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(true)
                        .help("Page records as JSON Lines (one record per line) or a JSON array")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown", "md"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--"expected-topology" <NAME>)
                        .required(false)
                        .help("Compare the detected topology against hub-spoke, mesh, hierarchical or flat")
                        .value_parser(["hub-spoke", "mesh", "hierarchical", "flat"]),
                )
                .arg(
                    arg!(--"hits-iterations" <N>)
                        .required(false)
                        .help("HITS passes; 1 keeps the single pass, more iterate towards convergence")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-w --"workers" <NUM_WORKERS>)
                        .required(false)
                        .help("Maximum number of analysis tasks running at once")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(false)
                        .help("TOML analysis config; command line flags override its values")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        command_argument_builder().debug_assert();
    }

    #[test]
    fn test_analyze_defaults() {
        let matches = command_argument_builder()
            .try_get_matches_from(["sitegraph", "analyze", "-i", "pages.jsonl"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "analyze");
        assert_eq!(sub.get_one::<String>("format").unwrap(), "text");
        assert!(sub.get_one::<usize>("workers").is_none());
    }

    #[test]
    fn test_rejects_unknown_topology() {
        let result = command_argument_builder().try_get_matches_from([
            "sitegraph",
            "analyze",
            "-i",
            "pages.jsonl",
            "--expected-topology",
            "ring",
        ]);
        assert!(result.is_err());
    }
}
