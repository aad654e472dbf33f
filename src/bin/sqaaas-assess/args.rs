use anyhow::{Result, anyhow};
use std::env;

use sqaaas_assess::config::{BRANCH_ENV, ENDPOINT_ENV, MAX_POLLS_ENV, REPO_ENV};

pub const USAGE: &str = "\
Usage: sqaaas-assess [OPTIONS] [REPO] [BRANCH]

Options:
  -r, --repo <URL>        Repository to assess (default: $INPUT_REPO)
  -b, --branch <NAME>     Branch to assess (default: $INPUT_BRANCH)
  -e, --endpoint <URL>    SQAaaS API base URL (default: $SQAAAS_ENDPOINT)
      --max-polls <N>     Give up after N status polls (default: unbounded)
      --json              Print the summary as JSON instead of markdown
      --no-summary-file   Do not append to $GITHUB_STEP_SUMMARY
  -h, --help              Show this help";

#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub repo: Option<String>,      // -r/--repo or first positional
    pub branch: Option<String>,    // -b/--branch or second positional
    pub endpoint: Option<String>,  // -e/--endpoint
    pub max_polls: Option<String>, // --max-polls
    pub json_output: bool,         // --json
    pub no_summary_file: bool,     // --no-summary-file
    pub help: bool,                // -h/--help
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Result<Self> {
        let args: Vec<String> = env::args().collect();
        Self::parse_from(&args[1..])
    }

    /// Parse from a slice of arguments (for testing)
    pub fn parse_from(args: &[String]) -> Result<Self> {
        let mut result = CliArgs::default();
        let mut positional = Vec::new();

        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];

            match arg.as_str() {
                "-r" | "--repo" | "-b" | "--branch" | "-e" | "--endpoint" | "--max-polls" => {
                    i += 1;
                    if i >= args.len() {
                        return Err(anyhow!("{arg} requires a value"));
                    }
                    let value = Some(args[i].clone());
                    match arg.as_str() {
                        "-r" | "--repo" => result.repo = value,
                        "-b" | "--branch" => result.branch = value,
                        "-e" | "--endpoint" => result.endpoint = value,
                        _ => result.max_polls = value,
                    }
                }
                "--json" => {
                    result.json_output = true;
                }
                "--no-summary-file" => {
                    result.no_summary_file = true;
                }
                "-h" | "--help" => {
                    result.help = true;
                }
                unknown if unknown.starts_with('-') => {
                    return Err(anyhow!("Unknown argument: {unknown}"));
                }
                value => positional.push(value.to_string()),
            }

            i += 1;
        }

        if positional.len() > 2 {
            return Err(anyhow!("Unexpected argument: {}", positional[2]));
        }
        let mut positional = positional.into_iter();
        if let Some(repo) = positional.next() {
            if result.repo.is_some() {
                return Err(anyhow!("Repository given both as --repo and positionally"));
            }
            result.repo = Some(repo);
        }
        if let Some(branch) = positional.next() {
            if result.branch.is_some() {
                return Err(anyhow!("Branch given both as --branch and positionally"));
            }
            result.branch = Some(branch);
        }

        Ok(result)
    }

    /// Value a flag supplies for a configuration key; flags win over the
    /// environment.
    pub fn lookup(&self, key: &str) -> Option<String> {
        match key {
            REPO_ENV => self.repo.clone(),
            BRANCH_ENV => self.branch.clone(),
            ENDPOINT_ENV => self.endpoint.clone(),
            MAX_POLLS_ENV => self.max_polls.clone(),
            _ => None,
        }
    }
}
