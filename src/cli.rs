use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Raw command-line options, before merging with the config file.
#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub owner: Option<String>,
    pub repository: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub trello: Option<PathBuf>,
    pub delay_ms: Option<u64>,
    pub resume: Option<i64>,
    pub help: bool,
}

/// Parse migration flags.
///
/// Supported forms:
///   trello2github --owner me --repository proj --username me --password tok --trello board.json
///   trello2github ... --delay 2000 --resume 17
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut i = 0;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-h" | "--help" => {
                parsed.help = true;
                i += 1;
                continue;
            }
            "--owner" | "--repository" | "--username" | "--password" | "--trello" | "--delay"
            | "--resume" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    bail!("Missing value for {flag} flag");
                };
                match flag {
                    "--owner" => parsed.owner = Some(value.clone()),
                    "--repository" => parsed.repository = Some(value.clone()),
                    "--username" => parsed.username = Some(value.clone()),
                    "--password" => parsed.password = Some(value.clone()),
                    "--trello" => parsed.trello = Some(PathBuf::from(value)),
                    "--delay" => {
                        parsed.delay_ms = Some(
                            value
                                .parse()
                                .with_context(|| format!("Invalid --delay value '{value}'"))?,
                        )
                    }
                    "--resume" => {
                        parsed.resume = Some(
                            value
                                .parse()
                                .with_context(|| format!("Invalid --resume value '{value}'"))?,
                        )
                    }
                    _ => unreachable!(),
                }
            }
            _ => bail!("Unknown option '{flag}' (see --help)"),
        }
        i += 1;
    }

    Ok(parsed)
}

pub fn print_help() {
    println!("trello2github — migrate a Trello board export to GitHub issues\n");
    println!("USAGE:");
    println!("  trello2github --owner <owner> --repository <repo> --username <user> \\");
    println!("                --password <token> --trello <export.json> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  --owner <owner>        Target repository owner");
    println!("  --repository <repo>    Target repository name");
    println!("  --username <user>      GitHub username (or set it in the config file)");
    println!("  --password <token>     GitHub token (or set it in the config file)");
    println!("  --trello <file>        Exported Trello JSON file");
    println!("  --delay <ms>           Minimum delay between requests (default 1000)");
    println!("  --resume <ordinal>     Skip cards at or below this short number");
    println!("  -h, --help             Show this help");
    println!();
    println!("Credentials can also live in ~/.trello2github/config.toml:");
    println!("  [github]");
    println!("  username = \"me\"");
    println!("  password = \"ghp_...\"");
}
