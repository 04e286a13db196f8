use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal shopping assistant chat", long_about = None)]
pub struct Args {
    /// Ask a single question and exit instead of opening the chat
    pub query: Option<String>,

    /// Model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Base URL of the inference endpoint
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path to the config file (default: ~/.shopchat/config.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_shot_query_and_flags() {
        let args = Args::parse_from([
            "shopchat",
            "-m",
            "gemini-pro",
            "--base-url",
            "http://localhost:8080",
            "best price for wireless mouse",
        ]);
        assert_eq!(args.query.as_deref(), Some("best price for wireless mouse"));
        assert_eq!(args.model.as_deref(), Some("gemini-pro"));
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:8080"));
        assert!(!args.verbose);
    }

    #[test]
    fn no_query_means_interactive() {
        let args = Args::parse_from(["shopchat", "-v"]);
        assert!(args.query.is_none());
        assert!(args.verbose);
    }
}
