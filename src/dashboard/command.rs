// Line commands for the interactive dashboard.
//
// Plain text is analyzed as-is; lines starting with ':' are commands.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardCommand {
    AnalyzeText(String),
    AnalyzeImageFile(PathBuf),
    AnalyzeImageUrl(String),
    /// Show the reason view for the 1-based item number
    Why(usize),
    List,
    Support,
    Help,
    Quit,
    /// Blank line
    Nothing,
    Unknown(String),
}

impl DashboardCommand {
    /// Parse one input line. Text to analyze is kept exactly as typed;
    /// trimming only decides whether the line is blank or a command.
    pub fn parse(input: &str) -> Self {
        let line = input.trim();
        if line.is_empty() {
            return DashboardCommand::Nothing;
        }
        let Some(rest) = line.strip_prefix(':') else {
            return DashboardCommand::AnalyzeText(input.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match (name, arg) {
            ("image", path) if !path.is_empty() => DashboardCommand::AnalyzeImageFile(PathBuf::from(path)),
            ("url", url) if !url.is_empty() => DashboardCommand::AnalyzeImageUrl(url.to_string()),
            ("why", n) => match n.parse::<usize>() {
                Ok(n) if n > 0 => DashboardCommand::Why(n),
                _ => DashboardCommand::Unknown(line.to_string()),
            },
            ("list", _) => DashboardCommand::List,
            ("support", _) => DashboardCommand::Support,
            ("help", _) => DashboardCommand::Help,
            ("quit", _) | ("q", _) | ("exit", _) => DashboardCommand::Quit,
            _ => DashboardCommand::Unknown(line.to_string()),
        }
    }
}

pub const HELP: &str = "\
  <text>          analyze a line of text
  :image <path>   analyze a local image
  :url <url>      analyze an image by URL
  :why <n>        explain why item n was flagged
  :list           show flagged items
  :support        show the support panel
  :quit           leave the dashboard";
