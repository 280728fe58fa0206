use ycsa_core::Msg;

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Vec<Msg>),
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "url" | "u" if !rest.is_empty() => {
            Command::Dispatch(vec![Msg::InputChanged(rest.to_string())])
        }
        "analyze" | "a" => with_optional_input(rest, Msg::AnalyzeClicked),
        "start" | "s" => with_optional_input(rest, Msg::StartMonitoringClicked),
        "pause" | "p" => Command::Dispatch(vec![Msg::PauseMonitoringClicked]),
        "list" | "l" => Command::Dispatch(vec![Msg::ListingsToggled]),
        "export" | "e" => Command::Dispatch(vec![Msg::ExportClicked]),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn with_optional_input(rest: &str, msg: Msg) -> Command {
    if rest.is_empty() {
        Command::Dispatch(vec![msg])
    } else {
        Command::Dispatch(vec![Msg::InputChanged(rest.to_string()), msg])
    }
}
