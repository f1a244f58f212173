use crate::draft::Role;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ban(String),
    Pick { name: String, role: Option<Role> },
    Recommend,
    Ai,
    Status,
    Export,
    Help,
    Quit,
}

/// Parses one line of the interactive prompt. Champion names may contain
/// spaces; a trailing role label is split off a pick.
pub fn parse_command(line: &str) -> Result<Command, AppError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(AppError::InvalidInput("empty command".to_string()));
    };
    let rest: Vec<&str> = words.collect();

    match head.to_ascii_lowercase().as_str() {
        "ban" | "b" => {
            if rest.is_empty() {
                return Err(AppError::InvalidInput("usage: ban <champion>".to_string()));
            }
            Ok(Command::Ban(rest.join(" ")))
        }
        "pick" | "p" => parse_pick(&rest),
        "rec" | "recommend" | "r" => Ok(Command::Recommend),
        "ai" => Ok(Command::Ai),
        "status" | "s" => Ok(Command::Status),
        "export" => Ok(Command::Export),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(AppError::InvalidInput(format!(
            "unknown command '{}' (type 'help')",
            other
        ))),
    }
}

fn parse_pick(words: &[&str]) -> Result<Command, AppError> {
    let usage = || AppError::InvalidInput("usage: pick <champion> [role]".to_string());
    let (last, init) = words.split_last().ok_or_else(usage)?;

    match last.parse::<Role>() {
        Ok(role) if !init.is_empty() => Ok(Command::Pick {
            name: init.join(" "),
            role: Some(role),
        }),
        Ok(_) => Err(usage()),
        Err(_) => Ok(Command::Pick {
            name: words.join(" "),
            role: None,
        }),
    }
}

/// Splits a comma-separated list of champion names, dropping blanks.
pub fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses `Name:ROLE` (role optional).
pub fn parse_pick_spec(spec: &str) -> Result<(String, Option<Role>), AppError> {
    match spec.rsplit_once(':') {
        Some((name, role)) => {
            let role = role
                .parse::<Role>()
                .map_err(|e| AppError::InvalidInput(e.to_string()))?;
            Ok((name.trim().to_string(), Some(role)))
        }
        None => Ok((spec.trim().to_string(), None)),
    }
}
