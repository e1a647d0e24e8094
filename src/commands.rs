/// Available commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "students",
    aliases: &["s", "list"],
    description: "Student list",
  },
  Command {
    name: "add",
    aliases: &["a", "new"],
    description: "Enroll a new student",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit tutordesk",
  },
];

/// Get autocomplete suggestions for a given input.
///
/// Exact name matches rank first, then alias matches, then prefix matches.
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input = input.trim().to_lowercase();

  if input.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    let priority = if cmd.name == input {
      0
    } else if cmd.aliases.contains(&input.as_str()) {
      1
    } else if cmd.name.starts_with(&input) {
      2
    } else if cmd.aliases.iter().any(|a| a.starts_with(&input)) {
      3
    } else {
      continue;
    };
    matches.push((cmd, priority));
  }

  matches.sort_by_key(|(_, priority)| *priority);
  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match_ranks_first() {
    let suggestions = get_suggestions("add");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "add");
  }

  #[test]
  fn test_alias_match() {
    let suggestions = get_suggestions("q");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "quit");
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("stu");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "students");
  }

  #[test]
  fn test_no_match() {
    assert!(get_suggestions("zzz").is_empty());
  }
}
