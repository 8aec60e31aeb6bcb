use ce_latex::{default_dictionary, EntryKind};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Completes REPL commands after `:` and LaTeX commands after `\`.
pub struct CeHelper {
    commands: Vec<String>,
    latex_commands: Vec<String>,
}

impl CeHelper {
    pub fn new() -> Self {
        let mut latex_commands: Vec<String> = default_dictionary()
            .iter()
            .filter(|e| e.kind != EntryKind::Environment)
            .map(|e| e.trigger_text())
            .filter(|t| t.starts_with('\\') && t.len() > 1)
            .collect();
        latex_commands.sort();
        latex_commands.dedup();
        Self {
            commands: crate::repl::COMMANDS.iter().map(|c| c.to_string()).collect(),
            latex_commands,
        }
    }

    fn candidates(&self, word: &str) -> Vec<Pair> {
        let pool = if word.starts_with(':') {
            &self.commands
        } else if word.starts_with('\\') {
            &self.latex_commands
        } else {
            return Vec::new();
        };
        pool.iter()
            .filter(|c| c.starts_with(word))
            .map(|c| Pair {
                display: c.clone(),
                replacement: c.clone(),
            })
            .collect()
    }
}

impl Default for CeHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for CeHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let (start, word) = extract_word(line, pos);
        Ok((start, self.candidates(word)))
    }
}

impl Hinter for CeHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CeHelper {}

impl Validator for CeHelper {}

impl Helper for CeHelper {}

/// The word ending at `pos`. A backslash starts a word.
fn extract_word(line: &str, pos: usize) -> (usize, &str) {
    let line = &line[..pos];
    let mut start = pos;
    for (i, c) in line.char_indices().rev() {
        if !(c.is_ascii_alphabetic() || c == ':') {
            if c == '\\' {
                start = i;
            }
            break;
        }
        start = i;
    }
    (start, &line[start..pos])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_word() {
        assert_eq!(extract_word("1+\\fr", 5), (2, "\\fr"));
        assert_eq!(extract_word(":mo", 3), (0, ":mo"));
        assert_eq!(extract_word("", 0), (0, ""));
    }

    #[test]
    fn test_candidates() {
        let helper = CeHelper::new();
        let latex: Vec<String> = helper.candidates("\\fra").into_iter().map(|p| p.replacement).collect();
        assert!(latex.contains(&"\\frac".to_string()));
        let commands: Vec<String> = helper.candidates(":pre").into_iter().map(|p| p.replacement).collect();
        assert_eq!(commands, vec![":precision".to_string()]);
        assert!(helper.candidates("x").is_empty());
    }
}
