//! Line commands understood by the console.

use std::path::PathBuf;
use std::str::FromStr;

use roster_core::{Field, Student, StudentId};

pub const HELP: &str = "\
commands:
  list                  redraw the table
  refresh               re-fetch students from the API
  add                   open the Add Student form
  close                 close the form and discard its draft
  set <field> <value>   set name, email or age (edit draft while editing)
  submit                submit the Add Student form
  edit <row|id>         edit a student inline
  update                save the student being edited
  cancel                stop editing without saving
  delete <row|id>       delete a student immediately
  html <file>           write the current page as HTML
  help                  show this message
  quit                  exit";

/// A student named by table row (1-based) or by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Row(usize),
    Id(StudentId),
}

impl Target {
    fn parse(raw: &str) -> Self {
        let digits = raw.strip_prefix('#').unwrap_or(raw);
        // Backend ids are long hex strings; short numbers are row numbers.
        match digits.parse::<usize>() {
            Ok(row) if digits.len() < 8 => Target::Row(row),
            _ => Target::Id(StudentId::new(raw)),
        }
    }

    pub fn resolve(&self, students: &[Student]) -> Option<StudentId> {
        match self {
            Target::Row(row) => row
                .checked_sub(1)
                .and_then(|index| students.get(index))
                .map(|s| s.id.clone()),
            Target::Id(id) => Some(id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Refresh,
    Add,
    Close,
    Set(Field, String),
    Submit,
    Edit(Target),
    Update,
    Cancel,
    Delete(Target),
    Html(PathBuf),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let needs_arg = |what| argument(word, rest, what);

        match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => Ok(Command::List),
            "refresh" => Ok(Command::Refresh),
            "add" | "new" => Ok(Command::Add),
            "close" => Ok(Command::Close),
            "set" => {
                let rest = needs_arg("a field and a value")?;
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Command::Set(field.parse()?, value.trim().to_string()))
            }
            "submit" => Ok(Command::Submit),
            "edit" => Ok(Command::Edit(Target::parse(needs_arg("a row or id")?))),
            "update" | "save" => Ok(Command::Update),
            "cancel" => Ok(Command::Cancel),
            "delete" | "rm" => Ok(Command::Delete(Target::parse(needs_arg("a row or id")?))),
            "html" => Ok(Command::Html(PathBuf::from(needs_arg("a file path")?))),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command `{other}`; type `help`")),
        }
    }
}

fn argument<'a>(word: &str, rest: &'a str, what: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("`{word}` needs {what}"))
    } else {
        Ok(rest)
    }
}
