//! Interactive text menu over a [`CatStore`].

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::str::FromStr;

use super::seed::seed_sample_data;
use super::store::CatStore;

/// Literal answer required before every document is deleted.
pub const DELETE_ALL_CONFIRMATION: &str = "YES";

/// Line-oriented terminal access used by the menu.
pub trait Console {
    /// Show `message` and read one line, trimmed. `None` at end of input.
    ///
    /// # Errors
    /// Returns any I/O error from the underlying streams.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>>;

    /// # Errors
    /// Returns any I/O error from the underlying stream.
    fn say(&mut self, line: &str) -> io::Result<()>;
}

/// [`Console`] over any reader/writer pair.
pub struct IoConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> IoConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl IoConsole<BufReader<Stdin>, Stdout> {
    /// Console bound to the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for IoConsole<R, W> {
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ListAll,
    FindByName,
    UpdateAge,
    AddFeature,
    DeleteOne,
    DeleteAll,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 7] = [
        MenuChoice::ListAll,
        MenuChoice::FindByName,
        MenuChoice::UpdateAge,
        MenuChoice::AddFeature,
        MenuChoice::DeleteOne,
        MenuChoice::DeleteAll,
        MenuChoice::Exit,
    ];

    #[must_use]
    pub fn key(self) -> u8 {
        match self {
            MenuChoice::ListAll => 1,
            MenuChoice::FindByName => 2,
            MenuChoice::UpdateAge => 3,
            MenuChoice::AddFeature => 4,
            MenuChoice::DeleteOne => 5,
            MenuChoice::DeleteAll => 6,
            MenuChoice::Exit => 7,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::ListAll => "List all cats",
            MenuChoice::FindByName => "Find cat by name",
            MenuChoice::UpdateAge => "Update cat age by name",
            MenuChoice::AddFeature => "Add feature to cat by name",
            MenuChoice::DeleteOne => "Delete cat by name",
            MenuChoice::DeleteAll => "Delete ALL cats",
            MenuChoice::Exit => "Exit",
        }
    }
}

impl FromStr for MenuChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: u8 = s.trim().parse().map_err(|_| ())?;
        MenuChoice::ALL
            .into_iter()
            .find(|choice| choice.key() == key)
            .ok_or(())
    }
}

/// Seed an empty collection, then serve the menu until the user exits or
/// input runs out.
///
/// # Errors
/// Returns console I/O errors; store failures never end the loop.
pub async fn run_menu<S, C>(store: &S, console: &mut C) -> io::Result<()>
where
    S: CatStore + ?Sized,
    C: Console,
{
    seed_sample_data(store).await;

    loop {
        console.say("")?;
        console.say("=== Mongo Cats CRUD ===")?;
        for choice in MenuChoice::ALL {
            console.say(&format!("{}. {}", choice.key(), choice.label()))?;
        }
        let Some(input) = console.prompt("Select action [1-7]: ")? else {
            console.say("Bye!")?;
            return Ok(());
        };

        match input.parse::<MenuChoice>() {
            Ok(MenuChoice::ListAll) => print_all(store, console).await?,
            Ok(MenuChoice::FindByName) => {
                let name = ask(console, "Enter cat name: ")?;
                match store.find_by_name(&name).await {
                    Some(cat) => console.say(&cat.to_string())?,
                    None => console.say("Cat not found.")?,
                }
            }
            Ok(MenuChoice::UpdateAge) => {
                let name = ask(console, "Enter cat name: ")?;
                let age_text = ask(console, "Enter new age (int): ")?;
                let Ok(age) = age_text.parse::<i32>() else {
                    console.say("Age must be an integer.")?;
                    continue;
                };
                let updated = store.update_age(&name, age).await;
                console.say(if updated {
                    "Updated."
                } else {
                    "Nothing updated (check name)."
                })?;
            }
            Ok(MenuChoice::AddFeature) => {
                let name = ask(console, "Enter cat name: ")?;
                let feature = ask(console, "Enter feature to add: ")?;
                let added = store.add_feature(&name, &feature).await;
                console.say(if added {
                    "Feature added."
                } else {
                    "Nothing updated (check name)."
                })?;
            }
            Ok(MenuChoice::DeleteOne) => {
                let name = ask(console, "Enter cat name to delete: ")?;
                let deleted = store.delete_by_name(&name).await;
                console.say(if deleted {
                    "Deleted."
                } else {
                    "Nothing deleted (check name)."
                })?;
            }
            Ok(MenuChoice::DeleteAll) => {
                let confirm = ask(
                    console,
                    &format!("Type '{DELETE_ALL_CONFIRMATION}' to delete ALL documents: "),
                )?;
                if confirm == DELETE_ALL_CONFIRMATION {
                    let deleted = store.delete_all().await;
                    console.say(&format!("Deleted {deleted} document(s)."))?;
                } else {
                    console.say("Cancelled.")?;
                }
            }
            Ok(MenuChoice::Exit) => {
                console.say("Bye!")?;
                return Ok(());
            }
            Err(()) => console.say("Unknown choice, try again.")?,
        }
    }
}

async fn print_all<S, C>(store: &S, console: &mut C) -> io::Result<()>
where
    S: CatStore + ?Sized,
    C: Console,
{
    let cats = store.list_all().await;
    if cats.is_empty() {
        return console.say("No cats found.");
    }
    for cat in cats {
        console.say(&format!("• {cat}"))?;
    }
    Ok(())
}

/// Free-text answer; end of input reads as an empty answer.
fn ask<C: Console>(console: &mut C, message: &str) -> io::Result<String> {
    Ok(console.prompt(message)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn choices_parse_from_their_keys() {
        assert_eq!("1".parse::<MenuChoice>(), Ok(MenuChoice::ListAll));
        assert_eq!(" 6 ".parse::<MenuChoice>(), Ok(MenuChoice::DeleteAll));
        assert_eq!("7".parse::<MenuChoice>(), Ok(MenuChoice::Exit));
        assert_eq!("0".parse::<MenuChoice>(), Err(()));
        assert_eq!("8".parse::<MenuChoice>(), Err(()));
        assert_eq!("list".parse::<MenuChoice>(), Err(()));
    }

    #[test]
    fn io_console_trims_and_reports_eof() {
        let mut console = IoConsole::new(Cursor::new("  barsik \n"), Vec::new());
        assert_eq!(console.prompt("name: ").unwrap().as_deref(), Some("barsik"));
        assert_eq!(console.prompt("again: ").unwrap(), None);
        console.say("done").unwrap();
        assert_eq!(
            String::from_utf8(console.into_output()).unwrap(),
            "name: again: done\n"
        );
    }
}
