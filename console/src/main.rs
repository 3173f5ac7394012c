use std::path::Path;

use anyhow::Context;
use clap::Parser;
use roster_core::html::render_document;
use roster_core::{
    ApiConfig, CommandOutcome, Notification, Notifier, StudentApi, StudentPage, UreqTransport,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

mod command;

use command::{Command, HELP};

/// Manage student records against the roster REST API.
#[derive(Debug, Parser)]
#[command(name = "roster", version)]
struct Args {
    /// Base URL of the student collection; overrides `--env`.
    #[arg(long, env = "ROSTER_API_URL")]
    api_url: Option<String>,

    /// Named endpoint preset: `local` or `production`.
    #[arg(long, env = "ROSTER_ENV")]
    env: Option<String>,
}

/// Prints notifications under the prompt.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        tracing::debug!(level = ?notification.level, message = %notification.message, "notification");
        println!("{notification}");
    }
}

type Page = StudentPage<UreqTransport, ConsoleNotifier>;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = match (args.api_url.as_deref(), args.env.as_deref()) {
        (None, None) => ApiConfig::from_env(),
        (api_url, env) => ApiConfig::resolve(api_url, env),
    }
    .context("invalid API configuration")?;
    tracing::info!(base_url = config.base_url(), "starting");

    let api = StudentApi::new(config.base_url(), UreqTransport::new());
    let mut page = StudentPage::new(api, ConsoleNotifier);
    page.subscribe(|snapshot| {
        if let Some(students) = snapshot.data.as_ref().filter(|_| !snapshot.is_loading) {
            tracing::debug!(count = students.len(), "student list updated");
        }
    });

    page.watch(|view| {
        if let Some(form) = view.form().filter(|form| form.submitting) {
            println!("{}", form.submit_label());
        }
    });

    page.refresh();
    println!("{}", page.view());

    let mut editor = DefaultEditor::new().context("unable to open the terminal")?;
    loop {
        let line = match editor.readline("roster> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("unable to read input"),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Err(error) = editor.add_history_entry(line) {
            tracing::debug!(%error, "unable to record history entry");
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => {
                if run(&mut page, command)? {
                    println!("{}", page.view());
                }
            }
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}

/// Execute one command; returns whether the page should be redrawn.
fn run(page: &mut Page, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::List => {}
        Command::Refresh => {
            page.refresh();
        }
        Command::Add => page.open_form(),
        Command::Close => page.close_form(),
        Command::Set(field, value) => {
            if page.store().edit().is_some() {
                page.set_edit_field(field, value);
            } else if page.store().is_form_visible() {
                page.set_new_field(field, value);
            } else {
                eprintln!("nothing to edit: use `add` or `edit <row|id>` first");
                return Ok(false);
            }
        }
        Command::Submit => {
            if !page.store().is_form_visible() {
                eprintln!("the Add Student form is closed: use `add` first");
                return Ok(false);
            }
            page.create();
        }
        Command::Edit(target) => {
            let found = target
                .resolve(page.students())
                .is_some_and(|id| page.begin_edit(&id));
            if !found {
                eprintln!("no such student");
                return Ok(false);
            }
        }
        Command::Update => {
            if page.update() == CommandOutcome::Ignored {
                eprintln!("no student is being edited");
                return Ok(false);
            }
        }
        Command::Cancel => page.cancel_edit(),
        Command::Delete(target) => match target.resolve(page.students()) {
            Some(id) => {
                page.delete(&id);
            }
            None => {
                eprintln!("no such student");
                return Ok(false);
            }
        },
        Command::Html(path) => {
            write_html(page, &path)?;
            println!("wrote {}", path.display());
            return Ok(false);
        }
        Command::Help => {
            println!("{HELP}");
            return Ok(false);
        }
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn write_html(page: &Page, path: &Path) -> anyhow::Result<()> {
    let document = render_document(&page.view()).into_string();
    std::fs::write(path, document).with_context(|| format!("unable to write {}", path.display()))
}
