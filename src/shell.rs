//! Interactive session: the listing, single-post and authoring screens driven
//! by one-line commands.
//!
//! ```text
//! > search rust
//! > open 1
//! > back
//! > new
//! > set title الذكاء الاصطناعي
//! > autofill
//! > publish
//! ```
//!
//! Input and output are generic so whole sessions can be scripted in tests.

use crate::form::AutofillError;
use crate::generation::ContentGenerator;
use crate::output;
use crate::session::{Session, SessionError};
use crate::storage::Storage;
use crate::types::Category;
use crate::view::View;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands:
  list                 show the listing (search term applied)
  search [TERM]        filter by title or category; no term clears it
  open N|ID            open post number N of the listing, or by id
  back                 return from a post to the listing
  home                 go to the listing from anywhere
  new                  open the authoring form
  set FIELD VALUE      title | summary | content | category | image
                       (write \\n in content for a paragraph break)
  autofill             generate summary and content from the title
  publish              create the post and return to the listing
  cancel               leave the form, keeping the draft
  theme                toggle light/dark
  stats                show counters
  help                 this text
  quit                 leave";

/// What one command asked the loop to do next.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run<S, G, R, W>(
    session: &mut Session<S>,
    generator: &G,
    input: R,
    mut out: W,
) -> io::Result<()>
where
    S: Storage,
    G: ContentGenerator,
    R: BufRead,
    W: Write,
{
    writeln!(out, "{}", output::format_theme(session.theme()))?;
    render_view(session, &mut out)?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let flow = dispatch(session, generator, line.trim(), &mut out)?;
        if flow == Flow::Quit {
            break;
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

fn dispatch<S, G, W>(
    session: &mut Session<S>,
    generator: &G,
    line: &str,
    out: &mut W,
) -> io::Result<Flow>
where
    S: Storage,
    G: ContentGenerator,
    W: Write,
{
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };

    let result: Result<(), SessionError> = match command {
        "" => Ok(()),
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" => {
            writeln!(out, "{HELP}")?;
            Ok(())
        }
        "list" | "home" => {
            session.home();
            Ok(())
        }
        "search" => {
            session.search(rest);
            session.home();
            Ok(())
        }
        "open" => open(session, rest),
        "back" => session.back(),
        "new" => {
            session.open_authoring();
            Ok(())
        }
        "set" => {
            if !matches!(session.view(), View::Authoring) {
                writeln!(out, "error: open the form with 'new' first")?;
                return Ok(Flow::Continue);
            }
            if let Err(message) = set_field(session, rest) {
                writeln!(out, "error: {message}")?;
                return Ok(Flow::Continue);
            }
            Ok(())
        }
        "autofill" => {
            if !matches!(session.view(), View::Authoring) {
                writeln!(out, "error: open the form with 'new' first")?;
                return Ok(Flow::Continue);
            }
            writeln!(out, "⏳ generating...")?;
            out.flush()?;
            if let Err(e) = session.autofill(generator) {
                report_autofill(&e, out)?;
                return Ok(Flow::Continue);
            }
            Ok(())
        }
        "publish" => session.submit().map(|post| {
            tracing::debug!(id = %post.id, "published from shell");
        }),
        "cancel" => session.cancel(),
        "theme" => session.toggle_theme().map(|theme| {
            tracing::debug!(%theme, "theme toggled from shell");
        }),
        "stats" => {
            for line in output::format_stats(&session.stats()) {
                writeln!(out, "{line}")?;
            }
            return Ok(Flow::Continue);
        }
        other => {
            writeln!(out, "unknown command '{other}', try 'help'")?;
            return Ok(Flow::Continue);
        }
    };

    match result {
        Ok(()) => {
            if command == "theme" {
                writeln!(out, "{}", output::format_theme(session.theme()))?;
            } else if !command.is_empty() && command != "help" {
                render_view(session, out)?;
            }
        }
        Err(e) => writeln!(out, "error: {e}")?,
    }
    Ok(Flow::Continue)
}

fn open<S: Storage>(session: &mut Session<S>, arg: &str) -> Result<(), SessionError> {
    // A small number picks from the visible listing; anything else is an id.
    let by_position = arg
        .parse::<usize>()
        .ok()
        .filter(|n| *n >= 1)
        .and_then(|n| session.visible_posts().get(n - 1).map(|p| p.id.clone()));
    let id = by_position.unwrap_or_else(|| arg.to_string());
    session.select(&id).map(|_| ())
}

fn set_field<S: Storage>(session: &mut Session<S>, rest: &str) -> Result<(), String> {
    let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let value = value.trim();
    let draft = session.draft_mut();
    match field {
        "title" => draft.title = value.to_string(),
        "summary" => draft.summary = value.to_string(),
        "content" => draft.content = value.replace("\\n", "\n"),
        "image" => draft.image_url = value.to_string(),
        "category" => draft.category = value.parse::<Category>().map_err(|e| e.to_string())?,
        "" => return Err("usage: set FIELD VALUE".to_string()),
        other => return Err(format!("unknown field '{other}'")),
    }
    Ok(())
}

fn report_autofill<W: Write>(e: &AutofillError, out: &mut W) -> io::Result<()> {
    writeln!(out, "error: {}", e.user_message())
}

fn render_view<S: Storage, W: Write>(session: &Session<S>, out: &mut W) -> io::Result<()> {
    let lines = match session.view() {
        View::Listing => output::format_listing(&session.visible_posts(), session.search_term()),
        View::Post { .. } => match session.selected_post() {
            Some(post) => output::format_post(post),
            None => vec!["(post not found)".to_string()],
        },
        View::Authoring => output::format_draft(session.form()),
    };
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
