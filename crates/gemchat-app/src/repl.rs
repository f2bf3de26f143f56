//! Interactive chat loop with slash commands.

use std::io::{self, BufRead, Write};

use gemchat_ai::GeminiClient;

use crate::session::{ChatSession, ConversationStore};

const HELP: &str = "\
Commands:
  /save [title]   save the current conversation
  /list           list saved conversations
  /show <n>       preview saved conversation n
  /load <n>       replace the current conversation with saved conversation n
  /delete <n>     delete saved conversation n
  /clear          start a new conversation
  /help           show this help
  /quit           exit";

/// One parsed line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Message(String),
    Save(Option<String>),
    List,
    Show(usize),
    Load(usize),
    Delete(usize),
    Clear,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl ReplCommand {
    /// Parse a line. Indices are 1-based as shown by `/list`.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return ReplCommand::Message(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "save" => ReplCommand::Save((!arg.is_empty()).then(|| arg.to_string())),
            "list" => ReplCommand::List,
            "show" => parse_index(arg).map_or_else(ReplCommand::Invalid, ReplCommand::Show),
            "load" => parse_index(arg).map_or_else(ReplCommand::Invalid, ReplCommand::Load),
            "delete" => parse_index(arg).map_or_else(ReplCommand::Invalid, ReplCommand::Delete),
            "clear" => ReplCommand::Clear,
            "help" => ReplCommand::Help,
            "quit" | "exit" => ReplCommand::Quit,
            other => ReplCommand::Invalid(format!("unknown command: /{other}")),
        }
    }
}

fn parse_index(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("expected a conversation number, got '{arg}'")),
    }
}

/// Run the chat loop until `/quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    client: &GeminiClient,
    session: &mut ChatSession,
    store: &mut ConversationStore,
    input: R,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Chatting with {}. Type /help for commands.", client.config().text_model)?;
    write!(out, "you> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        match ReplCommand::parse(&line) {
            ReplCommand::Quit => break,
            command => handle(command, client, session, store, out)?,
        }
        write!(out, "you> ")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}

fn handle<W: Write>(
    command: ReplCommand,
    client: &GeminiClient,
    session: &mut ChatSession,
    store: &mut ConversationStore,
    out: &mut W,
) -> io::Result<()> {
    match command {
        ReplCommand::Message(text) => match session.send(client, text) {
            Ok(reply) => writeln!(out, "gemini> {reply}")?,
            Err(e) => writeln!(out, "error: {e}")?,
        },
        ReplCommand::Save(title) => {
            if session.is_empty() {
                writeln!(out, "Nothing to save yet.")?;
            } else {
                let saved = store.save(session.messages(), title.as_deref());
                writeln!(out, "Saved: {}", saved.title)?;
            }
        }
        ReplCommand::List => {
            if store.is_empty() {
                writeln!(out, "No saved conversations yet.")?;
            }
            for (i, conv) in store.list().iter().enumerate() {
                writeln!(
                    out,
                    "{}. {} - {} ({} messages)",
                    i + 1,
                    conv.title,
                    conv.created(),
                    conv.messages.len()
                )?;
            }
        }
        ReplCommand::Show(index) => match store.get(index) {
            Some(conv) => writeln!(out, "{}\n{}", conv.title, conv.preview())?,
            None => writeln!(out, "No saved conversation {}.", index + 1)?,
        },
        ReplCommand::Load(index) => match store.get(index) {
            Some(conv) => {
                session.replace(conv.messages.clone());
                writeln!(out, "Loaded conversation: {}", conv.title)?;
            }
            None => writeln!(out, "No saved conversation {}.", index + 1)?,
        },
        ReplCommand::Delete(index) => match store.delete(index) {
            Some(conv) => writeln!(out, "Deleted conversation: {}", conv.title)?,
            None => writeln!(out, "No saved conversation {}.", index + 1)?,
        },
        ReplCommand::Clear => {
            session.clear();
            writeln!(out, "Started a new conversation.")?;
        }
        ReplCommand::Help => writeln!(out, "{HELP}")?,
        ReplCommand::Invalid(msg) => writeln!(out, "{msg}")?,
        ReplCommand::Empty | ReplCommand::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::fake_client;
    use gemchat_ai::AiError;

    #[test]
    fn parse_commands() {
        assert_eq!(ReplCommand::parse("  "), ReplCommand::Empty);
        assert_eq!(
            ReplCommand::parse(" hello there "),
            ReplCommand::Message("hello there".into())
        );
        assert_eq!(ReplCommand::parse("/save"), ReplCommand::Save(None));
        assert_eq!(
            ReplCommand::parse("/save  Trip plans "),
            ReplCommand::Save(Some("Trip plans".into()))
        );
        assert_eq!(ReplCommand::parse("/load 2"), ReplCommand::Load(1));
        assert_eq!(ReplCommand::parse("/delete 1"), ReplCommand::Delete(0));
        assert_eq!(ReplCommand::parse("/show 3"), ReplCommand::Show(2));
        assert_eq!(ReplCommand::parse("/exit"), ReplCommand::Quit);
        assert!(matches!(ReplCommand::parse("/load 0"), ReplCommand::Invalid(_)));
        assert!(matches!(ReplCommand::parse("/load x"), ReplCommand::Invalid(_)));
        assert!(matches!(ReplCommand::parse("/bogus"), ReplCommand::Invalid(_)));
    }

    fn run_script(
        client: &GeminiClient,
        session: &mut ChatSession,
        store: &mut ConversationStore,
        script: &str,
    ) -> String {
        let mut out = Vec::new();
        run(client, session, store, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn chat_save_clear_load() {
        let (client, _) = fake_client(vec![Ok("hello!".into())]);
        let mut session = ChatSession::new();
        let mut store = ConversationStore::new();

        let output = run_script(
            &client,
            &mut session,
            &mut store,
            "hi\n/save Greeting\n/clear\n/list\n/load 1\n/quit\nnever read\n",
        );

        assert!(output.contains("gemini> hello!"));
        assert!(output.contains("Saved: Greeting"));
        assert!(output.contains("1. Greeting - "));
        assert!(output.contains("Loaded conversation: Greeting"));
        assert_eq!(session.messages().len(), 2);
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn errors_are_reported_and_loop_continues() {
        let (client, _) = fake_client(vec![
            Err(AiError::ApiError("HTTP 403: forbidden".into())),
            Ok("second try".into()),
        ]);
        let mut session = ChatSession::new();
        let mut store = ConversationStore::new();

        let output = run_script(&client, &mut session, &mut store, "one\ntwo\n");

        assert!(output.contains("error: API error: HTTP 403: forbidden"));
        assert!(output.contains("gemini> second try"));
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].content, "two");
    }

    #[test]
    fn save_and_delete_edge_cases() {
        let (client, transport) = fake_client(vec![]);
        let mut session = ChatSession::new();
        let mut store = ConversationStore::new();

        let output = run_script(
            &client,
            &mut session,
            &mut store,
            "/save\n/list\n/delete 1\n/show 1\n/help\n",
        );

        assert!(output.contains("Nothing to save yet."));
        assert!(output.contains("No saved conversations yet."));
        assert!(output.contains("No saved conversation 1."));
        assert!(output.contains("/quit"));
        assert!(transport.bodies.lock().unwrap().is_empty());
    }
}
