//! Line-oriented chat loop
//!
//! Each input line is one submit. Lines starting with `/` are commands.

use jarvis_core::{ChatSession, Role, Turn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const HELP: &str = "\
Commands:
  /history   show the conversation so far
  /new       start a new chat
  /help      show this message
  /quit      leave (also /exit)
";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Say(&'a str),
    History,
    New,
    Help,
    Quit,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return Self::Say(line);
        }
        match trimmed {
            "/history" => Self::History,
            "/new" => Self::New,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => Self::Unknown(other),
        }
    }
}

async fn write_turn<W: AsyncWrite + Unpin>(output: &mut W, turn: &Turn) -> anyhow::Result<()> {
    let speaker = match turn.role {
        Role::Assistant => "JARVIS",
        Role::User => "You",
    };
    output
        .write_all(format!("{speaker}: {}\n", turn.content).as_bytes())
        .await?;
    output.flush().await?;
    Ok(())
}

/// Drive `session` from `input` until EOF or `/quit`
pub async fn run<R, W>(session: &mut ChatSession, input: R, output: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_turn(output, session.transcript().last()).await?;
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Help => output.write_all(HELP.as_bytes()).await?,
            Command::History => {
                let history = session.transcript().render_history();
                output.write_all(format!("{history}\n").as_bytes()).await?;
            }
            Command::New => {
                tracing::info!(session = %session.id(), turns = session.transcript().len(), "Chat discarded");
                *session = ChatSession::new(session.service());
                write_turn(output, session.transcript().last()).await?;
            }
            Command::Unknown(name) => {
                output
                    .write_all(format!("Unknown command {name}. Type /help for a list.\n").as_bytes())
                    .await?;
            }
            Command::Say(text) => {
                session.set_draft(text);
                let Some(pending) = session.begin_draft()? else {
                    continue;
                };
                output.write_all(b"JARVIS is typing...\n").await?;
                output.flush().await?;

                let reply = pending.resolve().await;
                let turn = session.complete(reply)?;
                write_turn(output, turn).await?;
            }
        }
    }

    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use jarvis_core::{
        FALLBACK_REPLIES, GREETING, GenerationService, ServiceError, ServiceInfo, ServiceResult,
    };

    use super::*;

    struct EchoService {
        fail_with: Option<ServiceError>,
        prompts: Mutex<Vec<String>>,
    }

    impl EchoService {
        fn new(fail_with: Option<ServiceError>) -> Arc<Self> {
            Arc::new(Self {
                fail_with,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GenerationService for EchoService {
        fn info(&self) -> ServiceInfo {
            ServiceInfo {
                name: "echo".into(),
                model: "echo".into(),
            }
        }

        async fn generate(&self, prompt: &str) -> ServiceResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(format!("echo {prompt}")),
            }
        }
    }

    async fn run_script(service: Arc<EchoService>, script: &str) -> (ChatSession, String) {
        let mut session = ChatSession::new(service);
        let mut output = Vec::new();
        run(&mut session, script.as_bytes(), &mut output).await.unwrap();
        (session, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("hello"), Command::Say("hello"));
        assert_eq!(Command::parse("  /quit "), Command::Quit);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("/history"), Command::History);
        assert_eq!(Command::parse("/nope"), Command::Unknown("/nope"));
    }

    #[tokio::test]
    async fn test_script_round_trip() {
        let service = EchoService::new(None);
        let (session, output) = run_script(service.clone(), "hello\n/history\n/quit\nignored\n").await;

        assert!(output.starts_with(&format!("JARVIS: {GREETING}\n")));
        assert!(output.contains("JARVIS is typing...\nJARVIS: echo hello\n"));
        assert!(output.contains("user: hello\nassistant: echo hello\n"));
        assert_eq!(*service.prompts.lock().unwrap(), vec!["hello".to_string()]);
        assert_eq!(session.transcript().len(), 3);
        assert!(!session.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_blank_lines_are_ignored() {
        let service = EchoService::new(None);
        let (session, output) = run_script(service.clone(), "\n   \n").await;

        assert_eq!(session.transcript().len(), 1);
        assert!(!output.contains("typing"));
        assert!(service.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_new_starts_fresh_session() {
        let service = EchoService::new(None);
        let (session, output) = run_script(service, "one\n/new\n").await;

        assert_eq!(session.transcript().len(), 1);
        assert_eq!(output.matches(GREETING).count(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_service_prints_fallback() {
        let service = EchoService::new(Some(ServiceError::NotFound("models/x not found".into())));
        let (session, output) = run_script(service, "hi\n").await;

        let last = &session.transcript().last().content;
        assert!(FALLBACK_REPLIES.contains(&last.as_str()));
        assert!(output.contains(&format!("JARVIS: {last}\n")));
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let (_, output) = run_script(EchoService::new(None), "/dance\n").await;
        assert!(output.contains("Unknown command /dance"));
    }
}
