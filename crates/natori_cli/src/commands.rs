//! REPL command parsing.

use natori_core::EmotionLabel;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Plain input: a user message that goes through the reply source.
    Chat(String),
    /// Treat the text as the bot's reply directly.
    Reply(String),
    Analyze(String),
    Stats,
    Add {
        label: String,
        keywords: Vec<String>,
    },
    Test(EmotionLabel),
    SelfCheck,
    Probe(String),
    State,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
  <text>                  talk to Natori
  :reply <text>           use <text> as Natori's reply
  :analyze <text>         classify without touching the avatar
  :stats                  lexicon statistics
  :add <label> <kw...>    add keywords to a label
  :test <label>           run a label's sample phrase
  :selfcheck              classify every sample phrase
  :probe <text>           which keywords occur in <text>
  :state                  current avatar display state
  :quit                   exit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }
        if line == "quit" || line == "exit" {
            return Ok(Self::Quit);
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Self::Chat(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        let text = |usage: &str| {
            if arg.is_empty() {
                Err(format!("usage: {}", usage))
            } else {
                Ok(arg.to_string())
            }
        };

        match name {
            "reply" => text(":reply <text>").map(Self::Reply),
            "analyze" => text(":analyze <text>").map(Self::Analyze),
            "probe" => text(":probe <text>").map(Self::Probe),
            "stats" => Ok(Self::Stats),
            "selfcheck" => Ok(Self::SelfCheck),
            "state" => Ok(Self::State),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "test" => text(":test <label>")?
                .parse()
                .map(Self::Test)
                .map_err(|e| e.to_string()),
            "add" => {
                let mut words = arg.split_whitespace().map(str::to_string);
                match words.next() {
                    Some(label) => {
                        let keywords: Vec<String> = words.collect();
                        if keywords.is_empty() {
                            Err("usage: :add <label> <kw...>".to_string())
                        } else {
                            Ok(Self::Add { label, keywords })
                        }
                    }
                    None => Err("usage: :add <label> <kw...>".to_string()),
                }
            }
            other => Err(format!("unknown command ':{}' (try :help)", other)),
        }
    }
}
