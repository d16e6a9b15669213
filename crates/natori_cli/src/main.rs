use anyhow::Result;
use clap::Parser;
use natori_core::diagnostics::{keyword_self_check, probe_keywords};
use natori_core::{AvatarAssets, EmotionLabel, NatoriConfig, ReplySource, SpeechSignals};
use natori_expression::{ApplyOutcome, EmotionPipeline};
use natori_voice::{PacedSink, SimulatedSpeech, SpeechSession, TextToSpeech};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod console_avatar;
mod reply;

use commands::{Command, HELP};
use console_avatar::ConsoleAvatar;
use reply::EchoReplySource;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "NATORI_CONFIG", default_value = "natori.toml")]
    config: PathBuf,

    /// Minimum confidence for an emotion to reach the avatar (overrides config)
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_engine(config: &NatoriConfig) -> Arc<dyn TextToSpeech> {
    if config.speech.engine != SimulatedSpeech::ENGINE_ID {
        warn!(
            "Speech engine '{}' is not available here, using simulated",
            config.speech.engine
        );
    }
    Arc::new(SimulatedSpeech::new(config.speech.chars_per_minute))
}

/// Line source: an editor with history on a terminal, plain lines when piped.
enum LineInput {
    Editor(DefaultEditor),
    Piped(std::io::Lines<std::io::StdinLock<'static>>),
}

impl LineInput {
    fn new() -> Result<Self> {
        if std::io::stdin().is_terminal() {
            Ok(Self::Editor(DefaultEditor::new()?))
        } else {
            Ok(Self::Piped(std::io::stdin().lines()))
        }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        match self {
            Self::Editor(editor) => match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    Ok(Some(line))
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
                Err(e) => Err(e.into()),
            },
            Self::Piped(lines) => Ok(lines.next().transpose()?),
        }
    }
}

struct Console {
    pipeline: EmotionPipeline,
    avatar: Arc<ConsoleAvatar>,
    replies: Box<dyn ReplySource>,
    speech: SpeechSession,
}

impl Console {
    /// Returns false when the session should end.
    async fn run(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Empty => {}
            Command::Quit => return Ok(false),
            Command::Help => println!("{}", HELP),
            Command::Chat(message) => match self.replies.reply(&message).await {
                Ok(reply) => self.respond(&reply).await,
                Err(e) => println!("[reply error] {:#}", e),
            },
            Command::Reply(reply) => self.respond(&reply).await,
            Command::Test(label) => {
                let outcome = self.pipeline.test_label(label);
                self.report(&outcome);
                self.speak(natori_core::diagnostics::sample_phrase(label), label)
                    .await;
            }
            Command::Analyze(text) => {
                let result = self.pipeline.classifier().classify(&text);
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Command::Stats => {
                let stats = self.pipeline.classifier().lexicon().stats();
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
            Command::Add { label, keywords } => {
                match self
                    .pipeline
                    .classifier_mut()
                    .lexicon_mut()
                    .add_keywords(&label, keywords.as_slice())
                {
                    Ok(total) => println!("{}: {} keywords", label, total),
                    Err(e) => println!("[error] {}", e),
                }
            }
            Command::SelfCheck => {
                let checks = keyword_self_check(self.pipeline.classifier());
                for check in &checks {
                    let mark = if check.passed() { "✓" } else { "✗" };
                    println!(
                        "{} {:<9} → {:<9} ({:.3})",
                        mark, check.expected, check.actual, check.confidence
                    );
                }
                let passed = checks.iter().filter(|c| c.passed()).count();
                println!("{}/{} passed", passed, checks.len());
            }
            Command::Probe(text) => {
                let lexicon = self.pipeline.classifier().lexicon();
                for probe in probe_keywords(lexicon, &text, None) {
                    if !probe.found.is_empty() {
                        println!("{}: {}", probe.emotion, probe.found.join(", "));
                    }
                }
            }
            Command::State => {
                let state = self.pipeline.controller().display_state().snapshot();
                println!("{}", serde_json::to_string_pretty(&state)?);
                println!("showing: {}", self.avatar.showing());
            }
        }
        Ok(true)
    }

    async fn respond(&self, reply: &str) {
        println!("Natori: {}", reply);
        let outcome = self.pipeline.process_reply(reply);
        self.report(&outcome);
        self.speak(reply, outcome.result.emotion).await;
    }

    fn report(&self, outcome: &ApplyOutcome) {
        let result = &outcome.result;
        if outcome.applied {
            println!("  [emotion] {} ({:.3})", result.emotion, result.confidence);
        } else {
            println!(
                "  [emotion] {} ({:.3}) not applied: {:?}",
                result.emotion, result.confidence, outcome.reason
            );
        }
        if let Some(error) = &outcome.error {
            println!("  [emotion] {}", error);
        }
    }

    async fn speak(&self, text: &str, emotion: EmotionLabel) {
        if let Err(e) = self.speech.speak(text, Some(emotion)).await {
            warn!("Speech failed: {:#}", e);
        }
        // A skipped or failed utterance never signalled its end
        let coordinator = self.pipeline.coordinator();
        if coordinator.has_pending_hook() {
            debug!("No speech end for this reply, restoring the avatar now");
            coordinator.notify_speech_end();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.json_logs);

    info!("Loading config from {}...", args.config.display());
    let mut config = NatoriConfig::load_or_default(&args.config);
    if let Some(min_confidence) = args.min_confidence {
        config.emotion.min_confidence = min_confidence;
    }

    let avatar = Arc::new(ConsoleAvatar::new(
        AvatarAssets::from_config(&config.avatar),
        &config.avatar.neutral_expression,
    ));
    let pipeline = EmotionPipeline::from_config(&config, avatar.clone());
    let signals: Arc<dyn SpeechSignals> = pipeline.coordinator();
    let speech = SpeechSession::new(build_engine(&config), Arc::new(PacedSink), signals);
    info!(
        "Pipeline ready (min confidence {}, speech via {})",
        pipeline.min_confidence(),
        speech.engine_id()
    );

    let mut console = Console {
        pipeline,
        avatar,
        replies: Box::new(EchoReplySource::default()),
        speech,
    };

    println!("Natori online. Type :help for commands, :quit to exit.");
    let mut input = LineInput::new()?;
    while let Some(line) = input.next_line()? {
        match Command::parse(&line) {
            Ok(command) => {
                if !console.run(command).await? {
                    break;
                }
            }
            Err(message) => println!("{}", message),
        }
    }

    Ok(())
}
