// StudyBuddy command line entry point

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::thread_rng;
use std::io::{self, BufRead, Read, Write};
use std::sync::Arc;
use tracing::info;

use studybuddy_core::actors::{CompletionActor, LlmActorHandle};
use studybuddy_core::engine::{
    detect_emotion, make_title, normalize, ChatReplyPipeline, ExamGuidePipeline, NormalizeMode,
    SuggestionPicker, TopicClassifier,
};
use studybuddy_core::engine::title::DEFAULT_TITLE_WORDS;
use studybuddy_core::logging::init_tracing;
use studybuddy_core::session::ChatService;
use studybuddy_core::store::InMemoryConversationStore;
use studybuddy_core::AppConfig;

#[derive(Parser)]
#[command(name = "studybuddy", version, about = "Student assistant: bulleted chat and AI exam guides")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chat interactively; one message per line, empty input or EOF quits
    Chat,
    /// Generate an exam preparation guide
    Exam {
        /// Subject to prepare for
        subject: String,
    },
    /// Show topic, emotion, title and suggestions for a message (offline)
    Classify { text: String },
    /// Normalize text from stdin into bullets
    Normalize {
        /// Use the exam guide rules (section headings) instead of chat rules
        #[arg(long)]
        exam: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Table defects abort here, before any request is served.
    let picker = SuggestionPicker::builtin().context("invalid suggestion table")?;

    match cli.command {
        Command::Classify { text } => classify(&picker, &text),
        Command::Normalize { exam } => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            let mode = if exam { NormalizeMode::ExamGuide } else { NormalizeMode::ChatReply };
            println!("{}", normalize(&input, mode));
            Ok(())
        }
        Command::Chat => {
            let config = load_config()?;
            let llm: Arc<dyn CompletionActor> = Arc::new(LlmActorHandle::new(&config)?);
            let pipeline = ChatReplyPipeline::new(llm, picker, config.model.clone(), config.chat_temperature);
            chat_loop(ChatService::new(Arc::new(InMemoryConversationStore::new()), pipeline)).await
        }
        Command::Exam { subject } => {
            let config = load_config()?;
            let llm: Arc<dyn CompletionActor> = Arc::new(LlmActorHandle::new(&config)?);
            let pipeline = ExamGuidePipeline::new(
                llm,
                config.model.clone(),
                config.exam_temperature,
                config.exam_max_tokens,
            );
            let report = pipeline.generate(&subject).await?;
            println!("{}", report);
            Ok(())
        }
    }
}

fn load_config() -> anyhow::Result<AppConfig> {
    let config = AppConfig::load()?;
    init_tracing(config.log_format)?;
    info!("Using model {} at {}", config.model, config.api_base);
    Ok(config)
}

fn classify(picker: &SuggestionPicker, text: &str) -> anyhow::Result<()> {
    let category = TopicClassifier::new().classify(text);
    let emotion = detect_emotion(text);
    println!("topic:      {}", category);
    println!("emotion:    {} ({:.2})", emotion.emotion, emotion.confidence);
    println!("title:      {}", make_title(text, DEFAULT_TITLE_WORDS));
    println!("suggestions:");
    for suggestion in picker.suggest_with_rng(category, &mut thread_rng()) {
        println!("  - {}", suggestion);
    }
    Ok(())
}

async fn chat_loop(service: ChatService) -> anyhow::Result<()> {
    let session = service.create_session().await?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("you> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 || line.trim().is_empty() {
            break;
        }

        let reply = service.send(&session.id, &line).await?;
        println!("{}", reply.reply_text);
        if !reply.suggestions.is_empty() {
            println!("  try: {}", reply.suggestions.join(" | "));
        }
    }

    Ok(())
}
