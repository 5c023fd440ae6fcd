//! Interactive terminal front-end
//!
//! Drives the session handlers from stdin. Plain lines are sent as messages;
//! lines starting with `/` are commands (`/help` lists them).
//!
//! Run with: cargo run --example chat

use anyhow::Context;
use std::io::{self, Write};
use std::sync::Arc;
use sydne::prelude::*;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Commands:
  /templates        list prompt templates
  /template <name>  use a prompt template for the next messages
  /key <api key>    use your own OpenAI key (removes the token limit)
  /key              go back to the shared key
  /temperature <t>  sampling temperature, 0 to 2
  /max-tokens <n>   max tokens per response, 100 to 4096
  /reset            restart the conversation
  /quit             exit";

fn print_view(view: &SessionView) {
    if let Some((_, reply)) = view.transcript.last() {
        println!("Assistant: {}\n", reply);
    }
    if !view.budget_message.is_empty() {
        println!("({})\n", view.budget_message);
    }
    if !view.input.visible {
        println!("Token limit reached. Enter your own key with /key or /reset.\n");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = AppConfig::from_env().context("reading configuration")?;
    if !config.has_default_key() {
        println!("OPENAI_API_KEY is not set; use /key to supply one.\n");
    }

    let catalog = PromptTemplateCatalog::load(&reqwest::Client::new(), &config.templates_url).await;
    let gateway = OpenAIGateway::with_config((&config).into())?;
    let controller = SessionController::new(
        CompletionGateway::new(config.model.clone(), Arc::new(gateway)),
        Arc::new(catalog),
    )
    .with_token_limit(config.token_limit);
    let controller = Arc::new(controller);
    let session = SessionHandle::new(controller.clone());

    let mut template = controller.catalog().default_label().to_string();
    let mut credential: Option<Credential> = None;
    let mut sampling = CompletionConfig::default();
    let mut input_visible = true;

    println!("Sydne");
    println!("=====");
    println!("Current limit is {} tokens per conversation. /help for commands.\n", config.token_limit);

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if let Some(command) = line.strip_prefix('/') {
            let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
            let arg = arg.trim();
            match name {
                "quit" | "exit" => break,
                "help" => println!("{}\n", HELP),
                "templates" => {
                    for label in controller.catalog().labels() {
                        println!("  {}", label);
                    }
                    println!();
                }
                "template" => match controller.template_preview(arg) {
                    Some(preview) => {
                        template = arg.to_string();
                        if !preview.is_empty() {
                            println!("{}\n", preview);
                        }
                    }
                    None => println!("No template named {:?}\n", arg),
                },
                "key" => {
                    credential = Credential::from_input(Some(arg));
                    input_visible = true;
                }
                "temperature" => match arg.parse() {
                    Ok(t) => sampling.temperature = t,
                    Err(_) => println!("Not a number: {}\n", arg),
                },
                "max-tokens" => match arg.parse() {
                    Ok(n) => sampling.max_tokens = n,
                    Err(_) => println!("Not a number: {}\n", arg),
                },
                "reset" => {
                    let view = session.reset().await;
                    input_visible = view.input.visible;
                    println!("Conversation restarted.\n");
                }
                _ => println!("Unknown command. /help lists commands.\n"),
            }
            continue;
        }

        if !input_visible && credential.is_none() {
            println!("Token limit reached. Enter your own key with /key or /reset.\n");
            continue;
        }

        let request = SubmitRequest::new(line)
            .with_credential(credential.clone())
            .with_template(template.as_str())
            .with_sampling(sampling.temperature, sampling.max_tokens);

        if let Some(view) = session.submit(request).await {
            input_visible = view.input.visible;
            if !line.is_empty() {
                print_view(&view);
            }
        }
    }

    println!("\nGoodbye!");
    Ok(())
}
