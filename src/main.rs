mod ai;
mod config;
mod constants;
mod credentials;
mod models;
mod store;

use anyhow::Result;
use std::env;
use std::io::{self, Write};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::ai::{GenerationCommand, GenerationEvent, spawn_generation_actor};
use crate::config::Config;
use crate::constants::MAX_WRITING_STYLES;
use crate::credentials::ApiKeyStore;
use crate::models::{Draft, EmailFormData, OpportunityType, SavedEmail, WritingStyle};
use crate::store::Registry;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,cmail=debug"));

    // Try to create a log file in the config directory
    let log_file = Config::config_dir()
        .ok()
        .map(|dir| dir.join("cmail.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        // Fallback to stderr if file logging fails
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"cmail - Generate academic cold emails in your own writing style

Usage: cmail <command>

Commands:
    setup                   Store the Gemini API key and write a default config
    generate                Fill in the form and generate an email
    emails list             List saved emails
    emails show <n>         Print a saved email
    emails edit <n>         Retitle or rewrite a saved email
    emails delete <n>       Delete a saved email
    styles list             List writing styles
    styles add              Add a writing style sample
    styles edit <n>         Retitle or rewrite a writing style
    styles delete <n>       Delete a writing style
    drafts list             List drafts
    drafts add              Add a draft
    drafts show <n>         Print a draft
    drafts edit <n>         Retitle or rewrite a draft
    drafts delete <n>       Delete a draft
    help                    Show this help message

Configuration file: ~/.config/cmail/config.toml
"#
    );
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Read multiple lines until a lone "." on its own line.
fn prompt_block(label: &str) -> Result<String> {
    println!("{} (end with a single '.' on its own line):", label);
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);
        if line == "." {
            break;
        }
        lines.push(line.to_string());
    }
    Ok(lines.join("\n"))
}

fn run_setup() -> Result<()> {
    println!("CMail Setup");
    println!("===========\n");

    let key_store = ApiKeyStore::new();
    if key_store.has_key() {
        let answer = prompt_line("An API key is already stored. Overwrite? [y/N]")?;
        if !answer.eq_ignore_ascii_case("y") {
            println!("Setup cancelled.");
            return Ok(());
        }
    }

    let api_key = loop {
        let key = prompt_line("Gemini API key")?;
        if !key.is_empty() {
            break key;
        }
        println!("The API key cannot be empty.");
    };

    key_store.set(&api_key)?;

    let config = Config::load().unwrap_or_default();
    config.ensure_dirs()?;
    config.save()?;
    println!(
        "Configuration saved to {}",
        Config::config_path()?.display()
    );

    println!("\nSetup complete! Run 'cmail generate' to write your first email.");
    Ok(())
}

fn read_form() -> Result<EmailFormData> {
    println!("Fill in the form. Empty fields are left out of the prompt.\n");

    let opportunity_type = loop {
        let input = prompt_line("Opportunity type (MSc/PhD/Both, optional)")?;
        if input.is_empty() {
            break String::new();
        }
        match OpportunityType::parse(&input) {
            Some(t) => break t.display_name().to_string(),
            None => println!("Please enter MSc, PhD, or Both."),
        }
    };

    Ok(EmailFormData {
        professor_name: prompt_line("Professor's name")?,
        university_name: prompt_line("University")?,
        department_name: prompt_line("Department")?,
        lab_name: prompt_line("Laboratory/research group")?,
        research_topic: prompt_line("Research topic of interest")?,
        opportunity_type,
        project_details: prompt_line("Project details")?,
        prompt: prompt_line("Additional context")?,
    })
}

async fn run_generate() -> Result<()> {
    let config = Config::load()?;
    config.ensure_dirs()?;

    let key_store = ApiKeyStore::new();
    let api_key = key_store.get()?;

    let mut registry = Registry::open_default()?;
    let mut saved_emails = store::saved_emails(&registry);
    let mut drafts = store::drafts(&registry);
    let writing_styles = store::writing_styles(&registry);

    let form = read_form()?;

    let client = ai::GeminiClient::new(api_key, config.generation.clone())?;
    let mut handle = spawn_generation_actor(client);

    handle
        .cmd_tx
        .send(GenerationCommand::Generate {
            form,
            saved_emails: saved_emails.records().to_vec(),
            writing_styles: writing_styles.records().to_vec(),
        })
        .await
        .map_err(|_| anyhow::anyhow!("The generator stopped before the request was sent"))?;

    println!("\nGenerating...");

    let text = match handle.event_rx.recv().await {
        Some(GenerationEvent::Generated(text)) => text,
        Some(GenerationEvent::Failed(message)) => {
            eprintln!("Generation failed: {}", message);
            return Ok(());
        }
        None => {
            eprintln!("Generation failed: the generator stopped unexpectedly.");
            return Ok(());
        }
    };

    println!("\n{}\n", text);

    let choice = prompt_line("Save as [e]mail, [d]raft, or [n]either?")?;
    match choice.to_ascii_lowercase().as_str() {
        "e" | "email" => {
            let title = prompt_line("Title (optional)")?;
            saved_emails.add(&mut registry, SavedEmail::new(text, title));
            println!("Saved.");
        }
        "d" | "draft" => {
            let title = prompt_line("Title (optional)")?;
            drafts.add(&mut registry, Draft::new(text, title));
            println!("Saved as draft.");
        }
        _ => {}
    }

    let _ = handle.cmd_tx.send(GenerationCommand::Shutdown).await;
    Ok(())
}

fn parse_index(arg: Option<&String>) -> Result<usize> {
    let arg = arg.ok_or_else(|| anyhow::anyhow!("Missing record number"))?;
    let n: usize = arg
        .parse()
        .map_err(|_| anyhow::anyhow!("Not a record number: {}", arg))?;
    if n == 0 {
        anyhow::bail!("Record numbers start at 1");
    }
    Ok(n - 1)
}

fn run_emails(args: &[String]) -> Result<()> {
    let mut registry = Registry::open_default()?;
    let mut emails = store::saved_emails(&registry);

    match args.first().map(|s| s.as_str()) {
        Some("list") | None => {
            if emails.is_empty() {
                println!("No saved emails.");
            }
            for (i, email) in emails.records().iter().enumerate() {
                println!("{:3}. {}", i + 1, email.title);
            }
        }
        Some("show") => {
            let index = parse_index(args.get(1))?;
            match emails.get(index) {
                Some(email) => println!("{}\n\n{}", email.title, email.content),
                None => println!("No such email."),
            }
        }
        Some("edit") => {
            let index = parse_index(args.get(1))?;
            let Some(existing) = emails.get(index).cloned() else {
                println!("No such email.");
                return Ok(());
            };
            let title = prompt_line("New title (empty keeps current)")?;
            let content = prompt_block("New content (empty keeps current)")?;

            let mut updated = existing;
            if !title.is_empty() {
                updated.title = title;
            }
            if !content.trim().is_empty() {
                updated.content = content;
            }
            emails.update(&mut registry, updated);
            println!("Updated.");
        }
        Some("delete") => {
            let index = parse_index(args.get(1))?;
            emails.delete_at(&mut registry, index);
            println!("Deleted.");
        }
        Some(other) => anyhow::bail!("Unknown emails command: {}", other),
    }
    Ok(())
}

fn run_styles(args: &[String]) -> Result<()> {
    let mut registry = Registry::open_default()?;
    let mut styles = store::writing_styles(&registry);

    match args.first().map(|s| s.as_str()) {
        Some("list") | None => {
            if styles.is_empty() {
                println!("No writing styles.");
            }
            for (i, style) in styles.records().iter().enumerate() {
                let title = if style.title.is_empty() {
                    "(untitled)"
                } else {
                    &style.title
                };
                println!("{:3}. {}", i + 1, title);
            }
        }
        Some("add") => {
            // The cap lives here, not in the store
            if styles.len() >= MAX_WRITING_STYLES {
                anyhow::bail!(
                    "You already have {} writing styles; delete one first.",
                    MAX_WRITING_STYLES
                );
            }
            let title = prompt_line("Title (optional)")?;
            let content = prompt_block("Paste a sample of your writing")?;
            if content.trim().is_empty() {
                anyhow::bail!("The sample cannot be empty.");
            }
            styles.add(&mut registry, WritingStyle::new(content, title));
            println!("Added.");
        }
        Some("edit") => {
            let index = parse_index(args.get(1))?;
            let Some(existing) = styles.get(index).cloned() else {
                println!("No such style.");
                return Ok(());
            };
            let title = prompt_line("New title (empty keeps current)")?;
            let content = prompt_block("New sample (empty keeps current)")?;

            let mut updated = existing;
            if !title.is_empty() {
                updated.title = title;
            }
            if !content.trim().is_empty() {
                updated.content = content;
            }
            styles.update_at(&mut registry, index, updated);
            println!("Updated.");
        }
        Some("delete") => {
            let index = parse_index(args.get(1))?;
            styles.delete_at(&mut registry, index);
            println!("Deleted.");
        }
        Some(other) => anyhow::bail!("Unknown styles command: {}", other),
    }
    Ok(())
}

fn run_drafts(args: &[String]) -> Result<()> {
    let mut registry = Registry::open_default()?;
    let mut drafts = store::drafts(&registry);

    match args.first().map(|s| s.as_str()) {
        Some("list") | None => {
            if drafts.is_empty() {
                println!("No drafts.");
            }
            for (i, draft) in drafts.records().iter().enumerate() {
                println!("{:3}. {}", i + 1, draft.title);
            }
        }
        Some("add") => {
            let title = prompt_line("Title (optional)")?;
            let content = prompt_block("Draft content")?;
            if content.trim().is_empty() {
                anyhow::bail!("The draft cannot be empty.");
            }
            drafts.add(&mut registry, Draft::new(content, title));
            println!("Added.");
        }
        Some("show") => {
            let index = parse_index(args.get(1))?;
            match drafts.get(index) {
                Some(draft) => println!("{}\n\n{}", draft.title, draft.content),
                None => println!("No such draft."),
            }
        }
        Some("edit") => {
            let index = parse_index(args.get(1))?;
            let Some(existing) = drafts.get(index).cloned() else {
                println!("No such draft.");
                return Ok(());
            };
            let title = prompt_line("New title (empty keeps current)")?;
            let content = prompt_block("New content (empty keeps current)")?;

            let mut updated = existing;
            if !title.is_empty() {
                updated.title = title;
            }
            if !content.trim().is_empty() {
                updated.content = content;
            }
            drafts.update_at(&mut registry, index, updated);
            println!("Updated.");
        }
        Some("delete") => {
            let index = parse_index(args.get(1))?;
            drafts.delete_at(&mut registry, index);
            println!("Deleted.");
        }
        Some(other) => anyhow::bail!("Unknown drafts command: {}", other),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") | None => {
            print_usage();
            Ok(())
        }
        Some("setup") => run_setup(),
        Some("generate") => {
            setup_logging();
            run_generate().await
        }
        Some("emails") => run_emails(&args[2..]),
        Some("styles") => run_styles(&args[2..]),
        Some("drafts") => run_drafts(&args[2..]),
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
    }
}
