use anno::{
    find_many, sort_notes, web, ClassifierConfig, EmojiTable, Expander, FieldFunc, Finder,
    Finders, EMAIL, EMOJI, HASHTAG, MENTION, URL,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "anno")]
#[command(about = "Find mentions, hashtags, links, email addresses and emoji codes in text")]
#[command(version)]
struct Args {
    /// Text file to scan; reads stdin when omitted
    input: Option<PathBuf>,

    /// Token kinds to look for
    #[arg(long, value_delimiter = ',', default_values = ["mention", "hashtag", "url", "email", "emoji"])]
    kinds: Vec<String>,

    /// What to print
    #[arg(long, value_enum, default_value_t = Output::Notes)]
    output: Output,

    /// JSON file overriding punctuation and domain suffixes
    #[arg(long)]
    config: Option<PathBuf>,

    /// Link prefix for mentions in html output
    #[arg(long, default_value = "/profile/")]
    profile_base: String,

    /// Link prefix for hashtags in html output
    #[arg(long, default_value = "/tags/")]
    tag_base: String,

    /// Maximum length of displayed link text in html output
    #[arg(long, default_value_t = 40)]
    link_text_len: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    /// JSON array of notes sorted by position
    Notes,
    /// Input text with every token expanded into html
    Html,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: stdout carries results, so structured logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    if args.link_text_len < 4 {
        anyhow::bail!("--link-text-len must be at least 4, got {}", args.link_text_len);
    }

    let config = match &args.config {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Cannot read config file {}", path.display()))?;
            ClassifierConfig::from_json(&json)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => ClassifierConfig::default(),
    };
    let finders = Finders::new(config);

    let selected = args
        .kinds
        .iter()
        .map(|kind| {
            finders
                .by_kind(kind.trim())
                .with_context(|| format!("Unknown kind '{kind}'"))
        })
        .collect::<Result<Vec<FieldFunc>>>()?;

    let text = read_input(&args).await?;
    let finder_refs: Vec<&dyn Finder> = selected.iter().map(|f| f as &dyn Finder).collect();
    let mut notes = find_many(text.as_bytes(), &finder_refs).await?;
    info!(notes = notes.len(), bytes = text.len(), "Scan completed");

    match args.output {
        Output::Notes => {
            sort_notes(&mut notes);
            println!("{}", serde_json::to_string_pretty(&notes)?);
        }
        Output::Html => {
            let expander = html_expander(&args);
            print!("{}", expander.expand(&text, notes));
        }
    }

    Ok(())
}

async fn read_input(args: &Args) -> Result<String> {
    match &args.input {
        Some(path) => {
            // WHY: validate input exists early to fail fast with clear error
            if !path.is_file() {
                anyhow::bail!("Input file does not exist: {}", path.display());
            }
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Cannot read {}", path.display()))
        }
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Cannot read stdin")?;
            Ok(text)
        }
    }
}

fn html_expander(args: &Args) -> Expander {
    let profile_base = args.profile_base.clone();
    let tag_base = args.tag_base.clone();
    let link_text_len = args.link_text_len;
    let table = EmojiTable::default();

    Expander::new()
        .with_rule(MENTION, move |val| {
            let name = val.trim_start_matches('@');
            link(&format!("{profile_base}{name}"), val)
        })
        .with_rule(HASHTAG, move |val| {
            let tag = val.trim_start_matches('#');
            link(&format!("{tag_base}{tag}"), val)
        })
        .with_rule(URL, move |val| {
            let href = if val.contains("://") {
                val.to_string()
            } else {
                format!("http://{val}")
            };
            // link_text_len was checked above, so short_url cannot fail here
            let text = web::short_url(val, link_text_len).unwrap_or_else(|_| val.to_string());
            link(&href, &text)
        })
        .with_rule(EMAIL, |val| link(&format!("mailto:{val}"), val))
        .with_rule(EMOJI, move |val| escape_html(&table.expand(val)))
        .with_text_rule(escape_html)
}

fn link(href: &str, text: &str) -> String {
    format!(r#"<a href="{}">{}</a>"#, escape_html(href), escape_html(text))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
