use anyhow::{Context, Result};
use draftwire_config::Config;
use draftwire_engine::clipboard::{
    BlockMapSelection, ClipboardData, DRAFT_MIME_TYPE, MemoryClipboard, MemoryClipboardEvent,
    TEXT_PLAIN, set_fragment_to_clipboard, try_get_fragment_from_clipboard,
};
use draftwire_engine::model::{ContentState, line_break};
use log::LevelFilter;
use std::{env, fs, path::Path, process};

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} copy <text-file>");
    eprintln!("       {program} paste <payload-file>");
    process::exit(1);
}

/// Copy `text` as a document onto a fresh in-memory clipboard
fn copy_to_clipboard(text: &str, config: &Config) -> Result<MemoryClipboard> {
    let content = ContentState::create_from_text_with(text, line_break(), &config.model_options());
    log::info!("Copying {} blocks", content.block_map().len());

    let mut event = MemoryClipboardEvent::new(MemoryClipboard::new());
    let selection =
        BlockMapSelection::with_delimiter(content.block_map(), &config.plain_text_delimiter);
    set_fragment_to_clipboard(Some(content.block_map()), Some(&mut event), Some(&selection));

    event
        .into_clipboard()
        .filter(|clipboard| clipboard.has_type(DRAFT_MIME_TYPE))
        .with_context(|| format!("Nothing was written to the {DRAFT_MIME_TYPE} channel"))
}

/// Build a document from a text file and print the clipboard payload it copies to
fn copy(path: &Path, config: &Config) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read text file {}", path.display()))?;

    let clipboard = copy_to_clipboard(&text, config)?;
    if let Some(plain) = clipboard.get_data(TEXT_PLAIN) {
        log::debug!("{TEXT_PLAIN}: {plain:?}");
    }
    if let Some(payload) = clipboard.get_data(DRAFT_MIME_TYPE) {
        println!("{payload}");
    }
    Ok(())
}

/// Decode a clipboard payload file and print one line per block
fn paste(path: &Path) -> Result<()> {
    let payload = fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload file {}", path.display()))?;

    let event = MemoryClipboardEvent::new(MemoryClipboard::with_payload(DRAFT_MIME_TYPE, &payload));
    let fragment = try_get_fragment_from_clipboard(Some(&event))
        .with_context(|| format!("Cannot paste {}", path.display()))?
        .unwrap_or_default();

    log::info!("Pasted {} blocks", fragment.len());
    for block in fragment.blocks() {
        println!(
            "{}\t{}\t{}\t{}",
            block.key(),
            block.block_type(),
            block.depth(),
            block.text()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = Config::load_or_default()?;

    let log_level = config.log_level.parse::<LevelFilter>();
    env_logger::Builder::new()
        .filter_level(*log_level.as_ref().unwrap_or(&LevelFilter::Info))
        .parse_default_env()
        .init();
    if let Err(e) = log_level {
        log::warn!("Invalid log_level {:?} in config: {e}", config.log_level);
    }

    match args.as_slice() {
        [_, command, file] if command == "copy" => copy(Path::new(file), &config),
        [_, command, file] if command == "paste" => paste(Path::new(file)),
        [program, ..] => usage(program),
        [] => usage("draftwire-cli"),
    }
}
